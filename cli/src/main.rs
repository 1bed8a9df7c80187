//! mdpdf CLI - Markdown to PDF conversion tool

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use clap::{Parser, Subcommand};
use colored::Colorize;

use mdpdf::{blocks_to_json, parse_file, BuildEvent, JsonFormat, MdPdf, WatchOptions};

#[derive(Parser)]
#[command(name = "mdpdf")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Convert Markdown files to PDF", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Input Markdown file
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output PDF file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a Markdown file to PDF
    Convert {
        /// Input Markdown file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output PDF file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Use A4 pages instead of US Letter
        #[arg(long)]
        a4: bool,
    },

    /// Print the parsed block structure as JSON
    Blocks {
        /// Input Markdown file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Check the structure of a PDF file
    Check {
        /// PDF file to check
        #[arg(value_name = "PDF")]
        input: PathBuf,
    },

    /// Rebuild the PDF whenever the input changes
    Watch {
        /// Input Markdown file
        #[arg(value_name = "INPUT", default_value = "sample.md")]
        input: PathBuf,

        /// Output PDF file
        #[arg(value_name = "OUTPUT", default_value = "output/pdf/sample.pdf")]
        output: PathBuf,

        /// Poll interval in milliseconds
        #[arg(long, value_name = "MS", default_value = "100", env = "MDPDF_POLL_MS")]
        interval_ms: u64,

        /// Use A4 pages instead of US Letter
        #[arg(long)]
        a4: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert { input, output, a4 }) => cmd_convert(&input, &output, a4),
        Some(Commands::Blocks { input, compact }) => cmd_blocks(&input, compact),
        Some(Commands::Check { input }) => cmd_check(&input),
        Some(Commands::Watch {
            input,
            output,
            interval_ms,
            a4,
        }) => cmd_watch(input, output, interval_ms, a4),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => match (cli.input, cli.output) {
            (Some(input), Some(output)) => cmd_convert(&input, &output, false),
            _ => {
                println!("{}", "Usage: mdpdf <INPUT> <OUTPUT>".yellow());
                println!("       mdpdf --help for more information");
                std::process::exit(1);
            }
        },
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn builder(a4: bool) -> MdPdf {
    if a4 {
        MdPdf::new().a4()
    } else {
        MdPdf::new()
    }
}

fn cmd_convert(input: &Path, output: &Path, a4: bool) -> Result<(), Box<dyn std::error::Error>> {
    let report = builder(a4).convert_file(input, output)?;
    println!("PDF written to {}", report.output.display());
    log::debug!("{} blocks, {} pages, {} bytes", report.blocks, report.pages, report.bytes);
    Ok(())
}

fn cmd_blocks(input: &Path, compact: bool) -> Result<(), Box<dyn std::error::Error>> {
    let blocks = parse_file(input)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    println!("{}", blocks_to_json(&blocks, format)?);
    Ok(())
}

fn cmd_check(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let summary = mdpdf::verify::inspect_pdf_file(input)?;

    println!("{}", "PDF Structure".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), summary.version);
    println!("{}: {}", "Objects".bold(), summary.object_count);
    println!("{}: {}", "Pages".bold(), summary.page_count);
    println!("{}: {} 0 R", "Root".bold(), summary.root);
    println!("{}: {}", "Xref offset".bold(), summary.xref_offset);
    println!("{}", "OK".green().bold());
    Ok(())
}

fn cmd_watch(
    input: PathBuf,
    output: PathBuf,
    interval_ms: u64,
    a4: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = WatchOptions::new().with_poll_interval(Duration::from_millis(interval_ms.max(1)));

    println!(
        "{} {} -> {}",
        "Watching".cyan().bold(),
        input.display(),
        output.display()
    );
    builder(a4).rebuilder(input, output).watch(options, |event| {
        match event {
            BuildEvent::Built {
                output_path,
                timestamp,
                ..
            } => println!(
                "{} {} -> {}",
                "[build]".green(),
                timestamp.with_timezone(&Local).format("%H:%M:%S"),
                output_path.display()
            ),
            BuildEvent::Error { message } => {
                eprintln!("{} {}", "[build:error]".red(), message)
            }
        }
        ControlFlow::Continue(())
    })?;
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "mdpdf".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Markdown to PDF conversion tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/mdpdf".dimmed());
    println!("License: MIT");
}
