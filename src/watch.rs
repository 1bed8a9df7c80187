//! Rebuild loop for live preview.
//!
//! A [`Rebuilder`] owns one input/output pair and reruns the conversion on
//! request or whenever the input changes. Builds are strictly sequential:
//! each takes `&mut self`, so a build always finishes before the next
//! starts and only one writer ever targets the output path.

use std::ffi::OsStr;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use serde::Serialize;

use crate::convert::{convert_file_with_options, ConvertOptions};
use crate::error::Result;

/// Outcome of a single build, shaped for event-stream consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BuildEvent {
    /// The PDF was regenerated
    Built {
        /// Successful builds so far, including this one
        #[serde(rename = "buildCount")]
        build_count: u64,
        /// Path of the written PDF
        #[serde(rename = "outputPath")]
        output_path: PathBuf,
        /// Completion time
        timestamp: DateTime<Utc>,
    },
    /// The build failed; the previous output is untouched
    Error {
        /// Human-readable failure description
        message: String,
    },
}

impl BuildEvent {
    /// Check if this event reports a successful build.
    pub fn is_built(&self) -> bool {
        matches!(self, BuildEvent::Built { .. })
    }

    /// Encode as a server-sent events `data:` frame.
    pub fn to_sse(&self) -> crate::Result<String> {
        Ok(format!("data: {}\n\n", serde_json::to_string(self)?))
    }
}

/// Configuration for [`Rebuilder::watch`].
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Longest time the loop blocks waiting for file events
    pub poll_interval: Duration,
    /// Quiet period after the last change before rebuilding
    pub debounce: Duration,
    /// Set to `true` to make the loop return at its next wake-up
    pub stop: Option<Arc<AtomicBool>>,
}

impl WatchOptions {
    /// Create watch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the debounce delay.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Stop watching once `flag` becomes `true`.
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop = Some(flag);
        self
    }

    fn should_stop(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            debounce: Duration::from_millis(120),
            stop: None,
        }
    }
}

/// Directory holding `path`; the current directory for bare file names.
fn watch_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Whether a directory event changes the file named `name`.
fn touches(event: &Event, name: Option<&OsStr>) -> bool {
    let changed = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    changed
        && match name {
            Some(name) => event.paths.iter().any(|p| p.file_name() == Some(name)),
            None => true,
        }
}

/// Reruns a conversion for a fixed input and output.
#[derive(Debug)]
pub struct Rebuilder {
    input: PathBuf,
    output: PathBuf,
    options: ConvertOptions,
    build_count: u64,
    last_error: Option<String>,
}

impl Rebuilder {
    /// Create a rebuilder with default conversion options.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            options: ConvertOptions::default(),
            build_count: 0,
            last_error: None,
        }
    }

    /// Set conversion options.
    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    /// Watched Markdown file.
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Generated PDF file.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Number of successful builds.
    pub fn build_count(&self) -> u64 {
        self.build_count
    }

    /// Message of the most recent build if it failed.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Run one conversion.
    pub fn build(&mut self) -> BuildEvent {
        match convert_file_with_options(&self.input, &self.output, &self.options) {
            Ok(report) => {
                self.build_count += 1;
                self.last_error = None;
                BuildEvent::Built {
                    build_count: self.build_count,
                    output_path: report.output,
                    timestamp: Utc::now(),
                }
            }
            Err(e) => {
                let message = e.to_string();
                log::warn!("build failed: {}", message);
                self.last_error = Some(message.clone());
                BuildEvent::Error { message }
            }
        }
    }

    /// Build once, then rebuild whenever the input changes.
    ///
    /// The input's directory is watched and events for the input file
    /// schedule a build after the debounce delay; further changes within
    /// the window push the deadline back. Every build result is passed to
    /// `on_event`, and returning [`ControlFlow::Break`] stops the loop. The
    /// loop also returns once the stop flag is set.
    pub fn watch<F>(&mut self, options: WatchOptions, mut on_event: F) -> Result<()>
    where
        F: FnMut(&BuildEvent) -> ControlFlow<()>,
    {
        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.send(res);
        })?;
        let dir = watch_dir(&self.input).to_path_buf();
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        log::debug!("watching {} in {}", self.input.display(), dir.display());

        if on_event(&self.build()).is_break() {
            return Ok(());
        }

        let name = self.input.file_name().map(OsStr::to_os_string);
        let mut deadline: Option<Instant> = None;
        loop {
            if options.should_stop() {
                return Ok(());
            }

            let timeout = match deadline {
                Some(at) => at.saturating_duration_since(Instant::now()),
                None => options.poll_interval,
            };
            match rx.recv_timeout(timeout) {
                Ok(Ok(event)) => {
                    if touches(&event, name.as_deref()) {
                        deadline = Some(Instant::now() + options.debounce);
                    }
                }
                Ok(Err(e)) => log::warn!("watch error: {}", e),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return Ok(()),
            }

            if deadline.is_some_and(|at| Instant::now() >= at) {
                deadline = None;
                if on_event(&self.build()).is_break() {
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, ModifyKind};
    use std::fs;

    #[test]
    fn test_build_event_json_shape() {
        let event = BuildEvent::Error {
            message: "Input file not found: a.md".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"type":"error","message":"Input file not found: a.md"}"#
        );
        assert_eq!(
            event.to_sse().unwrap(),
            "data: {\"type\":\"error\",\"message\":\"Input file not found: a.md\"}\n\n"
        );
    }

    #[test]
    fn test_built_event_fields() {
        let event = BuildEvent::Built {
            build_count: 3,
            output_path: PathBuf::from("out.pdf"),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.starts_with(r#"{"type":"built","buildCount":3,"outputPath":"out.pdf""#));
        assert!(event.is_built());
    }

    #[test]
    fn test_watch_options_builder() {
        let options = WatchOptions::new()
            .with_poll_interval(Duration::from_millis(5))
            .with_debounce(Duration::ZERO);
        assert_eq!(options.poll_interval, Duration::from_millis(5));
        assert_eq!(options.debounce, Duration::ZERO);
        assert_eq!(WatchOptions::default().debounce, Duration::from_millis(120));
    }

    #[test]
    fn test_watch_dir_for_bare_file_name() {
        assert_eq!(watch_dir(Path::new("sample.md")), Path::new("."));
        assert_eq!(watch_dir(Path::new("docs/sample.md")), Path::new("docs"));
    }

    #[test]
    fn test_touches_filters_by_name_and_kind() {
        let name = Some(OsStr::new("doc.md"));
        let modify =
            Event::new(EventKind::Modify(ModifyKind::Any)).add_path(PathBuf::from("/tmp/x/doc.md"));
        assert!(touches(&modify, name));

        let other =
            Event::new(EventKind::Modify(ModifyKind::Any)).add_path(PathBuf::from("/tmp/x/doc.pdf"));
        assert!(!touches(&other, name));

        let read =
            Event::new(EventKind::Access(AccessKind::Any)).add_path(PathBuf::from("/tmp/x/doc.md"));
        assert!(!touches(&read, name));
    }

    #[test]
    fn test_failed_build_keeps_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.md");
        let output = dir.path().join("pdf").join("doc.pdf");
        fs::write(&input, "# First\n").unwrap();

        let mut rebuilder = Rebuilder::new(&input, &output);
        assert!(rebuilder.build().is_built());
        let first = fs::read(&output).unwrap();

        fs::remove_file(&input).unwrap();
        let event = rebuilder.build();
        assert!(matches!(event, BuildEvent::Error { .. }));
        assert!(rebuilder.last_error().unwrap().contains("not found"));
        assert_eq!(rebuilder.build_count(), 1);
        assert_eq!(fs::read(&output).unwrap(), first);
    }
}
