//! Integration tests for the rebuild loop.

use std::fs;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use mdpdf::{BuildEvent, Rebuilder, WatchOptions};

/// Fast options that give up after `limit` so a missed event fails
/// the assertions instead of blocking forever.
fn fast_options(limit: Duration) -> WatchOptions {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    thread::spawn(move || {
        thread::sleep(limit);
        flag.store(true, Ordering::SeqCst);
    });
    WatchOptions::new()
        .with_poll_interval(Duration::from_millis(10))
        .with_debounce(Duration::from_millis(20))
        .with_stop_flag(stop)
}

#[test]
fn test_watch_runs_initial_build() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("doc.md");
    let output = dir.path().join("pdf").join("doc.pdf");
    fs::write(&input, "# Hello\n").unwrap();

    let mut events = Vec::new();
    let mut rebuilder = Rebuilder::new(&input, &output);
    rebuilder
        .watch(fast_options(Duration::from_secs(10)), |event| {
            events.push(event.clone());
            ControlFlow::Break(())
        })
        .unwrap();

    assert_eq!(events.len(), 1);
    match &events[0] {
        BuildEvent::Built {
            build_count,
            output_path,
            ..
        } => {
            assert_eq!(*build_count, 1);
            assert_eq!(output_path, &output);
        }
        other => panic!("expected build, got {:?}", other),
    }
    assert!(output.is_file());
}

#[test]
fn test_watch_rebuilds_on_change() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("doc.md");
    let output = dir.path().join("doc.pdf");
    fs::write(&input, "first").unwrap();

    let mut counts = Vec::new();
    let mut rebuilder = Rebuilder::new(&input, &output);
    rebuilder
        .watch(fast_options(Duration::from_secs(10)), |event| {
            if let BuildEvent::Built { build_count, .. } = event {
                counts.push(*build_count);
            }
            if counts.len() == 1 {
                fs::write(&input, "second, and longer").unwrap();
                ControlFlow::Continue(())
            } else {
                ControlFlow::Break(())
            }
        })
        .unwrap();

    assert_eq!(counts, vec![1, 2]);
    assert_eq!(rebuilder.build_count(), 2);
    let text = String::from_utf8(fs::read(&output).unwrap()).unwrap();
    assert!(text.contains("(second, and longer) Tj"));
}

#[test]
fn test_watch_rebuilds_same_size_edit_with_old_mtime() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("doc.md");
    let output = dir.path().join("doc.pdf");
    fs::write(&input, "aaaa").unwrap();
    let original_mtime = fs::metadata(&input).unwrap().modified().unwrap();

    let mut builds = 0;
    let mut rebuilder = Rebuilder::new(&input, &output);
    rebuilder
        .watch(fast_options(Duration::from_secs(10)), |event| {
            assert!(event.is_built());
            builds += 1;
            if builds == 1 {
                fs::write(&input, "bbbb").unwrap();
                let file = fs::File::options().write(true).open(&input).unwrap();
                file.set_modified(original_mtime).unwrap();
                ControlFlow::Continue(())
            } else {
                ControlFlow::Break(())
            }
        })
        .unwrap();

    assert_eq!(builds, 2);
    let text = String::from_utf8(fs::read(&output).unwrap()).unwrap();
    assert!(text.contains("(bbbb) Tj"));
}

#[test]
fn test_watch_returns_on_stop_without_changes() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("doc.md");
    let output = dir.path().join("doc.pdf");
    fs::write(&input, "idle").unwrap();

    let started = Instant::now();
    let mut events = 0;
    let mut rebuilder = Rebuilder::new(&input, &output);
    rebuilder
        .watch(fast_options(Duration::from_millis(100)), |_| {
            events += 1;
            ControlFlow::Continue(())
        })
        .unwrap();

    assert_eq!(events, 1);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_watch_recovers_after_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("doc.md");
    let output = dir.path().join("doc.pdf");

    let mut events = Vec::new();
    let mut rebuilder = Rebuilder::new(&input, &output);
    rebuilder
        .watch(fast_options(Duration::from_secs(10)), |event| {
            events.push(event.clone());
            if event.is_built() {
                return ControlFlow::Break(());
            }
            fs::write(&input, "now it exists").unwrap();
            ControlFlow::Continue(())
        })
        .unwrap();

    assert_eq!(events.len(), 2);
    match &events[0] {
        BuildEvent::Error { message } => assert!(message.starts_with("Input file not found")),
        other => panic!("expected error, got {:?}", other),
    }
    assert!(events[1].is_built());
    assert!(rebuilder.last_error().is_none());
}

#[test]
fn test_watch_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("absent").join("doc.md");
    let output = dir.path().join("doc.pdf");

    let mut rebuilder = Rebuilder::new(&input, &output);
    let result = rebuilder.watch(fast_options(Duration::from_secs(10)), |_| ControlFlow::Break(()));
    assert!(matches!(result, Err(mdpdf::Error::Watch(_))));
}
