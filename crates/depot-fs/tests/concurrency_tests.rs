//! Concurrent access tests for the no-clobber writer
//!
//! Verifies that `write_new` publishes exactly one winner when several
//! threads race for the same destination.

use depot_fs::{Error, NormalizedPath, RobustnessConfig, io};
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::tempdir;

#[test]
fn test_concurrent_write_new_has_single_winner() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("contested.bin");
    let path = Arc::new(NormalizedPath::new(&file_path));

    let num_threads = 8;
    let barrier = Arc::new(Barrier::new(num_threads));

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let path = Arc::clone(&path);
            let barrier = Arc::clone(&barrier);

            thread::spawn(move || {
                barrier.wait();
                let content = format!("thread{}", thread_id);
                io::write_new(&path, content.as_bytes(), RobustnessConfig { enable_fsync: false })
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("Thread should not panic"))
        .collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one writer may publish");
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, Error::AlreadyExists { .. }))
    );

    let content = std::fs::read_to_string(&file_path).unwrap();
    assert!(content.starts_with("thread"));
    assert_eq!(content.matches("thread").count(), 1, "no interleaving");
}

#[test]
fn test_concurrent_writes_to_different_files_all_succeed() {
    let dir = tempdir().unwrap();
    let num_threads = 5;
    let barrier = Arc::new(Barrier::new(num_threads));

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let dir_path = dir.path().to_path_buf();
            let barrier = Arc::clone(&barrier);

            thread::spawn(move || {
                barrier.wait();
                let path = NormalizedPath::new(dir_path.join(format!("file_{}", thread_id)));
                io::write_new(&path, format!("content_{}", thread_id).as_bytes(), RobustnessConfig::default())
                    .is_ok()
            })
        })
        .collect();

    for (thread_id, handle) in handles.into_iter().enumerate() {
        assert!(
            handle.join().expect("Thread should not panic"),
            "Write from thread {} should succeed",
            thread_id
        );
    }
}
