//! Concurrent use of one backend from several threads.
//!
//! Handles are cheap to clone and share their backend, so threads can work
//! on the same tree. Each single backend call is atomic for the in-memory
//! backend; these tests check that nothing is lost or duplicated when calls
//! interleave.

use std::sync::Arc;
use std::thread;

use filehandle::blocking::Handle;
use filehandle::{MemoryBackend, OsBackend};
use tempfile::TempDir;

const THREADS: usize = 8;
const PER_THREAD: usize = 25;

#[test]
fn test_parallel_writers_on_distinct_files() {
    let fs = Arc::new(MemoryBackend::new());
    let root = Handle::new("/work", fs.clone());
    assert!(root.mkdir(false));

    let workers: Vec<_> = (0..THREADS)
        .map(|t| {
            let root = root.clone();
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    assert!(root.child(&format!("t{t}-{i:02}")).write(format!("{t}:{i}")));
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let names = root.list_names().unwrap();
    assert_eq!(names.len(), THREADS * PER_THREAD);
    assert_eq!(root.child("t3-07").read_text().as_deref(), Some("3:7"));
}

#[test]
fn test_parallel_appends_are_not_lost() {
    let fs = Arc::new(MemoryBackend::new());
    let log = Handle::new("/var/log/app.log", fs);
    assert!(log.parent().unwrap().mkdir(true));
    assert!(log.touch());

    let workers: Vec<_> = (0..THREADS)
        .map(|t| {
            let log = log.clone();
            thread::spawn(move || {
                for _ in 0..PER_THREAD {
                    assert!(log.append(format!("{t}\n")));
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let text = log.read_text().unwrap();
    assert_eq!(text.lines().count(), THREADS * PER_THREAD);
    for t in 0..THREADS {
        let expected = t.to_string();
        assert_eq!(text.lines().filter(|l| *l == expected).count(), PER_THREAD);
    }
}

#[test]
fn test_competing_deletes_succeed_once() {
    let fs = Arc::new(MemoryBackend::new());
    for i in 0..PER_THREAD {
        fs.insert_file(&format!("/shared/f{i}"), "x").unwrap();
    }
    let shared = Handle::new("/shared", fs.clone());

    let workers: Vec<_> = (0..THREADS)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                (0..PER_THREAD)
                    .filter(|i| shared.child(&format!("f{i}")).delete(false))
                    .count()
            })
        })
        .collect();
    let total: usize = workers.into_iter().map(|w| w.join().unwrap()).sum();

    assert_eq!(total, PER_THREAD);
    assert_eq!(shared.is_empty(), Some(true));
}

#[test]
fn test_walk_during_writes_on_disk() {
    let dir = TempDir::new().unwrap();
    let root = Handle::new(&dir.path().to_string_lossy(), Arc::new(OsBackend::new()));

    let writer = {
        let root = root.clone();
        thread::spawn(move || {
            for i in 0..PER_THREAD {
                assert!(root.child(&format!("file-{i:02}")).write("data"));
            }
        })
    };
    // A walk racing the writer sees some of the files and never fails.
    let seen = root.walk().count();
    writer.join().unwrap();

    assert!(seen >= 1);
    assert_eq!(root.walk().count(), PER_THREAD + 1);
}
