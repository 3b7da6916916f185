//! Common utilities for benchmarks

use criterion::Criterion;
use pprof::criterion::{Output, PProfProfiler};
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;

/// Configure criterion with flamegraph profiling support
pub fn criterion_config() -> Criterion {
    Criterion::default()
        .warm_up_time(std::time::Duration::from_secs(3))
        .measurement_time(std::time::Duration::from_secs(10))
        .sample_size(100)
        .with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)))
}

/// Deterministic file content of the given size
pub fn create_test_content(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}

/// A temporary tree with `file_count` files split across two levels
pub fn create_test_directory(file_count: usize, file_size: usize) -> TempDir {
    let temp_dir = tempfile::tempdir().unwrap();
    let nested = temp_dir.path().join("nested");
    std::fs::create_dir(&nested).unwrap();

    for i in 0..file_count {
        let parent: &Path = if i % 2 == 0 { temp_dir.path() } else { &nested };
        std::fs::write(parent.join(format!("file_{}.dat", i)), create_test_content(file_size)).unwrap();
    }

    temp_dir
}

/// A job specification and workflow descriptor with `step_count` steps
pub fn create_job_documents(step_count: usize) -> (Value, Value) {
    let job = json!({
        "image": "docker.io/library/python:3.12",
        "cmd": "python fit.py --events 100000",
        "env": { "SEED": "42", "LANG": "C.UTF-8" },
    });

    let steps: Vec<Value> = (0..step_count)
        .map(|i| {
            json!({
                "name": format!("step-{}", i),
                "commands": [format!("run --shard {}", i)],
                "environment": "python:3.12",
                "weight": i as f64 / 10.0,
            })
        })
        .collect();
    let workflow = json!({ "version": "0.9", "type": "serial", "steps": steps });

    (job, workflow)
}
