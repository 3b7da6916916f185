//! Canonical JSON, table rendering and configuration parsing benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use skein_benchmarks::{create_job_documents, criterion_config};
use skein_config::toml::parse_skein_toml;
use skein_core::utils::{to_canonical_json, JsonStyle, Table};

/// Benchmark canonical JSON encoding
fn bench_canonical_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonical_json");
    group.measurement_time(std::time::Duration::from_secs(5));

    for step_count in [10, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*step_count as u64));

        let (_, workflow) = create_job_documents(*step_count);

        for style in [JsonStyle::Spaced, JsonStyle::Compact] {
            group.bench_with_input(
                BenchmarkId::new(style.as_str(), step_count),
                &workflow,
                |b, workflow| {
                    b.iter(|| black_box(to_canonical_json(workflow, style).unwrap()));
                },
            );
        }
    }

    group.finish();
}

/// Benchmark table rendering with and without a column filter
fn bench_table_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_render");
    group.measurement_time(std::time::Duration::from_secs(5));

    for row_count in [10, 100, 1000, 10_000].iter() {
        group.throughput(Throughput::Elements(*row_count as u64));

        let rows: Vec<Vec<String>> = (0..*row_count)
            .map(|i| {
                vec![
                    format!("workflow-{}", i),
                    (i % 97).to_string(),
                    if i % 3 == 0 { "finished" } else { "running" }.to_string(),
                    format!("2024-01-{:02}T10:00:00", i % 28 + 1),
                ]
            })
            .collect();
        let headers = ["name", "run_number", "status", "created"];

        group.bench_with_input(BenchmarkId::new("all_columns", row_count), &rows, |b, rows| {
            b.iter(|| black_box(Table::new(headers).rows(rows.iter()).render()));
        });

        group.bench_with_input(BenchmarkId::new("filtered", row_count), &rows, |b, rows| {
            b.iter(|| {
                black_box(Table::new(headers).filter(["STATUS", "name"]).rows(rows.iter()).render())
            });
        });
    }

    group.finish();
}

/// Benchmark skein.toml parsing
fn bench_skein_toml_parsing(c: &mut Criterion) {
    let content = r#"
[fingerprint]
algorithm = "sha256"
verbose = 1

[job]
json-style = "compact"

[table]
columns = ["name", "status", "created"]
"#;

    c.bench_function("skein_toml_parsing", |b| {
        b.iter(|| black_box(parse_skein_toml(content).unwrap()));
    });
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = bench_canonical_json, bench_table_render, bench_skein_toml_parsing
}
criterion_main!(benches);
