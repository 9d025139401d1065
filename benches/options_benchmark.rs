//! Performance benchmarks for option validation and argv construction
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use poppler_mcp_server::options::{build, validate, Operation, OptionMap, Positional};
use poppler_mcp_server::Poppler;
use serde_json::json;
use std::path::PathBuf;

fn cairo_options() -> OptionMap {
    json!({
        "pngFile": true,
        "singleFile": true,
        "firstPageToConvert": 1,
        "lastPageToConvert": 4,
        "resolutionXYAxis": 150,
        "scalePageTo": 1024,
        "antialias": "gray",
        "transparentPageColor": false,
        "userPassword": "secret",
    })
    .as_object()
    .cloned()
    .unwrap_or_default()
}

/// Benchmark validation of a valid map and of one full of violations
fn bench_validation(c: &mut Criterion) {
    let schema = Operation::PdfToCairo.schema();
    let valid = cairo_options();
    let invalid: OptionMap = json!({
        "wordFile": "x",
        "pngFile": "yes",
        "firstPageToConvert": "1",
        "singleFile": 0,
    })
    .as_object()
    .cloned()
    .unwrap_or_default();

    let mut group = c.benchmark_group("validation");
    group.throughput(Throughput::Elements(valid.len() as u64));

    group.bench_function("pdftocairo_valid", |b| {
        b.iter(|| validate(black_box(schema), black_box(&valid)).is_ok());
    });

    group.bench_function("pdftocairo_violations", |b| {
        b.iter(|| validate(black_box(schema), black_box(&invalid)).is_err());
    });

    group.finish();
}

/// Benchmark argv construction for an already validated map
fn bench_build(c: &mut Criterion) {
    let schema = Operation::PdfToCairo.schema();
    let map = cairo_options();
    let Ok(validated) = validate(schema, &map) else {
        return;
    };

    c.bench_function("build_pdftocairo", |b| {
        b.iter(|| {
            build(
                black_box(schema),
                PathBuf::from("/usr/bin/pdftocairo"),
                vec![Positional::Input(b"%PDF-1.4".to_vec().into())],
                None,
                &validated,
            )
        });
    });
}

/// Benchmark the whole usage pipeline for every operation
fn bench_invocation(c: &mut Criterion) {
    let Ok(poppler) = Poppler::new(Some(PathBuf::from("/usr/bin"))) else {
        return;
    };
    let options = OptionMap::new();

    let mut group = c.benchmark_group("invocation");
    for operation in Operation::ALL {
        let positionals = match operation {
            Operation::PdfAttach => vec![
                Positional::Input("in.pdf".into()),
                Positional::File(PathBuf::from("notes.txt")),
            ],
            Operation::PdfUnite => vec![
                Positional::Input("a.pdf".into()),
                Positional::Input("b.pdf".into()),
            ],
            _ => vec![Positional::Input("in.pdf".into())],
        };

        group.bench_with_input(
            BenchmarkId::from_parameter(operation),
            &positionals,
            |b, positionals| {
                b.iter(|| {
                    poppler.invocation(operation, positionals.clone(), Some("out"), &options)
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_validation, bench_build, bench_invocation);
criterion_main!(benches);
