//! Criterion benchmarks for structured_logger_system

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::io;
use std::sync::Arc;
use structured_logger_system::prelude::*;
use uuid::Uuid;

fn null_logger(verbosity: u8) -> Logger {
    Logger::builder()
        .writer(NullWriter)
        .verbosity(verbosity)
        .context_registry(Arc::new(ContextRegistry::new()))
        .build()
}

fn sample_fields() -> Fields {
    Fields::new()
        .with_field("id", "B8012423573231")
        .with_field("health", 97)
        .with_field("ratio", 0.75)
        .with_field("multi", "taking space")
        .with_field("request", Uuid::from_u128(0x67e5_5044_10b1_426f_9247_bb68_0e5f_e0c8))
}

// ============================================================================
// Message Builder Benchmarks
// ============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Elements(1));

    let logger = null_logger(1);

    group.bench_function("log", |b| {
        b.iter(|| logger.log(black_box("Info message")));
    });

    group.bench_function("with_fields", |b| {
        let fields = sample_fields();
        b.iter(|| logger.with(fields.clone()).log(black_box("Hello World")));
    });

    group.bench_function("gated", |b| {
        b.iter(|| logger.v(black_box(5)).log("never written"));
    });

    group.bench_function("without_source", |b| {
        b.iter(|| logger.message().without_source().log(black_box("no call site")));
    });

    group.finish();
}

// ============================================================================
// Rendering Benchmarks
// ============================================================================

fn bench_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("rendering");
    group.throughput(Throughput::Elements(1));

    let record = Record::new("Hello World")
        .with_verbosity(1)
        .with_error("yikes")
        .with_location(SourceLocation::new("app", "main.rs", 42))
        .with_fields(sample_fields());

    let text = TextWriter::new(io::sink());
    group.bench_function("text", |b| {
        b.iter(|| black_box(text.render(black_box(&record))));
    });

    let json = JsonWriter::new(io::sink());
    group.bench_function("json", |b| {
        b.iter(|| black_box(json.render(black_box(&record))));
    });

    let ecs = JsonWriter::new(io::sink()).ecs().with_host("bench");
    group.bench_function("json_ecs", |b| {
        b.iter(|| black_box(ecs.render(black_box(&record))));
    });

    group.finish();
}

// ============================================================================
// Encoding Benchmarks
// ============================================================================

fn bench_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoding");

    let values = [
        ("string", FieldValue::from("plain")),
        ("spaced_string", FieldValue::from("needs quoting here")),
        ("int", FieldValue::from(1_234_567i64)),
        ("float", FieldValue::from(1234.5678f64)),
        ("uuid", FieldValue::from(Uuid::from_u128(42))),
    ];

    for (name, value) in values.iter() {
        group.bench_function(*name, |b| {
            b.iter(|| black_box(value.encode()));
        });
    }

    group.finish();
}

// ============================================================================
// Context Registry Benchmarks
// ============================================================================

fn bench_context(c: &mut Criterion) {
    struct RequestId(u64);

    let mut group = c.benchmark_group("context");

    let registry = Arc::new(ContextRegistry::new());
    for _ in 0..4 {
        registry.register(|ctx, fields| {
            if let Some(id) = ctx.value::<RequestId>() {
                fields.insert("request_id", id.0);
            }
        });
    }

    let logger = Logger::builder()
        .writer(NullWriter)
        .context_registry(registry)
        .build();
    let ctx = Context::new().with_value(RequestId(7));

    group.bench_function("four_extractors", |b| {
        b.iter(|| logger.context(ctx.clone()).log(black_box("with context")));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_dispatch,
    bench_rendering,
    bench_encoding,
    bench_context
);
criterion_main!(benches);
