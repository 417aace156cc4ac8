//! Criterion benchmarks for program loading and drawing.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use panelview_wasm::codec;
use panelview_wasm::geometry::{self, DrawOptions};

fn load_bench(c: &mut Criterion) {
    let xml = include_str!("../tests/fixtures/minimal/panel.xml");
    let mut group = c.benchmark_group("panel");

    group.bench_function("parse_document", |b| {
        b.iter(|| black_box(codec::parse_document(black_box(xml))))
    });

    let doc = codec::parse_document(xml).unwrap_or_default();
    let options = DrawOptions::default();
    group.bench_function("draw_panel", |b| {
        b.iter(|| black_box(geometry::draw_panel(black_box(&doc.panel), &doc.operations, &options)))
    });

    group.bench_function("write_document", |b| {
        b.iter(|| black_box(codec::write_document(black_box(&doc.panel), &doc.operations)))
    });

    group.finish();
}

criterion_group!(benches, load_bench);
criterion_main!(benches);
