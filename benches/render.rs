//! Renderer benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use neoscreen::{
    decode_batch, Dimensions, NullResolver, RecordingSurface, RedrawEvent, Renderer,
};
use serde_json::json;

fn renderer(dims: Dimensions) -> Renderer<RecordingSurface> {
    Renderer::new(dims, RecordingSurface::new(dims), Box::new(NullResolver))
}

fn bench_decode_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    let cells: Vec<_> = (0..80).map(|i| json!([format!("{}", i % 10)])).collect();
    let mut entry = vec![json!("put")];
    entry.extend(cells);
    let batch = serde_json::Value::Array(vec![
        json!(["cursor_goto", [0, 0]]),
        serde_json::Value::Array(entry),
    ]);

    group.bench_function("put_row", |b| {
        b.iter(|| {
            let events = decode_batch(black_box(&batch)).unwrap();
            black_box(events)
        })
    });

    group.finish();
}

fn bench_put_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    let dims = Dimensions::new(80, 24);
    let row: Vec<String> = (0..80).map(|i| format!("{}", i % 10)).collect();
    let events: Vec<RedrawEvent> = (0..24)
        .flat_map(|r| {
            [
                RedrawEvent::CursorGoto { row: r, col: 0 },
                RedrawEvent::Put(row.clone()),
            ]
        })
        .collect();
    group.throughput(Throughput::Elements((80 * 24) as u64));

    group.bench_function("fill_screen", |b| {
        b.iter(|| {
            let mut renderer = renderer(dims);
            renderer.apply_batch(black_box(&events));
            black_box(renderer)
        })
    });

    group.finish();
}

fn bench_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    let dims = Dimensions::new(80, 24);
    let events: Vec<RedrawEvent> = (0..100).map(|_| RedrawEvent::Scroll(1)).collect();

    group.bench_function("scroll_full_grid", |b| {
        b.iter(|| {
            let mut renderer = renderer(dims);
            renderer.apply_batch(black_box(&events));
            black_box(renderer)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_decode_batch, bench_put_rows, bench_scroll);
criterion_main!(benches);
