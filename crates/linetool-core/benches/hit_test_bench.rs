// File: crates/linetool-core/benches/hit_test_bench.rs
// Purpose: Micro-benchmarks for the geometry kernel paths hit-testing leans on.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use linetool_core::geometry::{
    distance_to_segment, intersect_line_segment_and_box, line_segment, point_in_polygon, Box2, Point,
};

fn build_stroke(n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let t = i as f64 * 0.05;
            Point::new(i as f64, (t.sin() * 40.0) + 100.0)
        })
        .collect()
}

fn bench_stroke_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("stroke_distance");
    for &n in &[100usize, 1_000usize] {
        let stroke = build_stroke(n);
        let target = Point::new(n as f64 / 2.0, 60.0);
        group.bench_function(format!("points_{n}"), |b| {
            b.iter(|| {
                let mut best = f64::INFINITY;
                for pair in stroke.windows(2) {
                    best = best.min(distance_to_segment(pair[0], pair[1], target).distance);
                }
                black_box(best)
            });
        });
    }
    group.finish();
}

fn bench_polygon_containment(c: &mut Criterion) {
    let polygon = build_stroke(512);
    let target = Point::new(256.0, 100.0);
    c.bench_function("polygon_containment_512", |b| {
        b.iter(|| black_box(point_in_polygon(target, &polygon)))
    });
}

fn bench_segment_clip(c: &mut Criterion) {
    let viewport = Box2::new(Point::new(0.0, 0.0), Point::new(1024.0, 640.0));
    c.bench_function("segment_clip", |b| {
        b.iter(|| {
            let segment = line_segment(Point::new(-500.0, -200.0), Point::new(1500.0, 900.0));
            black_box(intersect_line_segment_and_box(segment, viewport))
        })
    });
}

criterion_group!(benches, bench_stroke_distance, bench_polygon_containment, bench_segment_clip);
criterion_main!(benches);
