// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use polyframe_codegen::geometry::Segmentation;
use polyframe_codegen::{
    render, BezierCurve, Context, Cube, FacetPolicy, Geometry3D, Node, Sphere, Vec2, Vec3,
};

fn grid(count: usize) -> Geometry3D {
    Node::union((0..count).map(|i| {
        let x = (i % 10) as f64 * 12.0;
        let y = (i / 10) as f64 * 12.0;
        Node::difference([
            Geometry3D::from(Cube::new(Vec3::new(10.0, 10.0, 10.0), false).unwrap()),
            Geometry3D::from(Sphere::new(4.0).unwrap()).translated(Vec3::new(5.0, 5.0, 10.0)),
        ])
        .translated(Vec3::new(x, y, 0.0))
    }))
}

fn bench_subdivision(c: &mut Criterion) {
    let mut group = c.benchmark_group("subdivision");

    let curve = BezierCurve::new(vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(30.0, 80.0),
        Vec2::new(70.0, -80.0),
        Vec2::new(100.0, 0.0),
    ])
    .unwrap();

    for tolerance in [0.1, 0.01, 0.001] {
        group.bench_with_input(BenchmarkId::new("adaptive", tolerance), &tolerance, |b, &tolerance| {
            b.iter(|| curve.points(black_box(Segmentation::Adaptive { tolerance })))
        });
    }

    group.bench_function("fixed_64", |b| {
        b.iter(|| curve.points(black_box(Segmentation::Fixed(64))))
    });

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    let cube = Geometry3D::from(Cube::new(Vec3::new(10.0, 10.0, 10.0), false).unwrap());
    group.bench_function("cube", |b| b.iter(|| render(black_box(&cube)).unwrap()));

    let transformed = cube.clone().rotated(0.0, 45.0, 0.0).translated(Vec3::new(5.0, 0.0, 0.0));
    group.bench_function("transform", |b| {
        b.iter(|| render(black_box(&transformed)).unwrap())
    });

    let tree = grid(100);
    group.bench_function("grid_100", |b| b.iter(|| render(black_box(&tree)).unwrap()));

    group.finish();
}

fn bench_parallel_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_evaluation");

    let tree = grid(400);
    let ctx = Context::new().with_facets(FacetPolicy::Fixed { count: 64 });
    group.bench_function("sequential", |b| {
        b.iter(|| tree.evaluate(black_box(&ctx)).unwrap())
    });
    let parallel = ctx.with_parallel(true);
    group.bench_function("parallel", |b| {
        b.iter(|| tree.evaluate(black_box(&parallel)).unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_subdivision,
    bench_render,
    bench_parallel_evaluation
);
criterion_main!(benches);
