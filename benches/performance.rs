// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use facade_flatten::geometry::{Face, WorldTransforms};
use facade_flatten::io::{parse_obj, MeshCompactor};
use facade_flatten::{ClaimLedger, FaceIterator, PhotogrammetryCloud, VertexClaimFilter};
use nalgebra::{Point3, Vector3};
use std::fmt::Write;

/// A `size` x `size` grid of quads on Z = 0 with a slight ripple
fn grid_obj(size: usize) -> String {
    let mut obj = String::new();
    for y in 0..=size {
        for x in 0..=size {
            let z = 0.01 * ((x + y) % 3) as f64;
            writeln!(obj, "v {} {} {}", x, y, z).unwrap();
        }
    }
    let row = size + 1;
    for y in 0..size {
        if y % 4 == 0 {
            writeln!(obj, "usemtl band{}", y / 4).unwrap();
        }
        for x in 0..size {
            let a = y * row + x + 1;
            writeln!(obj, "f {} {} {} {}", a, a + 1, a + row + 1, a + row).unwrap();
        }
    }
    obj
}

/// Building faces tiling the grid in `tiles` x `tiles` squares
fn building_faces(size: usize, tiles: usize) -> Vec<Face> {
    let step = size as f64 / tiles as f64;
    let mut faces = Vec::with_capacity(tiles * tiles);
    for ty in 0..tiles {
        for tx in 0..tiles {
            let (x0, y0) = (tx as f64 * step, ty as f64 * step);
            faces.push(Face::from_vertices(vec![
                Point3::new(x0, y0, 0.0),
                Point3::new(x0, y0 + step, 0.0),
                Point3::new(x0 + step, y0 + step, 0.0),
                Point3::new(x0 + step, y0, 0.0),
            ]));
        }
    }
    faces
}

fn bench_face_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("face_loop");

    for size in [32, 128] {
        let document = parse_obj(&grid_obj(size)).unwrap();
        let positions = document.vertex_positions();
        let normals = vec![Vector3::new(0.0, 0.0, -1.0); positions.len()];
        let cloud = PhotogrammetryCloud::new(positions, normals).unwrap();
        let faces = building_faces(size, 8);
        let iterator =
            FaceIterator::new(&cloud, WorldTransforms::identity(), VertexClaimFilter::default());

        group.bench_with_input(BenchmarkId::new("grid", size), &faces, |b, faces| {
            b.iter(|| {
                let mut ledger = ClaimLedger::new(cloud.len());
                iterator.run(black_box(faces), &mut ledger).unwrap()
            });
        });
    }

    group.finish();
}

fn bench_compaction(c: &mut Criterion) {
    let mut group = c.benchmark_group("compaction");

    for size in [32, 128] {
        let document = parse_obj(&grid_obj(size)).unwrap();
        let mut ledger = ClaimLedger::new(document.vertex_count());
        let half: Vec<usize> = (0..document.vertex_count()).filter(|i| i % 2 == 0).collect();
        ledger.claim(&half);

        group.bench_with_input(BenchmarkId::new("grid", size), &document, |b, document| {
            b.iter(|| {
                MeshCompactor::new()
                    .compact(black_box(document), &ledger)
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let source = grid_obj(128);
    c.bench_function("parse_obj_grid_128", |b| {
        b.iter(|| parse_obj(black_box(&source)).unwrap())
    });
}

criterion_group!(benches, bench_face_loop, bench_compaction, bench_parse);
criterion_main!(benches);
