//! Benchmarks for mesh operations.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use hemesh::io::{from_json_str, to_json_string};
use hemesh::prelude::*;
use nalgebra::Point3;

fn grid_input(n: usize) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut faces = Vec::with_capacity(n * n * 2);

    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }

    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;

            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    (vertices, faces)
}

fn create_grid_mesh(n: usize) -> HalfEdgeMesh {
    let (vertices, faces) = grid_input(n);
    build_from_triangles(&vertices, &faces).unwrap()
}

/// Diagonals of every grid cell.
fn grid_diagonals(n: usize) -> Vec<(VertexId, VertexId)> {
    let mut diagonals = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v11 = v00 + n + 2;
            diagonals.push((VertexId::new(v00), VertexId::new(v11)));
        }
    }
    diagonals
}

fn bench_mesh_construction(c: &mut Criterion) {
    c.bench_function("build_grid_10x10", |b| {
        let (vertices, faces) = grid_input(10);
        b.iter(|| build_from_triangles(&vertices, &faces).unwrap());
    });
}

fn bench_mesh_traversal(c: &mut Criterion) {
    let mesh = create_grid_mesh(50);

    c.bench_function("faces_around_vertex_all", |b| {
        b.iter(|| {
            let mut count = 0;
            for v in mesh.vertex_ids() {
                count += mesh.faces_around_vertex(v).count();
            }
            count
        });
    });

    c.bench_function("neighbors_all", |b| {
        b.iter(|| {
            let mut count = 0;
            for v in mesh.vertex_ids() {
                count += mesh.neighbors(v).count();
            }
            count
        });
    });

    c.bench_function("validate_grid_50x50", |b| {
        b.iter(|| mesh.validate().is_ok());
    });
}

fn bench_local_operators(c: &mut Criterion) {
    let n = 20;
    let mesh = create_grid_mesh(n);
    let diagonals = grid_diagonals(n);

    c.bench_function("swap_all_diagonals_20x20", |b| {
        b.iter_batched(
            || mesh.clone(),
            |mut mesh| {
                let options = SwapOptions::default();
                for &edge in &diagonals {
                    black_box(swap_edge(&mut mesh, edge, &options).unwrap());
                }
                mesh
            },
            BatchSize::SmallInput,
        );
    });

    c.bench_function("split_all_diagonals_20x20", |b| {
        b.iter_batched(
            || mesh.clone(),
            |mut mesh| {
                let options = SplitOptions::default();
                for &(u, v) in &diagonals {
                    black_box(trimesh_split_edge(&mut mesh, u, v, &options).unwrap());
                }
                mesh
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_json(c: &mut Criterion) {
    let mesh = create_grid_mesh(30);
    let text = to_json_string(&mesh).unwrap();

    c.bench_function("json_write_30x30", |b| {
        b.iter(|| to_json_string(&mesh).unwrap());
    });

    c.bench_function("json_read_30x30", |b| {
        b.iter(|| from_json_str(&text).unwrap());
    });
}

criterion_group!(
    benches,
    bench_mesh_construction,
    bench_mesh_traversal,
    bench_local_operators,
    bench_json
);
criterion_main!(benches);
