//! Small planar meshes shared by the unit tests.
//!
//! Grids alternate their cell diagonals so every corner ends up with at
//! least three neighbors for even `n`, which keeps them stable under the
//! sieve's low-degree cleanup.

use crate::Mesh;

/// Unit-cell grid covering `[0, n] x [0, n]`, counter-clockwise triangles.
pub fn square_grid(n: u32) -> Mesh {
    grid_without_cells(n, &[])
}

/// [`square_grid`] with the listed `(column, row)` cells left out.
pub fn grid_without_cells(n: u32, skip: &[(u32, u32)]) -> Mesh {
    let mut mesh = Mesh::new();
    for j in 0..=n {
        for i in 0..=n {
            mesh.add_vertex(i as f64, j as f64);
        }
    }

    let idx = |i: u32, j: u32| j * (n + 1) + i;
    for cj in 0..n {
        for ci in 0..n {
            if skip.contains(&(ci, cj)) {
                continue;
            }
            let a = idx(ci, cj);
            let b = idx(ci + 1, cj);
            let c = idx(ci + 1, cj + 1);
            let d = idx(ci, cj + 1);
            if (ci + cj) % 2 == 0 {
                mesh.add_triangle([a, b, c]);
                mesh.add_triangle([a, c, d]);
            } else {
                mesh.add_triangle([a, b, d]);
                mesh.add_triangle([b, c, d]);
            }
        }
    }
    mesh
}

/// 4x4 block with the central 2x2 block removed: area 12, one hole.
pub fn annulus() -> Mesh {
    grid_without_cells(4, &[(1, 1), (2, 1), (1, 2), (2, 2)])
}

/// 4x4 block with two holes that touch at vertex (2, 2).
pub fn pinched_holes() -> Mesh {
    grid_without_cells(4, &[(1, 1), (2, 2)])
}

/// Shift every vertex by `(dx, dy)`.
pub fn translated(mut mesh: Mesh, dx: f64, dy: f64) -> Mesh {
    for v in &mut mesh.vertices {
        v.position.x += dx;
        v.position.y += dy;
    }
    mesh
}

/// Append `other` to `mesh`, offsetting its indices.
pub fn append(mesh: &mut Mesh, other: &Mesh) {
    let base = mesh.vertices.len() as u32;
    mesh.vertices.extend(other.vertices.iter().cloned());
    for t in &other.triangles {
        mesh.add_triangle(t.indices.map(|v| v + base));
    }
}

/// Add a detached triangle of area 0.5 at (10, 10).
pub fn with_fragment(mut mesh: Mesh) -> Mesh {
    let a = mesh.add_vertex(10.0, 10.0);
    let b = mesh.add_vertex(11.0, 10.0);
    let c = mesh.add_vertex(10.0, 11.0);
    mesh.add_triangle([a, b, c]);
    mesh
}

/// 12x12 block with the inner 10x10 cells removed: exterior 144, area 44.
pub fn lake_shore() -> Mesh {
    let lake: Vec<(u32, u32)> = (1..11)
        .flat_map(|j| (1..11).map(move |i| (i, j)))
        .collect();
    grid_without_cells(12, &lake)
}

/// [`lake_shore`] with a separate 8x8 island of area 64 inside the lake.
pub fn island_in_lake() -> Mesh {
    let mut mesh = lake_shore();
    append(&mut mesh, &translated(square_grid(8), 2.0, 2.0));
    mesh
}
