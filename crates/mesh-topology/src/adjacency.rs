//! Mesh topology queries via adjacency structures.

use hashbrown::HashMap;

use crate::Triangle;

/// Sentinel-free triangle neighbor table: `neighbors[t][j]` is the triangle
/// across edge `j` (from corner `j` to corner `j + 1`) of triangle `t`.
pub type TriangleNeighbors = Vec<[Option<u32>; 3]>;

/// Lightweight topology structure for mesh queries.
///
/// Provides vertex-vertex, vertex-to-face and edge-to-face lookups without
/// the overhead of a full half-edge data structure. Built from scratch on
/// demand; any mutation of the mesh invalidates it.
#[derive(Debug, Clone, Default)]
pub struct MeshAdjacency {
    /// Maps vertex index → list of face indices that use this vertex.
    pub vertex_to_faces: HashMap<u32, Vec<u32>>,

    /// Maps edge (min_idx, max_idx) → list of face indices that share this edge.
    /// Edge key is always (smaller_index, larger_index) for canonical ordering.
    pub edge_to_faces: HashMap<(u32, u32), Vec<u32>>,

    /// Maps vertex index → sorted, de-duplicated neighbor vertices.
    pub vertex_neighbors: HashMap<u32, Vec<u32>>,
}

#[inline]
fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

impl MeshAdjacency {
    /// Build adjacency structures from a triangle list.
    pub fn build(triangles: &[Triangle]) -> Self {
        let mut vertex_to_faces: HashMap<u32, Vec<u32>> = HashMap::new();
        let mut edge_to_faces: HashMap<(u32, u32), Vec<u32>> = HashMap::new();
        let mut vertex_neighbors: HashMap<u32, Vec<u32>> = HashMap::new();

        for (face_idx, triangle) in triangles.iter().enumerate() {
            let face_idx = face_idx as u32;
            let corners = triangle.indices;

            for &v in &corners {
                vertex_to_faces.entry(v).or_default().push(face_idx);
            }

            // Every ordered pair of distinct corners, both directions
            for &a in &corners {
                for &b in &corners {
                    if a != b {
                        vertex_neighbors.entry(a).or_default().push(b);
                    }
                }
            }

            for (a, b) in triangle.edges() {
                edge_to_faces.entry(edge_key(a, b)).or_default().push(face_idx);
            }
        }

        for neighbors in vertex_neighbors.values_mut() {
            neighbors.sort_unstable();
            neighbors.dedup();
        }

        Self {
            vertex_to_faces,
            edge_to_faces,
            vertex_neighbors,
        }
    }

    /// For each triangle, the triangle across each of its three edges.
    ///
    /// When an edge is shared by more than two faces, the first other face
    /// in build order is reported.
    pub fn triangle_neighbors(&self, triangles: &[Triangle]) -> TriangleNeighbors {
        triangles
            .iter()
            .enumerate()
            .map(|(face_idx, triangle)| {
                let face_idx = face_idx as u32;
                triangle.edges().map(|(a, b)| {
                    self.faces_for_edge(a, b)
                        .and_then(|faces| faces.iter().copied().find(|&f| f != face_idx))
                })
            })
            .collect()
    }

    /// Directed boundary edges in triangle order.
    ///
    /// An edge is a boundary edge when no other triangle lies across it; its
    /// direction follows the winding of the single triangle that owns it.
    pub fn directed_boundary_edges(&self, triangles: &[Triangle]) -> Vec<(u32, u32)> {
        let neighbors = self.triangle_neighbors(triangles);
        let mut edges = Vec::new();
        for (triangle, across) in triangles.iter().zip(&neighbors) {
            for (edge, neighbor) in triangle.edges().into_iter().zip(across) {
                if neighbor.is_none() {
                    edges.push(edge);
                }
            }
        }
        edges
    }

    /// Count boundary edges.
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_to_faces
            .values()
            .filter(|faces| faces.len() == 1)
            .count()
    }

    /// Count non-manifold edges.
    pub fn non_manifold_edge_count(&self) -> usize {
        self.edge_to_faces
            .values()
            .filter(|faces| faces.len() > 2)
            .count()
    }

    /// Get faces adjacent to a vertex.
    pub fn faces_for_vertex(&self, vertex_idx: u32) -> Option<&[u32]> {
        self.vertex_to_faces.get(&vertex_idx).map(|v| v.as_slice())
    }

    /// Get faces adjacent to an edge.
    /// The edge is automatically canonicalized (min, max).
    pub fn faces_for_edge(&self, v0: u32, v1: u32) -> Option<&[u32]> {
        self.edge_to_faces.get(&edge_key(v0, v1)).map(|v| v.as_slice())
    }

    /// Vertices sharing a triangle with `vertex_idx`, sorted.
    pub fn neighbors(&self, vertex_idx: u32) -> &[u32] {
        self.vertex_neighbors
            .get(&vertex_idx)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Number of distinct neighbors; zero for vertices no triangle uses.
    #[inline]
    pub fn degree(&self, vertex_idx: u32) -> usize {
        self.neighbors(vertex_idx).len()
    }
}
