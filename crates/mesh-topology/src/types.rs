//! Core mesh data types.

use std::fmt;
use std::str::FromStr;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::error::{MeshError, MeshResult};

/// Kind of mesh container, following the JIGSAW `MSHID` naming.
///
/// Only [`MeshKind::EuclideanMesh`] carries planar triangles that the
/// topology operations understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeshKind {
    #[default]
    EuclideanMesh,
    EllipsoidMesh,
    EuclideanGrid,
    EllipsoidGrid,
}

impl MeshKind {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            MeshKind::EuclideanMesh => "euclidean-mesh",
            MeshKind::EllipsoidMesh => "ellipsoid-mesh",
            MeshKind::EuclideanGrid => "euclidean-grid",
            MeshKind::EllipsoidGrid => "ellipsoid-grid",
        }
    }
}

impl fmt::Display for MeshKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeshKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "euclidean-mesh" => Ok(MeshKind::EuclideanMesh),
            "ellipsoid-mesh" => Ok(MeshKind::EllipsoidMesh),
            "euclidean-grid" => Ok(MeshKind::EuclideanGrid),
            "ellipsoid-grid" => Ok(MeshKind::EllipsoidGrid),
            other => Err(format!("unknown mesh kind '{}'", other)),
        }
    }
}

/// A planar vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// 2D position.
    pub position: Point2<f64>,

    /// Identifier tag; assigned densely (1-based) when the mesh is finalized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<i32>,
}

impl Vertex {
    /// Create a new vertex with only position set.
    #[inline]
    pub fn new(position: Point2<f64>) -> Self {
        Self { position, tag: None }
    }

    /// Create a vertex from raw coordinates.
    #[inline]
    pub fn from_coords(x: f64, y: f64) -> Self {
        Self::new(Point2::new(x, y))
    }
}

/// A triangle element: three vertex indices plus an identifier tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle {
    pub indices: [u32; 3],
    #[serde(default)]
    pub tag: i32,
}

impl Triangle {
    #[inline]
    pub fn new(indices: [u32; 3]) -> Self {
        Self { indices, tag: 0 }
    }

    /// Whether any corner is one of `vertex`.
    #[inline]
    pub fn references(&self, vertex: u32) -> bool {
        self.indices.contains(&vertex)
    }

    /// The three edges as directed `(start, end)` pairs in winding order.
    #[inline]
    pub fn edges(&self) -> [(u32, u32); 3] {
        let [a, b, c] = self.indices;
        [(a, b), (b, c), (c, a)]
    }
}

/// A planar triangle mesh with an optional per-vertex scalar field.
///
/// `values` is either empty or exactly as long as `vertices`; every
/// operation in this crate that removes vertices keeps the two aligned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    #[serde(default)]
    pub kind: MeshKind,

    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangles as indices into the vertex array.
    pub triangles: Vec<Triangle>,

    /// Scalar field sampled at the vertices, or empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<f64>,
}

impl Mesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            kind: MeshKind::EuclideanMesh,
            vertices: Vec::new(),
            triangles: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            kind: MeshKind::EuclideanMesh,
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
            values: Vec::new(),
        }
    }

    /// Build a mesh from raw coordinates and index triples.
    pub fn from_raw(points: &[[f64; 2]], triangles: &[[u32; 3]]) -> Self {
        let mut mesh = Self::with_capacity(points.len(), triangles.len());
        mesh.vertices
            .extend(points.iter().map(|&[x, y]| Vertex::from_coords(x, y)));
        mesh.triangles
            .extend(triangles.iter().map(|&t| Triangle::new(t)));
        mesh
    }

    /// Append a vertex and return its index.
    pub fn add_vertex(&mut self, x: f64, y: f64) -> u32 {
        self.vertices.push(Vertex::from_coords(x, y));
        (self.vertices.len() - 1) as u32
    }

    /// Append a triangle and return its index.
    pub fn add_triangle(&mut self, indices: [u32; 3]) -> usize {
        self.triangles.push(Triangle::new(indices));
        self.triangles.len() - 1
    }

    /// Number of vertices in the mesh.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles in the mesh.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Check if mesh is empty (no vertices or triangles).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.triangles.is_empty()
    }

    /// Whether a scalar field is attached.
    #[inline]
    pub fn has_values(&self) -> bool {
        !self.values.is_empty()
    }

    /// Position of a vertex by index.
    #[inline]
    pub fn position(&self, vertex: u32) -> Point2<f64> {
        self.vertices[vertex as usize].position
    }

    /// Euclidean length of the edge between two vertices.
    #[inline]
    pub fn edge_length(&self, a: u32, b: u32) -> f64 {
        nalgebra::distance(&self.position(a), &self.position(b))
    }

    /// Compute the axis-aligned bounding box.
    /// Returns (min_corner, max_corner) or None if mesh is empty.
    pub fn bounds(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        let first = self.vertices.first()?.position;
        let mut min = first;
        let mut max = first;

        for vertex in &self.vertices[1..] {
            let p = &vertex.position;
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }

        Some((min, max))
    }

    /// Fail unless this mesh holds planar triangles.
    pub fn require_euclidean(&self) -> MeshResult<()> {
        match self.kind {
            MeshKind::EuclideanMesh => Ok(()),
            kind => Err(MeshError::UnsupportedTopology { kind }),
        }
    }

    /// Check index ranges and value alignment.
    ///
    /// Every operation that mutates the mesh calls this first so that bad
    /// input is rejected before anything is touched.
    pub fn check_topology(&self) -> MeshResult<()> {
        let n = self.vertices.len();
        for (t, triangle) in self.triangles.iter().enumerate() {
            if let Some(&v) = triangle.indices.iter().find(|&&v| v as usize >= n) {
                return Err(MeshError::InvalidTopology {
                    details: format!(
                        "triangle {} references vertex {} but mesh has {} vertices",
                        t, v, n
                    ),
                });
            }
        }

        if !self.values.is_empty() && self.values.len() != n {
            return Err(MeshError::InvalidTopology {
                details: format!(
                    "value array has {} entries for {} vertices",
                    self.values.len(),
                    n
                ),
            });
        }

        Ok(())
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
