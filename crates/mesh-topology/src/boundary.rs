//! Boundary ring extraction.
//!
//! Boundary edges (edges owned by a single triangle) are chained head to
//! tail into rings. Chaining is a pure function over an edge list so it can
//! be exercised without a mesh.

use std::collections::{BTreeSet, VecDeque};

use hashbrown::HashMap;
use nalgebra::Point2;
use tracing::debug;

use crate::adjacency::MeshAdjacency;
use crate::geometry::signed_polygon_area;
use crate::{Mesh, Vertex};

/// A cyclically ordered loop of directed boundary edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    edges: Vec<(u32, u32)>,
}

impl Ring {
    /// Wrap an already ordered edge chain.
    pub fn from_edges(edges: Vec<(u32, u32)>) -> Self {
        Self { edges }
    }

    /// Directed edges in chain order.
    #[inline]
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    /// Number of edges.
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Start vertex of each edge, i.e. the ring's vertex sequence.
    pub fn vertices(&self) -> impl Iterator<Item = u32> + '_ {
        self.edges.iter().map(|&(a, _)| a)
    }

    /// First vertex of the chain; used as the containment test point.
    #[inline]
    pub fn first_vertex(&self) -> Option<u32> {
        self.edges.first().map(|&(a, _)| a)
    }

    /// Whether the last edge ends where the first begins and every edge
    /// starts where the previous one ended.
    pub fn is_closed(&self) -> bool {
        match (self.edges.first(), self.edges.last()) {
            (Some(first), Some(last)) => {
                last.1 == first.0 && self.edges.windows(2).all(|w| w[0].1 == w[1].0)
            }
            _ => false,
        }
    }

    /// Vertex positions in ring order.
    ///
    /// # Panics
    ///
    /// Panics if the ring references a vertex outside `vertices`.
    pub fn points(&self, vertices: &[Vertex]) -> Vec<Point2<f64>> {
        self.vertices().map(|v| vertices[v as usize].position).collect()
    }

    /// Shoelace area of the ring's vertex polygon. Same precondition as
    /// [`Ring::points`].
    pub fn signed_area(&self, vertices: &[Vertex]) -> f64 {
        signed_polygon_area(&self.points(vertices))
    }

    #[inline]
    pub fn area(&self, vertices: &[Vertex]) -> f64 {
        self.signed_area(vertices).abs()
    }
}

/// Extract every boundary ring of a mesh.
///
/// A mesh without boundary edges (closed surface or empty) yields no rings.
pub fn extract_rings(mesh: &Mesh) -> Vec<Ring> {
    let adjacency = MeshAdjacency::build(&mesh.triangles);
    let edges = adjacency.directed_boundary_edges(&mesh.triangles);
    debug!("Found {} boundary edges", edges.len());

    let rings = chain_edges(&edges);
    debug!("Chained boundary edges into {} rings", rings.len());
    rings
}

/// Unused edge indices keyed by vertex, lowest index first.
struct EdgeIndex {
    by_vertex: HashMap<u32, BTreeSet<usize>>,
}

impl EdgeIndex {
    fn new(keys: impl Iterator<Item = u32>) -> Self {
        let mut by_vertex: HashMap<u32, BTreeSet<usize>> = HashMap::new();
        for (idx, v) in keys.enumerate() {
            by_vertex.entry(v).or_default().insert(idx);
        }
        Self { by_vertex }
    }

    fn first(&self, v: u32) -> Option<usize> {
        self.by_vertex.get(&v).and_then(|set| set.iter().next().copied())
    }

    fn remove(&mut self, v: u32, idx: usize) {
        if let Some(set) = self.by_vertex.get_mut(&v) {
            set.remove(&idx);
        }
    }
}

/// Edge pool consumed destructively while chaining.
struct EdgePool<'a> {
    edges: &'a [(u32, u32)],
    starts: EdgeIndex,
    ends: EdgeIndex,
    used: Vec<bool>,
    remaining: usize,
    cursor: usize,
}

impl<'a> EdgePool<'a> {
    fn new(edges: &'a [(u32, u32)]) -> Self {
        Self {
            edges,
            starts: EdgeIndex::new(edges.iter().map(|&(a, _)| a)),
            ends: EdgeIndex::new(edges.iter().map(|&(_, b)| b)),
            used: vec![false; edges.len()],
            remaining: edges.len(),
            cursor: edges.len(),
        }
    }

    fn take(&mut self, idx: usize) -> (u32, u32) {
        let edge = self.edges[idx];
        self.used[idx] = true;
        self.remaining -= 1;
        self.starts.remove(edge.0, idx);
        self.ends.remove(edge.1, idx);
        edge
    }

    /// Highest-index unused edge.
    fn take_last(&mut self) -> Option<(u32, u32)> {
        while self.cursor > 0 {
            self.cursor -= 1;
            if !self.used[self.cursor] {
                return Some(self.take(self.cursor));
            }
        }
        None
    }
}

/// Chain directed edges into rings.
///
/// Each chain starts from the last unused edge. It then grows by the
/// lowest-index unused edge that fits, trying in turn: an edge starting at
/// the tail, an edge ending at the head, a reversed edge ending at the
/// tail, a reversed edge starting at the head. When nothing fits the chain
/// is emitted and the next one starts.
pub fn chain_edges(edges: &[(u32, u32)]) -> Vec<Ring> {
    let mut rings = Vec::new();
    let mut pool = EdgePool::new(edges);

    while let Some(seed) = pool.take_last() {
        let mut chain = VecDeque::from([seed]);
        let (mut head, mut tail) = seed;

        while pool.remaining > 0 {
            if let Some(idx) = pool.starts.first(tail) {
                let edge = pool.take(idx);
                tail = edge.1;
                chain.push_back(edge);
            } else if let Some(idx) = pool.ends.first(head) {
                let edge = pool.take(idx);
                head = edge.0;
                chain.push_front(edge);
            } else if let Some(idx) = pool.ends.first(tail) {
                let (a, b) = pool.take(idx);
                tail = a;
                chain.push_back((b, a));
            } else if let Some(idx) = pool.starts.first(head) {
                let (a, b) = pool.take(idx);
                head = b;
                chain.push_front((b, a));
            } else {
                break;
            }
        }

        rings.push(Ring::from_edges(chain.into()));
    }

    rings
}
