//! Mesh validation and reporting.

use nalgebra::Point2;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::adjacency::MeshAdjacency;
use crate::classify::polygon_regions;
use crate::error::MeshResult;
use crate::limgrad::max_edge_gradient;
use crate::pinch::pinched_nodes_in;
use crate::{Mesh, MeshKind};

/// Validation report for a mesh.
#[derive(Debug, Clone, Serialize)]
pub struct MeshReport {
    pub kind: MeshKind,

    /// Total vertex count.
    pub vertex_count: usize,

    /// Total triangle count.
    pub triangle_count: usize,

    /// Vertices no triangle references.
    pub isolated_vertex_count: usize,

    /// Number of boundary edges (edges with 1 adjacent triangle).
    pub boundary_edge_count: usize,

    /// Number of non-manifold edges (edges with >2 adjacent triangles).
    pub non_manifold_edge_count: usize,

    /// Boundary rings over all regions.
    pub ring_count: usize,

    /// Polygon regions (connected subdomains).
    pub region_count: usize,

    /// Interior rings over all regions.
    pub hole_count: usize,

    /// Vertices shared between hole boundaries.
    pub pinched_node_count: usize,

    /// Net area of each region, in classification order.
    pub region_areas: Vec<f64>,

    /// Bounding box as (min_corner, max_corner).
    pub bounds: Option<(Point2<f64>, Point2<f64>)>,

    /// Range of the scalar field, when present.
    pub value_range: Option<(f64, f64)>,

    /// Steepest slope of the scalar field along an edge.
    pub max_gradient: Option<f64>,
}

impl MeshReport {
    /// Check if mesh passes basic validity checks.
    pub fn is_valid(&self) -> bool {
        self.vertex_count > 0 && self.triangle_count > 0
    }

    /// A single region, no touching holes, no isolated vertices.
    pub fn is_clean(&self) -> bool {
        self.is_valid()
            && self.region_count == 1
            && self.pinched_node_count == 0
            && self.isolated_vertex_count == 0
    }
}

impl std::fmt::Display for MeshReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Mesh Report ({}):", self.kind)?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Triangles: {}", self.triangle_count)?;

        if let Some((min, max)) = &self.bounds {
            writeln!(
                f,
                "  Bounds: [{:.3}, {:.3}] to [{:.3}, {:.3}]",
                min.x, min.y, max.x, max.y
            )?;
        }

        writeln!(
            f,
            "  Regions: {} (rings: {}, holes: {})",
            self.region_count, self.ring_count, self.hole_count
        )?;
        if let Some(largest) = self.region_areas.iter().copied().reduce(f64::max) {
            writeln!(f, "  Largest region area: {:.3}", largest)?;
        }

        writeln!(
            f,
            "  Boundary edges: {}, non-manifold edges: {}",
            self.boundary_edge_count, self.non_manifold_edge_count
        )?;
        writeln!(f, "  Isolated vertices: {}", self.isolated_vertex_count)?;
        writeln!(f, "  Pinched nodes: {}", self.pinched_node_count)?;

        if let Some((lo, hi)) = self.value_range {
            writeln!(f, "  Values: {:.4} to {:.4}", lo, hi)?;
        }
        if let Some(gradient) = self.max_gradient {
            writeln!(f, "  Max gradient: {:.4}", gradient)?;
        }

        writeln!(f, "  Clean: {}", if self.is_clean() { "yes" } else { "NO" })?;

        Ok(())
    }
}

/// Validate a mesh and return a report.
///
/// Fails on the same inputs the topology operations reject: non-planar
/// kinds, bad indices, misaligned values and malformed boundaries.
pub fn validate_mesh(mesh: &Mesh) -> MeshResult<MeshReport> {
    let regions = polygon_regions(mesh)?;
    let adjacency = MeshAdjacency::build(&mesh.triangles);

    let isolated_vertex_count = (0..mesh.vertex_count() as u32)
        .filter(|&v| adjacency.faces_for_vertex(v).is_none())
        .count();

    let hole_count: usize = regions.iter().map(|r| r.hole_count()).sum();
    let value_range = mesh.has_values().then(|| {
        mesh.values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    });

    let report = MeshReport {
        kind: mesh.kind,
        vertex_count: mesh.vertex_count(),
        triangle_count: mesh.triangle_count(),
        isolated_vertex_count,
        boundary_edge_count: adjacency.boundary_edge_count(),
        non_manifold_edge_count: adjacency.non_manifold_edge_count(),
        ring_count: regions.len() + hole_count,
        region_count: regions.len(),
        hole_count,
        pinched_node_count: pinched_nodes_in(&regions).len(),
        region_areas: regions.iter().map(|r| r.area).collect(),
        bounds: mesh.bounds(),
        value_range,
        max_gradient: max_edge_gradient(mesh),
    };

    if report.non_manifold_edge_count > 0 {
        warn!(
            "Mesh is not manifold: {} non-manifold edges",
            report.non_manifold_edge_count
        );
    }
    if report.pinched_node_count > 0 {
        warn!("Mesh has {} pinched nodes", report.pinched_node_count);
    }

    debug!("{}", report);

    Ok(report)
}

/// Log a summary of mesh validation.
pub fn log_validation(report: &MeshReport) {
    info!(
        "Mesh: {} verts, {} triangles, {} regions, {} holes",
        report.vertex_count, report.triangle_count, report.region_count, report.hole_count
    );

    if report.is_clean() {
        info!("Mesh is a single region without pinched nodes");
    } else {
        if report.region_count > 1 {
            warn!("{} disconnected regions", report.region_count);
        }
        if report.pinched_node_count > 0 {
            warn!("{} pinched nodes", report.pinched_node_count);
        }
        if report.isolated_vertex_count > 0 {
            warn!("{} isolated vertices", report.isolated_vertex_count);
        }
    }
}
