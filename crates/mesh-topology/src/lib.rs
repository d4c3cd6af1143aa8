//! Topology finalization for 2D triangle meshes.
//!
//! This crate turns an arbitrary planar triangle soup into a clean mesh
//! for numerical simulation:
//!
//! - **Boundaries**: chain boundary edges into rings and group them into
//!   polygon regions (one exterior, direct-child holes)
//! - **Repair**: sieve away small disconnected regions, remove triangles
//!   around pinched nodes, iterate to a fixed point and assign ID tags
//! - **Gradient limiting**: lower a vertex scalar field until its slope along
//!   every edge stays under a limit
//! - **Loading/Saving**: JIGSAW `.msh` and JSON
//!
//! # Example
//!
//! ```no_run
//! use mesh_topology::{FinalizeParams, LimgradParams, Mesh};
//!
//! let mut mesh = Mesh::load("coast.msh").unwrap();
//!
//! let report = mesh.validate().unwrap();
//! println!("{}", report);
//!
//! mesh.finalize(&FinalizeParams::default()).unwrap();
//! mesh.interpolate_values(&|p: &nalgebra::Point2<f64>| 0.1 + p.x.abs()).unwrap();
//! mesh.limit_gradient(&LimgradParams::new(0.2)).unwrap();
//!
//! mesh.save("coast-final.msh").unwrap();
//! ```

mod error;
mod types;

pub mod adjacency;
pub mod boundary;
pub mod classify;
pub mod finalize;
pub mod geometry;
pub mod interpolate;
pub mod io;
pub mod limgrad;
pub mod pinch;
pub mod repair;
pub mod sieve;
pub mod validate;

#[cfg(feature = "pipeline-config")]
pub mod config;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export core types at crate root
pub use error::{MeshError, MeshResult};
pub use types::{Mesh, MeshKind, Triangle, Vertex};

pub use adjacency::MeshAdjacency;
pub use boundary::{chain_edges, extract_rings, Ring};
pub use classify::{classify_rings, polygon_regions, PolygonRegion};
pub use finalize::{finalize_mesh, FinalizeParams, FinalizeReport, FinalizeState};
pub use interpolate::Interpolator;
pub use io::{load_mesh, save_mesh, save_json, save_msh, MeshFormat};
pub use limgrad::{limit_gradient, max_edge_gradient, LimgradParams, LimgradReport};
pub use pinch::{cleanup_pinched_nodes, has_pinched_nodes, pinched_nodes};
pub use repair::{put_id_tags, remove_unreferenced_vertices};
pub use sieve::{needs_sieve, sieve, SieveReport};
pub use validate::{log_validation, validate_mesh, MeshReport};

#[cfg(feature = "pipeline-config")]
pub use config::{PipelineConfig, PipelineReport};

// Convenience methods on Mesh
impl Mesh {
    /// Load a mesh from a file, auto-detecting format from extension.
    pub fn load(path: impl AsRef<std::path::Path>) -> MeshResult<Self> {
        io::load_mesh(path.as_ref())
    }

    /// Save the mesh to a file, auto-detecting format from extension.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> MeshResult<()> {
        io::save_mesh(self, path.as_ref())
    }

    /// Validate the mesh and return a report.
    pub fn validate(&self) -> MeshResult<MeshReport> {
        validate::validate_mesh(self)
    }

    /// Build adjacency tables for the current triangles.
    pub fn adjacency(&self) -> MeshAdjacency {
        MeshAdjacency::build(&self.triangles)
    }

    /// Polygon regions of the mesh boundary.
    pub fn regions(&self) -> MeshResult<Vec<PolygonRegion>> {
        classify::polygon_regions(self)
    }

    /// Exterior ring of each region.
    pub fn outer_rings(&self) -> MeshResult<Vec<Ring>> {
        Ok(self.regions()?.into_iter().map(|r| r.exterior).collect())
    }

    /// Hole rings, grouped by region.
    pub fn inner_rings(&self) -> MeshResult<Vec<Vec<Ring>>> {
        Ok(self.regions()?.into_iter().map(|r| r.interiors).collect())
    }

    /// Remove small disconnected regions; see [`sieve::sieve`].
    pub fn sieve(&mut self, area: Option<f64>) -> MeshResult<SieveReport> {
        sieve::sieve(self, area)
    }

    /// Whether two hole boundaries share a vertex.
    pub fn has_pinched_nodes(&self) -> MeshResult<bool> {
        pinch::has_pinched_nodes(self)
    }

    /// Repair to a fixed point and assign ID tags.
    pub fn finalize(&mut self, params: &FinalizeParams) -> MeshResult<FinalizeReport> {
        finalize::finalize_mesh(self, params)
    }

    /// Limit the gradient of the scalar field.
    pub fn limit_gradient(&mut self, params: &LimgradParams) -> MeshResult<LimgradReport> {
        limgrad::limit_gradient(self, params)
    }
}
