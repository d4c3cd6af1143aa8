//! Fixed-point topology repair.
//!
//! The finalizer alternates pinch cleanup and sieving until no region falls
//! under the sieve criterion and no hole boundaries touch, then assigns
//! dense ID tags.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classify::polygon_regions;
use crate::error::{MeshError, MeshResult};
use crate::pinch::{cleanup_pinched_nodes, pinched_nodes_in};
use crate::repair::{put_id_tags, remove_unreferenced_vertices};
use crate::sieve::{regions_to_remove, sieve, SieveReport};
use crate::Mesh;

/// Parameters for [`finalize_mesh`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalizeParams {
    /// Regions at or below this area are removed. `None` keeps only the
    /// largest region(s).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sieve_area: Option<f64>,

    /// Maximum number of repair rounds before giving up.
    pub max_iterations: usize,
}

impl Default for FinalizeParams {
    fn default() -> Self {
        Self {
            sieve_area: None,
            max_iterations: 100,
        }
    }
}

impl FinalizeParams {
    /// Set the sieve area threshold.
    pub fn with_sieve_area(mut self, area: f64) -> Self {
        self.sieve_area = Some(area);
        self
    }

    /// Set the repair round cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    fn validate(&self) -> MeshResult<()> {
        if let Some(area) = self.sieve_area {
            if !area.is_finite() {
                return Err(MeshError::invalid_param(
                    "sieve_area",
                    area,
                    "must be a finite area",
                ));
            }
        }
        if self.max_iterations == 0 {
            return Err(MeshError::invalid_param(
                "max_iterations",
                self.max_iterations,
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Finalizer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeState {
    /// Isolated vertices may be present.
    Dirty,
    /// Checking for regions the sieve would remove.
    SieveCheck,
    /// Checking for pinched nodes.
    PinchCheck,
    /// Sieve-clean and pinch-free.
    Clean,
}

/// Summary of a finalize run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinalizeReport {
    /// Isolated vertices dropped before the first check.
    pub isolates_removed: usize,

    /// Repair rounds performed.
    pub iterations: usize,

    /// Triangles removed around pinched nodes, over all rounds.
    pub pinched_triangles_removed: usize,

    /// Sieve removals, over all rounds.
    pub sieve: SieveReport,

    pub final_vertex_count: usize,
    pub final_triangle_count: usize,
}

/// One pinch cleanup followed by one sieve.
fn repair_round(
    mesh: &mut Mesh,
    params: &FinalizeParams,
    report: &mut FinalizeReport,
) -> MeshResult<()> {
    if report.iterations >= params.max_iterations {
        return Err(MeshError::RepairDidNotConverge {
            iterations: params.max_iterations,
        });
    }
    report.iterations += 1;
    debug!("Repair round {}", report.iterations);

    report.pinched_triangles_removed += cleanup_pinched_nodes(mesh)?;
    report.sieve.accumulate(sieve(mesh, params.sieve_area)?);
    Ok(())
}

/// Repair a mesh until it is sieve-clean and pinch-free.
///
/// Works on a copy; `mesh` is only replaced when the loop reaches
/// [`FinalizeState::Clean`]. On success every vertex and triangle carries a
/// dense 1-based tag.
pub fn finalize_mesh(mesh: &mut Mesh, params: &FinalizeParams) -> MeshResult<FinalizeReport> {
    params.validate()?;
    mesh.require_euclidean()?;
    mesh.check_topology()?;

    let mut work = mesh.clone();
    let mut report = FinalizeReport::default();
    let mut regions = Vec::new();
    let mut state = FinalizeState::Dirty;

    loop {
        debug!("Finalize state: {:?}", state);
        state = match state {
            FinalizeState::Dirty => {
                report.isolates_removed = remove_unreferenced_vertices(&mut work)?;
                FinalizeState::SieveCheck
            }
            FinalizeState::SieveCheck => {
                regions = polygon_regions(&work)?;
                if regions_to_remove(&regions, params.sieve_area).is_empty() {
                    FinalizeState::PinchCheck
                } else {
                    repair_round(&mut work, params, &mut report)?;
                    FinalizeState::SieveCheck
                }
            }
            FinalizeState::PinchCheck => {
                if pinched_nodes_in(&regions).is_empty() {
                    FinalizeState::Clean
                } else {
                    repair_round(&mut work, params, &mut report)?;
                    FinalizeState::SieveCheck
                }
            }
            FinalizeState::Clean => break,
        };
    }

    put_id_tags(&mut work);
    report.final_vertex_count = work.vertex_count();
    report.final_triangle_count = work.triangle_count();
    *mesh = work;

    info!(
        "Finalized mesh: {} vertices, {} triangles after {} repair rounds",
        report.final_vertex_count, report.final_triangle_count, report.iterations
    );

    Ok(report)
}
