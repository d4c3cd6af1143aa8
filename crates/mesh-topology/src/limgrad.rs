//! Gradient limiting of a vertex scalar field.
//!
//! Lowers values until the slope along every mesh edge is at most `dfdx`.
//! Values only ever decrease. Each pass relaxes the vertices lowered in the
//! previous pass, visited from the smallest value up.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::adjacency::MeshAdjacency;
use crate::error::{MeshError, MeshResult};
use crate::Mesh;

fn default_imax() -> usize {
    100
}

/// Parameters for [`limit_gradient`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimgradParams {
    /// Maximum allowed slope along an edge.
    pub dfdx: f64,

    /// Maximum number of relaxation passes.
    #[serde(default = "default_imax")]
    pub imax: usize,
}

impl LimgradParams {
    pub fn new(dfdx: f64) -> Self {
        Self {
            dfdx,
            imax: default_imax(),
        }
    }

    /// Set the pass cap.
    pub fn with_imax(mut self, imax: usize) -> Self {
        self.imax = imax;
        self
    }

    fn validate(&self) -> MeshResult<()> {
        if !self.dfdx.is_finite() || self.dfdx < 0.0 {
            return Err(MeshError::invalid_param(
                "dfdx",
                self.dfdx,
                "must be a finite, non-negative slope",
            ));
        }
        if self.imax == 0 {
            return Err(MeshError::invalid_param("imax", self.imax, "must be at least 1"));
        }
        Ok(())
    }
}

/// Summary of a gradient limiting run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LimgradReport {
    /// Passes that lowered at least one value.
    pub iterations: usize,

    /// Passes run, including the final one that found nothing to do.
    pub passes: usize,

    /// Distinct vertices whose value was lowered.
    pub vertices_lowered: usize,

    /// Largest decrease applied to a single vertex.
    pub max_decrease: f64,
}

/// Limit the gradient of `mesh.values` along mesh edges.
///
/// Works on a copy of the values; on non-convergence the mesh is left as
/// it was and [`MeshError::DidNotConverge`] carries `imax`.
pub fn limit_gradient(mesh: &mut Mesh, params: &LimgradParams) -> MeshResult<LimgradReport> {
    params.validate()?;
    mesh.require_euclidean()?;
    mesh.check_topology()?;

    if !mesh.has_values() {
        return Err(MeshError::invalid_param(
            "values",
            "[]",
            "gradient limiting needs a scalar field",
        ));
    }
    if let Some(bad) = mesh.values.iter().find(|v| !v.is_finite()) {
        return Err(MeshError::invalid_param(
            "values",
            bad,
            "scalar field must be finite",
        ));
    }

    let neighbors = edge_lengths(mesh);
    let original = &mesh.values;
    let mut values = original.clone();

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let ftol = min.abs() * f64::EPSILON.sqrt();

    let n = values.len();
    let mut counters = vec![0usize; n];
    let mut report = LimgradReport::default();
    let mut converged = false;

    for k in 1..=params.imax {
        let mut active: Vec<usize> = (0..n).filter(|&i| counters[i] == k - 1).collect();
        if active.is_empty() {
            converged = true;
            break;
        }
        report.passes += 1;
        active.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

        let mut lowered = 0;
        for &a in &active {
            for &(b, len) in &neighbors[a] {
                let limit = len * params.dfdx;
                if values[b] > values[a] {
                    let ceiling = values[a] + limit;
                    if values[b] > ceiling + ftol {
                        values[b] = ceiling;
                        counters[b] = k;
                        lowered += 1;
                    }
                } else {
                    let ceiling = values[b] + limit;
                    if values[a] > ceiling + ftol {
                        values[a] = ceiling;
                        counters[a] = k;
                        lowered += 1;
                    }
                }
            }
        }

        debug!(
            "Gradient pass {}: {} active vertices, {} values lowered",
            k,
            active.len(),
            lowered
        );
        if lowered > 0 {
            report.iterations += 1;
        }
    }

    // The last pass may have lowered nothing without a further pass to see it
    if !converged && counters.contains(&params.imax) {
        return Err(MeshError::DidNotConverge {
            iterations: params.imax,
        });
    }

    for (old, new) in original.iter().zip(&values) {
        let decrease = old - new;
        if decrease > 0.0 {
            report.vertices_lowered += 1;
            report.max_decrease = report.max_decrease.max(decrease);
        }
    }

    info!(
        "Gradient limited {} of {} values in {} passes",
        report.vertices_lowered, n, report.passes
    );

    mesh.values = values;
    Ok(report)
}

/// Undirected neighbors of each vertex with their edge lengths.
fn edge_lengths(mesh: &Mesh) -> Vec<Vec<(usize, f64)>> {
    let adjacency = MeshAdjacency::build(&mesh.triangles);
    (0..mesh.vertex_count() as u32)
        .map(|a| {
            adjacency
                .neighbors(a)
                .iter()
                .map(|&b| (b as usize, mesh.edge_length(a, b)))
                .collect()
        })
        .collect()
}

/// Steepest slope along any mesh edge.
///
/// `None` without values or edges, or when the triangles and values do not
/// line up with the vertex array.
pub fn max_edge_gradient(mesh: &Mesh) -> Option<f64> {
    if !mesh.has_values() || mesh.check_topology().is_err() {
        return None;
    }
    let adjacency = MeshAdjacency::build(&mesh.triangles);
    adjacency
        .edge_to_faces
        .keys()
        .filter_map(|&(a, b)| {
            let len = mesh.edge_length(a, b);
            (len > 0.0).then(|| (mesh.values[a as usize] - mesh.values[b as usize]).abs() / len)
        })
        .reduce(f64::max)
}
