//! Seam for sampling a scalar field onto mesh vertices.

use nalgebra::Point2;
use tracing::debug;

use crate::error::{MeshError, MeshResult};
use crate::{Mesh, Vertex};

/// Source of per-vertex values, e.g. a background raster.
pub trait Interpolator {
    /// One value per input vertex, in order.
    fn interpolate(&self, vertices: &[Vertex]) -> MeshResult<Vec<f64>>;
}

impl<F> Interpolator for F
where
    F: Fn(&Point2<f64>) -> f64,
{
    fn interpolate(&self, vertices: &[Vertex]) -> MeshResult<Vec<f64>> {
        Ok(vertices.iter().map(|v| self(&v.position)).collect())
    }
}

impl Mesh {
    /// Replace the scalar field with values sampled from `source`.
    ///
    /// The mesh is left untouched if the source fails or returns the wrong
    /// number of values.
    pub fn interpolate_values<I: Interpolator + ?Sized>(&mut self, source: &I) -> MeshResult<()> {
        let values = source.interpolate(&self.vertices)?;
        if values.len() != self.vertices.len() {
            return Err(MeshError::InvalidTopology {
                details: format!(
                    "interpolator returned {} values for {} vertices",
                    values.len(),
                    self.vertices.len()
                ),
            });
        }
        debug!("Interpolated {} vertex values", values.len());
        self.values = values;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    struct Constant(usize);

    impl Interpolator for Constant {
        fn interpolate(&self, _vertices: &[Vertex]) -> MeshResult<Vec<f64>> {
            Ok(vec![1.0; self.0])
        }
    }

    #[test]
    fn test_closure_source() {
        let mut mesh = fixtures::square_grid(2);
        mesh.interpolate_values(&|p: &Point2<f64>| p.x + 10.0 * p.y)
            .unwrap();
        assert_eq!(mesh.values.len(), 9);
        assert_eq!(mesh.values[0], 0.0);
        assert_eq!(mesh.values[8], 22.0);
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let mut mesh = fixtures::square_grid(2);
        let err = mesh.interpolate_values(&Constant(4)).unwrap_err();
        assert!(matches!(err, MeshError::InvalidTopology { .. }));
        assert!(!mesh.has_values());

        mesh.interpolate_values(&Constant(9)).unwrap();
        assert_eq!(mesh.values, vec![1.0; 9]);
    }
}
