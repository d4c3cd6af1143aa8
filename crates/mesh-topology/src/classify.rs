//! Grouping of boundary rings into polygon regions.
//!
//! Each region has one exterior ring and the holes directly inside it. A
//! ring nested inside a hole belongs to a later region, not to the one
//! whose hole encloses it.

use nalgebra::Point2;
use tracing::debug;

use crate::boundary::{extract_rings, Ring};
use crate::error::{MeshError, MeshResult};
use crate::geometry::{polygon_area, ring_containment, Containment};
use crate::{Mesh, Vertex};

/// One exterior ring plus its direct-child holes.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonRegion {
    pub exterior: Ring,
    pub interiors: Vec<Ring>,

    /// Absolute area enclosed by the exterior ring.
    pub exterior_area: f64,

    /// Exterior area minus the hole areas.
    pub area: f64,
}

impl PolygonRegion {
    /// Number of interior rings.
    #[inline]
    pub fn hole_count(&self) -> usize {
        self.interiors.len()
    }

    /// Exterior followed by the interiors.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.exterior).chain(self.interiors.iter())
    }
}

/// A ring with its geometry resolved.
struct PlacedRing {
    ring: Ring,
    points: Vec<Point2<f64>>,
    area: f64,
}

impl PlacedRing {
    fn new(ring: Ring, vertices: &[Vertex]) -> MeshResult<Self> {
        let start = ring.first_vertex().unwrap_or_default();
        if !ring.is_closed() {
            return Err(MeshError::MalformedGeometry {
                details: format!("boundary chain starting at vertex {} is not closed", start),
            });
        }
        if ring.len() < 3 {
            return Err(MeshError::MalformedGeometry {
                details: format!(
                    "boundary ring at vertex {} has only {} edges",
                    start,
                    ring.len()
                ),
            });
        }

        if let Some(v) = ring.vertices().find(|&v| v as usize >= vertices.len()) {
            return Err(MeshError::InvalidTopology {
                details: format!(
                    "boundary ring references vertex {} but mesh has {} vertices",
                    v,
                    vertices.len()
                ),
            });
        }

        let points = ring.points(vertices);
        let area = polygon_area(&points);
        if !area.is_finite() {
            return Err(MeshError::MalformedGeometry {
                details: format!("boundary ring at vertex {} has non-finite area", start),
            });
        }

        Ok(Self { ring, points, area })
    }

    /// Whether `other` lies inside this ring.
    ///
    /// The test point is the first vertex of `other`; when that vertex sits on
    /// this ring's boundary the next one is used instead.
    fn encloses(&self, other: &PlacedRing) -> bool {
        for p in &other.points {
            match ring_containment(&self.points, p) {
                Containment::Inside => return true,
                Containment::Outside => return false,
                Containment::Boundary => continue,
            }
        }
        false
    }
}

/// Compute the polygon regions of a mesh.
pub fn polygon_regions(mesh: &Mesh) -> MeshResult<Vec<PolygonRegion>> {
    mesh.require_euclidean()?;
    mesh.check_topology()?;
    classify_rings(extract_rings(mesh), &mesh.vertices)
}

/// Partition rings into polygon regions.
///
/// Repeatedly takes the largest remaining ring as an exterior and assigns
/// it the remaining rings that lie inside it but not inside one another.
/// A ring referencing a vertex outside `vertices` is an `InvalidTopology`
/// error.
pub fn classify_rings(rings: Vec<Ring>, vertices: &[Vertex]) -> MeshResult<Vec<PolygonRegion>> {
    let ring_count = rings.len();
    let mut pool = rings
        .into_iter()
        .map(|ring| PlacedRing::new(ring, vertices))
        .collect::<MeshResult<Vec<_>>>()?;

    let mut regions = Vec::new();

    while !pool.is_empty() {
        let mut largest = 0;
        for (i, candidate) in pool.iter().enumerate().skip(1) {
            if candidate.area > pool[largest].area {
                largest = i;
            }
        }
        let exterior = pool.remove(largest);

        let candidates: Vec<usize> = (0..pool.len())
            .filter(|&i| exterior.encloses(&pool[i]))
            .collect();

        let mut direct: Vec<usize> = candidates
            .iter()
            .copied()
            .filter(|&i| {
                !candidates
                    .iter()
                    .any(|&j| j != i && pool[j].encloses(&pool[i]))
            })
            .collect();

        // Remove from the back so earlier indices stay valid
        direct.sort_unstable();
        let mut interiors: Vec<PlacedRing> =
            direct.iter().rev().map(|&i| pool.remove(i)).collect();
        interiors.reverse();

        let hole_area: f64 = interiors.iter().map(|r| r.area).sum();
        regions.push(PolygonRegion {
            exterior_area: exterior.area,
            area: exterior.area - hole_area,
            exterior: exterior.ring,
            interiors: interiors.into_iter().map(|r| r.ring).collect(),
        });
    }

    debug!(
        "Classified {} rings into {} polygon regions",
        ring_count,
        regions.len()
    );

    Ok(regions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::MeshKind;
    use approx::assert_relative_eq;

    fn square_ring(mesh: &mut Mesh, x0: f64, y0: f64, size: f64) -> Ring {
        let base = mesh.vertices.len() as u32;
        mesh.add_vertex(x0, y0);
        mesh.add_vertex(x0 + size, y0);
        mesh.add_vertex(x0 + size, y0 + size);
        mesh.add_vertex(x0, y0 + size);
        Ring::from_edges(
            (0..4)
                .map(|k| (base + k, base + (k + 1) % 4))
                .collect(),
        )
    }

    #[test]
    fn test_single_region() {
        let mesh = fixtures::square_grid(2);
        let regions = polygon_regions(&mesh).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].hole_count(), 0);
        assert_relative_eq!(regions[0].area, 4.0);
    }

    #[test]
    fn test_annulus_has_one_hole() {
        let mesh = fixtures::annulus();
        let regions = polygon_regions(&mesh).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].interiors.len(), 1);
        assert_relative_eq!(regions[0].exterior_area, 16.0);
        assert_relative_eq!(regions[0].area, 12.0);
        assert_eq!(regions[0].rings().count(), 2);
    }

    #[test]
    fn test_disconnected_components() {
        let mesh = fixtures::with_fragment(fixtures::square_grid(2));
        let regions = polygon_regions(&mesh).unwrap();
        assert_eq!(regions.len(), 2);
        // Largest first
        assert_relative_eq!(regions[0].area, 4.0);
        assert_relative_eq!(regions[1].area, 0.5);
    }

    #[test]
    fn test_nested_rings_go_to_separate_regions() {
        // Island inside a lake inside a continent
        let mut mesh = Mesh::new();
        let continent = square_ring(&mut mesh, 0.0, 0.0, 10.0);
        let lake = square_ring(&mut mesh, 2.0, 2.0, 6.0);
        let island = square_ring(&mut mesh, 4.0, 4.0, 2.0);
        let pond = square_ring(&mut mesh, 4.5, 4.5, 1.0);

        let regions = classify_rings(
            vec![island.clone(), continent.clone(), pond.clone(), lake.clone()],
            &mesh.vertices,
        )
        .unwrap();

        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].exterior, continent);
        assert_eq!(regions[0].interiors, vec![lake]);
        assert_relative_eq!(regions[0].area, 64.0);

        // The lake ring is consumed, so the island stands alone with its pond
        assert_eq!(regions[1].exterior, island);
        assert_eq!(regions[1].interiors, vec![pond]);
        assert_relative_eq!(regions[1].area, 3.0);
    }

    #[test]
    fn test_sibling_holes_are_both_direct() {
        let mut mesh = Mesh::new();
        let outer = square_ring(&mut mesh, 0.0, 0.0, 10.0);
        let a = square_ring(&mut mesh, 1.0, 1.0, 2.0);
        let b = square_ring(&mut mesh, 5.0, 5.0, 2.0);

        let regions = classify_rings(vec![a, outer, b], &mesh.vertices).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].hole_count(), 2);
        assert_relative_eq!(regions[0].area, 92.0);
    }

    #[test]
    fn test_no_rings_no_regions() {
        let regions = classify_rings(Vec::new(), &[]).unwrap();
        assert!(regions.is_empty());
        assert!(polygon_regions(&Mesh::new()).unwrap().is_empty());
    }

    #[test]
    fn test_open_ring_is_rejected() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(0.0, 0.0);
        mesh.add_vertex(1.0, 0.0);
        mesh.add_vertex(1.0, 1.0);
        let open = Ring::from_edges(vec![(0, 1), (1, 2)]);
        let err = classify_rings(vec![open], &mesh.vertices).unwrap_err();
        assert!(matches!(err, MeshError::MalformedGeometry { .. }));
    }

    #[test]
    fn test_out_of_range_ring_is_rejected() {
        let mut mesh = Mesh::new();
        let ring = square_ring(&mut mesh, 0.0, 0.0, 1.0);
        let err = classify_rings(vec![ring], &mesh.vertices[..3]).unwrap_err();
        assert!(matches!(err, MeshError::InvalidTopology { .. }));
    }

    #[test]
    fn test_non_euclidean_is_rejected() {
        let mut mesh = fixtures::square_grid(2);
        mesh.kind = MeshKind::EuclideanGrid;
        assert!(matches!(
            polygon_regions(&mesh),
            Err(MeshError::UnsupportedTopology { .. })
        ));
    }
}
