//! Removal of small disconnected components.
//!
//! A mesh can consist of several separate subdomains. Sieving drops every
//! subdomain whose exterior ring encloses at most a threshold area, or,
//! without a threshold, every subdomain whose exterior is smaller than the
//! largest one.
//!
//! Subdomains are ranked by exterior area rather than net area, so a region
//! is never removed while a kept region sits inside one of its holes.

use hashbrown::HashSet;
use serde::Serialize;
use tracing::{debug, info};

use crate::adjacency::MeshAdjacency;
use crate::classify::{polygon_regions, PolygonRegion};
use crate::error::{MeshError, MeshResult};
use crate::geometry::ring_containment;
use crate::repair::{remove_triangles_touching, remove_unreferenced_vertices};
use crate::Mesh;

/// What a sieve pass removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SieveReport {
    pub regions_removed: usize,
    pub triangles_removed: usize,
    pub vertices_removed: usize,
}

impl SieveReport {
    /// Fold another pass into this one.
    pub fn accumulate(&mut self, other: SieveReport) {
        self.regions_removed += other.regions_removed;
        self.triangles_removed += other.triangles_removed;
        self.vertices_removed += other.vertices_removed;
    }
}

fn check_area(area: Option<f64>) -> MeshResult<()> {
    match area {
        Some(a) if !a.is_finite() => Err(MeshError::invalid_param(
            "sieve_area",
            a,
            "must be a finite area",
        )),
        _ => Ok(()),
    }
}

/// Indices of the regions a sieve with `area` would remove.
///
/// Regions are compared by exterior area. Without a threshold, every region
/// strictly smaller than the largest is selected, so equally large regions
/// all survive.
pub fn regions_to_remove(regions: &[PolygonRegion], area: Option<f64>) -> Vec<usize> {
    match area {
        None => {
            let largest = regions
                .iter()
                .map(|r| r.exterior_area)
                .fold(f64::NEG_INFINITY, f64::max);
            regions
                .iter()
                .enumerate()
                .filter(|(_, r)| r.exterior_area < largest)
                .map(|(i, _)| i)
                .collect()
        }
        Some(threshold) => regions
            .iter()
            .enumerate()
            .filter(|(_, r)| r.exterior_area <= threshold)
            .map(|(i, _)| i)
            .collect(),
    }
}

/// Whether a sieve with `area` would remove any region.
pub fn needs_sieve(mesh: &Mesh, area: Option<f64>) -> MeshResult<bool> {
    check_area(area)?;
    let regions = polygon_regions(mesh)?;
    Ok(!regions_to_remove(&regions, area).is_empty())
}

/// Remove small disconnected components and their elements.
///
/// Vertices inside or on a removed region's exterior are marked, along with
/// their direct neighbors (boundary vertices the containment test can
/// miss) and any vertex with two or fewer neighbors. Every triangle touching
/// a marked vertex is dropped and the vertex array is compacted.
pub fn sieve(mesh: &mut Mesh, area: Option<f64>) -> MeshResult<SieveReport> {
    check_area(area)?;
    let regions = polygon_regions(mesh)?;
    let remove = regions_to_remove(&regions, area);
    let adjacency = MeshAdjacency::build(&mesh.triangles);

    let mut marked: HashSet<u32> = HashSet::new();
    for &r in &remove {
        let ring = regions[r].exterior.points(&mesh.vertices);
        let (min, max) = ring.iter().fold(
            ([f64::INFINITY; 2], [f64::NEG_INFINITY; 2]),
            |(lo, hi), p| {
                (
                    [lo[0].min(p.x), lo[1].min(p.y)],
                    [hi[0].max(p.x), hi[1].max(p.y)],
                )
            },
        );

        for (idx, vertex) in mesh.vertices.iter().enumerate() {
            let p = &vertex.position;
            if p.x < min[0] || p.x > max[0] || p.y < min[1] || p.y > max[1] {
                continue;
            }
            if ring_containment(&ring, p).is_covered() {
                marked.insert(idx as u32);
            }
        }
    }

    let seeds: Vec<u32> = marked.iter().copied().collect();
    for v in seeds {
        marked.extend(adjacency.neighbors(v).iter().copied());
    }

    let dangling = adjacency
        .vertex_neighbors
        .iter()
        .filter(|(_, neighbors)| neighbors.len() <= 2)
        .map(|(&v, _)| v);
    marked.extend(dangling);

    debug!(
        "Sieve marked {} vertices from {} of {} regions",
        marked.len(),
        remove.len(),
        regions.len()
    );

    let triangles_removed = remove_triangles_touching(mesh, &marked);
    let vertices_removed = remove_unreferenced_vertices(mesh)?;

    let report = SieveReport {
        regions_removed: remove.len(),
        triangles_removed,
        vertices_removed,
    };

    if triangles_removed > 0 {
        info!(
            "Sieve removed {} regions ({} triangles, {} vertices)",
            report.regions_removed, report.triangles_removed, report.vertices_removed
        );
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use approx::assert_relative_eq;

    #[test]
    fn test_removes_floating_triangle() {
        let mut mesh = fixtures::with_fragment(fixtures::square_grid(2));
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.triangle_count(), 9);
        assert!(needs_sieve(&mesh, None).unwrap());

        let report = sieve(&mut mesh, None).unwrap();
        assert_eq!(report.regions_removed, 1);
        assert_eq!(report.triangles_removed, 1);
        assert_eq!(report.vertices_removed, 3);

        assert_eq!(mesh, fixtures::square_grid(2));
        assert!(!needs_sieve(&mesh, None).unwrap());
    }

    #[test]
    fn test_values_follow_vertices() {
        let mut mesh = fixtures::with_fragment(fixtures::square_grid(2));
        mesh.values = (0..mesh.vertex_count()).map(|i| i as f64).collect();

        sieve(&mut mesh, None).unwrap();
        assert_eq!(mesh.values, (0..9).map(|i| i as f64).collect::<Vec<_>>());
    }

    #[test]
    fn test_threshold_keeps_large_regions() {
        // A 4x4 block and a 2x2 block side by side, never touching
        let mut mesh = fixtures::square_grid(4);
        let other = fixtures::translated(fixtures::square_grid(2), 10.0, 0.0);
        fixtures::append(&mut mesh, &other);
        let mesh = fixtures::with_fragment(mesh);

        let mut sieved = mesh.clone();
        let report = sieve(&mut sieved, Some(1.0)).unwrap();
        assert_eq!(report.regions_removed, 1);

        let regions = polygon_regions(&sieved).unwrap();
        assert_eq!(regions.len(), 2);
        assert!(regions.iter().all(|r| r.area > 1.0));

        let mut sieved = mesh.clone();
        sieve(&mut sieved, Some(4.0)).unwrap();
        let regions = polygon_regions(&sieved).unwrap();
        assert_eq!(regions.len(), 1);
        assert_relative_eq!(regions[0].area, 16.0);
    }

    #[test]
    fn test_equal_regions_survive_without_threshold() {
        let mut mesh = fixtures::square_grid(2);
        let twin = fixtures::translated(fixtures::square_grid(2), 5.0, 0.0);
        fixtures::append(&mut mesh, &twin);

        let regions = polygon_regions(&mesh).unwrap();
        assert!(regions_to_remove(&regions, None).is_empty());
        assert!(!needs_sieve(&mesh, None).unwrap());
    }

    #[test]
    fn test_regions_to_remove_threshold_is_inclusive() {
        let mesh = fixtures::with_fragment(fixtures::square_grid(2));
        let regions = polygon_regions(&mesh).unwrap();
        assert_eq!(regions_to_remove(&regions, Some(0.5)), vec![1]);
        assert_eq!(regions_to_remove(&regions, Some(0.49)), Vec::<usize>::new());
        assert_eq!(regions_to_remove(&regions, Some(4.0)), vec![0, 1]);
    }

    #[test]
    fn test_island_in_lake_keeps_largest_exterior() {
        let mesh = fixtures::island_in_lake();
        let before = polygon_regions(&mesh).unwrap();
        assert_eq!(before.len(), 2);
        // The island has more net area than the shore around the lake
        assert_relative_eq!(before[0].exterior_area, 144.0);
        assert_relative_eq!(before[0].area, 44.0);
        assert_relative_eq!(before[1].area, 64.0);
        assert_eq!(regions_to_remove(&before, None), vec![1]);

        let mut sieved = mesh.clone();
        let report = sieve(&mut sieved, None).unwrap();
        assert_eq!(report.regions_removed, 1);
        assert_eq!(report.triangles_removed, 128);

        let after = polygon_regions(&sieved).unwrap();
        assert_eq!(after.len(), 1);
        assert_relative_eq!(after[0].exterior_area, before[0].exterior_area);
        assert_relative_eq!(after[0].area, before[0].area);

        let mut shore = fixtures::lake_shore();
        remove_unreferenced_vertices(&mut shore).unwrap();
        assert_eq!(sieved, shore);
    }

    #[test]
    fn test_island_in_lake_with_threshold() {
        let mesh = fixtures::island_in_lake();

        let mut sieved = mesh.clone();
        let report = sieve(&mut sieved, Some(64.0)).unwrap();
        assert_eq!(report.regions_removed, 1);
        let regions = polygon_regions(&sieved).unwrap();
        assert_eq!(regions.len(), 1);
        assert_relative_eq!(regions[0].exterior_area, 144.0);

        let mut sieved = mesh.clone();
        let report = sieve(&mut sieved, Some(63.0)).unwrap();
        assert_eq!(report.regions_removed, 0);
        assert_eq!(polygon_regions(&sieved).unwrap().len(), 2);
    }

    #[test]
    fn test_empty_mesh_is_untouched() {
        let mut mesh = Mesh::new();
        assert!(!needs_sieve(&mesh, None).unwrap());
        assert_eq!(sieve(&mut mesh, None).unwrap(), SieveReport::default());
    }

    #[test]
    fn test_rejects_nan_threshold() {
        let mut mesh = fixtures::square_grid(2);
        assert!(matches!(
            sieve(&mut mesh, Some(f64::NAN)),
            Err(MeshError::InvalidParameter { .. })
        ));
        assert_eq!(mesh, fixtures::square_grid(2));
    }

    #[test]
    fn test_no_dangling_references() {
        let mut mesh = fixtures::with_fragment(fixtures::pinched_holes());
        sieve(&mut mesh, None).unwrap();
        let n = mesh.vertex_count() as u32;
        assert!(mesh
            .triangles
            .iter()
            .all(|t| t.indices.iter().all(|&v| v < n)));
    }
}
