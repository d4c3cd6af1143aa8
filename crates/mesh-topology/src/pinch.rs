//! Pinched node detection and cleanup.
//!
//! A pinched node is a vertex where hole boundaries touch: it occurs more
//! than once across the interior rings of the mesh's regions.

use hashbrown::{HashMap, HashSet};
use tracing::{debug, info};

use crate::classify::{polygon_regions, PolygonRegion};
use crate::error::MeshResult;
use crate::repair::{remove_triangles_touching, remove_unreferenced_vertices};
use crate::Mesh;

/// Vertices repeated across the interior rings of `regions`, sorted.
pub fn pinched_nodes_in(regions: &[PolygonRegion]) -> Vec<u32> {
    let mut occurrences: HashMap<u32, usize> = HashMap::new();
    for ring in regions.iter().flat_map(|r| r.interiors.iter()) {
        for v in ring.vertices() {
            *occurrences.entry(v).or_default() += 1;
        }
    }

    let mut pinched: Vec<u32> = occurrences
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(v, _)| v)
        .collect();
    pinched.sort_unstable();
    pinched
}

/// Pinched nodes of a mesh, sorted by index.
pub fn pinched_nodes(mesh: &Mesh) -> MeshResult<Vec<u32>> {
    Ok(pinched_nodes_in(&polygon_regions(mesh)?))
}

/// Whether any interior ring vertex is shared with another hole boundary.
pub fn has_pinched_nodes(mesh: &Mesh) -> MeshResult<bool> {
    Ok(!pinched_nodes(mesh)?.is_empty())
}

/// Remove every triangle touching a pinched node, then compact.
///
/// Returns the number of triangles removed.
pub fn cleanup_pinched_nodes(mesh: &mut Mesh) -> MeshResult<usize> {
    let pinched = pinched_nodes(mesh)?;
    if pinched.is_empty() {
        return Ok(0);
    }
    debug!("Pinched nodes: {:?}", pinched);

    let marked: HashSet<u32> = pinched.iter().copied().collect();
    let removed = remove_triangles_touching(mesh, &marked);
    remove_unreferenced_vertices(mesh)?;

    info!(
        "Removed {} triangles around {} pinched nodes",
        removed,
        pinched.len()
    );
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;
    use crate::fixtures;
    use crate::MeshKind;

    #[test]
    fn test_clean_meshes_have_no_pinch() {
        assert!(!has_pinched_nodes(&fixtures::square_grid(2)).unwrap());
        assert!(!has_pinched_nodes(&fixtures::annulus()).unwrap());
        assert!(!has_pinched_nodes(&Mesh::new()).unwrap());
    }

    #[test]
    fn test_touching_holes_are_pinched() {
        let mesh = fixtures::pinched_holes();
        // Vertex (2, 2) of the 5x5 lattice
        assert_eq!(pinched_nodes(&mesh).unwrap(), vec![12]);
        assert!(has_pinched_nodes(&mesh).unwrap());
    }

    #[test]
    fn test_cleanup_merges_holes() {
        let mut mesh = fixtures::pinched_holes();
        let removed = cleanup_pinched_nodes(&mut mesh).unwrap();
        assert_eq!(removed, 4);
        assert_eq!(mesh.triangle_count(), 24);
        assert_eq!(mesh.vertex_count(), 24);
        assert!(!has_pinched_nodes(&mesh).unwrap());

        let regions = polygon_regions(&mesh).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].hole_count(), 1);
    }

    #[test]
    fn test_cleanup_without_pinch_is_noop() {
        let mut mesh = fixtures::annulus();
        assert_eq!(cleanup_pinched_nodes(&mut mesh).unwrap(), 0);
        assert_eq!(mesh, fixtures::annulus());
    }

    #[test]
    fn test_non_euclidean_is_rejected() {
        let mut mesh = fixtures::pinched_holes();
        mesh.kind = MeshKind::EllipsoidMesh;
        assert!(matches!(
            has_pinched_nodes(&mesh),
            Err(MeshError::UnsupportedTopology { .. })
        ));
    }
}
