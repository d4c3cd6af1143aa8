//! Mesh compaction primitives: element removal, isolate cleanup, ID tags.

use hashbrown::{HashMap, HashSet};
use tracing::{debug, info};

use crate::error::MeshResult;
use crate::Mesh;

/// Remove every triangle that references one of `vertices`.
///
/// Vertices themselves are left in place; follow up with
/// [`remove_unreferenced_vertices`] to compact. Returns the number of
/// triangles removed.
pub fn remove_triangles_touching(mesh: &mut Mesh, vertices: &HashSet<u32>) -> usize {
    if vertices.is_empty() {
        return 0;
    }

    let original_count = mesh.triangles.len();
    mesh.triangles
        .retain(|t| !t.indices.iter().any(|v| vertices.contains(v)));

    let removed = original_count - mesh.triangles.len();
    if removed > 0 {
        debug!(
            "Removed {} triangles touching {} vertices",
            removed,
            vertices.len()
        );
    }
    removed
}

/// Remove unreferenced vertices and compact the vertex array.
///
/// Relative vertex order is preserved and the value array, when present, is
/// compacted alongside. Returns the number of vertices removed. Fails with
/// `InvalidTopology`, leaving the mesh untouched, when a triangle references
/// a missing vertex or the values are misaligned.
pub fn remove_unreferenced_vertices(mesh: &mut Mesh) -> MeshResult<usize> {
    mesh.check_topology()?;
    let original_count = mesh.vertices.len();

    // Find all referenced vertices
    let mut referenced: HashSet<u32> = HashSet::new();
    for triangle in &mesh.triangles {
        referenced.extend(triangle.indices);
    }

    if referenced.len() == original_count {
        return Ok(0); // All vertices are referenced
    }

    // Build compacted vertex list and remap
    let mut new_vertices = Vec::with_capacity(referenced.len());
    let mut new_values = Vec::with_capacity(if mesh.has_values() { referenced.len() } else { 0 });
    let mut remap: HashMap<u32, u32> = HashMap::new();

    for (old_idx, vertex) in mesh.vertices.iter().enumerate() {
        if referenced.contains(&(old_idx as u32)) {
            let new_idx = new_vertices.len() as u32;
            remap.insert(old_idx as u32, new_idx);
            new_vertices.push(vertex.clone());
            if let Some(&value) = mesh.values.get(old_idx) {
                new_values.push(value);
            }
        }
    }

    // Remap triangle indices
    for triangle in &mut mesh.triangles {
        for v in &mut triangle.indices {
            *v = remap[&*v];
        }
    }

    let removed = original_count - new_vertices.len();
    mesh.vertices = new_vertices;
    if mesh.has_values() {
        mesh.values = new_values;
    }

    if removed > 0 {
        info!("Removed {} unreferenced vertices", removed);
    }

    Ok(removed)
}

/// Assign dense 1-based ID tags to vertices and triangles.
///
/// Tags start at 1 for consumers with 1-based element numbering.
pub fn put_id_tags(mesh: &mut Mesh) {
    for (i, vertex) in mesh.vertices.iter_mut().enumerate() {
        vertex.tag = Some(i as i32 + 1);
    }
    for (i, triangle) in mesh.triangles.iter_mut().enumerate() {
        triangle.tag = i as i32 + 1;
    }
}
