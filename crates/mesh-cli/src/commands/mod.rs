//! CLI command implementations.

pub mod finalize;
pub mod info;
pub mod limgrad;
pub mod run;
pub mod sieve;

use std::path::Path;

use anyhow::Context;
use mesh_topology::Mesh;

pub(crate) fn load(path: &Path) -> anyhow::Result<Mesh> {
    Mesh::load(path).with_context(|| format!("failed to load {}", path.display()))
}

pub(crate) fn save(mesh: &Mesh, path: &Path) -> anyhow::Result<()> {
    mesh.save(path)
        .with_context(|| format!("failed to save {}", path.display()))
}
