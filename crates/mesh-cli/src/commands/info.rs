//! `info`: validation report for a mesh file.

use std::path::Path;

use anyhow::Context;
use mesh_topology::log_validation;

use crate::output;
use crate::OutputFormat;

pub fn run(input: &Path, format: OutputFormat, quiet: bool) -> anyhow::Result<()> {
    let mesh = super::load(input)?;
    let report = mesh
        .validate()
        .with_context(|| format!("failed to validate {}", input.display()))?;
    log_validation(&report);

    output::report(&report, format, quiet)?;
    if !report.is_clean() {
        output::warning("mesh is not clean; run `finalize`", format, quiet);
    }
    Ok(())
}
