//! `run`: apply a pipeline config file.

use std::fmt;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use mesh_topology::{PipelineConfig, PipelineReport};

use crate::output;
use crate::OutputFormat;

#[derive(Serialize)]
struct RunOutput<'a> {
    input: &'a Path,
    output: &'a Path,
    config: &'a PipelineConfig,
    report: &'a PipelineReport,
}

impl fmt::Display for RunOutput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.config.name.as_deref().unwrap_or("<unnamed>");
        writeln!(f, "Pipeline '{}' on {}:", name, self.input.display())?;

        let finalize = &self.report.finalize;
        writeln!(
            f,
            "  Finalize: {} rounds, {} regions sieved, {} vertices / {} triangles",
            finalize.iterations,
            finalize.sieve.regions_removed,
            finalize.final_vertex_count,
            finalize.final_triangle_count
        )?;
        match &self.report.limgrad {
            Some(limgrad) => writeln!(
                f,
                "  Limgrad: {} values lowered in {} passes",
                limgrad.vertices_lowered, limgrad.passes
            ),
            None => writeln!(f, "  Limgrad: skipped"),
        }
    }
}

pub fn run(
    input: &Path,
    output_path: &Path,
    config_path: &Path,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let config = PipelineConfig::from_file(config_path)
        .with_context(|| format!("failed to read config {}", config_path.display()))?;
    let mut mesh = super::load(input)?;
    let report = config.run(&mut mesh)?;
    super::save(&mesh, output_path)?;

    output::report(
        &RunOutput {
            input,
            output: output_path,
            config: &config,
            report: &report,
        },
        format,
        quiet,
    )?;
    output::success(&format!("Wrote {}", output_path.display()), format, quiet);
    Ok(())
}
