//! `sieve`: one pass of small-region removal.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use mesh_topology::SieveReport;

use crate::output;
use crate::OutputFormat;

#[derive(Serialize)]
struct SieveOutput<'a> {
    input: &'a Path,
    output: &'a Path,
    area: Option<f64>,
    #[serde(flatten)]
    report: SieveReport,
}

impl fmt::Display for SieveOutput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sieve of {}:", self.input.display())?;
        match self.area {
            Some(area) => writeln!(f, "  Threshold: {}", area)?,
            None => writeln!(f, "  Threshold: keep largest region")?,
        }
        writeln!(f, "  Regions removed: {}", self.report.regions_removed)?;
        writeln!(f, "  Triangles removed: {}", self.report.triangles_removed)?;
        writeln!(f, "  Vertices removed: {}", self.report.vertices_removed)
    }
}

pub fn run(
    input: &Path,
    output_path: &Path,
    area: Option<f64>,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let mut mesh = super::load(input)?;
    let report = mesh.sieve(area)?;
    super::save(&mesh, output_path)?;

    output::report(
        &SieveOutput {
            input,
            output: output_path,
            area,
            report,
        },
        format,
        quiet,
    )?;
    output::success(&format!("Wrote {}", output_path.display()), format, quiet);
    Ok(())
}
