//! `finalize`: repair to a clean, tagged mesh.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use mesh_topology::{FinalizeParams, FinalizeReport, PipelineConfig};

use crate::output;
use crate::OutputFormat;

/// Command-line settings layered over an optional config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub sieve_area: Option<f64>,
    pub max_iterations: Option<usize>,
    pub config: Option<PathBuf>,
}

impl Overrides {
    fn params(&self) -> anyhow::Result<FinalizeParams> {
        let mut params = match &self.config {
            Some(path) => PipelineConfig::from_file(path)?.finalize,
            None => FinalizeParams::default(),
        };
        if let Some(area) = self.sieve_area {
            params.sieve_area = Some(area);
        }
        if let Some(max_iterations) = self.max_iterations {
            params.max_iterations = max_iterations;
        }
        Ok(params)
    }
}

#[derive(Serialize)]
struct FinalizeOutput<'a> {
    input: &'a Path,
    output: &'a Path,
    params: &'a FinalizeParams,
    #[serde(flatten)]
    report: &'a FinalizeReport,
}

impl fmt::Display for FinalizeOutput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.report;
        writeln!(f, "Finalized {}:", self.input.display())?;
        writeln!(f, "  Repair rounds: {}", r.iterations)?;
        writeln!(f, "  Isolated vertices removed: {}", r.isolates_removed)?;
        writeln!(
            f,
            "  Sieved: {} regions ({} triangles)",
            r.sieve.regions_removed, r.sieve.triangles_removed
        )?;
        writeln!(
            f,
            "  Pinch cleanup: {} triangles",
            r.pinched_triangles_removed
        )?;
        writeln!(
            f,
            "  Result: {} vertices, {} triangles",
            r.final_vertex_count, r.final_triangle_count
        )
    }
}

pub fn run(
    input: &Path,
    output_path: &Path,
    overrides: Overrides,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let params = overrides.params()?;
    let mut mesh = super::load(input)?;
    let report = mesh.finalize(&params)?;
    super::save(&mesh, output_path)?;

    output::report(
        &FinalizeOutput {
            input,
            output: output_path,
            params: &params,
            report: &report,
        },
        format,
        quiet,
    )?;
    output::success(&format!("Wrote {}", output_path.display()), format, quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_config() {
        let params = Overrides::default().params().unwrap();
        assert_eq!(params, FinalizeParams::default());
    }

    #[test]
    fn test_flags_override_config() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[finalize]\nsieve_area = 2.0\nmax_iterations = 7").unwrap();

        let from_file = Overrides {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let params = from_file.params().unwrap();
        assert_eq!(params.sieve_area, Some(2.0));
        assert_eq!(params.max_iterations, 7);

        let overridden = Overrides {
            sieve_area: Some(0.5),
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let params = overridden.params().unwrap();
        assert_eq!(params.sieve_area, Some(0.5));
        assert_eq!(params.max_iterations, 7);
    }
}
