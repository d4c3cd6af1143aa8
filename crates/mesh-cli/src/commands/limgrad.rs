//! `limgrad`: cap the slope of the vertex scalar field.

use std::fmt;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use mesh_topology::{max_edge_gradient, LimgradParams, LimgradReport};

use crate::output;
use crate::OutputFormat;

#[derive(Serialize)]
struct LimgradOutput<'a> {
    input: &'a Path,
    output: &'a Path,
    params: &'a LimgradParams,
    #[serde(flatten)]
    report: &'a LimgradReport,
    max_gradient: Option<f64>,
}

impl fmt::Display for LimgradOutput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Gradient limit of {}:", self.input.display())?;
        writeln!(f, "  dfdx: {} (imax {})", self.params.dfdx, self.params.imax)?;
        writeln!(
            f,
            "  Passes: {} ({} lowering)",
            self.report.passes, self.report.iterations
        )?;
        writeln!(
            f,
            "  Values lowered: {} (max decrease {:.4})",
            self.report.vertices_lowered, self.report.max_decrease
        )?;
        if let Some(gradient) = self.max_gradient {
            writeln!(f, "  Max gradient: {:.4}", gradient)?;
        }
        Ok(())
    }
}

pub fn run(
    input: &Path,
    output_path: &Path,
    dfdx: f64,
    imax: usize,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let mut mesh = super::load(input)?;
    let params = LimgradParams::new(dfdx).with_imax(imax);
    let report = mesh
        .limit_gradient(&params)
        .with_context(|| format!("gradient limiting failed for {}", input.display()))?;
    super::save(&mesh, output_path)?;

    output::report(
        &LimgradOutput {
            input,
            output: output_path,
            params: &params,
            report: &report,
            max_gradient: max_edge_gradient(&mesh),
        },
        format,
        quiet,
    )?;
    output::success(&format!("Wrote {}", output_path.display()), format, quiet);
    Ok(())
}
