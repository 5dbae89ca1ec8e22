//! `validate`: quality report for a single STL file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use mesh_cavity::QualityReport;

use super::audit_file;
use crate::output;
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// STL file to audit
    pub input: PathBuf,
}

#[derive(Debug, Serialize)]
struct ValidateSummary<'a> {
    input: &'a PathBuf,
    report: &'a QualityReport,
}

pub fn run(args: &ValidateArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let report = audit_file(&args.input)?;

    output::heading("Geometry quality report", format, quiet);
    output::info(&format!("--- {} ---", args.input.display()), format, quiet);
    output::info(report.to_string().trim_end(), format, quiet);

    output::print(
        &ValidateSummary {
            input: &args.input,
            report: &report,
        },
        format,
        quiet,
    );

    Ok(())
}
