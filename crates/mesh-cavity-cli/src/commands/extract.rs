//! `extract`: write the solid and its fluid cavity, then audit both files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use mesh_cavity::{
    audit, extract_fluid, load_stl, save_soup, volume_from_file, ClassifyParams, CleanReport,
    IndexedMesh, QualityReport, StlEncoding, TriangleSoup,
};

use super::audit_file;
use crate::config::Config;
use crate::output;
use crate::OutputFormat;

const DEFAULT_OUTPUT_DIR: &str = "output";
const SOLID_FILE: &str = "solid_volume.stl";
const FLUID_FILE: &str = "fluid_volume.stl";
const INTERIOR_FILE: &str = "interior_facets.stl";

#[derive(Args, Debug, Default)]
pub struct ExtractArgs {
    /// Input STL file (ASCII or binary)
    pub input: PathBuf,

    /// Directory for output files [default: output]
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Write ASCII STL instead of binary. ASCII was the default output of
    /// the earlier release of this tool; binary is the default now.
    #[arg(long)]
    pub ascii: bool,

    /// TOML config file with [classify] and [output] sections
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Distance the ray origin is pushed off each facet
    #[arg(long)]
    pub origin_offset: Option<f64>,

    /// Ignore ray hits closer than this
    #[arg(long)]
    pub min_hit_distance: Option<f64>,

    /// Merge ray hits closer together than this
    #[arg(long)]
    pub hit_merge_tolerance: Option<f64>,

    /// Classify facets on a single thread
    #[arg(long)]
    pub sequential: bool,

    /// Also write the classified cavity walls before capping
    #[arg(long)]
    pub write_interior: bool,
}

impl ExtractArgs {
    /// Merge file config and flags into classifier parameters.
    fn classify_params(&self, config: &Config) -> Result<ClassifyParams> {
        let mut params = config.classify.clone();
        if let Some(v) = self.origin_offset {
            params = params.origin_offset(v);
        }
        if let Some(v) = self.min_hit_distance {
            params = params.min_hit_distance(v);
        }
        if let Some(v) = self.hit_merge_tolerance {
            params = params.hit_merge_tolerance(v);
        }
        if self.sequential {
            params = params.parallel(false);
        }
        params.validate()?;
        Ok(params)
    }
}

#[derive(Debug, Serialize)]
struct ExtractSummary {
    input: PathBuf,
    solid_path: PathBuf,
    fluid_path: PathBuf,
    solid_volume: f64,
    fluid_volume: f64,
    interior_facets: usize,
    cap_count: usize,
    clean: CleanReport,
    solid: QualityReport,
    fluid: QualityReport,
}

pub fn run(args: &ExtractArgs, format: OutputFormat, quiet: bool) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let params = args.classify_params(&config)?;

    let out_dir = args
        .output_dir
        .clone()
        .or_else(|| config.output.dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("cannot create output directory {}", out_dir.display()))?;

    let encoding = if args.ascii || config.output.ascii {
        StlEncoding::Ascii
    } else {
        StlEncoding::Binary
    };

    let soup = load_stl(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let solid = IndexedMesh::build(&soup);

    let solid_path = out_dir.join(SOLID_FILE);
    write(&solid.to_soup(), &solid_path, encoding)?;
    let solid_volume = solid.volume();

    let fluid = extract_fluid(&solid, &params)?;
    let fluid_path = out_dir.join(FLUID_FILE);
    write(&fluid.soup, &fluid_path, encoding)?;

    if args.write_interior {
        let walls: TriangleSoup = fluid.interior_facets.iter().map(|&i| solid.facet(i)).collect();
        write(&walls, &out_dir.join(INTERIOR_FILE), encoding)?;
    }

    // An empty fluid file cannot be re-read, so audit the empty mesh directly.
    let (fluid_volume, fluid_report) = if fluid.is_empty() {
        output::warning("No enclosed cavity found", format, quiet);
        (0.0, audit(&IndexedMesh::default()))
    } else {
        let volume = volume_from_file(&fluid_path)
            .with_context(|| format!("failed to compute volume of {}", fluid_path.display()))?;
        (volume, audit_file(&fluid_path)?)
    };
    let solid_report = audit_file(&solid_path)?;

    output::info(&format!("Solid geometry volume: {solid_volume:.10}"), format, quiet);
    output::info(&format!("Fluid geometry volume: {fluid_volume:.10}"), format, quiet);
    output::info(
        &format!("Output: {}, {}", solid_path.display(), fluid_path.display()),
        format,
        quiet,
    );
    output::info("", format, quiet);
    output::heading("Geometry quality report", format, quiet);
    print_report("Solid", &solid_path, &solid_report, format, quiet);
    print_report("Fluid", &fluid_path, &fluid_report, format, quiet);

    if fluid_report.watertight.is_watertight {
        output::success("Fluid cavity is watertight", format, quiet);
    } else if !fluid.is_empty() {
        output::warning("Fluid cavity is not watertight", format, quiet);
    }

    output::print(
        &ExtractSummary {
            input: args.input.clone(),
            solid_path,
            fluid_path,
            solid_volume,
            fluid_volume,
            interior_facets: fluid.interior_facets.len(),
            cap_count: fluid.cap_count,
            clean: fluid.clean,
            solid: solid_report,
            fluid: fluid_report,
        },
        format,
        quiet,
    );

    Ok(())
}

fn write(soup: &TriangleSoup, path: &Path, encoding: StlEncoding) -> Result<()> {
    save_soup(soup, path, encoding).with_context(|| format!("failed to write {}", path.display()))
}

fn print_report(label: &str, path: &Path, report: &QualityReport, format: OutputFormat, quiet: bool) {
    output::info(&format!("--- {label} ({}) ---", path.display()), format, quiet);
    output::info(report.to_string().trim_end(), format, quiet);
    output::info("", format, quiet);
}
