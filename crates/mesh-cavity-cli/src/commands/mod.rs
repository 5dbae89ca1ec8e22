//! CLI command implementations.

pub mod extract;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use mesh_cavity::{audit, load_stl, IndexedMesh, QualityReport};

/// Re-read an STL file from disk and audit it.
pub(crate) fn audit_file(path: &Path) -> Result<QualityReport> {
    let soup = load_stl(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(audit(&IndexedMesh::build(&soup)))
}
