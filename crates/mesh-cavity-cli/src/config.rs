//! TOML configuration for the CLI.
//!
//! ```toml
//! [classify]
//! origin_offset = 1e-4
//! min_hit_distance = 0.01
//! hit_merge_tolerance = 1e-4
//! parallel = true
//!
//! [output]
//! dir = "output"
//! ascii = false
//! ```
//!
//! Every key is optional. Command-line flags override file values.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use mesh_cavity::ClassifyParams;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub classify: ClassifyParams,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory for written STL files.
    pub dir: Option<PathBuf>,

    /// Write ASCII rather than binary STL.
    pub ascii: bool,
}

impl Config {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.classify, ClassifyParams::default());
        assert!(config.output.dir.is_none());
        assert!(!config.output.ascii);
    }

    #[test]
    fn test_partial_classify_section() {
        let config = Config::parse("[classify]\nmin_hit_distance = 0.5\n").unwrap();
        assert!((config.classify.min_hit_distance - 0.5).abs() < f64::EPSILON);
        assert!((config.classify.origin_offset - 1e-4).abs() < f64::EPSILON);
        assert!(config.classify.parallel);
    }

    #[test]
    fn test_output_section() {
        let config = Config::parse("[output]\ndir = \"out\"\nascii = true\n").unwrap();
        assert_eq!(config.output.dir, Some(PathBuf::from("out")));
        assert!(config.output.ascii);
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        assert!(Config::parse("[shell]\nthickness = 2.0\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[classify]").unwrap();
        writeln!(file, "parallel = false").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert!(!config.classify.parallel);
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = Config::load(Path::new("/nonexistent/mesh-cavity.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("mesh-cavity.toml"));
    }
}
