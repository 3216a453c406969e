//! Run configuration for batch evaluation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::errors::{CatalogError, ConfigError};

/// Settings of one batch run.
///
/// Missing fields in a JSON document take their [`Default`] values.
///
/// # Examples
///
/// ```
/// use rheox::RunConfig;
///
/// let config: RunConfig = serde_json::from_str(r#"{"material": "granite"}"#).unwrap();
/// assert_eq!(config.material, "granite");
/// assert_eq!(config.strain_rate, 1.0e-15);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Sample table to read.
    pub input: PathBuf,
    /// Directory receiving the rheology table; created when missing.
    pub output_dir: PathBuf,
    /// File name of the rheology table inside `output_dir`.
    pub output_name: String,
    /// Catalog name of the material to evaluate.
    pub material: String,
    /// Strain rate in 1/s.
    pub strain_rate: f64,
    /// Optional JSON file of extra material records.
    pub catalog: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("input.dat"),
            output_dir: PathBuf::from("output"),
            output_name: "rheology.txt".to_string(),
            material: "peridotite_dry".to_string(),
            strain_rate: 1.0e-15,
            catalog: None,
        }
    }
}

impl RunConfig {
    /// Reads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::Json`] when it is not a valid configuration.
    pub fn from_json_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Checks that the configuration can drive a run.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for a non-positive or non-finite strain rate,
    /// an empty material name or an empty output file name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.strain_rate.is_finite() || self.strain_rate <= 0.0 {
            return Err(ConfigError::NonPositiveStrainRate(self.strain_rate));
        }
        if self.material.trim().is_empty() {
            return Err(ConfigError::EmptyMaterialName);
        }
        if self.output_name.trim().is_empty() {
            return Err(ConfigError::EmptyOutputName);
        }
        Ok(())
    }

    /// Full path of the rheology table.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_name)
    }

    /// The standard catalog, extended with the records of `catalog` when set.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] when the extra catalog cannot be read, holds
    /// an invalid record or redefines a material.
    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        Catalog::standard_with(self.catalog.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RunConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.output_path(), Path::new("output").join("rheology.txt"));
    }

    #[test]
    fn partial_documents_fill_defaults() {
        let config: RunConfig =
            serde_json::from_str(r#"{"strain_rate": 1e-14, "output_dir": "runs"}"#)
                .expect("valid json");
        assert_eq!(config.strain_rate, 1.0e-14);
        assert_eq!(config.output_dir, PathBuf::from("runs"));
        assert_eq!(config.material, "peridotite_dry");
        assert_eq!(config.catalog, None);
    }

    #[test]
    fn rejects_bad_strain_rates() {
        for strain_rate in [0.0, -1.0e-15, f64::NAN, f64::INFINITY] {
            let config = RunConfig {
                strain_rate,
                ..RunConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::NonPositiveStrainRate(_))
            ));
        }
    }

    #[test]
    fn rejects_empty_names() {
        let config = RunConfig {
            material: "  ".to_string(),
            ..RunConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyMaterialName)));

        let config = RunConfig {
            output_name: String::new(),
            ..RunConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyOutputName)));
    }

    #[test]
    fn rejects_malformed_json() {
        let error = serde_json::from_str::<RunConfig>(r#"{"strain_rate": "fast"}"#);
        assert!(error.is_err());
    }

    #[test]
    fn standard_catalog_without_extra_file() {
        let catalog = RunConfig::default().load_catalog().expect("standard catalog");
        assert_eq!(catalog.len(), Catalog::standard().len());
    }
}
