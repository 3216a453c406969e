use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use rheox::{Catalog, RunConfig};

/// Arguments of the `run` subcommand.
///
/// Every flag is optional and overrides the matching field of `--config`,
/// which in turn overrides the defaults of [`RunConfig`].
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct RunArgs {
    /// JSON run configuration
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Sample table to read
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Directory receiving the rheology table
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// File name of the rheology table
    #[arg(long)]
    pub output_name: Option<String>,
    /// Catalog name of the material
    #[arg(short, long)]
    pub material: Option<String>,
    /// Strain rate in 1/s
    #[arg(short, long)]
    pub strain_rate: Option<f64>,
    /// JSON file of extra materials
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

impl RunArgs {
    /// Build the run configuration from the optional file and the flags.
    pub fn resolve(&self) -> anyhow::Result<RunConfig> {
        let base = match &self.config {
            Some(path) => RunConfig::from_json_path(path)
                .with_context(|| format!("loading configuration {}", path.display()))?,
            None => RunConfig::default(),
        };
        let config = self.apply(base);
        config.validate()?;
        Ok(config)
    }

    /// Overwrite the fields of `config` that were given on the command line.
    fn apply(&self, mut config: RunConfig) -> RunConfig {
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(output_name) = &self.output_name {
            config.output_name = output_name.clone();
        }
        if let Some(material) = &self.material {
            config.material = material.clone();
        }
        if let Some(strain_rate) = self.strain_rate {
            config.strain_rate = strain_rate;
        }
        if let Some(catalog) = &self.catalog {
            config.catalog = Some(catalog.clone());
        }
        config
    }
}

/// The standard catalog, extended with the records in `extra` when given.
pub fn load_catalog(extra: Option<&Path>) -> anyhow::Result<Catalog> {
    Catalog::standard_with(extra).with_context(|| match extra {
        Some(path) => format!("loading catalog {}", path.display()),
        None => "loading the standard catalog".to_string(),
    })
}
