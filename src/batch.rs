//! Batch evaluation of a sample table against one material.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::errors::{BatchError, TableError};
use crate::table::{OutputHeader, SampleTable};

/// What a completed run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    /// Path of the written rheology table.
    pub output_path: PathBuf,
    /// Material the samples were evaluated against.
    pub material: String,
    /// Number of samples evaluated.
    pub rows: usize,
}

/// Reads `config.input`, evaluates every sample against `config.material`
/// and writes the rheology table into `config.output_dir`.
///
/// The material is looked up in the standard catalog, extended with the
/// records of `config.catalog` when set.
///
/// The output directory is created when missing; an existing table of the
/// same name is overwritten. `created` is recorded in the table header.
///
/// # Errors
///
/// Returns a [`BatchError`] when the configuration is invalid, the extra
/// catalog cannot be merged, the material is unknown, the sample table cannot
/// be read, a sample lies above the surface or the output cannot be written.
/// No file is written unless the failure is in the last step.
pub fn run(config: &RunConfig, created: NaiveDate) -> Result<RunSummary, BatchError> {
    config.validate()?;
    let catalog = config.load_catalog()?;
    info!(materials = catalog.len(), "catalog loaded");
    let material = catalog.lookup(&config.material)?;

    info!(input = %config.input.display(), "reading samples");
    let samples = SampleTable::from_path(&config.input)?;
    info!(
        rows = samples.len(),
        columns = samples.columns(),
        material = %material.name,
        strain_rate = config.strain_rate,
        "evaluating rheology"
    );
    let result = samples.evaluate(material, config.strain_rate)?;

    if config.output_dir.is_dir() {
        warn!(
            directory = %config.output_dir.display(),
            "output directory exists, files in it may be overwritten"
        );
    } else {
        info!(directory = %config.output_dir.display(), "creating output directory");
        fs::create_dir_all(&config.output_dir).map_err(TableError::from)?;
    }

    let output_path = config.output_path();
    let header = OutputHeader {
        created,
        input: config.input.display().to_string(),
        output: config.output_name.clone(),
        material: material.name.clone(),
        strain_rate: config.strain_rate,
    };
    let mut writer = BufWriter::new(File::create(&output_path).map_err(TableError::from)?);
    result.write(&mut writer, &header)?;
    writer.flush().map_err(TableError::from)?;
    info!(output = %output_path.display(), "rheology table written");

    Ok(RunSummary {
        output_path,
        material: material.name.clone(),
        rows: result.len(),
    })
}
