//! Error types produced while building catalogs or evaluating rheologies.

use thiserror::Error;

/// Error returned when a rheology evaluation is asked something it cannot answer.
///
/// Every variant is a local contract violation. Numeric trouble inside a law
/// (a negative square root argument, a guarded division by zero) is never
/// reported here; it travels as `NaN` instead.
///
/// # Examples
///
/// ```
/// use rheox::{Catalog, RheologyError};
///
/// let catalog = Catalog::standard();
/// let error = catalog.lookup("basalt").expect_err("basalt is not tabulated");
/// assert_eq!(error, RheologyError::UnknownMaterial("basalt".to_string()));
/// ```
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RheologyError {
    /// Returned when no catalog record carries the requested name.
    #[error("material `{0}` is not in the catalog")]
    UnknownMaterial(String),
    /// Returned when the deformation mode is neither compression nor extension.
    #[error("invalid deformation mode `{0}`; expected `compression` or `extension`")]
    InvalidMode(String),
    /// Returned when a depth above the surface is supplied.
    #[error("depth must be positive (received {0} m)")]
    InvalidDepth(f64),
    /// Returned when a creep mechanism name is not recognised.
    #[error("unknown creep mechanism `{0}`; expected `dislocation`, `diffusion` or `dorn`")]
    UnknownMechanism(String),
    /// Returned when the envelope is evaluated without a strain rate.
    #[error("no strain rate was supplied")]
    MissingStrainRate,
}

/// Error returned when a material record carries physically meaningless parameters.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MaterialPropertyError {
    /// Returned when a parameter that must be strictly positive is not.
    #[error("material `{material}`: {property} must be positive (received {value})")]
    NonPositive {
        /// Name of the offending material.
        material: String,
        /// Name of the rejected parameter.
        property: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// Returned when the dislocation-creep stress exponent is not above one.
    #[error("material `{material}`: stress exponent must exceed 1 (received {value})")]
    StressExponentTooSmall {
        /// Name of the offending material.
        material: String,
        /// Rejected exponent.
        value: f64,
    },
    /// Returned when an activation energy is negative.
    #[error("material `{material}`: {property} must not be negative (received {value})")]
    NegativeActivationEnergy {
        /// Name of the offending material.
        material: String,
        /// Name of the rejected parameter.
        property: &'static str,
        /// Rejected value in J/mol.
        value: f64,
    },
}

/// Error returned when assembling a [`Catalog`](crate::Catalog) from user data.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Returned when two records share a name.
    #[error("material `{0}` is defined more than once")]
    DuplicateMaterial(String),
    /// Returned when a record fails validation.
    #[error(transparent)]
    InvalidMaterial(#[from] MaterialPropertyError),
    /// Returned when the catalog document is not valid JSON for a record list.
    #[error("malformed catalog document: {0}")]
    Json(#[from] serde_json::Error),
    /// Returned when the catalog file cannot be read.
    #[error("cannot read catalog: {0}")]
    Io(#[from] std::io::Error),
}

/// Error returned when reading or writing a sample table.
#[derive(Debug, Error)]
pub enum TableError {
    /// Returned when the underlying file cannot be opened, read or written.
    #[error("table i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// Returned when the delimited text cannot be tokenised.
    #[error("malformed delimited text: {0}")]
    Csv(#[from] csv::Error),
    /// Returned when a field is not a number.
    #[error("row {row}, column {column}: `{value}` is not a number")]
    InvalidNumber {
        /// One-based data row (comment lines are not counted).
        row: usize,
        /// Zero-based column.
        column: usize,
        /// Offending text.
        value: String,
    },
    /// Returned when a row is too short to carry depth and temperature.
    #[error("row {row} has {found} columns but at least {required} are needed")]
    TooFewColumns {
        /// One-based data row.
        row: usize,
        /// Number of columns present.
        found: usize,
        /// Minimum number of columns.
        required: usize,
    },
    /// Returned when a row's column count differs from the first row's.
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        /// One-based data row.
        row: usize,
        /// Number of columns present.
        found: usize,
        /// Column count of the first row.
        expected: usize,
    },
    /// Returned when the parsed values cannot be arranged into a table.
    #[error("values do not form a rectangular table: {0}")]
    Shape(#[from] ndarray::ShapeError),
    /// Returned when the input holds no data rows.
    #[error("the table contains no data rows")]
    Empty,
}

/// Error returned when a run configuration is not usable.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Returned when the strain rate is zero, negative or not finite.
    #[error("strain rate must be positive and finite (received {0})")]
    NonPositiveStrainRate(f64),
    /// Returned when no material name is configured.
    #[error("material name must not be empty")]
    EmptyMaterialName,
    /// Returned when no output file name is configured.
    #[error("output file name must not be empty")]
    EmptyOutputName,
    /// Returned when the configuration document is not valid JSON.
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
    /// Returned when the configuration file cannot be read.
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Error returned by the batch entry point.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The run configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The user catalog could not be merged.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// The sample table could not be read or written.
    #[error(transparent)]
    Table(#[from] TableError),
    /// A sample could not be evaluated.
    #[error(transparent)]
    Rheology(#[from] RheologyError),
}
