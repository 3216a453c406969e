//! Reading sample tables and writing rheology tables.
//!
//! A sample table is comma separated text with one point per row. Everything
//! after a `#` is a comment and lines left blank are skipped. Only two
//! columns are consumed: depth in kilometres (column 2) and temperature in
//! degrees Celsius (column 4). Every other column is carried through to the
//! output untouched.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use chrono::NaiveDate;
use ndarray::{s, Array2, ArrayView1, Axis};
use tracing::debug;

use crate::envelope::compute_dsigma;
use crate::errors::{RheologyError, TableError};
use crate::material::MaterialRecord;
use crate::units::{celsius_to_kelvin, kilometres_to_metres};
use crate::viscosity::effective_viscosity;

/// Zero-based column holding depth in km.
pub const DEPTH_COLUMN: usize = 2;

/// Zero-based column holding temperature in °C.
pub const TEMPERATURE_COLUMN: usize = 4;

/// Minimum number of columns a sample row must carry.
pub const REQUIRED_COLUMNS: usize = TEMPERATURE_COLUMN + 1;

/// Column legend written above the numeric block of a rheology table.
pub const OUTPUT_COLUMNS: &str = "#x(km) y(km) depth(km) Pressure(bar) Temperature(oC) \
Density(kg/m3) Vp(km/s) Vs(km/s) Vs_diff(%) Pseudo-melts(%) dsigma_c(Pascal) \
dsigma_e(Pascal) Viscosity(log10Pas)";

/// Input samples held as a dense row-major matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleTable {
    /// One row per sample.
    data: Array2<f64>,
}

impl SampleTable {
    /// Wraps an existing matrix of samples.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Empty`] for a matrix without rows and
    /// [`TableError::TooFewColumns`] when depth or temperature is missing.
    pub fn from_array(data: Array2<f64>) -> Result<Self, TableError> {
        if data.nrows() == 0 {
            return Err(TableError::Empty);
        }
        if data.ncols() < REQUIRED_COLUMNS {
            return Err(TableError::TooFewColumns {
                row: 1,
                found: data.ncols(),
                required: REQUIRED_COLUMNS,
            });
        }
        Ok(Self { data })
    }

    /// Parses comma separated samples from `reader`.
    ///
    /// Fields may be padded with whitespace. Text after `#` is dropped and
    /// lines that end up blank are skipped.
    ///
    /// # Errors
    ///
    /// Returns a [`TableError`] when the text cannot be tokenised, a field is
    /// not a number, rows are ragged or too short, or no rows remain.
    ///
    /// # Examples
    ///
    /// ```
    /// use rheox::SampleTable;
    ///
    /// let text = "# x,y,depth,p,T\n0,0,10,0,300\n0,0,20,0,450 # moho\n";
    /// let table = SampleTable::from_reader(text.as_bytes()).unwrap();
    /// assert_eq!(table.len(), 2);
    /// assert_eq!(table.sample(1).depth_km(), 20.0);
    /// ```
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut data_lines = String::new();
        for line in BufReader::new(reader).lines() {
            let line = line?;
            let content = strip_comment(&line);
            if !content.is_empty() {
                data_lines.push_str(content);
                data_lines.push('\n');
            }
        }

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(data_lines.as_bytes());

        let mut values = Vec::new();
        let mut width = None;
        let mut rows = 0;
        for record in csv_reader.records() {
            let record = record?;
            rows += 1;
            let expected = *width.get_or_insert(record.len());
            if record.len() != expected {
                return Err(TableError::RaggedRow {
                    row: rows,
                    found: record.len(),
                    expected,
                });
            }
            if record.len() < REQUIRED_COLUMNS {
                return Err(TableError::TooFewColumns {
                    row: rows,
                    found: record.len(),
                    required: REQUIRED_COLUMNS,
                });
            }
            for (column, field) in record.iter().enumerate() {
                let value = field
                    .parse::<f64>()
                    .map_err(|_| TableError::InvalidNumber {
                        row: rows,
                        column,
                        value: field.to_string(),
                    })?;
                values.push(value);
            }
        }

        let width = width.ok_or(TableError::Empty)?;
        Self::from_array(Array2::from_shape_vec((rows, width), values)?)
    }

    /// Reads a sample table from the file at `path`.
    ///
    /// # Errors
    ///
    /// See [`SampleTable::from_reader`]; opening the file may also fail.
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        Self::from_reader(File::open(path)?)
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    /// `true` when the table has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    /// Number of columns per sample.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.data.ncols()
    }

    /// Borrow the raw matrix.
    #[must_use]
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// Sample at row `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn sample(&self, index: usize) -> Sample<'_> {
        Sample {
            values: self.data.row(index),
        }
    }

    /// Iterate over the samples in row order.
    pub fn samples(&self) -> impl Iterator<Item = Sample<'_>> + '_ {
        self.data.rows().into_iter().map(|values| Sample { values })
    }

    /// Evaluates every sample against `material` at `strain_rate` and appends
    /// the compressional stress, extensional stress and log10 viscosity
    /// columns.
    ///
    /// # Errors
    ///
    /// Returns [`RheologyError::InvalidDepth`] when a sample lies above the
    /// surface.
    pub fn evaluate(
        &self,
        material: &MaterialRecord,
        strain_rate: f64,
    ) -> Result<RheologyTable, RheologyError> {
        let columns = self.columns();
        let mut data = Array2::<f64>::zeros((self.len(), columns + 3));
        data.slice_mut(s![.., ..columns]).assign(&self.data);

        for (index, (sample, mut row)) in self
            .samples()
            .zip(data.axis_iter_mut(Axis(0)))
            .enumerate()
        {
            let result = evaluate_sample(material, &sample, strain_rate)?;
            debug!(
                row = index + 1,
                depth_km = sample.depth_km(),
                temperature_c = sample.temperature_celsius(),
                compression = result.compression_stress,
                extension = result.extension_stress,
                log10_viscosity = result.log10_viscosity,
                "evaluated sample"
            );
            row[columns] = result.compression_stress;
            row[columns + 1] = result.extension_stress;
            row[columns + 2] = result.log10_viscosity;
        }

        Ok(RheologyTable { data })
    }
}

/// The part of `line` before any `#`, without surrounding whitespace.
fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(data, _)| data).trim()
}

/// One row of a [`SampleTable`].
#[derive(Clone, Debug)]
pub struct Sample<'a> {
    /// Every column of the row.
    values: ArrayView1<'a, f64>,
}

impl Sample<'_> {
    /// Depth below the surface in km.
    #[must_use]
    pub fn depth_km(&self) -> f64 {
        self.values[DEPTH_COLUMN]
    }

    /// Depth below the surface in m.
    #[must_use]
    pub fn depth_m(&self) -> f64 {
        kilometres_to_metres(self.depth_km())
    }

    /// Temperature in °C.
    #[must_use]
    pub fn temperature_celsius(&self) -> f64 {
        self.values[TEMPERATURE_COLUMN]
    }

    /// Temperature in K.
    #[must_use]
    pub fn temperature_kelvin(&self) -> f64 {
        celsius_to_kelvin(self.temperature_celsius())
    }

    /// Every column of the row.
    #[must_use]
    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }
}

/// Rheology of a single sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EvaluationResult {
    /// Signed compressional differential stress in Pa (non-positive).
    pub compression_stress: f64,
    /// Extensional differential stress in Pa.
    pub extension_stress: f64,
    /// Base-10 logarithm of the effective viscosity in Pa·s.
    pub log10_viscosity: f64,
}

/// Evaluates the stress envelope and effective viscosity of one sample.
///
/// # Errors
///
/// Returns [`RheologyError::InvalidDepth`] when the sample lies above the
/// surface.
pub fn evaluate_sample(
    material: &MaterialRecord,
    sample: &Sample<'_>,
    strain_rate: f64,
) -> Result<EvaluationResult, RheologyError> {
    let temperature = sample.temperature_kelvin();
    let stresses = compute_dsigma(material, sample.depth_m(), temperature, strain_rate)?;
    let viscosity = effective_viscosity(material, temperature, strain_rate);
    Ok(EvaluationResult {
        compression_stress: stresses.compression,
        extension_stress: stresses.extension,
        log10_viscosity: viscosity.log10(),
    })
}

/// Metadata written above a rheology table.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputHeader {
    /// Date the table was produced.
    pub created: NaiveDate,
    /// Name of the sample table that was read.
    pub input: String,
    /// Name of the file being written.
    pub output: String,
    /// Material the samples were evaluated against.
    pub material: String,
    /// Strain rate in 1/s.
    pub strain_rate: f64,
}

impl OutputHeader {
    /// Writes the comment block, ending with the column legend.
    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "#Created on: {}", self.created)?;
        writeln!(writer, "#Input file is: {}", self.input)?;
        writeln!(writer, "#Output file is: {}", self.output)?;
        writeln!(writer, "#Material is: {}", self.material)?;
        writeln!(writer, "#Strain rate is :{}", format_shortest(self.strain_rate))?;
        writeln!(writer, "#")?;
        writeln!(writer, "{OUTPUT_COLUMNS}")
    }
}

/// Samples with the rheology columns appended.
#[derive(Clone, Debug, PartialEq)]
pub struct RheologyTable {
    /// Input columns followed by the three rheology columns.
    data: Array2<f64>,
}

impl RheologyTable {
    /// Borrow the raw matrix, input columns first.
    #[must_use]
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    /// `true` when the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    /// Writes `header` followed by one comma separated line per row, each
    /// value right aligned in ten characters with three decimals.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Io`] when the writer fails.
    pub fn write<W: Write>(&self, writer: &mut W, header: &OutputHeader) -> Result<(), TableError> {
        header.write(writer)?;
        for row in self.data.rows() {
            let line = row
                .iter()
                .map(|&value| format_fixed(value))
                .collect::<Vec<_>>()
                .join(",");
            writeln!(writer, "{line}")?;
        }
        Ok(())
    }
}

/// Shortest round-trip form of `value`.
///
/// Plain decimals are used for magnitudes in `[1e-4, 1e16)` and always carry a
/// fractional part (`0.001`, `12.0`). Outside that range the exponent is signed
/// and at least two digits wide (`1e-05`, `2.5e-15`, `1e+16`).
fn format_shortest(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific
        .split_once('e')
        .and_then(|(mantissa, exponent)| Some((mantissa, exponent.parse::<i32>().ok()?)))
        .unwrap_or((scientific.as_str(), 0));
    if (-4..16).contains(&exponent) {
        let plain = value.to_string();
        if plain.contains('.') {
            plain
        } else {
            format!("{plain}.0")
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}

/// `value` right aligned in ten characters with three decimals; non-finite
/// values are spelled `nan`, `inf` and `-inf`.
fn format_fixed(value: f64) -> String {
    if value.is_nan() {
        format!("{:>10}", "nan")
    } else if value.is_infinite() {
        format!("{:>10}", if value > 0.0 { "inf" } else { "-inf" })
    } else {
        format!("{value:10.3}")
    }
}
