use std::fmt::{self, Write};

use rheox::units::pascals_to_megapascals;
use rheox::{Catalog, RunSummary};

use crate::analysis::PointSummary;

/// Render the laws and envelope of a point evaluation. Stresses are in MPa.
pub fn render_point(summary: &PointSummary) -> Result<String, fmt::Error> {
    let mut output = String::new();
    let mpa = pascals_to_megapascals;

    // State where and how fast the rock is deforming before any numbers.
    writeln!(
        &mut output,
        "{} at {:.2} km, {:.1} °C, strain rate {:e} 1/s",
        summary.material, summary.depth_km, summary.temperature_c, summary.strain_rate
    )?;
    // Brittle strength depends on the regime; the creep laws do not.
    writeln!(
        &mut output,
        "Byerlee: compression = {:.3} MPa, extension = {:.3} MPa",
        mpa(summary.byerlee_compression),
        mpa(summary.byerlee_extension)
    )?;
    writeln!(
        &mut output,
        "Creep: dislocation = {:.3} MPa, diffusion = {}, dorn = {}",
        mpa(summary.dislocation),
        optional_stress(summary.diffusion),
        optional_stress(summary.dorn)
    )?;
    // The envelope only draws on the mechanisms that were requested.
    let mechanisms: Vec<&str> = summary.mechanisms.iter().map(|m| m.as_str()).collect();
    writeln!(
        &mut output,
        "Envelope ({}): dsigma_c = {:.3} MPa, dsigma_e = {:.3} MPa",
        mechanisms.join(", "),
        mpa(summary.stresses.compression),
        mpa(summary.stresses.extension)
    )?;
    writeln!(
        &mut output,
        "Effective viscosity: 10^{:.3} Pa s",
        summary.log10_viscosity
    )?;

    Ok(output)
}

/// A law value in MPa, or a marker when the material does not model it.
fn optional_stress(stress: f64) -> String {
    if stress.is_nan() {
        "n/a".to_string()
    } else {
        format!("{:.3} MPa", pascals_to_megapascals(stress))
    }
}

/// Render one line per catalog record: name, alternative name and the
/// optional laws it carries.
pub fn render_materials(catalog: &Catalog) -> Result<String, fmt::Error> {
    let mut output = String::new();
    for record in catalog.iter() {
        let mut laws = vec!["byerlee", "dislocation"];
        if record.diffusion.is_some() {
            laws.push("diffusion");
        }
        if record.dorn.is_some() {
            laws.push("dorn");
        }
        writeln!(
            &mut output,
            "{:<24} {:<40} {}",
            record.name,
            record.provenance.altname,
            laws.join(",")
        )?;
    }
    Ok(output)
}

/// Render the outcome of a batch run.
pub fn render_run(summary: &RunSummary) -> Result<String, fmt::Error> {
    let mut output = String::new();
    write!(
        &mut output,
        "Evaluated {} samples of {}; results written to {}",
        summary.rows,
        summary.material,
        summary.output_path.display()
    )?;
    Ok(output)
}
