//! Closed-form differential stress laws.
//!
//! Each law is a pure function of a [`MaterialRecord`] and the local depth,
//! temperature or strain rate. A law that does not apply to a material returns
//! `NaN` rather than an error so the envelope can treat it as non-binding.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::RheologyError;
use crate::material::MaterialRecord;

/// Gravitational acceleration in m/s².
pub const GRAVITY: f64 = 9.81;

/// Universal gas constant in J/(mol·K).
pub const GAS_CONSTANT: f64 = 8.314_472;

/// Tectonic regime selecting the Byerlee friction coefficient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeformationMode {
    /// Shortening; uses the compressional friction coefficient.
    Compression,
    /// Stretching; uses the extensional friction coefficient.
    Extension,
}

impl DeformationMode {
    /// Lowercase name as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compression => "compression",
            Self::Extension => "extension",
        }
    }
}

impl fmt::Display for DeformationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeformationMode {
    type Err = RheologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compression" => Ok(Self::Compression),
            "extension" => Ok(Self::Extension),
            other => Err(RheologyError::InvalidMode(other.to_string())),
        }
    }
}

/// Frictional (brittle) differential stress in Pa at `depth` metres.
///
/// `σ = f_f · ρ_b · g · z · (1 − f_p)`. A pore fluid factor at or above one
/// yields a non-positive stress, which is returned as is.
#[must_use]
pub fn sigma_byerlee(material: &MaterialRecord, depth: f64, mode: DeformationMode) -> f64 {
    let params = &material.byerlee;
    let friction = match mode {
        DeformationMode::Compression => params.friction_compression,
        DeformationMode::Extension => params.friction_extension,
    };
    friction * params.bulk_density * GRAVITY * depth * (1.0 - params.pore_fluid_factor)
}

/// Dislocation-creep differential stress in Pa.
///
/// `σ = (ε̇ / A_p)^(1/n) · exp(Q_p / (n·R·T))`
#[must_use]
pub fn sigma_dislocation(material: &MaterialRecord, temperature: f64, strain_rate: f64) -> f64 {
    let creep = &material.dislocation;
    let n = creep.stress_exponent;
    (strain_rate / creep.preexponential).powf(1.0 / n)
        * (creep.activation_energy / n / GAS_CONSTANT / temperature).exp()
}

/// Diffusion-creep differential stress in Pa, or `NaN` when the material does
/// not model diffusion creep.
///
/// `σ = d^m · ε̇ / A_f · exp(Q_f / (R·T))`
#[must_use]
pub fn sigma_diffusion(material: &MaterialRecord, temperature: f64, strain_rate: f64) -> f64 {
    match &material.diffusion {
        None => f64::NAN,
        Some(creep) => {
            creep.grain_size.powf(creep.grain_size_exponent) * strain_rate
                / creep.preexponential
                * (creep.activation_energy / GAS_CONSTANT / temperature).exp()
        }
    }
}

/// Low-temperature plasticity (Dorn's law) differential stress in Pa.
///
/// `σ = σ_d · (1 − sqrt(−R·T/Q_d · ln(ε̇/A_d)))`, floored at zero.
///
/// Returns `NaN` when the material has no Dorn parameters or when either the
/// activation energy or the reference strain rate is zero. A negative square
/// root argument also produces `NaN`; it is not floored.
#[must_use]
pub fn sigma_dorn(material: &MaterialRecord, temperature: f64, strain_rate: f64) -> f64 {
    let Some(dorn) = &material.dorn else {
        return f64::NAN;
    };
    if dorn.activation_energy == 0.0 || dorn.strain_rate == 0.0 {
        return f64::NAN;
    }
    let root = (-1.0 * GAS_CONSTANT * temperature / dorn.activation_energy
        * (strain_rate / dorn.strain_rate).ln())
    .sqrt();
    let stress = dorn.stress * (1.0 - root);
    if stress < 0.0 {
        0.0
    } else {
        stress
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::catalog::Catalog;
    use crate::material::DornLaw;

    fn material(name: &str) -> MaterialRecord {
        Catalog::standard()
            .lookup(name)
            .expect("tabulated material")
            .clone()
    }

    #[test]
    fn modes_parse_from_lowercase_names() {
        assert_eq!(
            "compression".parse::<DeformationMode>(),
            Ok(DeformationMode::Compression)
        );
        assert_eq!(
            "extension".parse::<DeformationMode>(),
            Ok(DeformationMode::Extension)
        );
        assert_eq!(
            "shear".parse::<DeformationMode>(),
            Err(RheologyError::InvalidMode("shear".to_string()))
        );
        assert!("Compression".parse::<DeformationMode>().is_err());
        assert_eq!(DeformationMode::Extension.to_string(), "extension");
    }

    #[test]
    fn byerlee_vanishes_at_surface() {
        for record in Catalog::standard().iter() {
            for mode in [DeformationMode::Compression, DeformationMode::Extension] {
                assert_eq!(sigma_byerlee(record, 0.0, mode), 0.0);
            }
        }
    }

    #[test]
    fn byerlee_is_linear_in_depth() {
        let granite = material("granite");
        let compression = sigma_byerlee(&granite, 10_000.0, DeformationMode::Compression);
        let expected = 2.0 * 2650.0 * 9.81 * 10_000.0 * 0.65;
        assert_relative_eq!(compression, expected, max_relative = 1.0e-12);

        let extension = sigma_byerlee(&granite, 10_000.0, DeformationMode::Extension);
        assert_relative_eq!(extension / compression, 0.75 / 2.0, max_relative = 1.0e-12);
        assert_relative_eq!(
            sigma_byerlee(&granite, 20_000.0, DeformationMode::Extension),
            2.0 * extension,
            max_relative = 1.0e-12
        );
    }

    #[test]
    fn overpressured_rock_has_negative_strength() {
        let mut granite = material("granite");
        granite.byerlee.pore_fluid_factor = 1.5;
        assert!(sigma_byerlee(&granite, 1_000.0, DeformationMode::Compression) < 0.0);
    }

    #[test]
    fn dislocation_creep_is_positive() {
        for record in Catalog::standard().iter() {
            for temperature in [300.0, 800.0, 1_600.0] {
                for strain_rate in [1.0e-18, 1.0e-15, 1.0e-10] {
                    let stress = sigma_dislocation(record, temperature, strain_rate);
                    assert!(stress > 0.0, "{} at {temperature} K", record.name);
                }
            }
        }
    }

    #[test]
    fn dislocation_matches_closed_form() {
        let peridotite = material("peridotite_dry");
        let stress = sigma_dislocation(&peridotite, 1_073.0, 1.0e-15);
        let expected = (1.0e-15_f64 / 5.011e-17).powf(1.0 / 3.5)
            * (535.0e3_f64 / (3.5 * 8.314_472 * 1_073.0)).exp();
        assert_relative_eq!(stress, expected, max_relative = 1.0e-12);
    }

    #[test]
    fn gpa_tabulated_preexponential_matches_pascal_form() {
        let granite = material("granite");
        let mut pascal_granite = granite.clone();
        pascal_granite.dislocation.preexponential = 5.0 * 10.0_f64.powf(-28.8);
        assert_relative_eq!(
            sigma_dislocation(&granite, 700.0, 1.0e-14),
            sigma_dislocation(&pascal_granite, 700.0, 1.0e-14),
            max_relative = 1.0e-10
        );
    }

    #[test]
    fn diffusion_requires_parameters() {
        assert!(sigma_diffusion(&material("granite"), 900.0, 1.0e-15).is_nan());
        let stress = sigma_diffusion(&material("peridotite_dry"), 1_073.0, 1.0e-15);
        assert!(stress.is_finite());
        assert!(stress > 0.0);
        let expected = 1.0e-4_f64.powf(2.5) * 1.0e-15 / 2.570e-11
            * (300.0e3_f64 / 8.314_472 / 1_073.0).exp();
        assert_relative_eq!(stress, expected, max_relative = 1.0e-12);
    }

    #[test]
    fn dorn_requires_parameters() {
        assert!(sigma_dorn(&material("granite"), 800.0, 1.0e-15).is_nan());
    }

    #[test]
    fn dorn_guards_zero_activation_energy_and_strain_rate() {
        let mut olivine = material("olivine_dry");
        olivine.dorn = Some(DornLaw {
            stress: 8.5e9,
            activation_energy: 0.0,
            strain_rate: 5.7e11,
        });
        assert!(sigma_dorn(&olivine, 800.0, 1.0e-15).is_nan());
        olivine.dorn = Some(DornLaw {
            stress: 8.5e9,
            activation_energy: 535e3,
            strain_rate: 0.0,
        });
        assert!(sigma_dorn(&olivine, 800.0, 1.0e-15).is_nan());
    }

    #[test]
    fn dorn_is_clamped_at_zero_when_hot() {
        let peridotite = material("peridotite_dry");
        assert_eq!(sigma_dorn(&peridotite, 2_000.0, 1.0e-15), 0.0);
    }

    #[test]
    fn dorn_is_never_negative() {
        let peridotite = material("peridotite_dry");
        for temperature in [200.0, 500.0, 800.0, 1_200.0, 3_000.0] {
            for strain_rate in [1.0e-18, 1.0e-15, 1.0e-10, 1.0e-5] {
                let stress = sigma_dorn(&peridotite, temperature, strain_rate);
                assert!(stress >= 0.0, "{stress} at {temperature} K");
            }
        }
    }

    #[test]
    fn dorn_propagates_nan_for_negative_root_argument() {
        // A strain rate above the reference rate flips the sign under the root.
        let peridotite = material("peridotite_dry");
        assert!(sigma_dorn(&peridotite, 800.0, 1.0e12).is_nan());
    }

    #[test]
    fn dorn_matches_closed_form_when_cold() {
        let peridotite = material("peridotite_dry");
        let root = (8.314_472 * 800.0 / 535.0e3 * (5.754e11_f64 / 1.0e-15).ln()).sqrt();
        let expected = 8.5e9 * (1.0 - root);
        assert!(expected > 0.0);
        assert_relative_eq!(
            sigma_dorn(&peridotite, 800.0, 1.0e-15),
            expected,
            max_relative = 1.0e-12
        );
    }
}
