//! Strength envelope: the governing differential stress among competing
//! deformation mechanisms.

use std::fmt;
use std::str::FromStr;

use num::Float;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::RheologyError;
use crate::laws::{
    sigma_byerlee, sigma_diffusion, sigma_dislocation, sigma_dorn, DeformationMode,
};
use crate::material::MaterialRecord;

/// Dislocation-creep stress in Pa above which Dorn's law takes over.
pub const DORN_TRANSITION_STRESS: f64 = 200.0e6;

/// Ductile mechanism that may bound the envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mechanism {
    /// Power-law dislocation creep.
    Dislocation,
    /// Grain-size sensitive diffusion creep.
    Diffusion,
    /// Low-temperature plasticity.
    Dorn,
}

impl Mechanism {
    /// Mechanisms evaluated when the caller does not choose.
    pub const DEFAULT: [Mechanism; 2] = [Mechanism::Dislocation, Mechanism::Dorn];

    /// Lowercase name as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dislocation => "dislocation",
            Self::Diffusion => "diffusion",
            Self::Dorn => "dorn",
        }
    }

    /// Parse every name in `names`.
    ///
    /// # Errors
    ///
    /// Returns [`RheologyError::UnknownMechanism`] for the first unrecognised name.
    pub fn parse_all<I, S>(names: I) -> Result<Vec<Mechanism>, RheologyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().map(|name| name.as_ref().parse()).collect()
    }
}

impl fmt::Display for Mechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mechanism {
    type Err = RheologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dislocation" => Ok(Self::Dislocation),
            "diffusion" => Ok(Self::Diffusion),
            "dorn" => Ok(Self::Dorn),
            other => Err(RheologyError::UnknownMechanism(other.to_string())),
        }
    }
}

/// Minimum of `values` taken strictly left to right.
///
/// The first element seeds the result and a later element replaces it only when
/// it compares less. Because every comparison with `NaN` is false, a leading
/// `NaN` is returned unchanged while a `NaN` in any later position is skipped.
/// An empty slice yields `NaN`.
///
/// # Examples
/// ```
/// use rheox::ordered_min;
///
/// assert_eq!(ordered_min(&[3.0, 1.0, 2.0]), 1.0);
/// assert_eq!(ordered_min(&[3.0, f64::NAN, 2.0]), 2.0);
/// assert!(ordered_min(&[f64::NAN, 1.0]).is_nan());
/// ```
#[must_use]
pub fn ordered_min<T: Float>(values: &[T]) -> T {
    let Some((&first, rest)) = values.split_first() else {
        return T::nan();
    };
    rest.iter().fold(first, |current, &candidate| {
        if candidate < current {
            candidate
        } else {
            current
        }
    })
}

/// Governing differential stress in Pa for one material at one point.
///
/// Evaluates Byerlee's law for `mode` and every mechanism in `compute` (by
/// default [`Mechanism::DEFAULT`]) that the material has parameters for. When
/// dislocation creep exceeds [`DORN_TRANSITION_STRESS`] and Dorn's law gives a
/// positive stress, Dorn's law replaces dislocation creep. The result is the
/// [`ordered_min`] of Byerlee, the selected creep stress and diffusion creep,
/// in that order.
///
/// `depth` is in metres below the surface and `temperature` in kelvin.
///
/// # Errors
///
/// Returns [`RheologyError::InvalidDepth`] for a negative depth,
/// [`RheologyError::MissingStrainRate`] when `strain_rate` is `None` and
/// [`RheologyError::InvalidMode`] when `mode` is `None`, checked in that order.
pub fn sigma_d(
    material: &MaterialRecord,
    depth: f64,
    temperature: f64,
    strain_rate: Option<f64>,
    compute: Option<&[Mechanism]>,
    mode: Option<DeformationMode>,
) -> Result<f64, RheologyError> {
    if depth < 0.0 {
        return Err(RheologyError::InvalidDepth(depth));
    }
    let strain_rate = strain_rate.ok_or(RheologyError::MissingStrainRate)?;
    let compute = compute.unwrap_or(&Mechanism::DEFAULT);
    let mode = mode.ok_or_else(|| RheologyError::InvalidMode(String::new()))?;

    let byerlee = sigma_byerlee(material, depth, mode);

    let diffusion = if compute.contains(&Mechanism::Diffusion) && material.diffusion.is_some() {
        sigma_diffusion(material, temperature, strain_rate)
    } else {
        f64::NAN
    };
    let dislocation = if compute.contains(&Mechanism::Dislocation) {
        sigma_dislocation(material, temperature, strain_rate)
    } else {
        f64::NAN
    };
    let dorn = if compute.contains(&Mechanism::Dorn) && material.dorn.is_some() {
        sigma_dorn(material, temperature, strain_rate)
    } else {
        f64::NAN
    };

    let creep = if dislocation > DORN_TRANSITION_STRESS && dorn > 0.0 {
        debug!(
            material = %material.name,
            dislocation,
            dorn,
            "Dorn's law replaces dislocation creep"
        );
        dorn
    } else {
        dislocation
    };

    Ok(ordered_min(&[byerlee, creep, diffusion]))
}

/// Signed differential stresses for both tectonic regimes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StressPair {
    /// Compressional envelope in Pa, negated so shortening is negative.
    pub compression: f64,
    /// Extensional envelope in Pa.
    pub extension: f64,
}

/// Evaluate the envelope in compression and extension with the default mechanisms.
///
/// # Errors
///
/// Returns [`RheologyError::InvalidDepth`] for a negative depth.
///
/// # Examples
/// ```
/// use rheox::{compute_dsigma, Catalog};
///
/// let catalog = Catalog::standard();
/// let peridotite = catalog.lookup("peridotite_dry").expect("tabulated");
/// let pair = compute_dsigma(peridotite, 50_000.0, 1_073.0, 1.0e-15).expect("valid point");
/// assert!(pair.compression <= 0.0);
/// assert!(pair.extension >= 0.0);
/// ```
pub fn compute_dsigma(
    material: &MaterialRecord,
    depth: f64,
    temperature: f64,
    strain_rate: f64,
) -> Result<StressPair, RheologyError> {
    let compression = -sigma_d(
        material,
        depth,
        temperature,
        Some(strain_rate),
        None,
        Some(DeformationMode::Compression),
    )?;
    let extension = sigma_d(
        material,
        depth,
        temperature,
        Some(strain_rate),
        None,
        Some(DeformationMode::Extension),
    )?;
    Ok(StressPair {
        compression,
        extension,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::catalog::Catalog;
    use crate::material::{DiffusionCreep, DornLaw};

    fn material(name: &str) -> MaterialRecord {
        Catalog::standard()
            .lookup(name)
            .expect("tabulated material")
            .clone()
    }

    #[test]
    fn ordered_min_policy() {
        assert_eq!(ordered_min(&[2.0, 1.0, 3.0]), 1.0);
        assert_eq!(ordered_min(&[2.0, f64::NAN, 3.0]), 2.0);
        assert_eq!(ordered_min(&[2.0, 3.0, f64::NAN]), 2.0);
        assert_eq!(ordered_min(&[2.0, f64::NAN, 1.0]), 1.0);
        assert!(ordered_min(&[f64::NAN, 1.0, 0.5]).is_nan());
        assert!(ordered_min::<f64>(&[]).is_nan());
        assert_eq!(ordered_min(&[-1.0_f32, 4.0]), -1.0);
    }

    #[test]
    fn ordered_min_keeps_first_of_equal_values() {
        let result = ordered_min(&[0.0, -0.0]);
        assert!(result.is_sign_positive());
    }

    #[test]
    fn mechanisms_parse_from_names() {
        assert_eq!(
            Mechanism::parse_all(["dislocation", "diffusion", "dorn"]),
            Ok(vec![Mechanism::Dislocation, Mechanism::Diffusion, Mechanism::Dorn])
        );
        assert_eq!(
            Mechanism::parse_all(["dislocation", "peierls"]),
            Err(RheologyError::UnknownMechanism("peierls".to_string()))
        );
    }

    #[test]
    fn negative_depth_is_rejected() {
        let granite = material("granite");
        let error = sigma_d(
            &granite,
            -1.0,
            900.0,
            Some(1.0e-15),
            None,
            Some(DeformationMode::Compression),
        )
        .expect_err("negative depth");
        assert_eq!(error, RheologyError::InvalidDepth(-1.0));
    }

    #[test]
    fn missing_strain_rate_is_rejected() {
        let granite = material("granite");
        let error = sigma_d(
            &granite,
            1_000.0,
            900.0,
            None,
            None,
            Some(DeformationMode::Compression),
        )
        .expect_err("no strain rate");
        assert_eq!(error, RheologyError::MissingStrainRate);
    }

    #[test]
    fn missing_mode_is_rejected() {
        let granite = material("granite");
        let error = sigma_d(&granite, 1_000.0, 900.0, Some(1.0e-15), None, None)
            .expect_err("no mode");
        assert!(matches!(error, RheologyError::InvalidMode(_)));
    }

    #[test]
    fn shallow_cold_rock_is_brittle() {
        let granite = material("granite");
        let stress = sigma_d(
            &granite,
            2_000.0,
            330.0,
            Some(1.0e-15),
            None,
            Some(DeformationMode::Extension),
        )
        .expect("valid point");
        assert_relative_eq!(
            stress,
            sigma_byerlee(&granite, 2_000.0, DeformationMode::Extension),
            max_relative = 1.0e-12
        );
    }

    #[test]
    fn deep_hot_rock_creeps() {
        let granite = material("granite");
        let stress = sigma_d(
            &granite,
            30_000.0,
            900.0,
            Some(1.0e-15),
            None,
            Some(DeformationMode::Compression),
        )
        .expect("valid point");
        assert_relative_eq!(
            stress,
            sigma_dislocation(&granite, 900.0, 1.0e-15),
            max_relative = 1.0e-12
        );
    }

    #[test]
    fn slow_strain_selects_dislocation_creep() {
        let peridotite = material("peridotite_dry");
        let dislocation = sigma_dislocation(&peridotite, 1_073.0, 1.0e-18);
        assert!(dislocation < DORN_TRANSITION_STRESS);
        let stress = sigma_d(
            &peridotite,
            100_000.0,
            1_073.0,
            Some(1.0e-18),
            None,
            Some(DeformationMode::Compression),
        )
        .expect("valid point");
        assert_relative_eq!(stress, dislocation, max_relative = 1.0e-12);
    }

    #[test]
    fn fast_strain_selects_dorn_law() {
        let peridotite = material("peridotite_dry");
        let dislocation = sigma_dislocation(&peridotite, 800.0, 1.0e-10);
        let dorn = sigma_dorn(&peridotite, 800.0, 1.0e-10);
        assert!(dislocation > DORN_TRANSITION_STRESS);
        assert!(dorn > 0.0);
        assert!(dorn < dislocation);
        let stress = sigma_d(
            &peridotite,
            100_000.0,
            800.0,
            Some(1.0e-10),
            None,
            Some(DeformationMode::Compression),
        )
        .expect("valid point");
        assert_relative_eq!(stress, dorn, max_relative = 1.0e-12);
    }

    #[test]
    fn dorn_is_ignored_when_not_requested() {
        let peridotite = material("peridotite_dry");
        let stress = sigma_d(
            &peridotite,
            100_000.0,
            800.0,
            Some(1.0e-10),
            Some([Mechanism::Dislocation].as_slice()),
            Some(DeformationMode::Compression),
        )
        .expect("valid point");
        let byerlee = sigma_byerlee(&peridotite, 100_000.0, DeformationMode::Compression);
        let dislocation = sigma_dislocation(&peridotite, 800.0, 1.0e-10);
        assert_relative_eq!(stress, byerlee.min(dislocation), max_relative = 1.0e-12);
    }

    #[test]
    fn zero_dorn_stress_keeps_dislocation() {
        let mut peridotite = material("peridotite_dry");
        // A weak activation energy drives the root above one, clamping Dorn's law to zero.
        peridotite.dorn = Some(DornLaw {
            stress: 8.5e9,
            activation_energy: 1.0e4,
            strain_rate: 5.754e11,
        });
        let dislocation = sigma_dislocation(&peridotite, 800.0, 1.0e-10);
        assert!(dislocation > DORN_TRANSITION_STRESS);
        assert_eq!(sigma_dorn(&peridotite, 800.0, 1.0e-10), 0.0);
        let stress = sigma_d(
            &peridotite,
            1.0e8,
            800.0,
            Some(1.0e-10),
            None,
            Some(DeformationMode::Compression),
        )
        .expect("valid point");
        assert_relative_eq!(stress, dislocation, max_relative = 1.0e-12);
    }

    #[test]
    fn diffusion_binds_when_requested() {
        let mut peridotite = material("peridotite_dry");
        peridotite.diffusion = Some(DiffusionCreep {
            preexponential: 1.0,
            activation_energy: 0.0,
            grain_size: 1.0e-3,
            grain_size_exponent: 2.5,
        });
        let all = [Mechanism::Dislocation, Mechanism::Diffusion, Mechanism::Dorn];
        let stress = sigma_d(
            &peridotite,
            50_000.0,
            1_073.0,
            Some(1.0e-15),
            Some(&all),
            Some(DeformationMode::Extension),
        )
        .expect("valid point");
        assert_relative_eq!(
            stress,
            sigma_diffusion(&peridotite, 1_073.0, 1.0e-15),
            max_relative = 1.0e-12
        );
    }

    #[test]
    fn absent_diffusion_does_not_poison_envelope() {
        let granite = material("granite");
        let all = [Mechanism::Dislocation, Mechanism::Diffusion, Mechanism::Dorn];
        let stress = sigma_d(
            &granite,
            10_000.0,
            600.0,
            Some(1.0e-15),
            Some(&all),
            Some(DeformationMode::Compression),
        )
        .expect("valid point");
        assert!(stress.is_finite());
    }

    #[test]
    fn empty_mechanism_list_leaves_byerlee() {
        let granite = material("granite");
        let stress = sigma_d(
            &granite,
            30_000.0,
            900.0,
            Some(1.0e-15),
            Some(&[] as &[Mechanism]),
            Some(DeformationMode::Compression),
        )
        .expect("valid point");
        assert_relative_eq!(
            stress,
            sigma_byerlee(&granite, 30_000.0, DeformationMode::Compression),
            max_relative = 1.0e-12
        );
    }

    #[test]
    fn dsigma_negates_compression_only() {
        let peridotite = material("peridotite_dry");
        let pair = compute_dsigma(&peridotite, 50_000.0, 1_073.0, 1.0e-15).expect("valid point");
        assert!(pair.compression.is_finite());
        assert!(pair.extension.is_finite());
        assert!(pair.compression <= 0.0);
        assert!(pair.extension >= 0.0);
        let compression = sigma_d(
            &peridotite,
            50_000.0,
            1_073.0,
            Some(1.0e-15),
            None,
            Some(DeformationMode::Compression),
        )
        .expect("valid point");
        assert_eq!(pair.compression, -compression);
    }

    #[test]
    fn dsigma_at_surface_is_zero() {
        let peridotite = material("peridotite_dry");
        let pair = compute_dsigma(&peridotite, 0.0, 273.0, 1.0e-15).expect("valid point");
        assert_eq!(pair.compression, 0.0);
        assert_eq!(pair.extension, 0.0);
    }
}
