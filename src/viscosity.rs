//! Effective viscosity of power-law creep.

use crate::laws::GAS_CONSTANT;
use crate::material::MaterialRecord;

/// Geometric prefactor converting uniaxial power-law parameters to an
/// equivalent Newtonian viscosity for stress exponent `n`.
fn geometric_prefactor(n: f64) -> f64 {
    (2.0_f64.powf(1.0 - n) / n) / (3.0_f64.powf(1.0 + n) / (2.0 * n))
}

/// Effective viscosity in Pa·s of dislocation creep at `temperature` kelvin.
///
/// `η = [(2^(1−n)/n) / (3^(1+n)/(2n))] · A_p^(−1/n) · ε̇^(1/n − 1) · exp(Q_p / (n·R·T))`
///
/// Only the mandatory dislocation parameters are used, so every catalog record
/// yields a value.
///
/// Tables computed with the denominator `3^(1+n)/2 · n` instead of
/// `3^(1+n)/(2n)` report viscosities `n²` times lower, i.e. `log10(n²)` below
/// these (about 1.09 for `n = 3.5`).
#[must_use]
pub fn effective_viscosity(material: &MaterialRecord, temperature: f64, strain_rate: f64) -> f64 {
    let creep = &material.dislocation;
    let n = creep.stress_exponent;
    geometric_prefactor(n)
        * creep.preexponential.powf(-1.0 / n)
        * strain_rate.powf(1.0 / n - 1.0)
        * (creep.activation_energy / (n * GAS_CONSTANT * temperature)).exp()
}
