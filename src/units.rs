//! Unit conversions at the boundary between sample tables and the laws.

use uom::si::f64::{Length, Pressure};
use uom::si::length::{kilometer, meter};
use uom::si::pressure::{megapascal, pascal};

/// Offset added to a Celsius temperature to obtain kelvin.
///
/// This is `273.0`, not `273.15`.
pub const CELSIUS_OFFSET: f64 = 273.0;

/// Depth in metres for a value given in kilometres.
#[must_use]
pub fn kilometres_to_metres(kilometres: f64) -> f64 {
    Length::new::<kilometer>(kilometres).get::<meter>()
}

/// Temperature in kelvin for a value given in degrees Celsius.
#[must_use]
pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + CELSIUS_OFFSET
}

/// Stress in MPa for a value given in Pa.
#[must_use]
pub fn pascals_to_megapascals(pascals: f64) -> f64 {
    Pressure::new::<pascal>(pascals).get::<megapascal>()
}
