//! Rock material records and their rheological parameter groups.

use serde::{Deserialize, Serialize};

use crate::errors::MaterialPropertyError;

/// Bibliographic information about a record. Never used in computation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Provenance {
    /// Alternative, usually geological, name of the rock.
    pub altname: String,
    /// Overall data source.
    pub source: String,
    /// Source of the dislocation-creep parameters.
    pub source_disloc: String,
    /// Source of the diffusion-creep parameters, if any.
    pub source_diff: Option<String>,
    /// Source of the Dorn's-law parameters, if any.
    pub source_dorn: Option<String>,
    /// Study through which the parameters were adopted.
    pub via: String,
}

/// Parameters of Byerlee's frictional law.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrictionalStrength {
    /// Friction coefficient used in extension.
    pub friction_extension: f64,
    /// Friction coefficient used in compression.
    pub friction_compression: f64,
    /// Pore fluid factor, normally in `[0, 1)`.
    pub pore_fluid_factor: f64,
    /// Bulk density in kg/m³.
    pub bulk_density: f64,
}

impl Default for FrictionalStrength {
    fn default() -> Self {
        Self {
            friction_extension: 0.75,
            friction_compression: 2.0,
            pore_fluid_factor: 0.35,
            bulk_density: 2700.0,
        }
    }
}

/// Power-law dislocation-creep parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DislocationCreep {
    /// Preexponential scaling factor in Pa⁻ⁿ·s⁻¹.
    pub preexponential: f64,
    /// Stress exponent `n`.
    pub stress_exponent: f64,
    /// Activation energy in J/mol.
    pub activation_energy: f64,
}

/// Grain-size sensitive diffusion-creep parameters.
///
/// The four values only exist together; a record either carries the whole
/// group or does not model diffusion creep at all.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiffusionCreep {
    /// Preexponential scaling factor in Pa⁻¹·s⁻¹.
    pub preexponential: f64,
    /// Activation energy in J/mol.
    pub activation_energy: f64,
    /// Grain size in metres.
    pub grain_size: f64,
    /// Grain size exponent `m`.
    pub grain_size_exponent: f64,
}

/// Dorn's-law (low-temperature plasticity) parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DornLaw {
    /// Dorn's law stress in Pa.
    pub stress: f64,
    /// Activation energy in J/mol.
    pub activation_energy: f64,
    /// Reference strain rate in s⁻¹.
    pub strain_rate: f64,
}

/// Everything known about one rock type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    /// Unique catalog key.
    pub name: String,
    /// Where the numbers come from.
    #[serde(default)]
    pub provenance: Provenance,
    /// Brittle (frictional) parameters.
    pub byerlee: FrictionalStrength,
    /// Dislocation-creep parameters, mandatory for every material.
    pub dislocation: DislocationCreep,
    /// Diffusion-creep parameters, when that mechanism is modelled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diffusion: Option<DiffusionCreep>,
    /// Dorn's-law parameters, when that mechanism is modelled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dorn: Option<DornLaw>,
}

impl MaterialRecord {
    /// Create a record with the mandatory parameter groups and no optional laws.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        byerlee: FrictionalStrength,
        dislocation: DislocationCreep,
    ) -> Self {
        Self {
            name: name.into(),
            provenance: Provenance::default(),
            byerlee,
            dislocation,
            diffusion: None,
            dorn: None,
        }
    }

    /// Attach provenance information.
    #[must_use]
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    /// Attach a diffusion-creep parameter group.
    #[must_use]
    pub fn with_diffusion(mut self, diffusion: DiffusionCreep) -> Self {
        self.diffusion = Some(diffusion);
        self
    }

    /// Attach a Dorn's-law parameter group.
    #[must_use]
    pub fn with_dorn(mut self, dorn: DornLaw) -> Self {
        self.dorn = Some(dorn);
        self
    }

    /// Check that the numeric parameters are physically meaningful.
    ///
    /// Friction coefficients, bulk density and every preexponential factor must
    /// be strictly positive, the dislocation stress exponent must exceed one and
    /// activation energies must not be negative. The pore fluid factor is not
    /// checked; values at or above one are allowed through and simply produce a
    /// non-positive frictional strength.
    ///
    /// # Errors
    ///
    /// Returns the first [`MaterialPropertyError`] encountered.
    pub fn validate(&self) -> Result<(), MaterialPropertyError> {
        let positive = [
            ("friction_extension", self.byerlee.friction_extension),
            ("friction_compression", self.byerlee.friction_compression),
            ("bulk_density", self.byerlee.bulk_density),
            ("dislocation preexponential", self.dislocation.preexponential),
        ];
        for (property, value) in positive {
            self.require_positive(property, value)?;
        }
        let exponent = self.dislocation.stress_exponent;
        if exponent.is_nan() || exponent <= 1.0 {
            return Err(MaterialPropertyError::StressExponentTooSmall {
                material: self.name.clone(),
                value: exponent,
            });
        }
        self.require_non_negative(
            "dislocation activation energy",
            self.dislocation.activation_energy,
        )?;

        if let Some(diffusion) = &self.diffusion {
            self.require_positive("diffusion preexponential", diffusion.preexponential)?;
            self.require_positive("grain size", diffusion.grain_size)?;
            self.require_non_negative(
                "diffusion activation energy",
                diffusion.activation_energy,
            )?;
        }
        if let Some(dorn) = &self.dorn {
            self.require_positive("Dorn stress", dorn.stress)?;
            self.require_non_negative("Dorn activation energy", dorn.activation_energy)?;
        }
        Ok(())
    }

    /// Reject `value` unless it is strictly positive.
    fn require_positive(
        &self,
        property: &'static str,
        value: f64,
    ) -> Result<(), MaterialPropertyError> {
        if value > 0.0 {
            Ok(())
        } else {
            Err(MaterialPropertyError::NonPositive {
                material: self.name.clone(),
                property,
                value,
            })
        }
    }

    /// Reject `value` when it is negative or not a number.
    fn require_non_negative(
        &self,
        property: &'static str,
        value: f64,
    ) -> Result<(), MaterialPropertyError> {
        if value >= 0.0 {
            Ok(())
        } else {
            Err(MaterialPropertyError::NegativeActivationEnergy {
                material: self.name.clone(),
                property,
                value,
            })
        }
    }
}
