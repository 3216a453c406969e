//! The named registry of rock rheologies.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::errors::{CatalogError, RheologyError};
use crate::material::{
    DiffusionCreep, DislocationCreep, DornLaw, FrictionalStrength, MaterialRecord, Provenance,
};

/// Convert a preexponential factor given in GPa⁻ⁿ·s⁻¹ into Pa⁻ⁿ·s⁻¹.
///
/// # Examples
/// ```
/// use rheox::preexp_from_gpa;
///
/// // Granite, Ranalli and Murphy (1987): A = 5 GPa^-3.2 s^-1
/// let a_p = preexp_from_gpa(5.0, 3.2);
/// assert!((a_p.log10() - (5.0_f64.log10() - 28.8)).abs() < 1.0e-9);
/// ```
#[must_use]
pub fn preexp_from_gpa(preexponential: f64, stress_exponent: f64) -> f64 {
    preexponential * 10.0_f64.powf(-1.0 * stress_exponent * 9.0)
}

/// Immutable set of material records keyed by name.
///
/// Iteration is ordered by name.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    /// Records keyed by their unique name.
    records: BTreeMap<String, MaterialRecord>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    /// Build a catalog from user supplied records.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidMaterial`] when a record fails
    /// [`MaterialRecord::validate`] and [`CatalogError::DuplicateMaterial`] when
    /// two records share a name.
    pub fn new(records: impl IntoIterator<Item = MaterialRecord>) -> Result<Self, CatalogError> {
        Self {
            records: BTreeMap::new(),
        }
        .with_records(records)
    }

    /// The built-in table of crustal and mantle rheologies.
    #[must_use]
    pub fn standard() -> Self {
        let records = standard_records()
            .into_iter()
            .map(|record| (record.name.clone(), record))
            .collect();
        Self { records }
    }

    /// Return this catalog extended with `records`.
    ///
    /// # Errors
    ///
    /// Same as [`Catalog::new`]; a name already present in `self` counts as a
    /// duplicate.
    pub fn with_records(
        mut self,
        records: impl IntoIterator<Item = MaterialRecord>,
    ) -> Result<Self, CatalogError> {
        for record in records {
            record.validate()?;
            if self.records.contains_key(&record.name) {
                return Err(CatalogError::DuplicateMaterial(record.name));
            }
            debug!(material = %record.name, "registering material");
            self.records.insert(record.name.clone(), record);
        }
        Ok(self)
    }

    /// Read a JSON array of [`MaterialRecord`] into a new catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Json`] for malformed documents and the errors of
    /// [`Catalog::new`] otherwise.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let records: Vec<MaterialRecord> = serde_json::from_reader(reader)?;
        Self::new(records)
    }

    /// Return this catalog extended with the records stored in a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] when the file cannot be opened and the errors
    /// of [`Catalog::with_records`] otherwise.
    pub fn with_json_path(self, path: &Path) -> Result<Self, CatalogError> {
        let reader = BufReader::new(File::open(path)?);
        let records: Vec<MaterialRecord> = serde_json::from_reader(reader)?;
        self.with_records(records)
    }

    /// The standard catalog, extended with the records of the JSON file at
    /// `extra` when one is given.
    ///
    /// # Errors
    ///
    /// Same as [`Catalog::with_json_path`].
    pub fn standard_with(extra: Option<&Path>) -> Result<Self, CatalogError> {
        let catalog = Self::standard();
        match extra {
            Some(path) => catalog.with_json_path(path),
            None => Ok(catalog),
        }
    }

    /// Find a record by exact name.
    ///
    /// # Errors
    ///
    /// Returns [`RheologyError::UnknownMaterial`] when no record is called `name`.
    ///
    /// # Examples
    /// ```
    /// use rheox::Catalog;
    ///
    /// let catalog = Catalog::standard();
    /// let peridotite = catalog.lookup("peridotite_dry").expect("tabulated");
    /// assert!(peridotite.diffusion.is_some());
    /// ```
    pub fn lookup(&self, name: &str) -> Result<&MaterialRecord, RheologyError> {
        self.records
            .get(name)
            .ok_or_else(|| RheologyError::UnknownMaterial(name.to_string()))
    }

    /// Return the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Return `true` when the catalog holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over the material names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// Iterate over the records in name order.
    pub fn iter(&self) -> impl Iterator<Item = &MaterialRecord> {
        self.records.values()
    }
}

/// Byerlee parameters shared by every tabulated rock; only the density varies.
fn byerlee(bulk_density: f64) -> FrictionalStrength {
    FrictionalStrength {
        friction_extension: 0.75,
        friction_compression: 2.0,
        pore_fluid_factor: 0.35,
        bulk_density,
    }
}

fn dislocation(
    preexponential: f64,
    stress_exponent: f64,
    activation_energy: f64,
) -> DislocationCreep {
    DislocationCreep {
        preexponential,
        stress_exponent,
        activation_energy,
    }
}

/// Provenance for records whose dislocation parameters come from `source`.
fn cited(altname: &str, source: &str, via: &str) -> Provenance {
    Provenance {
        altname: altname.to_string(),
        source: source.to_string(),
        source_disloc: source.to_string(),
        source_diff: None,
        source_dorn: None,
        via: via.to_string(),
    }
}

/// A record with Byerlee and dislocation parameters only.
fn simple(
    name: &str,
    provenance: Provenance,
    bulk_density: f64,
    creep: DislocationCreep,
) -> MaterialRecord {
    MaterialRecord::new(name, byerlee(bulk_density), creep).with_provenance(provenance)
}

/// Olivine-aggregate mantle record with diffusion creep and Dorn's law.
fn peridotite(
    name: &str,
    altname: &str,
    bulk_density: f64,
    creep: DislocationCreep,
) -> MaterialRecord {
    let provenance = Provenance {
        altname: altname.to_string(),
        source: "Hirth and Kohlstedt (1996), Kameyama et al. (1999)".to_string(),
        source_disloc: "Hirth and Kohlstedt (1996)".to_string(),
        source_diff: Some("Kameyama et al. (1999)".to_string()),
        source_dorn: Some("Kameyama et al. (1999)".to_string()),
        via: "Sobolev et al. (2006)".to_string(),
    };
    MaterialRecord::new(name, byerlee(bulk_density), creep)
        .with_provenance(provenance)
        .with_diffusion(DiffusionCreep {
            preexponential: 2.570e-11,
            activation_energy: 300e3,
            grain_size: 0.1e-3,
            grain_size_exponent: 2.5,
        })
        .with_dorn(DornLaw {
            stress: 8.5e9,
            activation_energy: 535e3,
            strain_rate: 5.754e11,
        })
}

/// The literal table of tabulated rocks.
#[rustfmt::skip]
fn standard_records() -> Vec<MaterialRecord> {
    const RM87: &str = "Ranalli and Murpy (1987)";
    const SIPPEL: &str = "Sippel et al. (2016)";
    const SOBOLEV: &str = "Sobolev et al. (2006)";
    const GT95: &str = "Gleason and Tullis (1995)";

    vec![
        simple("olivine", cited("", RM87, ""), 3300.0, dislocation(preexp_from_gpa(4e15, 3.0), 3.0, 540.0e3)),
        simple("olivine_wet", cited("", "Jackson (2002)", ""), 3300.0, dislocation(5.5e-25, 4.48, 498.0e3)),
        simple("diabase", cited("", RM87, ""), 2950.0, dislocation(preexp_from_gpa(3.2e6, 3.4), 3.4, 260.0e3)),
        simple("quartz_diorite", cited("", RM87, ""), 2900.0, dislocation(preexp_from_gpa(2e4, 2.4), 2.4, 219.0e3)),
        simple("anorthosite", cited("", RM87, ""), 2800.0, dislocation(preexp_from_gpa(1.3e6, 3.2), 3.2, 238.0e3)),
        simple("albite_rock", cited("", RM87, ""), 2600.0, dislocation(preexp_from_gpa(1.3e6, 3.9), 3.9, 234.0e3)),
        simple("quartzite_wet", cited("", RM87, ""), 2650.0, dislocation(preexp_from_gpa(2e3, 2.3), 2.3, 154.0e3)),
        simple("quartzite", cited("", RM87, ""), 2650.0, dislocation(preexp_from_gpa(100.0, 2.4), 2.4, 156.0e3)),
        simple("granite_wet", cited("", RM87, ""), 2650.0, dislocation(preexp_from_gpa(100.0, 2.4), 2.4, 137.0e3)),
        simple("granite", cited("", RM87, RM87), 2650.0, dislocation(preexp_from_gpa(5.0, 3.2), 3.2, 123.0e3)),
        simple("olivine_dry", cited("Mantle", "Goetze and Evans (1979)", SIPPEL), 3300.0, dislocation(7.0e-14, 3.0, 510.0e3))
            .with_dorn(DornLaw {
                stress: 8.5e9,
                activation_energy: 535e3,
                strain_rate: 5.7e11,
            }),
        simple("mafic_granulite", cited("Mafic granulites", "Wilks and Carter (1990)", SIPPEL), 3050.0, dislocation(8.83e-22, 4.2, 445.0e3)),
        simple("diabase_dry", cited("Gabbroid rocks", "Carter and Tsenn (1987)", SIPPEL), 2920.0, dislocation(6.31e-20, 3.05, 276.0e3)),
        simple("granite_dry", cited("Meta-sedimentary rocks", "Carter and Tsenn (1987)", SIPPEL), 2750.0, dislocation(3.16e-26, 3.3, 186e3)),
        simple(
            "quartzite_dry",
            cited("Sediments", "Burov et al. (1998)", "Sippel et al. (2016), Carter and Tsenn (1987)"),
            2600.0,
            dislocation(5.0e-12, 3.0, 190e3),
        ),
        simple("diorite_dry", cited("Meta-igneous rocks", "Burov et al. (1998)", SIPPEL), 2800.0, dislocation(5.2e-18, 2.4, 219e3)),
        peridotite(
            "peridotite_dry",
            "Mantle lithosphere of slab and shield, dry_olivine",
            3280.0,
            dislocation(5.011e-17, 3.5, 535e3),
        ),
        peridotite(
            "peridotite_dry_SA",
            "Mantle lithosphere of South America, not shield",
            3280.0,
            dislocation(5.002e-15, 3.5, 515e3),
        ),
        // Same laws as peridotite_dry_SA, denser.
        peridotite(
            "peridotite_dry_asthenosphere",
            "Mantle asthenosphere",
            3300.0,
            dislocation(5.012e-15, 3.5, 515e3),
        ),
        simple("quartzite_wet_2650", cited("sediments", GT95, SOBOLEV), 2650.0, dislocation(1e-28, 4.0, 223e3)),
        simple("quartzite_wet_2700", cited("Uppermost crust continent", GT95, SOBOLEV), 2700.0, dislocation(1e-28, 4.0, 223e3)),
        simple("quartzite_wet_weak", cited("Upper crust continent", GT95, SOBOLEV), 2800.0, dislocation(1e-27, 4.0, 223e3)),
        simple(
            "plagioclase_wet",
            cited("Granulite, mafic crust continent", "Rybacki and Dresen (2000)", SOBOLEV),
            2950.0,
            dislocation(3.981e-16, 3.0, 356e3),
        ),
        simple(
            "granulite_dry",
            cited("Pikwetonian granulite", "UNKNOWN", "Sobolev et al. (2006) Drezina.inp"),
            2950.0,
            dislocation(3.2e-21, 4.2, 445.0e3),
        ),
    ]
}
