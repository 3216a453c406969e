use std::path::PathBuf;

use clap::Args;
use rheox::units::{celsius_to_kelvin, kilometres_to_metres};
use rheox::{
    effective_viscosity, sigma_byerlee, sigma_d, sigma_diffusion, sigma_dislocation, sigma_dorn,
    Catalog, DeformationMode, Mechanism, RheologyError, StressPair,
};

/// Arguments of the `point` subcommand.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct PointArgs {
    /// Catalog name of the material
    #[arg(short, long)]
    pub material: String,
    /// Depth below the surface in km
    #[arg(long, allow_negative_numbers = true)]
    pub depth_km: f64,
    /// Temperature in degrees Celsius
    #[arg(long, allow_negative_numbers = true)]
    pub temperature_c: f64,
    /// Strain rate in 1/s
    #[arg(short, long, default_value_t = 1.0e-15)]
    pub strain_rate: f64,
    /// Creep mechanisms to consider (dislocation, diffusion, dorn)
    #[arg(
        short,
        long,
        value_delimiter = ',',
        default_values_t = vec!["dislocation".to_string(), "dorn".to_string()]
    )]
    pub compute: Vec<String>,
    /// JSON file of extra materials
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

/// Every law evaluated at one point together with the governing envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSummary {
    /// Material the point was evaluated against.
    pub material: String,
    /// Depth in km.
    pub depth_km: f64,
    /// Temperature in °C.
    pub temperature_c: f64,
    /// Strain rate in 1/s.
    pub strain_rate: f64,
    /// Mechanisms the envelope was allowed to use.
    pub mechanisms: Vec<Mechanism>,
    /// Byerlee strength in compression, Pa.
    pub byerlee_compression: f64,
    /// Byerlee strength in extension, Pa.
    pub byerlee_extension: f64,
    /// Dislocation creep stress, Pa.
    pub dislocation: f64,
    /// Diffusion creep stress, Pa; `NaN` when not modelled.
    pub diffusion: f64,
    /// Dorn's law stress, Pa; `NaN` when not modelled.
    pub dorn: f64,
    /// Governing stresses, compression negated.
    pub stresses: StressPair,
    /// log10 of the effective viscosity in Pa·s.
    pub log10_viscosity: f64,
}

/// Evaluate the point described by `args` against a material of `catalog`.
///
/// The governing stresses honour `args.compute`, so unlike the batch table
/// they may include diffusion creep.
pub fn evaluate_point(
    catalog: &Catalog,
    args: &PointArgs,
) -> Result<PointSummary, RheologyError> {
    let material = catalog.lookup(&args.material)?;
    let mechanisms = Mechanism::parse_all(&args.compute)?;
    let depth = kilometres_to_metres(args.depth_km);
    let temperature = celsius_to_kelvin(args.temperature_c);
    let strain_rate = args.strain_rate;

    let envelope = |mode| {
        sigma_d(
            material,
            depth,
            temperature,
            Some(strain_rate),
            Some(mechanisms.as_slice()),
            Some(mode),
        )
    };
    let stresses = StressPair {
        compression: -envelope(DeformationMode::Compression)?,
        extension: envelope(DeformationMode::Extension)?,
    };

    Ok(PointSummary {
        material: material.name.clone(),
        depth_km: args.depth_km,
        temperature_c: args.temperature_c,
        strain_rate,
        byerlee_compression: sigma_byerlee(material, depth, DeformationMode::Compression),
        byerlee_extension: sigma_byerlee(material, depth, DeformationMode::Extension),
        dislocation: sigma_dislocation(material, temperature, strain_rate),
        diffusion: sigma_diffusion(material, temperature, strain_rate),
        dorn: sigma_dorn(material, temperature, strain_rate),
        stresses,
        log10_viscosity: effective_viscosity(material, temperature, strain_rate).log10(),
        mechanisms,
    })
}
