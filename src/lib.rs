#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_doc_code_examples)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

pub mod batch;
pub mod catalog;
pub mod config;
pub mod envelope;
pub mod errors;
pub mod laws;
pub mod material;
pub mod table;
pub mod units;
pub mod viscosity;

pub use batch::{run, RunSummary};
pub use catalog::{preexp_from_gpa, Catalog};
pub use config::RunConfig;
pub use envelope::{compute_dsigma, ordered_min, sigma_d, Mechanism, StressPair};
pub use errors::{
    BatchError, CatalogError, ConfigError, MaterialPropertyError, RheologyError, TableError,
};
pub use laws::{sigma_byerlee, sigma_diffusion, sigma_dislocation, sigma_dorn, DeformationMode};
pub use material::{
    DiffusionCreep, DislocationCreep, DornLaw, FrictionalStrength, MaterialRecord, Provenance,
};
pub use table::{
    evaluate_sample, EvaluationResult, OutputHeader, RheologyTable, Sample, SampleTable,
};
pub use viscosity::effective_viscosity;
