//! Rest-mass estimation for charged particles tracked in a P10-filled time
//! projection chamber. The crate evaluates two ionization energy-loss models
//! against the gas mixture, Bethe-Bloch mean loss and Landau-Vavilov most
//! probable loss, both with the Sternheimer density-effect correction, and
//! inverts either model over a fixed mass bracket to estimate the rest mass
//! that reproduces a measured detector response.
//!
//! The forward models live in [`model`], the bracketed scan plus Brent
//! refinement in [`numerics`], and the inversion that ties them together in
//! [`inversion`]. [`common`] carries the physical constants and the P10 gas
//! description; [`domain`] names the particle species and loss models.

pub mod common;
pub mod domain;
pub mod inversion;
pub mod model;
pub mod numerics;

pub use domain::{LossModel, ParticleSpecies};
pub use inversion::{
    DEFAULT_SCAN_SEGMENTS, MassSolution, MassSolveError, MassSolveInput, SolveOptions, solve_mass,
};
pub use model::calibration::{Calibration, CalibrationFileError, load_calibration_file};
pub use model::loss::{
    LossInputError, MeanLossInput, ProbableLossInput, mean_energy_loss, probable_energy_loss,
};
