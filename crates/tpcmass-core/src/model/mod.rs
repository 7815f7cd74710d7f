//! Detector response models: the ionization energy-loss kernels and the
//! affine calibration that maps them onto the measured scale.

pub mod calibration;
pub mod loss;

pub use calibration::{Calibration, CalibrationFileError, load_calibration_file};
pub use loss::{
    LossInputError, MeanLossInput, ProbableLossInput, mean_energy_loss, probable_energy_loss,
};
