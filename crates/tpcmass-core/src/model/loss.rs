//! Ionization energy-loss models for the P10 counting gas: the Bethe-Bloch
//! mean and the Landau-Vavilov most probable loss over a finite sampling
//! length, both with the Sternheimer density-effect correction and an affine
//! detector calibration on top.
//!
//! Both formulas lose physical validity as beta -> 0, where the 1/beta^2
//! factor diverges. That regime is not guarded here: callers constrain the
//! rigidity to the spectrometer's momentum range and treat very large return
//! values as "formula not applicable at this momentum".

use crate::common::constants::{BETHE_K, MEC2};
use crate::common::medium::P10;
use crate::model::calibration::Calibration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanLossInput {
    pub charge_number: f64,
    pub mass: f64,
    pub rigidity: f64,
    pub calibration: Calibration,
}

impl MeanLossInput {
    pub fn new(charge_number: f64, mass: f64, rigidity: f64, calibration: Calibration) -> Self {
        Self {
            charge_number,
            mass,
            rigidity,
            calibration,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbableLossInput {
    pub charge_number: f64,
    pub mass: f64,
    pub rigidity: f64,
    /// Sampling length in cm over which the most probable loss is taken.
    pub thickness: f64,
    pub calibration: Calibration,
}

impl ProbableLossInput {
    pub fn new(
        charge_number: f64,
        mass: f64,
        rigidity: f64,
        thickness: f64,
        calibration: Calibration,
    ) -> Self {
        Self {
            charge_number,
            mass,
            rigidity,
            thickness,
            calibration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LossInputError {
    #[error(
        "momentum (rigidity * charge) must be finite and > 0, got rigidity={rigidity}, charge={charge_number}"
    )]
    NonPositiveMomentum { rigidity: f64, charge_number: f64 },
    #[error("particle mass must be finite and > 0 MeV, got {mass}")]
    NonPositiveMass { mass: f64 },
    #[error("sampling thickness must be finite and > 0 cm, got {thickness}")]
    NonPositiveThickness { thickness: f64 },
    #[error("measured response must be finite, got {measured}")]
    NonFiniteMeasuredResponse { measured: f64 },
    #[error(
        "calibration must be finite with nonzero normalization, got normalization={normalization}, offset={offset}"
    )]
    InvalidCalibration { normalization: f64, offset: f64 },
}

/// Bethe-Bloch mean energy loss mapped onto the detector response scale.
pub fn mean_energy_loss(input: &MeanLossInput) -> Result<f64, LossInputError> {
    validate_mean(input)?;
    Ok(mean_response(input))
}

/// Landau-Vavilov most probable energy loss per unit sampling length,
/// mapped onto the detector response scale.
pub fn probable_energy_loss(input: &ProbableLossInput) -> Result<f64, LossInputError> {
    validate_probable(input)?;
    Ok(probable_response(input))
}

pub(crate) fn validate_mean(input: &MeanLossInput) -> Result<(), LossInputError> {
    validate_track(input.charge_number, input.mass, input.rigidity)?;
    validate_calibration(input.calibration)
}

pub(crate) fn validate_probable(input: &ProbableLossInput) -> Result<(), LossInputError> {
    validate_track(input.charge_number, input.mass, input.rigidity)?;
    if !input.thickness.is_finite() || input.thickness <= 0.0 {
        return Err(LossInputError::NonPositiveThickness {
            thickness: input.thickness,
        });
    }
    validate_calibration(input.calibration)
}

fn validate_track(charge_number: f64, mass: f64, rigidity: f64) -> Result<(), LossInputError> {
    // A negative rigidity with a negative charge is a valid track; only the
    // momentum itself must come out positive.
    let momentum = rigidity * charge_number;
    if !momentum.is_finite() || momentum <= 0.0 {
        return Err(LossInputError::NonPositiveMomentum {
            rigidity,
            charge_number,
        });
    }
    if !mass.is_finite() || mass <= 0.0 {
        return Err(LossInputError::NonPositiveMass { mass });
    }
    Ok(())
}

fn validate_calibration(calibration: Calibration) -> Result<(), LossInputError> {
    if !calibration.normalization.is_finite()
        || !calibration.offset.is_finite()
        || calibration.normalization == 0.0
    {
        return Err(LossInputError::InvalidCalibration {
            normalization: calibration.normalization,
            offset: calibration.offset,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
struct Kinematics {
    beta_sq: f64,
    gamma_sq: f64,
    beta_gamma_sq: f64,
}

fn kinematics(momentum: f64, mass: f64) -> Kinematics {
    let momentum_sq = momentum * momentum;
    let beta_sq = momentum_sq / (momentum_sq + mass * mass);
    let gamma_sq = 1.0 / (1.0 - beta_sq);
    Kinematics {
        beta_sq,
        gamma_sq,
        beta_gamma_sq: beta_sq * gamma_sq,
    }
}

pub(crate) fn mean_response(input: &MeanLossInput) -> f64 {
    let momentum = input.rigidity * input.charge_number;
    let kin = kinematics(momentum, input.mass);

    // Maximum single-collision energy transfer to an electron.
    let mass_ratio = MEC2 / input.mass;
    let w_max = 2.0 * MEC2 * kin.beta_gamma_sq
        / (1.0 + 2.0 * kin.gamma_sq.sqrt() * mass_ratio + mass_ratio * mass_ratio);

    let log10_beta_gamma = kin.beta_gamma_sq.sqrt().log10();
    let delta = P10.density_effect(log10_beta_gamma);

    let dedx = BETHE_K * P10.density() * input.charge_number * input.charge_number
        * (P10.z_eff() / P10.a_eff())
        / kin.beta_sq
        * (0.5 * (2.0 * MEC2 * kin.beta_gamma_sq * w_max).ln()
            - P10.ln_mean_excitation()
            - kin.beta_sq
            - 0.5 * delta);

    input.calibration.apply(dedx)
}

pub(crate) fn probable_response(input: &ProbableLossInput) -> f64 {
    let momentum = input.rigidity * input.charge_number;
    let kin = kinematics(momentum, input.mass);

    let areal_density = P10.density() * input.thickness;
    let xi = 0.5 * BETHE_K * (P10.z_eff() / P10.a_eff())
        * input.charge_number
        * input.charge_number
        / kin.beta_sq
        * areal_density;

    let log10_beta_gamma = kin.beta_gamma_sq.sqrt().log10();
    let delta = P10.density_effect(log10_beta_gamma);

    let most_probable = xi
        * ((2.0 * MEC2 * kin.beta_gamma_sq).ln() + xi.ln() - 2.0 * P10.ln_mean_excitation() + 0.2
            - kin.beta_sq
            - delta);

    input.calibration.apply(most_probable / input.thickness)
}
