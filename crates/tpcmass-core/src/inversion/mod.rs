//! Rest-mass estimation by model inversion: given a track's measured
//! energy-loss response together with its rigidity and charge, find the mass
//! whose predicted response reproduces the measurement.
//!
//! The residual `measured - predicted(mass)` is scanned over the fixed mass
//! bracket for sign-change subintervals, one subinterval is selected, and
//! Brent's method refines it to a root. Selection prefers the first
//! subinterval where the residual falls through zero: there the predicted
//! response rises with mass, which is the heavy-fragment branch of the loss
//! curve. A measurement near minimum ionizing also admits a root on the
//! relativistic branch, and the falling-crossing rule resolves that
//! ambiguity toward the heavier candidate.

use crate::common::constants::{MASS_BRACKET_MAX, MASS_BRACKET_MIN};
use crate::domain::LossModel;
use crate::model::calibration::Calibration;
use crate::model::loss::{
    LossInputError, MeanLossInput, ProbableLossInput, mean_response, probable_response,
    validate_mean, validate_probable,
};
use crate::numerics::root::{RootError, RootOptions, SignChange, brent_root, scan_sign_change};

/// Scan resolution over the mass bracket. One hundred segments resolve every
/// species crossing except measurements that sit so close to the loss-curve
/// minimum that both roots share a segment; callers may raise the resolution
/// through [`SolveOptions`].
pub const DEFAULT_SCAN_SEGMENTS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveOptions {
    pub scan_segments: usize,
    pub root: RootOptions,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            scan_segments: DEFAULT_SCAN_SEGMENTS,
            root: RootOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassSolveInput {
    pub model: LossModel,
    pub charge_number: f64,
    pub rigidity: f64,
    pub measured_response: f64,
    pub calibration: Calibration,
    /// Sampling length in cm; required by the most probable loss model.
    pub thickness: Option<f64>,
    pub options: SolveOptions,
}

impl MassSolveInput {
    pub fn mean(
        charge_number: f64,
        rigidity: f64,
        measured_response: f64,
        calibration: Calibration,
    ) -> Self {
        Self {
            model: LossModel::Mean,
            charge_number,
            rigidity,
            measured_response,
            calibration,
            thickness: None,
            options: SolveOptions::default(),
        }
    }

    pub fn most_probable(
        charge_number: f64,
        rigidity: f64,
        measured_response: f64,
        thickness: f64,
        calibration: Calibration,
    ) -> Self {
        Self {
            model: LossModel::MostProbable,
            charge_number,
            rigidity,
            measured_response,
            calibration,
            thickness: Some(thickness),
            options: SolveOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SolveOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassSolution {
    /// Estimated rest mass in MeV/c^2.
    pub mass: f64,
    /// Measured minus predicted response at the returned mass.
    pub residual: f64,
    /// Brent iterations spent refining the scan subinterval.
    pub iterations: usize,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MassSolveError {
    #[error("non-physical solve input: {0}")]
    NonPhysicalInput(#[from] LossInputError),
    #[error(
        "measured response {measured} is not reached by the model anywhere in [{bracket_min}, {bracket_max}] MeV"
    )]
    NoSignChange {
        measured: f64,
        bracket_min: f64,
        bracket_max: f64,
    },
    #[error("mass solver did not converge after {iterations} iterations, bracket width {bracket_width}")]
    SolverNonConvergence { iterations: usize, bracket_width: f64 },
}

/// Inverts the selected loss model over the mass bracket
/// `[MASS_BRACKET_MIN, MASS_BRACKET_MAX]`.
pub fn solve_mass(input: &MassSolveInput) -> Result<MassSolution, MassSolveError> {
    validate(input)?;

    let residual = |mass: f64| input.measured_response - predict(input, mass);

    // A scan needs at least one segment.
    let segments = input.options.scan_segments.max(1);
    let changes = scan_sign_change(&residual, MASS_BRACKET_MIN, MASS_BRACKET_MAX, segments)
        .map_err(|error| map_root_error(input, error))?;
    let subinterval = pick_subinterval(&changes).ok_or(MassSolveError::NoSignChange {
        measured: input.measured_response,
        bracket_min: MASS_BRACKET_MIN,
        bracket_max: MASS_BRACKET_MAX,
    })?;

    let refined = brent_root(
        &residual,
        subinterval.lower,
        subinterval.upper,
        &input.options.root,
    )
    .map_err(|error| map_root_error(input, error))?;

    Ok(MassSolution {
        mass: refined.root,
        residual: refined.residual,
        iterations: refined.iterations,
    })
}

fn validate(input: &MassSolveInput) -> Result<(), MassSolveError> {
    if !input.measured_response.is_finite() {
        return Err(MassSolveError::NonPhysicalInput(
            LossInputError::NonFiniteMeasuredResponse {
                measured: input.measured_response,
            },
        ));
    }
    // Probe the forward model at the lower bracket edge; every mass the scan
    // sweeps is positive, so the track and calibration checks carry over to
    // the whole bracket.
    match input.model {
        LossModel::Mean => validate_mean(&mean_input(input, MASS_BRACKET_MIN))?,
        LossModel::MostProbable => validate_probable(&probable_input(input, MASS_BRACKET_MIN))?,
    }
    Ok(())
}

fn mean_input(input: &MassSolveInput, mass: f64) -> MeanLossInput {
    MeanLossInput::new(input.charge_number, mass, input.rigidity, input.calibration)
}

fn probable_input(input: &MassSolveInput, mass: f64) -> ProbableLossInput {
    ProbableLossInput::new(
        input.charge_number,
        mass,
        input.rigidity,
        input.thickness.unwrap_or(f64::NAN),
        input.calibration,
    )
}

fn predict(input: &MassSolveInput, mass: f64) -> f64 {
    match input.model {
        LossModel::Mean => mean_response(&mean_input(input, mass)),
        LossModel::MostProbable => probable_response(&probable_input(input, mass)),
    }
}

fn pick_subinterval(changes: &[SignChange]) -> Option<SignChange> {
    changes
        .iter()
        .copied()
        .find(SignChange::is_descending)
        .or_else(|| changes.first().copied())
}

fn map_root_error(input: &MassSolveInput, error: RootError) -> MassSolveError {
    match error {
        RootError::NonConvergence { iterations, width } => MassSolveError::SolverNonConvergence {
            iterations,
            bracket_width: width,
        },
        // The mass bracket is fixed and the inputs have been validated, so
        // any other failure means the measurement is not reached inside it.
        _ => MassSolveError::NoSignChange {
            measured: input.measured_response,
            bracket_min: MASS_BRACKET_MIN,
            bracket_max: MASS_BRACKET_MAX,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DEFAULT_SCAN_SEGMENTS, MassSolveError, MassSolveInput, SolveOptions, solve_mass,
    };
    use crate::common::constants::{
        M_ALPHA, M_DEUTERON, M_HELION, M_HELIUM6, M_LITHIUM6, M_LITHIUM7, M_PION, M_PROTON,
        M_TRITON, MASS_BRACKET_MAX, MASS_BRACKET_MIN,
    };
    use crate::domain::LossModel;
    use crate::model::calibration::Calibration;
    use crate::model::loss::{
        LossInputError, MeanLossInput, ProbableLossInput, mean_energy_loss, probable_energy_loss,
    };
    use crate::numerics::root::RootOptions;

    #[test]
    fn mean_inversion_recovers_known_species() {
        let cases = [
            (1.0, M_PROTON, 1000.0),
            (1.0, M_PROTON, 400.0),
            (1.0, M_PROTON, 2500.0),
            (-1.0, M_PROTON, -1000.0),
            (1.0, M_DEUTERON, 800.0),
            (1.0, M_TRITON, 900.0),
            (2.0, M_HELION, 1500.0),
            (2.0, M_ALPHA, 1200.0),
            (2.0, M_HELIUM6, 1300.0),
            (3.0, M_LITHIUM6, 1100.0),
            (3.0, M_LITHIUM7, 900.0),
        ];
        for (charge, mass, rigidity) in cases {
            let measured =
                mean_energy_loss(&MeanLossInput::new(charge, mass, rigidity, Calibration::default()))
                    .expect("forward evaluation");
            let solution = solve_mass(&MassSolveInput::mean(
                charge,
                rigidity,
                measured,
                Calibration::default(),
            ))
            .expect("inversion should find the mass");

            assert_mass_close(mass, solution.mass);
            assert!(solution.residual.abs() <= 1.0e-9);
            assert!(solution.iterations >= 1 && solution.iterations <= 20);
        }
    }

    #[test]
    fn probable_inversion_recovers_known_species() {
        let cases = [
            (1.0, M_PROTON, 1000.0, 1.2),
            (1.0, M_PION, 180.0, 1.2),
            (1.0, M_DEUTERON, 800.0, 1.2),
            (1.0, M_TRITON, 1600.0, 1.2),
            (2.0, M_HELION, 1500.0, 1.2),
            (2.0, M_ALPHA, 1200.0, 1.2),
            (2.0, M_HELIUM6, 1300.0, 1.2),
            (3.0, M_LITHIUM6, 1100.0, 0.8),
            (3.0, M_LITHIUM7, 900.0, 1.2),
        ];
        for (charge, mass, rigidity, thickness) in cases {
            let measured = probable_energy_loss(&ProbableLossInput::new(
                charge,
                mass,
                rigidity,
                thickness,
                Calibration::default(),
            ))
            .expect("forward evaluation");
            let solution = solve_mass(&MassSolveInput::most_probable(
                charge,
                rigidity,
                measured,
                thickness,
                Calibration::default(),
            ))
            .expect("inversion should find the mass");

            assert_mass_close(mass, solution.mass);
            assert!(solution.residual.abs() <= 1.0e-9);
        }
    }

    #[test]
    fn calibrated_inversions_round_trip() {
        // Reference responses come straight from the forward models; the
        // calibrated most probable value is negative, which is a legitimate
        // measurement and must pass validation.
        let mean_measured = 3.909_129_287_480_973_3;
        let solution = solve_mass(&MassSolveInput::mean(
            1.0,
            1000.0,
            mean_measured,
            Calibration::new(121.77, 3.5),
        ))
        .expect("calibrated mean inversion");
        assert_mass_close(M_PROTON, solution.mass);

        let probable_measured = -6.776_800_241_303_893e-2;
        let solution = solve_mass(&MassSolveInput::most_probable(
            2.0,
            1400.0,
            probable_measured,
            1.45,
            Calibration::new(96.3, -1.25),
        ))
        .expect("calibrated probable inversion");
        assert_mass_close(M_ALPHA, solution.mass);
    }

    #[test]
    fn low_rigidity_pion_resolves_on_the_falling_crossing() {
        // At 100 MeV rigidity the residual also crosses zero near 7687 MeV,
        // where the formula has collapsed far outside its validity range.
        // The falling crossing comes first and carries the pion.
        let measured = mean_energy_loss(&MeanLossInput::new(
            1.0,
            M_PION,
            100.0,
            Calibration::default(),
        ))
        .expect("forward evaluation");
        let solution = solve_mass(&MassSolveInput::mean(
            1.0,
            100.0,
            measured,
            Calibration::default(),
        ))
        .expect("inversion should find the pion");

        assert_mass_close(M_PION, solution.mass);
    }

    #[test]
    fn near_minimum_measurements_resolve_to_the_heavier_candidate() {
        // A pion at 500 MeV rigidity sits just below the loss-curve minimum,
        // so its response is also produced by a 175.9 MeV mass on the rising
        // branch. Both crossings share one segment at the default resolution
        // (see `default_scan_misses_near_minimum_crossings`); at finer
        // resolution the falling crossing wins and the solver reports the
        // heavier of the two indistinguishable candidates.
        let measured = mean_energy_loss(&MeanLossInput::new(
            1.0,
            M_PION,
            500.0,
            Calibration::default(),
        ))
        .expect("forward evaluation");
        let options = SolveOptions {
            scan_segments: 400,
            ..SolveOptions::default()
        };
        let solution = solve_mass(
            &MassSolveInput::mean(1.0, 500.0, measured, Calibration::default())
                .with_options(options),
        )
        .expect("fine scan should bracket the rising-branch root");

        assert!(solution.mass > M_PION);
        assert_mass_close(175.868_416_832_124_78, solution.mass);
    }

    #[test]
    fn default_scan_misses_near_minimum_crossings() {
        let measured = mean_energy_loss(&MeanLossInput::new(
            1.0,
            M_PION,
            500.0,
            Calibration::default(),
        ))
        .expect("forward evaluation");
        let error = solve_mass(&MassSolveInput::mean(
            1.0,
            500.0,
            measured,
            Calibration::default(),
        ))
        .expect_err("both crossings share a segment at the default resolution");

        assert_eq!(
            error,
            MassSolveError::NoSignChange {
                measured,
                bracket_min: MASS_BRACKET_MIN,
                bracket_max: MASS_BRACKET_MAX,
            }
        );
    }

    #[test]
    fn unreachable_measurements_report_no_sign_change() {
        let cases = [
            MassSolveInput::mean(1.0, 1000.0, 10.0, Calibration::default()),
            MassSolveInput::mean(1.0, 1000.0, -0.5, Calibration::default()),
            MassSolveInput::most_probable(1.0, 1000.0, 25.0, 1.2, Calibration::default()),
        ];
        for input in cases {
            let error = solve_mass(&input).expect_err("measurement outside the model range");
            assert!(matches!(error, MassSolveError::NoSignChange { .. }));
        }
    }

    #[test]
    fn non_physical_inputs_are_rejected_before_solving() {
        let error = solve_mass(&MassSolveInput::mean(
            1.0,
            0.0,
            3.0e-3,
            Calibration::default(),
        ))
        .expect_err("zero rigidity");
        assert!(matches!(
            error,
            MassSolveError::NonPhysicalInput(LossInputError::NonPositiveMomentum { .. })
        ));

        let error = solve_mass(&MassSolveInput {
            model: LossModel::MostProbable,
            charge_number: 1.0,
            rigidity: 1000.0,
            measured_response: 2.0e-3,
            calibration: Calibration::default(),
            thickness: None,
            options: SolveOptions::default(),
        })
        .expect_err("most probable model without a thickness");
        assert!(matches!(
            error,
            MassSolveError::NonPhysicalInput(LossInputError::NonPositiveThickness { .. })
        ));

        let error = solve_mass(&MassSolveInput::most_probable(
            1.0,
            1000.0,
            2.0e-3,
            -1.0,
            Calibration::default(),
        ))
        .expect_err("negative thickness");
        assert!(matches!(
            error,
            MassSolveError::NonPhysicalInput(LossInputError::NonPositiveThickness {
                thickness
            }) if thickness == -1.0
        ));

        let error = solve_mass(&MassSolveInput::mean(
            1.0,
            1000.0,
            f64::NAN,
            Calibration::default(),
        ))
        .expect_err("NaN measurement");
        assert!(matches!(
            error,
            MassSolveError::NonPhysicalInput(LossInputError::NonFiniteMeasuredResponse { .. })
        ));

        let error = solve_mass(&MassSolveInput::mean(
            1.0,
            1000.0,
            3.0e-3,
            Calibration::new(0.0, 0.0),
        ))
        .expect_err("zero normalization");
        assert!(matches!(
            error,
            MassSolveError::NonPhysicalInput(LossInputError::InvalidCalibration { .. })
        ));
    }

    #[test]
    fn iteration_budget_is_honored() {
        let measured = mean_energy_loss(&MeanLossInput::new(
            1.0,
            M_PROTON,
            1000.0,
            Calibration::default(),
        ))
        .expect("forward evaluation");
        let options = SolveOptions {
            scan_segments: DEFAULT_SCAN_SEGMENTS,
            root: RootOptions {
                max_iterations: 1,
                ..RootOptions::default()
            },
        };
        let error = solve_mass(
            &MassSolveInput::mean(1.0, 1000.0, measured, Calibration::default())
                .with_options(options),
        )
        .expect_err("one iteration cannot converge");

        assert!(matches!(
            error,
            MassSolveError::SolverNonConvergence { iterations: 1, .. }
        ));
    }

    fn assert_mass_close(expected: f64, actual: f64) {
        let rel_diff = (actual - expected).abs() / expected;
        assert!(
            rel_diff <= 1.0e-9,
            "mass expected={expected:.15e} actual={actual:.15e} rel_diff={rel_diff:.15e}"
        );
    }
}
