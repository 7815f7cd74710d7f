use super::CliError;
use super::helpers::{
    evaluate_response, parse_model, render_response_table, require_thickness, to_pretty_json,
    write_text_artifact,
};
use std::path::PathBuf;
use tpcmass_core::numerics::linear_grid;
use tpcmass_core::{
    Calibration, LossModel, MassSolveInput, ParticleSpecies, SolveOptions, load_calibration_file,
    solve_mass,
};
use tracing::debug;

#[derive(clap::Args)]
pub(super) struct DedxArgs {
    /// Energy-loss model: 'mean' or 'most-probable'
    #[arg(long, default_value = "mean")]
    model: String,

    #[command(flatten)]
    particle: ParticleArgs,

    /// Track rigidity in MeV per unit charge
    #[arg(long, allow_hyphen_values = true)]
    rigidity: f64,

    /// Sampled track length in cm (most-probable model only)
    #[arg(long)]
    thickness: Option<f64>,

    #[command(flatten)]
    calibration: CalibrationArgs,

    /// Print the result as a JSON object
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
pub(super) struct MassArgs {
    /// Energy-loss model: 'mean' or 'most-probable'
    #[arg(long, default_value = "mean")]
    model: String,

    /// Charge number in units of the elementary charge
    #[arg(long, allow_hyphen_values = true)]
    charge: f64,

    /// Track rigidity in MeV per unit charge
    #[arg(long, allow_hyphen_values = true)]
    rigidity: f64,

    /// Measured detector response to invert
    #[arg(long, allow_hyphen_values = true)]
    measured: f64,

    /// Sampled track length in cm (most-probable model only)
    #[arg(long)]
    thickness: Option<f64>,

    #[command(flatten)]
    calibration: CalibrationArgs,

    /// Number of segments for the bracketing scan
    #[arg(long)]
    scan_segments: Option<usize>,

    /// Iteration budget for the bracketed root refinement
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Print the result as a JSON object
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
pub(super) struct TableArgs {
    /// Energy-loss model: 'mean' or 'most-probable'
    #[arg(long, default_value = "mean")]
    model: String,

    /// Named species for the tabulated curve
    #[arg(long)]
    species: String,

    /// Lower edge of the rigidity range in MeV per unit charge
    #[arg(long, allow_hyphen_values = true)]
    min_rigidity: f64,

    /// Upper edge of the rigidity range in MeV per unit charge
    #[arg(long, allow_hyphen_values = true)]
    max_rigidity: f64,

    /// Number of rows sampled across the range, edges included
    #[arg(long, default_value_t = 101)]
    points: usize,

    /// Sampled track length in cm (most-probable model only)
    #[arg(long)]
    thickness: Option<f64>,

    #[command(flatten)]
    calibration: CalibrationArgs,

    /// Write the table to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct ParticleArgs {
    /// Named species: pion, proton, deuteron, triton, helium3, alpha,
    /// helium6, lithium6 or lithium7
    #[arg(long, conflicts_with_all = ["charge", "mass"])]
    species: Option<String>,

    /// Charge number in units of the elementary charge
    #[arg(long, requires = "mass", allow_hyphen_values = true)]
    charge: Option<f64>,

    /// Rest mass in MeV
    #[arg(long, requires = "charge")]
    mass: Option<f64>,
}

impl ParticleArgs {
    fn resolve(&self) -> Result<(f64, f64), CliError> {
        if let Some(name) = &self.species {
            let species = resolve_species(name)?;
            return Ok((species.charge_number(), species.mass_mev()));
        }

        match (self.charge, self.mass) {
            (Some(charge), Some(mass)) => Ok((charge, mass)),
            _ => Err(CliError::Usage(
                "either --species or both --charge and --mass must be given".to_string(),
            )),
        }
    }
}

#[derive(clap::Args)]
pub(super) struct CalibrationArgs {
    /// Calibration JSON file holding normalization and offset
    #[arg(long, value_name = "PATH", conflicts_with_all = ["normalization", "offset"])]
    calibration: Option<PathBuf>,

    /// Multiplicative gain applied to the raw model value
    #[arg(long, default_value_t = 1.0, allow_hyphen_values = true)]
    normalization: f64,

    /// Additive pedestal applied after the gain
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    offset: f64,
}

impl CalibrationArgs {
    fn resolve(&self) -> Result<Calibration, CliError> {
        match &self.calibration {
            Some(path) => Ok(load_calibration_file(path)?),
            None => Ok(Calibration::new(self.normalization, self.offset)),
        }
    }
}

fn resolve_species(name: &str) -> Result<ParticleSpecies, CliError> {
    ParticleSpecies::from_name(name).ok_or_else(|| {
        let known = ParticleSpecies::ALL
            .iter()
            .map(|species| species.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        CliError::Usage(format!("unknown species '{name}'; expected one of: {known}"))
    })
}

pub(super) fn run_dedx_command(args: DedxArgs) -> Result<i32, CliError> {
    let model = parse_model(&args.model)?;
    let (charge_number, mass) = args.particle.resolve()?;
    let calibration = args.calibration.resolve()?;

    let response = evaluate_response(
        model,
        charge_number,
        mass,
        args.rigidity,
        args.thickness,
        calibration,
    )?;
    debug!(
        model = %model,
        charge_number,
        mass,
        rigidity = args.rigidity,
        response,
        "evaluated energy-loss response"
    );

    if args.json {
        let mut payload = serde_json::json!({
            "model": model.as_str(),
            "chargeNumber": charge_number,
            "mass": mass,
            "rigidity": args.rigidity,
            "response": response,
        });
        if model == LossModel::MostProbable {
            payload["thickness"] = serde_json::json!(args.thickness);
        }
        println!("{}", to_pretty_json(&payload)?);
    } else {
        println!("{response}");
    }
    Ok(0)
}

pub(super) fn run_mass_command(args: MassArgs) -> Result<i32, CliError> {
    let model = parse_model(&args.model)?;
    let calibration = args.calibration.resolve()?;

    let input = match model {
        LossModel::Mean => {
            MassSolveInput::mean(args.charge, args.rigidity, args.measured, calibration)
        }
        LossModel::MostProbable => {
            let thickness = require_thickness(args.thickness)?;
            MassSolveInput::most_probable(
                args.charge,
                args.rigidity,
                args.measured,
                thickness,
                calibration,
            )
        }
    };

    let mut options = SolveOptions::default();
    if let Some(segments) = args.scan_segments {
        options.scan_segments = segments;
    }
    if let Some(budget) = args.max_iterations {
        options.root.max_iterations = budget;
    }
    let input = input.with_options(options);

    debug!(
        model = %model,
        charge_number = args.charge,
        rigidity = args.rigidity,
        measured = args.measured,
        "inverting measured response"
    );
    let solution = solve_mass(&input)?;
    debug!(
        mass = solution.mass,
        residual = solution.residual,
        iterations = solution.iterations,
        "mass solve converged"
    );

    if args.json {
        let payload = serde_json::json!({
            "model": model.as_str(),
            "chargeNumber": args.charge,
            "rigidity": args.rigidity,
            "measured": args.measured,
            "mass": solution.mass,
            "residual": solution.residual,
            "iterations": solution.iterations,
        });
        println!("{}", to_pretty_json(&payload)?);
    } else {
        println!("mass {}", solution.mass);
        println!("residual {:e}", solution.residual);
        println!("iterations {}", solution.iterations);
    }
    Ok(0)
}

pub(super) fn run_table_command(args: TableArgs) -> Result<i32, CliError> {
    let model = parse_model(&args.model)?;
    let species = resolve_species(&args.species)?;
    let calibration = args.calibration.resolve()?;

    if !(args.min_rigidity < args.max_rigidity) {
        return Err(CliError::Usage(format!(
            "--max-rigidity must exceed --min-rigidity, got [{}, {}]",
            args.min_rigidity, args.max_rigidity
        )));
    }
    let grid = linear_grid(args.min_rigidity, args.max_rigidity, args.points).ok_or_else(|| {
        CliError::Usage(format!("--points must be at least 2, got {}", args.points))
    })?;

    let mut rows = Vec::with_capacity(grid.len());
    for rigidity in grid {
        let response = evaluate_response(
            model,
            species.charge_number(),
            species.mass_mev(),
            rigidity,
            args.thickness,
            calibration,
        )?;
        rows.push((rigidity, response));
    }
    debug!(
        model = %model,
        species = %species,
        rows = rows.len(),
        "tabulated response curve"
    );

    let table = render_response_table(&rows);
    match &args.output {
        Some(path) => {
            write_text_artifact(path, &table)?;
            println!("Wrote {} rows to '{}'.", rows.len(), path.display());
        }
        None => print!("{table}"),
    }
    Ok(0)
}
