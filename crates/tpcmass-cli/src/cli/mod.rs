mod commands;
mod helpers;

use clap::Parser;
use tpcmass_core::inversion::MassSolveError;
use tpcmass_core::model::{CalibrationFileError, LossInputError};
use tracing::error;

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(args) {
        Ok(code) => code,
        Err(err) => {
            match &err {
                CliError::Usage(message) => eprintln!("{message}"),
                other => error!("{other}"),
            }
            err.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    let full_args = std::iter::once("tpcmass".to_string())
        .chain(args)
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => dispatch_parsed(cli.command),
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(name = "tpcmass", about = "P10 TPC energy-loss models and rest-mass estimation")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Evaluate an energy-loss response for a known particle
    Dedx(commands::DedxArgs),
    /// Estimate a rest mass from a measured response
    Mass(commands::MassArgs),
    /// Tabulate a response curve over a rigidity range
    Table(commands::TableArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Dedx(args) => commands::run_dedx_command(args),
        CliCommand::Mass(args) => commands::run_mass_command(args),
        CliCommand::Table(args) => commands::run_table_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(ComputeError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ComputeError {
    #[error(transparent)]
    Loss(#[from] LossInputError),
    #[error(transparent)]
    Solve(#[from] MassSolveError),
    #[error(transparent)]
    Calibration(#[from] CalibrationFileError),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            Self::Compute(_) => 1,
            Self::Internal(_) => 3,
        }
    }
}

impl From<LossInputError> for CliError {
    fn from(error: LossInputError) -> Self {
        Self::Compute(ComputeError::Loss(error))
    }
}

impl From<MassSolveError> for CliError {
    fn from(error: MassSolveError) -> Self {
        Self::Compute(ComputeError::Solve(error))
    }
}

impl From<CalibrationFileError> for CliError {
    fn from(error: CalibrationFileError) -> Self {
        Self::Compute(ComputeError::Calibration(error))
    }
}
