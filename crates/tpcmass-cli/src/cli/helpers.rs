use super::CliError;
use anyhow::Context;
use std::fs;
use std::path::Path;
use tpcmass_core::{
    Calibration, LossModel, MeanLossInput, ProbableLossInput, mean_energy_loss,
    probable_energy_loss,
};

pub(super) fn parse_model(token: &str) -> Result<LossModel, CliError> {
    LossModel::from_token(token).ok_or_else(|| {
        CliError::Usage(format!(
            "unknown loss model '{token}'; expected 'mean' or 'most-probable'"
        ))
    })
}

pub(super) fn require_thickness(thickness: Option<f64>) -> Result<f64, CliError> {
    thickness.ok_or_else(|| {
        CliError::Usage("--thickness is required for the most-probable model".to_string())
    })
}

pub(super) fn evaluate_response(
    model: LossModel,
    charge_number: f64,
    mass: f64,
    rigidity: f64,
    thickness: Option<f64>,
    calibration: Calibration,
) -> Result<f64, CliError> {
    let response = match model {
        LossModel::Mean => mean_energy_loss(&MeanLossInput::new(
            charge_number,
            mass,
            rigidity,
            calibration,
        ))?,
        LossModel::MostProbable => {
            let thickness = require_thickness(thickness)?;
            probable_energy_loss(&ProbableLossInput::new(
                charge_number,
                mass,
                rigidity,
                thickness,
                calibration,
            ))?
        }
    };
    Ok(response)
}

pub(super) fn render_response_table(rows: &[(f64, f64)]) -> String {
    let mut table = format!("#{:>13} {:>18}\n", "rigidity", "response");
    for (rigidity, response) in rows {
        table.push_str(&format!("{rigidity:>14.4} {response:>18.9e}\n"));
    }
    table
}

pub(super) fn to_pretty_json(value: &serde_json::Value) -> Result<String, CliError> {
    serde_json::to_string_pretty(value)
        .context("failed to render JSON output")
        .map_err(CliError::from)
}

pub(super) fn write_text_artifact(path: &Path, content: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory '{}'", parent.display())
            })?;
        }
    }
    fs::write(path, content)
        .with_context(|| format!("failed to write output file '{}'", path.display()))?;
    Ok(())
}
