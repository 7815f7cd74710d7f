//! Detector response calibration: the affine map from a physical energy
//! loss to the measured response scale. Calibrations are per detector and
//! run, supplied by the caller; the JSON loader is a convenience for
//! front-ends that keep them in files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Calibration {
    pub normalization: f64,
    pub offset: f64,
}

impl Calibration {
    pub fn new(normalization: f64, offset: f64) -> Self {
        Self {
            normalization,
            offset,
        }
    }

    /// Maps a raw model value onto the detector response scale.
    pub fn apply(&self, raw: f64) -> f64 {
        self.normalization * raw + self.offset
    }
}

impl Default for Calibration {
    /// Identity map: response equals the physical energy loss.
    fn default() -> Self {
        Self {
            normalization: 1.0,
            offset: 0.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CalibrationFileError {
    #[error("failed to read calibration file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse calibration file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn load_calibration_file(path: impl AsRef<Path>) -> Result<Calibration, CalibrationFileError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| CalibrationFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&source).map_err(|source| CalibrationFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
