use std::fmt::{Display, Formatter};

use crate::common::constants::{
    M_ALPHA, M_DEUTERON, M_HELION, M_HELIUM6, M_LITHIUM6, M_LITHIUM7, M_PION, M_PROTON, M_TRITON,
};

/// Particle species the estimator knows out of the box. Each entry is a
/// label over a fixed (charge number, rest mass) pair; the energy-loss
/// formulas themselves take charge and mass directly, so callers with an
/// exotic fragment can bypass the table entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleSpecies {
    Pion,
    Proton,
    Deuteron,
    Triton,
    Helion,
    Alpha,
    Helium6,
    Lithium6,
    Lithium7,
}

impl ParticleSpecies {
    pub const ALL: [ParticleSpecies; 9] = [
        Self::Pion,
        Self::Proton,
        Self::Deuteron,
        Self::Triton,
        Self::Helion,
        Self::Alpha,
        Self::Helium6,
        Self::Lithium6,
        Self::Lithium7,
    ];

    pub const fn charge_number(self) -> f64 {
        match self {
            Self::Pion | Self::Proton | Self::Deuteron | Self::Triton => 1.0,
            Self::Helion | Self::Alpha | Self::Helium6 => 2.0,
            Self::Lithium6 | Self::Lithium7 => 3.0,
        }
    }

    pub const fn mass_mev(self) -> f64 {
        match self {
            Self::Pion => M_PION,
            Self::Proton => M_PROTON,
            Self::Deuteron => M_DEUTERON,
            Self::Triton => M_TRITON,
            Self::Helion => M_HELION,
            Self::Alpha => M_ALPHA,
            Self::Helium6 => M_HELIUM6,
            Self::Lithium6 => M_LITHIUM6,
            Self::Lithium7 => M_LITHIUM7,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pion => "pion",
            Self::Proton => "proton",
            Self::Deuteron => "deuteron",
            Self::Triton => "triton",
            Self::Helion => "helium3",
            Self::Alpha => "alpha",
            Self::Helium6 => "helium6",
            Self::Lithium6 => "lithium6",
            Self::Lithium7 => "lithium7",
        }
    }

    /// Accepts the full names from `as_str` plus the usual short labels.
    pub fn from_name(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "pion" | "pi" => Some(Self::Pion),
            "proton" | "p" => Some(Self::Proton),
            "deuteron" | "d" => Some(Self::Deuteron),
            "triton" | "t" => Some(Self::Triton),
            "helium3" | "helion" | "he3" => Some(Self::Helion),
            "alpha" | "he4" => Some(Self::Alpha),
            "helium6" | "he6" => Some(Self::Helium6),
            "lithium6" | "li6" => Some(Self::Lithium6),
            "lithium7" | "li7" => Some(Self::Lithium7),
            _ => None,
        }
    }
}

impl Display for ParticleSpecies {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// Which energy-loss observable a calibration maps onto the detector
/// response: the Bethe-Bloch mean or the Landau-Vavilov most probable
/// value for a finite sampling length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LossModel {
    Mean,
    MostProbable,
}

impl LossModel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::MostProbable => "most-probable",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "mean" | "bethe-bloch" => Some(Self::Mean),
            "most-probable" | "mpv" | "landau-vavilov" => Some(Self::MostProbable),
            _ => None,
        }
    }
}

impl Display for LossModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}
