//! Effective-medium description of the P10 counting gas.
//!
//! Component data (Z, molar mass, mean excitation energy) and the Sternheimer
//! density-effect coefficients follow Atomic Data and Nuclear Data Tables 30,
//! 261 (1984); the mixture rule is the Z-weighted combination from the PDG
//! passage-of-particles review. Correction curves are evaluated per component
//! and mixed afterwards, never at the coefficient level.

use std::f64::consts::LN_10;

use crate::common::constants::P10_DENSITY;

/// Sternheimer parameterization (C, a, x0, x1, k) of the density effect
/// for one material, as a function of x = log10(beta*gamma).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SternheimerSet {
    pub c_bar: f64,
    pub a: f64,
    pub x0: f64,
    pub x1: f64,
    pub k: f64,
}

impl SternheimerSet {
    /// Three-region piecewise correction: zero below `x0`, the fitted
    /// transition on `[x0, x1)`, the conductor-free plateau from `x1` up.
    pub fn delta(&self, x: f64) -> f64 {
        if x < self.x0 {
            0.0
        } else if x < self.x1 {
            2.0 * LN_10 * x - self.c_bar + self.a * (self.x1 - x).powf(self.k)
        } else {
            2.0 * LN_10 * x - self.c_bar
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasComponent {
    pub atomic_number: f64,
    pub molar_mass: f64,
    /// Mean excitation energy in MeV.
    pub mean_excitation: f64,
    pub sternheimer: SternheimerSet,
}

pub const ARGON: GasComponent = GasComponent {
    atomic_number: 18.0,
    molar_mass: 39.95,
    mean_excitation: 188.0e-6,
    sternheimer: SternheimerSet {
        c_bar: 11.948,
        a: 0.197_14,
        x0: 1.7635,
        x1: 4.4855,
        k: 2.9618,
    },
};

/// Methane folded into one component: Z counts carbon plus four hydrogens,
/// the molar mass likewise.
pub const METHANE: GasComponent = GasComponent {
    atomic_number: 10.0,
    molar_mass: 12.01 + 4.0 * 1.007_94,
    mean_excitation: 41.7e-6,
    sternheimer: SternheimerSet {
        c_bar: 9.5243,
        a: 0.092_53,
        x0: 1.6263,
        x1: 3.9716,
        k: 3.6257,
    },
};

/// Two-component gas with fixed mole fractions. Exposes the effective
/// single-material parameters the energy-loss formulas consume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasMixture {
    primary: GasComponent,
    admixture: GasComponent,
    primary_fraction: f64,
    density: f64,
}

/// The standard 90/10 Ar/CH4 counting-gas mixture.
pub const P10: GasMixture = GasMixture {
    primary: ARGON,
    admixture: METHANE,
    primary_fraction: 0.9,
    density: P10_DENSITY,
};

impl GasMixture {
    pub fn density(&self) -> f64 {
        self.density
    }

    fn admixture_fraction(&self) -> f64 {
        1.0 - self.primary_fraction
    }

    pub fn z_eff(&self) -> f64 {
        self.primary_fraction * self.primary.atomic_number
            + self.admixture_fraction() * self.admixture.atomic_number
    }

    pub fn a_eff(&self) -> f64 {
        self.primary_fraction * self.primary.molar_mass
            + self.admixture_fraction() * self.admixture.molar_mass
    }

    /// Z-weighted mixture of ln(I) over the components.
    pub fn ln_mean_excitation(&self) -> f64 {
        (self.primary_fraction * self.primary.atomic_number * self.primary.mean_excitation.ln()
            + self.admixture_fraction()
                * self.admixture.atomic_number
                * self.admixture.mean_excitation.ln())
            / self.z_eff()
    }

    /// Z-weighted mixture of the per-component density-effect corrections.
    pub fn density_effect(&self, x: f64) -> f64 {
        (self.primary_fraction * self.primary.atomic_number * self.primary.sternheimer.delta(x)
            + self.admixture_fraction()
                * self.admixture.atomic_number
                * self.admixture.sternheimer.delta(x))
            / self.z_eff()
    }
}
