//! Physical constants shared by the energy-loss models and the mass solver.
//!
//! Masses are in MeV and follow the PDG listings; the helium-6 and lithium
//! fragment masses are products of tabulated atomic masses in amu. Medium
//! constants describe the P10 counting gas (90% Ar, 10% CH4 by mole).

pub const AMU: f64 = 931.478_f64;
pub const MEC2: f64 = 0.510_998_946_1_f64;
pub const M_PION: f64 = 139.570_18_f64;
pub const M_PROTON: f64 = 938.272_081_3_f64;
pub const M_DEUTERON: f64 = 1_875.612_762_f64;
pub const M_TRITON: f64 = 2_808.921_112_f64;
pub const M_HELION: f64 = 2_808.391_32_f64;
pub const M_ALPHA: f64 = 3_727.379_378_f64;
pub const M_HELIUM6: f64 = 6.0188_f64 * AMU;
pub const M_LITHIUM6: f64 = 6.0151_f64 * AMU;
pub const M_LITHIUM7: f64 = 7.016_f64 * AMU;

/// 4*pi*N_A*r_e^2*m_e*c^2 in MeV cm^2/mol.
pub const BETHE_K: f64 = 0.307_075_f64;
/// P10 density at standard conditions in g/cm^3.
pub const P10_DENSITY: f64 = 1.534e-3_f64;

pub const MASS_BRACKET_MIN: f64 = 0.1;
pub const MASS_BRACKET_MAX: f64 = 10_000.0;
