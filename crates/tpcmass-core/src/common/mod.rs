pub mod constants;
pub mod medium;

pub use medium::{ARGON, GasComponent, GasMixture, METHANE, P10, SternheimerSet};
