use serde::{Deserialize, Serialize};

/// Numeric knobs shared by the elimination engine and the solver.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct NumericConfig {
    /// Values whose magnitude is at or below this are treated as zero; also the
    /// lower bound for the running normalized determinant during elimination.
    pub zero_threshold: f64,

    /// Upper bound on error-correction passes in `solve_ec`.
    pub max_refinements: usize,
}

impl NumericConfig {
    pub const DEFAULT_ZERO_THRESHOLD: f64 = 1e-18;
    pub const DEFAULT_MAX_REFINEMENTS: usize = 10;

    pub fn new(zero_threshold: f64, max_refinements: usize) -> Self {
        Self {
            zero_threshold,
            max_refinements,
        }
    }
}

impl Default for NumericConfig {
    fn default() -> Self {
        Self {
            zero_threshold: Self::DEFAULT_ZERO_THRESHOLD,
            max_refinements: Self::DEFAULT_MAX_REFINEMENTS,
        }
    }
}
