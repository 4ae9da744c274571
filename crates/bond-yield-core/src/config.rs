//! Solver tuning. Every field has a default, so a partial TOML/JSON document
//! deserialises into a complete configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::BondYieldError;
use crate::types::Percent;
use crate::BondYieldResult;

/// Bisection stops once the bracket is narrower than this (annual percent).
pub const DEFAULT_TOLERANCE: Decimal = dec!(0.000001);

pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

pub const DEFAULT_MAX_BRACKET_EXPANSIONS: u32 = 60;

/// First upper yield tried when bracketing (annual percent).
pub const DEFAULT_INITIAL_UPPER_BOUND: Percent = dec!(20);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Bracket width, in annual yield percent, below which bisection stops.
    pub tolerance: Decimal,
    /// Hard cap on bisection steps.
    pub max_iterations: u32,
    /// Hard cap on doubling / halving steps while searching for a bracket.
    pub max_bracket_expansions: u32,
    /// Starting upper yield for the bracket search.
    pub initial_upper_bound: Percent,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_bracket_expansions: DEFAULT_MAX_BRACKET_EXPANSIONS,
            initial_upper_bound: DEFAULT_INITIAL_UPPER_BOUND,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> BondYieldResult<()> {
        if self.tolerance <= Decimal::ZERO {
            return Err(BondYieldError::invalid(
                "tolerance",
                "Tolerance must be positive",
            ));
        }
        if self.max_iterations == 0 {
            return Err(BondYieldError::invalid(
                "max_iterations",
                "At least one bisection iteration is required",
            ));
        }
        if self.initial_upper_bound <= Decimal::ZERO {
            return Err(BondYieldError::invalid(
                "initial_upper_bound",
                "Initial upper bound must be positive",
            ));
        }
        Ok(())
    }
}
