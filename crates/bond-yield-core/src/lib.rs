pub mod bond;
pub mod config;
pub mod contract;
pub mod error;
pub mod pricing;
pub mod schedule;
pub mod solver;
pub mod types;
pub mod valuation;

pub use bond::BondParameters;
pub use config::SolverConfig;
pub use contract::{analyze_bond, calculate_bond, BondRequest, BondResponse};
pub use error::BondYieldError;
pub use types::*;
pub use valuation::{solve, solve_with_config, BondResult};

/// Standard result type for all bond-yield operations
pub type BondYieldResult<T> = Result<T, BondYieldError>;
