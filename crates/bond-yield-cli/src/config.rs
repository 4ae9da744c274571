//! Solver configuration loading for the CLI.

use bond_yield_core::SolverConfig;
use std::fs;
use tracing::debug;

/// Load a `SolverConfig` from a TOML file, or the defaults when no path is given.
pub fn load_solver_config(path: Option<&str>) -> Result<SolverConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(p) => {
            let contents = fs::read_to_string(p)
                .map_err(|e| format!("Failed to read config '{}': {}", p, e))?;
            parse_solver_config(&contents)
                .map_err(|e| format!("Invalid config '{}': {}", p, e))?
        }
        None => SolverConfig::default(),
    };
    debug!(?config, "solver configuration loaded");
    Ok(config)
}

fn parse_solver_config(contents: &str) -> Result<SolverConfig, Box<dyn std::error::Error>> {
    let config: SolverConfig = toml::from_str(contents)?;
    config.validate()?;
    Ok(config)
}
