//! Yield to maturity by bisection on the price function.
//!
//! The bracket always satisfies `price(low) >= market_price > price(high)`.
//! A bracket that cannot be found within the expansion budget, or a bracket
//! that is still wider than the tolerance after the iteration cap, is a
//! `ConvergenceFailure`; the solver never returns an unconverged yield.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::bond::BondParameters;
use crate::config::SolverConfig;
use crate::error::BondYieldError;
use crate::pricing::try_price;
use crate::types::{Money, Percent};
use crate::BondYieldResult;

/// A converged yield together with how the solver got there.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldSolution {
    /// Annualised yield to maturity, in percent.
    pub ytm: Percent,
    pub iterations: u32,
    pub bracket_expansions: u32,
    /// Final bracket `[low, high]`.
    pub low: Percent,
    pub high: Percent,
}

/// Solve `price(ytm) = market_price` for the annual yield in percent.
pub fn solve_ytm(params: &BondParameters, config: &SolverConfig) -> BondYieldResult<YieldSolution> {
    config.validate()?;
    let target = params.market_price();

    let (mut low, mut high, bracket_expansions) = establish_bracket(params, target, config)?;
    debug!(%low, %high, bracket_expansions, "YTM bracket established");

    for iteration in 1..=config.max_iterations {
        let mid = low + (high - low) / dec!(2);
        if price_exceeds(params, mid, target) {
            low = mid;
        } else {
            high = mid;
        }
        trace!(iteration, %low, %high, "bisection step");

        if high - low < config.tolerance {
            let ytm = low + (high - low) / dec!(2);
            debug!(%ytm, iterations = iteration, "YTM converged");
            return Ok(YieldSolution {
                ytm,
                iterations: iteration,
                bracket_expansions,
                low,
                high,
            });
        }
    }

    warn!(%low, %high, max_iterations = config.max_iterations, "YTM bisection hit iteration cap");
    Err(BondYieldError::ConvergenceFailure {
        function: "YTM bisection".into(),
        iterations: config.max_iterations,
        last_delta: high - low,
    })
}

/// `price(y) > target`, treating an unrepresentably large price as above any target.
fn price_exceeds(params: &BondParameters, annual_yield: Percent, target: Money) -> bool {
    match try_price(params, annual_yield) {
        Some(price) => price > target,
        None => true,
    }
}

fn price_at_least(params: &BondParameters, annual_yield: Percent, target: Money) -> bool {
    match try_price(params, annual_yield) {
        Some(price) => price >= target,
        None => true,
    }
}

/// Find `[low, high]` with `price(low) >= target > price(high)`.
///
/// Starts from `low = 0`. A target above the undiscounted cash flows needs a
/// negative yield, so `low` walks halfway towards the `-100 * freq` asymptote
/// each step; otherwise `high` doubles from the configured initial bound.
fn establish_bracket(
    params: &BondParameters,
    target: Money,
    config: &SolverConfig,
) -> BondYieldResult<(Percent, Percent, u32)> {
    let mut expansions = 0u32;

    if !price_at_least(params, Decimal::ZERO, target) {
        let floor = -Decimal::ONE_HUNDRED * Decimal::from(params.frequency().periods_per_year());
        let mut high = Decimal::ZERO;
        let mut low = floor / dec!(2);
        while !price_at_least(params, low, target) {
            if expansions >= config.max_bracket_expansions {
                return Err(bracket_failure(expansions, low, high));
            }
            expansions += 1;
            high = low;
            low = (low + floor) / dec!(2);
        }
        return Ok((low, high, expansions));
    }

    let mut low = Decimal::ZERO;
    let mut high = config.initial_upper_bound;
    while price_at_least(params, high, target) {
        if expansions >= config.max_bracket_expansions {
            return Err(bracket_failure(expansions, low, high));
        }
        expansions += 1;
        low = high;
        high = high.checked_mul(dec!(2)).ok_or_else(|| bracket_failure(expansions, low, high))?;
    }
    Ok((low, high, expansions))
}

fn bracket_failure(expansions: u32, low: Percent, high: Percent) -> BondYieldError {
    warn!(%low, %high, expansions, "could not bracket YTM");
    BondYieldError::ConvergenceFailure {
        function: "YTM bracket search".into(),
        iterations: expansions,
        last_delta: high - low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::price_at_yield;
    use crate::types::CouponFrequency;
    use chrono::NaiveDate;

    fn bond(coupon: Decimal, price: Decimal, years: Decimal, freq: CouponFrequency) -> BondParameters {
        BondParameters::new(
            dec!(1000),
            coupon,
            price,
            years,
            freq,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_par_bond_yields_coupon() {
        let p = bond(dec!(5), dec!(1000), dec!(10), CouponFrequency::SemiAnnual);
        let sol = solve_ytm(&p, &SolverConfig::default()).unwrap();
        assert!(
            (sol.ytm - dec!(5)).abs() < dec!(0.00001),
            "Par bond YTM should be ~5%, got {}",
            sol.ytm
        );
    }

    #[test]
    fn test_discount_bond_above_coupon() {
        let p = bond(dec!(5), dec!(980), dec!(5), CouponFrequency::SemiAnnual);
        let sol = solve_ytm(&p, &SolverConfig::default()).unwrap();
        assert!(sol.ytm > dec!(5) && sol.ytm < dec!(6), "got {}", sol.ytm);
        // 5y semi-annual 5% bond at 980 yields ~5.46%
        assert!((sol.ytm - dec!(5.46)).abs() < dec!(0.01), "got {}", sol.ytm);
        let price = price_at_yield(&p, sol.ytm).unwrap();
        assert!((price - dec!(980)).abs() < dec!(0.001), "price(ytm) = {price}");
    }

    #[test]
    fn test_premium_bond_below_coupon() {
        let p = bond(dec!(8), dec!(1100), dec!(10), CouponFrequency::Annual);
        let sol = solve_ytm(&p, &SolverConfig::default()).unwrap();
        assert!(sol.ytm < dec!(8), "got {}", sol.ytm);
        assert!(sol.ytm > Decimal::ZERO);
    }

    #[test]
    fn test_bracket_within_tolerance() {
        let cfg = SolverConfig::default();
        let p = bond(dec!(3), dec!(870), dec!(7), CouponFrequency::Quarterly);
        let sol = solve_ytm(&p, &cfg).unwrap();
        assert!(sol.high - sol.low < cfg.tolerance);
        assert!(sol.low <= sol.ytm && sol.ytm <= sol.high);
        assert!(sol.iterations <= cfg.max_iterations);
    }

    #[test]
    fn test_zero_coupon_at_par_yields_zero() {
        let p = bond(dec!(0), dec!(1000), dec!(1), CouponFrequency::Annual);
        let sol = solve_ytm(&p, &SolverConfig::default()).unwrap();
        assert!(sol.ytm.abs() < dec!(0.00001), "got {}", sol.ytm);
    }

    #[test]
    fn test_price_above_undiscounted_flows_gives_negative_yield() {
        // Zero coupon paying 1000 in one year, bought at 1050.
        let p = bond(dec!(0), dec!(1050), dec!(1), CouponFrequency::Annual);
        let sol = solve_ytm(&p, &SolverConfig::default()).unwrap();
        // 1000 / 1050 - 1 = -4.7619%
        assert!((sol.ytm - dec!(-4.7619)).abs() < dec!(0.001), "got {}", sol.ytm);
    }

    #[test]
    fn test_deep_discount_needs_bracket_expansion() {
        let p = bond(dec!(2), dec!(50), dec!(10), CouponFrequency::Annual);
        let sol = solve_ytm(&p, &SolverConfig::default()).unwrap();
        assert!(sol.bracket_expansions > 0);
        assert!(sol.ytm > dec!(20));
        let price = price_at_yield(&p, sol.ytm).unwrap();
        assert!((price - dec!(50)).abs() < dec!(0.001), "price(ytm) = {price}");
    }

    #[test]
    fn test_bracket_budget_exhausted() {
        let cfg = SolverConfig {
            initial_upper_bound: dec!(1),
            max_bracket_expansions: 0,
            ..SolverConfig::default()
        };
        let p = bond(dec!(5), dec!(500), dec!(10), CouponFrequency::Annual);
        match solve_ytm(&p, &cfg) {
            Err(BondYieldError::ConvergenceFailure { function, .. }) => {
                assert_eq!(function, "YTM bracket search")
            }
            other => panic!("expected ConvergenceFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_iteration_cap_is_a_failure() {
        let cfg = SolverConfig {
            max_iterations: 3,
            ..SolverConfig::default()
        };
        let p = bond(dec!(5), dec!(980), dec!(5), CouponFrequency::SemiAnnual);
        match solve_ytm(&p, &cfg) {
            Err(BondYieldError::ConvergenceFailure { iterations, .. }) => assert_eq!(iterations, 3),
            other => panic!("expected ConvergenceFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_config_rejected_before_solving() {
        let cfg = SolverConfig {
            tolerance: dec!(-1),
            ..SolverConfig::default()
        };
        let p = bond(dec!(5), dec!(980), dec!(5), CouponFrequency::SemiAnnual);
        assert_eq!(solve_ytm(&p, &cfg).unwrap_err().kind(), "InvalidParameter");
    }
}
