//! Yield Solver entry point: assembles current yield, YTM, total interest,
//! premium/discount classification and the cash-flow schedule.

use serde::Serialize;

use crate::bond::BondParameters;
use crate::config::SolverConfig;
use crate::schedule::{generate_schedule, total_interest, CashFlowPeriod};
use crate::solver::{solve_ytm, YieldSolution};
use crate::types::{Money, Percent, PremiumOrDiscount};
use crate::BondYieldResult;

/// Full-precision valuation of one bond.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BondResult {
    /// Annual coupon / market price, in percent.
    pub current_yield: Percent,
    /// Annualised yield to maturity, in percent.
    pub ytm: Percent,
    /// Sum of every coupon over the life of the bond.
    pub total_interest: Money,
    pub premium_or_discount: PremiumOrDiscount,
    pub cash_flows: Vec<CashFlowPeriod>,
}

/// Value a bond with the default solver settings.
pub fn solve(params: &BondParameters) -> BondYieldResult<BondResult> {
    solve_with_config(params, &SolverConfig::default())
}

pub fn solve_with_config(
    params: &BondParameters,
    config: &SolverConfig,
) -> BondYieldResult<BondResult> {
    solve_detailed(params, config).map(|(result, _)| result)
}

/// Like [`solve_with_config`], also returning the solver diagnostics.
pub fn solve_detailed(
    params: &BondParameters,
    config: &SolverConfig,
) -> BondYieldResult<(BondResult, YieldSolution)> {
    config.validate()?;

    let current_yield = current_yield(params);
    let solution = solve_ytm(params, config)?;
    let cash_flows = generate_schedule(params)?;

    let result = BondResult {
        current_yield,
        ytm: solution.ytm,
        total_interest: total_interest(&cash_flows)?,
        premium_or_discount: classify(params),
        cash_flows,
    };
    Ok((result, solution))
}

/// `(coupon% / 100 * face) / price * 100`, i.e. annual coupon income over price.
/// Computed with checked arithmetic when the parameters are validated.
pub fn current_yield(params: &BondParameters) -> Percent {
    params.current_yield()
}

pub fn classify(params: &BondParameters) -> PremiumOrDiscount {
    let (price, face) = (params.market_price(), params.face_value());
    if price > face {
        PremiumOrDiscount::Premium
    } else if price < face {
        PremiumOrDiscount::Discount
    } else {
        PremiumOrDiscount::Par
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::price_at_yield;
    use crate::types::CouponFrequency;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

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
    fn test_reference_discount_bond() {
        let p = bond(dec!(5), dec!(980), dec!(5), CouponFrequency::SemiAnnual);
        let r = solve(&p).unwrap();

        assert_eq!(r.cash_flows.len(), 10);
        assert_eq!(r.total_interest, dec!(250));
        assert_eq!(r.premium_or_discount, PremiumOrDiscount::Discount);
        assert!(
            (r.current_yield - dec!(5.102)).abs() < dec!(0.001),
            "Current yield should be ~5.102%, got {}",
            r.current_yield
        );
        assert!(r.ytm > dec!(5), "YTM should exceed coupon, got {}", r.ytm);
        let price = price_at_yield(&p, r.ytm).unwrap();
        assert!((price - dec!(980)).abs() < dec!(0.001));
    }

    #[test]
    fn test_zero_coupon_par() {
        let p = bond(dec!(0), dec!(1000), dec!(1), CouponFrequency::Annual);
        let r = solve(&p).unwrap();
        assert!(r.ytm.abs() < dec!(0.00001));
        assert_eq!(r.total_interest, Decimal::ZERO);
        assert_eq!(r.current_yield, Decimal::ZERO);
        assert_eq!(r.premium_or_discount, PremiumOrDiscount::Par);
    }

    #[test]
    fn test_classification() {
        let at = |price| classify(&bond(dec!(5), price, dec!(5), CouponFrequency::Annual));
        assert_eq!(at(dec!(1001)), PremiumOrDiscount::Premium);
        assert_eq!(at(dec!(999.99)), PremiumOrDiscount::Discount);
        assert_eq!(at(dec!(1000.00)), PremiumOrDiscount::Par);
    }

    #[test]
    fn test_cumulative_interest_ends_at_total() {
        let p = bond(dec!(4.25), dec!(1012), dec!(7.5), CouponFrequency::Quarterly);
        let r = solve(&p).unwrap();
        assert_eq!(r.cash_flows.len(), 30);
        assert_eq!(
            r.cash_flows.last().unwrap().cumulative_interest,
            r.total_interest
        );
    }

    #[test]
    fn test_long_maturity_within_period_limit() {
        let p = bond(dec!(5), dec!(980), dec!(101), CouponFrequency::Monthly);
        let r = solve(&p).unwrap();
        assert_eq!(r.cash_flows.len(), 1212);
    }

    #[test]
    fn test_huge_face_value_does_not_panic() {
        let p = BondParameters::new(
            dec!(10000000000000000000000000000),
            dec!(10),
            dec!(10000000000000000000000000000),
            dec!(5),
            CouponFrequency::SemiAnnual,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        )
        .unwrap();
        let r = solve(&p).unwrap();
        assert_eq!(r.current_yield, dec!(10));
        assert_eq!(r.premium_or_discount, PremiumOrDiscount::Par);
        assert!((r.ytm - dec!(10)).abs() < dec!(0.001), "got {}", r.ytm);
    }

    #[test]
    fn test_detailed_reports_solver_diagnostics() {
        let p = bond(dec!(5), dec!(980), dec!(5), CouponFrequency::SemiAnnual);
        let (result, solution) = solve_detailed(&p, &SolverConfig::default()).unwrap();
        assert_eq!(result.ytm, solution.ytm);
        assert!(solution.iterations > 0);
    }
}
