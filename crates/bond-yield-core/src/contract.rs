//! JSON request/response contract consumed by the UI layer.
//!
//! Requests arrive as plain JSON numbers and are converted to validated
//! [`BondParameters`]; responses carry full-precision money fields and yields
//! rounded to three decimal places.

use chrono::{Local, NaiveDate};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::bond::BondParameters;
use crate::config::SolverConfig;
use crate::error::BondYieldError;
use crate::schedule::CashFlowPeriod;
use crate::types::{with_metadata, ComputationOutput, CouponFrequency, Money, Percent, PremiumOrDiscount};
use crate::valuation::{solve_detailed, solve_with_config, BondResult};
use crate::BondYieldResult;

/// Decimal places kept on `currentYield` and `ytm` in a response.
pub const YIELD_DECIMAL_PLACES: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BondRequest {
    pub face_value: f64,
    /// Annual coupon rate in percent.
    pub coupon_rate: f64,
    pub market_price: f64,
    pub years_to_maturity: f64,
    /// Coupon payments per year: 1, 2, 4 or 12.
    pub frequency: f64,
    /// First date of the schedule; today when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_date: Option<NaiveDate>,
}

impl BondRequest {
    /// Validate and convert to engine parameters. Rejects non-finite numbers,
    /// values outside the decimal range, non-integral or unsupported
    /// frequencies, and anything `BondParameters::new` refuses.
    pub fn to_parameters(&self) -> BondYieldResult<BondParameters> {
        BondParameters::new(
            to_decimal("face_value", self.face_value)?,
            to_decimal("coupon_rate", self.coupon_rate)?,
            to_decimal("market_price", self.market_price)?,
            to_decimal("years_to_maturity", self.years_to_maturity)?,
            to_frequency(self.frequency)?,
            self.anchor_date.unwrap_or_else(today),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BondResponse {
    pub current_yield: Percent,
    pub ytm: Percent,
    pub total_interest: Money,
    pub premium_or_discount: PremiumOrDiscount,
    pub cash_flows: Vec<CashFlowPeriod>,
}

impl From<BondResult> for BondResponse {
    fn from(r: BondResult) -> Self {
        BondResponse {
            current_yield: round_yield(r.current_yield),
            ytm: round_yield(r.ytm),
            total_interest: r.total_interest,
            premium_or_discount: r.premium_or_discount,
            cash_flows: r.cash_flows,
        }
    }
}

/// Handle one request with the default solver settings.
pub fn calculate_bond(request: &BondRequest) -> BondYieldResult<BondResponse> {
    calculate_bond_with_config(request, &SolverConfig::default())
}

pub fn calculate_bond_with_config(
    request: &BondRequest,
    config: &SolverConfig,
) -> BondYieldResult<BondResponse> {
    let params = request.to_parameters()?;
    solve_with_config(&params, config).map(BondResponse::from)
}

/// Parse a JSON request and produce a JSON response.
pub fn calculate_bond_json(request_json: &str) -> BondYieldResult<String> {
    let request: BondRequest = serde_json::from_str(request_json)?;
    let response = calculate_bond(&request)?;
    Ok(serde_json::to_string(&response)?)
}

/// Full valuation wrapped in the computation envelope, with solver
/// assumptions and any warnings about the inputs.
pub fn analyze_bond(
    request: &BondRequest,
    config: &SolverConfig,
) -> BondYieldResult<ComputationOutput<BondResponse>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let params = request.to_parameters()?;
    if params.period_count_was_rounded() {
        warnings.push(format!(
            "years_to_maturity * frequency = {} rounded half-up to {} coupon periods",
            params.raw_period_product().normalize(),
            params.period_count()
        ));
    }

    let (result, solution) = solve_detailed(&params, config)?;
    if result.ytm < Decimal::ZERO {
        warnings.push(
            "Market price exceeds the undiscounted cash flows; yield to maturity is negative"
                .into(),
        );
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "ytm_method": "bisection",
        "tolerance": config.tolerance.to_string(),
        "max_iterations": config.max_iterations,
        "iterations_used": solution.iterations,
        "bracket_expansions": solution.bracket_expansions,
        "period_count": params.period_count(),
        "anchor_date": params.anchor_date(),
        "principal": "bullet repayment at maturity",
        "yield_rounding_dp": YIELD_DECIMAL_PLACES
    });

    Ok(with_metadata(
        "Bond Yield Analysis (bisection YTM, bullet bond)",
        &assumptions,
        warnings,
        elapsed,
        BondResponse::from(result),
    ))
}

pub fn round_yield(value: Percent) -> Percent {
    value.round_dp_with_strategy(YIELD_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn to_decimal(field: &str, value: f64) -> BondYieldResult<Decimal> {
    if !value.is_finite() {
        return Err(BondYieldError::invalid(field, "Value must be a finite number"));
    }
    Decimal::from_f64(value)
        .ok_or_else(|| BondYieldError::invalid(field, "Value is outside the supported range"))
}

fn to_frequency(value: f64) -> BondYieldResult<CouponFrequency> {
    if !value.is_finite() || value.fract() != 0.0 || value < 1.0 || value > f64::from(u32::MAX) {
        return Err(BondYieldError::invalid(
            "frequency",
            format!("Frequency must be 1, 2, 4, or 12 (got {value})"),
        ));
    }
    CouponFrequency::try_from(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request() -> BondRequest {
        BondRequest {
            face_value: 1000.0,
            coupon_rate: 5.0,
            market_price: 980.0,
            years_to_maturity: 5.0,
            frequency: 2.0,
            anchor_date: NaiveDate::from_ymd_opt(2025, 1, 1),
        }
    }

    #[test]
    fn test_request_camel_case() {
        let json = r#"{"faceValue":1000,"couponRate":5,"marketPrice":980,"yearsToMaturity":5,"frequency":2}"#;
        let req: BondRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.face_value, 1000.0);
        assert_eq!(req.anchor_date, None);
        assert_eq!(req.to_parameters().unwrap().anchor_date, today());
    }

    #[test]
    fn test_missing_field_rejected() {
        let json = r#"{"faceValue":1000,"couponRate":5,"marketPrice":980,"frequency":2}"#;
        assert!(calculate_bond_json(json).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut req = request();
        req.market_price = f64::NAN;
        match req.to_parameters() {
            Err(BondYieldError::InvalidParameter { field, .. }) => assert_eq!(field, "market_price"),
            other => panic!("expected InvalidParameter, got {other:?}"),
        }

        let mut req = request();
        req.years_to_maturity = f64::INFINITY;
        assert!(req.to_parameters().is_err());
    }

    #[test]
    fn test_frequency_must_be_supported_integer() {
        for bad in [2.5, 0.0, 3.0, -4.0, 24.0] {
            let mut req = request();
            req.frequency = bad;
            let err = req.to_parameters().unwrap_err();
            match err {
                BondYieldError::InvalidParameter { field, .. } => assert_eq!(field, "frequency"),
                other => panic!("expected InvalidParameter, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_response_rounds_yields_only() {
        let resp = calculate_bond(&request()).unwrap();
        assert_eq!(resp.current_yield, dec!(5.102));
        assert_eq!(resp.ytm, dec!(5.463));
        assert_eq!(resp.total_interest, dec!(250));
        assert_eq!(resp.premium_or_discount, PremiumOrDiscount::Discount);
    }

    #[test]
    fn test_round_yield_half_up() {
        assert_eq!(round_yield(dec!(1.2345)), dec!(1.235));
        assert_eq!(round_yield(dec!(1.2344)), dec!(1.234));
    }

    #[test]
    fn test_analyze_warns_on_rounded_periods() {
        let mut req = request();
        req.years_to_maturity = 2.25;
        let out = analyze_bond(&req, &SolverConfig::default()).unwrap();
        assert_eq!(out.result.cash_flows.len(), 5);
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("4.5"), "{}", out.warnings[0]);
        assert_eq!(out.assumptions["ytm_method"], "bisection");
    }

    #[test]
    fn test_analyze_warns_on_negative_yield() {
        let mut req = request();
        req.coupon_rate = 0.0;
        req.market_price = 1100.0;
        req.years_to_maturity = 1.0;
        req.frequency = 1.0;
        let out = analyze_bond(&req, &SolverConfig::default()).unwrap();
        assert!(out.result.ytm < Decimal::ZERO);
        assert!(out.warnings.iter().any(|w| w.contains("negative")));
    }
}
