use chrono::NaiveDate;
use clap::Args;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

use bond_yield_core::contract::{self, BondRequest};
use bond_yield_core::pricing;
use bond_yield_core::schedule;
use bond_yield_core::types::{with_metadata, Money, Percent};
use bond_yield_core::SolverConfig;

use crate::input;

/// Bond terms, from a JSON file, explicit flags, or piped stdin (in that order)
#[derive(Args)]
pub struct BondArgs {
    /// Path to JSON input file in the request shape
    #[arg(long)]
    pub input: Option<String>,
    /// Principal repaid at maturity
    #[arg(long)]
    pub face_value: Option<f64>,
    /// Annual coupon rate in percent (5 = 5%)
    #[arg(long)]
    pub coupon_rate: Option<f64>,
    /// Current market price
    #[arg(long)]
    pub market_price: Option<f64>,
    /// Years to maturity
    #[arg(long)]
    pub years: Option<f64>,
    /// Coupon payments per year (1, 2, 4 or 12)
    #[arg(long)]
    pub frequency: Option<u32>,
    /// First date of the schedule (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub anchor_date: Option<NaiveDate>,
}

impl BondArgs {
    /// True when any bond term was given as a flag; stdin is then ignored.
    fn has_bond_flags(&self) -> bool {
        self.face_value.is_some()
            || self.coupon_rate.is_some()
            || self.market_price.is_some()
            || self.years.is_some()
            || self.frequency.is_some()
            || self.anchor_date.is_some()
    }
}

/// Arguments for pricing at a given yield
#[derive(Args)]
pub struct PriceArgs {
    #[command(flatten)]
    pub bond: BondArgs,
    /// Annual yield in percent
    #[arg(long = "yield", allow_negative_numbers = true)]
    pub annual_yield: f64,
}

#[derive(Debug, Serialize)]
struct PriceOutput {
    annual_yield: Percent,
    price: Money,
    period_count: u32,
}

pub fn run_calculate(
    args: BondArgs,
    config: &SolverConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request = resolve_request(&args, "calculate", true)?;
    let result = contract::analyze_bond(&request, config)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: BondArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = resolve_request(&args, "schedule", true)?;
    let params = request.to_parameters()?;
    let rows = schedule::generate_schedule(&params)?;
    Ok(serde_json::to_value(rows)?)
}

pub fn run_price(args: PriceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let request = resolve_request(&args.bond, "price", false)?;
    let params = request.to_parameters()?;
    let annual_yield = Decimal::from_f64(args.annual_yield)
        .ok_or("--yield must be a finite number")?;
    let price = pricing::price_at_yield(&params, annual_yield)?;

    let output = PriceOutput {
        annual_yield,
        price,
        period_count: params.period_count(),
    };
    let assumptions = serde_json::json!({
        "discounting": "per-period compounding at yield / frequency",
        "principal": "bullet repayment at maturity"
    });
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(serde_json::to_value(with_metadata(
        "Bond price at yield",
        &assumptions,
        Vec::new(),
        elapsed,
        output,
    ))?)
}

fn resolve_request(
    args: &BondArgs,
    command: &str,
    market_price_required: bool,
) -> Result<BondRequest, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }
    if args.has_bond_flags() {
        return request_from_flags(args, market_price_required);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }
    Err(format!("--input <file.json>, bond flags, or stdin required for {command}").into())
}

fn request_from_flags(
    args: &BondArgs,
    market_price_required: bool,
) -> Result<BondRequest, Box<dyn std::error::Error>> {
    let face_value = args.face_value.ok_or("--face-value is required")?;
    let market_price = match args.market_price {
        Some(p) => p,
        None if !market_price_required => face_value,
        None => return Err("--market-price is required".into()),
    };
    Ok(BondRequest {
        face_value,
        coupon_rate: args.coupon_rate.ok_or("--coupon-rate is required")?,
        market_price,
        years_to_maturity: args.years.ok_or("--years is required")?,
        frequency: f64::from(args.frequency.ok_or("--frequency is required")?),
        anchor_date: args.anchor_date,
    })
}
