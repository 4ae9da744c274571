//! Validated bond parameters and the quantities derived from them.
//!
//! A `BondParameters` value can only be built through [`BondParameters::new`],
//! so every downstream stage can assume positive face value, price and
//! maturity, a non-negative coupon, a supported frequency, between one and
//! [`MAX_PERIOD_COUNT`] coupon periods, and coupon totals that fit in a
//! `Decimal`. Every product a later stage needs is computed here with checked
//! arithmetic and stored.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::error::BondYieldError;
use crate::types::{CouponFrequency, Money, Percent, Years};
use crate::BondYieldResult;

/// Resource guard on schedule size: 1000 years of monthly coupons.
pub const MAX_PERIOD_COUNT: u32 = 12_000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BondParameters {
    face_value: Money,
    coupon_rate: Percent,
    market_price: Money,
    years_to_maturity: Years,
    frequency: CouponFrequency,
    pub(crate) anchor_date: NaiveDate,
    period_count: u32,
    period_product: Decimal,
    period_coupon_payment: Money,
    annual_coupon: Money,
    total_coupon: Money,
    current_yield: Percent,
}

impl BondParameters {
    pub fn new(
        face_value: Money,
        coupon_rate: Percent,
        market_price: Money,
        years_to_maturity: Years,
        frequency: CouponFrequency,
        anchor_date: NaiveDate,
    ) -> BondYieldResult<Self> {
        if face_value <= Decimal::ZERO {
            return Err(BondYieldError::invalid(
                "face_value",
                "Face value must be positive",
            ));
        }
        if coupon_rate < Decimal::ZERO {
            return Err(BondYieldError::invalid(
                "coupon_rate",
                "Coupon rate cannot be negative",
            ));
        }
        if market_price <= Decimal::ZERO {
            return Err(BondYieldError::invalid(
                "market_price",
                "Market price must be positive",
            ));
        }
        if years_to_maturity <= Decimal::ZERO {
            return Err(BondYieldError::invalid(
                "years_to_maturity",
                "Years to maturity must be positive",
            ));
        }

        let (period_product, period_count) = count_periods(years_to_maturity, frequency)?;

        let too_large = |field: &str, what: &str| {
            BondYieldError::invalid(field, format!("{what} exceeds the representable range"))
        };
        let annual_coupon = (coupon_rate / dec!(100))
            .checked_mul(face_value)
            .ok_or_else(|| too_large("face_value", "Annual coupon"))?;
        let period_coupon_payment =
            annual_coupon / Decimal::from(frequency.periods_per_year());
        let total_coupon = period_coupon_payment
            .checked_mul(Decimal::from(period_count))
            .ok_or_else(|| too_large("coupon_rate", "Total coupon over the life of the bond"))?;
        // Undiscounted value of every flow; bounds the price at any yield >= 0.
        total_coupon
            .checked_add(face_value)
            .ok_or_else(|| too_large("face_value", "Face value plus total coupon"))?;
        let current_yield = annual_coupon
            .checked_div(market_price)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or_else(|| too_large("market_price", "Current yield"))?;

        Ok(BondParameters {
            face_value,
            coupon_rate,
            market_price,
            years_to_maturity,
            frequency,
            anchor_date,
            period_count,
            period_product,
            period_coupon_payment,
            annual_coupon,
            total_coupon,
            current_yield,
        })
    }

    /// Principal repaid at maturity.
    pub fn face_value(&self) -> Money {
        self.face_value
    }

    /// Annual coupon rate as a percentage (5.0 = 5%).
    pub fn coupon_rate(&self) -> Percent {
        self.coupon_rate
    }

    /// Current trading price.
    pub fn market_price(&self) -> Money {
        self.market_price
    }

    pub fn years_to_maturity(&self) -> Years {
        self.years_to_maturity
    }

    pub fn frequency(&self) -> CouponFrequency {
        self.frequency
    }

    /// Date from which coupon dates are counted.
    pub fn anchor_date(&self) -> NaiveDate {
        self.anchor_date
    }

    /// Number of coupon periods: `round_half_up(years * frequency)`, at least 1.
    pub fn period_count(&self) -> u32 {
        self.period_count
    }

    /// Coupon rate per period as a decimal fraction of face value.
    pub fn period_coupon_rate(&self) -> Decimal {
        self.coupon_rate / dec!(100) / Decimal::from(self.frequency.periods_per_year())
    }

    /// Coupon paid each period; constant because principal never amortises.
    pub fn period_coupon_payment(&self) -> Money {
        self.period_coupon_payment
    }

    pub fn annual_coupon(&self) -> Money {
        self.annual_coupon
    }

    /// Sum of every coupon: `period_coupon_payment * period_count`.
    pub fn total_coupon(&self) -> Money {
        self.total_coupon
    }

    /// Annual coupon over market price, in percent.
    pub fn current_yield(&self) -> Percent {
        self.current_yield
    }

    /// Per-period discount rate for an annual yield in percent.
    pub fn periodic_yield(&self, annual_yield: Percent) -> Decimal {
        annual_yield / (dec!(100) * Decimal::from(self.frequency.periods_per_year()))
    }

    /// True when `years * frequency` had to be rounded to reach whole periods.
    pub fn period_count_was_rounded(&self) -> bool {
        self.period_product != Decimal::from(self.period_count)
    }

    pub(crate) fn raw_period_product(&self) -> Decimal {
        self.period_product
    }
}

fn count_periods(
    years_to_maturity: Years,
    frequency: CouponFrequency,
) -> BondYieldResult<(Decimal, u32)> {
    let too_many = || {
        BondYieldError::invalid(
            "years_to_maturity",
            format!(
                "Schedule would exceed the resource limit of {MAX_PERIOD_COUNT} coupon periods"
            ),
        )
    };
    let product = years_to_maturity
        .checked_mul(Decimal::from(frequency.periods_per_year()))
        .ok_or_else(too_many)?;
    // Round half up; the product is always positive here.
    let rounded = product.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let count = rounded.to_u32().ok_or_else(too_many)?;
    if count < 1 {
        return Err(BondYieldError::invalid(
            "years_to_maturity",
            format!(
                "{years_to_maturity} years at frequency {} gives zero coupon periods",
                frequency.periods_per_year()
            ),
        ));
    }
    if count > MAX_PERIOD_COUNT {
        return Err(too_many());
    }
    Ok((product, count))
}
