//! Coupon schedule for a bullet bond: a constant coupon every period and the
//! whole principal returned with the final payment.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::bond::BondParameters;
use crate::error::BondYieldError;
use crate::types::{CouponFrequency, Money};
use crate::BondYieldResult;

/// One row of the cash-flow table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowPeriod {
    /// 1-based period index.
    pub period: u32,
    pub payment_date: NaiveDate,
    pub coupon_payment: Money,
    /// Running sum of coupons paid up to and including this period.
    pub cumulative_interest: Money,
    /// Principal still outstanding after this period's payment.
    pub remaining_principal: Money,
}

/// Build the period-ascending schedule, one row per coupon period.
pub fn generate_schedule(params: &BondParameters) -> BondYieldResult<Vec<CashFlowPeriod>> {
    let n = params.period_count();
    if n < 1 {
        return Err(BondYieldError::invalid(
            "years_to_maturity",
            "Schedule requires at least one coupon period",
        ));
    }

    let coupon = params.period_coupon_payment();
    let mut rows = Vec::with_capacity(n as usize);

    for i in 1..=n {
        let remaining_principal = if i < n {
            params.face_value()
        } else {
            Decimal::ZERO
        };
        let cumulative_interest = coupon.checked_mul(Decimal::from(i)).ok_or_else(|| {
            BondYieldError::invalid(
                "coupon_rate",
                format!("Cumulative interest at period {i} exceeds the representable range"),
            )
        })?;
        rows.push(CashFlowPeriod {
            period: i,
            payment_date: payment_date(params.anchor_date(), params.frequency(), i)?,
            coupon_payment: coupon,
            cumulative_interest,
            remaining_principal,
        });
    }

    Ok(rows)
}

/// `anchor` advanced by `period` whole coupon intervals. Days past the end of
/// the target month clamp to its last day; each date is computed from the
/// anchor so clamping never accumulates.
pub fn payment_date(
    anchor: NaiveDate,
    frequency: CouponFrequency,
    period: u32,
) -> BondYieldResult<NaiveDate> {
    period
        .checked_mul(frequency.months_per_period())
        .and_then(|months| anchor.checked_add_months(Months::new(months)))
        .ok_or_else(|| {
            BondYieldError::invalid(
                "anchor_date",
                format!("Payment date for period {period} is outside the supported calendar"),
            )
        })
}

/// Sum of every coupon in the schedule.
pub fn total_interest(schedule: &[CashFlowPeriod]) -> BondYieldResult<Money> {
    schedule.iter().try_fold(Decimal::ZERO, |acc, row| {
        acc.checked_add(row.coupon_payment).ok_or_else(|| {
            BondYieldError::invalid("coupon_rate", "Total interest exceeds the representable range")
        })
    })
}
