//! Bond price as a function of annual yield:
//!
//!   P(y) = sum_{i=1}^{N} C / (1+r)^i + F / (1+r)^N,   r = y / (100 * freq)
//!
//! P is strictly decreasing for y > -100 * freq, which is what the yield
//! solver's bisection relies on.

use rust_decimal::Decimal;

use crate::bond::BondParameters;
use crate::error::BondYieldError;
use crate::types::{Money, Percent};
use crate::BondYieldResult;

/// Present value of the bond's remaining cash flows at `annual_yield` percent.
pub fn price_at_yield(params: &BondParameters, annual_yield: Percent) -> BondYieldResult<Money> {
    let floor = -Decimal::ONE_HUNDRED * Decimal::from(params.frequency().periods_per_year());
    if annual_yield <= floor {
        return Err(BondYieldError::invalid(
            "yield",
            format!("Yield must be greater than {floor}%"),
        ));
    }
    try_price(params, annual_yield).ok_or_else(|| {
        BondYieldError::invalid(
            "yield",
            format!("Price at {annual_yield}% exceeds the representable range"),
        )
    })
}

/// `None` when the price is too large to represent, which only happens for
/// deeply negative yields. Callers comparing against a market price may treat
/// `None` as greater than any finite price.
pub(crate) fn try_price(params: &BondParameters, annual_yield: Percent) -> Option<Money> {
    let growth = Decimal::ONE.checked_add(params.periodic_yield(annual_yield))?;
    if growth <= Decimal::ZERO {
        return None;
    }

    let coupon = params.period_coupon_payment();
    let mut pv = Decimal::ZERO;
    let mut discount = Decimal::ONE;

    // Build discount factors iteratively (no powd)
    for _ in 0..params.period_count() {
        discount = match discount.checked_mul(growth) {
            Some(d) => d,
            // Later flows, principal included, discount to zero at this precision.
            None => return Some(pv),
        };
        if discount.is_zero() {
            return None;
        }
        pv = pv.checked_add(coupon.checked_div(discount)?)?;
    }

    pv.checked_add(params.face_value().checked_div(discount)?)
}
