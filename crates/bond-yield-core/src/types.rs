use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BondYieldError;
use crate::BondYieldResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as annual percentages (5.0 = 5%), matching the request contract.
pub type Percent = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// Coupon payments per year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum CouponFrequency {
    Annual,
    SemiAnnual,
    Quarterly,
    Monthly,
}

impl CouponFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            CouponFrequency::Annual => 1,
            CouponFrequency::SemiAnnual => 2,
            CouponFrequency::Quarterly => 4,
            CouponFrequency::Monthly => 12,
        }
    }

    /// Calendar months between two consecutive payments.
    pub fn months_per_period(self) -> u32 {
        12 / self.periods_per_year()
    }
}

impl TryFrom<u32> for CouponFrequency {
    type Error = BondYieldError;

    fn try_from(value: u32) -> BondYieldResult<Self> {
        match value {
            1 => Ok(CouponFrequency::Annual),
            2 => Ok(CouponFrequency::SemiAnnual),
            4 => Ok(CouponFrequency::Quarterly),
            12 => Ok(CouponFrequency::Monthly),
            other => Err(BondYieldError::invalid(
                "frequency",
                format!("Frequency must be 1, 2, 4, or 12 (got {other})"),
            )),
        }
    }
}

impl From<CouponFrequency> for u32 {
    fn from(f: CouponFrequency) -> Self {
        f.periods_per_year()
    }
}

/// Where the market price sits relative to face value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PremiumOrDiscount {
    Premium,
    Discount,
    Par,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
