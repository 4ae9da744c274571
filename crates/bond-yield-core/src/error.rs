use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BondYieldError {
    #[error("Invalid parameter: {field} — {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("Convergence failure: {function} did not converge after {iterations} iterations (delta: {last_delta})")]
    ConvergenceFailure {
        function: String,
        iterations: u32,
        last_delta: Decimal,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl BondYieldError {
    /// Stable name of the error kind, surfaced to callers alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            BondYieldError::InvalidParameter { .. } => "InvalidParameter",
            BondYieldError::ConvergenceFailure { .. } => "ConvergenceFailure",
            BondYieldError::SerializationError(_) => "SerializationError",
        }
    }

    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        BondYieldError::InvalidParameter {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for BondYieldError {
    fn from(e: serde_json::Error) -> Self {
        BondYieldError::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_kind_names() {
        assert_eq!(
            BondYieldError::invalid("face_value", "must be positive").kind(),
            "InvalidParameter"
        );
        let err = BondYieldError::ConvergenceFailure {
            function: "YTM bisection".into(),
            iterations: 100,
            last_delta: dec!(0.5),
        };
        assert_eq!(err.kind(), "ConvergenceFailure");
    }

    #[test]
    fn test_display_includes_field() {
        let err = BondYieldError::invalid("frequency", "Frequency must be 1, 2, 4, or 12");
        assert_eq!(
            err.to_string(),
            "Invalid parameter: frequency — Frequency must be 1, 2, 4, or 12"
        );
    }

    #[test]
    fn test_from_serde_json() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: BondYieldError = parse.unwrap_err().into();
        assert_eq!(err.kind(), "SerializationError");
    }
}
