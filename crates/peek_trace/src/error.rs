//! Error types for trace construction and operator evaluation.
//!
//! Queries (`value_at`, `trig_times`) are total and never produce these
//! errors; only structural violations do.

use crate::sample::Tick;

/// Errors raised while building traces or evaluating operators on them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TraceError {
    /// A sample was appended at or before the time of the last stored sample.
    #[error("sample at tick {time} does not follow last sample at tick {last}")]
    InvalidOrder {
        /// Time of the last stored sample.
        last: Tick,
        /// Time of the rejected sample.
        time: Tick,
    },

    /// Division or modulo by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// An operand has a kind the operator cannot accept.
    #[error("type mismatch in `{op}`: {reason}")]
    TypeMismatch {
        /// Symbol of the operator that rejected the operand.
        op: &'static str,
        /// Description of the mismatch.
        reason: String,
    },

    /// An operand has the right kind but an unusable value.
    #[error("invalid operand for `{op}`: {reason}")]
    InvalidOperand {
        /// Symbol of the operator that rejected the operand.
        op: &'static str,
        /// Description of the problem.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_order_display() {
        let e = TraceError::InvalidOrder { last: 10, time: 4 };
        assert_eq!(
            e.to_string(),
            "sample at tick 4 does not follow last sample at tick 10"
        );
    }

    #[test]
    fn division_by_zero_display() {
        assert_eq!(TraceError::DivisionByZero.to_string(), "division by zero");
    }

    #[test]
    fn type_mismatch_display() {
        let e = TraceError::TypeMismatch {
            op: "&",
            reason: "real operand".into(),
        };
        assert_eq!(e.to_string(), "type mismatch in `&`: real operand");
    }

    #[test]
    fn invalid_operand_display() {
        let e = TraceError::InvalidOperand {
            op: "<<",
            reason: "negative shift count".into(),
        };
        assert_eq!(e.to_string(), "invalid operand for `<<`: negative shift count");
    }
}
