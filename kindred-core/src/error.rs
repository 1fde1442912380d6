//! Error types for KINDRED operations

use crate::question::QuestionId;
use thiserror::Error;

/// Invalid input from the caller. These indicate a host/engine mismatch
/// (stale catalog, wrong option key) and must fail loudly, never default.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Question not found in catalog: {id}")]
    UnknownQuestion { id: QuestionId },

    #[error("Option value {value} not found on question {question}")]
    UnknownOption { question: QuestionId, value: i32 },

    #[error("Question {id} was already answered or skipped in this session")]
    DuplicateAnswer { id: QuestionId },

    #[error("Question catalog invalid: {reason}")]
    CatalogInvalid { reason: String },
}

/// Session lifecycle conditions. Exhausted budgets are recoverable
/// conditions the caller checks for, not programming errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session is finalized and read-only")]
    Finalized,

    #[error("Skip budget exhausted ({max} skips per session)")]
    SkipBudgetExhausted { max: u32 },
}

/// Master error type for all KINDRED operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Result type alias for KINDRED operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_option_display() {
        let err = InputError::UnknownOption {
            question: QuestionId::from("q_anchor_01"),
            value: 9,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("q_anchor_01"));
        assert!(msg.contains('9'));
    }

    #[test]
    fn skip_budget_display() {
        let err = SessionError::SkipBudgetExhausted { max: 3 };
        let msg = format!("{}", err);
        assert!(msg.contains("Skip budget exhausted"));
        assert!(msg.contains('3'));
    }

    #[test]
    fn engine_error_from_variants() {
        let input = EngineError::from(InputError::UnknownQuestion {
            id: QuestionId::from("q1"),
        });
        assert!(matches!(input, EngineError::Input(_)));

        let session = EngineError::from(SessionError::Finalized);
        assert!(matches!(session, EngineError::Session(_)));
    }
}
