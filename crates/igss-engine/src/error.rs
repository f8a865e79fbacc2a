//! Error types for the rule-discovery engine.

use igss_evaluation::EvaluationError;
use igss_types::TypesError;
use thiserror::Error;

/// Errors raised by sequential selection and the escalation controller.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration rejected before any sampling started.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration text could not be parsed.
    #[error("configuration parse error: {0}")]
    ConfigParse(String),

    /// A selection was requested with unusable arguments.
    #[error("invalid selection arguments: {0}")]
    InvalidArgument(String),

    /// The sampling loop hit its draw or wall-clock cap.
    #[error("selection did not converge after {draws} draws (total weight {total_weight})")]
    SelectionDidNotConverge { draws: u64, total_weight: f64 },

    /// A round asked for more confidence mass than remains.
    #[error("delta budget exhausted: requested {requested}, remaining {remaining}")]
    BudgetExhausted { requested: f64, remaining: f64 },

    /// The stop handle was triggered.
    #[error("learning cancelled")]
    Cancelled,

    /// Data model error (dataset, priors, weights).
    #[error("data model error: {0}")]
    Types(#[from] TypesError),

    /// Error from the prediction/evaluation collaborator, passed through unchanged.
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::ConfigParse(e.to_string())
    }
}

/// Convenience type alias for engine results.
pub type EngineResult<T> = Result<T, EngineError>;
