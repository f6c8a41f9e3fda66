//! Error taxonomy shared by every layer of the core.
//!
//! Three disjoint kinds, wrapped by [`CoachError`]:
//!
//! - [`ServiceError`]: the completion service was unreachable, rejected the
//!   request, or answered with text that is not JSON of the expected shape.
//! - [`ValidationError`]: well-formed data that violates domain policy.
//! - [`RepositoryError`]: the exercise catalog could not satisfy a read.
//!
//! Every variant carries the content needed to diagnose it (raw response
//! text, the parsed structure, or the underlying cause).

use serde_json::Value;
use thiserror::Error;

/// Boxed cause attached to transport and store failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure talking to, or interpreting the answer of, the completion service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("completion request failed: {source}")]
    Transport {
        #[source]
        source: BoxError,
    },

    #[error("completion service returned {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("completion service returned no text{}", finish_suffix(.reason))]
    EmptyResponse { reason: Option<String> },

    #[error("model did not return valid JSON: {raw}")]
    InvalidJson {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {schema} schema ({reason}): {parsed}")]
    SchemaMismatch {
        schema: &'static str,
        parsed: Value,
        reason: String,
    },
}

impl ServiceError {
    /// Wrap any transport-level cause.
    pub fn transport(source: impl Into<BoxError>) -> Self {
        Self::Transport {
            source: source.into(),
        }
    }
}

fn finish_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|r| format!(" (finish reason: {r})"))
        .unwrap_or_default()
}

/// Well-formed data that violates domain policy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("unknown primary goal {0:?} (expected calorie_burn, general_fitness, strength, mobility, or rehab)")]
    UnknownGoal(String),

    #[error("{field} must be positive, got {value}")]
    NonPositiveDuration { field: String, value: i64 },

    #[error("plan contains no steps")]
    EmptyPlan,

    #[error("plan step {index} has no exercise id")]
    MissingExerciseId { index: usize },

    #[error("plan step {index} has no duration")]
    MissingDuration { index: usize },

    #[error("plan step {index} references exercise {exercise_id:?}, which was not offered")]
    UnknownExercise { index: usize, exercise_id: String },

    #[error("plan step {index} uses exercise {exercise_id:?}, contraindicated for {joint:?}")]
    ContraindicatedExercise {
        index: usize,
        exercise_id: String,
        joint: String,
    },
}

/// The exercise catalog could not satisfy a read.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("exercise catalog {operation} failed: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: BoxError,
    },
}

impl RepositoryError {
    /// Attribute a store failure to the catalog operation that hit it.
    pub fn store(operation: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Store {
            operation,
            source: source.into(),
        }
    }
}

/// Any failure surfaced by the public operations of this crate.
#[derive(Debug, Error)]
pub enum CoachError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl CoachError {
    /// Short label for the failure kind, suitable for logs and exit messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Service(_) => "service",
            Self::Validation(_) => "validation",
            Self::Repository(_) => "repository",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schema_mismatch_names_the_parsed_structure() {
        let err = ServiceError::SchemaMismatch {
            schema: "GoalProfile",
            parsed: json!({"duration_seconds": 300}),
            reason: "missing field `primary_goal`".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("GoalProfile"), "{msg}");
        assert!(msg.contains("duration_seconds"), "{msg}");
    }

    #[test]
    fn empty_response_mentions_finish_reason_when_known() {
        let err = ServiceError::EmptyResponse {
            reason: Some("SAFETY".to_string()),
        };
        assert!(err.to_string().contains("SAFETY"));

        let err = ServiceError::EmptyResponse { reason: None };
        assert_eq!(err.to_string(), "completion service returned no text");
    }

    #[test]
    fn kinds_stay_disjoint_through_conversion() {
        let service: CoachError = ServiceError::Provider {
            status: 500,
            message: "boom".to_string(),
        }
        .into();
        let validation: CoachError = ValidationError::EmptyPlan.into();
        let repo: CoachError = RepositoryError::store("list_all", "connection refused").into();

        assert_eq!(service.kind(), "service");
        assert_eq!(validation.kind(), "validation");
        assert_eq!(repo.kind(), "repository");
        assert!(matches!(repo, CoachError::Repository(_)));
    }

    #[test]
    fn anyhow_store_errors_keep_their_context() {
        let cause = anyhow::anyhow!("pool timed out").context("failed to list exercises");
        let err = RepositoryError::store("list_all", cause);
        let msg = err.to_string();
        assert!(msg.contains("list_all"), "{msg}");
        assert!(msg.contains("failed to list exercises"), "{msg}");
    }
}
