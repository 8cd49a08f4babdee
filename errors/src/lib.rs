//! # Quiz Bot Errors
//!
//! Error taxonomy for the notes quiz bot.
//!
//! - Uses `thiserror` for structured error definitions
//! - One enum per collaborator boundary (notes, generation, delivery)
//! - `PipelineError` is what the top-level invoker sees for a single run

use thiserror::Error;

/// Configuration errors, raised before any network call is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Required setting is not set: {key}")]
    Missing { key: String },

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String }
}

/// Notes service errors
#[derive(Debug, Error)]
pub enum NotesError {
    #[error("Notes request failed: {reason}")]
    Transport { reason: String },

    #[error("Notes API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Notes rate limited: retry after {retry_after}s")]
    RateLimited { retry_after: u64 },

    #[error("Notes unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("Could not decode notes response: {reason}")]
    Decode { reason: String }
}

/// Structural problems with a generated question or quiz.
///
/// Ordinals are 1-based so they match what a reader sees in the quiz.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Question {ordinal}: missing question text")]
    MissingQuestionText { ordinal: usize },

    #[error("Question {ordinal}: choices must be an array of 4 items")]
    InvalidChoices { ordinal: usize },

    #[error("Question {ordinal}: correctIndex must be 0-3")]
    InvalidCorrectIndex { ordinal: usize },

    #[error("Question {ordinal}: missing explanation")]
    MissingExplanation { ordinal: usize },

    #[error("Quiz has no title")]
    MissingTitle,

    #[error("Quiz has no questions")]
    NoQuestions
}

/// Text generation errors
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Generation request failed: {reason}")]
    Transport { reason: String },

    #[error("Generation API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Generation rate limited: retry after {retry_after}s")]
    RateLimited { retry_after: u64 },

    #[error("Generation unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("Generation returned an empty response")]
    EmptyResponse,

    #[error("Invalid response format: {reason}")]
    MalformedResponse { reason: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to generate quiz after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String }
}

/// Message delivery errors. Not retried by the core.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Delivery request failed: {reason}")]
    Transport { reason: String },

    #[error("Messaging API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Messaging rate limited: retry after {retry_after}s")]
    RateLimited { retry_after: u64 },

    #[error("Messaging unauthorized: {reason}")]
    Unauthorized { reason: String }
}

/// Errors surfaced by one quiz run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    ConfigurationMissing(#[from] ConfigError),

    #[error("No notes found for {start} ~ {end}")]
    ContentNotFound { start: String, end: String },

    #[error(transparent)]
    GenerationExhausted(#[from] GenerationError),

    #[error("Quiz validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error(transparent)]
    Notes(#[from] NotesError),

    #[error("Delivery failed: {0}")]
    DeliveryFailed(#[from] DeliveryError)
}

pub type NotesResult<T> = Result<T, NotesError>;
pub type GenerationResult<T> = Result<T, GenerationError>;
pub type DeliveryResult<T> = Result<T, DeliveryError>;
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_carry_ordinal() {
        let err = ValidationError::InvalidCorrectIndex { ordinal: 3 };
        assert_eq!(err.to_string(), "Question 3: correctIndex must be 0-3");

        let err = ValidationError::InvalidChoices { ordinal: 1 };
        assert!(err.to_string().contains("4 items"));
        assert_eq!(ValidationError::NoQuestions.to_string(), "Quiz has no questions");
    }

    #[test]
    fn test_exhausted_wraps_last_error() {
        let err = GenerationError::Exhausted {
            attempts: 3,
            last_error: "Generation returned an empty response".to_string()
        };
        assert_eq!(
            err.to_string(),
            "Failed to generate quiz after 3 attempts: Generation returned an empty response"
        );
    }

    #[test]
    fn test_pipeline_error_from_validation() {
        let err: PipelineError = ValidationError::MissingTitle.into();
        assert!(matches!(err, PipelineError::ValidationFailed(_)));
        assert_eq!(err.to_string(), "Quiz validation failed: Quiz has no title");
    }
}
