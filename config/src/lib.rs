//! # Configuration System
//!
//! Centralized configuration for the notes quiz bot.
//!
//! This crate provides:
//! - Configuration structures for the notes, generation and messaging
//!   services and for the quiz window itself
//! - Environment variable loading (12-factor app principles)
//! - Validation of numeric settings with the `validator` crate
//!
//! Credentials have no defaults: a missing one stops the bot before any
//! request is made.

pub mod config;
pub mod loader;

pub use config::{GeminiConfig, HttpConfig, LineConfig, NotionConfig, QuizBotConfig, QuizConfig};
pub use loader::{
    load_from_env, load_gemini_from_env, load_http_from_env, load_line_from_env,
    load_notion_from_env, load_quiz_from_env
};
pub use validator::Validate;
