//! # Configuration Structures
//!
//! All configuration structures:
//! - Use `serde` for serialization/deserialization
//! - Use `validator` for range checks on numeric settings
//! - Carry credentials as plain strings loaded from the environment

use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Main configuration structure for the quiz bot.
///
/// Built once at process start and handed to each client constructor.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct QuizBotConfig {
    pub notion: NotionConfig,
    pub gemini: GeminiConfig,
    pub line: LineConfig,

    #[validate(nested)]
    #[serde(default)]
    pub quiz: QuizConfig,

    #[validate(nested)]
    #[serde(default)]
    pub http: HttpConfig
}

/// Notes service (Notion) configuration.
///
/// ## Fields
/// - `api_key`: Integration token (required)
/// - `database_id`: Database holding one page per month (required)
/// - `title_property`: Name of the title property used for month lookups
///   (default: "Name")
/// - `base_url`: API root (default: "https://api.notion.com")
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotionConfig {
    pub api_key: String,
    pub database_id: String,
    #[serde(default = "default_title_property")]
    pub title_property: String,
    #[serde(default = "default_notion_base_url")]
    pub base_url: String
}

/// Generation service (Gemini) configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String
}

/// Messaging (LINE) configuration.
///
/// `user_id` is the single recipient every quiz is pushed to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineConfig {
    pub channel_access_token: String,
    pub user_id: String,
    #[serde(default = "default_line_base_url")]
    pub base_url: String
}

/// Quiz window and size.
///
/// ## Fields
/// - `days`: Number of calendar days, ending today, to draw notes from
///   (default: 7, range: 1-366)
/// - `question_count`: Questions requested from the model (default: 10,
///   range: 1-50)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct QuizConfig {
    #[serde(default = "default_days")]
    #[validate(range(min = 1, max = 366))]
    pub days: u32,

    #[serde(default = "default_question_count")]
    #[validate(range(min = 1, max = 50))]
    pub question_count: u32
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            days: default_days(),
            question_count: default_question_count()
        }
    }
}

/// Shared HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    #[validate(range(min = 1, max = 300))]
    pub timeout_seconds: u64
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds()
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

pub(crate) fn default_title_property() -> String {
    "Name".to_string()
}

pub(crate) fn default_notion_base_url() -> String {
    "https://api.notion.com".to_string()
}

pub(crate) fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

pub(crate) fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

pub(crate) fn default_line_base_url() -> String {
    "https://api.line.me".to_string()
}

pub(crate) fn default_days() -> u32 {
    7
}

pub(crate) fn default_question_count() -> u32 {
    10
}

pub(crate) fn default_timeout_seconds() -> u64 {
    30
}
