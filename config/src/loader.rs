//! # Environment Variable Loader
//!
//! Loads configuration from environment variables following 12-factor app
//! principles.
//!
//! # Naming Convention
//! - `NOTION_*`: Notes service settings
//! - `GEMINI_*`: Generation service settings
//! - `LINE_*`: Messaging settings
//! - `QUIZ_*`: Quiz window settings
//! - `HTTP_*`: Shared HTTP client settings

use crate::config::{
    GeminiConfig, HttpConfig, LineConfig, NotionConfig, QuizBotConfig, QuizConfig,
    default_days, default_gemini_base_url, default_gemini_model, default_line_base_url,
    default_notion_base_url, default_question_count, default_timeout_seconds,
    default_title_property
};
use errors::ConfigError;
use std::env;
use validator::Validate;

/// Load the full configuration from environment variables.
///
/// ## Environment Variables
/// ### Notion (`NOTION_*`)
/// - `NOTION_API_KEY`: Integration token (required)
/// - `NOTION_DATABASE_ID`: Monthly pages database (required)
/// - `NOTION_TITLE_PROPERTY`: Title property name (default: "Name")
/// - `NOTION_API_BASE_URL`: API root (default: "https://api.notion.com")
///
/// ### Gemini (`GEMINI_*`)
/// - `GEMINI_API_KEY`: API key (required)
/// - `GEMINI_MODEL`: Model name (default: "gemini-2.5-flash")
/// - `GEMINI_API_BASE_URL`: API root (default:
///   "https://generativelanguage.googleapis.com")
///
/// ### LINE (`LINE_*`)
/// - `LINE_CHANNEL_ACCESS_TOKEN`: Channel access token (required)
/// - `LINE_USER_ID`: Recipient user id (required)
/// - `LINE_API_BASE_URL`: API root (default: "https://api.line.me")
///
/// ### Quiz (`QUIZ_*`)
/// - `QUIZ_DAYS`: Days of notes, ending today (default: 7)
/// - `QUIZ_QUESTION_COUNT`: Questions per quiz (default: 10)
///
/// ### HTTP (`HTTP_*`)
/// - `HTTP_TIMEOUT_SECONDS`: Request timeout (default: 30)
///
/// Empty values count as unset.
pub fn load_from_env() -> Result<QuizBotConfig, ConfigError> {
    let config = QuizBotConfig {
        notion: load_notion_from_env()?,
        gemini: load_gemini_from_env()?,
        line: load_line_from_env()?,
        quiz: load_quiz_from_env()?,
        http: load_http_from_env()?
    };

    config.validate().map_err(|e| ConfigError::Invalid {
        key: "config".to_string(),
        reason: e.to_string()
    })?;

    tracing::debug!(
        model = %config.gemini.model,
        days = config.quiz.days,
        question_count = config.quiz.question_count,
        "Loaded configuration from environment"
    );

    Ok(config)
}

pub fn load_notion_from_env() -> Result<NotionConfig, ConfigError> {
    Ok(NotionConfig {
        api_key: required("NOTION_API_KEY")?,
        database_id: required("NOTION_DATABASE_ID")?,
        title_property: optional("NOTION_TITLE_PROPERTY").unwrap_or_else(default_title_property),
        base_url: optional("NOTION_API_BASE_URL").unwrap_or_else(default_notion_base_url)
    })
}

pub fn load_gemini_from_env() -> Result<GeminiConfig, ConfigError> {
    Ok(GeminiConfig {
        api_key: required("GEMINI_API_KEY")?,
        model: optional("GEMINI_MODEL").unwrap_or_else(default_gemini_model),
        base_url: optional("GEMINI_API_BASE_URL").unwrap_or_else(default_gemini_base_url)
    })
}

pub fn load_line_from_env() -> Result<LineConfig, ConfigError> {
    Ok(LineConfig {
        channel_access_token: required("LINE_CHANNEL_ACCESS_TOKEN")?,
        user_id: required("LINE_USER_ID")?,
        base_url: optional("LINE_API_BASE_URL").unwrap_or_else(default_line_base_url)
    })
}

pub fn load_quiz_from_env() -> Result<QuizConfig, ConfigError> {
    let quiz = QuizConfig {
        days: parse_env("QUIZ_DAYS")?.unwrap_or_else(default_days),
        question_count: parse_env("QUIZ_QUESTION_COUNT")?.unwrap_or_else(default_question_count)
    };

    quiz.validate().map_err(|e| ConfigError::Invalid {
        key: "QUIZ_*".to_string(),
        reason: e.to_string()
    })?;

    Ok(quiz)
}

pub fn load_http_from_env() -> Result<HttpConfig, ConfigError> {
    let http = HttpConfig {
        timeout_seconds: parse_env("HTTP_TIMEOUT_SECONDS")?
            .unwrap_or_else(default_timeout_seconds)
    };

    http.validate().map_err(|e| ConfigError::Invalid {
        key: "HTTP_TIMEOUT_SECONDS".to_string(),
        reason: e.to_string()
    })?;

    Ok(http)
}

fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(key: &str) -> Result<String, ConfigError> {
    optional(key).ok_or_else(|| ConfigError::Missing {
        key: key.to_string()
    })
}

fn parse_env<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display
{
    optional(key)
        .map(|raw| {
            raw.parse::<T>().map_err(|e| ConfigError::Invalid {
                key: key.to_string(),
                reason: e.to_string()
            })
        })
        .transpose()
}
