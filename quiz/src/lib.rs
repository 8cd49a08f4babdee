//! # Quiz Generation
//!
//! Turns aggregated note text into a validated multiple-choice quiz.
//!
//! - [`generator`]: prompt construction, bounded retries and response
//!   parsing
//! - [`pipeline`]: date window → notes → quiz orchestration
//! - [`gemini`]: HTTP client for the generation service

pub mod gemini;
pub mod generator;
pub mod pipeline;

pub use gemini::{GeminiClient, create_gemini_client};
pub use generator::{QuizGenerator, RetryPolicy, build_prompt, extract_json, parse_quiz_response};
pub use pipeline::{QuizOptions, QuizPipeline};
