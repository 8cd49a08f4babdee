use chrono::{Local, NaiveDate};
use config::QuizConfig;
use errors::{PipelineError, PipelineResult};
use notes::NoteAggregator;
use quiz_core::types::{DateRange, Quiz};
use tracing::info;

use crate::generator::QuizGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizOptions {
    /// Calendar days of notes to draw from, ending today.
    pub days: u32,
    pub question_count: u32
}

impl Default for QuizOptions {
    fn default() -> Self {
        Self {
            days: 7,
            question_count: 10
        }
    }
}

impl From<&QuizConfig> for QuizOptions {
    fn from(config: &QuizConfig) -> Self {
        Self {
            days: config.days,
            question_count: config.question_count
        }
    }
}

/// Date window → aggregated notes → validated quiz.
pub struct QuizPipeline {
    aggregator: NoteAggregator,
    generator: QuizGenerator
}

impl QuizPipeline {
    pub fn new(aggregator: NoteAggregator, generator: QuizGenerator) -> Self {
        Self {
            aggregator,
            generator
        }
    }

    /// Quiz over the window ending on the local calendar date.
    pub async fn generate_quiz(&self, options: &QuizOptions) -> PipelineResult<Quiz> {
        self.generate_quiz_on(Local::now().date_naive(), options).await
    }

    pub async fn generate_quiz_on(
        &self,
        today: NaiveDate,
        options: &QuizOptions
    ) -> PipelineResult<Quiz> {
        let range = DateRange::ending_on(today, options.days);
        info!(window = %range, "Collecting notes for quiz");

        let content = self.aggregator.fetch_content(&range).await?;
        if content.trim().is_empty() {
            return Err(PipelineError::ContentNotFound {
                start: range.start.format("%Y-%m-%d").to_string(),
                end: range.end.format("%Y-%m-%d").to_string()
            });
        }
        info!(chars = content.chars().count(), "Collected note content");

        let questions = self
            .generator
            .generate(&content, options.question_count)
            .await?;

        let quiz = Quiz {
            title: format!("{} study notes", range),
            questions
        };
        quiz.validate()?;

        Ok(quiz)
    }
}
