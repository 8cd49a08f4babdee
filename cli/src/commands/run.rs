//! Run command - the daily quiz
//!
//! Collects notes for the window ending today, generates a quiz and pushes
//! it to the configured recipient. `--dry-run` prints the messages instead
//! and needs no messaging credentials.

use anyhow::Result;
use clap::Args;
use config::QuizConfig;
use delivery::{DeliveryFormatter, QuizDelivery, create_line_client};
use errors::PipelineError;
use notes::{NoteAggregator, create_notion_client};
use quiz::{QuizGenerator, QuizOptions, QuizPipeline, create_gemini_client};
use tracing::info;

use crate::output;

#[derive(Args)]
pub struct RunArgs {
    /// Days of notes to draw from, ending today [env: QUIZ_DAYS, default: 7]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=366))]
    pub days: Option<u32>,

    /// Number of questions [env: QUIZ_QUESTION_COUNT, default: 10]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=50))]
    pub questions: Option<u32>,

    /// Print the formatted messages instead of sending them
    #[arg(long)]
    pub dry_run: bool
}

impl RunArgs {
    /// Flags win over the environment.
    fn options(&self, quiz: &QuizConfig) -> QuizOptions {
        let base = QuizOptions::from(quiz);
        QuizOptions {
            days: self.days.unwrap_or(base.days),
            question_count: self.questions.unwrap_or(base.question_count)
        }
    }
}

pub async fn run(args: RunArgs) -> Result<()> {
    let notion = config::load_notion_from_env()?;
    let gemini = config::load_gemini_from_env()?;
    let quiz_config = config::load_quiz_from_env()?;
    let http = config::load_http_from_env()?;
    // Messaging credentials are required before any request unless dry-running.
    let line = if args.dry_run {
        None
    } else {
        Some(config::load_line_from_env()?)
    };

    let options = args.options(&quiz_config);
    info!(
        days = options.days,
        questions = options.question_count,
        dry_run = args.dry_run,
        "Starting quiz run"
    );

    let source = create_notion_client(notion, &http)?;
    let llm = create_gemini_client(gemini, &http)?;
    let pipeline = QuizPipeline::new(NoteAggregator::new(source), QuizGenerator::new(llm));

    let quiz = pipeline.generate_quiz(&options).await?;
    info!(title = %quiz.title, questions = quiz.questions.len(), "Quiz generated");

    let Some(line) = line else {
        let messages = DeliveryFormatter::new().format(&quiz);
        let total = messages.len();
        for (i, message) in messages.iter().enumerate() {
            output::message_part(i + 1, total, message);
        }
        return Ok(());
    };

    let recipient = line.user_id.clone();
    let sender = create_line_client(line, &http)?;
    let sent = QuizDelivery::new(sender, recipient)
        .send_quiz(&quiz)
        .await
        .map_err(PipelineError::from)?;

    output::success(&format!("Quiz delivered in {} message(s)", sent));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_environment() {
        let env = QuizConfig {
            days: 14,
            question_count: 20
        };

        let args = RunArgs {
            days: Some(3),
            questions: None,
            dry_run: false
        };
        assert_eq!(
            args.options(&env),
            QuizOptions {
                days: 3,
                question_count: 20
            }
        );

        let args = RunArgs {
            days: None,
            questions: None,
            dry_run: true
        };
        assert_eq!(
            args.options(&env),
            QuizOptions {
                days: 14,
                question_count: 20
            }
        );
    }
}
