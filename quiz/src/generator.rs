use errors::{GenerationError, GenerationResult, ValidationError};
use quiz_core::traits::TextGenerator;
use quiz_core::types::{CHOICE_COUNT, Question};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Attempt ceiling and linear backoff for quiz generation.
///
/// Before attempt `n + 1` the generator waits `n × backoff_step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_step: Duration
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_step: Duration::from_millis(1000)
        }
    }
}

impl RetryPolicy {
    /// Delay after the failed attempt `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt
    }
}

pub struct QuizGenerator {
    llm: Arc<dyn TextGenerator>,
    retry: RetryPolicy
}

impl QuizGenerator {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self {
            llm,
            retry: RetryPolicy::default()
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Generates `count` questions from `source_text`.
    ///
    /// Transport failures, malformed output and invalid questions all count
    /// as a failed attempt. Fails with [`GenerationError::Exhausted`] once
    /// every attempt has failed.
    pub async fn generate(&self, source_text: &str, count: u32) -> GenerationResult<Vec<Question>> {
        let prompt = build_prompt(source_text, count);
        let max_attempts = self.retry.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            match self.attempt(&prompt).await {
                Ok(questions) => {
                    info!(attempt, questions = questions.len(), "Generated quiz questions");
                    return Ok(questions);
                }
                Err(e) => {
                    warn!("Attempt {}/{} failed: {}", attempt, max_attempts, e);
                    last_error = Some(e);

                    if attempt < max_attempts {
                        tokio::time::sleep(self.retry.delay_after(attempt)).await;
                    }
                }
            }
        }

        Err(GenerationError::Exhausted {
            attempts: max_attempts,
            last_error: last_error.map(|e| e.to_string()).unwrap_or_default()
        })
    }

    async fn attempt(&self, prompt: &str) -> GenerationResult<Vec<Question>> {
        let raw = self.llm.generate(prompt).await?;
        parse_quiz_response(&raw)
    }
}

pub fn build_prompt(source_text: &str, count: u32) -> String {
    format!(
        r#"You are an expert at writing educational content.

[Task]
Write {count} multiple-choice questions, each with 4 choices, based on the notes below.

[Subject area]
The notes cover programming and technology, or business and marketing.

[Notes]
{source_text}

[Output format]
Respond with JSON in exactly this shape and output nothing except the JSON.

{{
  "questions": [
    {{
      "question": "Question text",
      "choices": ["Choice A", "Choice B", "Choice C", "Choice D"],
      "correctIndex": 0,
      "explanation": "Why this answer is correct, with any useful background"
    }}
  ]
}}

[Guidelines]
- Prioritise important concepts and knowledge used in practice
- Test understanding rather than rote memorisation
- Make wrong choices plausible: common misconceptions or similar concepts
- Keep explanations short but instructive"#
    )
}

/// JSON payload of a model response: a ```` ```json ```` fence, then any
/// fence, then the whole text.
pub fn extract_json(text: &str) -> &str {
    let fenced = [r"```json\s*([\s\S]*?)\s*```", r"```\s*([\s\S]*?)\s*```"]
        .iter()
        .find_map(|pattern| {
            regex::Regex::new(pattern)
                .ok()?
                .captures(text)?
                .get(1)
                .map(|m| m.as_str().trim())
        });

    match fenced {
        Some(payload) if !payload.is_empty() => payload,
        _ => text.trim()
    }
}

/// Parses and validates a raw model response, preserving question order.
pub fn parse_quiz_response(text: &str) -> GenerationResult<Vec<Question>> {
    let value: Value =
        serde_json::from_str(extract_json(text)).map_err(|e| GenerationError::MalformedResponse {
            reason: format!("invalid JSON: {}", e)
        })?;

    let items = value
        .get("questions")
        .and_then(Value::as_array)
        .ok_or_else(|| GenerationError::MalformedResponse {
            reason: "missing questions array".to_string()
        })?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| question_from_value(i + 1, item).map_err(GenerationError::from))
        .collect()
}

fn question_from_value(ordinal: usize, item: &Value) -> Result<Question, ValidationError> {
    let question = item
        .get("question")
        .and_then(Value::as_str)
        .ok_or(ValidationError::MissingQuestionText { ordinal })?;

    let choices: Vec<String> = item
        .get("choices")
        .and_then(Value::as_array)
        .filter(|choices| choices.len() == CHOICE_COUNT)
        .and_then(|choices| {
            choices
                .iter()
                .map(|c| c.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        })
        .ok_or(ValidationError::InvalidChoices { ordinal })?;

    let correct_index = item
        .get("correctIndex")
        .and_then(Value::as_u64)
        .filter(|i| *i < CHOICE_COUNT as u64)
        .ok_or(ValidationError::InvalidCorrectIndex { ordinal })?;

    let explanation = item
        .get("explanation")
        .and_then(Value::as_str)
        .ok_or(ValidationError::MissingExplanation { ordinal })?;

    Ok(Question {
        question: question.to_string(),
        choices,
        correct_index: correct_index as u8,
        explanation: explanation.to_string()
    })
}
