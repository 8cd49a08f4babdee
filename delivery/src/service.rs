use errors::DeliveryResult;
use quiz_core::traits::MessageSender;
use quiz_core::types::Quiz;
use std::sync::Arc;
use tracing::{info, warn};

use crate::formatter::DeliveryFormatter;

/// Sends formatted quizzes to a single recipient.
pub struct QuizDelivery {
    sender: Arc<dyn MessageSender>,
    recipient: String,
    formatter: DeliveryFormatter
}

impl QuizDelivery {
    pub fn new(sender: Arc<dyn MessageSender>, recipient: impl Into<String>) -> Self {
        Self {
            sender,
            recipient: recipient.into(),
            formatter: DeliveryFormatter::new()
        }
    }

    pub fn with_formatter(mut self, formatter: DeliveryFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Sends every message of the formatted quiz in order and returns how
    /// many were sent. Stops at the first failed push.
    pub async fn send_quiz(&self, quiz: &Quiz) -> DeliveryResult<usize> {
        let messages = self.formatter.format(quiz);
        let total = messages.len();
        info!(messages = total, "Delivering quiz");

        for (i, message) in messages.iter().enumerate() {
            if let Err(e) = self.sender.push_text(&self.recipient, message).await {
                warn!(part = i + 1, total, error = %e, "Quiz delivery stopped");
                return Err(e);
            }
        }

        Ok(total)
    }

    pub async fn send_text(&self, text: &str) -> DeliveryResult<()> {
        self.sender.push_text(&self.recipient, text).await
    }
}
