//! Renders a quiz as one or more chat messages.
//!
//! The whole quiz goes out as a single message when it fits. Otherwise the
//! questions and the answers are sent separately, and either part that still
//! overflows is packed into as many messages as needed, one whole question
//! or answer at a time.

use quiz_core::types::{Question, Quiz};
use tracing::warn;

/// Messaging platform limit per text message.
pub const MAX_MESSAGE_LENGTH: usize = 5000;

const RULE: &str = "━━━━━━━━━━━━━━━";
const CHOICE_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

/// Length as the messaging platform counts it (UTF-16 code units).
pub fn message_length(text: &str) -> usize {
    text.encode_utf16().count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryFormatter {
    max_length: usize
}

impl Default for DeliveryFormatter {
    fn default() -> Self {
        Self {
            max_length: MAX_MESSAGE_LENGTH
        }
    }
}

impl DeliveryFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            max_length: max_length.max(1)
        }
    }

    pub fn format(&self, quiz: &Quiz) -> Vec<String> {
        let header = header(quiz);
        let questions = question_section(&quiz.questions);
        let answers = answer_section(&quiz.questions);

        let full = format!(
            "{}\n\n{}\n\n{}\n【Answers】\n{}",
            header, questions, RULE, answers
        );
        if message_length(&full) <= self.max_length {
            return vec![full];
        }

        let mut messages = Vec::new();

        let question_message = format!("{}\n\n{}", header, questions);
        if message_length(&question_message) <= self.max_length {
            messages.push(question_message);
        } else {
            let items = quiz
                .questions
                .iter()
                .enumerate()
                .map(|(i, q)| format!("{}\n\n{}\n\n", question_text(i, q), RULE));
            messages.extend(self.chunk(format!("{}\n\n", header), items));
        }

        let answer_header = format!("📝 【Answers】\n{}\n", RULE);
        let answer_message = format!("{}{}", answer_header, answers);
        if message_length(&answer_message) <= self.max_length {
            messages.push(answer_message);
        } else {
            let items = quiz
                .questions
                .iter()
                .enumerate()
                .map(|(i, q)| format!("{}\n\n", answer_text(i, q)));
            messages.extend(self.chunk(answer_header, items));
        }

        messages
    }

    /// Packs whole items into messages, starting from `seed`.
    fn chunk(&self, seed: String, items: impl Iterator<Item = String>) -> Vec<String> {
        let mut messages = Vec::new();
        let mut current = seed;

        for item in items {
            let overflows = message_length(&current) + message_length(&item) > self.max_length;
            if overflows && !current.trim().is_empty() {
                messages.push(self.finish(&current));
                current.clear();
            }
            current.push_str(&item);
        }

        if !current.trim().is_empty() {
            messages.push(self.finish(&current));
        }

        messages
    }

    /// Trims a packed message. A single item longer than the limit is cut
    /// down, since the platform rejects oversized messages outright.
    fn finish(&self, message: &str) -> String {
        let message = message.trim();
        if message_length(message) <= self.max_length {
            return message.to_string();
        }

        warn!(
            length = message_length(message),
            max = self.max_length,
            "Quiz item exceeds the message limit, truncating"
        );

        let budget = self.max_length - 1;
        let mut used = 0;
        let mut truncated: String = message
            .chars()
            .take_while(|c| {
                used += c.len_utf16();
                used <= budget
            })
            .collect();
        truncated.push('…');
        truncated
    }
}

fn header(quiz: &Quiz) -> String {
    format!(
        "📚 Today's Quiz\n{}\n📖 Theme: {}\n{}",
        RULE, quiz.title, RULE
    )
}

fn question_text(index: usize, question: &Question) -> String {
    let choices = question
        .choices
        .iter()
        .zip(CHOICE_LABELS)
        .map(|(choice, label)| format!("{}) {}", label, choice))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Q{}. {}\n\n{}", index + 1, question.question, choices)
}

fn answer_text(index: usize, question: &Question) -> String {
    let letter = CHOICE_LABELS
        .get(usize::from(question.correct_index))
        .copied()
        .unwrap_or('?');
    format!("Q{}: {}\n💡 {}", index + 1, letter, question.explanation)
}

fn question_section(questions: &[Question]) -> String {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| question_text(i, q))
        .collect::<Vec<_>>()
        .join(&format!("\n\n{}\n\n", RULE))
}

fn answer_section(questions: &[Question]) -> String {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| answer_text(i, q))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(n: usize, filler: usize) -> Question {
        Question {
            question: format!("Question number {} about ownership {}", n, "x".repeat(filler)),
            choices: (0..4)
                .map(|c| format!("choice {}-{} {}", n, c, "y".repeat(filler / 4)))
                .collect(),
            correct_index: (n % 4) as u8,
            explanation: format!("Explanation {} {}", n, "z".repeat(filler))
        }
    }

    fn quiz(count: usize, filler: usize) -> Quiz {
        Quiz {
            title: "2024-03-01 ~ 2024-03-07 study notes".to_string(),
            questions: (1..=count).map(|n| question(n, filler)).collect()
        }
    }

    fn count_in(messages: &[String], needle: &str) -> usize {
        messages.iter().map(|m| m.matches(needle).count()).sum()
    }

    /// Every question, choice, letter and explanation appears exactly once.
    fn assert_lossless(quiz: &Quiz, messages: &[String]) {
        for (i, q) in quiz.questions.iter().enumerate() {
            assert_eq!(count_in(messages, &format!("Q{}. {}\n", i + 1, q.question)), 1);
            for (choice, label) in q.choices.iter().zip(CHOICE_LABELS) {
                assert_eq!(count_in(messages, &format!("{}) {}", label, choice)), 1);
            }
            let letter = CHOICE_LABELS[usize::from(q.correct_index)];
            assert_eq!(
                count_in(messages, &format!("Q{}: {}\n💡 {}", i + 1, letter, q.explanation)),
                1
            );
        }
    }

    #[test]
    fn test_small_quiz_is_one_message() {
        let quiz = quiz(2, 10);
        let messages = DeliveryFormatter::new().format(&quiz);

        assert_eq!(messages.len(), 1);
        let message = &messages[0];
        assert!(message.starts_with("📚 Today's Quiz\n"));
        assert!(message.contains("📖 Theme: 2024-03-01 ~ 2024-03-07 study notes"));
        assert!(message.contains("\n\n━━━━━━━━━━━━━━━\n【Answers】\n"));
        assert!(message.contains("Q2: C\n💡 Explanation 2"));
        assert_lossless(&quiz, &messages);
    }

    #[test]
    fn test_labels_follow_choice_order() {
        let text = question_text(0, &question(1, 0));
        assert!(text.contains("A) choice 1-0"));
        assert!(text.contains("D) choice 1-3"));
        assert_eq!(answer_text(0, &question(4, 0)), "Q1: A\n💡 Explanation 4 ");
    }

    #[test]
    fn test_overflow_splits_questions_from_answers() {
        // Ten questions of roughly 150 characters each, plus choices and
        // explanations, push the combined text past the limit.
        let quiz = quiz(10, 150);
        let formatter = DeliveryFormatter::new();
        let combined: usize = quiz
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| message_length(&question_text(i, q)) + message_length(&answer_text(i, q)))
            .sum();
        assert!(combined > MAX_MESSAGE_LENGTH);

        let messages = formatter.format(&quiz);

        assert!(messages.len() >= 2);
        for message in &messages {
            assert!(message_length(message) <= MAX_MESSAGE_LENGTH);
            assert!(!message.trim().is_empty());
            let has_questions = message.contains("A) ");
            let has_answers = message.contains("💡");
            assert!(!(has_questions && has_answers), "mixed message: {}", message);
        }
        assert!(messages[0].starts_with("📚 Today's Quiz"));
        assert!(messages.last().unwrap().contains("💡"));
        assert_lossless(&quiz, &messages);
    }

    #[test]
    fn test_chunking_keeps_items_whole() {
        let quiz = quiz(12, 120);
        let formatter = DeliveryFormatter::with_max_length(1500);

        let messages = formatter.format(&quiz);

        assert!(messages.len() > 2);
        for message in &messages {
            assert!(message_length(message) <= 1500);
            assert!(!message.is_empty());
            // A question's block always carries all four of its choices.
            for n in 1..=12 {
                if message.contains(&format!("Q{}. ", n)) {
                    assert!(message.contains(&format!("D) choice {}-3", n)));
                }
            }
        }
        assert_lossless(&quiz, &messages);

        let answer_start = messages
            .iter()
            .position(|m| m.contains("💡"))
            .unwrap();
        assert!(messages[..answer_start].iter().all(|m| !m.contains("💡")));
        assert!(messages[answer_start].starts_with("📝 【Answers】"));
    }

    #[test]
    fn test_oversized_single_item_is_truncated_to_limit() {
        let quiz = quiz(1, 900);
        let formatter = DeliveryFormatter::with_max_length(500);

        let messages = formatter.format(&quiz);

        for message in &messages {
            assert!(message_length(message) <= 500);
            assert!(!message.trim().is_empty());
        }
        let truncated: Vec<_> = messages.iter().filter(|m| m.ends_with('…')).collect();
        assert_eq!(truncated.len(), 2);
        assert!(truncated[0].starts_with("Q1. Question number 1"));
        assert!(truncated[1].starts_with("Q1: B"));
    }

    #[test]
    fn test_header_is_sent_alone_when_first_item_only_fits_by_itself() {
        let quiz = Quiz {
            title: "2024-03-01 ~ 2024-03-07 study notes".to_string(),
            questions: vec![Question {
                question: format!("Which trait bound fits here? {}", "w".repeat(220)),
                choices: vec![
                    "FIRST_CHOICE".to_string(),
                    "SECOND_CHOICE".to_string(),
                    "THIRD_CHOICE".to_string(),
                    "LAST_CHOICE".to_string(),
                ],
                correct_index: 3,
                explanation: "The bound must hold for every caller".to_string()
            }]
        };
        let formatter = DeliveryFormatter::with_max_length(400);
        let header = header(&quiz);
        let item = format!("{}\n\n{}\n\n", question_text(0, &quiz.questions[0]), RULE);
        assert!(message_length(item.trim()) <= 400);
        assert!(message_length(&header) + 2 + message_length(&item) > 400);

        let messages = formatter.format(&quiz);

        assert_eq!(messages[0], header);
        for message in &messages {
            assert!(message_length(message) <= 400);
            assert!(!message.ends_with('…'));
        }
        assert_eq!(count_in(&messages, "D) LAST_CHOICE"), 1);
        assert_eq!(count_in(&messages, "The bound must hold for every caller"), 1);
        assert_lossless(&quiz, &messages);
    }

    #[test]
    fn test_message_length_counts_utf16_units() {
        assert_eq!(message_length("abc"), 3);
        assert_eq!(message_length("📚"), 2);
        assert_eq!(message_length("━"), 1);
    }
}
