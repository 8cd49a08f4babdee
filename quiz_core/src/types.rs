use chrono::{DateTime, Days, NaiveDate, Utc};
use errors::ValidationError;
use serde::{Deserialize, Serialize};

/// Number of answer choices every question carries.
pub const CHOICE_COUNT: usize = 4;

/// Inclusive calendar-day window. Time of day never takes part in
/// comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Window of exactly `days` calendar days ending on `end`.
    ///
    /// A `days` of zero is treated as one so the window always contains
    /// `end`.
    pub fn ending_on(end: NaiveDate, days: u32) -> Self {
        let span = u64::from(days.max(1) - 1);
        let start = end.checked_sub_days(Days::new(span)).unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ~ {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// One styled span of block text. Styling is dropped on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    pub plain_text: String
}

impl RichText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            plain_text: text.into()
        }
    }
}

/// Block variants the extractor knows how to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    BulletedListItem,
    NumberedListItem,
    Code { language: String },
    Quote,
    Callout,
    Toggle,
    ToDo { checked: bool },
    Divider,
    /// Any block type without a text mapping. Renders to nothing.
    Unsupported { type_name: String }
}

impl BlockKind {
    /// Heading level for heading blocks, `None` otherwise.
    pub fn heading_level(&self) -> Option<usize> {
        match self {
            Self::Heading1 => Some(1),
            Self::Heading2 => Some(2),
            Self::Heading3 => Some(3),
            _ => None
        }
    }
}

/// A node of a notes page tree. Children are not owned; they are listed
/// through [`crate::NotesSource::list_children`] when needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub kind: BlockKind,
    pub rich_text: Vec<RichText>,
    pub has_children: bool
}

impl Block {
    pub fn new(id: impl Into<String>, kind: BlockKind, text: &str) -> Self {
        Self {
            id: id.into(),
            kind,
            rich_text: vec![RichText::new(text)],
            has_children: false
        }
    }

    pub fn with_children(mut self) -> Self {
        self.has_children = true;
        self
    }

    /// Span texts concatenated in order.
    pub fn plain_text(&self) -> String {
        self.rich_text.iter().map(|t| t.plain_text.as_str()).collect()
    }
}

/// One page of a cursor-paginated children listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockPage {
    pub blocks: Vec<Block>,
    pub has_more: bool,
    pub next_cursor: Option<String>
}

impl BlockPage {
    /// Cursor for the next request, only when the service reports more.
    pub fn continuation(&self) -> Option<&str> {
        if self.has_more {
            self.next_cursor.as_deref()
        } else {
            None
        }
    }
}

/// A top-level page of the notes database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub last_edited: DateTime<Utc>
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentFilter {
    /// Exact title match on the title property.
    TitleEquals(String),
    EditedOnOrAfter(DateTime<Utc>)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentQuery {
    pub filter: DocumentFilter,
    pub sort: Option<SortDirection>,
    pub start_cursor: Option<String>
}

impl DocumentQuery {
    pub fn title_equals(title: impl Into<String>) -> Self {
        Self {
            filter: DocumentFilter::TitleEquals(title.into()),
            sort: None,
            start_cursor: None
        }
    }

    pub fn edited_since(since: DateTime<Utc>) -> Self {
        Self {
            filter: DocumentFilter::EditedOnOrAfter(since),
            sort: Some(SortDirection::Descending),
            start_cursor: None
        }
    }

    pub fn with_cursor(mut self, cursor: Option<String>) -> Self {
        self.start_cursor = cursor;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentPage {
    pub documents: Vec<Document>,
    pub has_more: bool,
    pub next_cursor: Option<String>
}

/// Flattened content of one notes page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub last_edited: DateTime<Utc>
}

/// A multiple-choice question as produced by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    pub choices: Vec<String>,
    pub correct_index: u8,
    pub explanation: String
}

impl Question {
    /// Checks the structural invariants. `ordinal` is 1-based and only used
    /// in the error.
    pub fn validate(&self, ordinal: usize) -> Result<(), ValidationError> {
        if self.question.trim().is_empty() {
            return Err(ValidationError::MissingQuestionText { ordinal });
        }
        if self.choices.len() != CHOICE_COUNT {
            return Err(ValidationError::InvalidChoices { ordinal });
        }
        if usize::from(self.correct_index) >= CHOICE_COUNT {
            return Err(ValidationError::InvalidCorrectIndex { ordinal });
        }
        if self.explanation.trim().is_empty() {
            return Err(ValidationError::MissingExplanation { ordinal });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub title: String,
    pub questions: Vec<Question>
}

impl Quiz {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        if self.questions.is_empty() {
            return Err(ValidationError::NoQuestions);
        }
        self.questions
            .iter()
            .enumerate()
            .try_for_each(|(i, q)| q.validate(i + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn question() -> Question {
        Question {
            question: "What does `?` do?".to_string(),
            choices: vec![
                "Propagates errors".to_string(),
                "Panics".to_string(),
                "Clones".to_string(),
                "Nothing".to_string(),
            ],
            correct_index: 0,
            explanation: "It returns early with the error.".to_string()
        }
    }

    #[test]
    fn test_date_range_ending_on() {
        let range = DateRange::ending_on(date("2024-03-03"), 7);
        assert_eq!(range.start, date("2024-02-26"));
        assert_eq!(range.end, date("2024-03-03"));
        assert!(range.contains(date("2024-02-26")));
        assert!(range.contains(date("2024-03-03")));
        assert!(!range.contains(date("2024-03-04")));
        assert_eq!(range.to_string(), "2024-02-26 ~ 2024-03-03");
    }

    #[test]
    fn test_date_range_single_day() {
        let range = DateRange::ending_on(date("2024-01-10"), 1);
        assert_eq!(range.start, range.end);
        assert_eq!(DateRange::ending_on(date("2024-01-10"), 0), range);
    }

    #[test]
    fn test_question_serialization_uses_camel_case() {
        let json = serde_json::to_value(question()).unwrap();
        assert_eq!(json["correctIndex"], 0);
        assert!(json.get("correct_index").is_none());
    }

    #[test]
    fn test_block_plain_text_concatenates_spans() {
        let block = Block {
            id: "b1".to_string(),
            kind: BlockKind::Paragraph,
            rich_text: vec![RichText::new("Hello, "), RichText::new("world")],
            has_children: false
        };
        assert_eq!(block.plain_text(), "Hello, world");
    }

    #[test]
    fn test_block_page_continuation() {
        let page = BlockPage {
            blocks: vec![],
            has_more: false,
            next_cursor: Some("stale".to_string())
        };
        assert_eq!(page.continuation(), None);

        let page = BlockPage {
            has_more: true,
            next_cursor: Some("next".to_string()),
            ..page
        };
        assert_eq!(page.continuation(), Some("next"));
    }

    #[test]
    fn test_quiz_validation() {
        let mut quiz = Quiz {
            title: "2024-01-01 ~ 2024-01-07 study notes".to_string(),
            questions: vec![question(), question()]
        };
        assert!(quiz.validate().is_ok());

        quiz.questions[1].correct_index = 4;
        assert_eq!(
            quiz.validate(),
            Err(ValidationError::InvalidCorrectIndex { ordinal: 2 })
        );

        quiz.questions[1].correct_index = 3;
        quiz.questions[0].choices.pop();
        assert_eq!(
            quiz.validate(),
            Err(ValidationError::InvalidChoices { ordinal: 1 })
        );

        quiz.questions.clear();
        assert_eq!(quiz.validate(), Err(ValidationError::NoQuestions));

        quiz.title = "  ".to_string();
        assert_eq!(quiz.validate(), Err(ValidationError::MissingTitle));
    }

    #[test]
    fn test_question_rejects_blank_explanation() {
        let mut q = question();
        q.explanation = String::new();
        assert_eq!(
            q.validate(5),
            Err(ValidationError::MissingExplanation { ordinal: 5 })
        );
    }
}
