use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use errors::NotesResult;
use quiz_core::traits::NotesSource;
use quiz_core::types::{DateRange, Document, DocumentQuery, Note};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::extractor::BlockTreeExtractor;

/// Collects note content across the monthly container pages a date range
/// touches. Each container is titled `YYYY-MM`.
pub struct NoteAggregator {
    source: Arc<dyn NotesSource>,
    extractor: BlockTreeExtractor
}

impl NoteAggregator {
    pub fn new(source: Arc<dyn NotesSource>) -> Self {
        Self {
            extractor: BlockTreeExtractor::new(source.clone()),
            source
        }
    }

    /// In-range content of every month container, joined in month order.
    pub async fn fetch_content(&self, range: &DateRange) -> NotesResult<String> {
        let mut parts = Vec::new();

        for title in month_titles(range) {
            let Some(container) = self.find_container(&title).await? else {
                warn!(month = %title, "Monthly notes page not found, skipping");
                continue;
            };

            let content = self.extractor.extract_range(&container.id, range).await?;
            debug!(month = %title, chars = content.len(), "Extracted month content");
            if !content.is_empty() {
                parts.push(content);
            }
        }

        Ok(parts.join("\n\n"))
    }

    /// First document whose title equals `title` exactly.
    pub async fn find_container(&self, title: &str) -> NotesResult<Option<Document>> {
        let page = self
            .source
            .query_documents(&DocumentQuery::title_equals(title))
            .await?;
        Ok(page.documents.into_iter().next())
    }

    /// Every document edited within the last `days` days, newest first, each
    /// flattened in full regardless of its date headings.
    pub async fn fetch_recent_notes(&self, days: u32, now: DateTime<Utc>) -> NotesResult<Vec<Note>> {
        let since = now - Duration::days(i64::from(days));
        let mut documents = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let query = DocumentQuery::edited_since(since).with_cursor(cursor.take());
            let page = self.source.query_documents(&query).await?;
            documents.extend(page.documents);

            match page.next_cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => break
            }
        }

        info!(count = documents.len(), %since, "Fetched recently edited notes");

        let mut notes = Vec::with_capacity(documents.len());
        for doc in documents {
            let content = self.extractor.flatten_page(&doc.id).await?;
            notes.push(Note {
                id: doc.id,
                title: doc.title,
                content,
                last_edited: doc.last_edited
            });
        }

        Ok(notes)
    }
}

/// Distinct `YYYY-MM` identifiers touched by `range`, in chronological
/// order.
pub fn month_titles(range: &DateRange) -> Vec<String> {
    let mut titles: Vec<String> = Vec::new();
    let mut current = range.start;

    while current <= range.end {
        let title = current.format("%Y-%m").to_string();
        if !titles.contains(&title) {
            titles.push(title);
        }

        current = match first_of_next_month(current) {
            Some(next) => next,
            None => break
        };
    }

    titles
}

fn first_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
}
