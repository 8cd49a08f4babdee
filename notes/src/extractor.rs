//! Block tree flattening.
//!
//! Pages are organised as top-level `heading_1` blocks carrying a
//! `YYYY-MM-DD` date, with that day's notes nested underneath. Only sections
//! whose heading date falls inside the requested range are expanded.

use chrono::NaiveDate;
use errors::NotesResult;
use quiz_core::traits::NotesSource;
use quiz_core::types::{Block, BlockKind, DateRange};
use std::sync::Arc;
use tracing::debug;

pub struct BlockTreeExtractor {
    source: Arc<dyn NotesSource>
}

impl BlockTreeExtractor {
    pub fn new(source: Arc<dyn NotesSource>) -> Self {
        Self { source }
    }

    /// Text of every date-headed section of `root_id` whose date lies in
    /// `range`, in document order.
    pub async fn extract_range(&self, root_id: &str, range: &DateRange) -> NotesResult<String> {
        let blocks = self.list_all_children(root_id).await?;
        let mut sections = Vec::new();

        for block in blocks {
            if block.kind != BlockKind::Heading1 {
                continue;
            }

            let heading = block.plain_text();
            let Some(date) = parse_heading_date(&heading) else {
                continue;
            };
            if !range.contains(date) {
                continue;
            }

            debug!(block_id = %block.id, %date, "Matched date heading");
            sections.push(format!("# {}", heading));

            if block.has_children {
                let body = self.flatten_subtree(&block.id).await?;
                if !body.is_empty() {
                    sections.push(body);
                }
            }
        }

        Ok(sections.join("\n\n"))
    }

    /// Whole subtree of a page with no date filtering.
    pub async fn flatten_page(&self, root_id: &str) -> NotesResult<String> {
        self.flatten_subtree(root_id).await
    }

    /// Follows the continuation cursor until the service reports no more
    /// pages.
    async fn list_all_children(&self, block_id: &str) -> NotesResult<Vec<Block>> {
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self
                .source
                .list_children(block_id, cursor.as_deref())
                .await?;
            let next = page.continuation().map(str::to_string);
            blocks.extend(page.blocks);

            match next {
                Some(next) => cursor = Some(next),
                None => break
            }
        }

        Ok(blocks)
    }

    /// Depth-first walk over every descendant of `block_id`.
    ///
    /// Each stack frame is the remaining siblings at one depth, so a block's
    /// descendants are emitted before its next sibling.
    async fn flatten_subtree(&self, block_id: &str) -> NotesResult<String> {
        let mut lines = Vec::new();
        let mut stack = vec![self.list_all_children(block_id).await?.into_iter()];

        while let Some(frame) = stack.last_mut() {
            let Some(block) = frame.next() else {
                stack.pop();
                continue;
            };

            if let Some(line) = render_block(&block) {
                lines.push(line);
            }
            if block.has_children {
                let children = self.list_all_children(&block.id).await?;
                stack.push(children.into_iter());
            }
        }

        Ok(lines.join("\n"))
    }
}

/// First `YYYY-MM-DD` token of a heading. Impossible dates yield `None`.
pub fn parse_heading_date(text: &str) -> Option<NaiveDate> {
    let caps = regex::Regex::new(r"(\d{4}-\d{2}-\d{2})")
        .ok()?
        .captures(text)?;
    NaiveDate::parse_from_str(caps.get(1)?.as_str(), "%Y-%m-%d").ok()
}

/// Text form of a single block, or `None` for unsupported kinds.
pub fn render_block(block: &Block) -> Option<String> {
    let text = block.plain_text();
    let line = match &block.kind {
        BlockKind::Paragraph | BlockKind::Callout | BlockKind::Toggle => text,
        BlockKind::Heading1 | BlockKind::Heading2 | BlockKind::Heading3 => {
            let level = block.kind.heading_level().unwrap_or(1);
            format!("{} {}", "#".repeat(level), text)
        }
        BlockKind::BulletedListItem => format!("- {}", text),
        BlockKind::NumberedListItem => format!("1. {}", text),
        BlockKind::Code { language } => format!("```{}\n{}\n```", language, text),
        BlockKind::Quote => format!("> {}", text),
        BlockKind::ToDo { checked } => {
            let mark = if *checked { "[x]" } else { "[ ]" };
            format!("{} {}", mark, text)
        }
        BlockKind::Divider => "---".to_string(),
        BlockKind::Unsupported { .. } => return None
    };

    if line.is_empty() { None } else { Some(line) }
}
