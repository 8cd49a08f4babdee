pub mod aggregator;
pub mod client;
pub mod extractor;

pub use aggregator::{NoteAggregator, month_titles};
pub use client::{NotionClient, create_notion_client};
pub use extractor::{BlockTreeExtractor, parse_heading_date, render_block};
