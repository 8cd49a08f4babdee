use async_trait::async_trait;
use errors::{DeliveryResult, GenerationResult, NotesResult};

use crate::types::{BlockPage, DocumentPage, DocumentQuery};

/// Read access to the hierarchical notes service.
#[async_trait]
pub trait NotesSource: Send + Sync {
    /// Lists one page of the direct children of `block_id`.
    async fn list_children(&self, block_id: &str, cursor: Option<&str>)
    -> NotesResult<BlockPage>;

    /// Queries top-level documents of the configured database.
    async fn query_documents(&self, query: &DocumentQuery) -> NotesResult<DocumentPage>;
}

/// Text generation service trait.
///
/// No structured output mode is assumed; callers parse the raw text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> GenerationResult<String>;
}

/// Outbound messaging. One call sends one text message.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn push_text(&self, recipient: &str, text: &str) -> DeliveryResult<()>;
}
