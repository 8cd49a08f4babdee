//! # Quiz Bot Core
//!
//! Shared types and traits for the notes quiz bot.
//!
//! This crate provides:
//! - The block tree, note, question and quiz data model
//! - Calendar date ranges used to scope note content
//! - Collaborator traits for the notes source, the text generator and the
//!   message sender, so each pipeline stage can run against fakes

pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use traits::{MessageSender, NotesSource, TextGenerator};
pub use types::{
    Block, BlockKind, BlockPage, DateRange, Document, DocumentFilter, DocumentPage, DocumentQuery,
    Note, Question, Quiz, RichText, SortDirection
};
