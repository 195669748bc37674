//! rich2md-doc: rich-text document model and Markdown writer
//!
//! This crate provides:
//! - block/inline document types matching a rich-text editing surface
//! - serialization of a document snapshot to Markdown
//!
//! ## Example
//!
//! ```rust
//! use rich2md_doc::{Block, Document, Inline, document_to_markdown};
//!
//! let doc = Document::new(vec![
//!     Block::heading(1, vec![Inline::text("Hello")]),
//!     Block::paragraph(vec![Inline::text("World")]),
//! ]);
//!
//! assert_eq!(document_to_markdown(&doc), "# Hello\n\nWorld");
//! ```

pub mod doc;
pub mod writer;

pub use doc::{Block, BlockKind, Document, Inline, Marks};
pub use writer::document_to_markdown;
