//! rich2md-core: Markdown loader and input adapters
//!
//! This crate provides:
//! - best-effort Markdown to block-list loading for initial editor display
//! - a legacy adapter from flat editor HTML to the canonical block list
//! - document JSON encode/decode helpers
//!
//! The block list defined in `rich2md-doc` is the canonical representation;
//! everything here converts *into* it.
//!
//! # Example
//!
//! ```
//! use rich2md_core::markdown_to_document;
//!
//! let doc = markdown_to_document("# Title\n\nHello");
//! assert_eq!(doc.blocks.len(), 2);
//! ```

pub mod json;
pub mod legacy;
pub mod loader;

// Re-export the model so downstream crates need only one import
pub use rich2md_doc::{Block, BlockKind, Document, Inline, Marks, document_to_markdown};

pub use json::{DecodeError, document_from_json, document_to_json};
pub use legacy::html_to_document;
pub use loader::markdown_to_document;
