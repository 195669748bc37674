//! Document JSON encode/decode
//!
//! The host editing surface serializes its block list as JSON; stored
//! documents round-trip through these helpers.

use rich2md_doc::Document;
use thiserror::Error;

/// Errors decoding a stored document
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode a serialized document
pub fn document_from_json(json: &str) -> Result<Document, DecodeError> {
    Ok(serde_json::from_str(json)?)
}

/// Encode a document, optionally pretty-printed
pub fn document_to_json(doc: &Document, pretty: bool) -> Result<String, DecodeError> {
    let json = if pretty {
        serde_json::to_string_pretty(doc)?
    } else {
        serde_json::to_string(doc)?
    };
    Ok(json)
}
