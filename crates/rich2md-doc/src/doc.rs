//! Document model types
//!
//! A flat list of blocks, each holding styled inline runs. This mirrors the
//! snapshot a rich-text editing surface exposes: the surface owns the live
//! tree and mutates it on every keystroke, the converter only ever reads.

use serde::{Deserialize, Serialize};

/// The structural kind of a block
///
/// Kinds the host surface may emit but this crate does not know about
/// deserialize as [`BlockKind::Unknown`]; the writer passes their text
/// through unstyled instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BlockKind {
    Heading { level: u8 },
    Paragraph,
    Quote,
    Code,
    BulletItem,
    NumberedItem,
    #[serde(other)]
    Unknown,
}

/// Active formatting attributes of an inline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Marks {
    #[serde(skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub strike: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub code: bool,
    /// Link target; a run with an href renders as a link and ignores emphasis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl Marks {
    /// True if no attribute is set
    pub fn is_plain(&self) -> bool {
        !self.bold && !self.italic && !self.strike && !self.code && self.href.is_none()
    }
}

/// A contiguous text span sharing one set of attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inline {
    pub text: String,
    #[serde(default, skip_serializing_if = "Marks::is_plain")]
    pub marks: Marks,
}

/// A top-level structural unit of the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    pub runs: Vec<Inline>,
}

/// An ordered block list, the canonical document representation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub blocks: Vec<Block>,
}

// Convenience constructors
impl Inline {
    pub fn text(s: impl Into<String>) -> Self {
        Self {
            text: s.into(),
            marks: Marks::default(),
        }
    }

    pub fn styled(s: impl Into<String>, marks: Marks) -> Self {
        Self {
            text: s.into(),
            marks,
        }
    }

    pub fn bold(s: impl Into<String>) -> Self {
        Self::styled(
            s,
            Marks {
                bold: true,
                ..Marks::default()
            },
        )
    }

    pub fn italic(s: impl Into<String>) -> Self {
        Self::styled(
            s,
            Marks {
                italic: true,
                ..Marks::default()
            },
        )
    }

    pub fn strike(s: impl Into<String>) -> Self {
        Self::styled(
            s,
            Marks {
                strike: true,
                ..Marks::default()
            },
        )
    }

    pub fn code(s: impl Into<String>) -> Self {
        Self::styled(
            s,
            Marks {
                code: true,
                ..Marks::default()
            },
        )
    }

    pub fn link(s: impl Into<String>, href: impl Into<String>) -> Self {
        Self::styled(
            s,
            Marks {
                href: Some(href.into()),
                ..Marks::default()
            },
        )
    }
}

impl Block {
    pub fn new(kind: BlockKind, runs: Vec<Inline>) -> Self {
        Self { kind, runs }
    }

    /// Heading block; level is clamped to 1..=6
    pub fn heading(level: u8, runs: Vec<Inline>) -> Self {
        Self::new(
            BlockKind::Heading {
                level: level.clamp(1, 6),
            },
            runs,
        )
    }

    pub fn paragraph(runs: Vec<Inline>) -> Self {
        Self::new(BlockKind::Paragraph, runs)
    }

    pub fn quote(runs: Vec<Inline>) -> Self {
        Self::new(BlockKind::Quote, runs)
    }

    pub fn code(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Code, vec![Inline::text(text)])
    }

    pub fn bullet_item(runs: Vec<Inline>) -> Self {
        Self::new(BlockKind::BulletItem, runs)
    }

    pub fn numbered_item(runs: Vec<Inline>) -> Self {
        Self::new(BlockKind::NumberedItem, runs)
    }

    /// Concatenated run text without any formatting
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        for run in &self.runs {
            text.push_str(&run.text);
        }
        text
    }

    /// A block whose text is empty or whitespace-only is blank and
    /// never emitted by the writer
    pub fn is_blank(&self) -> bool {
        self.runs.iter().all(|run| run.text.trim().is_empty())
    }
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
