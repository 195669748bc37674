//! Document to Markdown writer
//!
//! Walks a document snapshot and emits a single Markdown string. The walk is
//! a pure synchronous pass over the block list: it never fails and never
//! panics, so a change-event handler can call it on every keystroke.

use crate::doc::{Block, BlockKind, Document, Inline};

/// Convert a document snapshot to Markdown
///
/// Blank blocks are skipped, emitted blocks are separated by exactly one
/// blank line, and the result is trimmed with runs of 3+ newlines collapsed
/// to 2. An empty document yields an empty string.
pub fn document_to_markdown(doc: &Document) -> String {
    let mut walker = Walker::new();
    walker.write_document(doc)
}

/// Writer state
struct Walker {
    output: String,
    /// Counter for the current contiguous run of numbered items
    list_number: u32,
}

impl Walker {
    fn new() -> Self {
        Self {
            output: String::new(),
            list_number: 0,
        }
    }

    fn write_document(&mut self, doc: &Document) -> String {
        // Blank blocks are invisible: they neither emit output nor break a
        // numbered run in two.
        for block in doc.blocks.iter().filter(|b| !b.is_blank()) {
            if !matches!(block.kind, BlockKind::NumberedItem) {
                self.list_number = 0;
            }
            if !self.output.is_empty() {
                self.output.push_str("\n\n");
            }
            self.write_block(block);
        }

        collapse_blank_lines(&self.output).trim().to_string()
    }

    fn write_block(&mut self, block: &Block) {
        match block.kind {
            BlockKind::Heading { level } => {
                for _ in 0..level {
                    self.output.push('#');
                }
                self.output.push(' ');
                self.write_runs(&block.runs);
            }
            BlockKind::Paragraph => self.write_runs(&block.runs),
            BlockKind::Quote => self.write_quote(block),
            BlockKind::Code => self.write_code(block),
            BlockKind::BulletItem => {
                self.output.push_str("- ");
                self.write_runs(&block.runs);
            }
            BlockKind::NumberedItem => {
                self.list_number += 1;
                self.output.push_str(&format!("{}. ", self.list_number));
                self.write_runs(&block.runs);
            }
            // Unrecognized kinds pass their text through unstyled
            BlockKind::Unknown => self.output.push_str(&block.plain_text()),
        }
    }

    fn write_quote(&mut self, block: &Block) {
        let body = render_runs(&block.runs);
        for (i, line) in body.split('\n').enumerate() {
            if i > 0 {
                self.output.push('\n');
            }
            if line.is_empty() {
                self.output.push('>');
            } else {
                self.output.push_str("> ");
                self.output.push_str(line);
            }
        }
    }

    fn write_code(&mut self, block: &Block) {
        // Marks are meaningless inside a code block; take the text raw
        let content = block.plain_text();
        let fence = "`".repeat(fence_length(&content));

        self.output.push_str(&fence);
        self.output.push('\n');
        self.output.push_str(&content);
        if !content.ends_with('\n') {
            self.output.push('\n');
        }
        self.output.push_str(&fence);
    }

    fn write_runs(&mut self, runs: &[Inline]) {
        let rendered = render_runs(runs);
        self.output.push_str(&rendered);
    }
}

/// Render inline runs with their attribute markers applied
fn render_runs(runs: &[Inline]) -> String {
    let mut out = String::new();
    for run in runs {
        let rendered = render_inline(run);
        // `foo``bar` would parse as one code span; keep adjacent spans apart
        if out.ends_with('`') && rendered.starts_with('`') {
            out.push(' ');
        }
        out.push_str(&rendered);
    }
    out
}

/// Render a single run
///
/// Attribute precedence, innermost to outermost: code cancels bold and
/// italic; bold+italic combine into a triple marker; strike wraps last,
/// including around a code span. A link ignores emphasis entirely.
fn render_inline(run: &Inline) -> String {
    if run.text.is_empty() {
        return String::new();
    }

    if let Some(href) = &run.marks.href {
        let href = href.trim();
        if !href.is_empty() {
            return format!("[{}]({})", run.text.trim(), href);
        }
        // Link without a target degrades to plain text
        return run.text.clone();
    }

    let mut text = if run.marks.code {
        render_code_span(&run.text)
    } else {
        match (run.marks.bold, run.marks.italic) {
            (true, true) => format!("***{}***", run.text),
            (true, false) => format!("**{}**", run.text),
            (false, true) => format!("*{}*", run.text),
            (false, false) => run.text.clone(),
        }
    };
    if run.marks.strike {
        text = format!("~~{}~~", text);
    }
    text
}

fn render_code_span(text: &str) -> String {
    // A backtick in the content needs a wider delimiter
    if text.contains('`') {
        format!("`` {} ``", text)
    } else {
        format!("`{}`", text)
    }
}

/// Minimum fence length for a code block: at least 3 backticks and longer
/// than any backtick run in the content
fn fence_length(content: &str) -> usize {
    let mut max_backticks = 0;
    let mut current_run = 0;

    for c in content.chars() {
        if c == '`' {
            current_run += 1;
            max_backticks = max_backticks.max(current_run);
        } else {
            current_run = 0;
        }
    }

    3.max(max_backticks + 1)
}

/// Collapse any run of 3+ consecutive newlines to exactly 2
fn collapse_blank_lines(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut newlines = 0;
    for c in s.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push(c);
            }
        } else {
            newlines = 0;
            out.push(c);
        }
    }
    out
}
