//! Markdown to block-list loader
//!
//! Best-effort one-way conversion of a stored Markdown string into blocks
//! for initial editor population. The pass is deliberately lossy: inline
//! recognition is a single left-to-right scan that is not nested-aware, so
//! callers must not assume `markdown_to_document` inverts the writer.

use rich2md_doc::{Block, Document, Inline};

/// Load a Markdown string into an approximate block list
///
/// Recognized: `#`..`######` headings at line start, `**bold**`, `*italic*`
/// and `[text](href)` spans, blank-line paragraph boundaries. A single
/// newline inside a paragraph stays a line break. Never fails.
pub fn markdown_to_document(markdown: &str) -> Document {
    let mut blocks = Vec::new();

    for chunk in split_on_blank_lines(markdown) {
        let mut paragraph_lines: Vec<&str> = Vec::new();

        for line in &chunk {
            if let Some((level, rest)) = heading_prefix(line) {
                flush_paragraph(&mut blocks, &mut paragraph_lines);
                blocks.push(Block::heading(level, parse_inline(rest)));
            } else {
                paragraph_lines.push(line);
            }
        }
        flush_paragraph(&mut blocks, &mut paragraph_lines);
    }

    Document::new(blocks)
}

/// Group input lines into chunks separated by blank lines
fn split_on_blank_lines(markdown: &str) -> Vec<Vec<&str>> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in markdown.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn flush_paragraph(blocks: &mut Vec<Block>, lines: &mut Vec<&str>) {
    if lines.is_empty() {
        return;
    }
    let text = lines.join("\n");
    blocks.push(Block::paragraph(parse_inline(&text)));
    lines.clear();
}

/// `# ` through `###### ` at line start
fn heading_prefix(line: &str) -> Option<(u8, &str)> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if (1..=6).contains(&hashes) {
        if let Some(rest) = line[hashes..].strip_prefix(' ') {
            return Some((hashes as u8, rest));
        }
    }
    None
}

/// Single-pass inline recognition
///
/// At each position the scanner tries `**…**`, then `*…*`, then
/// `[text](href)`; anything else, including unterminated markers, stays
/// literal text.
fn parse_inline(text: &str) -> Vec<Inline> {
    let mut runs = Vec::new();
    let mut plain = String::new();
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];

        if let Some((run, consumed)) = match_bold(rest)
            .or_else(|| match_italic(rest))
            .or_else(|| match_link(rest))
        {
            flush_plain(&mut runs, &mut plain);
            runs.push(run);
            i += consumed;
            continue;
        }

        let c = rest.chars().next().unwrap();
        plain.push(c);
        i += c.len_utf8();
    }

    flush_plain(&mut runs, &mut plain);
    runs
}

fn flush_plain(runs: &mut Vec<Inline>, plain: &mut String) {
    if !plain.is_empty() {
        runs.push(Inline::text(std::mem::take(plain)));
    }
}

fn match_bold(rest: &str) -> Option<(Inline, usize)> {
    let inner = rest.strip_prefix("**")?;
    let end = inner.find("**")?;
    if end == 0 {
        return None;
    }
    Some((Inline::bold(&inner[..end]), 2 + end + 2))
}

fn match_italic(rest: &str) -> Option<(Inline, usize)> {
    let inner = rest.strip_prefix('*')?;
    let end = inner.find('*')?;
    if end == 0 {
        return None;
    }
    Some((Inline::italic(&inner[..end]), 1 + end + 1))
}

fn match_link(rest: &str) -> Option<(Inline, usize)> {
    let inner = rest.strip_prefix('[')?;
    let text_end = inner.find(']')?;
    let after_text = &inner[text_end + 1..];
    let href_part = after_text.strip_prefix('(')?;
    let href_end = href_part.find(')')?;

    let text = &inner[..text_end];
    let href = &href_part[..href_end];
    if text.is_empty() || href.is_empty() {
        return None;
    }

    // 1 for '[', text, 1 for ']', 1 for '(', href, 1 for ')'
    let consumed = 1 + text_end + 1 + 1 + href_end + 1;
    Some((Inline::link(text, href), consumed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rich2md_doc::BlockKind;

    #[test]
    fn test_empty_input() {
        assert!(markdown_to_document("").is_empty());
        assert!(markdown_to_document("  \n\n  \n").is_empty());
    }

    #[test]
    fn test_heading_and_paragraph() {
        let doc = markdown_to_document("# Title\n\nHello");
        assert_eq!(doc.blocks.len(), 2);
        assert!(matches!(doc.blocks[0].kind, BlockKind::Heading { level: 1 }));
        assert_eq!(doc.blocks[0].plain_text(), "Title");
        assert_eq!(doc.blocks[1].kind, BlockKind::Paragraph);
        assert_eq!(doc.blocks[1].plain_text(), "Hello");
    }

    #[test]
    fn test_heading_levels() {
        for level in 1..=6u8 {
            let md = format!("{} Title", "#".repeat(level as usize));
            let doc = markdown_to_document(&md);
            assert!(matches!(doc.blocks[0].kind, BlockKind::Heading { level: l } if l == level));
        }
        // Seven hashes is not a heading
        let doc = markdown_to_document("####### nope");
        assert_eq!(doc.blocks[0].kind, BlockKind::Paragraph);
    }

    #[test]
    fn test_hash_without_space_is_text() {
        let doc = markdown_to_document("#hashtag");
        assert_eq!(doc.blocks[0].kind, BlockKind::Paragraph);
        assert_eq!(doc.blocks[0].plain_text(), "#hashtag");
    }

    #[test]
    fn test_single_newline_is_line_break() {
        let doc = markdown_to_document("line one\nline two");
        assert_eq!(doc.blocks.len(), 1);
        assert_eq!(doc.blocks[0].plain_text(), "line one\nline two");
    }

    #[test]
    fn test_double_newline_is_paragraph_boundary() {
        let doc = markdown_to_document("first\n\nsecond");
        assert_eq!(doc.blocks.len(), 2);
        assert_eq!(doc.blocks[0].plain_text(), "first");
        assert_eq!(doc.blocks[1].plain_text(), "second");
    }

    #[test]
    fn test_bold_run() {
        let doc = markdown_to_document("Hello **world**!");
        let runs = &doc.blocks[0].runs;
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0], Inline::text("Hello "));
        assert_eq!(runs[1], Inline::bold("world"));
        assert_eq!(runs[2], Inline::text("!"));
    }

    #[test]
    fn test_italic_run() {
        let doc = markdown_to_document("an *emphasized* word");
        assert_eq!(doc.blocks[0].runs[1], Inline::italic("emphasized"));
    }

    #[test]
    fn test_link_run() {
        let doc = markdown_to_document("see [docs](https://example.com) here");
        assert_eq!(
            doc.blocks[0].runs[1],
            Inline::link("docs", "https://example.com")
        );
    }

    #[test]
    fn test_heading_with_inline_markup() {
        let doc = markdown_to_document("## A **bold** move");
        assert!(matches!(doc.blocks[0].kind, BlockKind::Heading { level: 2 }));
        assert_eq!(doc.blocks[0].runs[1], Inline::bold("bold"));
    }

    #[test]
    fn test_unterminated_markers_stay_literal() {
        let doc = markdown_to_document("a **dangling mark");
        assert_eq!(doc.blocks[0].runs.len(), 1);
        assert_eq!(doc.blocks[0].plain_text(), "a **dangling mark");

        let doc = markdown_to_document("[text](missing");
        assert_eq!(doc.blocks[0].plain_text(), "[text](missing");
    }

    #[test]
    fn test_empty_markers_stay_literal() {
        let doc = markdown_to_document("a **** b");
        assert_eq!(doc.blocks[0].plain_text(), "a **** b");
    }

    #[test]
    fn test_not_nested_aware() {
        // Inner italic markers inside a bold span stay literal; documented
        // lossy behavior of the single-pass scan.
        let doc = markdown_to_document("**bold *and* more**");
        assert_eq!(doc.blocks[0].runs[0], Inline::bold("bold *and* more"));
    }

    #[test]
    fn test_loader_of_writer_output_keeps_text() {
        use rich2md_doc::{Block, Document as Doc, document_to_markdown};

        let original = Doc::new(vec![
            Block::heading(1, vec![Inline::text("Title")]),
            Block::paragraph(vec![Inline::text("Hello "), Inline::bold("world")]),
        ]);
        let reloaded = markdown_to_document(&document_to_markdown(&original));
        // Round-trip is not exact in general, but this simple document survives
        assert_eq!(original, reloaded);
    }
}
