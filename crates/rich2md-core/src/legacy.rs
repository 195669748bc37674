//! Legacy HTML input adaptation
//!
//! Older integrations handed over the editing surface's raw inner HTML
//! instead of a structured block list. The block list is canonical; this
//! module folds that flat, editor-flavored HTML into it so legacy callers
//! keep working. It is an input adapter, not an HTML parser: one level of
//! list nesting, no attributes beyond `href`, and malformed markup never
//! fails, it degrades to plain text.

use rich2md_doc::{Block, BlockKind, Document, Inline, Marks};

/// Convert a flat editor HTML fragment into the canonical block list
pub fn html_to_document(html: &str) -> Document {
    let mut converter = Converter::default();
    for token in scan(html) {
        converter.push(token);
    }
    converter.finish()
}

/// Minimal tag-level token
#[derive(Debug, PartialEq)]
enum Token {
    Text(String),
    Open { name: String, href: Option<String> },
    Close(String),
}

/// Scan an HTML fragment into tokens
///
/// A `<` that does not start a well-formed tag is literal text. Comments
/// are skipped. Entities in text decode via [`decode_entities`].
fn scan(html: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut rest = html;

    while let Some(lt) = rest.find('<') {
        text.push_str(&rest[..lt]);
        let tag_start = &rest[lt..];

        if let Some(after) = tag_start.strip_prefix("<!--") {
            // Comment: skip to the terminator, or swallow the remainder
            match after.find("-->") {
                Some(end) => rest = &after[end + 3..],
                None => rest = "",
            }
            continue;
        }

        match tag_start.find('>') {
            Some(gt) => match parse_tag(&tag_start[1..gt]) {
                Some(token) => {
                    if !text.is_empty() {
                        tokens.push(Token::Text(decode_entities(&text)));
                        text.clear();
                    }
                    tokens.push(token);
                    rest = &tag_start[gt + 1..];
                }
                None => {
                    text.push('<');
                    rest = &tag_start[1..];
                }
            },
            None => {
                // Unterminated tag: keep the '<' literal
                text.push('<');
                rest = &tag_start[1..];
            }
        }
    }

    text.push_str(rest);
    if !text.is_empty() {
        tokens.push(Token::Text(decode_entities(&text)));
    }
    tokens
}

/// Parse the inside of `<...>`; None means the text was not a tag
///
/// The tag name must start right after the `<`, the way browsers read it:
/// `< b` is literal text, `<b` is a tag.
fn parse_tag(inner: &str) -> Option<Token> {
    if inner.starts_with(|c: char| c.is_ascii_whitespace()) {
        return None;
    }
    let inner = inner.trim_end().trim_end_matches('/').trim_end();
    if let Some(name) = inner.strip_prefix('/') {
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return None;
        }
        return Some(Token::Close(name));
    }

    let name_end = inner
        .find(|c: char| c.is_ascii_whitespace())
        .unwrap_or(inner.len());
    let name = inner[..name_end].to_ascii_lowercase();
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }

    let href = extract_href(&inner[name_end..]);
    Some(Token::Open { name, href })
}

/// Pull `href="..."` or `href='...'` out of a tag's attribute text
fn extract_href(attrs: &str) -> Option<String> {
    let at = find_href_attr(attrs)?;
    let after = attrs[at + 4..].trim_start();
    let after = after.strip_prefix('=')?.trim_start();

    let quote = after.chars().next()?;
    if quote == '"' || quote == '\'' {
        let body = &after[1..];
        let end = body.find(quote)?;
        Some(body[..end].to_string())
    } else {
        let end = after
            .find(|c: char| c.is_ascii_whitespace())
            .unwrap_or(after.len());
        Some(after[..end].to_string())
    }
}

/// Locate `href` used as an attribute name: preceded by whitespace and
/// followed by optional whitespace then `=`. A bare `href` inside another
/// attribute's value or name does not count.
fn find_href_attr(attrs: &str) -> Option<usize> {
    let lower = attrs.to_ascii_lowercase();
    let mut from = 0;
    while let Some(offset) = lower[from..].find("href") {
        let at = from + offset;
        let preceded_by_space = attrs[..at]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_whitespace());
        let followed_by_eq = attrs[at + 4..].trim_start().starts_with('=');
        if preceded_by_space && followed_by_eq {
            return Some(at);
        }
        from = at + 4;
    }
    None
}

/// Decode the standard named entities plus nbsp and ASCII numeric refs
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        // Entity names are short; a distant ';' is not a terminator
        let entity_end = tail.find(';').filter(|&end| end <= 10);
        let decoded = entity_end.and_then(|end| {
            let name = &tail[1..end];
            let ch = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ => name
                    .strip_prefix('#')
                    .and_then(|n| n.parse::<u32>().ok())
                    .filter(|&n| n < 128)
                    .and_then(char::from_u32),
            };
            ch.map(|c| (c, end + 1))
        });

        match decoded {
            Some((c, len)) => {
                out.push(c);
                rest = &tail[len..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Which list container we are inside, if any
#[derive(Debug, Clone, Copy, PartialEq)]
enum ListKind {
    Bullet,
    Numbered,
}

/// Folds the token stream into blocks
#[derive(Default)]
struct Converter {
    blocks: Vec<Block>,
    runs: Vec<Inline>,
    text: String,
    kind: Option<BlockKind>,
    bold: u32,
    italic: u32,
    strike: u32,
    code: u32,
    hrefs: Vec<String>,
    list: Option<ListKind>,
    pre: u32,
}

impl Converter {
    fn push(&mut self, token: Token) {
        match token {
            Token::Text(s) => self.text.push_str(&s),
            Token::Open { name, href } => self.open(&name, href),
            Token::Close(name) => self.close(&name),
        }
    }

    fn open(&mut self, name: &str, href: Option<String>) {
        if self.pre > 0 && name != "pre" {
            // Inside a code block formatting tags are meaningless; only a
            // line break still carries information
            if name == "br" {
                self.text.push('\n');
            }
            return;
        }
        match name {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = name.as_bytes()[1] - b'0';
                self.start_block(BlockKind::Heading { level });
            }
            "p" | "div" => self.start_block(BlockKind::Paragraph),
            "blockquote" => self.start_block(BlockKind::Quote),
            "pre" => {
                self.start_block(BlockKind::Code);
                self.pre += 1;
            }
            "ul" => {
                self.end_block();
                self.list = Some(ListKind::Bullet);
            }
            "ol" => {
                self.end_block();
                self.list = Some(ListKind::Numbered);
            }
            "li" => {
                let kind = match self.list {
                    Some(ListKind::Numbered) => BlockKind::NumberedItem,
                    // A stray li outside any list reads best as a bullet
                    _ => BlockKind::BulletItem,
                };
                self.start_block(kind);
            }
            "strong" | "b" => {
                self.flush_text();
                self.bold += 1;
            }
            "em" | "i" => {
                self.flush_text();
                self.italic += 1;
            }
            "del" | "s" => {
                self.flush_text();
                self.strike += 1;
            }
            "code" => {
                self.flush_text();
                self.code += 1;
            }
            "a" => {
                self.flush_text();
                self.hrefs.push(href.unwrap_or_default());
            }
            "br" => self.text.push('\n'),
            // Unknown tags are skipped; their inner text passes through
            _ => {}
        }
    }

    fn close(&mut self, name: &str) {
        if self.pre > 0 && name != "pre" {
            return;
        }
        match name {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "p" | "div" | "blockquote" | "li" => {
                self.end_block();
            }
            "pre" => {
                self.pre = self.pre.saturating_sub(1);
                self.end_block();
            }
            "ul" | "ol" => {
                self.end_block();
                self.list = None;
            }
            "strong" | "b" => {
                self.flush_text();
                self.bold = self.bold.saturating_sub(1);
            }
            "em" | "i" => {
                self.flush_text();
                self.italic = self.italic.saturating_sub(1);
            }
            "del" | "s" => {
                self.flush_text();
                self.strike = self.strike.saturating_sub(1);
            }
            "code" => {
                self.flush_text();
                self.code = self.code.saturating_sub(1);
            }
            "a" => {
                self.flush_text();
                self.hrefs.pop();
            }
            _ => {}
        }
    }

    fn marks(&self) -> Marks {
        Marks {
            bold: self.bold > 0,
            italic: self.italic > 0,
            strike: self.strike > 0,
            code: self.code > 0,
            href: self
                .hrefs
                .last()
                .filter(|h| !h.trim().is_empty())
                .cloned(),
        }
    }

    fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let marks = if self.pre > 0 {
            Marks::default()
        } else {
            self.marks()
        };
        let text = std::mem::take(&mut self.text);
        self.runs.push(Inline::styled(text, marks));
    }

    fn start_block(&mut self, kind: BlockKind) {
        self.end_block();
        self.kind = Some(kind);
    }

    fn end_block(&mut self) {
        self.flush_text();
        // Whitespace-only blocks (e.g. the editor's `<div><br></div>`
        // placeholder) carry nothing worth keeping
        if self.runs.iter().all(|r| r.text.trim().is_empty()) {
            self.runs.clear();
            self.kind = None;
            return;
        }
        let kind = self.kind.take().unwrap_or(BlockKind::Paragraph);
        self.blocks.push(Block::new(kind, std::mem::take(&mut self.runs)));
    }

    fn finish(mut self) -> Document {
        // Text outside any block becomes a trailing paragraph
        self.end_block();
        Document::new(self.blocks)
    }
}
