//! Tolerant reader for catalog problem descriptions.
//!
//! The HTML is tokenized with html5ever and reduced to a flat stream of
//! [`Piece`]s over the handful of tags that carry structure in problem
//! descriptions (`p`, `strong`, `pre`, `ul`/`ol`, `li`, `sup`). Every other tag
//! survives only as a separator. Sections are then cut out of that stream by
//! locating the `Example N:` and `Constraints:` headings.
//!
//! Nothing in here fails: absent or malformed sections degrade to empty results.

use std::ops::Range;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub input: String,
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedContent {
    pub examples: Vec<Example>,
    /// One `• item` line per constraint.
    pub constraints: String,
    pub statement: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    Paragraph,
    Strong,
    Pre,
    List,
    Item,
    Sup,
    Other,
}

impl Element {
    fn from_name(name: &str) -> Self {
        match name {
            "p" => Self::Paragraph,
            "strong" => Self::Strong,
            "pre" => Self::Pre,
            "ul" | "ol" => Self::List,
            "li" => Self::Item,
            "sup" => Self::Sup,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Open(Element),
    Close(Element),
    Text(String),
}

impl Piece {
    fn is_blank(&self) -> bool {
        matches!(self, Piece::Text(text) if text.trim().is_empty())
    }
}

#[derive(Debug, Default)]
struct PieceSink {
    pieces: Vec<Piece>,
}

impl PieceSink {
    fn push_text(&mut self, text: &str) {
        match self.pieces.last_mut() {
            Some(Piece::Text(last)) => last.push_str(text),
            _ => self.pieces.push(Piece::Text(text.to_string())),
        }
    }
}

impl TokenSink for PieceSink {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => {
                let element = Element::from_name(&tag.name);
                match tag.kind {
                    TagKind::StartTag => {
                        self.pieces.push(Piece::Open(element));
                        if tag.self_closing {
                            self.pieces.push(Piece::Close(element));
                        }
                    }
                    TagKind::EndTag => self.pieces.push(Piece::Close(element)),
                }
            }
            Token::CharacterTokens(text) => self.push_text(&text),
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

fn tokenize(html: &str) -> Vec<Piece> {
    let mut input = BufferQueue::new();
    input.push_back(StrTendril::from_slice(html));

    let mut tokenizer = Tokenizer::new(PieceSink::default(), TokenizerOpts::default());
    let _ = tokenizer.feed(&mut input);
    tokenizer.end();
    tokenizer.sink.pieces
}

/// Folds the decoded forms of `&nbsp;` and the typographic quotes back to ASCII.
fn normalize_char(c: char) -> char {
    match c {
        '\u{a0}' => ' ',
        '\u{201c}' | '\u{201d}' => '"',
        '\u{2018}' | '\u{2019}' => '\'',
        other => other,
    }
}

fn render(pieces: &[Piece]) -> String {
    let mut raw = String::new();
    for piece in pieces {
        match piece {
            Piece::Open(Element::Sup) => raw.push('^'),
            Piece::Close(Element::Sup) => {}
            Piece::Open(_) | Piece::Close(_) => raw.push(' '),
            Piece::Text(text) => raw.extend(text.chars().map(normalize_char)),
        }
    }
    collapse_whitespace(&raw)
}

/// Collapses whitespace runs inside each line, keeping the line breaks.
fn collapse_whitespace(raw: &str) -> String {
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0;
    for c in text.chars() {
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
    out.trim().to_string()
}

/// Removes markup, decodes entities and normalizes whitespace.
pub fn strip_html(html: &str) -> String {
    render(&tokenize(html))
}

/// Drops anything that looks like a tag and leaves the rest, entities included,
/// untouched.
pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('>') {
            Some(close) if close > 0 => rest = &after[close + 1..],
            _ => {
                out.push('<');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeadingKind {
    Example,
    Constraints,
}

#[derive(Debug, Clone, Copy)]
struct Heading {
    kind: HeadingKind,
    start: usize,
    end: usize,
}

fn heading_kind(label: &str) -> Option<HeadingKind> {
    let lower = label.trim().to_ascii_lowercase();
    if lower == "constraints:" {
        return Some(HeadingKind::Constraints);
    }
    let rest = lower.strip_prefix("example")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let number = rest.strip_suffix(':')?.trim();
    (!number.is_empty() && number.chars().all(|c| c.is_ascii_digit()))
        .then_some(HeadingKind::Example)
}

fn next_solid(pieces: &[Piece], from: usize) -> Option<usize> {
    pieces
        .get(from..)?
        .iter()
        .position(|p| !p.is_blank())
        .map(|offset| from + offset)
}

fn previous_solid(pieces: &[Piece], before: usize) -> Option<usize> {
    pieces[..before].iter().rposition(|p| !p.is_blank())
}

/// A heading is `<strong>Label</strong>`, optionally wrapped in `<p>…</p>`.
fn find_headings(pieces: &[Piece]) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut i = 0;
    while i + 2 < pieces.len() {
        let kind = match (&pieces[i], &pieces[i + 1], &pieces[i + 2]) {
            (
                Piece::Open(Element::Strong),
                Piece::Text(label),
                Piece::Close(Element::Strong),
            ) => heading_kind(label),
            _ => None,
        };
        let Some(kind) = kind else {
            i += 1;
            continue;
        };

        let start = match previous_solid(pieces, i) {
            Some(p) if pieces[p] == Piece::Open(Element::Paragraph) => p,
            _ => i,
        };
        let end = match next_solid(pieces, i + 3) {
            Some(n) if pieces[n] == Piece::Close(Element::Paragraph) => n + 1,
            _ => i + 3,
        };
        headings.push(Heading { kind, start, end });
        i = end;
    }
    headings
}

const FIELD_LABELS: [&str; 3] = ["input:", "output:", "explanation:"];

/// Value of `label` up to the next field label or the end of `text`.
fn field_value(text: &str, label: &str) -> Option<String> {
    let lower = text.to_ascii_lowercase();
    let start = lower.find(label)? + label.len();
    let end = FIELD_LABELS
        .iter()
        .filter_map(|l| lower[start..].find(l))
        .min()
        .map_or(text.len(), |offset| start + offset);
    let value = text[start..end].trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn read_example(body: &[Piece]) -> Option<Example> {
    let text = render(body);
    Some(Example {
        input: field_value(&text, "input:")?,
        output: field_value(&text, "output:")?,
        explanation: field_value(&text, "explanation:"),
    })
}

/// The list starting at `open`, through its matching close (or the end).
fn list_span(pieces: &[Piece], open: usize) -> &[Piece] {
    let mut depth = 0usize;
    for (idx, piece) in pieces.iter().enumerate().skip(open) {
        match piece {
            Piece::Open(Element::List) => depth += 1,
            Piece::Close(Element::List) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return &pieces[open..=idx];
                }
            }
            _ => {}
        }
    }
    &pieces[open..]
}

/// Up to the next `<p><strong>` section start.
fn section_end(pieces: &[Piece]) -> usize {
    pieces
        .iter()
        .enumerate()
        .position(|(idx, piece)| {
            *piece == Piece::Open(Element::Paragraph)
                && next_solid(pieces, idx + 1)
                    .is_some_and(|n| pieces[n] == Piece::Open(Element::Strong))
        })
        .unwrap_or(pieces.len())
}

fn list_items(pieces: &[Piece]) -> Vec<&[Piece]> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, piece) in pieces.iter().enumerate() {
        match piece {
            Piece::Open(Element::Item) => {
                if depth == 0 {
                    start = idx + 1;
                }
                depth += 1;
            }
            Piece::Close(Element::Item) if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    items.push(&pieces[start..idx]);
                }
            }
            _ => {}
        }
    }
    if depth > 0 {
        items.push(&pieces[start..]);
    }
    items
}

fn read_constraints(pieces: &[Piece], heading: Heading) -> String {
    let after = &pieces[heading.end..];
    let span = match next_solid(after, 0) {
        Some(i) if after[i] == Piece::Open(Element::List) => list_span(after, i),
        _ => &after[..section_end(after)],
    };

    let items = list_items(span);
    if items.is_empty() {
        return render(span);
    }
    items
        .into_iter()
        .map(|item| format!("• {}", render(item)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Splits a problem description into examples, constraints and statement.
pub fn parse_content(html: &str) -> ParsedContent {
    let pieces = tokenize(html);
    let headings = find_headings(&pieces);
    let constraints = headings
        .iter()
        .copied()
        .find(|h| h.kind == HeadingKind::Constraints);
    let example_headings: Vec<Heading> = headings
        .iter()
        .copied()
        .filter(|h| h.kind == HeadingKind::Example)
        .collect();

    let mut examples = Vec::new();
    let mut removed: Vec<Range<usize>> = Vec::new();
    for (idx, heading) in example_headings.iter().enumerate() {
        let mut end = pieces.len();
        if let Some(next) = example_headings.get(idx + 1) {
            end = end.min(next.start);
        }
        if let Some(c) = constraints.filter(|c| c.start >= heading.end) {
            end = end.min(c.start);
        }
        removed.push(heading.start..end);
        if let Some(example) = read_example(&pieces[heading.end..end]) {
            examples.push(example);
        }
    }

    let cutoff = constraints.map_or(pieces.len(), |c| c.start);
    let kept: Vec<Piece> = pieces[..cutoff]
        .iter()
        .enumerate()
        .filter(|(idx, _)| !removed.iter().any(|r| r.contains(idx)))
        .map(|(_, piece)| piece.clone())
        .collect();

    ParsedContent {
        examples,
        constraints: constraints
            .map(|c| read_constraints(&pieces, c))
            .unwrap_or_default(),
        statement: collapse_blank_lines(&render(&kept)),
    }
}
