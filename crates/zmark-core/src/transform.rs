use tracing::{debug, trace};

use crate::diagnostic::{
    Diagnostic, W_BOLD_UNCLOSED, W_HEADING_DEPTH, W_HEADING_EMPTY, W_LINK_UNCLOSED,
    W_LINK_UNDEFINED,
};
use crate::emit::{self, Document, OutputBuffer};
use crate::error::Result;
use crate::links::{ElidedSpans, LF, LinkTable, SQUARE_CLOSE, SQUARE_OPEN};
use crate::source_map::SourceMap;
use crate::span::Span;
use crate::toc::TableOfContents;

const BOLD: u8 = b'*';
const HASHTAG: u8 = b'#';
const MAX_HEADING_LEVEL: usize = 6;
/// What an elided byte reads as. It is below `LF`, so it is never copied.
const FILLER: u8 = 0x01;

pub struct Transformed {
    pub document: Document,
    pub diagnostics: Vec<Diagnostic>,
}

/// Second pass: turn the input into HTML, skipping elided link definitions.
pub fn transform(
    source: &[u8],
    elided: &ElidedSpans,
    links: &LinkTable,
    source_map: &SourceMap,
) -> Result<Transformed> {
    let transformer = Transformer {
        input: Input {
            bytes: source,
            elided,
        },
        links,
        source_map,
        cursor: Cursor {
            pos: 0,
            previous: None,
        },
        paragraph: Vec::new(),
        paragraphs: 0,
        body: OutputBuffer::with_capacity(source.len().saturating_mul(2))?,
        toc: TableOfContents::default(),
        diagnostics: Vec::new(),
    };
    transformer.run()
}

/// Input as seen by the markup pass: elided bytes read as [`FILLER`].
struct Input<'a> {
    bytes: &'a [u8],
    elided: &'a ElidedSpans,
}

impl Input<'_> {
    fn at(&self, pos: usize) -> Option<u8> {
        let byte = *self.bytes.get(pos)?;
        if self.elided.contains(pos) {
            Some(FILLER)
        } else {
            Some(byte)
        }
    }

    /// First offset at or after `from` that is past the end or holds a byte
    /// matching `stop`.
    fn scan_until(&self, from: usize, stop: impl Fn(u8) -> bool) -> usize {
        let mut pos = from;
        while let Some(byte) = self.at(pos) {
            if stop(byte) {
                break;
            }
            pos += 1;
        }
        pos
    }

    fn text(&self, span: Span) -> Vec<u8> {
        (span.start..span.end)
            .filter_map(|pos| self.at(pos))
            .filter(|&byte| byte != FILLER)
            .collect()
    }
}

#[derive(Clone, Copy, Debug)]
struct Cursor {
    pos: usize,
    /// Byte the previous iteration stopped on; `None` at the start of input.
    previous: Option<u8>,
}

/// A warning raised by a step, placed by byte span.
struct Note {
    span: Span,
    code: &'static str,
    message: String,
}

/// Result of an inline scanner: where the cursor lands and what goes into the
/// paragraph.
struct InlineStep {
    next: usize,
    html: Option<Vec<u8>>,
    note: Option<Note>,
}

enum HeaderKind {
    Heading { level: u8, title: Vec<u8> },
    Empty,
    TooDeep(usize),
}

struct HeaderStep {
    next: usize,
    span: Span,
    kind: HeaderKind,
}

/// Scans from an opening delimiter to `close`, stopping early at a line
/// terminator or the end of input. Returns the inner span and whether the
/// span was closed.
fn delimited(input: &Input<'_>, open: usize, close: u8) -> (Span, bool) {
    let end = input.scan_until(open + 1, |byte| byte == close || byte == LF);
    (Span::new(open + 1, end), input.at(end) == Some(close))
}

fn bold_step(input: &Input<'_>, pos: usize) -> Option<InlineStep> {
    if input.at(pos) != Some(BOLD) {
        return None;
    }
    let (inner, closed) = delimited(input, pos, BOLD);
    if !closed {
        return Some(InlineStep {
            next: inner.end,
            html: None,
            note: Some(Note {
                span: Span::new(pos, inner.end),
                code: W_BOLD_UNCLOSED,
                message: "bold text is not closed before the end of the line".to_string(),
            }),
        });
    }
    let text = input.text(inner);
    Some(InlineStep {
        next: inner.end + 1,
        html: (!text.is_empty()).then(|| emit::bold(&text)),
        note: None,
    })
}

fn link_step(input: &Input<'_>, pos: usize, links: &LinkTable) -> Option<InlineStep> {
    if input.at(pos) != Some(SQUARE_OPEN) {
        return None;
    }
    let (inner, closed) = delimited(input, pos, SQUARE_CLOSE);
    if !closed {
        return Some(InlineStep {
            next: inner.end,
            html: None,
            note: Some(Note {
                span: Span::new(pos, inner.end),
                code: W_LINK_UNCLOSED,
                message: "link reference is not closed before the end of the line".to_string(),
            }),
        });
    }
    let name = input.text(inner);
    let next = inner.end + 1;
    if name.is_empty() {
        return Some(InlineStep {
            next,
            html: None,
            note: None,
        });
    }
    match links.get(&name) {
        Some(destination) => Some(InlineStep {
            next,
            html: Some(emit::anchor(destination, &name)),
            note: None,
        }),
        None => Some(InlineStep {
            next,
            html: None,
            note: Some(Note {
                span: Span::new(pos, next),
                code: W_LINK_UNDEFINED,
                message: format!(
                    "link '{}' is not defined; the reference is dropped",
                    String::from_utf8_lossy(&name)
                ),
            }),
        }),
    }
}

fn is_paragraph_break(previous: Option<u8>, current: Option<u8>) -> bool {
    previous == Some(LF) && current == Some(LF)
}

fn header_step(input: &Input<'_>, cursor: Cursor) -> Option<HeaderStep> {
    let at_line_start = matches!(cursor.previous, None | Some(LF));
    if !at_line_start || input.at(cursor.pos) != Some(HASHTAG) {
        return None;
    }
    let markers_end = input.scan_until(cursor.pos, |byte| byte != HASHTAG);
    let level = markers_end - cursor.pos;
    if level > MAX_HEADING_LEVEL {
        return Some(HeaderStep {
            next: markers_end,
            span: Span::new(cursor.pos, markers_end),
            kind: HeaderKind::TooDeep(level),
        });
    }

    let line_end = input.scan_until(markers_end, |byte| byte == LF);
    let title = input.text(Span::new(markers_end, line_end));
    let title = title.trim_ascii();
    let kind = if title.is_empty() {
        HeaderKind::Empty
    } else {
        HeaderKind::Heading {
            // At most MAX_HEADING_LEVEL here.
            level: level as u8,
            title: title.to_vec(),
        }
    };
    Some(HeaderStep {
        next: line_end,
        span: Span::new(cursor.pos, line_end),
        kind,
    })
}

fn literal(byte: u8) -> Option<u8> {
    (byte > LF).then_some(byte)
}

struct Transformer<'a> {
    input: Input<'a>,
    links: &'a LinkTable,
    source_map: &'a SourceMap,
    cursor: Cursor,
    paragraph: Vec<u8>,
    paragraphs: usize,
    body: OutputBuffer,
    toc: TableOfContents,
    diagnostics: Vec<Diagnostic>,
}

impl Transformer<'_> {
    fn run(mut self) -> Result<Transformed> {
        // Each iteration tries every construct once, in precedence order, at
        // wherever the previous construct left the cursor. `previous` holds
        // for the whole iteration.
        while self.input.at(self.cursor.pos).is_some() {
            if let Some(step) = bold_step(&self.input, self.cursor.pos) {
                self.apply_inline(step);
            }
            if let Some(step) = link_step(&self.input, self.cursor.pos, self.links) {
                self.apply_inline(step);
            }
            if is_paragraph_break(self.cursor.previous, self.input.at(self.cursor.pos)) {
                self.flush_paragraph()?;
            }
            if let Some(step) = header_step(&self.input, self.cursor) {
                self.apply_header(step)?;
            }

            let Some(byte) = self.input.at(self.cursor.pos) else {
                break;
            };
            if let Some(byte) = literal(byte) {
                self.paragraph.push(byte);
            }
            self.cursor = Cursor {
                pos: self.cursor.pos + 1,
                previous: Some(byte),
            };
        }
        self.flush_paragraph()?;

        debug!(
            headings = self.toc.len(),
            paragraphs = self.paragraphs,
            bytes = self.body.len(),
            "markup transformed"
        );

        Ok(Transformed {
            document: Document {
                toc: self.toc,
                body: self.body,
            },
            diagnostics: self.diagnostics,
        })
    }

    fn advance_to(&mut self, next: usize) {
        self.cursor.pos = self.cursor.pos.max(next);
    }

    fn apply_inline(&mut self, step: InlineStep) {
        if let Some(html) = step.html {
            self.paragraph.extend_from_slice(&html);
        }
        if let Some(note) = step.note {
            self.note(note);
        }
        self.advance_to(step.next);
    }

    fn apply_header(&mut self, step: HeaderStep) -> Result<()> {
        match step.kind {
            HeaderKind::Heading { level, title } => {
                let id = self.toc.next_id();
                trace!(id, level, "heading");
                // Headings bypass the paragraph accumulator.
                self.body.push(&emit::heading(level, id, &title))?;
                self.toc.push(level, title);
            }
            HeaderKind::Empty => self.note(Note {
                span: step.span,
                code: W_HEADING_EMPTY,
                message: "heading has no title and is skipped".to_string(),
            }),
            HeaderKind::TooDeep(count) => {
                self.paragraph.extend(std::iter::repeat_n(HASHTAG, count));
                self.note(Note {
                    span: step.span,
                    code: W_HEADING_DEPTH,
                    message: format!(
                        "{} heading markers exceed the maximum of {}; kept as text",
                        count, MAX_HEADING_LEVEL
                    ),
                });
            }
        }
        self.advance_to(step.next);
        Ok(())
    }

    fn flush_paragraph(&mut self) -> Result<()> {
        if self.paragraph.is_empty() {
            return Ok(());
        }
        self.body.push(&emit::paragraph(&self.paragraph))?;
        self.paragraph.clear();
        self.paragraphs += 1;
        Ok(())
    }

    fn note(&mut self, note: Note) {
        self.diagnostics.push(Diagnostic::new(
            self.source_map.range(note.span),
            note.code,
            note.message,
        ));
    }
}
