use std::collections::HashMap;

use tracing::debug;

use crate::diagnostic::{Diagnostic, RelatedDiagnostic, W_LINK_DUP};
use crate::source_map::SourceMap;
use crate::span::Span;

pub(crate) const LF: u8 = b'\n';
pub(crate) const SQUARE_OPEN: u8 = b'[';
pub(crate) const SQUARE_CLOSE: u8 = b']';

/// A `[name]destination` line captured by the link pre-scan.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LinkDefinition {
    pub name: Vec<u8>,
    pub destination: Vec<u8>,
    /// Whole definition, opening bracket through the end of the destination.
    pub span: Span,
}

/// Link names mapped to destinations. Names match byte-for-byte; the first
/// definition of a name is the one that sticks.
#[derive(Clone, Debug, Default)]
pub struct LinkTable {
    definitions: Vec<LinkDefinition>,
    index: HashMap<Vec<u8>, usize>,
}

impl LinkTable {
    pub fn get(&self, name: &[u8]) -> Option<&[u8]> {
        self.definition(name)
            .map(|definition| definition.destination.as_slice())
    }

    pub fn definition(&self, name: &[u8]) -> Option<&LinkDefinition> {
        self.index.get(name).map(|&idx| &self.definitions[idx])
    }

    pub fn contains(&self, name: &[u8]) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Definitions in the order they appear in the source.
    pub fn iter(&self) -> impl Iterator<Item = &LinkDefinition> {
        self.definitions.iter()
    }

    fn insert(&mut self, definition: LinkDefinition) {
        let next = self.definitions.len();
        let idx = *self.index.entry(definition.name.clone()).or_insert(next);
        if idx == next {
            self.definitions.push(definition);
        }
    }
}

/// Sorted, non-overlapping byte ranges the markup pass must treat as filler.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ElidedSpans {
    spans: Vec<Span>,
}

impl ElidedSpans {
    pub fn contains(&self, offset: usize) -> bool {
        let idx = self.spans.partition_point(|span| span.end <= offset);
        self.spans.get(idx).is_some_and(|span| span.contains(offset))
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Span> {
        self.spans.iter()
    }

    fn push(&mut self, span: Span) {
        if span.is_empty() {
            return;
        }
        debug_assert!(self.spans.last().is_none_or(|last| last.end <= span.start));
        self.spans.push(span);
    }
}

pub struct LinkScan {
    pub table: LinkTable,
    pub elided: ElidedSpans,
    pub diagnostics: Vec<Diagnostic>,
}

/// First pass: collect link definitions and record the spans they occupy.
///
/// A definition is a line starting with `[name]`, after a line terminator;
/// the first line of the input never holds one. Its destination is the rest
/// of that line, or the following line when nothing follows the bracket and
/// that line reads as a bare destination. A repeated name only has `[name`
/// elided; its closing bracket and trailing text are left for the markup
/// pass to render as ordinary text.
pub fn build_link_table(source: &[u8], source_map: &SourceMap) -> LinkScan {
    let mut table = LinkTable::default();
    let mut elided = ElidedSpans::default();
    let mut diagnostics = Vec::new();

    let mut previous: Option<u8> = None;
    let mut open: Option<usize> = None;
    let mut pos = 0;
    while pos < source.len() {
        let byte = source[pos];
        if byte == LF {
            open = None;
        } else if previous == Some(LF) && byte == SQUARE_OPEN {
            open = Some(pos);
        } else if let Some(start) = open {
            if byte == SQUARE_CLOSE {
                open = None;
                let name = &source[start + 1..pos];
                if let Some(first) = table.definition(name) {
                    elided.push(Span::new(start, pos));
                    diagnostics.push(
                        Diagnostic::new(
                            source_map.range(Span::new(start, pos + 1)),
                            W_LINK_DUP,
                            format!(
                                "link '{}' is already defined; keeping the first destination",
                                String::from_utf8_lossy(name)
                            ),
                        )
                        .with_related(RelatedDiagnostic::new(
                            source_map.range(first.span),
                            Some("first definition".to_string()),
                        )),
                    );
                } else {
                    let destination = scan_destination(source, pos + 1);
                    elided.push(Span::new(start, destination.name_line_end));
                    if destination.next_line {
                        elided.push(destination.span);
                    }
                    table.insert(LinkDefinition {
                        name: name.to_vec(),
                        destination: destination.span.slice(source).to_vec(),
                        span: Span::new(start, destination.resume),
                    });

                    pos = destination.resume;
                    if pos >= source.len() {
                        break;
                    }
                    // `pos` sits on the line terminator that ends the definition.
                    previous = Some(LF);
                    pos += 1;
                    continue;
                }
            }
        }
        previous = Some(byte);
        pos += 1;
    }

    debug!(
        definitions = table.len(),
        elided = elided.len(),
        "link table built"
    );

    LinkScan {
        table,
        elided,
        diagnostics,
    }
}

struct Destination {
    span: Span,
    /// End of the `[name]...` line.
    name_line_end: usize,
    /// Whether the destination was taken from the line after the name.
    next_line: bool,
    /// Offset of the terminator (or end of input) where scanning resumes.
    resume: usize,
}

fn scan_destination(source: &[u8], from: usize) -> Destination {
    let name_line_end = line_end(source, from);
    if name_line_end > from || name_line_end >= source.len() {
        return Destination {
            span: Span::new(from, name_line_end),
            name_line_end,
            next_line: false,
            resume: name_line_end,
        };
    }

    let next_start = name_line_end + 1;
    let next_end = line_end(source, next_start);
    if is_bare_destination(&source[next_start..next_end]) {
        Destination {
            span: Span::new(next_start, next_end),
            name_line_end,
            next_line: true,
            resume: next_end,
        }
    } else {
        Destination {
            span: Span::new(from, from),
            name_line_end,
            next_line: false,
            resume: name_line_end,
        }
    }
}

/// A line that can stand in for a missing destination: non-empty, no blanks,
/// and not opening a definition, heading or bold run.
fn is_bare_destination(line: &[u8]) -> bool {
    match line.first() {
        None | Some(&SQUARE_OPEN) | Some(b'#') | Some(b'*') => false,
        Some(_) => !line.iter().any(|&byte| byte == b' ' || byte == b'\t'),
    }
}

fn line_end(source: &[u8], from: usize) -> usize {
    source[from.min(source.len())..]
        .iter()
        .position(|&byte| byte == LF)
        .map_or(source.len(), |offset| from + offset)
}
