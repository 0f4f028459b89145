use crate::span::Span;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

/// Line index over the raw input, used to place diagnostics.
#[derive(Clone, Debug)]
pub struct SourceMap {
    source_len: usize,
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: &[u8]) -> Self {
        let mut line_starts = vec![0];
        for (idx, &byte) in source.iter().enumerate() {
            if byte == b'\n' {
                line_starts.push(idx + 1);
            }
        }
        Self {
            source_len: source.len(),
            line_starts,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.source_len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index.saturating_sub(1),
        };
        Position {
            line,
            // Columns count bytes, not characters.
            character: offset - self.line_starts[line],
        }
    }

    pub fn range(&self, span: Span) -> Range {
        Range {
            start: self.position(span.start),
            end: self.position(span.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Position, SourceMap};
    use crate::span::Span;

    #[test]
    fn positions_are_line_based() {
        let map = SourceMap::new(b"# a\n[b]c\n");

        assert_eq!(map.line_count(), 3);
        assert_eq!(
            map.position(0),
            Position {
                line: 0,
                character: 0
            }
        );
        assert_eq!(
            map.position(5),
            Position {
                line: 1,
                character: 1
            }
        );
        assert_eq!(
            map.position(100),
            Position {
                line: 2,
                character: 0
            }
        );

        let range = map.range(Span::new(4, 7));
        assert_eq!(range.start.line, 1);
        assert_eq!(range.end.character, 3);
    }
}
