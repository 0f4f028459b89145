//! Single-pass conversion of a small Markdown subset (bold, line-start link
//! definitions, ATX headings) into an HTML fragment headed by a generated
//! table of contents.
//!
//! The pipeline is [`build_link_table`] then [`transform`], with [`convert`]
//! running both and [`convert_file`] adding the file plumbing.

mod diagnostic;
mod emit;
mod error;
mod io;
mod links;
mod source_map;
mod span;
mod toc;
mod transform;

use std::path::Path;

pub use diagnostic::{
    Diagnostic, RelatedDiagnostic, W_BOLD_UNCLOSED, W_HEADING_DEPTH, W_HEADING_EMPTY,
    W_LINK_DUP, W_LINK_UNCLOSED, W_LINK_UNDEFINED,
};
pub use emit::{Document, OutputBuffer};
pub use error::{Error, Result};
pub use io::{load, save};
pub use links::{ElidedSpans, LinkDefinition, LinkScan, LinkTable, build_link_table};
pub use source_map::{Position, Range, SourceMap};
pub use span::Span;
pub use toc::{TableOfContents, TocEntry};
pub use transform::{Transformed, transform};

/// Everything produced by one conversion.
pub struct Conversion {
    pub document: Document,
    pub links: LinkTable,
    /// Link-pass diagnostics first, then markup-pass diagnostics.
    pub diagnostics: Vec<Diagnostic>,
    pub source_map: SourceMap,
}

/// Converts an in-memory document.
pub fn convert(source: &[u8]) -> Result<Conversion> {
    let source_map = SourceMap::new(source);
    let scan = build_link_table(source, &source_map);
    let transformed = transform(source, &scan.elided, &scan.table, &source_map)?;

    let mut diagnostics = scan.diagnostics;
    diagnostics.extend(transformed.diagnostics);
    Ok(Conversion {
        document: transformed.document,
        links: scan.table,
        diagnostics,
        source_map,
    })
}

/// Reads `input`, converts it and writes the result to `output`.
pub fn convert_file(input: &Path, output: &Path) -> Result<Conversion> {
    let source = load(input)?;
    let conversion = convert(&source)?;
    save(output, &conversion.document)?;
    Ok(conversion)
}
