use crate::source_map::Range;

pub const W_LINK_DUP: &str = "W_LINK_DUP";
pub const W_LINK_UNDEFINED: &str = "W_LINK_UNDEFINED";
pub const W_LINK_UNCLOSED: &str = "W_LINK_UNCLOSED";
pub const W_BOLD_UNCLOSED: &str = "W_BOLD_UNCLOSED";
pub const W_HEADING_DEPTH: &str = "W_HEADING_DEPTH";
pub const W_HEADING_EMPTY: &str = "W_HEADING_EMPTY";

/// A non-fatal observation about the input. Diagnostics never change the
/// generated HTML.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    pub range: Range,
    pub code: &'static str,
    pub message: String,
    pub related: Vec<RelatedDiagnostic>,
}

impl Diagnostic {
    pub fn new(range: Range, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            range,
            code,
            message: message.into(),
            related: Vec::new(),
        }
    }

    pub fn with_related(mut self, related: RelatedDiagnostic) -> Self {
        self.related.push(related);
        self
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RelatedDiagnostic {
    pub range: Range,
    pub message: Option<String>,
}

impl RelatedDiagnostic {
    pub fn new(range: Range, message: Option<String>) -> Self {
        Self { range, message }
    }
}
