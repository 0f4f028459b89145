use std::io::{self, Write};

use crate::error::Result;
use crate::toc::TableOfContents;

/// Growable HTML body buffer.
///
/// Capacity is checked before every append and doubled until the append fits
/// with one spare byte, so `capacity() > len()` always holds. Growth goes
/// through `try_reserve_exact`, which turns allocation failure into
/// [`crate::Error::Alloc`] instead of an abort.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OutputBuffer {
    bytes: Vec<u8>,
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self {
            bytes: Vec::with_capacity(1),
        }
    }
}

impl OutputBuffer {
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut bytes = Vec::new();
        bytes.try_reserve_exact(capacity.max(1))?;
        Ok(Self { bytes })
    }

    pub fn push(&mut self, fragment: &[u8]) -> Result<()> {
        self.grow(fragment.len())?;
        self.bytes.extend_from_slice(fragment);
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    fn grow(&mut self, additional: usize) -> Result<()> {
        let needed = self.bytes.len().saturating_add(additional).saturating_add(1);
        let mut capacity = self.bytes.capacity().max(1);
        if capacity >= needed {
            return Ok(());
        }
        while capacity < needed {
            capacity = capacity.saturating_mul(2);
        }
        self.bytes.try_reserve_exact(capacity - self.bytes.len())?;
        Ok(())
    }
}

/// Finished conversion output: the table of contents followed by the body.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Document {
    pub toc: TableOfContents,
    pub body: OutputBuffer,
}

impl Document {
    /// Final document bytes, table of contents first.
    pub fn to_bytes(&self) -> Vec<u8> {
        let toc = self.toc.render();
        let mut out = Vec::with_capacity(toc.len() + self.body.len());
        out.extend_from_slice(&toc);
        out.extend_from_slice(self.body.as_bytes());
        out
    }

    /// Writes the table of contents, then the body, to the same sink.
    pub fn write_to<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        sink.write_all(&self.toc.render())?;
        sink.write_all(self.body.as_bytes())?;
        sink.flush()
    }
}

pub(crate) fn paragraph(content: &[u8]) -> Vec<u8> {
    wrap(b"<p>", content, b"</p>\n")
}

pub(crate) fn heading(level: u8, id: usize, title: &[u8]) -> Vec<u8> {
    let open = format!("<h{} id='{}'>", level, id);
    let close = format!("</h{}>\n", level);
    wrap(open.as_bytes(), title, close.as_bytes())
}

pub(crate) fn bold(text: &[u8]) -> Vec<u8> {
    wrap(b"<b>", text, b"</b>")
}

pub(crate) fn anchor(destination: &[u8], name: &[u8]) -> Vec<u8> {
    let mut open = Vec::with_capacity(destination.len() + 11);
    open.extend_from_slice(b"<a href='");
    open.extend_from_slice(destination);
    open.extend_from_slice(b"'>");
    wrap(&open, name, b"</a>")
}

fn wrap(open: &[u8], inner: &[u8], close: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(open.len() + inner.len() + close.len());
    out.extend_from_slice(open);
    out.extend_from_slice(inner);
    out.extend_from_slice(close);
    out
}
