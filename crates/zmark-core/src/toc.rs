/// One recognized heading, as listed in the table of contents.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TocEntry {
    /// 1-based position among the entries; doubles as the heading's anchor id.
    pub id: usize,
    pub level: u8,
    pub title: Vec<u8>,
}

impl TocEntry {
    /// `<a href='#ID'>TITLE</a><br />` followed by a newline.
    pub fn render(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.title.len() + 32);
        out.extend_from_slice(format!("<a href='#{}'>", self.id).as_bytes());
        out.extend_from_slice(&self.title);
        out.extend_from_slice(b"</a><br />\n");
        out
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TableOfContents {
    entries: Vec<TocEntry>,
}

impl TableOfContents {
    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Id the next pushed entry will receive.
    pub fn next_id(&self) -> usize {
        self.entries.len() + 1
    }

    pub(crate) fn push(&mut self, level: u8, title: Vec<u8>) -> &TocEntry {
        let id = self.next_id();
        self.entries.push(TocEntry { id, level, title });
        &self.entries[id - 1]
    }

    /// All entries concatenated in the order they were recorded.
    pub fn render(&self) -> Vec<u8> {
        self.entries.iter().flat_map(TocEntry::render).collect()
    }
}
