use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

use crate::emit::Document;
use crate::error::{Error, Result};

/// Reads the whole input file into memory.
pub fn load(path: &Path) -> Result<Vec<u8>> {
    let source = fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = source.len(), "input loaded");
    Ok(source)
}

/// Replaces whatever is at `path` with the document, table of contents first.
///
/// A failure part way through can leave a truncated file behind.
pub fn save(path: &Path, document: &Document) -> Result<()> {
    let write_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    document.write_to(&mut writer).map_err(write_err)?;
    debug!(path = %path.display(), "output saved");
    Ok(())
}
