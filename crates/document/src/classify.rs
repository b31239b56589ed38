//! Structured document classification
//!
//! A file is a structured document when its extension is not excluded and
//! it begins with the exact version header. The sniff reads a handful of
//! bytes, never a whole line, so binary files are cheap to reject.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// First line every structured document starts with
pub const DOCUMENT_HEADER: &str = "%YAML 1.1";

/// Result of classifying one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Structured document, scanned line by line
    Document,
    /// Anything else, copied byte for byte
    Opaque,
}

/// Classifies files by extension and header
#[derive(Debug, Clone)]
pub struct Classifier {
    excluded_extensions: HashSet<String>,
}

impl Classifier {
    /// Create a classifier from dotted extensions (`".png"`)
    ///
    /// Matching is case sensitive, as on the original asset pipeline: list
    /// both `.fbx` and `.FBX` to exclude both.
    pub fn new<I, S>(excluded_extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Classifier {
            excluded_extensions: excluded_extensions.into_iter().map(Into::into).collect(),
        }
    }

    /// True if the file's extension is in the excluded set
    pub fn is_excluded_extension(&self, path: &Path) -> bool {
        match dotted_extension(path) {
            Some(ext) => self.excluded_extensions.contains(&ext),
            None => false,
        }
    }

    /// Classify a file
    ///
    /// # Errors
    ///
    /// Returns the I/O error if a non-excluded file cannot be opened or read.
    pub fn classify(&self, path: &Path) -> io::Result<FileKind> {
        if self.is_excluded_extension(path) {
            return Ok(FileKind::Opaque);
        }
        if has_document_header(path)? {
            Ok(FileKind::Document)
        } else {
            Ok(FileKind::Opaque)
        }
    }
}

/// Extension with its leading dot, e.g. `".prefab"`
pub fn dotted_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
}

/// True if the file's first line is exactly [`DOCUMENT_HEADER`]
pub fn has_document_header(path: &Path) -> io::Result<bool> {
    let mut file = File::open(path)?;
    let mut buf = [0u8; DOCUMENT_HEADER.len() + 1];
    let n = read_prefix(&mut file, &mut buf)?;
    Ok(is_header_line(&buf[..n]))
}

fn is_header_line(prefix: &[u8]) -> bool {
    let header = DOCUMENT_HEADER.as_bytes();
    if !prefix.starts_with(header) {
        return false;
    }
    match prefix.get(header.len()) {
        None => true,
        Some(b'\n') | Some(b'\r') => true,
        Some(_) => false,
    }
}

// Fill as much of `buf` as the file allows.
fn read_prefix(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
