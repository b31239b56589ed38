//! Container id extraction from a reference record

use once_cell::sync::Lazy;
use regex::Regex;
use retarget_core::ParseError;
use std::path::Path;
use thiserror::Error;

static GUID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"guid:\s*([0-9a-fA-F]*)").expect("guid pattern is valid"));

/// Why a container id could not be extracted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// No `guid:` field in the record
    #[error("no guid field")]
    NotFound,
    /// `guid:` is not followed by any hex digits
    #[error("empty guid")]
    Empty,
    /// More than one `guid:` field in the record
    #[error("{0} guid fields")]
    Ambiguous(usize),
}

impl ExtractError {
    /// Attach document location to the failure
    pub fn into_parse_error(self, path: &Path, line: usize, text: &str) -> ParseError {
        match self {
            ExtractError::NotFound | ExtractError::Empty => ParseError::MissingIdentifier {
                path: path.to_path_buf(),
                line,
                text: text.to_string(),
            },
            ExtractError::Ambiguous(count) => ParseError::AmbiguousIdentifier {
                path: path.to_path_buf(),
                line,
                count,
                text: text.to_string(),
            },
        }
    }
}

/// Extract the container id embedded in a reference record
///
/// The record must carry exactly one `guid:` field with a non-empty hex
/// value. Anything else is document corruption. This is stricter than a
/// first-match lookup: a second `guid:` field or an empty value fails the
/// document instead of being treated as an ordinary remap miss.
pub fn extract_container_id(line: &str) -> Result<&str, ExtractError> {
    let mut matches = GUID_PATTERN.captures_iter(line);
    let first = matches.next().ok_or(ExtractError::NotFound)?;
    let extra = matches.count();
    if extra > 0 {
        return Err(ExtractError::Ambiguous(extra + 1));
    }

    let id = first.get(1).ok_or(ExtractError::NotFound)?.as_str();
    if id.is_empty() {
        return Err(ExtractError::Empty);
    }
    Ok(id)
}
