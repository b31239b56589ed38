//! Script reference rewriting
//!
//! Scans a structured document line by line and replaces every script
//! reference record whose container id is in the [`RemapTable`]. All other
//! content, including line terminators, is written back unchanged.
//!
//! ## Scan states
//!
//! ```text
//! Normal --(marker, no '}')--> AwaitingContinuation --('}' present)--> Normal
//! ```
//!
//! A record may span at most two physical lines. A continuation that still
//! lacks the closing brace, or the sentinel outside a marked record, fails
//! the document with a [`ParseError`].

use crate::extract::extract_container_id;
use retarget_core::{Diagnostic, Error, ParseError, RemapTable, RemapTarget, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Field name preceding a script reference record
pub const SCRIPT_FIELD_MARKER: &str = "m_Script";

/// Local id marking a record as a script reference
pub const SCRIPT_SENTINEL: &str = "11500000";

/// What a single document scan produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// Physical lines read
    pub lines: usize,
    /// Records replaced with the compiled identifiers
    pub references_rewritten: usize,
    /// Records left alone because their container id is not remapped
    pub diagnostics: Vec<Diagnostic>,
}

struct PhysicalLine {
    bytes: Vec<u8>,
    ending: &'static [u8],
}

enum ScanState {
    Normal,
    AwaitingContinuation { first: PhysicalLine, line: usize },
}

struct Sink<'p, W: Write> {
    writer: W,
    path: &'p Path,
}

impl<W: Write> Sink<'_, W> {
    fn line(&mut self, bytes: &[u8], ending: &[u8]) -> Result<()> {
        self.writer
            .write_all(bytes)
            .and_then(|_| self.writer.write_all(ending))
            .map_err(|e| Error::io(self.path, e))
    }

    fn originals(&mut self, lines: &[PhysicalLine]) -> Result<()> {
        for line in lines {
            self.line(&line.bytes, line.ending)?;
        }
        Ok(())
    }

    fn finish(mut self) -> Result<()> {
        self.writer.flush().map_err(|e| Error::io(self.path, e))
    }
}

/// Rewrites the script references of one document
pub struct DocumentRewriter<'a> {
    source: &'a Path,
    remap: &'a RemapTable,
}

impl<'a> DocumentRewriter<'a> {
    /// Create a rewriter for the document at `source`
    ///
    /// `source` is used for reading in [`rewrite_file`](Self::rewrite_file)
    /// and for error and diagnostic locations.
    pub fn new(source: &'a Path, remap: &'a RemapTable) -> Self {
        DocumentRewriter { source, remap }
    }

    /// Rewrite `source` into a newly created file at `target`
    ///
    /// Both handles are closed before this returns, on every path.
    pub fn rewrite_file(&self, target: &Path) -> Result<RewriteOutcome> {
        let input = File::open(self.source).map_err(|e| Error::io(self.source, e))?;
        let output = File::create(target).map_err(|e| Error::io(target, e))?;
        self.scan(
            BufReader::new(input),
            Sink {
                writer: BufWriter::new(output),
                path: target,
            },
        )
    }

    /// Rewrite from any reader into any writer
    pub fn rewrite<R: BufRead, W: Write>(&self, reader: R, writer: W) -> Result<RewriteOutcome> {
        self.scan(
            reader,
            Sink {
                writer,
                path: self.source,
            },
        )
    }

    fn scan<R: BufRead, W: Write>(
        &self,
        mut reader: R,
        mut sink: Sink<'_, W>,
    ) -> Result<RewriteOutcome> {
        let mut outcome = RewriteOutcome::default();
        let mut state = ScanState::Normal;

        loop {
            let next = read_physical(&mut reader).map_err(|e| Error::io(self.source, e))?;
            if next.is_some() {
                outcome.lines += 1;
            }

            state = match (state, next) {
                (ScanState::Normal, None) => break,
                (ScanState::Normal, Some(line)) => {
                    self.scan_line(line, outcome.lines, &mut sink, &mut outcome)?
                }
                (ScanState::AwaitingContinuation { first, line }, None) => {
                    return Err(self.unterminated(line, &first.bytes));
                }
                (ScanState::AwaitingContinuation { first, line }, Some(second)) => {
                    let merged = [first.bytes.as_slice(), second.bytes.as_slice()].concat();
                    if !contains(&merged, b"}") {
                        return Err(self.unterminated(line, &merged));
                    }
                    self.finish_record(&[first, second], &merged, line, &mut sink, &mut outcome)?;
                    ScanState::Normal
                }
            };
        }

        sink.finish()?;
        debug!(
            path = %self.source.display(),
            lines = outcome.lines,
            rewritten = outcome.references_rewritten,
            "document scanned"
        );
        Ok(outcome)
    }

    fn scan_line<W: Write>(
        &self,
        line: PhysicalLine,
        line_no: usize,
        sink: &mut Sink<'_, W>,
        outcome: &mut RewriteOutcome,
    ) -> Result<ScanState> {
        if contains(&line.bytes, SCRIPT_FIELD_MARKER.as_bytes()) {
            if !contains(&line.bytes, b"}") {
                return Ok(ScanState::AwaitingContinuation {
                    first: line,
                    line: line_no,
                });
            }
            let merged = line.bytes.clone();
            self.finish_record(&[line], &merged, line_no, sink, outcome)?;
        } else if contains(&line.bytes, SCRIPT_SENTINEL.as_bytes()) {
            return Err(ParseError::SentinelWithoutMarker {
                path: self.source.to_path_buf(),
                line: line_no,
                text: String::from_utf8_lossy(&line.bytes).into_owned(),
            }
            .into());
        } else {
            sink.line(&line.bytes, line.ending)?;
        }
        Ok(ScanState::Normal)
    }

    fn finish_record<W: Write>(
        &self,
        lines: &[PhysicalLine],
        merged: &[u8],
        line_no: usize,
        sink: &mut Sink<'_, W>,
        outcome: &mut RewriteOutcome,
    ) -> Result<()> {
        // marker without sentinel: some other m_Script-like field
        if !contains(merged, SCRIPT_SENTINEL.as_bytes()) {
            return sink.originals(lines);
        }

        let record = String::from_utf8_lossy(merged);
        let old = extract_container_id(&record)
            .map_err(|e| e.into_parse_error(self.source, line_no, &record))?;

        match self.remap.get(old) {
            Some(target) => {
                let ending = lines.last().map(|l| l.ending).unwrap_or_default();
                sink.line(canonical_record(target).as_bytes(), ending)?;
                outcome.references_rewritten += 1;
                Ok(())
            }
            None => {
                warn!(
                    path = %self.source.display(),
                    line = line_no,
                    guid = old,
                    "couldn't find a script remap"
                );
                outcome.diagnostics.push(Diagnostic::MissingRemap {
                    path: self.source.to_path_buf(),
                    line: line_no,
                    container_id: old.into(),
                });
                sink.originals(lines)
            }
        }
    }

    fn unterminated(&self, line: usize, bytes: &[u8]) -> Error {
        ParseError::UnterminatedRecord {
            path: self.source.to_path_buf(),
            line,
            text: String::from_utf8_lossy(bytes).into_owned(),
        }
        .into()
    }
}

/// The normalized single-line form of a script reference
pub fn canonical_record(target: &RemapTarget) -> String {
    format!(
        "  {}: {{fileID: {}, guid: {}, type: 3}}",
        SCRIPT_FIELD_MARKER, target.local_id, target.container_id
    )
}

// lines are raw bytes; only a script record is ever decoded
fn read_physical<R: BufRead>(reader: &mut R) -> io::Result<Option<PhysicalLine>> {
    let mut bytes = Vec::new();
    if reader.read_until(b'\n', &mut bytes)? == 0 {
        return Ok(None);
    }
    let ending: &'static [u8] = if bytes.ends_with(b"\r\n") {
        b"\r\n"
    } else if bytes.ends_with(b"\n") {
        b"\n"
    } else {
        b""
    };
    bytes.truncate(bytes.len() - ending.len());
    Ok(Some(PhysicalLine { bytes, ending }))
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use retarget_core::{ContainerId, SCRIPT_LOCAL_ID};
    use std::path::PathBuf;

    const OLD: &str = "83d9acc7968244a8886f3af591305bcb";
    const NEW: &str = "f4a5b6c7d8e9f0a1b2c3d4e5f6a7b8c9";

    fn table() -> RemapTable {
        let mut t = RemapTable::new();
        t.insert(
            ContainerId::from(OLD),
            RemapTarget {
                container_id: ContainerId::from(NEW),
                local_id: 99,
            },
        )
        .unwrap();
        t
    }

    fn run(input: &str, remap: &RemapTable) -> Result<(String, RewriteOutcome)> {
        let path = PathBuf::from("Test.prefab");
        let mut out = Vec::new();
        let outcome = DocumentRewriter::new(&path, remap).rewrite(input.as_bytes(), &mut out)?;
        Ok((String::from_utf8(out).unwrap(), outcome))
    }

    #[test]
    fn sentinel_matches_script_local_id() {
        assert_eq!(SCRIPT_SENTINEL, SCRIPT_LOCAL_ID.to_string());
    }

    #[test]
    fn rewrites_single_line_record() {
        let input = format!(
            "%YAML 1.1\n--- !u!114 &1\nMonoBehaviour:\n    m_Script: {{fileID: 11500000, guid: {}, type: 3}}\n  m_Name: x\n",
            OLD
        );
        let (out, outcome) = run(&input, &table()).unwrap();
        let expected = format!(
            "%YAML 1.1\n--- !u!114 &1\nMonoBehaviour:\n  m_Script: {{fileID: 99, guid: {}, type: 3}}\n  m_Name: x\n",
            NEW
        );
        assert_eq!(out, expected);
        assert_eq!(outcome.references_rewritten, 1);
        assert_eq!(outcome.lines, 5);
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn rewrites_record_split_over_two_lines() {
        let input = format!(
            "a: 1\n  m_Script: {{fileID: 11500000, guid: {},\n    type: 3}}\nb: 2\n",
            OLD
        );
        let (out, outcome) = run(&input, &table()).unwrap();
        assert_eq!(
            out,
            format!("a: 1\n  m_Script: {{fileID: 99, guid: {}, type: 3}}\nb: 2\n", NEW)
        );
        assert_eq!(outcome.references_rewritten, 1);
    }

    #[test]
    fn unmapped_record_is_left_byte_identical() {
        let input = "x\n  m_Script: {fileID: 11500000, guid: 0000000000000000000000000000abcd, type: 3}\r\ny";
        let (out, outcome) = run(input, &table()).unwrap();
        assert_eq!(out, input);
        assert_eq!(outcome.references_rewritten, 0);
        assert_eq!(
            outcome.diagnostics,
            vec![Diagnostic::MissingRemap {
                path: PathBuf::from("Test.prefab"),
                line: 2,
                container_id: ContainerId::from("0000000000000000000000000000abcd"),
            }]
        );
    }

    #[test]
    fn unmapped_split_record_keeps_both_lines() {
        let input = "  m_Script: {fileID: 11500000, guid: abcd,\n    type: 3}\n";
        let (out, outcome) = run(input, &table()).unwrap();
        assert_eq!(out, input);
        assert_eq!(outcome.diagnostics.len(), 1);
    }

    #[test]
    fn marker_without_sentinel_is_untouched() {
        let input = format!("  m_Script: {{fileID: 0}}\n  m_Script: {{fileID: 42, guid: {}, type: 2}}\n", OLD);
        let (out, outcome) = run(&input, &table()).unwrap();
        assert_eq!(out, input);
        assert_eq!(outcome.references_rewritten, 0);
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn crlf_terminator_is_preserved_on_rewrite() {
        let input = format!("  m_Script: {{fileID: 11500000, guid: {}, type: 3}}\r\n", OLD);
        let (out, _) = run(&input, &table()).unwrap();
        assert_eq!(out, format!("  m_Script: {{fileID: 99, guid: {}, type: 3}}\r\n", NEW));
    }

    #[test]
    fn record_over_three_lines_fails() {
        let input = "  m_Script: {fileID: 11500000,\n    guid: abcd,\n    type: 3}\n";
        let err = run(input, &table()).unwrap_err();
        match err {
            Error::Parse(ParseError::UnterminatedRecord { line, text, .. }) => {
                assert_eq!(line, 1);
                assert!(text.contains("guid: abcd"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn record_cut_off_at_end_of_file_fails() {
        let input = "a: 1\n  m_Script: {fileID: 11500000,";
        let err = run(input, &table()).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::UnterminatedRecord { line: 2, .. })
        ));
    }

    #[test]
    fn sentinel_without_marker_fails() {
        let input = "a: 1\n  m_Other: {fileID: 11500000, guid: abcd, type: 3}\n";
        let err = run(input, &table()).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::SentinelWithoutMarker { line: 2, .. })
        ));
    }

    #[test]
    fn script_record_without_guid_fails() {
        let input = "  m_Script: {fileID: 11500000, type: 3}\n";
        let err = run(input, &table()).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::MissingIdentifier { line: 1, .. })
        ));
    }

    #[test]
    fn rewriting_twice_is_stable() {
        let input = format!("  m_Script: {{fileID: 11500000, guid: {}, type: 3}}\nz\n", OLD);
        let (first, _) = run(&input, &table()).unwrap();
        let (again, _) = run(&input, &table()).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn non_utf8_lines_pass_through_unchanged() {
        let path = PathBuf::from("Latin1.asset");
        let mut input = b"%YAML 1.1\n  m_Name: caf\xE9\r\n".to_vec();
        input.extend_from_slice(
            format!("  m_Script: {{fileID: 11500000, guid: {}, type: 3}}\n", OLD).as_bytes(),
        );
        input.extend_from_slice(b"  m_Tag: \xFF\xFE\n");

        let mut out = Vec::new();
        let outcome = DocumentRewriter::new(&path, &table())
            .rewrite(input.as_slice(), &mut out)
            .unwrap();

        let mut expected = b"%YAML 1.1\n  m_Name: caf\xE9\r\n".to_vec();
        expected.extend_from_slice(
            format!("  m_Script: {{fileID: 99, guid: {}, type: 3}}\n", NEW).as_bytes(),
        );
        expected.extend_from_slice(b"  m_Tag: \xFF\xFE\n");
        assert_eq!(outcome.references_rewritten, 1);
        assert_eq!(out, expected);
    }

    #[test]
    fn unmapped_record_with_non_utf8_byte_is_kept_verbatim() {
        let path = PathBuf::from("Latin1.asset");
        let input = b"  m_Script: {fileID: 11500000, guid: 0000, type: 3} # \xE9\n".to_vec();
        let mut out = Vec::new();
        let outcome = DocumentRewriter::new(&path, &table())
            .rewrite(input.as_slice(), &mut out)
            .unwrap();
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(out, input);
    }

    #[test]
    fn rewrite_file_writes_target() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = dir.path().join("A.prefab");
        let target = dir.path().join("B.prefab");
        std::fs::write(
            &source,
            format!("%YAML 1.1\n  m_Script: {{fileID: 11500000, guid: {}, type: 3}}\n", OLD),
        )
        .unwrap();

        let remap = table();
        let outcome = DocumentRewriter::new(&source, &remap)
            .rewrite_file(&target)
            .unwrap();
        assert_eq!(outcome.references_rewritten, 1);
        assert_eq!(
            std::fs::read_to_string(&target).unwrap(),
            format!("%YAML 1.1\n  m_Script: {{fileID: 99, guid: {}, type: 3}}\n", NEW)
        );
    }
}
