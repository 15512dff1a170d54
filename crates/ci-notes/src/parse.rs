//! Parsing CI reports out of git notes.

use serde_json::{Map, Value};

use crate::error::Result;
use crate::obs::{self, DropReason};
use crate::report::{Report, FORMAT_VERSION};

/// An opaque git note blob, as read from a notes ref.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Note(pub Vec<u8>);

impl AsRef<[u8]> for Note {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Note {
    fn from(bytes: Vec<u8>) -> Self {
        Note(bytes)
    }
}

impl From<String> for Note {
    fn from(text: String) -> Self {
        Note(text.into_bytes())
    }
}

impl From<&str> for Note {
    fn from(text: &str) -> Self {
        Note(text.as_bytes().to_vec())
    }
}

/// Parse a CI report from a git note.
///
/// The note must be a JSON object. Arrays, scalars and `null` are rejected,
/// and a repeated key keeps its last value. Only the JSON shape is checked
/// here; the status vocabulary and format version are left to
/// [`parse_all_valid`].
pub fn parse(note: impl AsRef<[u8]>) -> Result<Report> {
    let fields: Map<String, Value> = serde_json::from_slice(note.as_ref())?;
    let report = serde_json::from_value(Value::Object(fields))?;
    Ok(report)
}

/// Parse every note that holds a recognized CI report.
///
/// A notes ref is expected to be a heterogeneous list with only some
/// entries being CI reports, so anything that fails to parse, carries a
/// different format version, or uses an unknown status is skipped rather
/// than reported. Input order is preserved.
pub fn parse_all_valid<I>(notes: I) -> Vec<Report>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let mut reports = Vec::new();
    let mut dropped = 0;

    for (index, note) in notes.into_iter().enumerate() {
        let report = match parse(note) {
            Ok(report) => report,
            Err(_) => {
                obs::emit_note_dropped(index, DropReason::Malformed);
                dropped += 1;
                continue;
            }
        };

        if report.version != FORMAT_VERSION {
            obs::emit_note_dropped(index, DropReason::VersionMismatch);
            dropped += 1;
        } else if report.status().is_none() {
            obs::emit_note_dropped(index, DropReason::UnrecognizedStatus);
            dropped += 1;
        } else {
            reports.push(report);
        }
    }

    obs::emit_notes_parsed(reports.len(), dropped);
    reports
}
