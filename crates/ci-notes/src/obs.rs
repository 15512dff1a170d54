//! Structured observability hooks for note parsing and report selection.
//!
//! Everything here is emitted at `debug!` level: dropping notes is normal
//! for a mixed notes ref, so it is never worth a warning. Enable with
//! `RUST_LOG=ci_notes=debug`.

use tracing::debug;

/// Why the bulk parser left a note out of its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Not JSON of the report shape.
    Malformed,
    /// Parsed, but written for another format version.
    VersionMismatch,
    /// Parsed, but the status is outside the vocabulary.
    UnrecognizedStatus,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::Malformed => "malformed",
            DropReason::VersionMismatch => "version_mismatch",
            DropReason::UnrecognizedStatus => "unrecognized_status",
        }
    }
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emit event: a note was dropped by the bulk parser.
///
/// # Example
///
/// ```ignore
/// emit_note_dropped(3, DropReason::VersionMismatch);
/// // logs: event=notes.dropped index=3 reason=version_mismatch
/// ```
pub fn emit_note_dropped(index: usize, reason: DropReason) {
    debug!(event = "notes.dropped", index = index, reason = %reason);
}

/// Emit event: bulk parse finished.
pub fn emit_notes_parsed(kept: usize, dropped: usize) {
    debug!(event = "notes.parsed", kept = kept, dropped = dropped);
}

/// Emit event: a report was skipped by the selector for an unparsable timestamp.
pub fn emit_timestamp_skipped(index: usize, timestamp: &str) {
    debug!(event = "latest.timestamp_skipped", index = index, timestamp = %timestamp);
}

/// Emit event: the selector picked a report.
pub fn emit_latest_selected(candidates: usize, timestamp: i64) {
    debug!(
        event = "latest.selected",
        candidates = candidates,
        timestamp = timestamp,
    );
}
