//! ci-notes - CI status reports stored as git notes
//!
//! CI tools attach a small JSON report to each revision they build, under the
//! [`NOTES_REF`] notes ref. This crate turns those note blobs into typed
//! values and answers "what did CI last say about this revision?":
//! - [`parse`]: one note -> one [`Report`] (fails on malformed JSON)
//! - [`parse_all_valid`]: many notes -> the recognized reports, silently
//!   dropping everything else
//! - [`latest_report`]: the report with the greatest timestamp
//!
//! Fetching notes from a repository is left to the caller; nothing here
//! performs I/O.

pub mod error;
pub mod latest;
pub mod obs;
pub mod parse;
pub mod report;
pub mod telemetry;

pub use error::{CiNotesError, Result};
pub use latest::{
    latest_from_notes, latest_report, latest_report_with, SelectOptions, TieBreak,
    TimestampPolicy,
};
pub use parse::{parse, parse_all_valid, Note};
pub use report::{
    Report, ReportStatus, FORMAT_VERSION, NOTES_REF, STATUS_FAILURE, STATUS_SUCCESS,
};
pub use telemetry::init_tracing;

/// ci-notes crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
