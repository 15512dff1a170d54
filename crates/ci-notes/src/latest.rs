//! Selecting the most recent CI report.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::obs;
use crate::parse::parse_all_valid;
use crate::report::Report;

/// Which report wins when several share the greatest timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// The one appearing earliest in the input.
    FirstSeen,
    /// The one appearing latest in the input.
    #[default]
    LastSeen,
}

/// What to do with a report whose timestamp is not an integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampPolicy {
    /// Fail the whole selection.
    #[default]
    Reject,
    /// Leave the report out of the selection.
    Skip,
}

/// Options for [`latest_report_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectOptions {
    pub tie_break: TieBreak,
    pub invalid_timestamps: TimestampPolicy,
}

/// Return the report with the most recent timestamp.
///
/// Returns `Ok(None)` for an empty slice. Every report must carry an integer
/// timestamp: a single bad one fails the call with
/// [`CiNotesError::InvalidTimestamp`](crate::CiNotesError::InvalidTimestamp).
/// On a tie the report appearing last wins.
pub fn latest_report(reports: &[Report]) -> Result<Option<&Report>> {
    latest_report_with(reports, &SelectOptions::default())
}

/// [`latest_report`] with an explicit tie-break and timestamp policy.
pub fn latest_report_with<'a>(
    reports: &'a [Report],
    options: &SelectOptions,
) -> Result<Option<&'a Report>> {
    let mut best: Option<(i64, &Report)> = None;
    let mut candidates = 0;

    for (index, report) in reports.iter().enumerate() {
        let timestamp = match report.timestamp_secs() {
            Ok(timestamp) => timestamp,
            Err(err) => match options.invalid_timestamps {
                TimestampPolicy::Reject => return Err(err),
                TimestampPolicy::Skip => {
                    obs::emit_timestamp_skipped(index, &report.timestamp);
                    continue;
                }
            },
        };
        candidates += 1;

        let replace = match best {
            None => true,
            Some((current, _)) => match options.tie_break {
                TieBreak::FirstSeen => timestamp > current,
                TieBreak::LastSeen => timestamp >= current,
            },
        };
        if replace {
            best = Some((timestamp, report));
        }
    }

    if let Some((timestamp, _)) = best {
        obs::emit_latest_selected(candidates, timestamp);
    }
    Ok(best.map(|(_, report)| report))
}

/// Parse the recognized reports out of `notes` and return the latest one.
pub fn latest_from_notes<I>(notes: I) -> Result<Option<Report>>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let reports = parse_all_valid(notes);
    Ok(latest_report(&reports)?.cloned())
}
