//! The CI report record carried in each note.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CiNotesError, Result};

/// The git-notes ref that is expected to contain CI reports.
pub const NOTES_REF: &str = "refs/notes/devtools/ci";

/// Status string for a build and/or test that passed.
pub const STATUS_SUCCESS: &str = "success";

/// Status string for a build and/or test that failed.
pub const STATUS_FAILURE: &str = "failure";

/// Latest version of the report format understood by this crate.
pub const FORMAT_VERSION: i64 = 0;

/// A build/test status report written by a continuous integration tool.
///
/// Every field is optional. Missing (or `null`) fields take the zero value,
/// and zero values are left out when the report is serialized again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Integer timestamp encoded as a string (seconds since the epoch).
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub timestamp: String,

    /// Link to build logs or other details.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub url: String,

    /// One of [`STATUS_SUCCESS`], [`STATUS_FAILURE`] or empty when recognized.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub status: String,

    /// Free-form identifier of the CI tool that wrote the report.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub agent: String,

    /// Version of the metadata format.
    #[serde(
        rename = "v",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "is_zero"
    )]
    pub version: i64,
}

impl Report {
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = agent.into();
        self
    }

    pub fn with_version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }

    /// Typed view of `status`; `None` when the string is outside the vocabulary.
    pub fn status(&self) -> Option<ReportStatus> {
        ReportStatus::recognize(&self.status)
    }

    /// Whether this report is one the bulk parser keeps: current format
    /// version and a recognized status.
    pub fn is_recognized(&self) -> bool {
        self.version == FORMAT_VERSION && self.status().is_some()
    }

    /// Parse `timestamp` as a signed integer.
    ///
    /// An empty timestamp is an error, same as any other non-numeric value.
    pub fn timestamp_secs(&self) -> Result<i64> {
        self.timestamp
            .parse::<i64>()
            .map_err(|source| CiNotesError::InvalidTimestamp {
                timestamp: self.timestamp.clone(),
                source,
            })
    }

    /// The timestamp as a UTC instant, when it parses and is in range.
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        let secs = self.timestamp_secs().ok()?;
        DateTime::from_timestamp(secs, 0)
    }
}

/// The closed status vocabulary of a recognized report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Empty status: the tool reported without a verdict.
    #[serde(rename = "")]
    Unknown,
    Success,
    Failure,
}

impl ReportStatus {
    /// Map a raw status string onto the vocabulary.
    pub fn recognize(status: &str) -> Option<Self> {
        match status {
            "" => Some(ReportStatus::Unknown),
            STATUS_SUCCESS => Some(ReportStatus::Success),
            STATUS_FAILURE => Some(ReportStatus::Failure),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Unknown => "",
            ReportStatus::Success => STATUS_SUCCESS,
            ReportStatus::Failure => STATUS_FAILURE,
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn is_zero(version: &i64) -> bool {
    *version == 0
}
