//! Error types for the QuickGenda core.
//!
//! Fatal conditions ([`ParseError`], [`FillError`]) abort the current unit
//! of work. Degraded conditions are reported as [`FillWarning`]s and
//! collected by the filler instead of being propagated.

use thiserror::Error;

use crate::host::ElementId;
use crate::parse::Delimiter;

/// Failure while turning raw CSV text into sessions.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input contained no non-blank line.
    #[error("CSV input is empty")]
    EmptyInput,

    /// The header row has no `Session Title` column.
    #[error(
        "CSV header error: the file must contain at least a 'Session Title' column. \
         Available headers ({delimiter}-delimited): {}",
        .headers.join(" | ")
    )]
    MissingRequiredColumn {
        delimiter: Delimiter,
        headers: Vec<String>,
    },

    /// The tokenizer rejected a record.
    #[error("malformed CSV record: {0}")]
    Csv(#[from] csv::Error),
}

/// Failure reported by a host document binding.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HostError {
    #[error("element {0} does not exist")]
    UnknownElement(ElementId),

    #[error("element {0} has no text content")]
    NotText(ElementId),

    #[error("element {0} cannot hold a table")]
    NotTableFrame(ElementId),

    #[error("element {0} cannot hold an image")]
    NotImageFrame(ElementId),

    #[error("table cell ({row}, {column}) is out of range")]
    CellOutOfRange { row: usize, column: usize },

    #[error("style '{0}' is not defined")]
    UnknownStyle(String),

    #[error("{0}")]
    Other(String),
}

/// Result alias for host operations.
pub type HostResult<T> = std::result::Result<T, HostError>;

/// Hard failure for one page. The run continues with the next session.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FillError {
    #[error(
        "could not find any labeled placeholders on the page; expected labels: \
         sessionTitle, sessionTime, sessionNo, chairpersons, topicsTable"
    )]
    NoPlaceholdersFound,

    #[error(
        "could not find frames labeled 'topicTime', 'topicTitle', and 'topicSpeaker' \
         for independent topic layout"
    )]
    MissingTopicRowFrames,
}

/// A single degraded step: caught, recorded, and skipped.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{step} on '{label}' skipped: {source}")]
pub struct FillWarning {
    pub label: String,
    pub step: FillStep,
    #[source]
    pub source: HostError,
}

impl FillWarning {
    pub fn new(label: impl Into<String>, step: FillStep, source: HostError) -> Self {
        Self {
            label: label.into(),
            step,
            source,
        }
    }
}

/// Which part of the fill sequence produced a [`FillWarning`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillStep {
    SetText,
    ApplyStyle,
    LineBreaks,
    Layout,
    Table,
    Image,
    ImageFitting,
}

impl std::fmt::Display for FillStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FillStep::SetText => "set text",
            FillStep::ApplyStyle => "apply style",
            FillStep::LineBreaks => "line breaks",
            FillStep::Layout => "layout",
            FillStep::Table => "table",
            FillStep::Image => "image placement",
            FillStep::ImageFitting => "image fitting",
        };
        f.write_str(s)
    }
}
