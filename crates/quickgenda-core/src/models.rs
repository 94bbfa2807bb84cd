//! Core data models: sessions, topics, and the detected CSV columns.
//!
//! A [`Session`] is produced once per run of equal consecutive
//! `Session Title` values and is read-only afterwards.

use serde::{Deserialize, Serialize};

/// One agenda entry; the unit of page generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub title: String,
    pub time: String,
    pub no: String,
    /// Raw chairperson string, `||`-joined.
    pub chairs: String,
    pub topics: Vec<Topic>,
}

/// A talk within a session, in CSV row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub time: String,
    pub title: String,
    pub speaker: String,
}

impl Topic {
    /// A topic is only worth keeping if at least one field has content.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty() && self.title.is_empty() && self.speaker.is_empty()
    }
}

/// The fixed column vocabulary recognised in the CSV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    SessionTitle,
    SessionTime,
    SessionNo,
    Chairpersons,
    Time,
    TopicTitle,
    Speaker,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::SessionTitle,
        Field::SessionTime,
        Field::SessionNo,
        Field::Chairpersons,
        Field::Time,
        Field::TopicTitle,
        Field::Speaker,
    ];

    /// Exact header text, matched case-sensitively.
    pub fn header(self) -> &'static str {
        match self {
            Field::SessionTitle => "Session Title",
            Field::SessionTime => "Session Time",
            Field::SessionNo => "Session No",
            Field::Chairpersons => "Chairpersons",
            Field::Time => "Time",
            Field::TopicTitle => "Topic Title",
            Field::Speaker => "Speaker",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Column positions for the fields present in the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailableFields {
    columns: [Option<usize>; 7],
}

impl AvailableFields {
    pub(crate) fn set(&mut self, field: Field, column: usize) {
        self.columns[field.index()] = Some(column);
    }

    pub fn is_present(&self, field: Field) -> bool {
        self.columns[field.index()].is_some()
    }

    /// Column index of `field` in the header row, if present.
    pub fn column(&self, field: Field) -> Option<usize> {
        self.columns[field.index()]
    }

    /// Header names of present fields, in vocabulary order.
    pub fn present(&self) -> Vec<&'static str> {
        Field::ALL
            .iter()
            .filter(|f| self.is_present(**f))
            .map(|f| f.header())
            .collect()
    }

    /// Name → presence map in vocabulary order.
    pub fn to_map(&self) -> Vec<(&'static str, bool)> {
        Field::ALL
            .iter()
            .map(|f| (f.header(), self.is_present(*f)))
            .collect()
    }
}

impl Serialize for AvailableFields {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(Field::ALL.len()))?;
        for (name, present) in self.to_map() {
            map.serialize_entry(name, &present)?;
        }
        map.end()
    }
}
