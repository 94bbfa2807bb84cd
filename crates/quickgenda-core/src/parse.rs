//! CSV → session model.
//!
//! Turns loosely structured delimited text into a sequence of [`Session`]s
//! with nested [`Topic`]s.
//!
//! # Algorithm
//!
//! 1. Strip a leading BOM and normalize `\r\n` / `\r` to `\n`.
//! 2. Skip leading blank lines; the first remaining line is the header.
//! 3. Pick the delimiter from the header line: comma unless semicolons
//!    strictly outnumber commas. The choice holds for the whole file.
//! 4. Tokenize with RFC 4180 quoting and match trimmed header cells
//!    exactly against the [`Field`] vocabulary.
//! 5. Group consecutive rows with an equal `Session Title` into one
//!    session. Later rows backfill empty session fields (first non-empty
//!    wins). A topic is appended only if one of its fields has content.
//!
//! # Example
//!
//! ```rust
//! use quickgenda_core::parse::parse_sessions;
//!
//! let csv = "Session Title,Time,Topic Title,Speaker\n\
//!            Keynote,09:00,Welcome,Alice\n\
//!            Keynote,09:30,Intro,Bob\n\
//!            Workshop,10:00,Hands-on,Carol";
//! let parsed = parse_sessions(csv).unwrap();
//! assert_eq!(parsed.sessions.len(), 2);
//! assert_eq!(parsed.sessions[0].topics.len(), 2);
//! ```

use csv::{ReaderBuilder, StringRecord};

use crate::error::ParseError;
use crate::models::{AvailableFields, Field, Session, Topic};

/// Field separator detected from the header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Semicolon,
}

impl Delimiter {
    /// Comma unless semicolons strictly outnumber commas.
    pub fn detect(header_line: &str) -> Self {
        let commas = header_line.matches(',').count();
        let semicolons = header_line.matches(';').count();
        if commas >= semicolons {
            Delimiter::Comma
        } else {
            Delimiter::Semicolon
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
        }
    }
}

impl std::fmt::Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Delimiter::Comma => f.write_str("comma"),
            Delimiter::Semicolon => f.write_str("semicolon"),
        }
    }
}

/// Output of [`parse_sessions`].
#[derive(Debug, Clone)]
pub struct ParsedCsv {
    pub sessions: Vec<Session>,
    pub available_fields: AvailableFields,
    pub delimiter: Delimiter,
    /// Trimmed header cells as they appeared in the file.
    pub headers: Vec<String>,
}

/// Parse raw CSV text into sessions.
///
/// A file with only a header row parses successfully with zero sessions;
/// callers decide whether that is terminal.
pub fn parse_sessions(raw: &str) -> Result<ParsedCsv, ParseError> {
    let text = normalize(raw);

    let body = skip_leading_blank_lines(&text).ok_or(ParseError::EmptyInput)?;
    let header_line = body.split('\n').next().unwrap_or_default();
    let delimiter = Delimiter::detect(header_line);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(|h| h.trim().to_string()).collect(),
        None => return Err(ParseError::EmptyInput),
    };

    let mut available = AvailableFields::default();
    for field in Field::ALL {
        if let Some(pos) = headers.iter().position(|h| h == field.header()) {
            available.set(field, pos);
        }
    }

    if !available.is_present(Field::SessionTitle) {
        return Err(ParseError::MissingRequiredColumn { delimiter, headers });
    }

    let mut sessions: Vec<Session> = Vec::new();
    let mut last_title: Option<String> = None;

    for record in records {
        let record = record?;
        if is_blank(&record) {
            continue;
        }

        let row = Row::new(&record, headers.len(), &available);
        let title = row.get(Field::SessionTitle);

        let starts_new = match &last_title {
            Some(prev) => *prev != title,
            None => true,
        };

        if starts_new {
            sessions.push(Session {
                title: title.clone(),
                time: row.get(Field::SessionTime),
                no: row.get(Field::SessionNo),
                chairs: row.get(Field::Chairpersons),
                topics: Vec::new(),
            });
            last_title = Some(title);
        } else if let Some(current) = sessions.last_mut() {
            backfill(&mut current.time, row.get(Field::SessionTime));
            backfill(&mut current.no, row.get(Field::SessionNo));
            backfill(&mut current.chairs, row.get(Field::Chairpersons));
        }

        let topic = Topic {
            time: row.get(Field::Time),
            title: row.get(Field::TopicTitle),
            speaker: row.get(Field::Speaker),
        };
        if !topic.is_empty() {
            if let Some(current) = sessions.last_mut() {
                current.topics.push(topic);
            }
        }
    }

    Ok(ParsedCsv {
        sessions,
        available_fields: available,
        delimiter,
        headers,
    })
}

fn normalize(raw: &str) -> String {
    let stripped = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    stripped.replace("\r\n", "\n").replace('\r', "\n")
}

fn skip_leading_blank_lines(text: &str) -> Option<&str> {
    let mut offset = 0;
    for line in text.split('\n') {
        if !line.trim().is_empty() {
            return Some(&text[offset..]);
        }
        offset += line.len() + 1;
    }
    None
}

/// Whitespace-only lines come through the tokenizer as a single blank field.
fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|f| f.trim().is_empty()) && record.len() <= 1
}

fn backfill(slot: &mut String, candidate: String) {
    if slot.is_empty() && !candidate.is_empty() {
        *slot = candidate;
    }
}

/// A data row padded to the header width.
struct Row<'a> {
    cells: Vec<&'a str>,
    available: &'a AvailableFields,
}

impl<'a> Row<'a> {
    fn new(record: &'a StringRecord, width: usize, available: &'a AvailableFields) -> Self {
        let mut cells: Vec<&str> = record.iter().collect();
        while cells.len() < width {
            cells.push("");
        }
        Self { cells, available }
    }

    fn get(&self, field: Field) -> String {
        self.available
            .column(field)
            .and_then(|i| self.cells.get(i))
            .map(|c| c.trim().to_string())
            .unwrap_or_default()
    }
}
