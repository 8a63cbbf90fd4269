//! Shared types used across the Dirsweep workspace.
//!
//! This module defines the newtypes and enums that every crawl component
//! speaks: queries, target identifiers, records, error kinds and audit entries.

use crate::error::SweepError;
use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::OnceLock;

/// Letters appended to a truncated query to build its refinements.
pub const ALPHABET: [char; 26] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// A search string submitted to a directory.
///
/// Queries are immutable; refinements are new values built with [`Query::child`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Query(String);

impl Query {
    /// Create a new `Query`.
    ///
    /// # Errors
    /// Returns error if the query is empty or contains whitespace.
    pub fn new(query: impl Into<String>) -> Result<Self, SweepError> {
        let query = query.into();
        Self::validate(&query)?;
        Ok(Self(query))
    }

    /// Build the refinement of this query by one letter.
    #[must_use]
    pub fn child(&self, letter: char) -> Self {
        let mut inner = String::with_capacity(self.0.len() + 1);
        inner.push_str(&self.0);
        inner.push(letter);
        Self(inner)
    }

    /// All refinements of this query, in alphabet order.
    #[must_use]
    pub fn children(&self) -> Vec<Self> {
        ALPHABET.iter().map(|&letter| self.child(letter)).collect()
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters in the query.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    /// Always false for a validated query.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn validate(query: &str) -> Result<(), SweepError> {
        if query.is_empty() {
            return Err(SweepError::Validation(
                "invalid query: must not be empty".to_string(),
            ));
        }
        if query.chars().any(char::is_whitespace) {
            return Err(SweepError::Validation(format!(
                "invalid query: must not contain whitespace, got '{query}'"
            )));
        }
        Ok(())
    }
}

impl TryFrom<String> for Query {
    type Error = SweepError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Query> for String {
    fn from(query: Query) -> Self {
        query.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Newtype for target directory identifiers with validation.
///
/// Target IDs must be lowercase alphanumeric with hyphens, 3-50 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetId(String);

impl TargetId {
    /// Create a new `TargetId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID doesn't match the required format.
    pub fn new(id: impl Into<String>) -> Result<Self, SweepError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(id: &str) -> Result<(), SweepError> {
        static TARGET_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = TARGET_REGEX
            .get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9-]{1,48}[a-z0-9]$").expect("valid regex"));

        if id.len() < 3 || id.len() > 50 {
            return Err(SweepError::Validation(format!(
                "invalid target ID: must be 3-50 characters, got {} characters",
                id.len()
            )));
        }

        if regex.is_match(id) {
            Ok(())
        } else {
            Err(SweepError::Validation(format!(
                "invalid target ID: must be lowercase alphanumeric with hyphens, got '{id}'"
            )))
        }
    }
}

impl TryFrom<String> for TargetId {
    type Error = SweepError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TargetId> for String {
    fn from(id: TargetId) -> Self {
        id.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One discovered directory entry.
///
/// Attributes differ per target, so a record is a JSON object. Every target
/// promises one stable field (usually `email`) that identifies the person.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a record from any value that serializes to a JSON object.
    ///
    /// # Errors
    /// Returns error if the value cannot be serialized or is not an object.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, SweepError> {
        match serde_json::to_value(value)
            .map_err(|e| SweepError::Serialization(e.to_string()))?
        {
            Value::Object(map) => Ok(Self(map)),
            other => Err(SweepError::Validation(format!(
                "record must be a JSON object, got {other}"
            ))),
        }
    }

    /// Set a field, returning the record for chaining.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Look up a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// The string value of the identifying field, if present.
    #[must_use]
    pub fn key(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Borrow the underlying JSON object.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Classification of a failed query attempt.
///
/// The serialized names are the strings written to the request log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The directory refused to list everything; refine the query.
    #[serde(rename = "too many")]
    TooMany,
    /// The query matched nothing.
    #[serde(rename = "empty")]
    Empty,
    /// Discovered records could not be persisted.
    #[serde(rename = "res saving error", alias = "res_log saving error")]
    SinkFailure,
    /// Anything the source could not classify.
    #[serde(rename = "unknown")]
    Unknown,
}

impl ErrorKind {
    /// Wire name used in the request log.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TooMany => "too many",
            Self::Empty => "empty",
            Self::SinkFailure => "res saving error",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status half of an [`AuditEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AuditStatus {
    /// The query returned records.
    Ok {
        /// Number of records returned
        #[serde(rename = "resultLength")]
        result_length: usize,
    },
    /// The query failed or was truncated.
    Error {
        /// Failure classification
        #[serde(rename = "type")]
        kind: ErrorKind,
    },
}

/// One line of the request log: a single query attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// The query string that was issued
    pub request: String,
    /// What happened
    #[serde(flatten)]
    pub status: AuditStatus,
    /// When the entry was recorded
    pub timestamp: Timestamp,
}

impl AuditEntry {
    /// Entry for a query that returned `count` records.
    #[must_use]
    pub fn ok(query: &Query, count: usize) -> Self {
        Self {
            request: query.as_str().to_string(),
            status: AuditStatus::Ok {
                result_length: count,
            },
            timestamp: Timestamp::now(),
        }
    }

    /// Entry for a query that failed with `kind`.
    #[must_use]
    pub fn error(query: &Query, kind: ErrorKind) -> Self {
        Self {
            request: query.as_str().to_string(),
            status: AuditStatus::Error { kind },
            timestamp: Timestamp::now(),
        }
    }

    /// Replace the timestamp with the current moment.
    #[must_use]
    pub fn stamped(mut self) -> Self {
        self.timestamp = Timestamp::now();
        self
    }
}

/// Wrapper around `chrono::DateTime<Utc>` for consistent timestamp handling.
///
/// Serializes as RFC3339 with millisecond precision and a `Z` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp representing the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Parse a timestamp from an RFC3339 string.
    pub fn from_rfc3339(s: &str) -> Result<Self, SweepError> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| SweepError::Validation(format!("invalid timestamp: {e}")))
    }

    /// Format as RFC3339 string.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_rfc3339(&raw).map_err(serde::de::Error::custom)
    }
}
