//! Artwork rows and their identifiers

use std::borrow::Borrow;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Sentinel for missing text columns.
pub const UNKNOWN: &str = "Unknown";

/// Sentinel for missing inscriptions.
pub const NO_INSCRIPTIONS: &str = "None";

/// Stable, globally unique row identifier.
///
/// The remote API hands out numeric ids; they are kept in their decimal
/// string form so that selections do not depend on the id's wire type.
/// Both JSON strings and JSON integers deserialize into a `RowId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "WireId", into = "String")]
pub struct RowId(String);

impl RowId {
    /// Creates a new row id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RowId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RowId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RowId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for RowId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<RowId> for String {
    fn from(id: RowId) -> Self {
        id.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Number(u64),
    Text(String),
}

impl From<WireId> for RowId {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Number(n) => Self::from(n),
            WireId::Text(s) => Self(s),
        }
    }
}

/// A single artwork row.
///
/// Only `id` carries identity; the remaining columns are for display and
/// fall back to [`UNKNOWN`], [`NO_INSCRIPTIONS`] or `0` when the source
/// leaves them out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub id: RowId,
    pub title: String,
    pub place_of_origin: String,
    pub artist_display: String,
    pub inscriptions: String,
    pub date_start: i64,
    pub date_end: i64,
}

impl Row {
    /// Creates a row with the given id and title; other columns take their sentinels.
    pub fn new(id: impl Into<RowId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            place_of_origin: UNKNOWN.to_string(),
            artist_display: UNKNOWN.to_string(),
            inscriptions: NO_INSCRIPTIONS.to_string(),
            date_start: 0,
            date_end: 0,
        }
    }

    /// Sets the artist column.
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist_display = artist.into();
        self
    }

    /// Sets the place of origin column.
    pub fn with_origin(mut self, place: impl Into<String>) -> Self {
        self.place_of_origin = place.into();
        self
    }

    /// Sets the inscriptions column.
    pub fn with_inscriptions(mut self, inscriptions: impl Into<String>) -> Self {
        self.inscriptions = inscriptions.into();
        self
    }

    /// Sets the start and end years.
    pub fn with_dates(mut self, start: i64, end: i64) -> Self {
        self.date_start = start;
        self.date_end = end;
        self
    }
}

/// Row as it arrives from the remote API, with every column optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRow {
    #[serde(default)]
    pub id: Option<RowId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub place_of_origin: Option<String>,
    #[serde(default)]
    pub artist_display: Option<String>,
    #[serde(default)]
    pub inscriptions: Option<String>,
    #[serde(default)]
    pub date_start: Option<i64>,
    #[serde(default)]
    pub date_end: Option<i64>,
}

impl RawRow {
    /// Normalizes the raw record into a [`Row`].
    ///
    /// Returns `None` when the record has no usable id.
    pub fn into_row(self) -> Option<Row> {
        let id = self.id.filter(|id| !id.as_str().is_empty())?;
        Some(Row {
            id,
            title: or_sentinel(self.title, UNKNOWN),
            place_of_origin: or_sentinel(self.place_of_origin, UNKNOWN),
            artist_display: or_sentinel(self.artist_display, UNKNOWN),
            inscriptions: or_sentinel(self.inscriptions, NO_INSCRIPTIONS),
            date_start: self.date_start.unwrap_or(0),
            date_end: self.date_end.unwrap_or(0),
        })
    }
}

fn or_sentinel(value: Option<String>, sentinel: &str) -> String {
    match value {
        Some(s) if !s.is_empty() => s,
        _ => sentinel.to_string(),
    }
}
