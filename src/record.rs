//! # Personalization Records
//!
//! The immutable unit attached to one cart line once lines are accepted.
//!
//! Each record carries a uniqueness token: an XXH3-128 digest over the
//! record's content, the creation timestamp and a random nonce. Two
//! submissions with identical text therefore never share a token, and a cart
//! that merges lines by product and options cannot coalesce them.
//!
//! A record is never edited. A changed engraving is a new record on a new
//! cart line.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use xxhash_rust::xxh3::Xxh3;

use crate::error::Rejection;
use crate::rules::SessionFlags;
use crate::validate::{LineValue, validate_lines};

/// Horizontal placement of the engraving on the paver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Center,
    Left,
    Right,
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Alignment::Center => "Center",
            Alignment::Left => "Left",
            Alignment::Right => "Right",
        })
    }
}

/// A stored graphic as returned by the attachment store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphicRef {
    pub id: String,
    pub url: String,
}

/// Accepted personalization for one cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalizationRecord {
    product: String,
    lines: Vec<LineValue>,
    cross_selected: bool,
    effective_columns: usize,
    alignment: Alignment,
    graphic: Option<GraphicRef>,
    created_at: DateTime<Utc>,
    token: String,
}

impl PersonalizationRecord {
    #[inline]
    pub fn product(&self) -> &str {
        &self.product
    }

    #[inline]
    pub fn lines(&self) -> &[LineValue] {
        &self.lines
    }

    #[inline]
    pub fn cross_selected(&self) -> bool {
        self.cross_selected
    }

    /// Column count in force when the lines were accepted.
    #[inline]
    pub fn effective_columns(&self) -> usize {
        self.effective_columns
    }

    #[inline]
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    #[inline]
    pub fn graphic(&self) -> Option<&GraphicRef> {
        self.graphic.as_ref()
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Opaque value that keeps this record on its own cart line.
    #[inline]
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Build a record from accepted lines.
///
/// The lines are validated again against `effective_columns`; anything that
/// would not be accepted is refused with the same rejection the validator
/// gives. A graphic is recorded only when a reference is supplied, whatever
/// `flags.graphic_attached` says.
pub fn build_record(
    product: &str,
    lines: &[LineValue],
    flags: SessionFlags,
    effective_columns: usize,
    graphic: Option<GraphicRef>,
    alignment: Alignment,
) -> Result<PersonalizationRecord, Rejection> {
    if lines.is_empty() {
        return Err(Rejection::EmptyLine(1));
    }
    let lines = validate_lines(lines.len(), effective_columns, lines)?;

    let mut record = PersonalizationRecord {
        product: product.to_string(),
        lines,
        cross_selected: flags.cross_selected,
        effective_columns,
        alignment,
        graphic,
        created_at: Utc::now(),
        token: String::new(),
    };
    record.token = uniqueness_token(&record);
    Ok(record)
}

/// Digest over the record content, its timestamp and a fresh nonce.
fn uniqueness_token(record: &PersonalizationRecord) -> String {
    let mut hasher = Xxh3::new();
    hasher.update(record.product.as_bytes());
    for line in &record.lines {
        hasher.update(b"\0");
        hasher.update(line.as_str().as_bytes());
    }
    hasher.update(&[0, record.cross_selected as u8, record.alignment as u8]);
    hasher.update(&(record.effective_columns as u64).to_le_bytes());
    if let Some(graphic) = &record.graphic {
        hasher.update(graphic.id.as_bytes());
        hasher.update(b"\0");
        hasher.update(graphic.url.as_bytes());
    }
    hasher.update(&record.created_at.timestamp_micros().to_le_bytes());
    hasher.update(Uuid::new_v4().as_bytes());
    format!("{:032x}", hasher.digest128())
}
