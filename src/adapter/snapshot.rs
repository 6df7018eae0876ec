//! Snapshot parsing at the boundary where external data enters the crate.
//!
//! The backend delivers loosely-typed JSON: ladder levels as `[price, size]`
//! pairs or as objects, numbers as JSON numbers or numeric strings, and
//! field names that vary between feeds. The DTOs here accept those shapes
//! and convert them into validated domain values. Prices always go through
//! [`PriceUnit`] normalization on the way in.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::money::decimal_from_f64;
use crate::domain::{
    Book, BookSnapshot, Detection, PriceLevel, PriceUnit, RaceRecord, RaceResult, TokenId,
};
use crate::error::{Error, Result};

/// A number that may arrive as a JSON number or as a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(serde_json::Number),
    Text(String),
}

impl RawNumber {
    fn text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.trim().to_string(),
        }
    }

    /// Parse as an exact decimal.
    ///
    /// Text that only parses as a float (`NaN`, `inf`, exponents beyond the
    /// decimal range) is reported as a domain error rather than a shape error.
    pub fn to_decimal(&self, field: &'static str) -> Result<Decimal> {
        let text = self.text();
        if let Ok(value) = Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text)) {
            return Ok(value);
        }
        match text.parse::<f64>() {
            Ok(value) => Ok(decimal_from_f64(field, value)?),
            Err(_) => Err(Error::Snapshot(format!("{field}: not a number: {text:?}"))),
        }
    }

    /// Parse as a non-negative integer.
    pub fn to_u64(&self, field: &str) -> Result<u64> {
        let text = self.text();
        text.parse()
            .map_err(|_| Error::Snapshot(format!("{field}: not a counter: {text:?}")))
    }
}

/// One ladder level in any of the shapes feeds use.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawLevel {
    Pair(Vec<RawNumber>),
    Object {
        #[serde(alias = "p")]
        price: RawNumber,
        #[serde(alias = "quantity", alias = "q", alias = "s")]
        size: RawNumber,
    },
}

impl RawLevel {
    fn to_level(&self, unit: PriceUnit) -> Result<PriceLevel> {
        let (price, size) = match self {
            Self::Pair(values) if values.len() >= 2 => (&values[0], &values[1]),
            Self::Pair(values) => {
                return Err(Error::Snapshot(format!(
                    "level needs [price, size], got {} values",
                    values.len()
                )))
            }
            Self::Object { price, size } => (price, size),
        };
        let level = unit.normalize_level(price.to_decimal("price")?, size.to_decimal("size")?)?;
        Ok(level)
    }
}

fn to_ladder(raw: &[RawLevel], unit: PriceUnit) -> Result<Vec<PriceLevel>> {
    raw.iter().map(|level| level.to_level(unit)).collect()
}

/// An order book as delivered by a feed.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BookDto {
    /// Binary market book quoted as YES bids and NO bids.
    Binary {
        #[serde(default)]
        token_id: Option<String>,
        yes: Vec<RawLevel>,
        no: Vec<RawLevel>,
    },
    /// Conventional two-sided book.
    Sided {
        #[serde(default)]
        token_id: Option<String>,
        #[serde(default)]
        bids: Vec<RawLevel>,
        #[serde(default)]
        asks: Vec<RawLevel>,
    },
}

impl BookDto {
    /// Convert into a validated book, prices normalized from `unit`.
    pub fn into_book(self, unit: PriceUnit) -> Result<Book> {
        match self {
            Self::Binary { token_id, yes, no } => {
                let yes_bids = to_ladder(&yes, unit)?;
                let no_bids = to_ladder(&no, unit)?;
                let token = TokenId::new(token_id.unwrap_or_default());
                Ok(Book::from_binary_sides(token, &yes_bids, &no_bids)?)
            }
            Self::Sided {
                token_id,
                bids,
                asks,
            } => Ok(Book::with_levels(
                TokenId::new(token_id.unwrap_or_default()),
                to_ladder(&bids, unit)?,
                to_ladder(&asks, unit)?,
            )),
        }
    }
}

/// A timestamped book, one entry of a price history.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntryDto {
    #[serde(alias = "_timestamp", alias = "timestamp")]
    pub timestamp_ms: i64,
    #[serde(default)]
    pub asks: Vec<RawLevel>,
}

impl HistoryEntryDto {
    pub fn into_snapshot(self, unit: PriceUnit) -> Result<BookSnapshot> {
        Ok(BookSnapshot::new(self.timestamp_ms, to_ladder(&self.asks, unit)?))
    }
}

/// One race participant.
#[derive(Debug, Clone, Deserialize)]
pub struct ParticipantDto {
    #[serde(alias = "container_id")]
    pub source_id: String,
    #[serde(alias = "timestamp")]
    pub timestamp_ms: i64,
    #[serde(alias = "diff_ms")]
    pub diff_from_fastest_ms: i64,
}

/// One race as produced upstream.
#[derive(Debug, Clone, Deserialize)]
pub struct RaceDto {
    #[serde(alias = "token_id")]
    pub event_key: String,
    #[serde(alias = "count")]
    pub occurrence: RawNumber,
    #[serde(alias = "results")]
    pub participants: Vec<ParticipantDto>,
}

impl RaceDto {
    /// Convert into a race record.
    ///
    /// Diff signs are not checked here; the aggregator owns that invariant.
    pub fn into_record(self) -> Result<RaceRecord> {
        let occurrence = self.occurrence.to_u64("occurrence")?;
        let participants = self
            .participants
            .into_iter()
            .map(|p| RaceResult::new(p.source_id, p.timestamp_ms, p.diff_from_fastest_ms))
            .collect();
        Ok(RaceRecord::new(self.event_key, occurrence, participants))
    }
}

/// One raw detection.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionDto {
    #[serde(alias = "container_id")]
    pub source_id: String,
    #[serde(alias = "token_id")]
    pub event_key: String,
    #[serde(alias = "count")]
    pub occurrence: RawNumber,
    #[serde(alias = "timestamp")]
    pub timestamp_ms: i64,
}

impl DetectionDto {
    pub fn into_detection(self) -> Result<Detection> {
        Ok(Detection {
            source_id: self.source_id.into(),
            event_key: self.event_key.into(),
            occurrence: self.occurrence.to_u64("occurrence")?,
            timestamp_ms: self.timestamp_ms,
        })
    }
}

/// A list that may be bare or wrapped in an object under a named key.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Bare(Vec<T>),
    Races { races: Vec<T> },
    Detections { detections: Vec<T> },
    Snapshots { snapshots: Vec<T> },
}

impl<T> Listing<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items)
            | Self::Races { races: items }
            | Self::Detections { detections: items }
            | Self::Snapshots { snapshots: items } => items,
        }
    }
}

/// Parse a book snapshot.
pub fn parse_book(json: &str, unit: PriceUnit) -> Result<Book> {
    let dto: BookDto = serde_json::from_str(json)?;
    dto.into_book(unit)
}

/// Parse a race batch.
pub fn parse_races(json: &str) -> Result<Vec<RaceRecord>> {
    let listing: Listing<RaceDto> = serde_json::from_str(json)?;
    listing
        .into_vec()
        .into_iter()
        .map(RaceDto::into_record)
        .collect()
}

/// Parse a list of raw detections.
pub fn parse_detections(json: &str) -> Result<Vec<Detection>> {
    let listing: Listing<DetectionDto> = serde_json::from_str(json)?;
    listing
        .into_vec()
        .into_iter()
        .map(DetectionDto::into_detection)
        .collect()
}

/// Parse a price history, newest snapshot first.
pub fn parse_history(json: &str, unit: PriceUnit) -> Result<Vec<BookSnapshot>> {
    let listing: Listing<HistoryEntryDto> = serde_json::from_str(json)?;
    listing
        .into_vec()
        .into_iter()
        .map(|entry| entry.into_snapshot(unit))
        .collect()
}
