//! Per-store price history as returned by the backend, flattened for display.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::records::{de_amount, de_list, de_text};

/// Lookback windows the backend accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistoryRange {
    Week,
    #[default]
    Month,
    Year,
}

impl HistoryRange {
    #[must_use]
    pub fn days(self) -> u32 {
        match self {
            HistoryRange::Week => 7,
            HistoryRange::Month => 30,
            HistoryRange::Year => 365,
        }
    }

    /// Maps a day count onto a supported range; anything else is `None`.
    #[must_use]
    pub fn from_days(days: u32) -> Option<Self> {
        match days {
            7 => Some(HistoryRange::Week),
            30 => Some(HistoryRange::Month),
            365 => Some(HistoryRange::Year),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(default, deserialize_with = "de_text")]
    pub date: String,
    #[serde(default, deserialize_with = "de_amount")]
    pub price: f64,
}

/// One store's price observations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    #[serde(default, deserialize_with = "de_text")]
    pub competitor: String,
    #[serde(default, deserialize_with = "de_text")]
    pub url: String,
    #[serde(default, deserialize_with = "de_list")]
    pub data: Vec<PricePoint>,
}

/// A single observation tagged with the store it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    /// `None` when the backend date could not be parsed.
    pub date: Option<NaiveDateTime>,
    pub raw_date: String,
    pub store: String,
    pub price: f64,
    pub url: String,
}

/// Parses the date formats the backend is known to emit.
#[must_use]
pub fn parse_history_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Flattens every series into rows, newest first.
///
/// Rows with unparseable dates keep their input order at the end.
#[must_use]
pub fn flatten_history(series: &[PriceSeries]) -> Vec<HistoryRow> {
    let mut rows: Vec<HistoryRow> = series
        .iter()
        .flat_map(|s| {
            s.data.iter().map(move |point| HistoryRow {
                date: parse_history_date(&point.date),
                raw_date: point.date.clone(),
                store: s.competitor.clone(),
                price: point.price,
                url: s.url.clone(),
            })
        })
        .collect();

    rows.sort_by(|a, b| match (a.date, b.date) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    rows
}

/// Cheapest positive observation across all series; the earliest date wins ties.
#[must_use]
pub fn lowest_point(series: &[PriceSeries]) -> Option<HistoryRow> {
    let mut lowest: Option<HistoryRow> = None;
    for row in flatten_history(series) {
        if !(row.price.is_finite() && row.price > 0.0) {
            continue;
        }
        let replace = match &lowest {
            None => true,
            Some(current) => match row.price.total_cmp(&current.price) {
                Ordering::Less => true,
                Ordering::Equal => match (row.date, current.date) {
                    (Some(candidate), Some(held)) => candidate < held,
                    (Some(_), None) => true,
                    _ => false,
                },
                Ordering::Greater => false,
            },
        };
        if replace {
            lowest = Some(row);
        }
    }
    lowest
}
