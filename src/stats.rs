//! Offsets are whole seconds relative to the series' reference instant and may
//! be negative. A pair whose offset or value does not parse (most often the
//! `NA` sentinel) is counted as missing.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSamplePair {
    pub offset: String,
    pub value: String,
}

impl RawSamplePair {
    pub fn new(offset: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            offset: offset.into(),
            value: value.into(),
        }
    }

    /// The offset of a pair with a parseable offset and value, else `None`.
    pub fn parse_offset(&self) -> Option<i32> {
        let offset = self.offset.parse::<i32>().ok()?;
        parse_value(&self.value)?;
        Some(offset)
    }
}

// Non-finite values are only accepted in their `Infinity` / `NaN` spelling;
// `inf` and friends count as missing.
fn parse_value(token: &str) -> Option<f64> {
    let token = token.trim();
    let value = token.parse::<f64>().ok()?;
    if value.is_finite() || matches!(token.trim_start_matches(['+', '-']), "Infinity" | "NaN") {
        Some(value)
    } else {
        None
    }
}

/// `start_instant <= stop_instant` always holds; with no valid samples both
/// equal `reference_instant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStats {
    pub reference_instant: DateTime<Utc>,
    pub start_instant: DateTime<Utc>,
    pub stop_instant: DateTime<Utc>,
    pub sample_count: usize,
    pub missing_count: usize,
}

impl DatasetStats {
    pub fn compute(pairs: &[RawSamplePair], reference_instant: DateTime<Utc>) -> Self {
        let mut sample_count = 0usize;
        let mut missing_count = 0usize;
        let mut bounds: Option<(i32, i32)> = None;

        for pair in pairs {
            match pair.parse_offset() {
                Some(offset) => {
                    sample_count += 1;
                    bounds = Some(match bounds {
                        Some((min, max)) => (min.min(offset), max.max(offset)),
                        None => (offset, offset),
                    });
                }
                None => missing_count += 1,
            }
        }

        let (start_instant, stop_instant) = match bounds {
            Some((min, max)) => (
                shift(reference_instant, min),
                shift(reference_instant, max),
            ),
            None => (reference_instant, reference_instant),
        };

        Self {
            reference_instant,
            start_instant,
            stop_instant,
            sample_count,
            missing_count,
        }
    }

    pub fn total_count(&self) -> usize {
        self.sample_count + self.missing_count
    }
}

fn shift(reference: DateTime<Utc>, offset_secs: i32) -> DateTime<Utc> {
    reference
        .checked_add_signed(Duration::seconds(i64::from(offset_secs)))
        .unwrap_or(reference)
}
