//! Canteen Model

use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorCode};
use crate::util::collate;

/// Canteen entity (`canteens` table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canteen {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Free-form operating hours, e.g. "8:00 AM - 10:00 PM"
    #[serde(default)]
    pub timings: Option<String>,
}

impl Canteen {
    /// Parsed operating hours, if the timings string is present and readable
    pub fn opening_hours(&self) -> Option<OpeningHours> {
        self.timings.as_deref().and_then(|t| t.parse().ok())
    }

    /// Whether the canteen is open at `at`.
    ///
    /// `None` when the hours are missing or unreadable.
    pub fn is_open_at(&self, at: NaiveTime) -> Option<bool> {
        self.opening_hours().map(|hours| hours.contains(at))
    }
}

/// Sort canteens by display name
pub fn sort_by_name(canteens: &mut [Canteen]) {
    canteens.sort_by(|a, b| collate(&a.name, &b.name));
}

/// A single open..close window. `close < open` wraps past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl TimeRange {
    pub fn contains(&self, at: NaiveTime) -> bool {
        if self.open == self.close {
            return true;
        }
        if self.open < self.close {
            self.open <= at && at < self.close
        } else {
            at >= self.open || at < self.close
        }
    }
}

/// Operating hours parsed from a canteen's timings string.
///
/// Accepted shapes: `8:00 AM - 10:00 PM`, `9am-5pm`, `08:00 - 22:00`,
/// `10 PM to 2 AM`, and several windows separated by `,` or `;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpeningHours {
    pub ranges: Vec<TimeRange>,
}

impl OpeningHours {
    pub fn contains(&self, at: NaiveTime) -> bool {
        self.ranges.iter().any(|r| r.contains(at))
    }
}

impl FromStr for OpeningHours {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .to_uppercase()
            .replace(['\u{2013}', '\u{2014}'], "-")
            .replace(" TO ", "-");

        let ranges = normalized
            .split([',', ';'])
            .filter(|part| !part.trim().is_empty())
            .map(parse_range)
            .collect::<Result<Vec<_>, _>>()?;

        if ranges.is_empty() {
            return Err(invalid_hours(s));
        }
        Ok(Self { ranges })
    }
}

fn parse_range(part: &str) -> Result<TimeRange, AppError> {
    let (open, close) = part.split_once('-').ok_or_else(|| invalid_hours(part))?;
    Ok(TimeRange {
        open: parse_time(open)?,
        close: parse_time(close)?,
    })
}

fn parse_time(raw: &str) -> Result<NaiveTime, AppError> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let (clock, meridiem) = match compact.len().checked_sub(2) {
        Some(split) if compact.ends_with("AM") || compact.ends_with("PM") => {
            (&compact[..split], Some(&compact[split..]))
        }
        _ => (compact.as_str(), None),
    };

    let clock = if clock.contains(':') {
        clock.to_string()
    } else {
        format!("{clock}:00")
    };

    let parsed = match meridiem {
        Some(m) => NaiveTime::parse_from_str(&format!("{clock}{m}"), "%I:%M%p"),
        None => NaiveTime::parse_from_str(&clock, "%H:%M"),
    };
    parsed.map_err(|_| invalid_hours(raw))
}

fn invalid_hours(raw: &str) -> AppError {
    AppError::with_message(
        ErrorCode::InvalidFormat,
        format!("Unrecognised opening hours: {}", raw.trim()),
    )
}
