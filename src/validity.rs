//! Compact validity expressions such as `1Y`, `6M` or `30d`, and the
//! calendar arithmetic that turns them into an expiry instant.

use std::fmt;
use std::str::FromStr;

use time::{Date, Duration, Month, OffsetDateTime};

use crate::error::{CertGenError, Result};

/// Calendar unit of a validity period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodUnit {
    Day,
    Month,
    Year,
}

impl PeriodUnit {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'D' => Some(PeriodUnit::Day),
            'M' => Some(PeriodUnit::Month),
            'Y' => Some(PeriodUnit::Year),
            _ => None,
        }
    }

    fn as_char(self) -> char {
        match self {
            PeriodUnit::Day => 'D',
            PeriodUnit::Month => 'M',
            PeriodUnit::Year => 'Y',
        }
    }
}

/// A parsed validity expression: `magnitude` units of `unit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityPeriod {
    pub unit: PeriodUnit,
    pub magnitude: u32,
}

impl ValidityPeriod {
    /// Parses `<digits><unit>`, where unit is one of `d`, `m`, `y` in either case.
    ///
    /// Malformed input is rejected instead of producing an empty period.
    pub fn parse(expr: &str) -> Result<Self> {
        let normalized = expr.trim().to_ascii_uppercase();
        let invalid = |reason: &str| {
            CertGenError::InvalidRequest(format!("validity period {expr:?}: {reason}"))
        };

        let mut chars = normalized.chars();
        let unit_char = chars.next_back().ok_or_else(|| invalid("empty"))?;
        let digits = chars.as_str();

        let unit = PeriodUnit::from_char(unit_char)
            .ok_or_else(|| invalid("unit must be one of D, M or Y"))?;
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("magnitude must be a number"));
        }
        let magnitude: u32 = digits.parse().map_err(|_| invalid("magnitude out of range"))?;
        if magnitude == 0 {
            return Err(invalid("magnitude must be at least 1"));
        }

        Ok(Self { unit, magnitude })
    }

    /// The instant `self` after `start`, using calendar rules.
    ///
    /// Month and year steps keep the day of month when it exists in the
    /// target month and otherwise clamp to that month's last day.
    pub fn expiry_from(&self, start: OffsetDateTime) -> Result<OffsetDateTime> {
        let overflow =
            || CertGenError::InvalidRequest(format!("validity period {self} overflows the calendar"));

        match self.unit {
            PeriodUnit::Day => start
                .checked_add(Duration::days(i64::from(self.magnitude)))
                .ok_or_else(overflow),
            PeriodUnit::Month => add_months(start, i64::from(self.magnitude)).ok_or_else(overflow),
            PeriodUnit::Year => {
                add_months(start, i64::from(self.magnitude) * 12).ok_or_else(overflow)
            }
        }
    }
}

impl FromStr for ValidityPeriod {
    type Err = CertGenError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ValidityPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit.as_char())
    }
}

fn add_months(start: OffsetDateTime, months: i64) -> Option<OffsetDateTime> {
    let date = start.date();
    let month_index = i64::from(date.year()) * 12 + i64::from(u8::from(date.month())) - 1 + months;
    let year = i32::try_from(month_index.div_euclid(12)).ok()?;
    let month = Month::try_from(u8::try_from(month_index.rem_euclid(12) + 1).ok()?).ok()?;
    let day = date.day().min(month.length(year));
    let target = Date::from_calendar_date(year, month, day).ok()?;
    Some(start.replace_date(target))
}
