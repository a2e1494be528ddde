//! Calendar types for AQS annual-summary queries.

use crate::error::{AqsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type-safe wrapper for a calendar year
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Year(pub u16);

impl Year {
    pub fn new(year: u16) -> Self {
        Self(year)
    }

    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// First day of the year in AQS `YYYYMMDD` form.
    pub fn bdate(&self) -> String {
        format!("{}0101", self.0)
    }

    /// Last day of the year in AQS `YYYYMMDD` form.
    pub fn edate(&self) -> String {
        format!("{}1231", self.0)
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Year {
    type Err = AqsError;

    /// Accepts four-digit years only, so `bdate`/`edate` stay `YYYYMMDD`.
    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u16>()
            .ok()
            .filter(|y| (1000..=9999).contains(y))
            .map(Self)
            .ok_or_else(|| AqsError::InvalidYear {
                input: s.to_string(),
            })
    }
}

/// Inclusive range of years to collect.
///
/// # Examples
///
/// ```rust
/// use aqs_county::{Year, YearRange};
///
/// let range = YearRange::new(Year::new(2019), Year::new(2020)).unwrap();
/// assert_eq!(range.file_suffix(), "2019_2020");
/// assert_eq!(range.years().count(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    first: Year,
    last: Year,
}

impl YearRange {
    pub fn new(first: Year, last: Year) -> Result<Self> {
        if first > last {
            return Err(AqsError::InvalidYearRange {
                first: first.as_u16(),
                last: last.as_u16(),
            });
        }
        Ok(Self { first, last })
    }

    pub fn first(&self) -> Year {
        self.first
    }

    pub fn last(&self) -> Year {
        self.last
    }

    pub fn years(&self) -> impl Iterator<Item = Year> {
        (self.first.as_u16()..=self.last.as_u16()).map(Year::new)
    }

    /// `<first>` for a single year, `<first>_<last>` otherwise.
    pub fn file_suffix(&self) -> String {
        if self.first == self.last {
            self.first.to_string()
        } else {
            format!("{}_{}", self.first, self.last)
        }
    }
}
