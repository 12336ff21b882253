//! Calendar helpers used to describe reference windows: [`Year`], [`Month`],
//! the [`AnyDate`] resolution trait and the resolved [`ReferencePeriod`].

use crate::types::error::DataModelError;
use crate::utils::days_in_month;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Year(pub i32);

impl Year {
    pub fn get(self) -> i32 {
        self.0
    }
}

impl Display for Year {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// A specific month of a specific year, stored as `(year, month)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Month(pub i32, pub u32);

impl Month {
    pub fn new(month: u32, year: i32) -> Self {
        Self(year, month)
    }
    pub fn year(self) -> i32 {
        self.0
    }
    pub fn month(self) -> u32 {
        self.1
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0, self.1)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StartEndDate {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Anything that can be resolved to an inclusive range of calendar days.
///
/// A [`Year`] covers January 1st to December 31st, a [`Month`] covers its first to its
/// last day, a `NaiveDate` covers only itself. Strings are parsed as `YYYY-MM-DD`.
pub trait AnyDate {
    fn get_date_range(self) -> Option<StartEndDate>;
}

impl AnyDate for NaiveDate {
    fn get_date_range(self) -> Option<StartEndDate> {
        Some(StartEndDate {
            start: self,
            end: self,
        })
    }
}

impl AnyDate for &str {
    fn get_date_range(self) -> Option<StartEndDate> {
        NaiveDate::parse_from_str(self, "%Y-%m-%d")
            .ok()?
            .get_date_range()
    }
}

impl AnyDate for String {
    fn get_date_range(self) -> Option<StartEndDate> {
        self.as_str().get_date_range()
    }
}

impl AnyDate for Year {
    fn get_date_range(self) -> Option<StartEndDate> {
        Some(StartEndDate {
            start: NaiveDate::from_ymd_opt(self.0, 1, 1)?,
            end: NaiveDate::from_ymd_opt(self.0, 12, 31)?,
        })
    }
}

impl AnyDate for Month {
    fn get_date_range(self) -> Option<StartEndDate> {
        let year = self.year();
        let month = self.month();
        Some(StartEndDate {
            start: NaiveDate::from_ymd_opt(year, month, 1)?,
            end: NaiveDate::from_ymd_opt(year, month, days_in_month(year, month)?)?,
        })
    }
}

/// An inclusive window of days over which a climatology is computed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct ReferencePeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl ReferencePeriod {
    /// Resolves `start` to the first day of its range and `end` to the last day of its
    /// range, so `ReferencePeriod::new(Year(1991), Year(2020))` spans
    /// `1991-01-01..=2020-12-31`.
    ///
    /// # Errors
    ///
    /// [`DataModelError::UnresolvableDate`] if either bound cannot be resolved, and
    /// [`DataModelError::InvalidReferencePeriod`] if the start lies after the end.
    pub fn new(
        start: impl AnyDate + fmt::Debug + Clone,
        end: impl AnyDate + fmt::Debug + Clone,
    ) -> Result<Self, DataModelError> {
        let start_day = start
            .clone()
            .get_date_range()
            .ok_or_else(|| DataModelError::UnresolvableDate(format!("{start:?}")))?
            .start;
        let end_day = end
            .clone()
            .get_date_range()
            .ok_or_else(|| DataModelError::UnresolvableDate(format!("{end:?}")))?
            .end;
        if start_day > end_day {
            return Err(DataModelError::InvalidReferencePeriod {
                start: start_day,
                end: end_day,
            });
        }
        Ok(Self {
            start: start_day,
            end: end_day,
        })
    }

    pub fn years(start: i32, end: i32) -> Result<Self, DataModelError> {
        Self::new(Year(start), Year(end))
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Display for ReferencePeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_year_bounds_are_inclusive() -> Result<(), DataModelError> {
        let period = ReferencePeriod::years(1991, 2020)?;
        assert_eq!(period.start(), date(1991, 1, 1));
        assert_eq!(period.end(), date(2020, 12, 31));
        assert!(period.contains(date(2020, 12, 31)));
        assert!(!period.contains(date(2021, 1, 1)));
        assert!(!period.contains(date(1990, 12, 31)));
        Ok(())
    }

    #[test]
    fn test_month_resolves_to_last_day() -> Result<(), DataModelError> {
        let period = ReferencePeriod::new(Month(2024, 1), Month(2024, 2))?;
        assert_eq!(period.end(), date(2024, 2, 29));
        Ok(())
    }

    #[test]
    fn test_single_year_window() -> Result<(), DataModelError> {
        let period = ReferencePeriod::years(2000, 2000)?;
        assert!(period.contains(date(2000, 6, 15)));
        Ok(())
    }

    #[test]
    fn test_string_bounds() -> Result<(), DataModelError> {
        let period = ReferencePeriod::new("2001-03-04", "2001-03-10")?;
        assert_eq!(period.start(), date(2001, 3, 4));
        assert!(matches!(
            ReferencePeriod::new("not-a-date", "2001-03-10"),
            Err(DataModelError::UnresolvableDate(_))
        ));
        Ok(())
    }

    #[test]
    fn test_reversed_window_rejected() {
        let result = ReferencePeriod::years(2020, 1991);
        assert!(matches!(
            result,
            Err(DataModelError::InvalidReferencePeriod { .. })
        ));
    }
}
