//! The single month a planner covers

use std::fmt::{Display, Formatter};

use chrono::{Datelike, NaiveDate};
use crate::error::{Error, Result};

/// A calendar month, e.g. January 2026
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetMonth {
    year: i32,
    month: u32,
}

impl TargetMonth {
    /// Returns an error if `month` is not in `1..=12`
    pub fn new(year: i32, month: u32) -> Result<Self> {
        match NaiveDate::from_ymd_opt(year, month, 1) {
            Some(_) => Ok(Self { year, month }),
            None => Err(Error::InvalidMonth { year, month }),
        }
    }

    pub fn year(&self) -> i32 { self.year }
    pub fn month(&self) -> u32 { self.month }

    pub fn first_day(&self) -> NaiveDate {
        // Validity has been checked in `new`
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    /// Every day of the month, in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.first_day();
        (0..self.days_in_month()).filter_map(move |offset| first.checked_add_days(chrono::Days::new(offset as u64)))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Returns `date` if it belongs to this month, or an error otherwise
    pub fn check(&self, date: NaiveDate) -> Result<NaiveDate> {
        if self.contains(date) {
            Ok(date)
        } else {
            Err(Error::DateOutsideMonth { date, month: self.to_string() })
        }
    }

    /// The date a planner starts on: `today` if it falls within this month, the first day of the month otherwise
    pub fn initial_selection(&self, today: NaiveDate) -> NaiveDate {
        if self.contains(today) {
            today
        } else {
            self.first_day()
        }
    }

    /// How many empty cells precede the first day in a Sunday-first week grid
    pub fn leading_blanks(&self) -> u32 {
        self.first_day().weekday().num_days_from_sunday()
    }
}

impl Default for TargetMonth {
    fn default() -> Self {
        Self { year: 2026, month: 1 }
    }
}

impl Display for TargetMonth {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.first_day().format("%B %Y"))
    }
}
