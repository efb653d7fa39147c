use crate::error::{BudgetError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub const MONTHS_PER_YEAR: usize = 12;

pub const RUSSIAN_MONTH_NAMES: [&str; MONTHS_PER_YEAR] = [
    "Январь", "Февраль", "Март", "Апрель", "Май", "Июнь", "Июль", "Август", "Сентябрь",
    "Октябрь", "Ноябрь", "Декабрь",
];

pub const ENGLISH_MONTH_NAMES: [&str; MONTHS_PER_YEAR] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// The 12 canonical month names, in calendar order, that records use to
/// refer to months.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthTable {
    names: [String; MONTHS_PER_YEAR],
}

impl MonthTable {
    pub fn new(names: [String; MONTHS_PER_YEAR]) -> Self {
        Self { names }
    }

    pub fn russian() -> Self {
        Self::from_static(&RUSSIAN_MONTH_NAMES)
    }

    pub fn english() -> Self {
        Self::from_static(&ENGLISH_MONTH_NAMES)
    }

    fn from_static(names: &[&str; MONTHS_PER_YEAR]) -> Self {
        Self {
            names: (*names).map(|n| n.to_string()),
        }
    }

    /// Resolves a month name to its 0-based index.
    ///
    /// Unrecognized names resolve to 0 (January). Callers that need strict
    /// behaviour should use [`MonthTable::try_index_of`].
    pub fn index_of(&self, name: &str) -> usize {
        self.try_index_of(name).unwrap_or(0)
    }

    pub fn try_index_of(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.names.iter().position(|n| n == name)
    }

    pub fn require_index_of(&self, name: &str) -> Result<usize> {
        self.try_index_of(name)
            .ok_or_else(|| BudgetError::UnknownMonth(name.to_string()))
    }

    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }
}

impl Default for MonthTable {
    fn default() -> Self {
        Self::russian()
    }
}

/// Number of calendar months from `start` to `end`, ignoring the day of month.
/// Negative when `end` falls in an earlier month than `start`.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    let year_diff = end.year() - start.year();
    let month_diff = end.month() as i32 - start.month() as i32;
    year_diff * 12 + month_diff
}

pub fn current_month_index(today: NaiveDate) -> usize {
    today.month0() as usize
}

pub fn validate_month_index(index: usize) -> Result<()> {
    if index >= MONTHS_PER_YEAR {
        return Err(BudgetError::InvalidMonthIndex(index));
    }
    Ok(())
}

/// Months to wait from `current` until the next occurrence of `due`,
/// wrapping into the following year. Zero when `due` is the current month.
pub fn months_until(current: usize, due: usize) -> usize {
    if due >= current {
        due - current
    } else {
        MONTHS_PER_YEAR - current + due
    }
}
