//! Temporal filtering types
//!
//! Two shapes of time filter appear in finder operations:
//! - [`DateRange`]: an inclusive `BETWEEN from AND to` range over a single column
//! - [`ValidityWindow`]: a record's own `[start, end)` window, where a missing
//!   start means "already started" and a missing end means "never ends"

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

use crate::query::{Comparison, Predicate, Value};

/// Errors related to temporal criteria
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid range: from {from} is after to {to}")]
    InvalidRange {
        from: String,
        to: String,
    },

    #[error("Invalid window: start {start} must be before end {end}")]
    InvalidWindow {
        start: String,
        end: String,
    },
}

/// An inclusive range, matching `column BETWEEN from AND to`
///
/// Both bounds are part of the range, so `from == to` selects exactly one
/// instant (or day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange<T> {
    from: T,
    to: T,
}

impl<T> DateRange<T>
where
    T: Copy + PartialOrd + Debug + Into<Value>,
{
    /// Creates a range, rejecting `from > to`
    pub fn new(from: T, to: T) -> Result<Self, TemporalError> {
        if from > to {
            return Err(TemporalError::InvalidRange {
                from: format!("{:?}", from),
                to: format!("{:?}", to),
            });
        }
        Ok(Self { from, to })
    }

    /// A range covering a single point
    pub fn single(at: T) -> Self {
        Self { from: at, to: at }
    }

    pub fn from(&self) -> T {
        self.from
    }

    pub fn to(&self) -> T {
        self.to
    }

    /// Checks if the value lies inside the range, bounds included
    pub fn contains(&self, value: T) -> bool {
        value >= self.from && value <= self.to
    }

    /// Builds the `column BETWEEN from AND to` predicate
    pub fn predicate(&self, column: &'static str) -> Predicate {
        Predicate::between(column, self.from, self.to)
    }
}

/// A record's validity window, `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityWindow<T> {
    /// Start of the window (inclusive), None means already started
    pub start: Option<T>,
    /// End of the window (exclusive), None means open ended
    pub end: Option<T>,
}

impl<T> ValidityWindow<T>
where
    T: Copy + PartialOrd + Debug + Into<Value>,
{
    /// Creates a window, rejecting `start >= end` when both are present
    pub fn new(start: Option<T>, end: Option<T>) -> Result<Self, TemporalError> {
        if let (Some(s), Some(e)) = (start, end) {
            if s >= e {
                return Err(TemporalError::InvalidWindow {
                    start: format!("{:?}", s),
                    end: format!("{:?}", e),
                });
            }
        }
        Ok(Self { start, end })
    }

    /// A window with neither bound
    pub fn always() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Checks `start <= at < end`, treating missing bounds as satisfied
    pub fn covers(&self, at: T) -> bool {
        self.start.map_or(true, |s| s <= at) && self.end.map_or(true, |e| at < e)
    }

    /// Builds the predicate selecting rows whose window columns cover `at`
    ///
    /// `(start IS NULL OR start <= at) AND (end IS NULL OR end > at)`
    pub fn covering(start_column: &'static str, end_column: &'static str, at: T) -> Predicate {
        let at: Value = at.into();
        Predicate::all(vec![
            Predicate::any(vec![
                Predicate::is_null(start_column),
                Predicate::compare(start_column, Comparison::Le, at.clone()),
            ]),
            Predicate::any(vec![
                Predicate::is_null(end_column),
                Predicate::compare(end_column, Comparison::Gt, at),
            ]),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let range = DateRange::new(day(2024, 1, 1), day(2024, 1, 31)).unwrap();
        assert!(range.contains(day(2024, 1, 1)));
        assert!(range.contains(day(2024, 1, 31)));
        assert!(!range.contains(day(2024, 2, 1)));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let result = DateRange::new(day(2024, 2, 1), day(2024, 1, 1));
        assert!(matches!(result, Err(TemporalError::InvalidRange { .. })));
    }

    #[test]
    fn test_window_end_is_exclusive() {
        let window = ValidityWindow::new(Some(day(2024, 1, 1)), Some(day(2024, 7, 1))).unwrap();
        assert!(window.covers(day(2024, 1, 1)));
        assert!(window.covers(day(2024, 6, 30)));
        assert!(!window.covers(day(2024, 7, 1)));
        assert!(!window.covers(day(2023, 12, 31)));
    }

    #[test]
    fn test_window_null_start_is_already_active() {
        let window = ValidityWindow::new(None, Some(day(2024, 12, 31))).unwrap();
        assert!(window.covers(day(1990, 1, 1)));
        assert!(!ValidityWindow::new(None, Some(day(2024, 1, 1))).unwrap().covers(day(2024, 6, 1)));
    }

    #[test]
    fn test_window_rejects_empty_interval() {
        let at = day(2024, 1, 1);
        assert!(ValidityWindow::new(Some(at), Some(at)).is_err());
        assert!(ValidityWindow::<NaiveDate>::always().covers(at));
    }
}
