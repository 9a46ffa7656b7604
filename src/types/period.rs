//! Inclusive year-range periods and the calendar arithmetic the aggregator
//! needs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An inclusive range of whole calendar years, e.g. 1995–2024.
///
/// Normals are computed over full years: the period always starts on
/// January 1st of `start_year` and ends on December 31st of `end_year`.
///
/// # Examples
///
/// ```
/// use littoral::Period;
///
/// let p = Period::new(2015, 2024).unwrap();
/// assert_eq!(p.years().count(), 10);
/// assert_eq!(p.to_string(), "2015-2024");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    start_year: i32,
    end_year: i32,
}

impl Period {
    /// Creates a period; `None` when the range is inverted or a year falls
    /// outside 1..=9999.
    pub fn new(start_year: i32, end_year: i32) -> Option<Self> {
        if start_year > end_year || !(1..=9999).contains(&start_year) || !(1..=9999).contains(&end_year)
        {
            return None;
        }
        Some(Self {
            start_year,
            end_year,
        })
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn end_year(&self) -> i32 {
        self.end_year
    }

    /// January 1st of the first year.
    pub fn start_date(&self) -> NaiveDate {
        // Jan 1 exists in every year.
        NaiveDate::from_ymd_opt(self.start_year, 1, 1).unwrap()
    }

    /// December 31st of the last year.
    pub fn end_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.end_year, 12, 31).unwrap()
    }

    /// Iterator over the calendar years in the period.
    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start_year..=self.end_year
    }

    /// Intersects this period with `other`; `None` when they do not overlap.
    pub fn clip_to(&self, other: &Period) -> Option<Period> {
        Period::new(
            self.start_year.max(other.start_year),
            self.end_year.min(other.end_year),
        )
    }

    /// Whether a date falls inside the period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date() && date <= self.end_date()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_year, self.end_year)
    }
}

/// Number of calendar days in `(year, month)`, leap-aware.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .expect("month is validated to 1..=12 before calendar math");
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1).unwrap()
    };
    (next - first).num_days() as u32
}
