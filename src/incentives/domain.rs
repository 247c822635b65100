use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::compliance::ComplianceChecklist;

/// Identifier wrapper for enrolled technicians.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TechnicianId(pub String);

impl fmt::Display for TechnicianId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ISO week identifier using the `2024-W05` wire format.
///
/// Internally the key is the Monday the week starts on, which makes ordering
/// and previous/next arithmetic exact across year boundaries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct WeekKey {
    monday: NaiveDate,
}

impl WeekKey {
    /// Build a key from an ISO year and week number, if the pair is valid.
    pub fn new(year: i32, week: u32) -> Option<Self> {
        NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).map(|monday| Self { monday })
    }

    /// The week containing the given date.
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            monday: date.week(Weekday::Mon).first_day(),
        }
    }

    /// The week containing today.
    pub fn current() -> Self {
        Self::for_date(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.monday.iso_week().year()
    }

    pub fn week(&self) -> u32 {
        self.monday.iso_week().week()
    }

    /// Monday of this week.
    pub fn start_date(&self) -> NaiveDate {
        self.monday
    }

    /// Sunday of this week.
    pub fn end_date(&self) -> NaiveDate {
        self.monday + chrono::Duration::days(6)
    }

    /// Reporting quarter derived from the week number (weeks 1-13 fall in Q1).
    pub fn quarter(&self) -> u32 {
        (self.week() + 12) / 13
    }

    pub fn previous(&self) -> Self {
        Self {
            monday: self.monday - chrono::Duration::days(7),
        }
    }

    pub fn next(&self) -> Self {
        Self {
            monday: self.monday + chrono::Duration::days(7),
        }
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year(), self.week())
    }
}

/// Raised when a week key string does not name a real ISO week.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid week key '{0}', expected the YYYY-Www form (e.g. 2024-W05)")]
pub struct WeekKeyParseError(pub String);

impl FromStr for WeekKey {
    type Err = WeekKeyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let (year, week) = trimmed
            .split_once("-W")
            .ok_or_else(|| WeekKeyParseError(value.to_string()))?;
        let year = year
            .parse::<i32>()
            .map_err(|_| WeekKeyParseError(value.to_string()))?;
        let week = week
            .parse::<u32>()
            .map_err(|_| WeekKeyParseError(value.to_string()))?;

        Self::new(year, week).ok_or_else(|| WeekKeyParseError(value.to_string()))
    }
}

impl TryFrom<String> for WeekKey {
    type Error = WeekKeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WeekKey> for String {
    fn from(value: WeekKey) -> Self {
        value.to_string()
    }
}

/// Derive the two-letter avatar shown on dashboards ("Marshall Snider" -> "MS").
pub fn avatar_initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .collect::<String>()
        .to_uppercase()
}

/// Roster entry for a technician enrolled in the incentive program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technician {
    pub id: TechnicianId,
    pub name: String,
    pub avatar: String,
    pub is_active: bool,
    pub current_streak: u32,
}

/// Weekly figures submitted for one technician at the end of a scoring week.
///
/// A missing checklist in the payload deserializes as all items failing, so a
/// bare submission is never accidentally bonus eligible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySubmission {
    pub technician_id: TechnicianId,
    pub week: WeekKey,
    pub total_revenue: f64,
    pub jobs_completed: u32,
    pub five_star_reviews: u32,
    pub memberships_sold: u32,
    #[serde(default)]
    pub compliance: ComplianceChecklist,
}
