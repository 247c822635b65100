//! CSV import pipeline for historical weekly performance exports.
//!
//! Backfills replay each exported week through the normal submission flow,
//! so payout snapshots, streaks, and badges accrue exactly as they would
//! have had the weeks been submitted live.

mod parser;

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::incentives::domain::{TechnicianId, WeekKey, WeekKeyParseError, WeeklySubmission};
use crate::incentives::gamification::BadgeSpec;
use crate::incentives::repository::{
    BadgeRepository, PerformanceRepository, TechnicianRepository,
};
use crate::incentives::service::{IncentiveService, IncentiveServiceError};

/// Errors raised while importing a history export.
#[derive(Debug)]
pub enum HistoryImportError {
    /// The export file could not be opened or read.
    Io(std::io::Error),
    /// A row failed CSV parsing or type conversion.
    Csv(csv::Error),
    /// A row named a week that is not a valid week key.
    Week {
        value: String,
        source: WeekKeyParseError,
    },
    /// Recording an imported week failed.
    Service(IncentiveServiceError),
}

impl fmt::Display for HistoryImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryImportError::Io(error) => {
                write!(f, "failed to read history export: {error}")
            }
            HistoryImportError::Csv(error) => {
                write!(f, "failed to parse history export: {error}")
            }
            HistoryImportError::Week { value, source } => {
                write!(f, "history export names week '{value}': {source}")
            }
            HistoryImportError::Service(error) => {
                write!(f, "failed to record imported week: {error}")
            }
        }
    }
}

impl std::error::Error for HistoryImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HistoryImportError::Io(error) => Some(error),
            HistoryImportError::Csv(error) => Some(error),
            HistoryImportError::Week { source, .. } => Some(source),
            HistoryImportError::Service(error) => Some(error),
        }
    }
}

impl From<std::io::Error> for HistoryImportError {
    fn from(error: std::io::Error) -> Self {
        HistoryImportError::Io(error)
    }
}

impl From<csv::Error> for HistoryImportError {
    fn from(error: csv::Error) -> Self {
        HistoryImportError::Csv(error)
    }
}

impl From<IncentiveServiceError> for HistoryImportError {
    fn from(error: IncentiveServiceError) -> Self {
        HistoryImportError::Service(error)
    }
}

/// Summary of one completed history import.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryImportReport {
    pub weeks_applied: usize,
    pub duplicates_ignored: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_week: Option<WeekKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_week: Option<WeekKey>,
    pub final_streak: u32,
    pub badges_awarded: Vec<BadgeSpec>,
}

/// Replays a CSV export of past weeks through the weekly submission flow.
///
/// Rows are applied oldest week first regardless of file order. When an
/// export lists the same week twice, the row appearing first in the file
/// wins and the rest are counted as duplicates.
pub struct HistoryImporter<'a, T, P, B> {
    service: &'a IncentiveService<T, P, B>,
    technician_id: TechnicianId,
}

impl<'a, T, P, B> HistoryImporter<'a, T, P, B>
where
    T: TechnicianRepository,
    P: PerformanceRepository,
    B: BadgeRepository,
{
    pub fn new(service: &'a IncentiveService<T, P, B>, technician_id: TechnicianId) -> Self {
        Self {
            service,
            technician_id,
        }
    }

    /// Imports the export file at `path`.
    pub fn from_path(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<HistoryImportReport, HistoryImportError> {
        let file = File::open(path)?;
        self.from_reader(file)
    }

    /// Imports an export from any reader.
    pub fn from_reader<R: Read>(
        &self,
        reader: R,
    ) -> Result<HistoryImportReport, HistoryImportError> {
        let mut rows = Vec::new();
        for parsed in parser::history_reader(reader).deserialize::<parser::HistoryRow>() {
            let row = parsed?;
            let week = row
                .week
                .parse::<WeekKey>()
                .map_err(|source| HistoryImportError::Week {
                    value: row.week.clone(),
                    source,
                })?;
            rows.push((week, row));
        }
        // Stable sort keeps file order between rows naming the same week.
        rows.sort_by_key(|(week, _)| *week);

        let mut seen = HashSet::new();
        let mut report = HistoryImportReport {
            weeks_applied: 0,
            duplicates_ignored: 0,
            first_week: None,
            last_week: None,
            final_streak: 0,
            badges_awarded: Vec::new(),
        };
        for (week, row) in rows {
            if !seen.insert(week) {
                report.duplicates_ignored += 1;
                continue;
            }
            let submission = WeeklySubmission {
                technician_id: self.technician_id.clone(),
                week,
                total_revenue: row.total_revenue,
                jobs_completed: row.jobs_completed,
                five_star_reviews: row.five_star_reviews,
                memberships_sold: row.memberships_sold,
                compliance: row.checklist(),
            };
            let outcome = self.service.submit_week(submission)?;
            report.weeks_applied += 1;
            report.first_week.get_or_insert(week);
            report.last_week = Some(week);
            report.final_streak = outcome.streak;
            report.badges_awarded.extend(outcome.awarded);
        }
        info!(
            technician = %self.technician_id,
            weeks = report.weeks_applied,
            duplicates = report.duplicates_ignored,
            streak = report.final_streak,
            "history import applied"
        );
        Ok(report)
    }
}
