//! Weekly performance intake, bonus computation, and gamification.
//!
//! A submitted week flows through the compliance gate and the bonus engine,
//! is frozen into a [`repository::WeeklyPerformance`] snapshot, and then runs
//! the gamification pass that advances the technician's streak and grants
//! badges. The service composes those pieces behind repository traits so the
//! same pipeline backs the HTTP surface, the CLI, and the history importer.

pub(crate) mod bonus;
pub(crate) mod compliance;
pub mod domain;
pub(crate) mod gamification;
pub mod history;
pub mod memory;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use bonus::{
    base_bonus, spif_bonus, total_bonus, BonusBreakdown, BonusEligibility, BONUS_FLOOR,
};
pub use compliance::{ComplianceChecklist, ComplianceItem};
pub use domain::{
    avatar_initials, Technician, TechnicianId, WeekKey, WeekKeyParseError, WeeklySubmission,
};
pub use gamification::{
    evaluate_week, next_streak, standard_catalog, BadgeCode, BadgeSpec, GamificationUpdate,
};
pub use history::{HistoryImportError, HistoryImportReport, HistoryImporter};
pub use memory::{
    InMemoryBadgeRepository, InMemoryPerformanceRepository, InMemoryTechnicianRepository,
};
pub use repository::{
    BadgeGrant, BadgeRepository, PerformanceRepository, RepositoryError, TechnicianRepository,
    WeeklyPerformance, DEFAULT_REVENUE_GOAL,
};
pub use router::incentive_router;
pub use service::{
    BadgeStanding, ComplianceStatus, DashboardView, GamificationOutcome, IncentiveService,
    IncentiveServiceError, SubmissionOutcome, WeekRecap,
};
