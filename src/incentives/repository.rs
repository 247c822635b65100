//! Storage seams for technicians, weekly records, and badge grants.

use serde::{Deserialize, Serialize};

use crate::incentives::bonus::{total_bonus, BonusBreakdown, BONUS_FLOOR};
use crate::incentives::compliance::ComplianceChecklist;
use crate::incentives::domain::{Technician, TechnicianId, WeekKey};
use crate::incentives::gamification::{BadgeCode, BadgeSpec};

/// Revenue goal applied to a week until the technician sets their own.
pub const DEFAULT_REVENUE_GOAL: f64 = 6_500.0;

/// One technician-week of recorded performance.
///
/// `bonus` is the payout snapshot frozen at submission time; later formula
/// or checklist changes never alter it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPerformance {
    pub technician_id: TechnicianId,
    pub week: WeekKey,
    pub total_revenue: f64,
    pub jobs_completed: u32,
    pub five_star_reviews: u32,
    pub memberships_sold: u32,
    pub revenue_goal: f64,
    pub compliance: Option<ComplianceChecklist>,
    pub bonus: BonusBreakdown,
}

impl WeeklyPerformance {
    /// An empty record for a week with no submission yet.
    pub fn blank(technician_id: TechnicianId, week: WeekKey) -> Self {
        Self {
            technician_id,
            week,
            total_revenue: 0.0,
            jobs_completed: 0,
            five_star_reviews: 0,
            memberships_sold: 0,
            revenue_goal: DEFAULT_REVENUE_GOAL,
            compliance: None,
            bonus: BonusBreakdown::ineligible(),
        }
    }

    /// The recorded checklist, treating an absent one as all boxes unticked.
    pub fn evaluated_compliance(&self) -> ComplianceChecklist {
        self.compliance.unwrap_or_default()
    }

    /// Recomputes the payout from current figures instead of the snapshot.
    pub fn live_bonus(&self) -> BonusBreakdown {
        total_bonus(
            self.total_revenue,
            self.five_star_reviews,
            self.memberships_sold,
            self.compliance,
        )
    }

    /// Fraction of the weekly revenue goal reached. Not capped; values over
    /// 1.0 mean the goal was exceeded.
    pub fn goal_progress(&self) -> f64 {
        if self.revenue_goal <= 0.0 {
            0.0
        } else {
            self.total_revenue / self.revenue_goal
        }
    }

    /// Fraction of the bonus floor reached, capped at 1.0.
    pub fn bonus_floor_progress(&self) -> f64 {
        (self.total_revenue / BONUS_FLOOR).min(1.0)
    }

    /// Average revenue per completed job, zero when no jobs were recorded.
    pub fn average_ticket(&self) -> f64 {
        if self.jobs_completed == 0 {
            0.0
        } else {
            self.total_revenue / f64::from(self.jobs_completed)
        }
    }
}

/// A badge held by a technician, keyed by the week that earned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeGrant {
    pub technician_id: TechnicianId,
    pub badge: BadgeCode,
    pub earned_in: WeekKey,
}

/// Errors surfaced by storage implementations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A record with the same identity already exists.
    #[error("record already exists")]
    Conflict,
    /// No record matched the requested identity.
    #[error("record not found")]
    NotFound,
    /// The backing store could not service the request.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Storage for the technician roster.
pub trait TechnicianRepository: Send + Sync {
    /// Adds a technician, rejecting a duplicate identifier with `Conflict`.
    fn insert(&self, technician: Technician) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &TechnicianId) -> Result<Option<Technician>, RepositoryError>;
    /// Active technicians, ordered by display name.
    fn roster(&self) -> Result<Vec<Technician>, RepositoryError>;
    /// Overwrites the stored streak, `NotFound` if the technician is missing.
    fn set_streak(&self, id: &TechnicianId, streak: u32) -> Result<(), RepositoryError>;
}

/// Storage for recorded technician-weeks.
pub trait PerformanceRepository: Send + Sync {
    /// Inserts or replaces the record for the technician-week it names.
    fn upsert(&self, record: WeeklyPerformance) -> Result<(), RepositoryError>;
    fn fetch(
        &self,
        id: &TechnicianId,
        week: WeekKey,
    ) -> Result<Option<WeeklyPerformance>, RepositoryError>;
    /// Every recorded week for a technician, ordered oldest first.
    fn history(&self, id: &TechnicianId) -> Result<Vec<WeeklyPerformance>, RepositoryError>;
}

/// Storage for the badge catalog and per-technician grants.
pub trait BadgeRepository: Send + Sync {
    /// Installs catalog entries, keeping any entry already present.
    fn seed(&self, specs: &[BadgeSpec]) -> Result<(), RepositoryError>;
    fn find(&self, code: BadgeCode) -> Result<Option<BadgeSpec>, RepositoryError>;
    /// Records a grant. Returns `false` when the technician already held the
    /// badge, making repeated awards idempotent.
    fn grant(&self, grant: BadgeGrant) -> Result<bool, RepositoryError>;
    /// Every badge the technician holds, in the order granted.
    fn granted(&self, id: &TechnicianId) -> Result<Vec<BadgeGrant>, RepositoryError>;
}
