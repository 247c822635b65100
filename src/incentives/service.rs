use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::info;

use crate::incentives::bonus::{total_bonus, BonusBreakdown};
use crate::incentives::compliance::ComplianceItem;
use crate::incentives::domain::{
    avatar_initials, Technician, TechnicianId, WeekKey, WeeklySubmission,
};
use crate::incentives::gamification::{self, standard_catalog, BadgeCode, BadgeSpec};
use crate::incentives::repository::{
    BadgeGrant, BadgeRepository, PerformanceRepository, RepositoryError, TechnicianRepository,
    WeeklyPerformance, DEFAULT_REVENUE_GOAL,
};

static TECHNICIAN_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_technician_id() -> TechnicianId {
    let id = TECHNICIAN_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    TechnicianId(format!("tech-{id:04}"))
}

/// Errors surfaced by the incentive service.
#[derive(Debug, thiserror::Error)]
pub enum IncentiveServiceError {
    #[error("unknown technician: {0}")]
    UnknownTechnician(TechnicianId),
    #[error("technician name must not be empty")]
    EmptyName,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result of recording one week of performance.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub record: WeeklyPerformance,
    pub streak: u32,
    pub awarded: Vec<BadgeSpec>,
}

/// Result of re-running streak and badge evaluation for a recorded week.
#[derive(Debug, Clone, Serialize)]
pub struct GamificationOutcome {
    pub streak: u32,
    pub awarded: Vec<BadgeSpec>,
}

/// Condensed view of the week before the one on display.
#[derive(Debug, Clone, Serialize)]
pub struct WeekRecap {
    pub week: WeekKey,
    pub total_revenue: f64,
    pub jobs_completed: u32,
    pub bonus: BonusBreakdown,
    pub was_eligible: bool,
}

/// A catalog badge together with whether the technician holds it.
#[derive(Debug, Clone, Serialize)]
pub struct BadgeStanding {
    pub spec: BadgeSpec,
    pub earned: bool,
}

/// One checklist item with its pass state for the week on display.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceStatus {
    pub item: ComplianceItem,
    pub label: &'static str,
    pub passed: bool,
}

/// Everything the weekly dashboard renders for one technician-week.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub technician: Technician,
    pub week: WeekKey,
    pub record: WeeklyPerformance,
    pub bonus: BonusBreakdown,
    pub bonus_floor_progress: f64,
    pub goal_progress: f64,
    pub average_ticket: f64,
    pub compliance: Vec<ComplianceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<WeekRecap>,
    pub badges: Vec<BadgeStanding>,
}

/// Coordinates enrollment, weekly submissions, payouts, and gamification.
pub struct IncentiveService<T, P, B> {
    technicians: Arc<T>,
    performance: Arc<P>,
    badges: Arc<B>,
    submission_locks: Mutex<HashMap<TechnicianId, Arc<Mutex<()>>>>,
}

impl<T, P, B> IncentiveService<T, P, B>
where
    T: TechnicianRepository,
    P: PerformanceRepository,
    B: BadgeRepository,
{
    pub fn new(technicians: Arc<T>, performance: Arc<P>, badges: Arc<B>) -> Self {
        Self {
            technicians,
            performance,
            badges,
            submission_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Installs the standard badge catalog, keeping entries already present.
    pub fn seed_badge_catalog(&self) -> Result<(), IncentiveServiceError> {
        self.badges.seed(&standard_catalog())?;
        Ok(())
    }

    /// Enrolls a technician under a freshly assigned identifier.
    pub fn enroll_technician(&self, name: &str) -> Result<Technician, IncentiveServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(IncentiveServiceError::EmptyName);
        }
        let technician = Technician {
            id: next_technician_id(),
            name: name.to_owned(),
            avatar: avatar_initials(name),
            is_active: true,
            current_streak: 0,
        };
        self.technicians.insert(technician.clone())?;
        info!(technician = %technician.id, name = %technician.name, "technician enrolled");
        Ok(technician)
    }

    /// Records a week of performance, freezing the payout snapshot and
    /// applying the streak and badge updates it triggers.
    ///
    /// Submissions for the same technician are serialized so concurrent
    /// writes cannot interleave the read-evaluate-write sequence.
    pub fn submit_week(
        &self,
        submission: WeeklySubmission,
    ) -> Result<SubmissionOutcome, IncentiveServiceError> {
        let lock = self.submission_lock(&submission.technician_id);
        let _serialized = lock.lock().expect("technician submission mutex poisoned");

        let technician = self.require_technician(&submission.technician_id)?;
        let revenue_goal = self
            .performance
            .fetch(&submission.technician_id, submission.week)?
            .map_or(DEFAULT_REVENUE_GOAL, |existing| existing.revenue_goal);
        let bonus = total_bonus(
            submission.total_revenue,
            submission.five_star_reviews,
            submission.memberships_sold,
            submission.compliance,
        );
        let record = WeeklyPerformance {
            technician_id: submission.technician_id.clone(),
            week: submission.week,
            total_revenue: submission.total_revenue,
            jobs_completed: submission.jobs_completed,
            five_star_reviews: submission.five_star_reviews,
            memberships_sold: submission.memberships_sold,
            revenue_goal,
            compliance: Some(submission.compliance),
            bonus,
        };
        self.performance.upsert(record.clone())?;
        let (streak, awarded) = self.apply_gamification(&technician, &record)?;
        info!(
            technician = %record.technician_id,
            week = %record.week,
            revenue = record.total_revenue,
            eligible = record.bonus.eligible,
            payout = record.bonus.total,
            "weekly performance recorded"
        );
        Ok(SubmissionOutcome {
            record,
            streak,
            awarded,
        })
    }

    /// Re-runs streak and badge evaluation for an already recorded week.
    ///
    /// Returns `Ok(None)` when the week has no submission to evaluate.
    pub fn award_gamification(
        &self,
        technician_id: &TechnicianId,
        week: Option<WeekKey>,
    ) -> Result<Option<GamificationOutcome>, IncentiveServiceError> {
        let lock = self.submission_lock(technician_id);
        let _serialized = lock.lock().expect("technician submission mutex poisoned");

        let technician = self.require_technician(technician_id)?;
        let week = week.unwrap_or_else(WeekKey::current);
        match self.performance.fetch(technician_id, week)? {
            Some(record) => {
                let (streak, awarded) = self.apply_gamification(&technician, &record)?;
                Ok(Some(GamificationOutcome { streak, awarded }))
            }
            None => Ok(None),
        }
    }

    /// Sets the revenue goal for a technician-week, creating a blank record
    /// when the week has no submission yet.
    pub fn set_weekly_goal(
        &self,
        technician_id: &TechnicianId,
        week: WeekKey,
        revenue_goal: f64,
    ) -> Result<WeeklyPerformance, IncentiveServiceError> {
        let lock = self.submission_lock(technician_id);
        let _serialized = lock.lock().expect("technician submission mutex poisoned");

        self.require_technician(technician_id)?;
        let mut record = self
            .performance
            .fetch(technician_id, week)?
            .unwrap_or_else(|| WeeklyPerformance::blank(technician_id.clone(), week));
        record.revenue_goal = revenue_goal;
        self.performance.upsert(record.clone())?;
        info!(technician = %technician_id, week = %week, goal = revenue_goal, "weekly revenue goal set");
        Ok(record)
    }

    /// Assembles the dashboard for a technician-week, defaulting to the
    /// current week.
    pub fn week_dashboard(
        &self,
        technician_id: &TechnicianId,
        week: Option<WeekKey>,
    ) -> Result<DashboardView, IncentiveServiceError> {
        let technician = self.require_technician(technician_id)?;
        let week = week.unwrap_or_else(WeekKey::current);
        let record = self
            .performance
            .fetch(technician_id, week)?
            .unwrap_or_else(|| WeeklyPerformance::blank(technician_id.clone(), week));
        let previous = self
            .performance
            .fetch(technician_id, week.previous())?
            .map(|prior| WeekRecap {
                week: prior.week,
                total_revenue: prior.total_revenue,
                jobs_completed: prior.jobs_completed,
                bonus: prior.live_bonus(),
                was_eligible: prior.bonus.eligible,
            });
        let granted = self.badges.granted(technician_id)?;
        let mut badges = Vec::with_capacity(BadgeCode::ALL.len());
        for code in BadgeCode::ALL {
            let spec = match self.badges.find(code)? {
                Some(spec) => spec,
                None => continue,
            };
            let earned = granted.iter().any(|grant| grant.badge == code);
            badges.push(BadgeStanding { spec, earned });
        }
        // Both the bonus and the checklist rows read an absent checklist as
        // all boxes unticked, so the two never disagree on eligibility.
        let checklist = record.evaluated_compliance();
        let compliance = ComplianceItem::ALL
            .iter()
            .map(|item| ComplianceStatus {
                item: *item,
                label: item.label(),
                passed: checklist.status_of(*item),
            })
            .collect();
        let bonus = record.live_bonus();
        let bonus_floor_progress = record.bonus_floor_progress();
        let goal_progress = record.goal_progress();
        let average_ticket = record.average_ticket();
        Ok(DashboardView {
            technician,
            week,
            record,
            bonus,
            bonus_floor_progress,
            goal_progress,
            average_ticket,
            compliance,
            previous,
            badges,
        })
    }

    /// Every recorded week for a technician, oldest first.
    pub fn performance_history(
        &self,
        technician_id: &TechnicianId,
    ) -> Result<Vec<WeeklyPerformance>, IncentiveServiceError> {
        self.require_technician(technician_id)?;
        Ok(self.performance.history(technician_id)?)
    }

    /// Active technicians, ordered by display name.
    pub fn roster(&self) -> Result<Vec<Technician>, IncentiveServiceError> {
        Ok(self.technicians.roster()?)
    }

    fn require_technician(
        &self,
        id: &TechnicianId,
    ) -> Result<Technician, IncentiveServiceError> {
        self.technicians
            .fetch(id)?
            .ok_or_else(|| IncentiveServiceError::UnknownTechnician(id.clone()))
    }

    fn submission_lock(&self, id: &TechnicianId) -> Arc<Mutex<()>> {
        let mut guard = self
            .submission_locks
            .lock()
            .expect("submission lock table mutex poisoned");
        guard.entry(id.clone()).or_default().clone()
    }

    fn apply_gamification(
        &self,
        technician: &Technician,
        record: &WeeklyPerformance,
    ) -> Result<(u32, Vec<BadgeSpec>), IncentiveServiceError> {
        let update = gamification::evaluate_week(record, technician.current_streak);
        self.technicians.set_streak(&technician.id, update.streak)?;
        let mut awarded = Vec::new();
        for code in update.earned {
            // Unseeded catalog entries are skipped rather than treated as errors.
            let spec = match self.badges.find(code)? {
                Some(spec) => spec,
                None => continue,
            };
            let grant = BadgeGrant {
                technician_id: technician.id.clone(),
                badge: code,
                earned_in: record.week,
            };
            if self.badges.grant(grant)? {
                info!(
                    technician = %technician.id,
                    badge = code.code(),
                    week = %record.week,
                    "badge awarded"
                );
                awarded.push(spec);
            }
        }
        Ok((update.streak, awarded))
    }
}
