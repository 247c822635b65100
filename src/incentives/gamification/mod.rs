//! Streaks and badge awards layered over recorded weekly performance.

pub(crate) mod catalog;
pub(crate) mod rules;

pub use catalog::{standard_catalog, BadgeCode, BadgeSpec};
pub use rules::next_streak;

use crate::incentives::repository::WeeklyPerformance;

/// Streak transition and badge qualifications for one recorded week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamificationUpdate {
    pub streak: u32,
    pub earned: Vec<BadgeCode>,
}

/// Evaluates the streak transition and badge qualifications for a recorded
/// week.
///
/// `prior_streak` is the technician's streak before this week is applied.
/// The eligibility flag frozen on the record drives the transition, so
/// editing the live checklist after the fact never rewrites a streak.
pub fn evaluate_week(record: &WeeklyPerformance, prior_streak: u32) -> GamificationUpdate {
    let streak = next_streak(prior_streak, record.bonus.eligible);
    let earned = rules::qualifying_badges(record, streak);
    GamificationUpdate { streak, earned }
}
