use crate::incentives::bonus::{BONUS_FLOOR, TOP_TIER_START};
use crate::incentives::gamification::catalog::BadgeCode;
use crate::incentives::repository::WeeklyPerformance;

const REVIEW_MASTER_THRESHOLD: u32 = 5;
const MEMBERSHIP_PRO_THRESHOLD: u32 = 5;
const ON_FIRE_STREAK: u32 = 5;
const UNSTOPPABLE_STREAK: u32 = 10;

/// Advances or resets a compliance streak from one recorded week.
///
/// An eligible week extends the streak by one; an ineligible week resets it
/// to zero.
pub fn next_streak(prior: u32, eligible: bool) -> u32 {
    if eligible {
        prior.saturating_add(1)
    } else {
        0
    }
}

/// Badges a recorded week qualifies for, in catalog order.
///
/// Volume badges read the raw weekly figures; only the compliance check
/// reads the frozen eligibility snapshot, so a later formula change never
/// re-judges an already recorded week.
pub(crate) fn qualifying_badges(record: &WeeklyPerformance, streak: u32) -> Vec<BadgeCode> {
    let mut earned = Vec::new();
    if record.jobs_completed >= 1 {
        earned.push(BadgeCode::FirstSteps);
    }
    if record.total_revenue >= BONUS_FLOOR {
        earned.push(BadgeCode::MoneyMaker);
    }
    if record.five_star_reviews >= REVIEW_MASTER_THRESHOLD {
        earned.push(BadgeCode::ReviewMaster);
    }
    if streak >= ON_FIRE_STREAK {
        earned.push(BadgeCode::OnFire);
    }
    if streak >= UNSTOPPABLE_STREAK {
        earned.push(BadgeCode::Unstoppable);
    }
    if record.total_revenue >= TOP_TIER_START {
        earned.push(BadgeCode::HighRoller);
    }
    if record.memberships_sold >= MEMBERSHIP_PRO_THRESHOLD {
        earned.push(BadgeCode::MembershipPro);
    }
    if record.bonus.eligible && record.total_revenue >= BONUS_FLOOR {
        earned.push(BadgeCode::PerfectWeek);
    }
    earned
}
