use serde::{Deserialize, Serialize};

use super::compliance::ComplianceChecklist;

/// Revenue at which the weekly base bonus starts paying out.
pub const BONUS_FLOOR: f64 = 7_000.0;
/// Revenue where the $100 accelerator blocks take over from the $75 blocks.
pub const MID_TIER_START: f64 = 9_000.0;
/// Revenue where the capped mid tier hands off to the uncapped top tier.
pub const TOP_TIER_START: f64 = 13_000.0;

const BLOCK_WIDTH: f64 = 500.0;
const LOW_TIER_BLOCK: f64 = 75.0;
const MID_TIER_BLOCK: f64 = 100.0;
// The mid tier folds the low tier in as a flat $300 (four $75 blocks), not the
// $375 paid at exactly $9,000, so the payout steps down just above the
// boundary. Payroll treats the step as canonical; do not smooth it.
const MID_TIER_BASE: f64 = 300.0;
const MID_TIER_CAP: f64 = 1_000.0;
const TOP_TIER_BASE: f64 = 1_000.0;
const TOP_TIER_RATE: f64 = 0.02;
const REVIEW_SPIF: f64 = 25.0;
const MEMBERSHIP_SPIF: f64 = 25.0;

/// Base payout for a week's revenue. Negative or non-finite revenue pays zero.
pub fn base_bonus(revenue: f64) -> f64 {
    if !revenue.is_finite() || revenue < BONUS_FLOOR {
        return 0.0;
    }

    if revenue <= MID_TIER_START {
        let blocks = ((revenue - BONUS_FLOOR) / BLOCK_WIDTH).floor() + 1.0;
        return blocks * LOW_TIER_BLOCK;
    }

    if revenue <= TOP_TIER_START {
        let accelerator_blocks = ((revenue - MID_TIER_START) / BLOCK_WIDTH).floor();
        let bonus = MID_TIER_BASE + accelerator_blocks * MID_TIER_BLOCK;
        return bonus.min(MID_TIER_CAP);
    }

    TOP_TIER_BASE + revenue * TOP_TIER_RATE
}

/// Flat add-ons earned per five-star review and per membership sold.
pub fn spif_bonus(five_star_reviews: u32, memberships_sold: u32) -> f64 {
    f64::from(five_star_reviews) * REVIEW_SPIF + f64::from(memberships_sold) * MEMBERSHIP_SPIF
}

/// Gate deciding whether a computed bonus actually pays out.
///
/// Callers either pass a decided boolean (e.g. the frozen snapshot flag) or a
/// checklist to evaluate. A missing checklist converts to the all-failing
/// default, so absent compliance data always forfeits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusEligibility {
    Decided(bool),
    Checklist(ComplianceChecklist),
}

impl BonusEligibility {
    fn is_met(self) -> bool {
        match self {
            BonusEligibility::Decided(eligible) => eligible,
            BonusEligibility::Checklist(checklist) => checklist.is_fully_compliant(),
        }
    }
}

impl From<bool> for BonusEligibility {
    fn from(value: bool) -> Self {
        Self::Decided(value)
    }
}

impl From<ComplianceChecklist> for BonusEligibility {
    fn from(value: ComplianceChecklist) -> Self {
        Self::Checklist(value)
    }
}

impl From<Option<ComplianceChecklist>> for BonusEligibility {
    fn from(value: Option<ComplianceChecklist>) -> Self {
        Self::Checklist(value.unwrap_or_default())
    }
}

/// Combined weekly payout. An ineligible week forfeits every component.
pub fn total_bonus(
    total_revenue: f64,
    five_star_reviews: u32,
    memberships_sold: u32,
    eligibility: impl Into<BonusEligibility>,
) -> BonusBreakdown {
    if !eligibility.into().is_met() {
        return BonusBreakdown::ineligible();
    }

    let base = base_bonus(total_revenue);
    let spifs = spif_bonus(five_star_reviews, memberships_sold);

    BonusBreakdown {
        base,
        spifs,
        total: base + spifs,
        eligible: true,
    }
}

/// Weekly payout split into its components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BonusBreakdown {
    pub base: f64,
    pub spifs: f64,
    pub total: f64,
    pub eligible: bool,
}

impl BonusBreakdown {
    /// Forfeited payout used for non-compliant or unsubmitted weeks.
    pub const fn ineligible() -> Self {
        Self {
            base: 0.0,
            spifs: 0.0,
            total: 0.0,
            eligible: false,
        }
    }
}

impl Default for BonusBreakdown {
    fn default() -> Self {
        Self::ineligible()
    }
}
