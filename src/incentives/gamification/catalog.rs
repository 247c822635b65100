use serde::{Deserialize, Serialize};

/// Stable badge identifiers, stored with grants and used to look up catalog
/// entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BadgeCode {
    FirstSteps,
    MoneyMaker,
    ReviewMaster,
    OnFire,
    Unstoppable,
    HighRoller,
    MembershipPro,
    PerfectWeek,
}

impl BadgeCode {
    pub const ALL: [Self; 8] = [
        Self::FirstSteps,
        Self::MoneyMaker,
        Self::ReviewMaster,
        Self::OnFire,
        Self::Unstoppable,
        Self::HighRoller,
        Self::MembershipPro,
        Self::PerfectWeek,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            BadgeCode::FirstSteps => "FIRST_STEPS",
            BadgeCode::MoneyMaker => "MONEY_MAKER",
            BadgeCode::ReviewMaster => "REVIEW_MASTER",
            BadgeCode::OnFire => "ON_FIRE",
            BadgeCode::Unstoppable => "UNSTOPPABLE",
            BadgeCode::HighRoller => "HIGH_ROLLER",
            BadgeCode::MembershipPro => "MEMBERSHIP_PRO",
            BadgeCode::PerfectWeek => "PERFECT_WEEK",
        }
    }

    pub fn from_code(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|badge| badge.code() == value)
    }
}

/// Catalog metadata for one badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeSpec {
    pub code: BadgeCode,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

/// The badge catalog seeded into the badge store at startup.
pub fn standard_catalog() -> Vec<BadgeSpec> {
    vec![
        BadgeSpec {
            code: BadgeCode::FirstSteps,
            name: "First Steps",
            description: "Complete your first job",
            icon: "Star",
        },
        BadgeSpec {
            code: BadgeCode::MoneyMaker,
            name: "Money Maker",
            description: "Earn your first weekly bonus ($7k+)",
            icon: "DollarSign",
        },
        BadgeSpec {
            code: BadgeCode::ReviewMaster,
            name: "Review Master",
            description: "Get 5+ reviews in a single week",
            icon: "Star",
        },
        BadgeSpec {
            code: BadgeCode::OnFire,
            name: "On Fire",
            description: "5 consecutive compliant weeks",
            icon: "Flame",
        },
        BadgeSpec {
            code: BadgeCode::Unstoppable,
            name: "Unstoppable",
            description: "10 consecutive compliant weeks",
            icon: "Zap",
        },
        BadgeSpec {
            code: BadgeCode::HighRoller,
            name: "High Roller",
            description: "Hit $13k+ in a single week",
            icon: "Crown",
        },
        BadgeSpec {
            code: BadgeCode::MembershipPro,
            name: "Membership Pro",
            description: "Sell 5+ memberships in a single week",
            icon: "Users",
        },
        BadgeSpec {
            code: BadgeCode::PerfectWeek,
            name: "Perfect Week",
            description: "$7k+ Revenue AND 100% Compliance",
            icon: "ShieldCheck",
        },
    ]
}
