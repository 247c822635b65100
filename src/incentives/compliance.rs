use serde::{Deserialize, Serialize};

/// Weekly conduct checklist gating the entire bonus payout.
///
/// The nine items are a closed set. Fields absent from an inbound payload
/// deserialize as `false`, so partial checklists always evaluate fail-closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceChecklist {
    pub van_cleanliness: bool,
    pub paperwork_submitted: bool,
    pub estimate_followups: bool,
    pub zero_callbacks: bool,
    pub no_complaints: bool,
    pub no_bad_driving: bool,
    pub drug_screening: bool,
    pub no_osha_violations: bool,
    pub pace_training: bool,
}

impl ComplianceChecklist {
    /// Checklist with every item passing.
    pub fn all_passing() -> Self {
        Self {
            van_cleanliness: true,
            paperwork_submitted: true,
            estimate_followups: true,
            zero_callbacks: true,
            no_complaints: true,
            no_bad_driving: true,
            drug_screening: true,
            no_osha_violations: true,
            pace_training: true,
        }
    }

    pub fn status_of(&self, item: ComplianceItem) -> bool {
        match item {
            ComplianceItem::VanCleanliness => self.van_cleanliness,
            ComplianceItem::PaperworkSubmitted => self.paperwork_submitted,
            ComplianceItem::EstimateFollowups => self.estimate_followups,
            ComplianceItem::ZeroCallbacks => self.zero_callbacks,
            ComplianceItem::NoComplaints => self.no_complaints,
            ComplianceItem::NoBadDriving => self.no_bad_driving,
            ComplianceItem::DrugScreening => self.drug_screening,
            ComplianceItem::NoOshaViolations => self.no_osha_violations,
            ComplianceItem::PaceTraining => self.pace_training,
        }
    }

    /// True only when all nine items pass. No partial credit.
    pub fn is_fully_compliant(&self) -> bool {
        ComplianceItem::ALL
            .iter()
            .all(|item| self.status_of(*item))
    }

    /// Items currently failing, in display order.
    pub fn failed_items(&self) -> Vec<ComplianceItem> {
        ComplianceItem::ALL
            .iter()
            .copied()
            .filter(|item| !self.status_of(*item))
            .collect()
    }
}

/// The nine tracked conduct items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceItem {
    VanCleanliness,
    PaperworkSubmitted,
    EstimateFollowups,
    ZeroCallbacks,
    NoComplaints,
    NoBadDriving,
    DrugScreening,
    NoOshaViolations,
    PaceTraining,
}

impl ComplianceItem {
    pub const ALL: [Self; 9] = [
        Self::VanCleanliness,
        Self::PaperworkSubmitted,
        Self::EstimateFollowups,
        Self::ZeroCallbacks,
        Self::NoComplaints,
        Self::NoBadDriving,
        Self::DrugScreening,
        Self::NoOshaViolations,
        Self::PaceTraining,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ComplianceItem::VanCleanliness => "Van Cleanliness",
            ComplianceItem::PaperworkSubmitted => "Paperwork Submitted",
            ComplianceItem::EstimateFollowups => "Estimate Follow-ups",
            ComplianceItem::ZeroCallbacks => "Zero Callbacks",
            ComplianceItem::NoComplaints => "No Complaints",
            ComplianceItem::NoBadDriving => "No Bad Driving",
            ComplianceItem::DrugScreening => "Drug Screening",
            ComplianceItem::NoOshaViolations => "No OSHA Violations",
            ComplianceItem::PaceTraining => "80% PACE Training",
        }
    }
}
