//! CSV row shapes for historical weekly performance exports.

use std::io::Read;

use serde::{Deserialize, Deserializer};

use crate::incentives::compliance::ComplianceChecklist;

/// One exported row. Review, membership, and compliance columns are optional
/// and default to their fail-closed values when blank or missing.
#[derive(Debug, Deserialize)]
pub(crate) struct HistoryRow {
    #[serde(rename = "Week")]
    pub week: String,
    #[serde(rename = "Total Revenue")]
    pub total_revenue: f64,
    #[serde(rename = "Jobs Completed")]
    pub jobs_completed: u32,
    #[serde(rename = "5-Star Reviews", default, deserialize_with = "count_or_zero")]
    pub five_star_reviews: u32,
    #[serde(rename = "Memberships Sold", default, deserialize_with = "count_or_zero")]
    pub memberships_sold: u32,
    #[serde(rename = "Van Cleanliness", default, deserialize_with = "yes_no_flag")]
    pub van_cleanliness: bool,
    #[serde(rename = "Paperwork Submitted", default, deserialize_with = "yes_no_flag")]
    pub paperwork_submitted: bool,
    #[serde(rename = "Estimate Follow-ups", default, deserialize_with = "yes_no_flag")]
    pub estimate_followups: bool,
    #[serde(rename = "Zero Callbacks", default, deserialize_with = "yes_no_flag")]
    pub zero_callbacks: bool,
    #[serde(rename = "No Complaints", default, deserialize_with = "yes_no_flag")]
    pub no_complaints: bool,
    #[serde(rename = "No Bad Driving", default, deserialize_with = "yes_no_flag")]
    pub no_bad_driving: bool,
    #[serde(rename = "Drug Screening", default, deserialize_with = "yes_no_flag")]
    pub drug_screening: bool,
    #[serde(rename = "No OSHA Violations", default, deserialize_with = "yes_no_flag")]
    pub no_osha_violations: bool,
    #[serde(rename = "80% PACE Training", default, deserialize_with = "yes_no_flag")]
    pub pace_training: bool,
}

impl HistoryRow {
    pub(crate) fn checklist(&self) -> ComplianceChecklist {
        ComplianceChecklist {
            van_cleanliness: self.van_cleanliness,
            paperwork_submitted: self.paperwork_submitted,
            estimate_followups: self.estimate_followups,
            zero_callbacks: self.zero_callbacks,
            no_complaints: self.no_complaints,
            no_bad_driving: self.no_bad_driving,
            drug_screening: self.drug_screening,
            no_osha_violations: self.no_osha_violations,
            pace_training: self.pace_training,
        }
    }
}

/// Builds the CSV reader all history imports share.
pub(crate) fn history_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn count_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(0),
        Some(raw) => raw.parse().map_err(serde::de::Error::custom),
    }
}

fn yes_no_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map_or(false, |raw| {
        matches!(
            raw.trim().to_ascii_lowercase().as_str(),
            "yes" | "y" | "true" | "1"
        )
    }))
}
