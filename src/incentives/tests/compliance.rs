use super::common::*;
use crate::incentives::compliance::{ComplianceChecklist, ComplianceItem};

#[test]
fn all_passing_checklist_is_fully_compliant() {
    let checklist = ComplianceChecklist::all_passing();
    assert!(checklist.is_fully_compliant());
    assert!(checklist.failed_items().is_empty());
    assert_eq!(checklist, full_checklist());
}

#[test]
fn default_checklist_fails_every_item() {
    let checklist = ComplianceChecklist::default();
    assert!(!checklist.is_fully_compliant());
    assert_eq!(checklist.failed_items().len(), ComplianceItem::ALL.len());
}

#[test]
fn a_single_failure_forfeits_compliance() {
    let checklist = failing_checklist();
    assert!(!checklist.is_fully_compliant());
    assert_eq!(checklist.failed_items(), vec![ComplianceItem::DrugScreening]);
    assert!(!checklist.status_of(ComplianceItem::DrugScreening));
    assert!(checklist.status_of(ComplianceItem::ZeroCallbacks));
}

#[test]
fn checklist_covers_nine_fixed_items() {
    assert_eq!(ComplianceItem::ALL.len(), 9);
    let mut checklist = ComplianceChecklist::default();
    checklist.van_cleanliness = true;
    checklist.paperwork_submitted = true;
    checklist.estimate_followups = true;
    checklist.zero_callbacks = true;
    checklist.no_complaints = true;
    checklist.no_bad_driving = true;
    checklist.drug_screening = true;
    checklist.no_osha_violations = true;
    checklist.pace_training = true;
    assert!(checklist.is_fully_compliant());
}

#[test]
fn items_carry_their_display_labels() {
    assert_eq!(ComplianceItem::VanCleanliness.label(), "Van Cleanliness");
    assert_eq!(ComplianceItem::EstimateFollowups.label(), "Estimate Follow-ups");
    assert_eq!(ComplianceItem::DrugScreening.label(), "Drug Screening");
    assert_eq!(ComplianceItem::NoOshaViolations.label(), "No OSHA Violations");
    assert_eq!(ComplianceItem::PaceTraining.label(), "80% PACE Training");
}

#[test]
fn missing_json_fields_default_to_failing() {
    let empty: ComplianceChecklist = serde_json::from_str("{}").expect("empty object parses");
    assert!(!empty.is_fully_compliant());

    let partial: ComplianceChecklist =
        serde_json::from_str(r#"{"van_cleanliness": true}"#).expect("partial object parses");
    assert!(partial.van_cleanliness);
    assert!(!partial.is_fully_compliant());
    assert_eq!(partial.failed_items().len(), 8);
}
