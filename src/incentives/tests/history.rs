use super::common::*;
use std::io::Cursor;

use crate::incentives::domain::TechnicianId;
use crate::incentives::history::{HistoryImportError, HistoryImporter};
use crate::incentives::service::IncentiveServiceError;

const FULL_HEADER: &str = "Week,Total Revenue,Jobs Completed,5-Star Reviews,Memberships Sold,Van Cleanliness,Paperwork Submitted,Estimate Follow-ups,Zero Callbacks,No Complaints,No Bad Driving,Drug Screening,No OSHA Violations,80% PACE Training";

fn compliant_row(week: &str, revenue: &str) -> String {
    format!("{week},{revenue},8,2,1,yes,yes,yes,yes,yes,yes,yes,yes,yes")
}

#[test]
fn import_applies_rows_oldest_week_first() {
    let (service, _, _, _) = build_service();
    let technician = enroll(&service, "Marshall Snider");

    let csv = format!(
        "{FULL_HEADER}\n{}\n{}\n{}",
        compliant_row("2024-W03", "9000"),
        compliant_row("2024-W01", "7000"),
        compliant_row("2024-W02", "8000"),
    );
    let report = HistoryImporter::new(&service, technician.id.clone())
        .from_reader(Cursor::new(csv))
        .expect("import succeeds");

    assert_eq!(report.weeks_applied, 3);
    assert_eq!(report.duplicates_ignored, 0);
    assert_eq!(report.first_week, Some(week(2024, 1)));
    assert_eq!(report.last_week, Some(week(2024, 3)));
    assert_eq!(report.final_streak, 3);

    let history = service
        .performance_history(&technician.id)
        .expect("history loads");
    let weeks: Vec<_> = history.iter().map(|record| record.week).collect();
    assert_eq!(weeks, vec![week(2024, 1), week(2024, 2), week(2024, 3)]);
}

#[test]
fn duplicate_weeks_keep_the_first_row() {
    let (service, _, _, _) = build_service();
    let technician = enroll(&service, "Marshall Snider");

    let csv = format!(
        "{FULL_HEADER}\n{}\n{}",
        compliant_row("2024-W01", "9000"),
        compliant_row("2024-W01", "12000"),
    );
    let report = HistoryImporter::new(&service, technician.id.clone())
        .from_reader(Cursor::new(csv))
        .expect("import succeeds");

    assert_eq!(report.weeks_applied, 1);
    assert_eq!(report.duplicates_ignored, 1);

    let history = service
        .performance_history(&technician.id)
        .expect("history loads");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].total_revenue, 9000.0);
}

#[test]
fn missing_compliance_columns_forfeit_the_week() {
    let (service, _, _, _) = build_service();
    let technician = enroll(&service, "Marshall Snider");

    let csv = "Week,Total Revenue,Jobs Completed\n2024-W01,9500,9";
    let report = HistoryImporter::new(&service, technician.id.clone())
        .from_reader(Cursor::new(csv))
        .expect("import succeeds");

    assert_eq!(report.weeks_applied, 1);
    assert_eq!(report.final_streak, 0);

    let history = service
        .performance_history(&technician.id)
        .expect("history loads");
    assert!(!history[0].bonus.eligible);
    assert_eq!(history[0].bonus.total, 0.0);
}

#[test]
fn lenient_flag_spellings_count_as_passing() {
    let (service, _, _, _) = build_service();
    let technician = enroll(&service, "Marshall Snider");

    let csv = format!(
        "{FULL_HEADER}\n2024-W01,8000,8,2,1,Y,TRUE,1,yes,Yes,y,true,YES,1\n2024-W02,8000,8,2,1,no,maybe,,0,false,nah,off,No,"
    );
    let report = HistoryImporter::new(&service, technician.id.clone())
        .from_reader(Cursor::new(csv))
        .expect("import succeeds");

    assert_eq!(report.weeks_applied, 2);
    assert_eq!(report.final_streak, 0);

    let history = service
        .performance_history(&technician.id)
        .expect("history loads");
    assert!(history[0].bonus.eligible);
    assert!(history[0].bonus.total > 0.0);
    assert!(!history[1].bonus.eligible);
}

#[test]
fn blank_counts_import_as_zero() {
    let (service, _, _, _) = build_service();
    let technician = enroll(&service, "Marshall Snider");

    let csv = format!("{FULL_HEADER}\n2024-W01,8000,8,,,yes,yes,yes,yes,yes,yes,yes,yes,yes");
    HistoryImporter::new(&service, technician.id.clone())
        .from_reader(Cursor::new(csv))
        .expect("import succeeds");

    let history = service
        .performance_history(&technician.id)
        .expect("history loads");
    assert_eq!(history[0].five_star_reviews, 0);
    assert_eq!(history[0].memberships_sold, 0);
    assert_eq!(history[0].bonus.spifs, 0.0);
}

#[test]
fn malformed_weeks_abort_before_any_row_applies() {
    let (service, _, _, _) = build_service();
    let technician = enroll(&service, "Marshall Snider");

    let csv = format!(
        "{FULL_HEADER}\n{}\n{}",
        compliant_row("2024-W01", "8000"),
        compliant_row("2024-W99", "8000"),
    );
    match HistoryImporter::new(&service, technician.id.clone()).from_reader(Cursor::new(csv)) {
        Err(HistoryImportError::Week { value, .. }) => assert_eq!(value, "2024-W99"),
        other => panic!("expected a week error, got {other:?}"),
    }

    let history = service
        .performance_history(&technician.id)
        .expect("history loads");
    assert!(history.is_empty());
}

#[test]
fn malformed_revenue_is_a_csv_error() {
    let (service, _, _, _) = build_service();
    let technician = enroll(&service, "Marshall Snider");

    let csv = format!("{FULL_HEADER}\n2024-W01,lots,8,2,1,yes,yes,yes,yes,yes,yes,yes,yes,yes");
    match HistoryImporter::new(&service, technician.id).from_reader(Cursor::new(csv)) {
        Err(HistoryImportError::Csv(_)) => {}
        other => panic!("expected a csv error, got {other:?}"),
    }
}

#[test]
fn import_fails_for_unknown_technicians() {
    let (service, _, _, _) = build_service();

    let ghost = TechnicianId("tech-9999".to_string());
    let csv = format!("{FULL_HEADER}\n{}", compliant_row("2024-W01", "8000"));
    match HistoryImporter::new(&service, ghost).from_reader(Cursor::new(csv)) {
        Err(HistoryImportError::Service(IncentiveServiceError::UnknownTechnician(_))) => {}
        other => panic!("expected a service error, got {other:?}"),
    }
}

#[test]
fn import_awards_each_badge_once() {
    let (service, _, _, _) = build_service();
    let technician = enroll(&service, "Marshall Snider");

    let rows: Vec<String> = (1..=5)
        .map(|n| compliant_row(&format!("2024-W{n:02}"), "8000"))
        .collect();
    let csv = format!("{FULL_HEADER}\n{}", rows.join("\n"));
    let report = HistoryImporter::new(&service, technician.id)
        .from_reader(Cursor::new(csv))
        .expect("import succeeds");

    assert_eq!(report.final_streak, 5);
    let names: Vec<&str> = report
        .badges_awarded
        .iter()
        .map(|badge| badge.name)
        .collect();
    assert!(names.contains(&"First Steps"));
    assert!(names.contains(&"Money Maker"));
    assert!(names.contains(&"Perfect Week"));
    assert!(names.contains(&"On Fire"));
    let mut unique = names.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), names.len());
}

#[test]
fn empty_exports_report_nothing() {
    let (service, _, _, _) = build_service();
    let technician = enroll(&service, "Marshall Snider");

    let report = HistoryImporter::new(&service, technician.id)
        .from_reader(Cursor::new(FULL_HEADER))
        .expect("import succeeds");

    assert_eq!(report.weeks_applied, 0);
    assert_eq!(report.duplicates_ignored, 0);
    assert_eq!(report.first_week, None);
    assert_eq!(report.last_week, None);
    assert!(report.badges_awarded.is_empty());
}
