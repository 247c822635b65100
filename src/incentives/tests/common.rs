use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::incentives::compliance::ComplianceChecklist;
use crate::incentives::domain::{Technician, TechnicianId, WeekKey, WeeklySubmission};
use crate::incentives::memory::{
    InMemoryBadgeRepository, InMemoryPerformanceRepository, InMemoryTechnicianRepository,
};
use crate::incentives::repository::{
    PerformanceRepository, RepositoryError, TechnicianRepository, WeeklyPerformance,
};
use crate::incentives::router::incentive_router;
use crate::incentives::service::IncentiveService;

pub(super) type TestService = IncentiveService<
    InMemoryTechnicianRepository,
    InMemoryPerformanceRepository,
    InMemoryBadgeRepository,
>;

pub(super) fn week(year: i32, week: u32) -> WeekKey {
    WeekKey::new(year, week).expect("valid week")
}

pub(super) fn full_checklist() -> ComplianceChecklist {
    ComplianceChecklist {
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

pub(super) fn failing_checklist() -> ComplianceChecklist {
    let mut checklist = full_checklist();
    checklist.drug_screening = false;
    checklist
}

pub(super) fn compliant_submission(
    id: &TechnicianId,
    week: WeekKey,
    revenue: f64,
) -> WeeklySubmission {
    WeeklySubmission {
        technician_id: id.clone(),
        week,
        total_revenue: revenue,
        jobs_completed: 10,
        five_star_reviews: 3,
        memberships_sold: 2,
        compliance: full_checklist(),
    }
}

pub(super) fn build_service() -> (
    TestService,
    Arc<InMemoryTechnicianRepository>,
    Arc<InMemoryPerformanceRepository>,
    Arc<InMemoryBadgeRepository>,
) {
    let technicians = Arc::new(InMemoryTechnicianRepository::default());
    let performance = Arc::new(InMemoryPerformanceRepository::default());
    let badges = Arc::new(InMemoryBadgeRepository::default());
    let service = IncentiveService::new(technicians.clone(), performance.clone(), badges.clone());
    service.seed_badge_catalog().expect("catalog seeds");
    (service, technicians, performance, badges)
}

pub(super) fn enroll(service: &TestService, name: &str) -> Technician {
    service.enroll_technician(name).expect("enrollment succeeds")
}

pub(super) fn incentive_router_with_service(service: TestService) -> axum::Router {
    incentive_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) struct ConflictTechnicians;

impl TechnicianRepository for ConflictTechnicians {
    fn insert(&self, _technician: Technician) -> Result<(), RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &TechnicianId) -> Result<Option<Technician>, RepositoryError> {
        Ok(None)
    }

    fn roster(&self) -> Result<Vec<Technician>, RepositoryError> {
        Ok(Vec::new())
    }

    fn set_streak(&self, _id: &TechnicianId, _streak: u32) -> Result<(), RepositoryError> {
        Err(RepositoryError::NotFound)
    }
}

pub(super) struct ConflictPerformance;

impl PerformanceRepository for ConflictPerformance {
    fn upsert(&self, _record: WeeklyPerformance) -> Result<(), RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(
        &self,
        _id: &TechnicianId,
        _week: WeekKey,
    ) -> Result<Option<WeeklyPerformance>, RepositoryError> {
        Ok(None)
    }

    fn history(&self, _id: &TechnicianId) -> Result<Vec<WeeklyPerformance>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableTechnicians;

impl TechnicianRepository for UnavailableTechnicians {
    fn insert(&self, _technician: Technician) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &TechnicianId) -> Result<Option<Technician>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn roster(&self) -> Result<Vec<Technician>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn set_streak(&self, _id: &TechnicianId, _streak: u32) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
