use std::io::Cursor;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::incentives::domain::{TechnicianId, WeekKey, WeeklySubmission};
use crate::incentives::history::{HistoryImportError, HistoryImporter};
use crate::incentives::repository::{
    BadgeRepository, PerformanceRepository, RepositoryError, TechnicianRepository,
};
use crate::incentives::service::{IncentiveService, IncentiveServiceError};

/// Routes for enrollment, weekly submissions, goals, dashboards, and history
/// imports.
pub fn incentive_router<T, P, B>(service: Arc<IncentiveService<T, P, B>>) -> Router
where
    T: TechnicianRepository + 'static,
    P: PerformanceRepository + 'static,
    B: BadgeRepository + 'static,
{
    Router::new()
        .route("/api/v1/technicians", post(enroll_technician).get(roster))
        .route("/api/v1/performance", post(submit_week))
        .route("/api/v1/gamification", post(evaluate_gamification))
        .route(
            "/api/v1/technicians/:technician_id/goal",
            put(set_weekly_goal),
        )
        .route(
            "/api/v1/technicians/:technician_id/dashboard",
            get(week_dashboard),
        )
        .route(
            "/api/v1/technicians/:technician_id/history",
            post(import_history),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnrollTechnicianRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EvaluateGamificationRequest {
    pub technician_id: TechnicianId,
    #[serde(default)]
    pub week: Option<WeekKey>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WeeklyGoalRequest {
    pub week: WeekKey,
    pub revenue_goal: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DashboardQuery {
    #[serde(default)]
    pub week: Option<WeekKey>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryImportRequest {
    pub csv: String,
}

pub(crate) async fn enroll_technician<T, P, B>(
    State(service): State<Arc<IncentiveService<T, P, B>>>,
    Json(payload): Json<EnrollTechnicianRequest>,
) -> Response
where
    T: TechnicianRepository,
    P: PerformanceRepository,
    B: BadgeRepository,
{
    match service.enroll_technician(&payload.name) {
        Ok(technician) => (StatusCode::CREATED, Json(technician)).into_response(),
        Err(error @ IncentiveServiceError::EmptyName) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
        Err(IncentiveServiceError::Repository(RepositoryError::Conflict)) => (
            StatusCode::CONFLICT,
            Json(json!({ "error": "technician already enrolled" })),
        )
            .into_response(),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}

pub(crate) async fn roster<T, P, B>(
    State(service): State<Arc<IncentiveService<T, P, B>>>,
) -> Response
where
    T: TechnicianRepository,
    P: PerformanceRepository,
    B: BadgeRepository,
{
    match service.roster() {
        Ok(technicians) => (StatusCode::OK, Json(technicians)).into_response(),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}

pub(crate) async fn submit_week<T, P, B>(
    State(service): State<Arc<IncentiveService<T, P, B>>>,
    Json(submission): Json<WeeklySubmission>,
) -> Response
where
    T: TechnicianRepository,
    P: PerformanceRepository,
    B: BadgeRepository,
{
    match service.submit_week(submission) {
        Ok(outcome) => (StatusCode::CREATED, Json(outcome)).into_response(),
        Err(error @ IncentiveServiceError::UnknownTechnician(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
        Err(IncentiveServiceError::Repository(RepositoryError::Conflict)) => (
            StatusCode::CONFLICT,
            Json(json!({ "error": "week already recorded" })),
        )
            .into_response(),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}

pub(crate) async fn evaluate_gamification<T, P, B>(
    State(service): State<Arc<IncentiveService<T, P, B>>>,
    Json(payload): Json<EvaluateGamificationRequest>,
) -> Response
where
    T: TechnicianRepository,
    P: PerformanceRepository,
    B: BadgeRepository,
{
    match service.award_gamification(&payload.technician_id, payload.week) {
        Ok(Some(outcome)) => (StatusCode::OK, Json(outcome)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "no performance recorded for the requested week" })),
        )
            .into_response(),
        Err(error @ IncentiveServiceError::UnknownTechnician(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}

pub(crate) async fn set_weekly_goal<T, P, B>(
    State(service): State<Arc<IncentiveService<T, P, B>>>,
    Path(technician_id): Path<String>,
    Json(payload): Json<WeeklyGoalRequest>,
) -> Response
where
    T: TechnicianRepository,
    P: PerformanceRepository,
    B: BadgeRepository,
{
    let technician_id = TechnicianId(technician_id);
    match service.set_weekly_goal(&technician_id, payload.week, payload.revenue_goal) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error @ IncentiveServiceError::UnknownTechnician(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}

pub(crate) async fn week_dashboard<T, P, B>(
    State(service): State<Arc<IncentiveService<T, P, B>>>,
    Path(technician_id): Path<String>,
    Query(query): Query<DashboardQuery>,
) -> Response
where
    T: TechnicianRepository,
    P: PerformanceRepository,
    B: BadgeRepository,
{
    let technician_id = TechnicianId(technician_id);
    match service.week_dashboard(&technician_id, query.week) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error @ IncentiveServiceError::UnknownTechnician(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}

pub(crate) async fn import_history<T, P, B>(
    State(service): State<Arc<IncentiveService<T, P, B>>>,
    Path(technician_id): Path<String>,
    Json(payload): Json<HistoryImportRequest>,
) -> Response
where
    T: TechnicianRepository,
    P: PerformanceRepository,
    B: BadgeRepository,
{
    let technician_id = TechnicianId(technician_id);
    let importer = HistoryImporter::new(&service, technician_id);
    match importer.from_reader(Cursor::new(payload.csv)) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error @ (HistoryImportError::Csv(_) | HistoryImportError::Week { .. })) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
        Err(HistoryImportError::Service(error @ IncentiveServiceError::UnknownTechnician(_))) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}
