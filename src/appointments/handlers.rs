use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, patch, put},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{CreateAppointmentRequest, ListAppointmentsQuery, UpdateAppointmentRequest},
    repo_types::{Appointment, SortOrder},
    services,
};
use crate::{auth::extractors::AuthUser, error::AppResult, state::AppState};

pub fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/appointments",
            get(list_appointments).post(create_appointment),
        )
        .route("/api/appointment/user/:id", get(list_my_appointments))
        .route("/api/appointments/:id", put(update_appointment))
        .route("/api/appointments/:id/cancel", patch(cancel_appointment))
}

/// GET /api/appointments, oldest first.
#[instrument(skip(state, session), fields(user_id = %session.user_id, role = %session.role))]
pub async fn list_appointments(
    State(state): State<AppState>,
    AuthUser(session): AuthUser,
    query: Result<Query<ListAppointmentsQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Appointment>>> {
    let Query(q) = query?;
    let items = services::list(&state, &session, &q, SortOrder::StartAscending).await?;
    Ok(Json(items))
}

/// GET /api/appointment/user/:id, newest first. The path id is not consulted;
/// scoping comes from the session.
#[instrument(skip(state, session), fields(user_id = %session.user_id, role = %session.role))]
pub async fn list_my_appointments(
    State(state): State<AppState>,
    AuthUser(session): AuthUser,
    query: Result<Query<ListAppointmentsQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Appointment>>> {
    let Query(q) = query?;
    let items = services::list(&state, &session, &q, SortOrder::StartDescending).await?;
    Ok(Json(items))
}

#[instrument(skip(state, session, payload), fields(user_id = %session.user_id))]
pub async fn create_appointment(
    State(state): State<AppState>,
    AuthUser(session): AuthUser,
    payload: Result<Json<CreateAppointmentRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Appointment>)> {
    let Json(req) = payload?;
    let apt = services::create(&state, &session, req).await?;
    Ok((StatusCode::CREATED, Json(apt)))
}

#[instrument(skip(state, session, payload), fields(user_id = %session.user_id))]
pub async fn update_appointment(
    State(state): State<AppState>,
    AuthUser(session): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateAppointmentRequest>, JsonRejection>,
) -> AppResult<Json<Appointment>> {
    let Json(req) = payload?;
    let apt = services::update(&state, &session, &id, req).await?;
    Ok(Json(apt))
}

#[instrument(skip(state, session), fields(user_id = %session.user_id))]
pub async fn cancel_appointment(
    State(state): State<AppState>,
    AuthUser(session): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Appointment>> {
    let apt = services::cancel(&state, &session, &id).await?;
    Ok(Json(apt))
}
