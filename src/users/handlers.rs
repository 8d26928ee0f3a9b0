use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{dto::UpdateProfileRequest, repo_types::User, services};
use crate::{auth::extractors::AuthUser, error::AppResult, state::AppState};

pub fn user_routes() -> Router<AppState> {
    // `:id` is accepted for route compatibility; the session decides whose profile it is.
    Router::new().route("/api/user/:id", get(get_profile).put(update_profile))
}

#[instrument(skip(state, session), fields(user_id = %session.user_id))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(session): AuthUser,
) -> AppResult<Json<User>> {
    let user = services::get_profile(&state, &session).await?;
    Ok(Json(user))
}

#[instrument(skip(state, session, payload), fields(user_id = %session.user_id))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(session): AuthUser,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> AppResult<Json<User>> {
    let Json(req) = payload?;
    let user = services::update_profile(&state, &session, req).await?;
    Ok(Json(user))
}
