use tracing::{error, info};

use super::{dto::UpdateProfileRequest, repo_types::User};
use crate::{
    auth::{
        claims::Session,
        policy::{ensure_allowed, Operation},
    },
    error::{AppError, AppResult},
    state::AppState,
};

pub async fn get_profile(state: &AppState, session: &Session) -> AppResult<User> {
    ensure_allowed(session, Operation::ViewProfile)?;
    state
        .users
        .find_by_id(session.user_id)
        .await?
        .ok_or_else(|| {
            error!(user_id = %session.user_id, "session user not found");
            AppError::NotFound("User not found".into())
        })
}

pub async fn update_profile(
    state: &AppState,
    session: &Session,
    req: UpdateProfileRequest,
) -> AppResult<User> {
    ensure_allowed(session, Operation::UpdateProfile)?;

    let Some(full_name) = req
        .full_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
    else {
        return Err(AppError::Validation("No update fields provided".into()));
    };

    let user = state
        .users
        .update_full_name(session.user_id, full_name)
        .await?
        .ok_or_else(|| {
            error!(user_id = %session.user_id, "session user not found");
            AppError::NotFound("User not found".into())
        })?;
    info!(user_id = %user.id, "profile updated");
    Ok(user)
}
