use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{
    dto::{LoginRequest, LoginResponse, RegisterRequest},
    password::{hash_password, verify_dummy, verify_password},
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
    users::{
        repo::EmailTaken,
        repo_types::{NewUser, Role, User},
    },
};

pub const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn parse_role(raw: Option<&str>) -> AppResult<Role> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        None => Ok(Role::Client),
        Some(r) => r
            .to_lowercase()
            .parse()
            .map_err(|_| AppError::Validation(format!("Unknown role {r:?}"))),
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".into())
}

pub async fn register(state: &AppState, req: RegisterRequest) -> AppResult<User> {
    let email = normalize_email(&req.email);
    let full_name = req.full_name.trim().to_string();

    if full_name.is_empty() {
        return Err(AppError::Validation("Full name is required".into()));
    }
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::Validation("Password too short".into()));
    }
    let role = parse_role(req.role.as_deref())?;
    let phone = req
        .phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());

    if state.users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict(
            "An account with this email already exists".into(),
        ));
    }

    let password_hash = hash_password(&req.password)?;

    let user = state
        .users
        .create(NewUser {
            id: Uuid::new_v4(),
            full_name,
            email,
            password_hash,
            role,
            phone,
        })
        .await
        .map_err(|e| {
            if e.is::<EmailTaken>() {
                AppError::Conflict("An account with this email already exists".into())
            } else {
                AppError::Internal(e)
            }
        })?;

    info!(user_id = %user.id, email = %user.email, role = %user.role, "user registered");
    Ok(user)
}

pub async fn login(state: &AppState, req: LoginRequest) -> AppResult<LoginResponse> {
    let email = normalize_email(&req.email);

    let Some(user) = state.users.find_by_email(&email).await? else {
        verify_dummy(&req.password);
        warn!(email = %email, "login unknown email");
        return Err(invalid_credentials());
    };

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(invalid_credentials());
    }

    let token = state.jwt.sign(user.id, user.role).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        AppError::Internal(e.into())
    })?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(LoginResponse { token, user })
}
