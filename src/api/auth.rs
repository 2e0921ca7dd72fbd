//! Authentication API endpoints.

use axum::{extract::State, Extension, Json};
use chrono::Utc;

use super::{success, ApiResult};
use crate::auth::{self, CurrentUser};
use crate::db::NewUser;
use crate::errors::AppError;
use crate::models::{CurrentSessionResponse, LoginRequest, SessionResponse, SignupRequest};
use crate::validation;
use crate::AppState;

/// POST /api/auth/signup - Create an account and establish a session.
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> ApiResult<SessionResponse> {
    let email = request.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    if request.password.is_empty() {
        return Err(AppError::Validation("Password is required".to_string()));
    }

    let age = validation::age_in_years(request.birth_date, Utc::now().date_naive());
    if age < validation::MINIMUM_AGE {
        return Err(AppError::Validation(
            "You must be 18 or older to sign up".to_string(),
        ));
    }

    let cpf = match request.cpf.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(validation::normalize_cpf(raw).ok_or_else(|| {
            AppError::Validation("CPF must contain exactly 11 digits".to_string())
        })?),
        None => None,
    };

    if state.repo.get_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email is already registered".to_string()));
    }

    let password_hash = auth::hash_password(&request.password)?;
    let name = non_empty(request.name);
    let phone = non_empty(request.phone);

    let user = state
        .repo
        .create_user(&NewUser {
            email: email.clone(),
            password_hash,
            name,
            cpf,
            phone,
            birth_date: request.birth_date,
        })
        .await?;

    if state.config.is_admin_email(&email) {
        state.repo.add_role(&user.id, auth::ADMIN_ROLE).await?;
    }

    let token = auth::issue_session(&state.repo, &user.id, state.config.session_ttl_hours).await?;
    let is_admin = state
        .repo
        .list_roles(&user.id)
        .await?
        .iter()
        .any(|r| r == auth::ADMIN_ROLE);

    tracing::info!("New account registered: {}", user.id);

    success(SessionResponse {
        token,
        user,
        is_admin,
    })
}

/// POST /api/auth/login - Verify credentials and establish a session.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<SessionResponse> {
    let email = request.email.trim().to_lowercase();

    let user = state.repo.get_user_by_email(&email).await?;
    let Some(user) = user else {
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    };

    if !auth::verify_password(&user.password_hash, &request.password) {
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let token = auth::issue_session(&state.repo, &user.id, state.config.session_ttl_hours).await?;
    let is_admin = state
        .repo
        .list_roles(&user.id)
        .await?
        .iter()
        .any(|r| r == auth::ADMIN_ROLE);

    tracing::info!("User logged in: {}", user.id);

    success(SessionResponse {
        token,
        user,
        is_admin,
    })
}

/// POST /api/auth/logout - Invalidate the current session.
pub async fn logout(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> ApiResult<()> {
    state.repo.delete_session(&current_user.session_id).await?;
    tracing::info!("User logged out: {}", current_user.user.id);
    success(())
}

/// GET /api/auth/session - Return the current user for session restoration.
pub async fn get_session(
    Extension(current_user): Extension<CurrentUser>,
) -> ApiResult<CurrentSessionResponse> {
    let is_admin = current_user.is_admin();
    success(CurrentSessionResponse {
        user: current_user.user,
        is_admin,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
