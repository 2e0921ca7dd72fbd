//! Session-based authentication and authorization.
//!
//! Passwords are stored as argon2 PHC strings and never leave the service.
//! Clients hold an opaque bearer token `"{session_id}.{secret}"`; the secret
//! is checked with a constant-time comparison to mitigate timing attacks.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use subtle::ConstantTimeEq;

use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{Session, User};
use crate::AppState;

/// Role label granting access to the admin console.
pub const ADMIN_ROLE: &str = "admin";

/// The authenticated caller, injected as a request extension by
/// [`session_auth_layer`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub roles: Vec<String>,
    pub session_id: String,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == ADMIN_ROLE)
    }
}

/// Hash a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against a stored PHC string.
pub fn verify_password(stored_hash: &str, password: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Issue a new session for a user and return the bearer token.
pub async fn issue_session(
    repo: &Repository,
    user_id: &str,
    ttl_hours: i64,
) -> Result<String, AppError> {
    let now = Utc::now();
    let session = Session {
        id: uuid::Uuid::new_v4().to_string(),
        secret: generate_secret(),
        user_id: user_id.to_string(),
        created_at: now.to_rfc3339(),
        expires_at: (now + Duration::hours(ttl_hours)).to_rfc3339(),
    };

    repo.insert_session(&session).await?;
    tracing::debug!("Issued session {} for user {}", session.id, user_id);

    Ok(format!("{}.{}", session.id, session.secret))
}

/// Resolve a bearer token to the authenticated caller.
///
/// Returns `Ok(None)` for malformed, unknown, mismatched, or expired tokens.
/// Expired sessions are deleted on touch. Roles are re-read from the store on
/// every call so a revoked admin loses access immediately.
pub async fn validate_token(
    repo: &Repository,
    token: &str,
) -> Result<Option<CurrentUser>, AppError> {
    let Some((session_id, secret)) = token.split_once('.') else {
        return Ok(None);
    };

    let Some(session) = repo.get_session(session_id).await? else {
        return Ok(None);
    };

    if !constant_time_compare(secret, &session.secret) {
        return Ok(None);
    }

    let expired = DateTime::parse_from_rfc3339(&session.expires_at)
        .map(|t| t.with_timezone(&Utc) <= Utc::now())
        .unwrap_or(true);
    if expired {
        repo.delete_session(&session.id).await?;
        return Ok(None);
    }

    let Some(user) = repo.get_user(&session.user_id).await? else {
        return Ok(None);
    };
    let roles = repo.list_roles(&user.id).await?;

    Ok(Some(CurrentUser {
        user,
        roles,
        session_id: session.id,
    }))
}

/// Middleware requiring a valid session; injects [`CurrentUser`].
pub async fn session_auth_layer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string());

    let Some(token) = token else {
        return AppError::Unauthorized("Missing session token".to_string()).into_response();
    };

    match validate_token(&state.repo, &token).await {
        Ok(Some(current_user)) => {
            request.extensions_mut().insert(current_user);
            next.run(request).await
        }
        Ok(None) => {
            AppError::Unauthorized("Invalid or expired session token".to_string()).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Middleware requiring the admin role; must run after [`session_auth_layer`].
pub async fn require_admin(request: Request, next: Next) -> Response {
    let is_admin = request
        .extensions()
        .get::<CurrentUser>()
        .map(CurrentUser::is_admin)
        .unwrap_or(false);

    if is_admin {
        next.run(request).await
    } else {
        AppError::Forbidden("Administrator access required".to_string()).into_response()
    }
}

/// Generate a 256-bit URL-safe session secret.
fn generate_secret() -> String {
    let mut buf = [0u8; 32];
    let _ = getrandom::getrandom(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buf)
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    // Constant-time comparison
    a_bytes.ct_eq(b_bytes).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("session-secret-1", "session-secret-1"));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("session-secret-1", "session-secret-2"));
    }

    #[test]
    fn test_constant_time_compare_different_lengths() {
        assert!(!constant_time_compare("short", "much-longer-secret"));
    }

    #[test]
    fn test_generate_secret_is_urlsafe_and_unique() {
        let a = generate_secret();
        let b = generate_secret();
        assert_ne!(a, b);
        // 32 bytes -> 43 base64url chars, no padding
        assert_eq!(a.len(), 43);
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "correct horse battery"));
        assert!(!verify_password(&hash, "wrong password"));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("not-a-phc-string", "anything"));
    }
}
