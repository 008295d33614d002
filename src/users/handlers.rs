use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use axum_extra::extract::cookie::CookieJar;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{session_cookie, SESSION_COOKIE},
    db::AppState,
    error::ApiError,
    users::{
        dto::{CreateUserRequest, RegisterResponse},
        repo::User,
    },
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/users", post(register))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// POST /users. The session cookie is settled before anything else so every
/// outcome, rejections included, carries whatever cookie was just issued.
#[instrument(skip(state, jar, payload))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<CreateUserRequest>,
) -> (
    CookieJar,
    Result<(StatusCode, Json<RegisterResponse>), ApiError>,
) {
    let (session_id, jar) = match jar.get(SESSION_COOKIE) {
        Some(cookie) => (cookie.value().to_string(), jar),
        None => {
            let token = Uuid::new_v4().to_string();
            let jar = jar.add(session_cookie(token.clone()));
            (token, jar)
        }
    };

    (jar, create_user(&state, &session_id, payload).await)
}

async fn create_user(
    state: &AppState,
    session_id: &str,
    payload: CreateUserRequest,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let name = payload
        .name
        .ok_or_else(|| ApiError::Validation("name is required".to_string()))?;
    let email = payload
        .email
        .map(|email| email.trim().to_lowercase())
        .ok_or_else(|| ApiError::Validation("email is required".to_string()))?;

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::Validation(
            "email is not a valid address".to_string(),
        ));
    }

    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::AlreadyExists("user already exists".to_string()));
    }

    let user = User::create(&state.db, &name, &email, session_id).await?;
    info!(user_id = %user.id, email = %user.email, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "user created".to_string(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("jane.doe+diet@sub.example.co"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("jane"));
        assert!(!is_valid_email("jane@"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane doe@example.com"));
    }
}
