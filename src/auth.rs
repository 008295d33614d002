use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use time::Duration;
use tracing::warn;

use crate::{db::AppState, error::ApiError, users::repo::User};

/// Name of the cookie carrying the opaque session token.
pub const SESSION_COOKIE: &str = "sessionId";

/// Sessions live for seven days from issuance.
const SESSION_TTL: Duration = Duration::days(7);

/// Build the session cookie exactly as registration hands it out.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .max_age(SESSION_TTL)
        .build()
}

/// The authenticated caller, resolved from the `sessionId` cookie before the
/// handler body runs. A missing cookie is rejected without touching the
/// database; an unknown token is rejected after the lookup. Both are 401.
pub struct SessionUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or(ApiError::Unauthorized)?;

        let user = User::find_by_session(&state.db, &token)
            .await?
            .ok_or_else(|| {
                warn!("session cookie does not match any user");
                ApiError::Unauthorized
            })?;

        Ok(SessionUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_carries_path_and_expiry() {
        let cookie = session_cookie("token-value".to_string());
        assert_eq!(cookie.name(), "sessionId");
        assert_eq!(cookie.value(), "token-value");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::days(7)));
    }
}
