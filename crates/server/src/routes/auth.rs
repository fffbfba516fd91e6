use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use service::{
    auth::{domain::LoginInput, AuthError},
    backend::Account,
};
use tracing::{debug, warn};

use crate::errors::ApiError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session";

#[derive(Serialize)]
pub struct LoginOutput {
    pub account: Account,
    /// Same value as the cookie, for clients that send `Authorization: Bearer`.
    pub token: String,
    pub expire: String,
}

/// Session secret from `Authorization: Bearer`, else the session cookie.
///
/// A present but malformed Authorization header is rejected rather than
/// falling back to the cookie.
pub fn session_secret(headers: &HeaderMap, jar: &CookieJar) -> Result<Option<String>, ApiError> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let raw = value.to_str().map_err(|_| ApiError::unauthorized("invalid Authorization header"))?;
        return match raw.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
            _ => Err(ApiError::unauthorized("expected Authorization: Bearer <token>")),
        };
    }
    Ok(jar.get(SESSION_COOKIE).map(|c| c.value().to_string()).filter(|v| !v.is_empty()))
}

fn require_secret(headers: &HeaderMap, jar: &CookieJar) -> Result<String, ApiError> {
    session_secret(headers, jar)?.ok_or_else(|| ApiError::unauthorized("not logged in"))
}

fn session_cookie(secret: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, secret);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginOutput>), ApiError> {
    let Json(input) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let session = state.auth.login(input).await?;
    let jar = jar.add(session_cookie(session.secret.clone()));
    Ok((jar, Json(LoginOutput { account: session.account, token: session.secret, expire: session.expire })))
}

fn removal_cookie() -> Cookie<'static> {
    let mut removal = Cookie::from(SESSION_COOKIE);
    removal.set_path("/");
    removal
}

/// End the session. A session the backend no longer knows still answers 401,
/// but the stale cookie is cleared either way.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap, jar: CookieJar) -> Result<Response, ApiError> {
    let secret = require_secret(&headers, &jar)?;
    match state.auth.logout(&secret).await {
        Ok(()) => Ok((jar.remove(removal_cookie()), StatusCode::NO_CONTENT).into_response()),
        Err(AuthError::Unauthorized) => {
            Ok((jar.remove(removal_cookie()), ApiError::from(AuthError::Unauthorized)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn me(State(state): State<AppState>, headers: HeaderMap, jar: CookieJar) -> Result<Json<Account>, ApiError> {
    let secret = require_secret(&headers, &jar)?;
    Ok(Json(state.auth.current_account(&secret).await?))
}

/// Resolve the caller's account and stash it in request extensions.
pub async fn require_session(State(state): State<AppState>, mut req: Request, next: Next) -> Result<Response, ApiError> {
    let path = req.uri().path().to_string();
    let jar = CookieJar::from_headers(req.headers());
    let secret = match session_secret(req.headers(), &jar)? {
        Some(s) => s,
        None => {
            warn!(%path, "missing session credential");
            return Err(ApiError::unauthorized("not logged in"));
        }
    };
    let account = state.auth.current_account(&secret).await.map_err(|e| {
        warn!(%path, error = %e, "session rejected");
        ApiError::from(e)
    })?;
    debug!(%path, user_id = %account.id, "session ok");
    req.extensions_mut().insert(account);
    Ok(next.run(req).await)
}
