//! Authentication and authorization.
//!
//! Form-based login issues an opaque token in an HttpOnly cookie. Two
//! middleware layers guard the application:
//!
//! - [`require_session`] resolves the token, re-reads the user and role from
//!   the database on every request, and attaches a [`CurrentUser`]. Anything
//!   short of a live user ends in a redirect to `/login`.
//! - [`require_role`] runs after it and rejects callers whose role the
//!   configured [`RoleGuard`] does not permit.

use crate::error::WebError;
use crate::forms::{LOGIN_INVALID, LOGIN_REQUIRED, LOGIN_STORE_FAILURE, LoginForm};
use crate::pages;
use crate::state::AppState;
use axum::{
    Extension, Form,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use stockroom_core::{CurrentUser, RoleGuard};
use stockroom_store::{SessionRecord, generate_token};

/// Session gate.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let cookie_name = &state.session_config().cookie_name;
    let Some(token) = session_token(request.headers(), cookie_name) else {
        tracing::debug!(path = %request.uri().path(), "no session cookie; redirecting to login");
        return Ok(Redirect::to("/login").into_response());
    };

    let Some(record) = state.sessions().get(&token).await? else {
        tracing::info!("unknown session token; redirecting to login");
        return Ok(redirect_clearing_session(&state, "/login"));
    };

    let Some(identity) = state.store().find_identity(record.user_id).await? else {
        tracing::info!(
            user_id = record.user_id,
            "session user no longer exists; dropping session"
        );
        state.sessions().remove(&token).await?;
        return Ok(redirect_clearing_session(&state, "/login"));
    };

    state.sessions().refresh(&token, &identity).await?;
    tracing::debug!(user = %identity.username, role = %identity.role, "session verified");

    request.extensions_mut().insert(CurrentUser { identity });
    Ok(next.run(request).await)
}

/// Role gate. Must be layered inside [`require_session`].
pub async fn require_role(
    State(guard): State<RoleGuard>,
    Extension(user): Extension<CurrentUser>,
    request: Request,
    next: Next,
) -> Result<Response, WebError> {
    if !guard.permits(user.role()) {
        tracing::warn!(
            user = %user.username(),
            role = %user.role(),
            method = %request.method(),
            path = %request.uri().path(),
            "access denied"
        );
        return Err(WebError::Forbidden(guard.denial()));
    }
    Ok(next.run(request).await)
}

/// Handler for the login page (GET)
pub async fn login_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    if let Some(token) = session_token(&headers, &state.session_config().cookie_name) {
        if state.sessions().get(&token).await?.is_some() {
            return Ok(Redirect::to("/").into_response());
        }
    }
    Ok(Html(pages::login_page(None, "")).into_response())
}

/// Handler for login form submission (POST)
pub async fn login_submit(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let username = form.username.trim();
    if username.is_empty() || form.password.is_empty() {
        return login_error(StatusCode::UNPROCESSABLE_ENTITY, LOGIN_REQUIRED, username);
    }

    let identity = match state.store().authenticate(username, &form.password).await {
        Ok(Some(identity)) => identity,
        Ok(None) => {
            tracing::info!(user = %username, "login rejected");
            return login_error(StatusCode::UNAUTHORIZED, LOGIN_INVALID, username);
        }
        Err(e) => {
            tracing::error!(error = %e, "login query failed");
            return login_error(StatusCode::INTERNAL_SERVER_ERROR, LOGIN_STORE_FAILURE, username);
        }
    };

    let token = generate_token();
    if let Err(e) = state
        .sessions()
        .insert(&token, SessionRecord::new(&identity))
        .await
    {
        tracing::error!(error = %e, "failed to store session");
        return login_error(StatusCode::INTERNAL_SERVER_ERROR, LOGIN_STORE_FAILURE, username);
    }

    tracing::info!(user = %identity.username, role = %identity.role, "user logged in");
    let session = state.session_config();
    let cookie = session_cookie(&session.cookie_name, &token, session.max_age_secs);
    ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
}

/// Handler for logout
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    match session_token(&headers, &state.session_config().cookie_name) {
        Some(token) => {
            if state.sessions().remove(&token).await? {
                tracing::info!("session cleared");
            } else {
                tracing::info!("logout attempted, but no active session found in store");
            }
        }
        None => tracing::info!("logout attempted without a session cookie"),
    }
    Ok(redirect_clearing_session(&state, "/login"))
}

fn login_error(status: StatusCode, message: &str, username: &str) -> Response {
    (status, Html(pages::login_page(Some(message), username))).into_response()
}

fn redirect_clearing_session(state: &AppState, to: &str) -> Response {
    let cookie = clear_cookie(&state.session_config().cookie_name);
    ([(header::SET_COOKIE, cookie)], Redirect::to(to)).into_response()
}

/// Extract the session token from the request's cookies.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let prefix = format!("{cookie_name}=");
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|cookie| cookie.trim().strip_prefix(prefix.as_str()))
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// `Set-Cookie` value carrying a session token.
pub fn session_cookie(cookie_name: &str, token: &str, max_age_secs: u64) -> String {
    format!("{cookie_name}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_cookie(cookie_name: &str) -> String {
    format!("{cookie_name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_token_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; stockroom_session=abc123; other=1"),
        );
        assert_eq!(
            session_token(&headers, "stockroom_session"),
            Some("abc123".to_string())
        );
        assert_eq!(session_token(&headers, "missing"), None);
    }

    #[test]
    fn test_session_token_ignores_prefix_collisions_and_empty_values() {
        let mut headers = HeaderMap::new();
        headers.append(
            header::COOKIE,
            HeaderValue::from_static("stockroom_session_old=zzz; stockroom_session="),
        );
        headers.append(header::COOKIE, HeaderValue::from_static("stockroom_session=tok"));
        assert_eq!(
            session_token(&headers, "stockroom_session"),
            Some("tok".to_string())
        );
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = session_cookie("sid", "tok", 86_400);
        assert!(cookie.starts_with("sid=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=86400"));

        let cleared = clear_cookie("sid");
        assert!(cleared.starts_with("sid=;"));
        assert!(cleared.contains("Max-Age=0"));
    }
}
