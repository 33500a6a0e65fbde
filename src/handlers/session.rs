use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};

use crate::middleware::gatekeeper::PUBLIC_ROOT;
use crate::state::AppState;

/// Set-Cookie value that expires the auth cookie immediately
pub fn expired_cookie(name: &str, secure: bool) -> String {
    let mut cookie = format!("{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax", name);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// POST /logout - drop the auth cookie and go back to the public root
pub async fn logout(State(state): State<AppState>) -> Response {
    let security = &state.config.security;
    let cookie = expired_cookie(&security.cookie_name, security.cookie_secure);

    let mut response = Redirect::to(PUBLIC_ROOT).into_response();
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
        Err(e) => tracing::error!("Invalid logout cookie header: {}", e),
    }
    tracing::debug!("Session cookie cleared");
    response
}
