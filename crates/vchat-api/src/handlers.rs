//! Request handlers.

pub mod chat;
pub mod frames;
pub mod health;
pub mod upload;

pub use chat::*;
pub use frames::*;
pub use health::*;
pub use upload::*;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use vchat_models::SessionId;

/// Cookie carrying the opaque per-browser session token.
pub const SESSION_COOKIE: &str = "session_id";

/// Session id presented by the client, if any.
fn presented_session(jar: &CookieJar) -> Option<SessionId> {
    jar.get(SESSION_COOKIE).and_then(|c| c.value().parse().ok())
}

/// Ensure the response carries the session cookie.
fn with_session_cookie(jar: CookieJar, id: SessionId) -> CookieJar {
    let mut cookie = Cookie::new(SESSION_COOKIE, id.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    jar.add(cookie)
}
