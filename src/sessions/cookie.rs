use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Session id carried by the request, if any.
pub fn session_id<'a>(jar: &'a CookieJar, name: &str) -> Option<&'a str> {
    jar.get(name).map(|c| c.value())
}

/// Adds the session cookie after a successful save.
pub fn with_session_cookie(jar: CookieJar, name: &str, id: &str, ttl: Duration) -> CookieJar {
    let cookie = Cookie::build((name.to_string(), id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(ttl);
    jar.add(cookie)
}
