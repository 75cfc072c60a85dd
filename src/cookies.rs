//! The access-token cookie and relaying of upstream cookies.
//!
//! The access token is the only cookie this server writes. Everything upstream sets
//! (refresh cookie and friends) is passed to the browser byte for byte.

use crate::config::SessionConfig;
use rocket::Response;
use rocket::http::{Cookie, CookieJar, SameSite};
use rocket::time::Duration;

fn access_token_cookie(settings: &SessionConfig, value: String) -> Cookie<'static> {
    Cookie::build((settings.cookie_name.clone(), value))
        .http_only(true)
        .secure(settings.cookie_secure)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

pub fn set_access_token_cookie(jar: &CookieJar<'_>, settings: &SessionConfig, token: &str, expires_in_seconds: i64) {
    let mut cookie = access_token_cookie(settings, token.to_string());
    cookie.set_max_age(Duration::seconds(expires_in_seconds));
    jar.add(cookie);
}

/// Emits an expired cookie even when the request carried none, so the browser always drops it.
pub fn delete_access_token_cookie(jar: &CookieJar<'_>, settings: &SessionConfig) {
    let mut cookie = access_token_cookie(settings, String::new());
    cookie.make_removal();
    jar.add(cookie);
}

/// Raw upstream `Set-Cookie` values waiting to be appended to the outgoing response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpstreamCookies(Vec<String>);

impl UpstreamCookies {
    pub fn apply(self, response: &mut Response<'_>) {
        for value in self.0 {
            response.adjoin_raw_header("Set-Cookie", value);
        }
    }
}

pub fn copy_set_cookies_from_upstream(set_cookies: &[String]) -> UpstreamCookies {
    UpstreamCookies(set_cookies.iter().filter(|value| !value.is_empty()).cloned().collect())
}
