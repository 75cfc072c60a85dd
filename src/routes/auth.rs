use crate::config::{Config, SessionConfig};
use crate::cookies::{copy_set_cookies_from_upstream, delete_access_token_cookie, set_access_token_cookie};
use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::middleware::rate_limit::{AuthRateLimit, RateLimit, RateLimitError};
use crate::models::auth::{GoogleCallbackRequest, GoogleLoginResponse, GoogleLoginUpstream, LocalLoginRequest, LogoutResponse, TokenResponse};
use crate::routes::error::TooManyRequests;
use crate::routes::proxy::ProxyJson;
use crate::upstream::{SharedUpstream, UpstreamCredentials, UpstreamRequest, UpstreamResponse};
use rocket::http::{CookieJar, Status};
use rocket::serde::json::Json;
use rocket::{State, get, post, routes};
use serde_json::{Value, json};
use tracing::{error, warn};
use validator::Validate;

const GOOGLE_LOGIN_UNAVAILABLE: &str = "Unable to initialise Google login";

/// Turns a successful token response into the browser session: access cookie when the token is
/// usable, upstream cookies relayed, body passed through.
fn establish_session(jar: &CookieJar<'_>, settings: &SessionConfig, response: UpstreamResponse) -> ProxyJson {
    let body = response.body.unwrap_or_else(|| json!({}));
    let token: TokenResponse = serde_json::from_value(body.clone()).unwrap_or_default();
    if let Some((access_token, expires_in)) = token.session_cookie() {
        set_access_token_cookie(jar, settings, access_token, expires_in);
    }

    ProxyJson::ok(body).with_cookies(copy_set_cookies_from_upstream(&response.set_cookies))
}

fn rejected(response: &UpstreamResponse, fallback: &str) -> AppError {
    AppError::upstream(response.status, response.error_message().unwrap_or(fallback))
}

#[post("/local/login", data = "<payload>")]
pub async fn local_login(
    upstream: &State<SharedUpstream>,
    config: &State<Config>,
    jar: &CookieJar<'_>,
    _rate_limit: AuthRateLimit,
    credentials: UpstreamCredentials,
    payload: JsonBody<LocalLoginRequest>,
) -> Result<ProxyJson, AppError> {
    let login = payload.into_inner().normalized();
    login.validate().map_err(|errors| AppError::from_validation(&errors, &["email", "password"]))?;

    let request = UpstreamRequest::post("/v1/auth/local/login")
        .with_body(json!(login))
        .with_credentials(credentials);
    let response = upstream
        .send(request)
        .await
        .map_err(|e| AppError::transport("Unable to complete login. Please retry.", e))?;

    if !response.is_success() {
        return Err(rejected(&response, "Invalid email or password"));
    }

    Ok(establish_session(jar, &config.session, response))
}

#[get("/google/login")]
pub async fn google_login(upstream: &State<SharedUpstream>, _rate_limit: AuthRateLimit, credentials: UpstreamCredentials) -> Result<Json<GoogleLoginResponse>, AppError> {
    let request = UpstreamRequest::get("/v1/auth/google/login").with_credentials(credentials);
    let response = upstream
        .send(request)
        .await
        .map_err(|e| AppError::transport("Unexpected error starting Google login", e))?;

    if !response.is_success() {
        warn!(status = response.status, "upstream refused to start Google login");
        return Err(AppError::BadGateway(GOOGLE_LOGIN_UNAVAILABLE.to_string()));
    }

    let login: GoogleLoginUpstream = response.body.and_then(|body| serde_json::from_value(body).ok()).unwrap_or_default();
    let redirect_url = login
        .url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| AppError::BadGateway(GOOGLE_LOGIN_UNAVAILABLE.to_string()))?;

    Ok(Json(GoogleLoginResponse { redirect_url }))
}

#[post("/google/callback", data = "<payload>")]
pub async fn google_callback(
    upstream: &State<SharedUpstream>,
    config: &State<Config>,
    jar: &CookieJar<'_>,
    _rate_limit: AuthRateLimit,
    credentials: UpstreamCredentials,
    payload: JsonBody<GoogleCallbackRequest>,
) -> Result<ProxyJson, AppError> {
    let callback = payload.into_inner();
    callback.validate().map_err(|errors| AppError::from_validation(&errors, &["code", "state"]))?;

    let request = UpstreamRequest::post("/v1/auth/google/callback")
        .with_body(json!(callback))
        .with_credentials(credentials);
    let response = upstream
        .send(request)
        .await
        .map_err(|e| AppError::transport("Unexpected error completing Google login", e))?;

    if !response.is_success() {
        return Err(rejected(&response, "Google authentication failed"));
    }

    Ok(establish_session(jar, &config.session, response))
}

#[get("/refresh-token")]
pub async fn refresh_token(
    upstream: &State<SharedUpstream>,
    config: &State<Config>,
    jar: &CookieJar<'_>,
    _rate_limit: AuthRateLimit,
    credentials: UpstreamCredentials,
) -> Result<ProxyJson, AppError> {
    let request = UpstreamRequest::get("/v1/auth/refresh-token").with_credentials(credentials);
    let response = upstream.send(request).await.map_err(|e| AppError::transport("Unexpected refresh error", e))?;

    // The existing cookie stays; it expires on its own.
    if !response.is_success() {
        return Err(AppError::upstream(response.status, "Unable to refresh"));
    }

    Ok(establish_session(jar, &config.session, response))
}

/// Always clears the local cookie, whatever upstream says. A rate-limited logout still clears it
/// but skips the upstream revoke.
#[post("/logout")]
pub async fn logout(
    upstream: &State<SharedUpstream>,
    config: &State<Config>,
    jar: &CookieJar<'_>,
    rate_limit: Result<RateLimit, RateLimitError>,
    credentials: UpstreamCredentials,
) -> Result<ProxyJson, TooManyRequests> {
    delete_access_token_cookie(jar, &config.session);

    match rate_limit {
        Ok(_) => {}
        Err(RateLimitError::TooManyRequests { retry_after_secs }) => return Err(TooManyRequests::new(retry_after_secs)),
        Err(RateLimitError::MissingClientIp) => return Ok(ProxyJson::error(Status::BadRequest, "Client address unavailable")),
    }

    let request = UpstreamRequest::get("/v1/auth/logout").with_credentials(credentials);
    let reply = match upstream.send(request).await {
        Ok(response) if response.is_success() => ProxyJson::ok(json!(LogoutResponse { success: true })),
        Ok(response) => {
            warn!(status = response.status, "upstream failed to revoke session");
            ProxyJson::error(Status::InternalServerError, "Failed to revoke session")
        }
        Err(e) => {
            error!(error = %e, "logout request failed");
            ProxyJson::error(Status::InternalServerError, "Unexpected logout error")
        }
    };
    Ok(reply)
}

#[get("/me")]
pub async fn me(upstream: &State<SharedUpstream>, _rate_limit: RateLimit, credentials: UpstreamCredentials) -> Result<ProxyJson, AppError> {
    let request = UpstreamRequest::get("/v1/auth/me").with_credentials(credentials);
    let response = upstream.send(request).await.map_err(|e| AppError::transport("Unable to load session", e))?;

    if !response.is_success() {
        return Err(AppError::upstream(response.status, "Unauthorized"));
    }

    Ok(ProxyJson::ok(response.body.unwrap_or(Value::Null)))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![local_login, google_login, google_callback, refresh_token, logout, me]
}
