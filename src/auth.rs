use crate::config::{Config, SessionConfig};
use crate::upstream::UpstreamCredentials;
use rocket::request::{FromRequest, Outcome, Request};

fn cookie_name<'r>(req: &'r Request<'_>) -> Option<&'r str> {
    req.rocket().state::<Config>().map(|config| config.session.cookie_name.as_str())
}

/// The access token from the session cookie, if present and non-empty.
pub fn access_token(req: &Request<'_>) -> Option<String> {
    let default_name = SessionConfig::default().cookie_name;
    let name = cookie_name(req).unwrap_or(&default_name);
    req.cookies()
        .get(name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

pub fn has_access_token(req: &Request<'_>) -> bool {
    access_token(req).is_some()
}

/// Credentials forwarded upstream. Never fails: an anonymous request is forwarded without a
/// token and upstream decides.
#[rocket::async_trait]
impl<'r> FromRequest<'r> for UpstreamCredentials {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        // Rocket parses cookies without decoding, so name=value pairs come back as sent.
        let pairs: Vec<String> = req.cookies().iter().map(|cookie| format!("{}={}", cookie.name(), cookie.value())).collect();
        let cookie_header = if pairs.is_empty() { None } else { Some(pairs.join("; ")) };

        Outcome::Success(UpstreamCredentials {
            access_token: access_token(req),
            cookie_header,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::http::Cookie;
    use rocket::local::asynchronous::Client;
    use rocket::serde::json::Json;
    use rocket::{get, routes};
    use serde_json::{Value, json};

    #[get("/credentials")]
    fn credentials(credentials: UpstreamCredentials) -> Json<Value> {
        Json(json!({
            "token": credentials.access_token,
            "cookie": credentials.cookie_header,
        }))
    }

    async fn client(config: Config) -> Client {
        let rocket = rocket::build().manage(config).mount("/", routes![credentials]);
        Client::untracked(rocket).await.expect("valid rocket instance")
    }

    #[rocket::async_test]
    async fn reads_token_and_forwards_cookie_header() {
        let client = client(Config::default()).await;
        let response = client
            .get("/credentials")
            .cookie(Cookie::new("jan_admin_access_token", "tok_abc"))
            .cookie(Cookie::new("jan_refresh", "r1"))
            .dispatch()
            .await;

        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body["token"], "tok_abc");

        let mut pairs: Vec<&str> = body["cookie"].as_str().expect("cookie header").split("; ").collect();
        pairs.sort_unstable();
        assert_eq!(pairs, vec!["jan_admin_access_token=tok_abc", "jan_refresh=r1"]);
    }

    #[rocket::async_test]
    async fn empty_cookie_value_is_no_token() {
        let client = client(Config::default()).await;
        let response = client
            .get("/credentials")
            .cookie(Cookie::new("jan_admin_access_token", ""))
            .dispatch()
            .await;

        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body["token"], Value::Null);
    }

    #[rocket::async_test]
    async fn honours_configured_cookie_name() {
        let mut config = Config::default();
        config.session.cookie_name = "custom_token".to_string();
        let client = client(config).await;

        let response = client
            .get("/credentials")
            .cookie(Cookie::new("custom_token", "tok_custom"))
            .cookie(Cookie::new("jan_admin_access_token", "tok_ignored"))
            .dispatch()
            .await;

        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body["token"], "tok_custom");
    }

    #[rocket::async_test]
    async fn anonymous_request_has_no_credentials() {
        let client = client(Config::default()).await;
        let response = client.get("/credentials").dispatch().await;

        let body: Value = response.into_json().await.expect("json body");
        assert_eq!(body, json!({"token": null, "cookie": null}));
    }
}
