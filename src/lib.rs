mod auth;
pub mod config;
mod cookies;
mod error;
mod gate;
mod middleware;
pub mod models;
mod routes;
pub mod service;
pub mod upstream;

#[cfg(test)]
pub mod test_utils;

pub use config::Config;
pub use error::app_error::AppError;

use crate::middleware::RequestLogger;
use crate::middleware::rate_limit::RateLimiter;
use crate::routes as app_routes;
use crate::upstream::{HttpUpstream, SharedUpstream};
use rocket::fairing::AdHoc;
use rocket::{Build, Rocket, catchers, http::Method};
use rocket_cors::{AllowedOrigins, Cors, CorsOptions};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

pub fn init_tracing(log_level: &str, json_format: bool) {
    // RUST_LOG wins over the configured level, e.g. RUST_LOG=info,indigo_admin::upstream=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_line_number(true);

    if json_format {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn build_cors(cors_config: &config::CorsConfig) -> Result<Cors, AppError> {
    let is_wildcard = cors_config.allowed_origins.len() == 1 && cors_config.allowed_origins[0] == "*";

    if is_wildcard && cors_config.allow_credentials {
        return Err(AppError::configuration(
            "Cannot use wildcard origins (*) with credentials enabled. Either set specific origins or disable credentials.",
        ));
    }

    let allowed_origins = if cors_config.allowed_origins.is_empty() {
        AllowedOrigins::some_exact::<&str>(&[])
    } else if is_wildcard {
        AllowedOrigins::all()
    } else {
        AllowedOrigins::some_exact(&cors_config.allowed_origins.iter().map(String::as_str).collect::<Vec<_>>())
    };

    let options = CorsOptions {
        allowed_origins,
        allowed_methods: vec![Method::Get, Method::Post, Method::Put, Method::Delete, Method::Patch, Method::Options, Method::Head]
            .into_iter()
            .map(From::from)
            .collect(),
        allowed_headers: rocket_cors::AllowedHeaders::some(&["Content-Type", "Accept"]),
        allow_credentials: cors_config.allow_credentials,
        ..Default::default()
    };

    Ok(options.to_cors()?)
}

fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return config::DEFAULT_API_BASE_PATH.to_string();
    }

    let mut normalized = if trimmed.starts_with('/') { trimmed.to_string() } else { format!("/{}", trimmed) };

    while normalized.ends_with('/') && normalized.len() > 1 {
        normalized.pop();
    }

    normalized
}

fn collect_base_paths(api_config: &config::ApiConfig) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    let mut push_unique = |path: String| {
        if !normalized.contains(&path) {
            normalized.push(path);
        }
    };

    push_unique(normalize_base_path(&api_config.base_path));

    for extra in &api_config.additional_base_paths {
        push_unique(normalize_base_path(extra));
    }

    normalized
}

struct RouteSpec {
    path: &'static str,
    routes: Vec<rocket::Route>,
}

fn collect_route_specs() -> Vec<RouteSpec> {
    vec![
        RouteSpec {
            path: "/auth",
            routes: app_routes::auth::routes(),
        },
        RouteSpec {
            path: "/organization/projects",
            routes: app_routes::projects::routes(),
        },
        RouteSpec {
            path: "/organization/members",
            routes: app_routes::members::routes(),
        },
        RouteSpec {
            path: "/organization/invites",
            routes: app_routes::invites::routes(),
        },
        RouteSpec {
            path: "/organization/admin-api-keys",
            routes: app_routes::api_keys::routes(),
        },
        RouteSpec {
            path: "/models/providers",
            routes: app_routes::providers::catalog_routes(),
        },
        RouteSpec {
            path: "/organization/models/providers",
            routes: app_routes::providers::routes(),
        },
        RouteSpec {
            path: "/organization/providers",
            routes: app_routes::providers::vendor_routes(),
        },
        RouteSpec {
            path: "/organization/settings",
            routes: app_routes::settings::routes(),
        },
        RouteSpec {
            path: "/organization/audit-logs",
            routes: app_routes::audit_logs::routes(),
        },
        RouteSpec {
            path: "/organization/overview",
            routes: app_routes::overview::routes(),
        },
        RouteSpec {
            path: "/mcp",
            routes: app_routes::mcp::routes(),
        },
        RouteSpec {
            path: "/health",
            routes: app_routes::health::routes(),
        },
    ]
}

fn mount_api_routes(mut rocket: Rocket<Build>, base_path: &str) -> Rocket<Build> {
    for spec in collect_route_specs() {
        rocket = rocket.mount(format!("{}{}", base_path, spec.path), spec.routes);
    }

    rocket.register(
        base_path,
        catchers![
            app_routes::error::bad_request,
            app_routes::error::not_found,
            app_routes::error::payload_too_large,
            app_routes::error::unprocessable_entity,
            app_routes::error::too_many_requests,
            app_routes::error::internal_error,
        ],
    )
}

fn stage_rate_limiter(rate_limit_config: config::RateLimitConfig) -> AdHoc {
    AdHoc::on_ignite("Rate Limiter", move |rocket| {
        let limiter = Arc::new(RateLimiter::new(rate_limit_config.clone()));
        limiter.clone().spawn_cleanup_task();

        Box::pin(async move { rocket.manage(limiter) })
    })
}

fn stage_upstream(upstream_config: config::UpstreamConfig) -> AdHoc {
    AdHoc::try_on_ignite("Upstream API", |rocket| async move {
        match HttpUpstream::new(&upstream_config) {
            Ok(client) => {
                tracing::info!(base_url = %upstream_config.base_url, "Upstream client initialized");
                let upstream: SharedUpstream = Arc::new(client);
                Ok(rocket.manage(upstream))
            }
            Err(e) => {
                tracing::error!("Failed to initialize upstream client: {}", e);
                Err(rocket)
            }
        }
    })
}

fn assemble(config: Config) -> Result<Rocket<Build>, AppError> {
    let cors = build_cors(&config.cors)?;
    let base_paths = collect_base_paths(&config.api);

    let figment = rocket::Config::figment()
        .merge(("port", config.server.port))
        .merge(("address", config.server.address.clone()));

    let mut rocket = rocket::custom(figment)
        .attach(stage_rate_limiter(config.rate_limit.clone()))
        .attach(cors)
        .attach(RequestLogger);

    for base_path in &base_paths {
        rocket = mount_api_routes(rocket, base_path);
    }

    let admin_prefix = normalize_base_path(&config.admin.prefix);
    rocket = rocket
        .mount(admin_prefix.as_str(), app_routes::admin::routes())
        .register(admin_prefix.as_str(), catchers![app_routes::error::not_found, app_routes::error::internal_error]);

    Ok(rocket.manage(config))
}

/// The server wired to the real upstream API.
pub fn build_rocket(config: Config) -> Result<Rocket<Build>, AppError> {
    let upstream_config = config.upstream.clone();
    Ok(assemble(config)?.attach(stage_upstream(upstream_config)))
}

/// The server wired to a caller-provided upstream.
pub fn build_rocket_with_upstream(config: Config, upstream: SharedUpstream) -> Result<Rocket<Build>, AppError> {
    Ok(assemble(config)?.manage(upstream))
}
