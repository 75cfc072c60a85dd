use indigo_admin::{Config, build_rocket, init_tracing};

#[rocket::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level, config.logging.json_format);

    let rocket = match build_rocket(config) {
        Ok(rocket) => rocket,
        Err(e) => {
            tracing::error!(error = ?e, "invalid server configuration");
            std::process::exit(1);
        }
    };

    if let Err(e) = rocket.launch().await {
        tracing::error!(error = %e, "server stopped with an error");
        std::process::exit(1);
    }
}
