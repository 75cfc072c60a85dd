use crate::config::Config;
use crate::error::app_error::AppError;
use crate::gate::{AccessDecision, GateDecision};
use rocket::fs::NamedFile;
use rocket::response::Redirect;
use rocket::{Responder, State, routes};
use std::path::{Path, PathBuf};

#[derive(Responder)]
pub enum AdminPage {
    Redirect(Redirect),
    Page(NamedFile),
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path).await.map(|meta| meta.is_file()).unwrap_or(false)
}

/// Serves the admin bundle behind the access gate. Unknown paths fall back to `index.html`
/// so client-side routes resolve.
#[rocket::get("/<path..>")]
pub async fn admin_page(config: &State<Config>, decision: AccessDecision, path: PathBuf) -> Result<AdminPage, AppError> {
    match decision.0 {
        GateDecision::RedirectToLogin { location } | GateDecision::RedirectToLanding { location } => {
            return Ok(AdminPage::Redirect(Redirect::temporary(location)));
        }
        GateDecision::Allow => {}
    }

    let root = Path::new(&config.admin.static_dir);
    let requested = root.join(&path);
    let target = if is_file(&requested).await { requested } else { root.join("index.html") };

    NamedFile::open(&target)
        .await
        .map(AdminPage::Page)
        .map_err(|_| AppError::NotFound("admin bundle".to_string()))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![admin_page]
}
