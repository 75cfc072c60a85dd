use rocket::serde::json::Json;
use rocket::routes;
use serde_json::{Value, json};

#[rocket::get("/")]
pub async fn healthcheck() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![healthcheck]
}
