use crate::cloudflare::ZeroTrustApi;
use crate::lookup::{LookupError, lookup_active_device};
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, instrument, warn};

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub fn build_router(api: ZeroTrustApi) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/query", post(query))
        .with_state(api)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[derive(Debug, Deserialize)]
pub struct QueryForm {
    #[serde(default)]
    pub email: Option<String>,
}

/// POST /query - Resolve the active device of the user in the `email` form field
#[instrument(skip_all)]
async fn query(State(api): State<ZeroTrustApi>, form: Result<Form<QueryForm>, FormRejection>) -> Response {
    // An unreadable form is treated like a form without an email
    let email = form.ok().and_then(|Form(form)| form.email).unwrap_or_default();

    match lookup_active_device(&api, &email).await {
        Ok(report) => {
            info!(device_id = %report.active_device_id, "✅ Lookup succeeded");
            (StatusCode::OK, Json(report)).into_response()
        }
        Err(e) => {
            let (status, message) = status_and_message(&e);
            match &e {
                LookupError::Api { source, .. } if source.is_transport() => error!("❌ Could not talk to Cloudflare: {}", e),
                LookupError::Api { .. } => warn!("⚠️ Cloudflare refused the lookup: {}", e),
                _ => info!(status_code = %status, "Lookup ended without a device: {}", message),
            }
            (status, Json(json!({ "error": message }))).into_response()
        }
    }
}

fn status_and_message(error: &LookupError) -> (StatusCode, String) {
    match error {
        LookupError::MissingEmail => (StatusCode::BAD_REQUEST, "Email is required".to_string()),
        LookupError::UserNotFound => (StatusCode::NOT_FOUND, "User not found".to_string()),
        LookupError::NoDevices => (StatusCode::NOT_FOUND, "No devices found".to_string()),
        LookupError::NoActiveDevice => (StatusCode::NOT_FOUND, "No active device found".to_string()),
        LookupError::Api { source, .. } => (StatusCode::INTERNAL_SERVER_ERROR, source.to_string()),
    }
}
