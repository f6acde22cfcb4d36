//! API routes

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use vibemail_common::config::ApiConfig;

use crate::handlers::{accounts, assistant, campaigns, dashboard, engine, health, unibox};
use crate::openapi::create_openapi_routes;
use crate::state::AppState;

/// Create the API router
pub fn create_router(state: Arc<AppState>, api: &ApiConfig) -> Router {
    let health_routes = Router::new()
        .route("/", get(health::health))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        .route("/detailed", get(health::health_detailed));

    let account_routes = Router::new()
        .route(
            "/",
            get(accounts::list_accounts).post(accounts::create_account),
        )
        .route(
            "/:id",
            get(accounts::get_account)
                .patch(accounts::update_account)
                .delete(accounts::delete_account),
        )
        .route("/:id/warmup", post(accounts::toggle_warmup));

    let campaign_routes = Router::new()
        .route(
            "/",
            get(campaigns::list_campaigns).post(campaigns::create_campaign),
        )
        .route("/draft", post(campaigns::draft_email))
        .route(
            "/:id",
            get(campaigns::get_campaign).delete(campaigns::delete_campaign),
        )
        .route("/:id/steps", put(campaigns::update_steps))
        .route("/:id/launch", post(campaigns::launch_campaign))
        .route("/:id/pause", post(campaigns::pause_campaign))
        .route("/:id/toggle", post(campaigns::toggle_campaign));

    let unibox_routes = Router::new()
        .route("/", get(unibox::list_threads))
        .route("/:id", get(unibox::get_thread))
        .route("/:id/analyze", post(unibox::analyze_thread));

    let assistant_routes = Router::new()
        .route("/email-copy", post(assistant::generate_email_copy))
        .route("/lead-intent", post(assistant::analyze_lead_intent));

    let api_v1 = Router::new()
        .nest("/accounts", account_routes)
        .nest("/campaigns", campaign_routes)
        .nest("/unibox", unibox_routes)
        .nest("/assistant", assistant_routes)
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/engine", get(engine::get_engine_status));

    let mut router = Router::new()
        .nest("/health", health_routes)
        .nest("/api/v1", api_v1)
        .with_state(state);

    if api.enable_docs {
        router = router.merge(create_openapi_routes());
    }

    if let Some(cors) = cors_layer(&api.cors_origins) {
        router = router.layer(cors);
    }

    router.layer(TraceLayer::new_for_http())
}

/// CORS for the configured origins; `*` allows any origin
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }

    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return Some(layer.allow_origin(Any));
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(layer.allow_origin(allowed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use vibemail_common::config::EngineConfig;
    use vibemail_core::assistant::DisabledAssistant;
    use vibemail_core::{Copywriter, EngineMonitor};
    use vibemail_storage::{MemoryStorage, Workspace};

    async fn app() -> Router {
        let storage = Arc::new(MemoryStorage::new());
        let workspace = Arc::new(Workspace::load(storage).await.unwrap());
        let copywriter = Copywriter::new(Arc::new(DisabledAssistant), "VibeMail AI outreach");
        let state = AppState::new(
            workspace,
            copywriter,
            Arc::new(EngineMonitor::new()),
            EngineConfig::default(),
        );
        create_router(Arc::new(state), &ApiConfig::default())
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let app = app().await;
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, _) = send(&app, "GET", "/health/ready", None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, "GET", "/health/detailed", None).await;
        assert_eq!(body["checks"]["assistant"]["status"], "disabled");
    }

    #[tokio::test]
    async fn test_campaign_lifecycle() {
        let app = app().await;

        let (status, created) = send(
            &app,
            "POST",
            "/api/v1/campaigns",
            Some(json!({ "name": "Q4 Push", "totalLeads": 120 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "draft");
        let id = created["id"].as_str().unwrap().to_string();

        // Drafts have to be saved as paused before they can run
        let (status, body) = send(&app, "POST", &format!("/api/v1/campaigns/{}/toggle", id), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "invalid_transition");

        let (status, body) = send(&app, "GET", "/api/v1/campaigns?status=draft", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]
            .as_array()
            .unwrap()
            .iter()
            .any(|c| c["id"] == id.as_str()));

        let (status, _) = send(&app, "DELETE", &format!("/api/v1/campaigns/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, "GET", &format!("/api/v1/campaigns/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_seeded_campaign_toggle() {
        let app = app().await;

        let (_, paused) = send(&app, "GET", "/api/v1/campaigns?status=paused", None).await;
        let id = paused["data"][0]["id"].as_str().unwrap().to_string();

        let (_, engine) = send(&app, "GET", "/api/v1/engine", None).await;
        assert_eq!(engine["active"], false);

        let (status, running) = send(&app, "POST", &format!("/api/v1/campaigns/{}/toggle", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(running["status"], "running");

        let (_, engine) = send(&app, "GET", "/api/v1/engine", None).await;
        assert_eq!(engine["active"], true);
        assert_eq!(engine["ticks"], 0);
    }

    #[tokio::test]
    async fn test_bad_status_filter() {
        let app = app().await;
        let (status, body) = send(&app, "GET", "/api/v1/campaigns?status=archived", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_account_endpoints() {
        let app = app().await;

        let (status, account) = send(
            &app,
            "POST",
            "/api/v1/accounts",
            Some(json!({ "email": "Sam@Outreach.io", "provider": "google" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(account["dailyLimit"], 50);
        assert_eq!(account["warmupEnabled"], true);
        let id = account["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/accounts",
            Some(json!({ "email": "sam@outreach.io", "provider": "smtp" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, toggled) = send(&app, "POST", &format!("/api/v1/accounts/{}/warmup", id), None).await;
        assert_eq!(toggled["warmupEnabled"], false);

        let (status, updated) = send(
            &app,
            "PATCH",
            &format!("/api/v1/accounts/{}", id),
            Some(json!({ "status": "disabled", "dailyLimit": 80 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "disabled");
        assert_eq!(updated["dailyLimit"], 80);

        let (status, _) = send(&app, "PATCH", &format!("/api/v1/accounts/{}", id), Some(json!({}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_unibox_and_assistant_fallbacks() {
        let app = app().await;

        let (_, threads) = send(&app, "GET", "/api/v1/unibox?status=unread", None).await;
        assert_eq!(threads["total"], 1);

        let (status, analysis) = send(&app, "POST", "/api/v1/unibox/1/analyze", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(analysis["analysis"], "Neutral");

        let (status, copy) = send(
            &app,
            "POST",
            "/api/v1/assistant/email-copy",
            Some(json!({ "prompt": "Intro to a fintech CTO" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(copy["text"], "Error generating email. Please try again.");
        assert_eq!(copy["body"], "Error generating email. Please try again.");

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/assistant/lead-intent",
            Some(json!({ "reply": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_dashboard_and_docs() {
        let app = app().await;

        let (status, stats) = send(&app, "GET", "/api/v1/dashboard", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(stats["totalSent"].as_u64().is_some());

        let (status, doc) = send(&app, "GET", "/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(doc["info"]["title"], "VibeMail API");
    }
}
