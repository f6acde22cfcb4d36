//! OpenAPI documentation
//!
//! Serves the generated OpenAPI 3 document and a Swagger UI page for the
//! VibeMail API.

use axum::{
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers::{accounts, assistant, campaigns, dashboard, engine, health, unibox};

/// Generated API document
#[derive(OpenApi)]
#[openapi(
    info(
        title = "VibeMail API",
        description = "Cold outreach workspace: sending accounts, campaign sequences, \
                       the sending simulation, the unified inbox and AI copy."
    ),
    paths(
        health::health,
        health::liveness,
        health::readiness,
        health::health_detailed,
        accounts::list_accounts,
        accounts::create_account,
        accounts::get_account,
        accounts::update_account,
        accounts::toggle_warmup,
        accounts::delete_account,
        campaigns::list_campaigns,
        campaigns::create_campaign,
        campaigns::draft_email,
        campaigns::get_campaign,
        campaigns::update_steps,
        campaigns::launch_campaign,
        campaigns::pause_campaign,
        campaigns::toggle_campaign,
        campaigns::delete_campaign,
        dashboard::get_dashboard,
        engine::get_engine_status,
        unibox::list_threads,
        unibox::get_thread,
        unibox::analyze_thread,
        assistant::generate_email_copy,
        assistant::analyze_lead_intent,
    ),
    components(schemas(
        ErrorResponse,
        health::HealthResponse,
        health::DetailedHealthResponse,
        health::HealthChecks,
        health::ComponentHealth,
        accounts::CreateAccountRequest,
        accounts::UpdateAccountRequest,
        campaigns::CreateCampaignRequest,
        campaigns::UpdateStepsRequest,
        campaigns::DraftRequest,
        assistant::EmailCopyRequest,
        assistant::EmailCopyResponse,
        assistant::LeadIntentRequest,
    )),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "accounts", description = "Sending account management"),
        (name = "campaigns", description = "Campaign sequences and lifecycle"),
        (name = "dashboard", description = "Aggregate metrics"),
        (name = "engine", description = "Sending simulation status"),
        (name = "unibox", description = "Unified inbox"),
        (name = "assistant", description = "AI copy and intent analysis")
    )
)]
pub struct ApiDoc;

/// Create OpenAPI routes
pub fn create_openapi_routes() -> Router {
    Router::new()
        .route("/openapi.json", get(openapi_json))
        .route("/docs", get(swagger_ui))
}

/// OpenAPI JSON document endpoint
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Swagger UI HTML endpoint
async fn swagger_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>VibeMail API Documentation</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui.css" />
    <style>
        body { margin: 0; padding: 0; }
        .swagger-ui .topbar { display: none; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5.9.0/swagger-ui-bundle.js"></script>
    <script>
        window.onload = function() {
            SwaggerUIBundle({
                url: "/openapi.json",
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [SwaggerUIBundle.presets.apis],
                layout: "BaseLayout"
            });
        };
    </script>
</body>
</html>
"#;
