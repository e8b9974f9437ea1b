//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the call endpoints and OpenAPI documentation.

use crate::{
    handlers,
    models::{ErrorResponse, InitiateCallPayload},
    state::AppState,
};

use axum::{Router, routing::post};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::initiate_call, handlers::signaling_callback),
    components(schemas(InitiateCallPayload, ErrorResponse)),
    tags(
        (name = "Callbridge API", description = "Outbound calls bridged to voice agents")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/call", post(handlers::initiate_call))
        .route("/signaling-callback", post(handlers::signaling_callback))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}
