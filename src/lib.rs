use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod media;
pub mod models;
pub mod repository;
pub mod storage;

// Routing segregation (Public vs Admin).
pub mod routes;
use auth::AdminUser;
use routes::{admin, public};

// --- Public Re-exports ---

// Core state types for the application entry point and the test suites.
pub use auth::{JwtVerifier, MockVerifier, VerifierState};
pub use config::AppConfig;
pub use repository::{PostgresRepository, RepositoryState};
pub use storage::{MockObjectStore, S3ObjectStore, StorageState};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation (Swagger JSON) from every handler
/// decorated with `#[utoipa::path]` and every schema deriving `ToSchema`.
/// Served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_enquiry, handlers::get_gallery, handlers::get_news,
        handlers::get_jobs, handlers::get_enquiries, handlers::close_enquiry,
        handlers::create_gallery_item, handlers::delete_gallery_item,
        handlers::create_news_item, handlers::delete_news_item,
        handlers::create_job, handlers::close_job,
    ),
    components(
        schemas(
            models::Enquiry, models::GalleryItem, models::NewsItem, models::JobOpening,
            models::CreateEnquiryRequest, models::CreateGalleryItemRequest,
            models::CreateNewsItemRequest, models::CreateJobOpeningRequest,
            models::Deleted,
        )
    ),
    tags(
        (name = "school-portal", description = "School Website Content API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe, immutable container holding all application
/// services: the Content Store Gateway, the Object Store Gateway, the
/// Credential Verifier, and the loaded configuration. Shared across all
/// incoming requests; no per-request mutable state exists anywhere else.
#[derive(Clone)]
pub struct AppState {
    /// Content Store Gateway: all record reads/writes go through this.
    pub repo: RepositoryState,
    /// Object Store Gateway: uploaded image blobs.
    pub storage: StorageState,
    /// Credential Verifier: token introspection for the admin gate.
    pub verifier: VerifierState,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// Let extractors and middleware pull individual services out of the shared
// state without depending on the whole AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for VerifierState {
    fn from_ref(app_state: &AppState) -> VerifierState {
        app_state.verifier.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// admin_middleware
///
/// Gate for the entire `/admin` subtree. The `AdminUser` extractor performs
/// token introspection and the role-claim check; if it fails, the request is
/// rejected with the structured 401 body before any handler executes, so no
/// partial work is ever attempted for an unauthorized mutation.
async fn admin_middleware(_admin: AdminUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the routing structure, applies global and scoped middleware, and
/// registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public routes: no middleware applied.
        .merge(public::public_routes())
        // Admin routes: nested under '/admin' behind the admin gate.
        .nest(
            "/admin",
            admin::admin_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                admin_middleware,
            )),
        )
        .with_state(state);

    // 3. Observability and Correlation Layers (applied outermost)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID generation: unique UUID per incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request tracing: wraps the request/response lifecycle in
                // a span correlated by the generated request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID propagation back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS layer
        .layer(cors)
}

/// trace_span_logger
///
/// Customizes `TraceLayer` span creation: includes the `x-request-id` header
/// in the structured logging metadata alongside method and URI, so every log
/// line for a single request is correlated by a unique ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
