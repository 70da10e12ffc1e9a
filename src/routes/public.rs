use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints accessible to any client without authentication: the read-only
/// site content (gallery, news/events, careers) and the admissions enquiry
/// form, which is deliberately ungated so anonymous parents can submit it.
///
/// Security mandate: every listing handler here must enforce `is_active=true`
/// at the Repository level so soft-deleted content never leaks to visitors.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Unauthenticated liveness endpoint for monitoring and load balancers.
        .route("/health", get(|| async { "ok" }))
        // POST /enquiries
        // Admissions enquiry submission from the public contact form.
        .route("/enquiries", post(handlers::create_enquiry))
        // GET /gallery?section=...
        // Lists active gallery images, optionally filtered by section.
        .route("/gallery", get(handlers::get_gallery))
        // GET /news?category=...&limit=...
        // Lists active news articles and event announcements.
        .route("/news", get(handlers::get_news))
        // GET /jobs
        // Lists open vacancies for the careers page.
        .route("/jobs", get(handlers::get_jobs))
}
