use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Admin Router Module
///
/// The content-management surface, restricted to bearers of the 'admin' role
/// claim. The whole router is nested under `/admin` and wrapped in a
/// middleware running the `AdminUser` extractor, so every request here is
/// rejected with a structured 401 before any handler (and therefore any store
/// or storage call) runs. Handlers additionally take `AdminUser` as an
/// argument, making the gate visible in their signatures.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/enquiries?class=...
        // Triage listing of open admissions enquiries.
        // DELETE /admin/enquiries/{id}
        // Closes an enquiry (soft delete; the record is retained).
        .route("/enquiries", get(handlers::get_enquiries))
        .route("/enquiries/{id}", delete(handlers::close_enquiry))
        // POST /admin/gallery
        // Uploads an inline image and inserts the gallery record, with
        // rollback of the blob if the insert fails.
        // DELETE /admin/gallery/{id}
        // Hard delete plus best-effort blob cleanup.
        .route("/gallery", post(handlers::create_gallery_item))
        .route("/gallery/{id}", delete(handlers::delete_gallery_item))
        // POST /admin/news
        // Creates a news/event record; image optional, same rollback rules.
        // DELETE /admin/news/{id}
        // Hard delete plus best-effort blob cleanup.
        .route("/news", post(handlers::create_news_item))
        .route("/news/{id}", delete(handlers::delete_news_item))
        // POST /admin/jobs
        // Posts a vacancy (no media).
        // DELETE /admin/jobs/{id}
        // Closes a vacancy (soft delete).
        .route("/jobs", post(handlers::create_job))
        .route("/jobs/{id}", delete(handlers::close_job))
}
