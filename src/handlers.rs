use crate::{
    AppState,
    auth::AdminUser,
    error::ApiError,
    media::{discard_staged, stage_inline_image},
    models::{
        ApiResponse, CreateEnquiryRequest, CreateGalleryItemRequest, CreateJobOpeningRequest,
        CreateNewsItemRequest, Deleted, Enquiry, GalleryItem, JobOpening, NewGalleryItem,
        NewNewsItem, NewsItem,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

// --- Filter Structs ---

/// GalleryFilter
///
/// Query parameters accepted by the public gallery listing (GET /gallery).
#[derive(Deserialize, utoipa::IntoParams)]
pub struct GalleryFilter {
    /// Optional gallery section (e.g. "Photos", "Events").
    pub section: Option<String>,
}

/// NewsFilter
///
/// Query parameters for the public news/events listing (GET /news).
#[derive(Deserialize, utoipa::IntoParams)]
pub struct NewsFilter {
    /// Optional category filter: "news" or "event".
    pub category: Option<String>,
    /// Optional row cap for homepage widgets.
    pub limit: Option<i64>,
}

/// EnquiryFilter
///
/// Query parameters for the admin enquiry triage listing (GET /admin/enquiries).
#[derive(Deserialize, utoipa::IntoParams)]
pub struct EnquiryFilter {
    /// Optional filter on the class the parent enquired about.
    pub class: Option<String>,
}

// --- Validation ---

/// require_fields
///
/// Fails fast with a single `Validation` error naming every missing required
/// field, before any store or storage call is attempted.
fn require_fields(fields: &[(&str, &str)]) -> Result<(), ApiError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )))
    }
}

// --- Public Handlers ---

/// create_enquiry
///
/// [Public Route] Accepts an admissions enquiry from the contact form. This is
/// the one mutating endpoint with no admin gate: the form is filled in by
/// anonymous visitors.
#[utoipa::path(
    post,
    path = "/enquiries",
    request_body = CreateEnquiryRequest,
    responses(
        (status = 200, description = "Enquiry recorded", body = Enquiry),
        (status = 400, description = "Missing fields")
    )
)]
pub async fn create_enquiry(
    State(state): State<AppState>,
    Json(payload): Json<CreateEnquiryRequest>,
) -> Result<Json<ApiResponse<Enquiry>>, ApiError> {
    require_fields(&[
        ("name", &payload.name),
        ("email", &payload.email),
        ("phone", &payload.phone),
        ("message", &payload.message),
    ])?;

    let enquiry = state.repo.create_enquiry(payload).await?;
    Ok(Json(ApiResponse::new(enquiry)))
}

/// get_gallery
///
/// [Public Route] Lists active gallery images, optionally filtered by section,
/// newest first. The ordering is total, so repeated reads with no intervening
/// writes return identical results.
#[utoipa::path(
    get,
    path = "/gallery",
    params(GalleryFilter),
    responses((status = 200, description = "Gallery items", body = [GalleryItem]))
)]
pub async fn get_gallery(
    State(state): State<AppState>,
    Query(filter): Query<GalleryFilter>,
) -> Json<ApiResponse<Vec<GalleryItem>>> {
    let items = state.repo.get_gallery_items(filter.section).await;
    Json(ApiResponse::new(items))
}

/// get_news
///
/// [Public Route] Lists active news articles and event announcements.
#[utoipa::path(
    get,
    path = "/news",
    params(NewsFilter),
    responses((status = 200, description = "News and events", body = [NewsItem]))
)]
pub async fn get_news(
    State(state): State<AppState>,
    Query(filter): Query<NewsFilter>,
) -> Json<ApiResponse<Vec<NewsItem>>> {
    let items = state.repo.get_news_items(filter.category, filter.limit).await;
    Json(ApiResponse::new(items))
}

/// get_jobs
///
/// [Public Route] Lists open vacancies for the careers page. Closed postings
/// (`is_active=false`) are excluded at the repository layer.
#[utoipa::path(
    get,
    path = "/jobs",
    responses((status = 200, description = "Open positions", body = [JobOpening]))
)]
pub async fn get_jobs(State(state): State<AppState>) -> Json<ApiResponse<Vec<JobOpening>>> {
    let jobs = state.repo.get_jobs().await;
    Json(ApiResponse::new(jobs))
}

// --- Admin Handlers: Enquiries ---

/// get_enquiries
///
/// [Admin Route] Triage listing of open enquiries.
#[utoipa::path(
    get,
    path = "/admin/enquiries",
    params(EnquiryFilter),
    responses((status = 200, description = "Open enquiries", body = [Enquiry]))
)]
pub async fn get_enquiries(
    AdminUser { .. }: AdminUser,
    State(state): State<AppState>,
    Query(filter): Query<EnquiryFilter>,
) -> Json<ApiResponse<Vec<Enquiry>>> {
    let enquiries = state.repo.get_enquiries(filter.class).await;
    Json(ApiResponse::new(enquiries))
}

/// close_enquiry
///
/// [Admin Route] Closes an enquiry (soft delete). The record is kept for
/// admissions history; it simply disappears from the triage listing.
#[utoipa::path(
    delete,
    path = "/admin/enquiries/{id}",
    params(("id" = i64, Path, description = "Enquiry ID")),
    responses(
        (status = 200, description = "Closed", body = Deleted),
        (status = 404, description = "Not Found")
    )
)]
pub async fn close_enquiry(
    AdminUser { .. }: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Deleted>, ApiError> {
    if state.repo.close_enquiry(id).await? {
        Ok(Json(Deleted::ok()))
    } else {
        Err(ApiError::NotFound)
    }
}

// --- Admin Handlers: Gallery ---

/// create_gallery_item
///
/// [Admin Route] The create-with-media flow for gallery images:
/// 1. Validate required fields (no backend call on failure).
/// 2. Decode the inline data URL and upload the bytes (overwrite forbidden).
///    An upload failure aborts here; nothing was inserted, nothing to undo.
/// 3. Insert the record referencing the uploaded blob.
/// 4. If the insert fails, best-effort delete of the blob, then report the
///    insert failure. The blob is only ever referenced after it exists.
///
/// At most one upload and one insert happen per invocation; an ambiguous
/// network failure is reported, never retried, since a retry after an
/// unconfirmed insert could duplicate the record.
#[utoipa::path(
    post,
    path = "/admin/gallery",
    request_body = CreateGalleryItemRequest,
    responses(
        (status = 201, description = "Created", body = GalleryItem),
        (status = 400, description = "Missing fields or bad image data"),
        (status = 500, description = "Upload or insert failed")
    )
)]
pub async fn create_gallery_item(
    AdminUser { .. }: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateGalleryItemRequest>,
) -> Result<(StatusCode, Json<ApiResponse<GalleryItem>>), ApiError> {
    require_fields(&[
        ("title", &payload.title),
        ("section", &payload.section),
        ("image_data", &payload.image_data),
    ])?;

    let media = stage_inline_image(
        &state.storage,
        &format!("gallery-{}", payload.section),
        &payload.image_data,
    )
    .await?;

    let record = NewGalleryItem {
        title: payload.title,
        section: payload.section,
        image_url: media.public_url,
        storage_key: media.storage_key.clone(),
    };

    match state.repo.insert_gallery_item(record).await {
        Ok(item) => Ok((StatusCode::CREATED, Json(ApiResponse::new(item)))),
        Err(e) => {
            tracing::error!(
                key = %media.storage_key,
                "gallery insert failed after upload, rolling back blob"
            );
            discard_staged(&state.storage, &media.storage_key).await;
            Err(ApiError::Store(e))
        }
    }
}

/// delete_gallery_item
///
/// [Admin Route] The delete-with-media flow: look up the record (404 if it
/// does not exist), hard-delete the row, then best-effort removal of the
/// owned blob. The row deletion is authoritative; a failed blob removal is
/// logged but never turns a completed delete into an error.
#[utoipa::path(
    delete,
    path = "/admin/gallery/{id}",
    params(("id" = i64, Path, description = "Gallery item ID")),
    responses(
        (status = 200, description = "Deleted", body = Deleted),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_gallery_item(
    AdminUser { .. }: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Deleted>, ApiError> {
    let item = state
        .repo
        .get_gallery_item(id)
        .await
        .ok_or(ApiError::NotFound)?;

    if !state.repo.delete_gallery_item(id).await? {
        return Err(ApiError::NotFound);
    }

    discard_staged(&state.storage, &item.storage_key).await;

    Ok(Json(Deleted::ok()))
}

// --- Admin Handlers: News & Events ---

/// create_news_item
///
/// [Admin Route] Creates a news article or event announcement. Same
/// create-with-media sequence as the gallery, except the image is optional:
/// without one, this is a plain validated insert.
#[utoipa::path(
    post,
    path = "/admin/news",
    request_body = CreateNewsItemRequest,
    responses(
        (status = 201, description = "Created", body = NewsItem),
        (status = 400, description = "Missing fields or bad image data"),
        (status = 500, description = "Upload or insert failed")
    )
)]
pub async fn create_news_item(
    AdminUser { .. }: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateNewsItemRequest>,
) -> Result<(StatusCode, Json<ApiResponse<NewsItem>>), ApiError> {
    require_fields(&[
        ("title", &payload.title),
        ("description", &payload.description),
        ("category", &payload.category),
    ])?;

    let media = match payload.image_data.as_deref() {
        Some(data_url) => Some(stage_inline_image(&state.storage, "news", data_url).await?),
        None => None,
    };

    let record = NewNewsItem {
        title: payload.title,
        description: payload.description,
        category: payload.category,
        event_date: payload.event_date,
        image_url: media.as_ref().map(|m| m.public_url.clone()),
        storage_key: media.as_ref().map(|m| m.storage_key.clone()),
    };

    match state.repo.insert_news_item(record).await {
        Ok(item) => Ok((StatusCode::CREATED, Json(ApiResponse::new(item)))),
        Err(e) => {
            if let Some(media) = media {
                tracing::error!(
                    key = %media.storage_key,
                    "news insert failed after upload, rolling back blob"
                );
                discard_staged(&state.storage, &media.storage_key).await;
            }
            Err(ApiError::Store(e))
        }
    }
}

/// delete_news_item
///
/// [Admin Route] Hard-deletes a news item, then best-effort removal of its
/// blob if one was attached. As with the gallery, the row deletion decides
/// the response.
#[utoipa::path(
    delete,
    path = "/admin/news/{id}",
    params(("id" = i64, Path, description = "News item ID")),
    responses(
        (status = 200, description = "Deleted", body = Deleted),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_news_item(
    AdminUser { .. }: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Deleted>, ApiError> {
    let item = state
        .repo
        .get_news_item(id)
        .await
        .ok_or(ApiError::NotFound)?;

    if !state.repo.delete_news_item(id).await? {
        return Err(ApiError::NotFound);
    }

    if let Some(key) = item.storage_key.as_deref() {
        discard_staged(&state.storage, key).await;
    }

    Ok(Json(Deleted::ok()))
}

// --- Admin Handlers: Job Openings ---

/// create_job
///
/// [Admin Route] Posts a new vacancy. No media involved; validated insert only.
#[utoipa::path(
    post,
    path = "/admin/jobs",
    request_body = CreateJobOpeningRequest,
    responses(
        (status = 201, description = "Created", body = JobOpening),
        (status = 400, description = "Missing fields")
    )
)]
pub async fn create_job(
    AdminUser { .. }: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateJobOpeningRequest>,
) -> Result<(StatusCode, Json<ApiResponse<JobOpening>>), ApiError> {
    require_fields(&[
        ("title", &payload.title),
        ("description", &payload.description),
    ])?;

    let job = state.repo.insert_job(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(job))))
}

/// close_job
///
/// [Admin Route] Closes a vacancy (soft delete): the posting stays in the
/// store with `is_active=false` so past openings remain auditable.
#[utoipa::path(
    delete,
    path = "/admin/jobs/{id}",
    params(("id" = i64, Path, description = "Job opening ID")),
    responses(
        (status = 200, description = "Closed", body = Deleted),
        (status = 404, description = "Not Found")
    )
)]
pub async fn close_job(
    AdminUser { .. }: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Deleted>, ApiError> {
    state.repo.get_job(id).await.ok_or(ApiError::NotFound)?;

    if state.repo.close_job(id).await? {
        Ok(Json(Deleted::ok()))
    } else {
        Err(ApiError::NotFound)
    }
}
