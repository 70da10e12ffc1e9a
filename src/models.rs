use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

// --- Content Records (Mapped to Database) ---

/// Enquiry
///
/// An admissions enquiry submitted through the public contact form and stored
/// in `public.enquiries`. Enquiries are never hard-deleted; admins close them
/// by flipping `is_active`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Enquiry {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Class/grade the parent is enquiring about (e.g. "nursery", "grade-5").
    pub class_interested: String,
    pub message: String,
    pub is_active: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// GalleryItem
///
/// A single image in the site gallery (`public.gallery_items`). The image
/// bytes live in object storage; the record carries the public URL shown to
/// visitors plus the storage key needed to delete the blob alongside the row.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct GalleryItem {
    pub id: i64,
    pub title: String,
    /// Gallery section the image belongs to (e.g. "Photos", "Events", "Campus").
    pub section: String,
    pub image_url: String,
    /// Object storage key owning the blob. Needed for cleanup on delete.
    pub storage_key: String,
    pub is_active: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// NewsItem
///
/// A news article or event announcement (`public.news_items`). The attached
/// image is optional, so both storage fields are nullable.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct NewsItem {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// "news" or "event".
    pub category: String,
    /// Scheduled date, only meaningful for the "event" category.
    #[ts(type = "string | null")]
    pub event_date: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    pub storage_key: Option<String>,
    pub is_active: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// JobOpening
///
/// A careers-page vacancy (`public.job_openings`). Openings are soft-deleted
/// (`is_active=false`) so past postings remain auditable.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct JobOpening {
    pub id: i64,
    pub title: String,
    pub department: Option<String>,
    pub description: String,
    pub qualifications: Option<String>,
    pub is_active: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// CreateEnquiryRequest
///
/// Input for the public enquiry form (POST /enquiries).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateEnquiryRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub class_interested: String,
    pub message: String,
}

/// CreateGalleryItemRequest
///
/// Input for the admin gallery upload (POST /admin/gallery). The image arrives
/// inline as a browser data URL (`data:<mime>;base64,<payload>`); the handler
/// decodes and uploads it before inserting the record.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateGalleryItemRequest {
    pub title: String,
    pub section: String,
    /// Inline image as a data URL. Required for gallery items.
    pub image_data: String,
}

/// CreateNewsItemRequest
///
/// Input for the admin news/event editor (POST /admin/news). The image is
/// optional here, unlike the gallery.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateNewsItemRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub event_date: Option<DateTime<Utc>>,
    /// Optional inline image as a data URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
}

/// CreateJobOpeningRequest
///
/// Input for posting a new vacancy (POST /admin/jobs).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateJobOpeningRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualifications: Option<String>,
}

// --- Internal Insert Payloads ---
// Built by the handlers after validation and (for media resources) after the
// blob upload has already succeeded, so the repository never sees a record
// pointing at a blob that was not stored.

/// NewGalleryItem
///
/// Fully resolved gallery insert: storage fields are populated from the
/// completed upload.
#[derive(Debug, Clone)]
pub struct NewGalleryItem {
    pub title: String,
    pub section: String,
    pub image_url: String,
    pub storage_key: String,
}

/// NewNewsItem
///
/// Fully resolved news insert; storage fields are `Some` only when an inline
/// image accompanied the request and was uploaded successfully.
#[derive(Debug, Clone)]
pub struct NewNewsItem {
    pub title: String,
    pub description: String,
    pub category: String,
    pub event_date: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    pub storage_key: Option<String>,
}

// --- Response Envelope ---

/// ApiResponse
///
/// Uniform success envelope: `{success:true, data:...}`. Failures are shaped
/// by `ApiError::into_response` as `{success:false, error:...}`, so clients
/// can always branch on `success`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Deleted
///
/// Body for successful delete operations: `{success:true}` with no data field.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Deleted {
    pub success: bool,
}

impl Deleted {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
