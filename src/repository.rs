use crate::error::StoreError;
use crate::models::{
    CreateEnquiryRequest, CreateJobOpeningRequest, Enquiry, GalleryItem, JobOpening,
    NewGalleryItem, NewNewsItem, NewsItem,
};
use async_trait::async_trait;
use sqlx::{PgPool, query_builder::QueryBuilder};
use std::sync::Arc;

/// Repository Trait
///
/// Abstract contract for the Content Store Gateway. Handlers talk to this
/// trait only, so tests can substitute an in-memory mock for Postgres.
///
/// Reads return `Vec`/`Option` with failures logged at the implementation
/// (an empty listing is an acceptable public-page degradation). Mutations
/// return `Result` because the create-with-media flow must observe an insert
/// failure to trigger blob rollback.
///
/// **Send + Sync + async_trait** make the trait object (`Arc<dyn Repository>`)
/// shareable across Axum's asynchronous task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Enquiries ---
    async fn create_enquiry(&self, req: CreateEnquiryRequest) -> Result<Enquiry, StoreError>;
    // Admin triage listing, optionally filtered by class of interest.
    async fn get_enquiries(&self, class: Option<String>) -> Vec<Enquiry>;
    // Soft delete: enquiries are closed, never removed.
    async fn close_enquiry(&self, id: i64) -> Result<bool, StoreError>;

    // --- Gallery ---
    async fn insert_gallery_item(&self, item: NewGalleryItem) -> Result<GalleryItem, StoreError>;
    // Public listing, optionally filtered by section. Active records only.
    async fn get_gallery_items(&self, section: Option<String>) -> Vec<GalleryItem>;
    async fn get_gallery_item(&self, id: i64) -> Option<GalleryItem>;
    // Hard delete. Returns true if a row was removed.
    async fn delete_gallery_item(&self, id: i64) -> Result<bool, StoreError>;

    // --- News & Events ---
    async fn insert_news_item(&self, item: NewNewsItem) -> Result<NewsItem, StoreError>;
    async fn get_news_items(&self, category: Option<String>, limit: Option<i64>) -> Vec<NewsItem>;
    async fn get_news_item(&self, id: i64) -> Option<NewsItem>;
    // Hard delete. Returns true if a row was removed.
    async fn delete_news_item(&self, id: i64) -> Result<bool, StoreError>;

    // --- Job Openings ---
    async fn insert_job(&self, req: CreateJobOpeningRequest) -> Result<JobOpening, StoreError>;
    async fn get_jobs(&self) -> Vec<JobOpening>;
    async fn get_job(&self, id: i64) -> Option<JobOpening>;
    // Soft delete via is_active=false. Returns true if a row was affected.
    async fn close_job(&self, id: i64) -> Result<bool, StoreError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete `Repository` implementation backed by PostgreSQL. All queries
/// are runtime-checked (`sqlx::query_as`) so the crate builds without a live
/// database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ENQUIRY_COLS: &str = "id, name, email, phone, class_interested, message, is_active, created_at";
const GALLERY_COLS: &str = "id, title, section, image_url, storage_key, is_active, created_at";
const NEWS_COLS: &str =
    "id, title, description, category, event_date, image_url, storage_key, is_active, created_at";
const JOB_COLS: &str =
    "id, title, department, description, qualifications, is_active, created_at";

#[async_trait]
impl Repository for PostgresRepository {
    async fn create_enquiry(&self, req: CreateEnquiryRequest) -> Result<Enquiry, StoreError> {
        let enquiry = sqlx::query_as::<_, Enquiry>(&format!(
            "INSERT INTO enquiries (name, email, phone, class_interested, message, is_active, created_at) \
             VALUES ($1, $2, $3, $4, $5, true, NOW()) \
             RETURNING {ENQUIRY_COLS}"
        ))
        .bind(req.name)
        .bind(req.email)
        .bind(req.phone)
        .bind(req.class_interested)
        .bind(req.message)
        .fetch_one(&self.pool)
        .await?;
        Ok(enquiry)
    }

    /// Admin listing of open enquiries, newest first, optionally filtered by
    /// the class the parent enquired about.
    async fn get_enquiries(&self, class: Option<String>) -> Vec<Enquiry> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(format!(
            "SELECT {ENQUIRY_COLS} FROM enquiries WHERE is_active = true"
        ));

        if let Some(c) = class {
            builder.push(" AND class_interested = ");
            builder.push_bind(c);
        }

        builder.push(" ORDER BY created_at DESC, id DESC");

        match builder.build_query_as::<Enquiry>().fetch_all(&self.pool).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!("get_enquiries error: {:?}", e);
                vec![]
            }
        }
    }

    async fn close_enquiry(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE enquiries SET is_active = false WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_gallery_item(&self, item: NewGalleryItem) -> Result<GalleryItem, StoreError> {
        let row = sqlx::query_as::<_, GalleryItem>(&format!(
            "INSERT INTO gallery_items (title, section, image_url, storage_key, is_active, created_at) \
             VALUES ($1, $2, $3, $4, true, NOW()) \
             RETURNING {GALLERY_COLS}"
        ))
        .bind(item.title)
        .bind(item.section)
        .bind(item.image_url)
        .bind(item.storage_key)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Public gallery listing. The ordering is total (created_at, then id),
    /// so repeated reads with no intervening writes return identical results.
    async fn get_gallery_items(&self, section: Option<String>) -> Vec<GalleryItem> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(format!(
            "SELECT {GALLERY_COLS} FROM gallery_items WHERE is_active = true"
        ));

        if let Some(s) = section {
            builder.push(" AND section = ");
            builder.push_bind(s);
        }

        builder.push(" ORDER BY created_at DESC, id DESC");

        match builder
            .build_query_as::<GalleryItem>()
            .fetch_all(&self.pool)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!("get_gallery_items error: {:?}", e);
                vec![]
            }
        }
    }

    async fn get_gallery_item(&self, id: i64) -> Option<GalleryItem> {
        sqlx::query_as::<_, GalleryItem>(&format!(
            "SELECT {GALLERY_COLS} FROM gallery_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_gallery_item error: {:?}", e);
            None
        })
    }

    async fn delete_gallery_item(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM gallery_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_news_item(&self, item: NewNewsItem) -> Result<NewsItem, StoreError> {
        let row = sqlx::query_as::<_, NewsItem>(&format!(
            "INSERT INTO news_items (title, description, category, event_date, image_url, storage_key, is_active, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, true, NOW()) \
             RETURNING {NEWS_COLS}"
        ))
        .bind(item.title)
        .bind(item.description)
        .bind(item.category)
        .bind(item.event_date)
        .bind(item.image_url)
        .bind(item.storage_key)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_news_items(&self, category: Option<String>, limit: Option<i64>) -> Vec<NewsItem> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(format!(
            "SELECT {NEWS_COLS} FROM news_items WHERE is_active = true"
        ));

        if let Some(c) = category {
            builder.push(" AND category = ");
            builder.push_bind(c);
        }

        builder.push(" ORDER BY created_at DESC, id DESC");

        if let Some(l) = limit {
            builder.push(" LIMIT ");
            builder.push_bind(l);
        }

        match builder
            .build_query_as::<NewsItem>()
            .fetch_all(&self.pool)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!("get_news_items error: {:?}", e);
                vec![]
            }
        }
    }

    async fn get_news_item(&self, id: i64) -> Option<NewsItem> {
        sqlx::query_as::<_, NewsItem>(&format!(
            "SELECT {NEWS_COLS} FROM news_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_news_item error: {:?}", e);
            None
        })
    }

    async fn delete_news_item(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM news_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_job(&self, req: CreateJobOpeningRequest) -> Result<JobOpening, StoreError> {
        let row = sqlx::query_as::<_, JobOpening>(&format!(
            "INSERT INTO job_openings (title, department, description, qualifications, is_active, created_at) \
             VALUES ($1, $2, $3, $4, true, NOW()) \
             RETURNING {JOB_COLS}"
        ))
        .bind(req.title)
        .bind(req.department)
        .bind(req.description)
        .bind(req.qualifications)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Careers-page listing: open positions only, newest first.
    async fn get_jobs(&self) -> Vec<JobOpening> {
        sqlx::query_as::<_, JobOpening>(&format!(
            "SELECT {JOB_COLS} FROM job_openings WHERE is_active = true \
             ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_jobs error: {:?}", e);
            vec![]
        })
    }

    async fn get_job(&self, id: i64) -> Option<JobOpening> {
        sqlx::query_as::<_, JobOpening>(&format!(
            "SELECT {JOB_COLS} FROM job_openings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_job error: {:?}", e);
            None
        })
    }

    async fn close_job(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE job_openings SET is_active = false WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
