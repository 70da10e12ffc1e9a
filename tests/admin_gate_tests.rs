use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use school_portal::{
    AppConfig, AppState, MockObjectStore, MockVerifier, create_router,
    error::StoreError,
    models::{
        CreateEnquiryRequest, CreateJobOpeningRequest, Enquiry, GalleryItem, JobOpening,
        NewGalleryItem, NewNewsItem, NewsItem,
    },
    repository::{Repository, RepositoryState},
};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

// --- Call-Counting Repository ---
//
// Records the name of every repository method invoked so the gate tests can
// assert that rejected requests performed zero store calls.

#[derive(Clone, Default)]
struct CountingRepository {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CountingRepository {
    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Repository for CountingRepository {
    async fn create_enquiry(&self, req: CreateEnquiryRequest) -> Result<Enquiry, StoreError> {
        self.record("create_enquiry");
        Ok(Enquiry {
            id: 1,
            name: req.name,
            email: req.email,
            phone: req.phone,
            class_interested: req.class_interested,
            message: req.message,
            is_active: true,
            created_at: chrono::Utc::now(),
        })
    }
    async fn get_enquiries(&self, _class: Option<String>) -> Vec<Enquiry> {
        self.record("get_enquiries");
        vec![]
    }
    async fn close_enquiry(&self, _id: i64) -> Result<bool, StoreError> {
        self.record("close_enquiry");
        Ok(true)
    }
    async fn insert_gallery_item(&self, _item: NewGalleryItem) -> Result<GalleryItem, StoreError> {
        self.record("insert_gallery_item");
        Ok(GalleryItem::default())
    }
    async fn get_gallery_items(&self, _section: Option<String>) -> Vec<GalleryItem> {
        self.record("get_gallery_items");
        vec![]
    }
    async fn get_gallery_item(&self, _id: i64) -> Option<GalleryItem> {
        self.record("get_gallery_item");
        None
    }
    async fn delete_gallery_item(&self, _id: i64) -> Result<bool, StoreError> {
        self.record("delete_gallery_item");
        Ok(false)
    }
    async fn insert_news_item(&self, _item: NewNewsItem) -> Result<NewsItem, StoreError> {
        self.record("insert_news_item");
        Ok(NewsItem::default())
    }
    async fn get_news_items(
        &self,
        _category: Option<String>,
        _limit: Option<i64>,
    ) -> Vec<NewsItem> {
        self.record("get_news_items");
        vec![]
    }
    async fn get_news_item(&self, _id: i64) -> Option<NewsItem> {
        self.record("get_news_item");
        None
    }
    async fn delete_news_item(&self, _id: i64) -> Result<bool, StoreError> {
        self.record("delete_news_item");
        Ok(false)
    }
    async fn insert_job(&self, _req: CreateJobOpeningRequest) -> Result<JobOpening, StoreError> {
        self.record("insert_job");
        Ok(JobOpening::default())
    }
    async fn get_jobs(&self) -> Vec<JobOpening> {
        self.record("get_jobs");
        vec![]
    }
    async fn get_job(&self, _id: i64) -> Option<JobOpening> {
        self.record("get_job");
        None
    }
    async fn close_job(&self, _id: i64) -> Result<bool, StoreError> {
        self.record("close_job");
        Ok(false)
    }
}

fn app(
    repo: CountingRepository,
    storage: MockObjectStore,
    verifier: MockVerifier,
) -> axum::Router {
    let state = AppState {
        repo: Arc::new(repo) as RepositoryState,
        storage: Arc::new(storage),
        verifier: Arc::new(verifier),
        config: AppConfig::default(),
    };
    create_router(state)
}

fn gallery_payload() -> String {
    serde_json::json!({
        "title": "Sports Day",
        "section": "Photos",
        "image_data": "data:image/jpeg;base64,aGVsbG8gaW1hZ2U=",
    })
    .to_string()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_missing_token_rejected_before_any_backend_call() {
    let repo = CountingRepository::default();
    let storage = MockObjectStore::new();
    let app = app(repo.clone(), storage.clone(), MockVerifier::admin());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/gallery")
                .header("Content-Type", "application/json")
                .body(Body::from(gallery_payload()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(body["error"], "no token provided");

    // Zero store and storage calls were made.
    assert!(repo.calls().is_empty());
    assert!(storage.uploaded_keys().is_empty());
    assert!(storage.removed_keys().is_empty());
}

#[tokio::test]
async fn test_non_admin_role_rejected() {
    let repo = CountingRepository::default();
    let storage = MockObjectStore::new();
    let app = app(repo.clone(), storage.clone(), MockVerifier::with_role("teacher"));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/gallery")
                .header("Content-Type", "application/json")
                .header("Authorization", "Bearer some.valid.token")
                .body(Body::from(gallery_payload()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"], "admin privileges required");
    assert!(repo.calls().is_empty());
    assert!(storage.uploaded_keys().is_empty());
}

#[tokio::test]
async fn test_expired_token_introspection_error_is_401() {
    // Introspection itself errors (expired/garbage token).
    let repo = CountingRepository::default();
    let storage = MockObjectStore::new();
    let app = app(repo.clone(), storage.clone(), MockVerifier::failing());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/gallery")
                .header("Content-Type", "application/json")
                .header("Authorization", "Bearer expired.token.value")
                .body(Body::from(gallery_payload()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(body["error"], "invalid or expired token");
    assert!(repo.calls().is_empty());
}

#[tokio::test]
async fn test_delete_routes_are_gated_too() {
    let repo = CountingRepository::default();
    let storage = MockObjectStore::new();
    let app = app(repo.clone(), storage.clone(), MockVerifier::admin());

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/admin/news/42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(repo.calls().is_empty());
    assert!(storage.removed_keys().is_empty());
}

#[tokio::test]
async fn test_admin_token_passes_gate() {
    let repo = CountingRepository::default();
    let app = app(repo.clone(), MockObjectStore::new(), MockVerifier::admin());

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/admin/enquiries")
                .header("Authorization", "Bearer admin.token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert!(repo.calls().contains(&"get_enquiries".to_string()));
}

#[tokio::test]
async fn test_public_reads_require_no_token() {
    let repo = CountingRepository::default();
    let app = app(repo.clone(), MockObjectStore::new(), MockVerifier::failing());

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/gallery?section=Photos")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // A broken verifier must not affect public routes at all.
    assert_eq!(response.status(), StatusCode::OK);
    assert!(repo.calls().contains(&"get_gallery_items".to_string()));
}
