use async_trait::async_trait;
use aws_sdk_s3 as s3;
use s3::primitives::ByteStream;
use std::sync::{Arc, Mutex};

// 1. ObjectStore Contract
/// ObjectStore
///
/// Abstract contract for the object-storage boundary. Lets the handlers swap
/// the concrete implementation between the real S3 client (`S3ObjectStore`)
/// in production and the call-recording `MockObjectStore` in tests.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Ensures the configured bucket exists. Used in the `Env::Local` setup to
    /// provision the bucket in MinIO automatically. No-op in production.
    async fn ensure_bucket_exists(&self);

    /// Uploads raw bytes under `key`, returning the stored path.
    ///
    /// With `overwrite` false the call must fail if an object already exists
    /// at `key`, so two concurrent creates can never silently clobber each
    /// other's blob.
    async fn put(
        &self,
        key: &str,
        bytes: &[u8],
        content_type: &str,
        overwrite: bool,
    ) -> Result<String, String>;

    /// Resolves the public URL under which an uploaded object is served.
    fn public_url(&self, key: &str) -> String;

    /// Deletes the given objects. Callers decide whether a failure here is
    /// fatal (it never is for rollback/cleanup, which are best-effort).
    async fn remove(&self, keys: &[String]) -> Result<(), String>;
}

/// StorageState
///
/// The concrete type used to share the object store across the application state.
pub type StorageState = Arc<dyn ObjectStore>;

// 2. The Real Implementation (S3/MinIO/Supabase)
/// S3ObjectStore
///
/// Concrete implementation using the AWS SDK for S3. S3 compatibility makes it
/// transparently handle both the local Dockerized MinIO instance and the
/// Supabase Storage endpoint in production.
///
/// `force_path_style(true)` is critical for MinIO and Supabase compatibility.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: s3::Client,
    endpoint: String,
    bucket_name: String,
}

impl S3ObjectStore {
    /// Constructs the S3 client using credentials and configuration from AppConfig.
    pub async fn new(
        endpoint: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
        bucket: &str,
    ) -> Self {
        let credentials =
            s3::config::Credentials::new(access_key, secret_key, None, None, "static");

        let config = s3::Config::builder()
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .region(s3::config::Region::new(region.to_string()))
            .behavior_version_latest()
            // CRITICAL: path-style addressing (http://endpoint/bucket/key) is
            // required for MinIO and the Supabase Storage API gateway.
            .force_path_style(true)
            .build();

        let client = s3::Client::from_conf(config);

        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket_name: bucket.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    /// Calls the S3 CreateBucket API. Idempotent, safe to call at startup.
    async fn ensure_bucket_exists(&self) {
        let _ = self
            .client
            .create_bucket()
            .bucket(&self.bucket_name)
            .send()
            .await;
    }

    async fn put(
        &self,
        key: &str,
        bytes: &[u8],
        content_type: &str,
        overwrite: bool,
    ) -> Result<String, String> {
        let key = sanitize_key(key);

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(bytes.to_vec()));

        if !overwrite {
            // Conditional write: the PUT fails with 412 if an object already
            // exists at this key.
            request = request.if_none_match("*");
        }

        request.send().await.map_err(|e| e.to_string())?;

        Ok(key)
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.bucket_name, key)
    }

    async fn remove(&self, keys: &[String]) -> Result<(), String> {
        for key in keys {
            self.client
                .delete_object()
                .bucket(&self.bucket_name)
                .key(key)
                .send()
                .await
                .map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

/// sanitize_key
///
/// Strips directory-navigation components (`..`, `.`) from a key so a
/// user-influenced segment can never traverse outside the bucket prefix.
fn sanitize_key(key: &str) -> String {
    key.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

// 3. The Mock Implementation (For Tests)
/// MockObjectStore
///
/// In-memory mock of `ObjectStore` that records every `put` and `remove` call
/// so tests can assert on exactly which blobs were stored and cleaned up.
/// Failure toggles simulate upload and removal outages independently.
#[derive(Clone, Default)]
pub struct MockObjectStore {
    /// When true, `put` returns a simulated failure.
    pub put_should_fail: bool,
    /// When true, `remove` returns a simulated failure (after recording the call).
    pub remove_should_fail: bool,
    uploads: Arc<Mutex<Vec<String>>>,
    removals: Arc<Mutex<Vec<String>>>,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_put() -> Self {
        Self {
            put_should_fail: true,
            ..Self::default()
        }
    }

    pub fn failing_remove() -> Self {
        Self {
            remove_should_fail: true,
            ..Self::default()
        }
    }

    /// Keys successfully stored, in call order.
    pub fn uploaded_keys(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }

    /// Keys passed to `remove`, in call order (recorded even when the removal
    /// itself is simulated to fail).
    pub fn removed_keys(&self) -> Vec<String> {
        self.removals.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn ensure_bucket_exists(&self) {
        // No-op in mock environment.
    }

    async fn put(
        &self,
        key: &str,
        bytes: &[u8],
        _content_type: &str,
        overwrite: bool,
    ) -> Result<String, String> {
        if self.put_should_fail {
            return Err("Mock Storage Error: Simulation requested".to_string());
        }
        if bytes.is_empty() {
            return Err("Mock Storage Error: empty body".to_string());
        }

        let key = sanitize_key(key);
        let mut uploads = self.uploads.lock().unwrap();
        if !overwrite && uploads.iter().any(|k| k == &key) {
            return Err("Mock Storage Error: object already exists".to_string());
        }
        uploads.push(key.clone());
        Ok(key)
    }

    fn public_url(&self, key: &str) -> String {
        format!("http://localhost:9000/mock-bucket/{}", key)
    }

    async fn remove(&self, keys: &[String]) -> Result<(), String> {
        self.removals.lock().unwrap().extend(keys.iter().cloned());
        if self.remove_should_fail {
            return Err("Mock Storage Error: Simulation requested".to_string());
        }
        Ok(())
    }
}
