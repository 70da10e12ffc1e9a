use school_portal::storage::{MockObjectStore, ObjectStore};

#[tokio::test]
async fn test_mock_put_records_key() {
    let mock = MockObjectStore::new();
    let path = mock
        .put("gallery-Photos-123.jpg", b"image bytes", "image/jpeg", false)
        .await
        .unwrap();

    assert_eq!(path, "gallery-Photos-123.jpg");
    assert_eq!(mock.uploaded_keys(), vec!["gallery-Photos-123.jpg"]);
}

#[tokio::test]
async fn test_mock_put_failure() {
    let mock = MockObjectStore::failing_put();
    let result = mock
        .put("gallery-Photos-123.jpg", b"image bytes", "image/jpeg", false)
        .await;

    assert!(result.is_err());
    assert!(mock.uploaded_keys().is_empty());
}

#[tokio::test]
async fn test_mock_put_sanitizes_traversal_segments() {
    let mock = MockObjectStore::new();
    let path = mock
        .put("../../etc/passwd.jpg", b"image bytes", "image/jpeg", false)
        .await
        .unwrap();

    assert!(!path.contains(".."));
    assert!(path.ends_with("passwd.jpg"));
}

#[tokio::test]
async fn test_mock_put_refuses_overwrite() {
    // A second write to the same key must fail when overwrite is forbidden.
    let mock = MockObjectStore::new();
    mock.put("news-1.png", b"first", "image/png", false)
        .await
        .unwrap();

    let second = mock.put("news-1.png", b"second", "image/png", false).await;
    assert!(second.is_err());
    assert_eq!(mock.uploaded_keys().len(), 1);
}

#[tokio::test]
async fn test_mock_remove_records_call_even_on_failure() {
    let mock = MockObjectStore::failing_remove();
    let result = mock.remove(&["news-1.png".to_string()]).await;

    assert!(result.is_err());
    // The attempt is still recorded so tests can count cleanup calls.
    assert_eq!(mock.removed_keys(), vec!["news-1.png"]);
}

#[tokio::test]
async fn test_mock_public_url_embeds_key() {
    let mock = MockObjectStore::new();
    let url = mock.public_url("gallery-Photos-123.jpg");
    assert!(url.contains("gallery-Photos-123.jpg"));
}
