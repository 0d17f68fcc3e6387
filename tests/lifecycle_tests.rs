use async_trait::async_trait;
use bytes::Bytes;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use post_store_server::{
    BlobStore, Category, ImageChange, ImageKey, InMemoryBlobStore, InMemoryPostRepository,
    NewImage, Notification, NotificationSink, OwnerId, PostDraft, PostEdit, PostError,
    PostFilter, PostLifecycleImpl, PostLifecycleService, PostRepository,
    domain::errors::BlobResult,
};

/// Notification sink that records everything published to it
#[derive(Clone, Default)]
struct RecordingSink {
    messages: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingSink {
    fn messages(&self) -> Vec<Notification> {
        self.messages.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn publish(&self, notification: Notification) {
        self.messages.lock().unwrap().push(notification);
    }
}

/// Blob store wrapper whose deletes can be made to fail, for exercising the
/// dangling-blob paths
struct FlakyDeleteStore {
    inner: InMemoryBlobStore,
    fail_deletes: AtomicBool,
}

impl FlakyDeleteStore {
    fn new(inner: InMemoryBlobStore) -> Self {
        Self {
            inner,
            fail_deletes: AtomicBool::new(false),
        }
    }

    fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    async fn inner_is_empty(&self) -> bool {
        self.inner.is_empty().await
    }

    async fn inner_len(&self) -> usize {
        self.inner.len().await
    }
}

#[async_trait]
impl BlobStore for FlakyDeleteStore {
    async fn upload(&self, key: &ImageKey, data: Bytes) -> BlobResult<()> {
        self.inner.upload(key, data).await
    }

    async fn delete(&self, key: &ImageKey) -> BlobResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(post_store_server::BlobStoreError::Backend {
                message: "injected delete failure".to_string(),
                source: None,
            });
        }
        self.inner.delete(key).await
    }

    async fn sign_url(&self, key: &ImageKey, ttl_seconds: u64) -> BlobResult<String> {
        self.inner.sign_url(key, ttl_seconds).await
    }

    async fn exists(&self, key: &ImageKey) -> BlobResult<bool> {
        self.inner.exists(key).await
    }
}

struct Fixture {
    repository: Arc<InMemoryPostRepository>,
    store: Arc<FlakyDeleteStore>,
    sink: RecordingSink,
    service: PostLifecycleImpl,
}

fn setup() -> Fixture {
    let repository = Arc::new(InMemoryPostRepository::new());
    let store = Arc::new(FlakyDeleteStore::new(InMemoryBlobStore::new()));
    let sink = RecordingSink::default();

    let service = PostLifecycleImpl::new(
        repository.clone(),
        store.clone(),
        Arc::new(sink.clone()),
    );

    Fixture {
        repository,
        store,
        sink,
        service,
    }
}

fn owner(id: &str) -> OwnerId {
    OwnerId::new(id.to_string()).unwrap()
}

fn draft(title: &str) -> PostDraft {
    PostDraft {
        title: title.to_string(),
        description: String::new(),
        category: None,
        used: false,
        image: None,
    }
}

fn draft_with_image(title: &str, file_name: &str) -> PostDraft {
    PostDraft {
        image: Some(NewImage::new(file_name, Bytes::from_static(b"png-bytes"))),
        ..draft(title)
    }
}

fn edit_of(title: &str, image: ImageChange) -> PostEdit {
    PostEdit {
        title: title.to_string(),
        description: String::new(),
        category: None,
        used: false,
        image,
    }
}

#[tokio::test]
async fn add_post_without_image() {
    let fx = setup();
    let u1 = owner("u1");

    let post = fx.service.add_post(&u1, draft("Draft")).await.unwrap();

    assert_eq!(post.title, "Draft");
    assert_eq!(post.image_key, None);
    assert!(!post.used);

    let listed = fx.repository.list(&u1, &PostFilter::new()).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, post.id);
}

#[tokio::test]
async fn add_post_with_image_uploads_blob() {
    let fx = setup();
    let u1 = owner("u1");

    let post = fx
        .service
        .add_post(&u1, draft_with_image("With image", "photo.png"))
        .await
        .unwrap();

    let key = post.image_key.expect("image key assigned");
    assert!(key.as_str().starts_with("u1-"));
    assert!(key.as_str().ends_with(".png"));
    assert!(fx.store.exists(&key).await.unwrap());
}

#[tokio::test]
async fn add_post_rejects_empty_title_before_upload() {
    let fx = setup();
    let u1 = owner("u1");

    let err = fx
        .service
        .add_post(&u1, draft_with_image("   ", "photo.png"))
        .await
        .unwrap_err();

    assert!(matches!(err, PostError::Validation { .. }));
    // Nothing was uploaded
    assert!(fx.store.inner_is_empty().await);
}

#[tokio::test]
async fn add_post_sanitizes_hostile_file_names() {
    let fx = setup();
    let u1 = owner("u1");

    // A dotless file name becomes the whole extension; slashes must never
    // reach the stored key.
    let post = fx
        .service
        .add_post(&u1, draft_with_image("Post", "evil/name"))
        .await
        .unwrap();

    let key = post.image_key.expect("image key assigned");
    assert!(key.as_str().starts_with("u1-"));
    assert!(!key.as_str().contains('/'));
    assert!(fx.store.exists(&key).await.unwrap());
}

#[tokio::test]
async fn rapid_same_extension_uploads_get_distinct_keys() {
    let fx = setup();
    let u1 = owner("u1");

    // Back-to-back uploads land within the same millisecond; the generated
    // keys must still come out distinct and both blobs must survive.
    let first = fx
        .service
        .add_post(&u1, draft_with_image("First", "a.png"))
        .await
        .unwrap();
    let second = fx
        .service
        .add_post(&u1, draft_with_image("Second", "b.png"))
        .await
        .unwrap();

    let first_key = first.image_key.unwrap();
    let second_key = second.image_key.unwrap();
    assert_ne!(first_key, second_key);
    assert_eq!(fx.store.inner_len().await, 2);
}

#[tokio::test]
async fn replace_image_uploads_before_deleting_old() {
    let fx = setup();
    let u1 = owner("u1");

    let post = fx
        .service
        .add_post(&u1, draft_with_image("Post", "old.png"))
        .await
        .unwrap();
    let old_key = post.image_key.clone().unwrap();

    let updated = fx
        .service
        .edit_post(
            &post.id,
            &u1,
            edit_of(
                "Post",
                ImageChange::Replace(NewImage::new("new.jpeg", Bytes::from_static(b"jpeg"))),
            ),
        )
        .await
        .unwrap();

    let new_key = updated.image_key.unwrap();
    assert_ne!(new_key, old_key);
    assert!(new_key.as_str().ends_with(".jpeg"));

    // Exactly one resolvable blob remains, at the new key
    assert!(fx.store.exists(&new_key).await.unwrap());
    assert!(!fx.store.exists(&old_key).await.unwrap());
    assert_eq!(fx.store.inner_len().await, 1);
}

#[tokio::test]
async fn replace_image_tolerates_failed_old_delete() {
    let fx = setup();
    let u1 = owner("u1");

    let post = fx
        .service
        .add_post(&u1, draft_with_image("Post", "old.png"))
        .await
        .unwrap();
    let old_key = post.image_key.clone().unwrap();

    // The final delete of the old blob fails; the operation still succeeds
    // and the record points at the new key. The old blob is an orphan.
    fx.store.fail_deletes(true);

    let updated = fx
        .service
        .edit_post(
            &post.id,
            &u1,
            edit_of(
                "Post",
                ImageChange::Replace(NewImage::new("new.png", Bytes::from_static(b"new"))),
            ),
        )
        .await
        .unwrap();

    let new_key = updated.image_key.unwrap();
    assert!(fx.store.exists(&new_key).await.unwrap());
    assert!(fx.store.exists(&old_key).await.unwrap()); // orphaned, not lost
}

#[tokio::test]
async fn remove_image_deletes_blob_and_clears_key() {
    let fx = setup();
    let u1 = owner("u1");

    let post = fx
        .service
        .add_post(&u1, draft_with_image("Post", "pic.png"))
        .await
        .unwrap();
    let key = post.image_key.clone().unwrap();

    let updated = fx
        .service
        .edit_post(&post.id, &u1, edit_of("Post", ImageChange::Remove))
        .await
        .unwrap();

    assert_eq!(updated.image_key, None);
    assert!(!fx.store.exists(&key).await.unwrap());
}

#[tokio::test]
async fn remove_image_writes_record_even_if_blob_delete_fails() {
    let fx = setup();
    let u1 = owner("u1");

    let post = fx
        .service
        .add_post(&u1, draft_with_image("Post", "pic.png"))
        .await
        .unwrap();

    fx.store.fail_deletes(true);

    let updated = fx
        .service
        .edit_post(&post.id, &u1, edit_of("Post", ImageChange::Remove))
        .await
        .unwrap();

    // The user-visible operation succeeded; the blob is a warned orphan
    assert_eq!(updated.image_key, None);
}

#[tokio::test]
async fn keep_image_preserves_existing_key_without_storage_ops() {
    let fx = setup();
    let u1 = owner("u1");

    let post = fx
        .service
        .add_post(&u1, draft_with_image("Post", "pic.png"))
        .await
        .unwrap();
    let key = post.image_key.clone().unwrap();

    // Deletes would fail, but Keep must not touch storage at all
    fx.store.fail_deletes(true);

    let updated = fx
        .service
        .edit_post(
            &post.id,
            &u1,
            PostEdit {
                title: "Renamed".to_string(),
                description: "now with text".to_string(),
                category: Some(Category::WebDevelopment),
                used: true,
                image: ImageChange::Keep,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.image_key, Some(key));
    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.category, Some(Category::WebDevelopment));
    assert!(updated.used);
}

#[tokio::test]
async fn edit_post_for_other_owner_is_not_found() {
    let fx = setup();
    let u1 = owner("u1");
    let u2 = owner("u2");

    let post = fx.service.add_post(&u1, draft("Mine")).await.unwrap();

    let err = fx
        .service
        .edit_post(&post.id, &u2, edit_of("Stolen", ImageChange::Keep))
        .await
        .unwrap_err();

    assert!(matches!(err, PostError::NotFound { .. }));
}

#[tokio::test]
async fn delete_post_removes_record_then_blob() {
    let fx = setup();
    let u1 = owner("u1");

    let post = fx
        .service
        .add_post(&u1, draft_with_image("Post", "pic.png"))
        .await
        .unwrap();
    let key = post.image_key.clone().unwrap();

    fx.service.delete_post(&post.id, &u1).await.unwrap();

    assert!(fx.repository.list(&u1, &PostFilter::new()).await.unwrap().is_empty());
    assert!(!fx.store.exists(&key).await.unwrap());
}

#[tokio::test]
async fn delete_post_succeeds_even_if_blob_delete_fails() {
    let fx = setup();
    let u1 = owner("u1");

    let post = fx
        .service
        .add_post(&u1, draft_with_image("Post", "pic.png"))
        .await
        .unwrap();

    fx.store.fail_deletes(true);

    // Record-first ordering: the post is gone even though its blob is not
    fx.service.delete_post(&post.id, &u1).await.unwrap();
    assert!(fx.repository.list(&u1, &PostFilter::new()).await.unwrap().is_empty());
}

#[tokio::test]
async fn second_delete_reports_not_found() {
    let fx = setup();
    let u1 = owner("u1");

    let post = fx.service.add_post(&u1, draft("Once")).await.unwrap();

    fx.service.delete_post(&post.id, &u1).await.unwrap();
    let err = fx.service.delete_post(&post.id, &u1).await.unwrap_err();

    assert!(matches!(err, PostError::NotFound { .. }));
}

#[tokio::test]
async fn operations_emit_start_and_outcome_notifications() {
    let fx = setup();
    let u1 = owner("u1");

    fx.service.add_post(&u1, draft("Post")).await.unwrap();

    let messages: Vec<String> = fx
        .sink
        .messages()
        .into_iter()
        .map(|n| n.message)
        .collect();
    assert_eq!(messages, vec!["Adding post...", "Post added"]);

    let _ = fx.service.add_post(&u1, draft("")).await;
    let messages = fx.sink.messages();
    assert_eq!(messages.last().unwrap().message, "Failed to add post");
}
