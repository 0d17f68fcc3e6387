use bytes::Bytes;
use std::sync::Arc;

use post_store_server::{
    BlobStore, Category, ImageKey, InMemoryBlobStore, InMemoryPostRepository, NewPostRecord,
    OwnerId, PostFilter, PostRepository, PostViewImpl, PostViewService, SortOrder, UsedFilter,
};

struct Fixture {
    repository: Arc<InMemoryPostRepository>,
    store: Arc<InMemoryBlobStore>,
    service: PostViewImpl,
}

fn setup() -> Fixture {
    let repository = Arc::new(InMemoryPostRepository::new());
    let store = Arc::new(InMemoryBlobStore::new());
    let service = PostViewImpl::new(repository.clone(), store.clone());

    Fixture {
        repository,
        store,
        service,
    }
}

fn owner(id: &str) -> OwnerId {
    OwnerId::new(id.to_string()).unwrap()
}

fn key(value: &str) -> ImageKey {
    ImageKey::new(value.to_string()).unwrap()
}

fn record(title: &str, image_key: Option<ImageKey>) -> NewPostRecord {
    NewPostRecord {
        title: title.to_string(),
        description: String::new(),
        image_key,
        category: None,
        used: false,
    }
}

#[tokio::test]
async fn posts_with_images_get_signed_urls() {
    let fx = setup();
    let u1 = owner("u1");
    let k = key("u1-1000.png");

    fx.store.upload(&k, Bytes::from_static(b"png")).await.unwrap();
    fx.repository
        .create(&u1, record("With image", Some(k.clone())))
        .await
        .unwrap();
    fx.repository.create(&u1, record("No image", None)).await.unwrap();

    let views = fx.service.list_posts(&u1, &PostFilter::new()).await.unwrap();
    assert_eq!(views.len(), 2);

    let with_image = views.iter().find(|v| v.post.title == "With image").unwrap();
    let url = with_image.signed_url.as_ref().expect("signed url minted");
    assert!(url.contains("u1-1000.png"));
    // The raw key is retained for later edit/delete
    assert_eq!(with_image.post.image_key, Some(k));

    let without = views.iter().find(|v| v.post.title == "No image").unwrap();
    assert_eq!(without.signed_url, None);
}

#[tokio::test]
async fn signing_failure_degrades_single_post_not_whole_list() {
    let fx = setup();
    let u1 = owner("u1");

    let good_key = key("u1-1000.png");
    fx.store
        .upload(&good_key, Bytes::from_static(b"png"))
        .await
        .unwrap();

    // This key has no blob behind it, so signing fails for this post only
    let dangling_key = key("u1-2000.png");

    fx.repository
        .create(&u1, record("Good", Some(good_key)))
        .await
        .unwrap();
    fx.repository
        .create(&u1, record("Degraded", Some(dangling_key.clone())))
        .await
        .unwrap();

    let views = fx.service.list_posts(&u1, &PostFilter::new()).await.unwrap();
    assert_eq!(views.len(), 2);

    let degraded = views.iter().find(|v| v.post.title == "Degraded").unwrap();
    assert_eq!(degraded.signed_url, None);
    assert_eq!(degraded.post.image_key, Some(dangling_key));

    let good = views.iter().find(|v| v.post.title == "Good").unwrap();
    assert!(good.signed_url.is_some());
}

#[tokio::test]
async fn list_preserves_repository_order() {
    let fx = setup();
    let u1 = owner("u1");

    let older = fx.repository.create(&u1, record("Older", None)).await.unwrap();
    let draft = fx.repository.create(&u1, record("Draft", None)).await.unwrap();

    let desc = fx
        .service
        .list_posts(&u1, &PostFilter::new().with_sort(SortOrder::Descending))
        .await
        .unwrap();
    let ids: Vec<_> = desc.iter().map(|v| v.post.id).collect();
    assert_eq!(ids, vec![draft.id, older.id]);
}

#[tokio::test]
async fn views_are_owner_scoped_and_filtered() {
    let fx = setup();
    let u1 = owner("u1");
    let u2 = owner("u2");

    fx.repository
        .create(
            &u1,
            NewPostRecord {
                title: "Mine".to_string(),
                description: String::new(),
                image_key: None,
                category: Some(Category::Ecommerce),
                used: true,
            },
        )
        .await
        .unwrap();
    fx.repository.create(&u2, record("Theirs", None)).await.unwrap();

    let filter = PostFilter::new()
        .with_category(Category::Ecommerce)
        .with_used(UsedFilter::Used);
    let views = fx.service.list_posts(&u1, &filter).await.unwrap();

    assert_eq!(views.len(), 1);
    assert_eq!(views[0].post.title, "Mine");

    let other = fx.service.list_posts(&u2, &filter).await.unwrap();
    assert!(other.is_empty());
}
