mod support;

use std::sync::Arc;
use std::time::Duration;

use clubdesk::{
    CollectionController, GalleryCategory, GalleryImage, GalleryItem, MemoryCollectionStore,
    Status,
};

fn image(url: &str, caption: Option<&str>) -> GalleryImage {
    GalleryImage {
        id: String::new(),
        url: url.to_string(),
        caption: caption.map(str::to_string),
        order: None,
    }
}

fn item(title: &str, event_date: &str, images: Vec<GalleryImage>) -> GalleryItem {
    GalleryItem {
        title: title.to_string(),
        description: String::new(),
        category: GalleryCategory::Hackathon,
        event_date: event_date.to_string(),
        images,
    }
}

fn controller() -> CollectionController<GalleryItem, MemoryCollectionStore> {
    support::init_tracing();
    CollectionController::new(Arc::new(MemoryCollectionStore::new()))
}

async fn wait_until(what: &str, mut check: impl FnMut() -> bool) {
    for _ in 0..100 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {}", what);
}

#[tokio::test]
async fn empty_url_images_are_filtered_before_persistence() {
    let gallery = controller();
    gallery
        .create(item(
            "Spring Hackathon",
            "2024-04-12",
            vec![image("", Some("x")), image("http://a/b.jpg", None)],
        ))
        .await
        .unwrap();

    let listed = gallery.list();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].data.images.len(), 1);
    assert_eq!(listed[0].data.images[0].url, "http://a/b.jpg");
}

#[tokio::test]
async fn items_are_ordered_by_event_date_descending() {
    let gallery = controller();
    gallery
        .create(item("Old", "2023-11-02", vec![image("http://a/1.jpg", None)]))
        .await
        .unwrap();
    gallery
        .create(item("New", "2024-04-12", vec![image("http://a/2.jpg", None)]))
        .await
        .unwrap();

    let titles: Vec<String> = gallery.list().into_iter().map(|s| s.data.title).collect();
    assert_eq!(titles, vec!["New", "Old"]);
}

#[tokio::test]
async fn watch_delivers_the_initial_snapshot() {
    support::init_tracing();
    let store = Arc::new(MemoryCollectionStore::new());
    let seeder: CollectionController<GalleryItem, _> =
        CollectionController::new(Arc::clone(&store));
    seeder
        .create(item("Seeded", "2024-01-01", vec![image("http://a/1.jpg", None)]))
        .await
        .unwrap();

    let gallery: CollectionController<GalleryItem, _> = CollectionController::new(store);
    gallery.watch().await.unwrap();

    wait_until("initial snapshot", || gallery.status() == Status::Ready).await;
    assert_eq!(gallery.list().len(), 1);
}

#[tokio::test]
async fn watched_cache_follows_mutations_without_explicit_refresh() {
    let gallery = controller();
    gallery.watch().await.unwrap();
    wait_until("initial snapshot", || gallery.status() == Status::Ready).await;

    let id = gallery
        .create(item(
            "Robotics Demo",
            "2024-05-20",
            vec![image("http://a/demo.jpg", None)],
        ))
        .await
        .unwrap();
    wait_until("create push", || gallery.list().len() == 1).await;

    gallery.delete(&id).await.unwrap();
    wait_until("delete push", || gallery.list().is_empty()).await;
}

#[tokio::test]
async fn pushes_from_another_handle_reach_the_watcher() {
    support::init_tracing();
    let store = Arc::new(MemoryCollectionStore::new());
    let gallery: CollectionController<GalleryItem, _> =
        CollectionController::new(Arc::clone(&store));
    gallery.watch().await.unwrap();
    wait_until("initial snapshot", || gallery.status() == Status::Ready).await;

    // A second controller over the same store, as another client would be.
    let other: CollectionController<GalleryItem, _> = CollectionController::new(store);
    other
        .create(item(
            "Guest Upload",
            "2024-06-01",
            vec![image("http://a/guest.jpg", None)],
        ))
        .await
        .unwrap();

    wait_until("cross-client push", || {
        gallery
            .list()
            .iter()
            .any(|s| s.data.title == "Guest Upload")
    })
    .await;
}
