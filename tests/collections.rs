mod support;

use std::sync::Arc;

use clubdesk::{
    CollectionController, Error, Event, EventPatch, MemoryCollectionStore, Status,
};

fn event(title: &str) -> Event {
    Event {
        title: title.to_string(),
        date: "2024-05-01".to_string(),
        location: "Main Hall".to_string(),
        attendees: "50".to_string(),
        time: "10:00".to_string(),
        description: String::new(),
        poster: String::new(),
        registration_link: None,
    }
}

fn controller() -> CollectionController<Event, MemoryCollectionStore> {
    support::init_tracing();
    CollectionController::new(Arc::new(MemoryCollectionStore::new()))
}

#[tokio::test]
async fn create_adds_exactly_one_record() {
    let events = controller();
    events.refresh().await.unwrap();
    let before = events.list().len();

    events.create(event("Hack Day")).await.unwrap();

    let after = events.list();
    assert_eq!(after.len(), before + 1);
}

#[tokio::test]
async fn hack_day_scenario() {
    let events = controller();
    events
        .create(Event {
            title: "Hack Day".to_string(),
            date: "2024-05-01".to_string(),
            location: "Main Hall".to_string(),
            attendees: "50".to_string(),
            time: "10:00".to_string(),
            description: String::new(),
            poster: String::new(),
            registration_link: None,
        })
        .await
        .unwrap();

    let listed = events.list();
    let matches: Vec<_> = listed
        .iter()
        .filter(|stored| stored.data.title == "Hack Day")
        .collect();
    assert_eq!(matches.len(), 1);
    assert!(!matches[0].id.is_empty());
}

#[tokio::test]
async fn round_trip_preserves_fields_verbatim() {
    let events = controller();
    let mut input = event("Robotics Night");
    input.registration_link = Some("https://club.example/register".to_string());

    let id = events.create(input.clone()).await.unwrap();
    events.refresh().await.unwrap();

    let stored = events
        .list()
        .into_iter()
        .find(|s| s.id == id)
        .expect("created record in cache");
    assert_eq!(stored.data, input);
    assert!(stored.created_at > 0);
    assert!(stored.updated_at.is_none());
}

#[tokio::test]
async fn update_changes_only_patched_fields() {
    let events = controller();
    let id = events.create(event("Hack Day")).await.unwrap();

    events
        .update(
            &id,
            EventPatch {
                title: Some("Hack Night".to_string()),
                ..EventPatch::default()
            },
        )
        .await
        .unwrap();

    let stored = events.list().into_iter().find(|s| s.id == id).unwrap();
    assert_eq!(stored.data.title, "Hack Night");
    assert_eq!(stored.data.date, "2024-05-01");
    assert_eq!(stored.data.location, "Main Hall");
    assert_eq!(stored.data.attendees, "50");
}

#[tokio::test]
async fn updated_at_strictly_increases() {
    let events = controller();
    let id = events.create(event("Hack Day")).await.unwrap();

    events
        .update(
            &id,
            EventPatch {
                time: Some("11:00".to_string()),
                ..EventPatch::default()
            },
        )
        .await
        .unwrap();
    let first = events.list()[0].updated_at.expect("stamped on update");

    events
        .update(
            &id,
            EventPatch {
                time: Some("12:00".to_string()),
                ..EventPatch::default()
            },
        )
        .await
        .unwrap();
    let second = events.list()[0].updated_at.unwrap();

    assert!(second > first);
}

#[tokio::test]
async fn delete_removes_exactly_one_and_second_delete_fails() {
    let events = controller();
    let keep = events.create(event("Keep")).await.unwrap();
    let gone = events.create(event("Gone")).await.unwrap();

    events.delete(&gone).await.unwrap();
    let listed = events.list();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, keep);

    let err = events.delete(&gone).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn update_missing_id_is_not_found() {
    let events = controller();
    let err = events
        .update(
            "rec-999999",
            EventPatch {
                title: Some("x".to_string()),
                ..EventPatch::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn validation_failure_happens_before_any_store_call() {
    let events = controller();
    events.refresh().await.unwrap();

    let mut invalid = event("");
    invalid.date = String::new();
    let err = events.create(invalid).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    // Nothing reached the store.
    events.refresh().await.unwrap();
    assert!(events.list().is_empty());
}

#[tokio::test]
async fn list_is_ordered_by_creation_time_descending() {
    let events = controller();
    events.create(event("First")).await.unwrap();
    events.create(event("Second")).await.unwrap();
    events.create(event("Third")).await.unwrap();

    let titles: Vec<String> = events
        .list()
        .into_iter()
        .map(|s| s.data.title)
        .collect();
    assert_eq!(titles, vec!["Third", "Second", "First"]);
}

#[tokio::test]
async fn concurrent_updates_last_write_wins() {
    let events = controller();
    let id = events.create(event("Hack Day")).await.unwrap();

    let a = events.clone();
    let b = events.clone();
    let id_a = id.clone();
    let id_b = id.clone();
    let (ra, rb) = tokio::join!(
        tokio::spawn(async move {
            a.update(
                &id_a,
                EventPatch {
                    title: Some("A".to_string()),
                    ..EventPatch::default()
                },
            )
            .await
        }),
        tokio::spawn(async move {
            b.update(
                &id_b,
                EventPatch {
                    title: Some("B".to_string()),
                    ..EventPatch::default()
                },
            )
            .await
        }),
    );
    ra.unwrap().unwrap();
    rb.unwrap().unwrap();

    events.refresh().await.unwrap();
    let stored = events.list().into_iter().find(|s| s.id == id).unwrap();
    assert!(
        stored.data.title == "A" || stored.data.title == "B",
        "title must be one of the two writes, got {}",
        stored.data.title
    );
    // Everything else is untouched by either patch.
    assert_eq!(stored.data.location, "Main Hall");
}

#[tokio::test]
async fn overlapping_refreshes_leave_one_coherent_snapshot() {
    let events = controller();
    events.create(event("First")).await.unwrap();
    events.create(event("Second")).await.unwrap();
    events.create(event("Third")).await.unwrap();

    let a = events.clone();
    let b = events.clone();
    let (ra, rb) = tokio::join!(
        tokio::spawn(async move { a.refresh().await }),
        tokio::spawn(async move { b.refresh().await }),
    );
    ra.unwrap().unwrap();
    rb.unwrap().unwrap();

    // Whichever refresh completed last wrote the cache; both read the same
    // store, so the result is one full snapshot, never an interleaving.
    assert_eq!(events.status(), Status::Ready);
    assert!(events.error().is_none());
    let titles: Vec<String> = events
        .list()
        .into_iter()
        .map(|s| s.data.title)
        .collect();
    assert_eq!(titles, vec!["Third", "Second", "First"]);
}

#[tokio::test]
async fn status_settles_to_ready_after_work() {
    let events = controller();
    assert_eq!(events.status(), Status::Uninitialized);

    events.refresh().await.unwrap();
    assert_eq!(events.status(), Status::Ready);

    events.create(event("Hack Day")).await.unwrap();
    assert_eq!(events.status(), Status::Ready);
    assert!(events.error().is_none());
}
