use super::*;

#[tokio::test]
async fn ids_start_at_one_and_increase() {
    let store = MemoryStore::new();
    assert_eq!(store.insert("alice", "[[null]]").await.unwrap(), 1);
    assert_eq!(store.insert("bob", "[[null]]").await.unwrap(), 2);
}

#[tokio::test]
async fn ids_are_not_reused_after_delete() {
    let store = MemoryStore::new();
    let id = store.insert("alice", "[[null]]").await.unwrap();
    assert!(store.delete("alice", id).await.unwrap());
    assert_eq!(store.insert("alice", "[[null]]").await.unwrap(), id + 1);
}

#[tokio::test]
async fn list_is_owner_scoped_and_newest_first() {
    let store = MemoryStore::new();
    store.insert("alice", "a1").await.unwrap();
    store.insert("bob", "b1").await.unwrap();
    store.insert("alice", "a2").await.unwrap();

    let data: Vec<String> = store
        .list("alice")
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.pixel_data)
        .collect();
    assert_eq!(data, vec!["a2", "a1"]);
}

#[tokio::test]
async fn other_owners_cannot_read_update_or_delete() {
    let store = MemoryStore::new();
    let id = store.insert("alice", "original").await.unwrap();

    assert!(store.get("bob", id).await.unwrap().is_none());
    assert!(!store.update("bob", id, "hijack").await.unwrap());
    assert!(!store.delete("bob", id).await.unwrap());

    let drawing = store.get("alice", id).await.unwrap().unwrap();
    assert_eq!(drawing.pixel_data, "original");
}

#[tokio::test]
async fn sessions_resolve_until_deleted() {
    let store = MemoryStore::new();
    store
        .upsert_user("alice", Some("alice@example.test"))
        .await
        .unwrap();
    let token = store.create_session("alice").await.unwrap();

    let user = store.validate_session(&token).await.unwrap().unwrap();
    assert_eq!(user, SessionUser { id: "alice".into(), email: Some("alice@example.test".into()) });

    store.delete_session(&token).await.unwrap();
    assert!(store.validate_session(&token).await.unwrap().is_none());
}

#[tokio::test]
async fn upsert_without_email_keeps_existing_email() {
    let store = MemoryStore::new();
    store.upsert_user("alice", Some("a@example.test")).await.unwrap();
    store.upsert_user("alice", None).await.unwrap();
    let token = store.create_session("alice").await.unwrap();
    let user = store.validate_session(&token).await.unwrap().unwrap();
    assert_eq!(user.email.as_deref(), Some("a@example.test"));
}

#[tokio::test]
async fn unknown_token_is_none() {
    let store = MemoryStore::new();
    assert!(store.validate_session("nope").await.unwrap().is_none());
}
