use std::sync::Arc;

use burrow_core::{Atomicity, Link, LinkRecord, ReadStore, ShortCode, StorageError, Store};
use burrow_storage::RedisStore;
use burrow_test_infra::redis::RedisServer;
use jiff::Timestamp;
use redis::AsyncCommands;

/// Test fixture pairing a Redis container with a store connected to it.
struct Fixture {
    server: RedisServer,
    store: RedisStore,
}

impl Fixture {
    async fn start() -> Self {
        let server = RedisServer::start()
            .await
            .expect("Failed to start Redis container");
        let store = RedisStore::connect(server.url())
            .await
            .expect("Failed to connect store");
        Self { server, store }
    }

    /// Writes a raw value under the key the store uses for `code`.
    async fn plant(&self, code: &str, value: &str) {
        let mut conn = self.server.connection().await.unwrap();
        let _: () = conn.set(format!("burrow:link:{code}"), value).await.unwrap();
    }
}

fn code(s: &str) -> ShortCode {
    ShortCode::new(s).unwrap()
}

fn link(url: &str) -> Link {
    Link {
        target_url: url.to_string(),
        creator_address: Some("127.0.0.1".to_string()),
        creator_identity: None,
        created_at: Timestamp::now(),
    }
}

#[tokio::test]
async fn test_redis_store_create_and_get() {
    let fixture = Fixture::start().await;
    let store = &fixture.store;

    assert!(store.get(&code("abc123")).await.unwrap().is_none());
    assert!(!store.exists(&code("abc123")).await.unwrap());

    let written = link("https://example.com");
    store.create(&code("abc123"), written.clone()).await.unwrap();

    let record = store.get(&code("abc123")).await.unwrap().unwrap();
    assert_eq!(record, LinkRecord::from(written));
    assert!(store.exists(&code("abc123")).await.unwrap());
}

#[tokio::test]
async fn test_redis_store_second_create_conflicts() {
    let fixture = Fixture::start().await;
    let store = &fixture.store;

    store
        .create(&code("abc123"), link("https://first.example"))
        .await
        .unwrap();
    let err = store
        .create(&code("abc123"), link("https://second.example"))
        .await
        .unwrap_err();

    assert_eq!(err, StorageError::Conflict("abc123".to_string()));
    let record = store.get(&code("abc123")).await.unwrap().unwrap();
    assert_eq!(record.target_url.as_deref(), Some("https://first.example"));
    assert_eq!(store.atomicity(), Atomicity::CreateIfAbsent);
}

#[tokio::test]
async fn test_redis_store_concurrent_creates_admit_one_winner() {
    let fixture = Fixture::start().await;
    let store = Arc::new(fixture.store.clone());
    let mut handles = vec![];

    for i in 0..16 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .create(&code("same"), link(&format!("https://example{i}.com")))
                .await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => winners += 1,
            Err(err) => assert!(matches!(err, StorageError::Conflict(_)), "{err}"),
        }
    }

    assert_eq!(winners, 1);
}

#[tokio::test]
async fn test_redis_store_record_without_target_is_returned_incomplete() {
    let fixture = Fixture::start().await;
    fixture
        .plant("bad1", r#"{"creator_address":"10.0.0.1"}"#)
        .await;

    let record = fixture.store.get(&code("bad1")).await.unwrap().unwrap();

    assert!(record.target_url.is_none());
    assert_eq!(record.creator_address.as_deref(), Some("10.0.0.1"));
}

#[tokio::test]
async fn test_redis_store_undecodable_value_is_invalid_data() {
    let fixture = Fixture::start().await;
    fixture.plant("junk1", "not json at all").await;

    let err = fixture.store.get(&code("junk1")).await.unwrap_err();

    assert!(matches!(err, StorageError::InvalidData(_)), "{err}");
}

#[tokio::test]
async fn test_redis_store_wrong_type_is_a_query_error() {
    let fixture = Fixture::start().await;
    let mut conn = fixture.server.connection().await.unwrap();
    let _: () = conn
        .hset("burrow:link:hash1", "target_url", "https://example.com")
        .await
        .unwrap();

    let err = fixture.store.get(&code("hash1")).await.unwrap_err();

    assert!(matches!(err, StorageError::Query(_)), "{err}");
}

#[tokio::test]
async fn test_redis_store_unreachable_server_is_unavailable() {
    // Nothing listens on port 1.
    let err = RedisStore::connect("redis://127.0.0.1:1/")
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::Unavailable(_)), "{err}");
}
