use std::time::Duration;

use shortlink_core::{RetryPolicy, ShortHash, Storage, StorageError};
use shortlink_storage::MySqlStore;
use shortlink_test_infra::mysql::{MySqlServer, MysqlConfig};
use sqlx::mysql::MySqlPoolOptions;

struct Fixture {
    mysql: MySqlServer,
    url: String,
    store: MySqlStore,
}

impl Fixture {
    async fn start() -> Self {
        let mysql = MySqlServer::new(MysqlConfig::builder().build())
            .await
            .expect("start mysql");
        let url = mysql.database_url().await.expect("mysql url");
        let pool = connect_with_retry(&url).await;
        let store = MySqlStore::new(pool, None, RetryPolicy::default())
            .await
            .expect("bootstrap schema");

        Self { mysql, url, store }
    }
}

async fn connect_with_retry(url: &str) -> sqlx::MySqlPool {
    let mut last_error = None;

    for _ in 0..20 {
        match MySqlPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
        {
            Ok(pool) => return pool,
            Err(err) => {
                last_error = Some(err);
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    }

    panic!("failed to connect mysql: {last_error:?}");
}

fn hash(value: &str) -> ShortHash {
    ShortHash::parse(value).unwrap()
}

#[tokio::test]
async fn put_then_get() {
    let fixture = Fixture::start().await;
    let url = "https://example.com/page";
    let h = ShortHash::of(url);

    fixture.store.put(url, &h).await.unwrap();

    assert_eq!(fixture.store.get(&h).await.unwrap(), url);
}

#[tokio::test]
async fn missing_hash_is_not_found() {
    let fixture = Fixture::start().await;

    let err = fixture.store.get(&hash("00000000")).await.unwrap_err();

    assert!(matches!(err, StorageError::NotFound(ref h) if h == "00000000"));
}

#[tokio::test]
async fn repeated_put_keeps_one_row() {
    let fixture = Fixture::start().await;
    let url = "https://example.com/page";
    let h = ShortHash::of(url);

    fixture.store.put(url, &h).await.unwrap();
    fixture.store.put(url, &h).await.unwrap();

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
        .fetch_one(fixture.store.pool())
        .await
        .unwrap();
    assert_eq!(rows, 1);
    assert_eq!(fixture.store.get(&h).await.unwrap(), url);
}

#[tokio::test]
async fn last_writer_wins() {
    let fixture = Fixture::start().await;
    let h = hash("abcd1234");

    fixture.store.put("https://one.example", &h).await.unwrap();
    fixture.store.put("https://two.example", &h).await.unwrap();

    assert_eq!(fixture.store.get(&h).await.unwrap(), "https://two.example");
}

#[tokio::test]
async fn hashes_differing_only_in_case_are_distinct() {
    let fixture = Fixture::start().await;
    let lower = hash("abcd1234");
    let upper = hash("ABCD1234");

    fixture.store.put("https://one.example", &lower).await.unwrap();
    fixture.store.put("https://two.example", &upper).await.unwrap();

    assert_eq!(fixture.store.get(&lower).await.unwrap(), "https://one.example");
    assert_eq!(fixture.store.get(&upper).await.unwrap(), "https://two.example");
}

#[tokio::test]
async fn long_urls_are_stored_intact() {
    let fixture = Fixture::start().await;
    let url = format!("https://example.com/{}", "a".repeat(4000));
    let h = ShortHash::of(&url);

    fixture.store.put(&url, &h).await.unwrap();

    assert_eq!(fixture.store.get(&h).await.unwrap(), url);
}

#[tokio::test]
async fn bootstrap_starts_from_an_empty_table() {
    let fixture = Fixture::start().await;
    let url = "https://example.com/page";
    let h = ShortHash::of(url);
    fixture.store.put(url, &h).await.unwrap();

    let restarted = MySqlStore::connect(&fixture.url, None, RetryPolicy::default())
        .await
        .unwrap();

    assert!(restarted.get(&h).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn store_inside_a_namespace() {
    let fixture = Fixture::start().await;
    let namespace = fixture.mysql.database().to_string();

    let store = MySqlStore::connect(&fixture.url, Some(&namespace), RetryPolicy::default())
        .await
        .unwrap();
    assert_eq!(store.table(), format!("`{namespace}`.`urls`"));

    let url = "https://example.com/page";
    let h = ShortHash::of(url);
    store.put(url, &h).await.unwrap();
    assert_eq!(store.get(&h).await.unwrap(), url);
}

#[tokio::test]
async fn unknown_namespace_fails_bootstrap() {
    let fixture = Fixture::start().await;

    let err = MySqlStore::connect(&fixture.url, Some("no_such_schema"), RetryPolicy::no_retry())
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::SchemaBootstrap(_)));
}

#[tokio::test]
async fn closed_store_is_unavailable() {
    let fixture = Fixture::start().await;
    fixture.store.close().await.unwrap();

    let err = fixture.store.get(&hash("00000000")).await.unwrap_err();

    assert!(matches!(err, StorageError::Unavailable(_)));
}

#[tokio::test]
async fn concurrent_writers_to_distinct_hashes() {
    let fixture = Fixture::start().await;

    let mut handles = vec![];
    for i in 0..16 {
        let store = fixture.store.clone();
        handles.push(tokio::spawn(async move {
            let url = format!("https://example{}.com", i);
            store.put(&url, &ShortHash::of(&url)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for i in 0..16 {
        let url = format!("https://example{}.com", i);
        assert_eq!(fixture.store.get(&ShortHash::of(&url)).await.unwrap(), url);
    }
}
