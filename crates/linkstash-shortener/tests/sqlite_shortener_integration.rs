use linkstash_shortener::{Context, Link, Shortener, ShortenerError, ShortenerService};
use linkstash_storage::{ReadRepository, SqliteRepository};
use linkstash_test_infra::sqlite::{SqliteConfig, SqliteDatabase};
use sqlx::{Connection, SqliteConnection};
use std::sync::Arc;
use std::time::Duration;

struct Fixture {
    db: SqliteDatabase,
    repo: Arc<SqliteRepository>,
    service: ShortenerService<SqliteRepository>,
}

impl Fixture {
    async fn start() -> Self {
        let db = SqliteDatabase::new(SqliteConfig::builder().build()).expect("create temp db");
        let repo = SqliteRepository::connect(&db.database_url())
            .await
            .expect("connect sqlite");
        let repo = Arc::new(repo);
        let service = ShortenerService::from_shared(Arc::clone(&repo));

        Self {
            db,
            repo,
            service,
        }
    }
}

#[tokio::test]
async fn shorten_then_resolve_golang() {
    let fixture = Fixture::start().await;
    let ctx = Context::background();

    let key = fixture
        .service
        .shorten(&ctx, Link::new("foo", "https://golang.org"))
        .await
        .unwrap();
    assert_eq!(key, "foo");

    let link = fixture.service.resolve(&ctx, "foo").await.unwrap();
    assert_eq!(link, Link::new("foo", "https://golang.org"));
}

#[tokio::test]
async fn resolve_missing_on_empty_store_is_not_found() {
    let fixture = Fixture::start().await;

    let err = fixture
        .service
        .resolve(&Context::background(), "missing")
        .await
        .unwrap_err();

    assert!(matches!(err, ShortenerError::NotFound(key) if key == "missing"));
}

#[tokio::test]
async fn empty_key_leaves_row_count_unchanged() {
    let fixture = Fixture::start().await;
    let ctx = Context::background();

    fixture
        .service
        .shorten(&ctx, Link::new("foo", "https://golang.org"))
        .await
        .unwrap();
    let before = fixture.repo.count().await.unwrap();

    for url in ["https://rust-lang.org", "", "not a url"] {
        let err = fixture
            .service
            .shorten(&ctx, Link::new("", url))
            .await
            .unwrap_err();
        assert!(matches!(err, ShortenerError::InvalidInput(_)));
    }

    assert_eq!(fixture.repo.count().await.unwrap(), before);
}

#[tokio::test]
async fn round_trip_holds_for_assorted_keys() {
    let fixture = Fixture::start().await;
    let ctx = Context::background();
    let links = [
        Link::new("a", "https://example.com"),
        Link::new("UPPER-lower_123", "http://example.com/path?q=1#frag"),
        Link::new("üñïçødé", "https://例え.jp"),
        Link::new("x".repeat(512), ""),
    ];

    for link in &links {
        let key = fixture.service.shorten(&ctx, link.clone()).await.unwrap();
        assert_eq!(key, link.key);
    }

    for link in &links {
        let resolved = fixture.service.resolve(&ctx, &link.key).await.unwrap();
        assert_eq!(&resolved, link);
    }
}

// Duplicate keys are rejected, so the first URL always wins.
#[tokio::test]
async fn duplicate_key_keeps_first_url() {
    let fixture = Fixture::start().await;
    let ctx = Context::background();

    fixture
        .service
        .shorten(&ctx, Link::new("foo", "https://golang.org"))
        .await
        .unwrap();
    let err = fixture
        .service
        .shorten(&ctx, Link::new("foo", "https://rust-lang.org"))
        .await
        .unwrap_err();

    assert!(matches!(err, ShortenerError::AlreadyExists(key) if key == "foo"));
    assert_eq!(fixture.repo.count().await.unwrap(), 1);

    let link = fixture.service.resolve(&ctx, "foo").await.unwrap();
    assert_eq!(link.url, "https://golang.org");
}

#[tokio::test]
async fn cancelled_context_skips_the_store() {
    let fixture = Fixture::start().await;
    let (ctx, handle) = Context::with_cancel();
    handle.cancel();

    let err = fixture
        .service
        .shorten(&ctx, Link::new("foo", "https://golang.org"))
        .await
        .unwrap_err();

    assert!(matches!(err, ShortenerError::Cancelled));
    assert_eq!(fixture.repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn closed_store_surfaces_persistence_error() {
    let fixture = Fixture::start().await;
    fixture.repo.close().await;

    let err = fixture
        .service
        .resolve(&Context::background(), "foo")
        .await
        .unwrap_err();

    assert!(matches!(err, ShortenerError::Persistence(_)));
}

#[tokio::test]
async fn concurrent_shortens_of_distinct_keys_all_land() {
    let fixture = Fixture::start().await;
    let mut handles = vec![];

    for i in 0..16 {
        let service = fixture.service.clone();
        handles.push(tokio::spawn(async move {
            service
                .shorten(
                    &Context::background(),
                    Link::new(format!("key-{i}"), format!("https://example{i}.com")),
                )
                .await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(fixture.repo.count().await.unwrap(), 16);
}

// The write lock is held elsewhere, so the INSERT is still queued in SQLite
// when the deadline fires; it must be rolled back once the lock is released.
#[tokio::test]
async fn timed_out_shorten_does_not_persist() {
    let fixture = Fixture::start().await;

    let mut locker = SqliteConnection::connect(&fixture.db.database_url())
        .await
        .unwrap();
    sqlx::query("BEGIN IMMEDIATE")
        .execute(&mut locker)
        .await
        .unwrap();

    let ctx = Context::background().with_timeout(Duration::from_millis(100));
    let err = fixture
        .service
        .shorten(&ctx, Link::new("foo", "https://golang.org"))
        .await
        .unwrap_err();
    assert!(matches!(err, ShortenerError::DeadlineExceeded));

    sqlx::query("COMMIT").execute(&mut locker).await.unwrap();
    locker.close().await.unwrap();

    assert_eq!(fixture.repo.count().await.unwrap(), 0);

    let key = fixture
        .service
        .shorten(&Context::background(), Link::new("foo", "https://golang.org"))
        .await
        .unwrap();
    assert_eq!(key, "foo");
    assert_eq!(fixture.repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn cancelled_shorten_mid_write_does_not_persist() {
    let fixture = Fixture::start().await;

    let mut locker = SqliteConnection::connect(&fixture.db.database_url())
        .await
        .unwrap();
    sqlx::query("BEGIN IMMEDIATE")
        .execute(&mut locker)
        .await
        .unwrap();

    let (ctx, handle) = Context::with_cancel();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.cancel();
    });

    let err = fixture
        .service
        .shorten(&ctx, Link::new("foo", "https://golang.org"))
        .await
        .unwrap_err();
    assert!(matches!(err, ShortenerError::Cancelled));

    sqlx::query("COMMIT").execute(&mut locker).await.unwrap();
    locker.close().await.unwrap();

    assert_eq!(fixture.repo.count().await.unwrap(), 0);
    let err = fixture
        .service
        .resolve(&Context::background(), "foo")
        .await
        .unwrap_err();
    assert!(matches!(err, ShortenerError::NotFound(_)));
}
