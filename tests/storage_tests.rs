//! Storage integration tests
//!
//! Runs the SeaORM backend against a temporary SQLite database.

use std::sync::{Arc, Once};

use chrono::{Duration, Utc};
use tempfile::TempDir;

use inkpost::config::{get_config, init_config, update_config};
use inkpost::errors::BlogError;
use inkpost::storage::{Article, ArticleFilter, SeaOrmStorage, StorageFactory};
use inkpost::storage::backend::infer_backend_from_url;

static INIT: Once = Once::new();

fn init_static_config() {
    INIT.call_once(|| {
        init_config();
    });
}

async fn create_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    init_static_config();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("storage_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = SeaOrmStorage::new(&db_url, "sqlite")
        .await
        .expect("Failed to create storage");
    (Arc::new(storage), temp_dir)
}

fn article(id: &str, slug: &str, published: bool) -> Article {
    let now = Utc::now();
    Article {
        id: id.to_string(),
        title: format!("Title {}", id),
        genre: "Rust".to_string(),
        content: "# Heading\n\nBody text".to_string(),
        created_at: now,
        updated_at: now,
        published,
        thumbnail_url: None,
        slug: Some(slug.to_string()),
        like_count: 0,
    }
}

#[tokio::test]
async fn test_insert_and_get_article() {
    let (storage, _dir) = create_storage().await;

    let a = article("a1", "first-post", true);
    storage.insert_article(&a).await.unwrap();

    let loaded = storage.get_article("a1").await.unwrap().unwrap();
    assert_eq!(loaded.title, "Title a1");
    assert_eq!(loaded.slug.as_deref(), Some("first-post"));
    assert!(loaded.published);
    assert_eq!(loaded.like_count, 0);

    let by_slug = storage.get_article_by_slug("first-post").await.unwrap();
    assert_eq!(by_slug.map(|a| a.id), Some("a1".to_string()));

    assert!(storage.get_article("missing").await.unwrap().is_none());
    assert!(storage.get_article_by_slug("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_load_articles_respects_published_filter() {
    let (storage, _dir) = create_storage().await;

    storage.insert_article(&article("p1", "p1", true)).await.unwrap();
    storage.insert_article(&article("d1", "d1", false)).await.unwrap();

    let all = storage.load_articles(ArticleFilter::all()).await.unwrap();
    assert_eq!(all.len(), 2);

    let published = storage
        .load_articles(ArticleFilter::published())
        .await
        .unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].id, "p1");

    assert_eq!(storage.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_update_article_keeps_created_at() {
    let (storage, _dir) = create_storage().await;

    let original = article("u1", "update-me", false);
    storage.insert_article(&original).await.unwrap();

    let updated = Article {
        title: "New title".to_string(),
        published: true,
        updated_at: original.updated_at + Duration::minutes(5),
        thumbnail_url: Some("https://cdn.example.com/a.png".to_string()),
        ..original.clone()
    };
    storage.update_article(&updated).await.unwrap();

    let loaded = storage.get_article("u1").await.unwrap().unwrap();
    assert_eq!(loaded.title, "New title");
    assert!(loaded.published);
    assert_eq!(
        loaded.thumbnail_url.as_deref(),
        Some("https://cdn.example.com/a.png")
    );
    assert_eq!(
        loaded.created_at.timestamp(),
        original.created_at.timestamp()
    );
}

#[tokio::test]
async fn test_slug_exists_excludes_self() {
    let (storage, _dir) = create_storage().await;
    storage.insert_article(&article("s1", "taken", true)).await.unwrap();

    assert!(storage.slug_exists("taken", None).await.unwrap());
    assert!(!storage.slug_exists("taken", Some("s1")).await.unwrap());
    assert!(storage.slug_exists("taken", Some("other")).await.unwrap());
    assert!(!storage.slug_exists("free", None).await.unwrap());
}

#[tokio::test]
async fn test_register_like_is_idempotent_per_anonymous_id() {
    let (storage, _dir) = create_storage().await;
    storage.insert_article(&article("l1", "liked", true)).await.unwrap();

    let first = storage.register_like("l1", "anon-1").await.unwrap();
    assert_eq!(first.like_count, 1);
    assert!(!first.already_liked);

    let repeat = storage.register_like("l1", "anon-1").await.unwrap();
    assert_eq!(repeat.like_count, 1);
    assert!(repeat.already_liked);

    let other = storage.register_like("l1", "anon-2").await.unwrap();
    assert_eq!(other.like_count, 2);
    assert!(!other.already_liked);

    let loaded = storage.get_article("l1").await.unwrap().unwrap();
    assert_eq!(loaded.like_count, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_likes_count_each_anonymous_id_once() {
    let (storage, _dir) = create_storage().await;
    storage.insert_article(&article("c1", "c1", true)).await.unwrap();

    // 40 个并发请求，20 个不同的匿名 ID，每个 ID 两次
    let mut handles = Vec::new();
    for i in 0..40 {
        let storage = storage.clone();
        handles.push(tokio::spawn(async move {
            storage.register_like("c1", &format!("anon-{}", i % 20)).await
        }));
    }

    let mut newly_liked = 0;
    for handle in handles {
        let outcome = handle.await.unwrap().expect("concurrent like failed");
        if !outcome.already_liked {
            newly_liked += 1;
        }
    }

    assert_eq!(newly_liked, 20);
    let loaded = storage.get_article("c1").await.unwrap().unwrap();
    assert_eq!(loaded.like_count, 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicate_like_reports_already_liked() {
    let (storage, _dir) = create_storage().await;
    storage.insert_article(&article("c2", "c2", true)).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..10 {
        let storage = storage.clone();
        handles.push(tokio::spawn(async move {
            storage.register_like("c2", "same-anon").await
        }));
    }

    let mut already = 0;
    for handle in handles {
        let outcome = handle.await.unwrap().expect("concurrent like failed");
        assert_eq!(outcome.like_count, 1);
        if outcome.already_liked {
            already += 1;
        }
    }

    assert_eq!(already, 9);
}

#[tokio::test]
async fn test_register_like_unknown_article() {
    let (storage, _dir) = create_storage().await;
    let err = storage.register_like("nope", "anon").await.unwrap_err();
    assert!(matches!(err, BlogError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_article_removes_likes() {
    let (storage, _dir) = create_storage().await;
    storage.insert_article(&article("x1", "gone", true)).await.unwrap();
    storage.register_like("x1", "anon-1").await.unwrap();

    storage.delete_article("x1").await.unwrap();
    assert!(storage.get_article("x1").await.unwrap().is_none());

    // 同 id 重新插入后，旧的点赞记录不应残留
    storage.insert_article(&article("x1", "gone", true)).await.unwrap();
    let outcome = storage.register_like("x1", "anon-1").await.unwrap();
    assert!(!outcome.already_liked);
    assert_eq!(outcome.like_count, 1);

    let err = storage.delete_article("never-existed").await.unwrap_err();
    assert!(matches!(err, BlogError::NotFound(_)));
}

#[tokio::test]
async fn test_storage_factory_uses_configured_url() {
    init_static_config();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("factory_test.db");

    let mut config = (*get_config()).clone();
    config.database.database_url = format!("sqlite://{}?mode=rwc", db_path.display());
    update_config(config);

    let storage = StorageFactory::create().await.unwrap();
    assert_eq!(storage.get_backend_config().storage_type, "sqlite");
    assert_eq!(storage.count().await.unwrap(), 0);
}

#[test]
fn test_infer_backend_from_url() {
    assert_eq!(infer_backend_from_url("sqlite://blog.db").unwrap(), "sqlite");
    assert_eq!(infer_backend_from_url("blog.db").unwrap(), "sqlite");
    assert_eq!(
        infer_backend_from_url("postgres://u:p@localhost/blog").unwrap(),
        "postgres"
    );
    assert_eq!(
        infer_backend_from_url("mysql://u:p@localhost/blog").unwrap(),
        "mysql"
    );
    assert!(infer_backend_from_url("redis://localhost").is_err());
}
