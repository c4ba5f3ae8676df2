//! Integration tests for the record store.

use recall::db::{SiteQuery, Store, StoreError};
use recall::matching::{MatchMode, Matcher, TextPredicate};
use recall::models::{NewSite, TagFilter, TagMatch, TextField};
use std::time::Duration;

async fn memory_store() -> Store {
    Store::new("sqlite::memory:")
        .await
        .expect("Failed to open in-memory store")
}

async fn file_store(dir: &tempfile::TempDir) -> Store {
    let url = format!("sqlite://{}", dir.path().join("recall.db").display());
    Store::with_pool_options(&url, 5, 1)
        .await
        .expect("Failed to open file store")
}

fn new_site(url: &str, title: &str, tags: &[&str], content: &str) -> NewSite {
    NewSite {
        url: url.to_string(),
        title: title.to_string(),
        tags: tags.iter().map(|t| (*t).to_string()).collect(),
        content: content.to_string(),
        saved_path: format!("saved_pages/{}.html", uuid::Uuid::new_v4()),
    }
}

async fn query_ids(
    store: &Store,
    field: TextField,
    predicate: &dyn TextPredicate,
    tags: &TagFilter,
    limit: usize,
) -> Vec<i32> {
    let query = SiteQuery {
        field,
        predicate,
        tags,
        limit,
    };
    store
        .query_sites(&query)
        .await
        .expect("Query failed")
        .into_iter()
        .map(|site| site.id)
        .collect()
}

#[tokio::test]
async fn test_create_and_get_roundtrip() {
    let store = memory_store().await;

    let created = store
        .create_site(&new_site(
            "https://example.com/a",
            "Example A",
            &[" news", "Rust", "NEWS", ""],
            "Some body text",
        ))
        .await
        .unwrap();

    assert!(created.id > 0);
    assert_eq!(created.tags, "news,Rust");
    assert_eq!(created.tag_list(), vec!["news", "Rust"]);

    let fetched = store.get_site(created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);

    let url = store.get_site_url(created.id).await.unwrap();
    assert_eq!(url.as_deref(), Some("https://example.com/a"));
}

#[tokio::test]
async fn test_unknown_id() {
    let store = memory_store().await;

    assert!(store.get_site(999).await.unwrap().is_none());
    assert!(store.get_site_url(999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_url_rejected() {
    let store = memory_store().await;
    let site = new_site("https://example.com/dup", "Dup", &[], "text");

    store.create_site(&site).await.unwrap();
    let err = store.create_site(&site).await.unwrap_err();

    assert!(matches!(err, StoreError::DuplicateUrl(url) if url == "https://example.com/dup"));
    assert_eq!(store.count_sites().await.unwrap(), 1);
    assert!(
        store
            .find_site_by_url("https://example.com/dup")
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn test_concurrent_duplicate_creates() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir).await;

    let a = new_site("https://example.com/race", "A", &[], "first");
    let b = new_site("https://example.com/race", "B", &[], "second");

    let (first, second) = tokio::join!(store.create_site(&a), store.create_site(&b));

    let outcomes = [first, second];
    let successes = outcomes.iter().filter(|r| r.is_ok()).count();
    let duplicates = outcomes
        .iter()
        .filter(|r| matches!(r, Err(StoreError::DuplicateUrl(_))))
        .count();

    assert_eq!(successes, 1);
    assert_eq!(duplicates, 1);
    assert_eq!(store.count_sites().await.unwrap(), 1);
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let id = {
        let store = file_store(&dir).await;
        store
            .create_site(&new_site("https://example.com/kept", "Kept", &["a"], "body"))
            .await
            .unwrap()
            .id
    };

    let store = file_store(&dir).await;
    let site = store.get_site(id).await.unwrap().unwrap();
    assert_eq!(site.title, "Kept");
    assert_eq!(site.tags, "a");
}

#[tokio::test]
async fn test_newest_first_with_limit() {
    let store = memory_store().await;

    let mut ids = Vec::new();
    for n in 1..=3 {
        let site = store
            .create_site(&new_site(
                &format!("https://example.com/{n}"),
                &format!("Page {n}"),
                &[],
                "shared words",
            ))
            .await
            .unwrap();
        ids.push(site.id);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let everything = |_: &str| true;
    let no_tags = TagFilter::default();

    let all = query_ids(&store, TextField::Content, &everything, &no_tags, 10).await;
    assert_eq!(all, vec![ids[2], ids[1], ids[0]]);

    let limited = query_ids(&store, TextField::Content, &everything, &no_tags, 2).await;
    assert_eq!(limited, vec![ids[2], ids[1]]);

    assert!(
        query_ids(&store, TextField::Content, &everything, &no_tags, 0)
            .await
            .is_empty()
    );
}

#[tokio::test]
async fn test_equal_timestamps_keep_insertion_order() {
    use recall::entities::sites;
    use sea_orm::{ActiveModelTrait, Set};

    let store = memory_store().await;

    let insert = |title: &str, created_at: &str| sites::ActiveModel {
        url: Set(format!("https://example.com/{title}")),
        title: Set(title.to_string()),
        tags: Set(String::new()),
        content: Set("same moment".to_string()),
        saved_path: Set(format!("saved_pages/{title}.html")),
        created_at: Set(created_at.to_string()),
        ..Default::default()
    };

    let mut tied = Vec::new();
    for title in ["t0", "t1", "t2"] {
        let model = insert(title, "2024-01-01T00:00:00.000000Z")
            .insert(&store.conn)
            .await
            .unwrap();
        tied.push(model.id);
    }
    let later = insert("later", "2024-01-02T00:00:00.000000Z")
        .insert(&store.conn)
        .await
        .unwrap()
        .id;

    let everything = |_: &str| true;
    let no_tags = TagFilter::default();

    let all = query_ids(&store, TextField::Content, &everything, &no_tags, 10).await;
    assert_eq!(all, vec![later, tied[0], tied[1], tied[2]]);

    let limited = query_ids(&store, TextField::Content, &everything, &no_tags, 3).await;
    assert_eq!(limited, vec![later, tied[0], tied[1]]);
}

#[tokio::test]
async fn test_tag_filter_requires_all_tags() {
    let store = memory_store().await;

    let both = store
        .create_site(&new_site("https://a.example", "A", &["news", "2024"], "x"))
        .await
        .unwrap();
    store
        .create_site(&new_site("https://b.example", "B", &["news"], "x"))
        .await
        .unwrap();
    store
        .create_site(&new_site("https://c.example", "C", &["2024"], "x"))
        .await
        .unwrap();

    let everything = |_: &str| true;
    let filter = TagFilter::new(TagMatch::Token, ["news", "2024"]);

    let ids = query_ids(&store, TextField::Content, &everything, &filter, 10).await;
    assert_eq!(ids, vec![both.id]);
}

#[tokio::test]
async fn test_query_reads_selected_field() {
    let store = memory_store().await;

    let site = store
        .create_site(&new_site(
            "https://example.com/field",
            "Ownership in Rust",
            &[],
            "Nothing about the title here",
        ))
        .await
        .unwrap();

    let matcher = Matcher::new("ownership", MatchMode::Phrase).unwrap();
    let no_tags = TagFilter::default();

    let by_title = query_ids(&store, TextField::Title, &matcher, &no_tags, 10).await;
    assert_eq!(by_title, vec![site.id]);

    let by_content = query_ids(&store, TextField::Content, &matcher, &no_tags, 10).await;
    assert!(by_content.is_empty());
}

#[tokio::test]
async fn test_ping() {
    let store = memory_store().await;
    store.ping().await.unwrap();
}
