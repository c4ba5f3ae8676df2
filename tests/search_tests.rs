//! Integration tests for the search service over a real SQLite store.

use recall::db::Store;
use recall::matching::MatchMode;
use recall::models::{NewSite, Site, TagMatch};
use recall::services::{SeaOrmSearchService, SearchRequest, SearchService};
use std::time::Duration;

async fn seeded(tag_match: TagMatch, pages: &[(&str, &str, &[&str])]) -> SeaOrmSearchService {
    let store = Store::new("sqlite::memory:")
        .await
        .expect("Failed to open in-memory store");

    for (i, (title, content, tags)) in pages.iter().enumerate() {
        store
            .create_site(&NewSite {
                url: format!("https://example.com/{i}"),
                title: (*title).to_string(),
                tags: tags.iter().map(|t| (*t).to_string()).collect(),
                content: (*content).to_string(),
                saved_path: format!("saved_pages/{i}.html"),
            })
            .await
            .expect("Failed to seed site");
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    SeaOrmSearchService::new(store, tag_match)
}

fn titles(sites: &[Site]) -> Vec<&str> {
    sites.iter().map(|s| s.title.as_str()).collect()
}

#[tokio::test]
async fn test_phrase_search() {
    let service = seeded(
        TagMatch::Token,
        &[
            ("joined", "say hello world now", &[]),
            ("split", "say hello, world now", &[]),
        ],
    )
    .await;

    let request = SearchRequest::new("hello world", MatchMode::Phrase, 10);
    let results = service.search_content(&request).await.unwrap();
    assert_eq!(titles(&results), vec!["joined"]);

    let request = SearchRequest::new("HELLO World", MatchMode::Phrase, 10);
    let results = service.search_content(&request).await.unwrap();
    assert_eq!(titles(&results), vec!["joined"]);
}

#[tokio::test]
async fn test_multi_term_search() {
    let service = seeded(
        TagMatch::Token,
        &[
            ("both", "beta comes before alpha here", &[]),
            ("one", "alpha only", &[]),
        ],
    )
    .await;

    let request = SearchRequest::new("alpha beta", MatchMode::MultiTerm, 10);
    let results = service.search_content(&request).await.unwrap();
    assert_eq!(titles(&results), vec!["both"]);
}

#[tokio::test]
async fn test_whole_word_search() {
    let service = seeded(
        TagMatch::Token,
        &[
            ("sentence", "the cat sat", &[]),
            ("punctuated", "cat.", &[]),
            ("bare", "cat", &[]),
            ("prefix", "category", &[]),
            ("infix", "concatenate", &[]),
        ],
    )
    .await;

    let request = SearchRequest::new("cat", MatchMode::WholeWord, 10);
    let results = service.search_content(&request).await.unwrap();
    assert_eq!(titles(&results), vec!["bare", "punctuated", "sentence"]);

    let request = SearchRequest::new("cat", MatchMode::Phrase, 10);
    let results = service.search_content(&request).await.unwrap();
    assert_eq!(results.len(), 5);
}

#[tokio::test]
async fn test_blank_query_returns_nothing() {
    let service = seeded(TagMatch::Token, &[("page", "anything at all", &[])]).await;

    for mode in [MatchMode::Phrase, MatchMode::WholeWord, MatchMode::MultiTerm] {
        for query in ["", "   ", "\t\n"] {
            let request = SearchRequest::new(query, mode, 10);
            assert!(service.search_content(&request).await.unwrap().is_empty());
            assert!(service.search_titles(&request).await.unwrap().is_empty());
        }
    }
}

#[tokio::test]
async fn test_title_search() {
    let service = seeded(
        TagMatch::Token,
        &[
            ("Understanding Ownership", "body one", &[]),
            ("Async in depth", "ownership is mentioned here", &[]),
        ],
    )
    .await;

    let request = SearchRequest::new("ownership", MatchMode::Phrase, 10);
    let results = service.search_titles(&request).await.unwrap();
    assert_eq!(titles(&results), vec!["Understanding Ownership"]);
}

#[tokio::test]
async fn test_tag_filters() {
    let pages: &[(&str, &str, &[&str])] = &[
        ("both", "rust news", &["news", "2024"]),
        ("news only", "rust news", &["news"]),
        ("newsletter", "rust news", &["newsletter", "2024"]),
    ];

    let token = seeded(TagMatch::Token, pages).await;
    let request = SearchRequest::new("rust", MatchMode::Phrase, 10).with_tags(["news", "2024"]);
    let results = token.search_content(&request).await.unwrap();
    assert_eq!(titles(&results), vec!["both"]);

    let request = SearchRequest::new("rust", MatchMode::Phrase, 10).with_tags(["NEWS"]);
    let results = token.search_content(&request).await.unwrap();
    assert_eq!(titles(&results), vec!["news only", "both"]);

    let substring = seeded(TagMatch::Substring, pages).await;
    let request = SearchRequest::new("rust", MatchMode::Phrase, 10).with_tags(["news", "2024"]);
    let results = substring.search_content(&request).await.unwrap();
    assert_eq!(titles(&results), vec!["newsletter", "both"]);
}

#[tokio::test]
async fn test_limit_keeps_newest() {
    let service = seeded(
        TagMatch::Token,
        &[
            ("t1", "common", &[]),
            ("t2", "common", &[]),
            ("t3", "common", &[]),
        ],
    )
    .await;

    let request = SearchRequest::new("common", MatchMode::Phrase, 2);
    let results = service.search_content(&request).await.unwrap();
    assert_eq!(titles(&results), vec!["t3", "t2"]);
}
