//! Contract tests: /api/blog

mod common;

use axum::http::StatusCode;
use common::{build_app, request, send};
use serde_json::json;
use tooldir_server::models::{Article, GlossaryTerm};
use uuid::Uuid;

#[tokio::test]
async fn article_detail_resolves_terms() {
    let t = build_app();
    let mut term = GlossaryTerm::new("Embedding", "embedding");
    term.definitions = vec!["A dense vector".into()];
    let term = t.store.insert_term(term).await;

    let mut article = Article::new("Vectors 101", "vectors-101");
    article.glossary_term_ids = vec![term.id];
    article
        .extra
        .insert("hero_image".into(), json!("https://cdn.example.com/a.png"));
    let article = t.store.insert_article(article).await;

    let (status, body) = send(
        &t.app,
        request("GET", &format!("/api/blog/articles/{}", article.id), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Vectors 101");
    assert_eq!(body["hero_image"], "https://cdn.example.com/a.png");
    assert_eq!(body["glossary_terms"][0]["name"], "Embedding");

    let (status, by_slug) = send(
        &t.app,
        request("GET", "/api/blog/articles/slug/vectors-101", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_slug["id"], article.id.to_string());
}

#[tokio::test]
async fn relink_round_trip() {
    let t = build_app();
    let a = t.store.insert_term(GlossaryTerm::new("A", "a")).await;
    let b = t.store.insert_term(GlossaryTerm::new("B", "b")).await;
    let article = t.store.insert_article(Article::new("Post", "post")).await;
    let uri = format!("/api/blog/articles/{}/glossary-terms", article.id);

    let (status, body) = send(
        &t.app,
        request(
            "PUT",
            &uri,
            None,
            Some(json!({"glossary_term_ids": [a.id, b.id, a.id]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["glossary_term_ids"].as_array().unwrap().len(), 2);

    let (_, related) = send(
        &t.app,
        request("GET", &format!("/api/blog/by-term/{}", a.id), None, None),
    )
    .await;
    assert_eq!(related["total"], 1);

    send(&t.app, request("PUT", &uri, None, Some(json!({"glossary_term_ids": [b.id]})))).await;

    let (_, term_a) = send(
        &t.app,
        request("GET", &format!("/api/blog/glossary-terms/{}", a.id), None, None),
    )
    .await;
    assert!(term_a["related_articles"].as_array().unwrap().is_empty());

    let (_, related) = send(
        &t.app,
        request("GET", &format!("/api/blog/by-term/{}", a.id), None, None),
    )
    .await;
    assert_eq!(related["total"], 0);
}

#[tokio::test]
async fn relink_rejects_bad_or_unknown_ids() {
    let t = build_app();
    let article = t.store.insert_article(Article::new("Post", "post")).await;
    let uri = format!("/api/blog/articles/{}/glossary-terms", article.id);

    let (status, _) = send(
        &t.app,
        request("PUT", &uri, None, Some(json!({"glossary_term_ids": ["nope"]}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &t.app,
        request(
            "PUT",
            &uri,
            None,
            Some(json!({"glossary_term_ids": [Uuid::new_v4()]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn listings_paginate() {
    let t = build_app();
    for i in 0..3 {
        t.store
            .insert_article(Article::new(format!("Post {i}"), format!("post-{i}")))
            .await;
        t.store
            .insert_term(GlossaryTerm::new(format!("Term {i}"), format!("term-{i}")))
            .await;
    }

    let (status, articles) = send(
        &t.app,
        request("GET", "/api/blog/articles?limit=2&sort_by=title", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(articles["total"], 3);
    assert_eq!(articles["items"].as_array().unwrap().len(), 2);
    assert_eq!(articles["items"][0]["title"], "Post 0");

    let (_, terms) = send(
        &t.app,
        request("GET", "/api/blog/glossary-terms?skip=2", None, None),
    )
    .await;
    assert_eq!(terms["total"], 3);
    assert_eq!(terms["items"][0]["name"], "Term 2");
}

#[tokio::test]
async fn unknown_term_listing_is_404() {
    let t = build_app();
    let (status, _) = send(
        &t.app,
        request("GET", &format!("/api/blog/by-term/{}", Uuid::new_v4()), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
