mod common;

use anyhow::Result;
use blog_api_rust::database::models::PostStatus;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn lists_published_posts_with_page_math() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    for i in 1..=12 {
        server.ctx.seed_post(&format!("published {i}"), PostStatus::Published).await;
    }
    server.ctx.seed_post("a draft", PostStatus::Draft).await;

    let res = server
        .client()
        .get(server.url("/posts?page=2&limit=5"))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["currentPage"], 2);
    assert_eq!(body["totalPages"], 3);

    let posts = body["posts"].as_array().cloned().unwrap_or_default();
    let ids: Vec<i64> = posts.iter().filter_map(|p| p["id"].as_i64()).collect();
    assert_eq!(ids, vec![6, 7, 8, 9, 10]);

    // Listing projection only
    assert!(posts[0].get("status").is_none());
    assert!(posts[0].get("userId").is_none());
    assert!(posts[0].get("createdAt").is_some());
    Ok(())
}

#[tokio::test]
async fn list_defaults_to_first_page_of_ten() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    server.ctx.seed_post("only", PostStatus::Published).await;

    let body = server
        .client()
        .get(server.url("/posts"))
        .send()
        .await?
        .json::<Value>()
        .await?;

    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["totalPages"], 1);
    assert_eq!(body["posts"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn empty_store_has_zero_pages() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let body = server
        .client()
        .get(server.url("/posts"))
        .send()
        .await?
        .json::<Value>()
        .await?;

    assert_eq!(body["posts"], json!([]));
    assert_eq!(body["totalPages"], 0);
    Ok(())
}

#[tokio::test]
async fn invalid_pagination_is_rejected_before_the_store() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    for (query, expected) in [
        ("page=0", json!(["Page must be a positive number"])),
        ("page=abc", json!(["Page must be a positive number"])),
        ("limit=101", json!(["Limit must be between 1 and 100"])),
        ("limit=0", json!(["Limit must be between 1 and 100"])),
        (
            "page=-1&limit=x",
            json!(["Page must be a positive number", "Limit must be between 1 and 100"]),
        ),
    ] {
        let res = server
            .client()
            .get(server.url(&format!("/posts?{query}")))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{query}");
        let body = res.json::<Value>().await?;
        assert_eq!(body["errors"], expected, "{query}");
    }

    assert_eq!(server.ctx.store_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn repeated_query_key_is_a_json_validation_error() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server
        .client()
        .get(server.url("/posts?page=1&page=2"))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let content_type = res
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/json"), "{content_type}");

    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["errors"], json!(["Page must be a positive number"]));
    assert_eq!(server.ctx.store_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn trailing_text_after_digits_is_ignored() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    for i in 1..=3 {
        server.ctx.seed_post(&format!("post {i}"), PostStatus::Published).await;
    }

    let body = server
        .client()
        .get(server.url("/posts?page=2abc&limit=2.0"))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(body["currentPage"], 2);
    assert_eq!(body["totalPages"], 2);

    let res = server.client().get(server.url("/posts/3abc")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let post = res.json::<Value>().await?;
    assert_eq!(post["id"], 3);
    Ok(())
}

#[tokio::test]
async fn undecodable_post_id_is_a_json_validation_error() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server.client().get(server.url("/posts/%FF")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["errors"], json!(["Invalid post ID. Must be a positive number"]));
    assert_eq!(server.ctx.store_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn draft_post_is_not_found() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let draft = server.ctx.seed_post("hidden", PostStatus::Draft).await;

    let res = server
        .client()
        .get(server.url(&format!("/posts/{}", draft.id)))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Post not found");
    Ok(())
}

#[tokio::test]
async fn missing_post_is_not_found() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let res = server.client().get(server.url("/posts/999")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn invalid_post_id_is_bad_request() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    for id in ["0", "-3", "abc"] {
        let res = server
            .client()
            .get(server.url(&format!("/posts/{id}")))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{id}");
        let body = res.json::<Value>().await?;
        assert_eq!(body["errors"], json!(["Invalid post ID. Must be a positive number"]));
    }
    assert_eq!(server.ctx.store_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn created_post_round_trips_tags_in_order() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let created = server
        .create_post(
            5,
            &json!({
                "title": "Round trip",
                "body": "b",
                "tags": ["a", "b"],
                "status": "published"
            }),
        )
        .await?
        .json::<Value>()
        .await?;
    let id = created["id"].as_i64().unwrap_or_default();

    let fetched = server
        .client()
        .get(server.url(&format!("/posts/{id}")))
        .send()
        .await?;
    assert_eq!(fetched.status(), StatusCode::OK);
    let fetched = fetched.json::<Value>().await?;
    assert_eq!(fetched["tags"], json!(["a", "b"]));
    assert_eq!(fetched, created);
    Ok(())
}

#[tokio::test]
async fn read_store_failures_are_500() -> Result<()> {
    let server = common::TestServer::spawn_failing().await?;

    let res = server.client().get(server.url("/posts")).send().await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let res = server.client().get(server.url("/posts/1")).send().await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    Ok(())
}
