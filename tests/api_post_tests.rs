//! Post API integration tests

use axum::http::{Method, StatusCode};
use serde_json::json;

mod common;
use common::{create_test_app, create_test_app_with_config, create_test_config};

#[tokio::test]
async fn test_ngo_post_waits_for_approval() {
    let app = create_test_app();
    let ngo = app.register_user("waterfirst", "NGO").await;
    let admin = app.register_user("root", "ADMIN").await;

    let post = app.create_post(&ngo, "Clean water for Kibera").await;
    assert_eq!(post["approved"], false);
    let id = post["id"].as_i64().unwrap();

    // not in the public feed yet
    let feed = app.request(Method::GET, "/api/posts", None, None).await;
    assert_eq!(feed.status, StatusCode::OK);
    assert_eq!(feed.json(), json!([]));

    let pending = app
        .request(Method::GET, "/api/posts/pending", Some(&admin), None)
        .await;
    assert_eq!(pending.status, StatusCode::OK);
    assert_eq!(pending.json().as_array().unwrap().len(), 1);

    let approved = app
        .request(
            Method::PUT,
            &format!("/api/posts/{}/approve?approved=true", id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(approved.status, StatusCode::OK);
    assert_eq!(approved.json()["approved"], true);

    let feed = app.request(Method::GET, "/api/posts", None, None).await;
    assert_eq!(feed.json()[0]["title"], "Clean water for Kibera");
}

#[tokio::test]
async fn test_only_admin_and_ngo_create_posts() {
    let app = create_test_app();
    let volunteer = app.register_user("alice", "VOLUNTEER").await;

    let response = app
        .request(
            Method::POST,
            "/api/posts",
            Some(&volunteer),
            Some(json!({"title": "Mine", "body": "Please"})),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            Method::POST,
            "/api/posts",
            None,
            Some(json!({"title": "Mine", "body": "Please"})),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_ngo_cannot_post_as_someone_else() {
    let app = create_test_app();
    let ngo = app.register_user("waterfirst", "NGO").await;
    let ngo_id = app.state.codec.parse(&ngo).unwrap().user_id;

    let response = app
        .request(
            Method::POST,
            "/api/posts",
            Some(&ngo),
            Some(json!({"title": "Wells", "body": "Water", "authorId": 999})),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json()["authorId"], ngo_id);
}

#[tokio::test]
async fn test_admin_can_post_on_behalf() {
    let app = create_test_app();
    let admin = app.register_user("root", "ADMIN").await;

    let response = app
        .request(
            Method::POST,
            "/api/posts",
            Some(&admin),
            Some(json!({"title": "Wells", "body": "Water", "authorId": 42})),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json()["authorId"], 42);
}

#[tokio::test]
async fn test_modify_requires_owner_or_admin() {
    let app = create_test_app();
    let owner = app.register_user("waterfirst", "NGO").await;
    let other = app.register_user("booksforall", "NGO").await;
    let admin = app.register_user("root", "ADMIN").await;

    let post = app.create_post(&owner, "Wells").await;
    let uri = format!("/api/posts/{}", post["id"]);
    let update = json!({"title": "Deeper wells", "body": "More water", "moneyGoal": 8000.0});

    let response = app
        .request(Method::PUT, &uri, Some(&other), Some(update.clone()))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(Method::PUT, &uri, Some(&owner), Some(update.clone()))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["title"], "Deeper wells");

    let response = app.request(Method::DELETE, &uri, Some(&other), None).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app.request(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app.request(Method::GET, &uri, None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pending_requires_admin() {
    let app = create_test_app();
    let ngo = app.register_user("waterfirst", "NGO").await;

    let response = app.request(Method::GET, "/api/posts/pending", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request(Method::GET, "/api/posts/pending", Some(&ngo), None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unapproved_posts_hidden_from_public_reads() {
    let app = create_test_app();
    let ngo = app.register_user("waterfirst", "NGO").await;
    let other = app.register_user("booksforall", "NGO").await;
    let admin = app.register_user("root", "ADMIN").await;
    let ngo_id = app.state.codec.parse(&ngo).unwrap().user_id;

    let post = app.create_post(&ngo, "Clean water scam").await;
    let post_uri = format!("/api/posts/{}", post["id"]);
    let author_uri = format!("/api/posts/author/{}", ngo_id);
    let search_uri = "/api/posts/search?keyword=scam";

    // anonymous and unrelated callers see nothing
    for token in [None, Some(other.as_str())] {
        let response = app.request(Method::GET, &post_uri, token, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);

        let response = app.request(Method::GET, &author_uri, token, None).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json(), json!([]));

        let response = app.request(Method::GET, search_uri, token, None).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json()["totalElements"], 0);
        assert_eq!(response.json()["content"], json!([]));
    }

    // the author sees their own pending post by id and by author
    let response = app.request(Method::GET, &post_uri, Some(&ngo), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["approved"], false);
    let response = app.request(Method::GET, &author_uri, Some(&ngo), None).await;
    assert_eq!(response.json().as_array().unwrap().len(), 1);
    let response = app.request(Method::GET, search_uri, Some(&ngo), None).await;
    assert_eq!(response.json()["totalElements"], 0);

    // admins see everything
    let response = app.request(Method::GET, &post_uri, Some(&admin), None).await;
    assert_eq!(response.status, StatusCode::OK);
    let response = app.request(Method::GET, &author_uri, Some(&admin), None).await;
    assert_eq!(response.json().as_array().unwrap().len(), 1);
    let response = app.request(Method::GET, search_uri, Some(&admin), None).await;
    assert_eq!(response.json()["totalElements"], 1);
}

#[tokio::test]
async fn test_posts_by_author_and_search() {
    let app = create_test_app();
    let ngo = app.register_user("waterfirst", "NGO").await;
    let admin = app.register_user("root", "ADMIN").await;
    let ngo_id = app.state.codec.parse(&ngo).unwrap().user_id;

    for title in ["Water wells", "School books", "Rain water tanks"] {
        let post = app.create_post(&ngo, title).await;
        let response = app
            .request(
                Method::PUT,
                &format!("/api/posts/{}/approve?approved=true", post["id"]),
                Some(&admin),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }
    app.create_post(&ngo, "Water pumps").await;

    let response = app
        .request(Method::GET, &format!("/api/posts/author/{}", ngo_id), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json().as_array().unwrap().len(), 3);

    let response = app
        .request(Method::GET, "/api/posts/search?keyword=WATER&page=0&size=1", None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let page = response.json();
    assert_eq!(page["totalElements"], 2);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["content"][0]["title"], "Water wells");
}

#[tokio::test]
async fn test_invalid_post_body_is_bad_request() {
    let app = create_test_app();
    let ngo = app.register_user("waterfirst", "NGO").await;

    let response = app
        .request(
            Method::POST,
            "/api/posts",
            Some(&ngo),
            Some(json!({"title": "", "body": "Water"})),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(Method::POST, "/api/posts", Some(&ngo), Some(json!({"title": 5})))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_body_is_payload_too_large() {
    let mut config = create_test_config();
    config.server.max_body_bytes = 1024;
    let app = create_test_app_with_config(config);
    let ngo = app.register_user("waterfirst", "NGO").await;

    // no Content-Length, so the limit trips while the body is read
    let response = app
        .request(
            Method::POST,
            "/api/posts",
            Some(&ngo),
            Some(json!({"title": "Wells", "body": "x".repeat(4096)})),
        )
        .await;
    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.json()["error"]["code"], 413);
}
