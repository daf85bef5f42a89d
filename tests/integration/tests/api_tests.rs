//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL (JWT_SECRET and API_PORT default)
//!
//! Run with: cargo test -p integration-tests --test api_tests

use std::time::Duration;

use integration_tests::{
    assert_error, assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;
use serde_json::{json, Value};
use wayfarer_core::Role;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get_raw("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get_raw("/health/ready").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ready");
}

// ============================================================================
// Auth and request shape
// ============================================================================

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .client
        .post(format!("{}/api/v1/posts", server.base_url()))
        .json(&CreatePostBody::unique())
        .send()
        .await
        .unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "MISSING_AUTH").await.unwrap();
}

#[tokio::test]
async fn test_invalid_path_id() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/posts/not-an-id").await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "INVALID_PATH_PARAMETER")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_short_post_is_rejected() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.seed_user(Role::User).await.unwrap();

    let mut body = CreatePostBody::unique();
    body.content = "too short".to_string();
    let response = server.post_auth("/posts", &author, &body).await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await.unwrap();
}

// ============================================================================
// Votes and saves
// ============================================================================

#[tokio::test]
async fn test_vote_toggle_cycle() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.seed_user(Role::User).await.unwrap();
    let voter = server.seed_user(Role::User).await.unwrap();

    let response = server.post_auth("/posts", &author, &CreatePostBody::unique()).await.unwrap();
    let post: PostBody = assert_json(response, StatusCode::CREATED).await.unwrap();
    let path = format!("/posts/{}/vote", post.id);

    let added: VoteResult =
        assert_json(server.put_auth(&path, &voter, &VoteBody::up()).await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert_eq!(added.action, "added");
    assert_eq!((added.upvote_count, added.downvote_count), (1, 0));

    let switched: VoteResult =
        assert_json(server.put_auth(&path, &voter, &VoteBody::down()).await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert_eq!(switched.action, "switched");
    assert_eq!(switched.vote.as_deref(), Some("downvote"));
    assert_eq!((switched.upvote_count, switched.downvote_count), (0, 1));

    let removed: VoteResult =
        assert_json(server.put_auth(&path, &voter, &VoteBody::down()).await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert_eq!(removed.action, "removed");
    assert!(removed.vote.is_none());

    let status: Value = assert_json(server.get_auth(&path, &voter).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(status["hasVoted"], false);

    let fetched: PostBody =
        assert_json(server.get(&format!("/posts/{}", post.id)).await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert_eq!((fetched.upvote_count, fetched.downvote_count), (0, 0));
}

#[tokio::test]
async fn test_concurrent_votes_keep_counters_exact() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.seed_user(Role::User).await.unwrap();
    let response = server.post_auth("/posts", &author, &CreatePostBody::unique()).await.unwrap();
    let post: PostBody = assert_json(response, StatusCode::CREATED).await.unwrap();

    let mut voters = Vec::new();
    for _ in 0..8 {
        voters.push(server.seed_user(Role::User).await.unwrap());
    }

    let url = format!("{}/api/v1/posts/{}/vote", server.base_url(), post.id);
    let mut handles = Vec::new();
    for voter in voters {
        let client = server.client.clone();
        let url = url.clone();
        handles.push(tokio::spawn(async move {
            client
                .put(url)
                .bearer_auth(&voter.token)
                .json(&VoteBody::up())
                .send()
                .await
        }));
    }
    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert_status(response, StatusCode::OK).await.unwrap();
    }

    let fetched: PostBody =
        assert_json(server.get(&format!("/posts/{}", post.id)).await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert_eq!(fetched.upvote_count, 8);
}

#[tokio::test]
async fn test_save_toggle_and_listing() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.seed_user(Role::User).await.unwrap();
    let reader = server.seed_user(Role::User).await.unwrap();
    let response = server.post_auth("/posts", &author, &CreatePostBody::unique()).await.unwrap();
    let post: PostBody = assert_json(response, StatusCode::CREATED).await.unwrap();

    let path = format!("/posts/{}/save", post.id);
    let saved: Value = assert_json(server.put_auth(&path, &reader, &json!({})).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(saved["saved"], true);

    let list: Value = assert_json(
        server.get_auth("/users/@me/saved-posts", &reader).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(list["meta"]["total"], 1);
    assert_eq!(list["data"][0]["id"], post.id.as_str());

    assert_status(
        server.delete_auth(&format!("/posts/{}", post.id), &author).await.unwrap(),
        StatusCode::NO_CONTENT,
    )
    .await
    .unwrap();

    let list: Value = assert_json(
        server.get_auth("/users/@me/saved-posts", &reader).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(list["meta"]["total"], 0);

    let response = server.put_auth(&path, &reader, &json!({})).await.unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "UNKNOWN_POST").await.unwrap();
}

#[tokio::test]
async fn test_my_posts_edit_and_feed() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.seed_user(Role::User).await.unwrap();
    let other = server.seed_user(Role::User).await.unwrap();

    let mut ids = Vec::new();
    for _ in 0..2 {
        let response = server.post_auth("/posts", &author, &CreatePostBody::unique()).await.unwrap();
        let post: PostBody = assert_json(response, StatusCode::CREATED).await.unwrap();
        ids.push(post.id);
    }

    let mine: Value = assert_json(
        server.get_auth("/users/@me/posts", &author).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(mine["meta"]["total"], 2);
    assert_eq!(mine["data"][0]["id"], ids[1].as_str());

    let path = format!("/posts/{}", ids[0]);
    let edit = json!({ "title": "River crossing at dawn" });
    let response = server.patch_auth(&path, &other, &edit).await.unwrap();
    assert_error(response, StatusCode::FORBIDDEN, "FORBIDDEN").await.unwrap();

    let updated: Value = assert_json(server.patch_auth(&path, &author, &edit).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(updated["title"], "River crossing at dawn");
    assert_eq!(updated["category"], "Adventure");

    let feed: Value = assert_json(server.get("/posts?sort=popular&limit=5").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert!(feed["data"].as_array().is_some_and(|posts| posts.len() <= 5));

    let response = server.get("/posts?sort=cheapest").await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "INVALID_QUERY_PARAMETER")
        .await
        .unwrap();
}

// ============================================================================
// Follows
// ============================================================================

#[tokio::test]
async fn test_follow_toggle() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let a = server.seed_user(Role::User).await.unwrap();
    let b = server.seed_user(Role::User).await.unwrap();

    let response = server.put_auth(&format!("/users/{}/follow", a.id), &a, &json!({})).await.unwrap();
    assert_error(response, StatusCode::UNPROCESSABLE_ENTITY, "CANNOT_FOLLOW_SELF")
        .await
        .unwrap();

    let path = format!("/users/{}/follow", b.id);
    let followed: FollowResult = assert_json(server.put_auth(&path, &a, &json!({})).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(followed.action, "added");
    assert!(followed.following);
    assert_eq!(followed.follower_count, 1);

    let followers: Value = assert_json(
        server.get(&format!("/users/{}/followers", b.id)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(followers["data"][0]["id"], a.id.to_string());

    let unfollowed: FollowResult = assert_json(server.put_auth(&path, &a, &json!({})).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(unfollowed.action, "removed");
    assert_eq!(unfollowed.follower_count, 0);
}

// ============================================================================
// Comment threads
// ============================================================================

#[tokio::test]
async fn test_comment_thread_depth_and_preview() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.seed_user(Role::User).await.unwrap();
    let commenter = server.seed_user(Role::User).await.unwrap();
    let response = server.post_auth("/posts", &author, &CreatePostBody::unique()).await.unwrap();
    let post: PostBody = assert_json(response, StatusCode::CREATED).await.unwrap();
    let comments = format!("/posts/{}/comments", post.id);

    let root: CommentResult = assert_json(
        server.post_auth(&comments, &commenter, &CommentBody::root("First!")).await.unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    assert_eq!(root.depth, 0);

    let reply: CommentResult = assert_json(
        server
            .post_auth(&comments, &author, &CommentBody::reply("Thanks", &root.id))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    assert_eq!(reply.depth, 1);

    let nested: CommentResult = assert_json(
        server
            .post_auth(&comments, &commenter, &CommentBody::reply("Anytime", &reply.id))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    assert_eq!(nested.depth, 2);

    let response = server
        .post_auth(&comments, &author, &CommentBody::reply("Too deep", &nested.id))
        .await
        .unwrap();
    assert_error(response, StatusCode::UNPROCESSABLE_ENTITY, "DEPTH_EXCEEDED")
        .await
        .unwrap();

    let listing: Value = assert_json(server.get(&comments).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(listing["meta"]["total"], 1);
    assert_eq!(listing["data"][0]["replyCount"], 1);
    assert_eq!(listing["data"][0]["replies"][0]["id"], reply.id.as_str());
    assert_eq!(listing["data"][0]["hasMoreReplies"], false);

    let replies: Value = assert_json(
        server.get(&format!("/comments/{}/replies", reply.id)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(replies["data"][0]["id"], nested.id.as_str());
}

#[tokio::test]
async fn test_comment_edit_and_delete_permissions() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let author = server.seed_user(Role::User).await.unwrap();
    let other = server.seed_user(Role::User).await.unwrap();
    let admin = server.seed_user(Role::Admin).await.unwrap();
    let response = server.post_auth("/posts", &author, &CreatePostBody::unique()).await.unwrap();
    let post: PostBody = assert_json(response, StatusCode::CREATED).await.unwrap();

    let comment: CommentResult = assert_json(
        server
            .post_auth(&format!("/posts/{}/comments", post.id), &author, &CommentBody::root("Original"))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    let path = format!("/comments/{}", comment.id);

    let response = server.patch_auth(&path, &other, &json!({"content": "Hijacked"})).await.unwrap();
    assert_error(response, StatusCode::FORBIDDEN, "NOT_COMMENT_AUTHOR").await.unwrap();

    let edited: Value = assert_json(
        server.patch_auth(&path, &author, &json!({"content": "Edited"})).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(edited["isEdited"], true);

    let response = server.delete_auth(&path, &other).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server.delete_auth(&path, &admin).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
}

// ============================================================================
// Travel plans and notifications
// ============================================================================

#[tokio::test]
async fn test_travel_request_flow() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = server.seed_user(Role::User).await.unwrap();
    let traveler = server.seed_user(Role::User).await.unwrap();

    let plan: IdOnly = assert_json(
        server.post_auth("/travel-plans", &owner, &TravelPlanBody::default()).await.unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    let requests = format!("/travel-plans/{}/requests", plan.id);

    let response = server.post_auth(&requests, &owner, &json!({})).await.unwrap();
    assert_error(response, StatusCode::UNPROCESSABLE_ENTITY, "CANNOT_REQUEST_OWN_PLAN")
        .await
        .unwrap();

    let request: IdOnly = assert_json(
        server
            .post_auth(&requests, &traveler, &json!({"note": "Can I join?"}))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    assert_eq!(request.status.as_deref(), Some("pending"));

    let response = server.post_auth(&requests, &traveler, &json!({})).await.unwrap();
    assert_error(response, StatusCode::CONFLICT, "ALREADY_REQUESTED").await.unwrap();

    let response = server.get_auth(&requests, &traveler).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let answer = format!("/travel-requests/{}", request.id);
    let accepted: IdOnly = assert_json(
        server.patch_auth(&answer, &owner, &json!({"status": "accepted"})).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(accepted.status.as_deref(), Some("accepted"));

    let response = server
        .patch_auth(&answer, &owner, &json!({"status": "rejected"}))
        .await
        .unwrap();
    assert_error(response, StatusCode::UNPROCESSABLE_ENTITY, "REQUEST_ALREADY_RESOLVED")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_notifications_arrive_through_relay() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let _relay = server.spawn_relay();
    let author = server.seed_user(Role::User).await.unwrap();
    let fan = server.seed_user(Role::User).await.unwrap();

    let response = server.post_auth("/posts", &author, &CreatePostBody::unique()).await.unwrap();
    let post: PostBody = assert_json(response, StatusCode::CREATED).await.unwrap();
    let response = server
        .put_auth(&format!("/posts/{}/vote", post.id), &fan, &VoteBody::up())
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let mut inbox = Value::Null;
    for _ in 0..40 {
        inbox = assert_json(server.get_auth("/notifications", &author).await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
        if inbox["meta"]["total"] == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(inbox["meta"]["total"], 1);
    assert_eq!(inbox["unreadCount"], 1);
    assert_eq!(inbox["data"][0]["type"], "post_upvote");
    assert_eq!(inbox["data"][0]["senderId"], fan.id.to_string());

    let marked: Value = assert_json(
        server.patch_auth("/notifications/read-all", &author, &json!({})).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(marked["updated"], 1);
}
