//! Route definitions
//!
//! All API routes organized by resource and mounted under /api/v1.

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::handlers::{comments, health, notifications, posts, travel, users};
use crate::state::AppState;

/// Create the main API router (health checks are mounted separately, outside the rate limiter)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Liveness and readiness checks
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(post_routes())
        .merge(comment_routes())
        .merge(user_routes())
        .merge(travel_routes())
        .merge(notification_routes())
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route(
            "/posts/:post_id",
            get(posts::get_post)
                .patch(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/posts/:post_id/vote", put(posts::toggle_vote).get(posts::vote_status))
        .route("/posts/:post_id/save", put(posts::toggle_save))
        .route(
            "/posts/:post_id/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
}

fn comment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/comments/:comment_id",
            patch(comments::edit_comment).delete(comments::delete_comment),
        )
        .route("/comments/:comment_id/replies", get(comments::list_replies))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/@me/posts", get(posts::list_my_posts))
        .route("/users/@me/saved-posts", get(posts::list_saved))
        .route("/users/:user_id", get(users::get_user))
        .route("/users/:user_id/follow", put(users::toggle_follow))
        .route("/users/:user_id/followers", get(users::list_followers))
        .route("/users/:user_id/following", get(users::list_following))
}

fn travel_routes() -> Router<AppState> {
    Router::new()
        .route("/travel-plans", post(travel::create_plan))
        .route("/travel-plans/:plan_id", get(travel::get_plan))
        .route(
            "/travel-plans/:plan_id/requests",
            post(travel::create_request).get(travel::list_requests),
        )
        .route("/travel-requests/:request_id", patch(travel::respond))
}

fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/read-all", patch(notifications::mark_all_read))
        .route(
            "/notifications/:notification_id/read",
            patch(notifications::mark_read),
        )
}
