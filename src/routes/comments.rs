use crate::{AppState, handlers::comment};
use axum::{Router, routing::get};

/// Comment Router
///
/// No `PUT`: comments cannot be edited.
pub fn comment_routes() -> Router<AppState> {
    Router::new()
        // GET /?postId=
        .route("/", get(comment::list_comments).post(comment::create_comment))
        .route(
            "/{id}",
            get(comment::get_comment).delete(comment::delete_comment),
        )
}
