use crate::{AppState, handlers::post};
use axum::{Router, routing::get};

/// Post Router
///
/// Reads are public, create/update need any signed-in user, delete needs admin.
pub fn post_routes() -> Router<AppState> {
    Router::new()
        // GET /?page=&limit=&categoryId=
        .route("/", get(post::list_posts).post(post::create_post))
        .route(
            "/{id}",
            get(post::get_post)
                .put(post::update_post)
                .delete(post::delete_post),
        )
}
