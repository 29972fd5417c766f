use crate::{AppState, handlers::category};
use axum::{Router, routing::get};

/// Category Router
///
/// | Method | Path   | Access |
/// |--------|--------|--------|
/// | GET    | `/`    | public |
/// | POST   | `/`    | admin  |
/// | GET    | `/{id}`| public |
/// | PUT    | `/{id}`| admin  |
/// | DELETE | `/{id}`| admin  |
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(category::list_categories).post(category::create_category),
        )
        .route(
            "/{id}",
            get(category::get_category)
                .put(category::update_category)
                .delete(category::delete_category),
        )
}
