mod handlers;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::service::BoardService;

pub fn create_router(service: BoardService) -> Router {
    let api = Router::new()
        // Board
        .route("/board", get(handlers::get_board))
        .route("/board/tree", get(handlers::get_board_tree))
        .route("/board/recompute", post(handlers::recompute))
        // Lists
        .route("/lists", post(handlers::create_list))
        .route("/lists/{id}", delete(handlers::delete_list))
        .route("/lists/{id}/cards", post(handlers::create_card))
        // Cards
        .route("/cards/{id}", delete(handlers::delete_card))
        .route("/cards/{id}/title", put(handlers::update_card_title))
        .route("/cards/{id}/hidden", put(handlers::update_card_hidden))
        .route("/cards/{id}/points", post(handlers::insert_points))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}
