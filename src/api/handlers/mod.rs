use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use crate::dom::NodeId;
use crate::models::*;
use crate::service::{BoardService, ServiceError};

// ============================================================
// Error Handling
// ============================================================

/// Map a service error to a status code. Missing cards and lists are 404s,
/// picker rejections are client errors.
fn service_error(e: ServiceError) -> (StatusCode, String) {
    let status = match e {
        ServiceError::CardNotFound(_) | ServiceError::ListNotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::PickerDisabled
        | ServiceError::NoPicker(_)
        | ServiceError::InvalidValue(_) => StatusCode::BAD_REQUEST,
        ServiceError::NoListContainer => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!("Internal error: {}", e);
    } else {
        tracing::warn!("Rejected edit: {}", e);
    }
    (status, e.to_string())
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: NodeId,
}

#[derive(Debug, Serialize)]
pub struct PointsInserted {
    pub title: String,
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Board
// ============================================================

pub async fn get_board(State(service): State<BoardService>) -> Json<BoardView> {
    Json(service.view())
}

pub async fn get_board_tree(State(service): State<BoardService>) -> String {
    service.tree()
}

pub async fn recompute(State(service): State<BoardService>) -> Json<MetricVector> {
    Json(service.recompute_now())
}

// ============================================================
// Lists
// ============================================================

pub async fn create_list(
    State(service): State<BoardService>,
    Json(input): Json<CreateListInput>,
) -> Result<(StatusCode, Json<Created>), (StatusCode, String)> {
    service
        .add_list(&input.name)
        .map(|id| (StatusCode::CREATED, Json(Created { id })))
        .map_err(service_error)
}

pub async fn delete_list(
    State(service): State<BoardService>,
    Path(id): Path<NodeId>,
) -> Result<StatusCode, (StatusCode, String)> {
    service
        .remove_list(id)
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(service_error)
}

pub async fn create_card(
    State(service): State<BoardService>,
    Path(list_id): Path<NodeId>,
    Json(input): Json<CreateCardInput>,
) -> Result<(StatusCode, Json<Created>), (StatusCode, String)> {
    service
        .add_card(list_id, &input.title)
        .map(|id| (StatusCode::CREATED, Json(Created { id })))
        .map_err(service_error)
}

// ============================================================
// Cards
// ============================================================

pub async fn update_card_title(
    State(service): State<BoardService>,
    Path(id): Path<NodeId>,
    Json(input): Json<UpdateTitleInput>,
) -> Result<StatusCode, (StatusCode, String)> {
    service
        .set_card_title(id, &input.title)
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(service_error)
}

pub async fn update_card_hidden(
    State(service): State<BoardService>,
    Path(id): Path<NodeId>,
    Json(input): Json<UpdateHiddenInput>,
) -> Result<StatusCode, (StatusCode, String)> {
    service
        .set_card_hidden(id, input.hidden)
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(service_error)
}

pub async fn insert_points(
    State(service): State<BoardService>,
    Path(id): Path<NodeId>,
    Json(input): Json<InsertPointsInput>,
) -> Result<Json<PointsInserted>, (StatusCode, String)> {
    service
        .insert_points(id, input.kind, input.value)
        .map(|title| Json(PointsInserted { title }))
        .map_err(service_error)
}

pub async fn delete_card(
    State(service): State<BoardService>,
    Path(id): Path<NodeId>,
) -> Result<StatusCode, (StatusCode, String)> {
    service
        .remove_card(id)
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(service_error)
}
