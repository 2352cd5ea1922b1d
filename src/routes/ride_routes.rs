use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use crate::context::RequestContext;
use crate::controllers::ride_controller::RideController;
use crate::dto::ride_dto::{
    AssignDriverRequest, AssignDriverResponse, CreateRideRequest, RideResponse, StatusUpdateResponse,
    UpdateStatusRequest,
};
use crate::models::RideId;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_ride_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rides).post(create_ride))
        .route("/:id", get(get_ride))
        .route("/:id/driver", put(assign_driver))
        .route("/:id/status", put(update_status))
}

async fn create_ride(
    State(state): State<AppState>,
    payload: Result<Json<CreateRideRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RideResponse>), AppError> {
    let Json(request) = payload?;
    let controller = RideController::new(state.rides.clone());
    let response = controller.create(&RequestContext::background(), request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_ride(
    State(state): State<AppState>,
    path: Result<Path<RideId>, PathRejection>,
) -> Result<Json<RideResponse>, AppError> {
    let Path(id) = path?;
    let controller = RideController::new(state.rides.clone());
    let response = controller.get_by_id(&RequestContext::background(), id).await?;
    Ok(Json(response))
}

async fn list_rides(State(state): State<AppState>) -> Result<Json<Vec<RideResponse>>, AppError> {
    let controller = RideController::new(state.rides.clone());
    let response = controller.list(&RequestContext::background()).await?;
    Ok(Json(response))
}

async fn assign_driver(
    State(state): State<AppState>,
    path: Result<Path<RideId>, PathRejection>,
    payload: Result<Json<AssignDriverRequest>, JsonRejection>,
) -> Result<Json<AssignDriverResponse>, AppError> {
    let Path(id) = path?;
    let Json(request) = payload?;
    let controller = RideController::new(state.rides.clone());
    let response = controller
        .assign_driver(&RequestContext::background(), id, request)
        .await?;
    Ok(Json(response))
}

async fn update_status(
    State(state): State<AppState>,
    path: Result<Path<RideId>, PathRejection>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<StatusUpdateResponse>, AppError> {
    let Path(id) = path?;
    let Json(request) = payload?;
    let controller = RideController::new(state.rides.clone());
    let response = controller
        .update_status(&RequestContext::background(), id, request)
        .await?;
    Ok(Json(response))
}
