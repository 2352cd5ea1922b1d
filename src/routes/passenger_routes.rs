use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::context::RequestContext;
use crate::controllers::passenger_controller::PassengerController;
use crate::dto::passenger_dto::RegisterPassengerRequest;
use crate::dto::DeletedResponse;
use crate::models::{Passenger, PassengerId};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_passenger_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_passengers).post(register_passenger))
        .route("/:id", get(get_passenger).delete(delete_passenger))
}

async fn register_passenger(
    State(state): State<AppState>,
    payload: Result<Json<RegisterPassengerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Passenger>), AppError> {
    let Json(request) = payload?;
    let controller = PassengerController::new(state.passengers.clone());
    let passenger = controller.register(&RequestContext::background(), request).await?;
    Ok((StatusCode::CREATED, Json(passenger)))
}

async fn get_passenger(
    State(state): State<AppState>,
    path: Result<Path<PassengerId>, PathRejection>,
) -> Result<Json<Passenger>, AppError> {
    let Path(id) = path?;
    let controller = PassengerController::new(state.passengers.clone());
    let passenger = controller.get_by_id(&RequestContext::background(), id).await?;
    Ok(Json(passenger))
}

async fn list_passengers(State(state): State<AppState>) -> Result<Json<Vec<Passenger>>, AppError> {
    let controller = PassengerController::new(state.passengers.clone());
    let passengers = controller.list(&RequestContext::background()).await?;
    Ok(Json(passengers))
}

async fn delete_passenger(
    State(state): State<AppState>,
    path: Result<Path<PassengerId>, PathRejection>,
) -> Result<Json<DeletedResponse>, AppError> {
    let Path(id) = path?;
    let controller = PassengerController::new(state.passengers.clone());
    let response = controller.delete(&RequestContext::background(), id).await?;
    Ok(Json(response))
}
