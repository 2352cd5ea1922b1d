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
use crate::controllers::driver_controller::DriverController;
use crate::dto::driver_dto::RegisterDriverRequest;
use crate::dto::DeletedResponse;
use crate::models::{Driver, DriverId};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_drivers).post(register_driver))
        .route("/:id", get(get_driver).delete(delete_driver))
}

async fn register_driver(
    State(state): State<AppState>,
    payload: Result<Json<RegisterDriverRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Driver>), AppError> {
    let Json(request) = payload?;
    let controller = DriverController::new(state.drivers.clone());
    let driver = controller.register(&RequestContext::background(), request).await?;
    Ok((StatusCode::CREATED, Json(driver)))
}

async fn get_driver(
    State(state): State<AppState>,
    path: Result<Path<DriverId>, PathRejection>,
) -> Result<Json<Driver>, AppError> {
    let Path(id) = path?;
    let controller = DriverController::new(state.drivers.clone());
    let driver = controller.get_by_id(&RequestContext::background(), id).await?;
    Ok(Json(driver))
}

async fn list_drivers(State(state): State<AppState>) -> Result<Json<Vec<Driver>>, AppError> {
    let controller = DriverController::new(state.drivers.clone());
    let drivers = controller.list(&RequestContext::background()).await?;
    Ok(Json(drivers))
}

async fn delete_driver(
    State(state): State<AppState>,
    path: Result<Path<DriverId>, PathRejection>,
) -> Result<Json<DeletedResponse>, AppError> {
    let Path(id) = path?;
    let controller = DriverController::new(state.drivers.clone());
    let response = controller.delete(&RequestContext::background(), id).await?;
    Ok(Json(response))
}
