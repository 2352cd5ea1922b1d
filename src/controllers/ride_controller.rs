use std::sync::Arc;
use validator::Validate;

use crate::context::RequestContext;
use crate::dto::ride_dto::{
    AssignDriverRequest, AssignDriverResponse, CreateRideRequest, RideResponse, StatusUpdateResponse,
    UpdateStatusRequest,
};
use crate::models::RideId;
use crate::services::RideService;
use crate::utils::errors::AppError;

pub struct RideController {
    service: Arc<RideService>,
}

impl RideController {
    pub fn new(service: Arc<RideService>) -> Self {
        Self { service }
    }

    pub async fn create(&self, ctx: &RequestContext, request: CreateRideRequest) -> Result<RideResponse, AppError> {
        request.validate()?;

        let ride = self
            .service
            .create_ride(ctx, request.passenger_id, &request.origin, &request.destination)
            .await?;
        Ok(ride.into())
    }

    pub async fn get_by_id(&self, ctx: &RequestContext, id: RideId) -> Result<RideResponse, AppError> {
        Ok(self.service.get_ride(ctx, id).await?.into())
    }

    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<RideResponse>, AppError> {
        let rides = self.service.list_all_rides(ctx).await?;
        Ok(rides.into_iter().map(RideResponse::from).collect())
    }

    pub async fn assign_driver(
        &self,
        ctx: &RequestContext,
        id: RideId,
        request: AssignDriverRequest,
    ) -> Result<AssignDriverResponse, AppError> {
        self.service.assign_driver(ctx, id, request.driver_id).await?;

        Ok(AssignDriverResponse {
            message: "Driver assigned successfully".to_string(),
            ride_id: id,
            driver_id: request.driver_id,
        })
    }

    pub async fn update_status(
        &self,
        ctx: &RequestContext,
        id: RideId,
        request: UpdateStatusRequest,
    ) -> Result<StatusUpdateResponse, AppError> {
        request.validate()?;
        self.service.update_status(ctx, id, &request.status).await?;

        // Si el servicio lo aceptó, el texto es un estado válido
        let status = request.status.parse().map_err(|_| AppError::InvalidRideStatus)?;
        Ok(StatusUpdateResponse {
            message: "Ride status updated".to_string(),
            ride_id: id,
            status,
        })
    }
}
