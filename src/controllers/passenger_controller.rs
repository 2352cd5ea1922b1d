use std::sync::Arc;
use validator::Validate;

use crate::context::RequestContext;
use crate::dto::passenger_dto::RegisterPassengerRequest;
use crate::dto::DeletedResponse;
use crate::models::{Passenger, PassengerId};
use crate::services::PassengerService;
use crate::utils::errors::AppError;

pub struct PassengerController {
    service: Arc<PassengerService>,
}

impl PassengerController {
    pub fn new(service: Arc<PassengerService>) -> Self {
        Self { service }
    }

    pub async fn register(&self, ctx: &RequestContext, request: RegisterPassengerRequest) -> Result<Passenger, AppError> {
        request.validate()?;
        self.service.register(ctx, request.into()).await
    }

    pub async fn get_by_id(&self, ctx: &RequestContext, id: PassengerId) -> Result<Passenger, AppError> {
        self.service.get(ctx, id).await
    }

    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<Passenger>, AppError> {
        self.service.list(ctx).await
    }

    pub async fn delete(&self, ctx: &RequestContext, id: PassengerId) -> Result<DeletedResponse, AppError> {
        self.service.delete(ctx, id).await?;
        Ok(DeletedResponse::new("Passenger deleted successfully", id))
    }
}
