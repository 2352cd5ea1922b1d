use std::sync::Arc;
use validator::Validate;

use crate::context::RequestContext;
use crate::dto::driver_dto::RegisterDriverRequest;
use crate::dto::DeletedResponse;
use crate::models::{Driver, DriverId};
use crate::services::DriverService;
use crate::utils::errors::AppError;

pub struct DriverController {
    service: Arc<DriverService>,
}

impl DriverController {
    pub fn new(service: Arc<DriverService>) -> Self {
        Self { service }
    }

    pub async fn register(&self, ctx: &RequestContext, request: RegisterDriverRequest) -> Result<Driver, AppError> {
        request.validate()?;
        self.service.register(ctx, request.into()).await
    }

    pub async fn get_by_id(&self, ctx: &RequestContext, id: DriverId) -> Result<Driver, AppError> {
        self.service.get(ctx, id).await
    }

    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<Driver>, AppError> {
        self.service.list(ctx).await
    }

    pub async fn delete(&self, ctx: &RequestContext, id: DriverId) -> Result<DeletedResponse, AppError> {
        self.service.delete(ctx, id).await?;
        Ok(DeletedResponse::new("Driver deleted successfully", id))
    }
}
