use crate::error::AppError;
use crate::handlers::{
    CrudHandler, CrudRequest, EvalRequest, FunctionEvalHandler, HandlerFactory, HandlerOptions, RelatedRequest,
};
use crate::resource::ResourceDescriptor;
use crate::response::ApiResponse;
use async_trait::async_trait;
use std::sync::Arc;

/// Factory whose handlers answer 204 to everything.
pub struct NullHandlers;

impl NullHandlers {
    pub fn crud() -> Arc<dyn CrudHandler> {
        Arc::new(NullHandlers)
    }
}

#[async_trait]
impl CrudHandler for NullHandlers {
    async fn handle(&self, _request: CrudRequest) -> Result<ApiResponse, AppError> {
        Ok(ApiResponse::no_content())
    }

    async fn related(&self, _request: RelatedRequest) -> Result<ApiResponse, AppError> {
        Ok(ApiResponse::no_content())
    }
}

#[async_trait]
impl FunctionEvalHandler for NullHandlers {
    async fn evaluate(&self, _request: EvalRequest) -> Result<ApiResponse, AppError> {
        Ok(ApiResponse::no_content())
    }
}

impl HandlerFactory for NullHandlers {
    fn crud_handler(&self, _descriptor: &ResourceDescriptor, _options: &HandlerOptions) -> Arc<dyn CrudHandler> {
        Arc::new(NullHandlers)
    }

    fn function_eval_handler(&self, _descriptor: &ResourceDescriptor) -> Arc<dyn FunctionEvalHandler> {
        Arc::new(NullHandlers)
    }
}
