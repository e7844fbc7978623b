//! Capability interfaces implemented by the data-access side.

use crate::error::AppError;
use crate::handlers::{AuthGate, GatedCrudHandler, NoopProcessors, Processors};
use crate::resource::{InstanceId, ResourceDescriptor};
use crate::response::ApiResponse;
use crate::verbs::Verb;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Decoded query string, sorted by key.
pub type QueryParams = BTreeMap<String, String>;

/// Request routed to a resource's CRUD capability.
#[derive(Clone, Debug, PartialEq)]
pub struct CrudRequest {
    pub verb: Verb,
    /// `None` on collection-scope routes (create, list, bulk update).
    pub id: Option<InstanceId>,
    pub query: QueryParams,
    pub body: Option<Value>,
}

/// GET on a one-to-many relation of a single instance.
#[derive(Clone, Debug, PartialEq)]
pub struct RelatedRequest {
    pub id: InstanceId,
    pub relation: String,
    pub query: QueryParams,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EvalRequest {
    pub query: QueryParams,
    pub body: Option<Value>,
}

#[async_trait]
pub trait CrudHandler: Send + Sync {
    async fn handle(&self, request: CrudRequest) -> Result<ApiResponse, AppError>;

    async fn related(&self, request: RelatedRequest) -> Result<ApiResponse, AppError>;
}

/// Evaluates aggregate functions over all instances of a resource.
#[async_trait]
pub trait FunctionEvalHandler: Send + Sync {
    async fn evaluate(&self, request: EvalRequest) -> Result<ApiResponse, AppError>;
}

/// Options forwarded opaquely to the CRUD handler.
#[derive(Clone)]
pub struct HandlerOptions {
    /// Only these fields appear in GET responses. `None` means all.
    pub include_fields: Option<Vec<String>>,
    /// Only these fields are applied on PATCH/PUT. `None` means all.
    pub patchable_fields: Option<Vec<String>>,
    pub results_per_page: i64,
    pub processors: Arc<dyn Processors>,
    /// Present when some verbs require authentication.
    pub auth: Option<AuthGate>,
}

impl HandlerOptions {
    /// `None` when pagination is disabled (non-positive `results_per_page`).
    pub fn page_size(&self) -> Option<u32> {
        if self.results_per_page > 0 {
            Some(u32::try_from(self.results_per_page).unwrap_or(u32::MAX))
        } else {
            None
        }
    }
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self {
            include_fields: None,
            patchable_fields: None,
            results_per_page: 10,
            processors: Arc::new(NoopProcessors),
            auth: None,
        }
    }
}

impl fmt::Debug for HandlerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerOptions")
            .field("include_fields", &self.include_fields)
            .field("patchable_fields", &self.patchable_fields)
            .field("results_per_page", &self.results_per_page)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

/// Builds handler capabilities for a resource.
pub trait HandlerFactory: Send + Sync {
    fn crud_handler(&self, descriptor: &ResourceDescriptor, options: &HandlerOptions) -> Arc<dyn CrudHandler>;

    fn function_eval_handler(&self, descriptor: &ResourceDescriptor) -> Arc<dyn FunctionEvalHandler>;
}

/// CRUD capability for `descriptor`, wrapped in the auth gate when one is configured.
pub fn bind_crud(
    factory: &dyn HandlerFactory,
    descriptor: &ResourceDescriptor,
    options: &HandlerOptions,
) -> Arc<dyn CrudHandler> {
    let inner = factory.crud_handler(descriptor, options);
    match &options.auth {
        Some(gate) => Arc::new(GatedCrudHandler::new(inner, gate.clone())),
        None => inner,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_page_size_disables_pagination() {
        let mut options = HandlerOptions::default();
        assert_eq!(options.page_size(), Some(10));
        options.results_per_page = 0;
        assert_eq!(options.page_size(), None);
        options.results_per_page = -5;
        assert_eq!(options.page_size(), None);
    }
}
