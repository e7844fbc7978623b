//! Pre/post-processing hooks forwarded to CRUD handlers.

use crate::error::AppError;
use crate::handlers::QueryParams;
use crate::resource::InstanceId;
use serde_json::Value;

/// One method per lifecycle point. All default to no-ops.
///
/// `before_*` hooks may reject the request; `after_*` hooks may only amend the
/// result. The generator forwards the implementation to the handler factory
/// and never calls it.
pub trait Processors: Send + Sync {
    /// POST body before insert, e.g. to inject the caller's identity from the session.
    fn before_create(&self, _body: &mut Value) -> Result<(), AppError> {
        Ok(())
    }

    fn after_create(&self, _created: &mut Value) {}

    /// PATCH/PUT body. `id` is `None` for a bulk update at collection scope.
    fn before_update(&self, _id: Option<&InstanceId>, _body: &mut Value) -> Result<(), AppError> {
        Ok(())
    }

    fn after_update(&self, _updated: &mut Value) {}

    /// Runs only when the instance to delete exists.
    fn before_delete(&self, _id: &InstanceId) -> Result<(), AppError> {
        Ok(())
    }

    fn after_delete(&self, _id: &InstanceId) {}

    fn before_read(&self, _query: &mut QueryParams) -> Result<(), AppError> {
        Ok(())
    }

    fn after_read(&self, _result: &mut Value) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopProcessors;

impl Processors for NoopProcessors {}
