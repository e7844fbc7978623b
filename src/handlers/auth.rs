//! Authentication gate applied in front of a CRUD capability.

use crate::error::AppError;
use crate::handlers::{CrudHandler, CrudRequest, RelatedRequest};
use crate::response::ApiResponse;
use crate::verbs::{Verb, VerbSet};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Returns `true` iff the current caller may proceed.
pub type AuthDecision = Arc<dyn Fn() -> bool + Send + Sync>;

#[derive(Clone)]
pub struct AuthGate {
    pub required_for: VerbSet,
    decision: AuthDecision,
}

impl AuthGate {
    pub fn new(required_for: VerbSet, decision: AuthDecision) -> Self {
        Self { required_for, decision }
    }

    pub fn check(&self, verb: Verb) -> Result<(), AppError> {
        if self.required_for.contains(verb) && !(self.decision)() {
            tracing::debug!(verb = %verb, "authentication decision denied request");
            return Err(AppError::Unauthorized);
        }
        Ok(())
    }
}

impl fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGate")
            .field("required_for", &self.required_for.to_string())
            .finish_non_exhaustive()
    }
}

pub struct GatedCrudHandler {
    inner: Arc<dyn CrudHandler>,
    gate: AuthGate,
}

impl GatedCrudHandler {
    pub fn new(inner: Arc<dyn CrudHandler>, gate: AuthGate) -> Self {
        Self { inner, gate }
    }
}

#[async_trait]
impl CrudHandler for GatedCrudHandler {
    async fn handle(&self, request: CrudRequest) -> Result<ApiResponse, AppError> {
        self.gate.check(request.verb)?;
        self.inner.handle(request).await
    }

    // Relation sub-collections are reads.
    async fn related(&self, request: RelatedRequest) -> Result<ApiResponse, AppError> {
        self.gate.check(Verb::Get)?;
        self.inner.related(request).await
    }
}
