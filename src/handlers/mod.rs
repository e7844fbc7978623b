//! Handler capabilities bound into generated route entries.
//!
//! The generator never executes queries or hooks itself. It binds a resource
//! and its options to a [`HandlerFactory`] and stores the resulting capability
//! in each route entry; the host invokes it with the matched verb and id.

pub mod auth;
pub mod capability;
pub mod processors;

pub use auth::{AuthDecision, AuthGate, GatedCrudHandler};
pub use capability::{
    bind_crud, CrudHandler, CrudRequest, EvalRequest, FunctionEvalHandler, HandlerFactory,
    HandlerOptions, QueryParams, RelatedRequest,
};
pub use processors::{NoopProcessors, Processors};
