//! Restless SDK: REST route synthesis for data-backed resources.
//!
//! A [`ResourceDescriptor`] plus an [`ApiConfig`] become a named [`RouteGroup`]:
//! collection, instance, relation and function-evaluation routes bound to
//! handler capabilities supplied by a [`HandlerFactory`]. [`ApiManager`] hands
//! each group to a [`RouteHost`]; [`AxumHost`] serves them through axum.

pub mod config;
pub mod error;
pub mod handlers;
pub mod host;
pub mod manager;
pub mod naming;
pub mod resource;
pub mod response;
pub mod routes;
pub mod verbs;

pub use config::{load_manifest, parse_manifest, validate, ApiConfig, Callbacks, Manifest, ResolvedApi, ResourceApi};
pub use error::{AppError, ConfigError, HostError, NamingError, RegistrationError};
pub use handlers::{
    AuthDecision, CrudHandler, CrudRequest, EvalRequest, FunctionEvalHandler, HandlerFactory, HandlerOptions,
    Processors, QueryParams, RelatedRequest,
};
pub use host::{AxumHost, RouteHost};
pub use manager::ApiManager;
pub use naming::{next_name, NameRegistry};
pub use resource::{IdentifierKind, InstanceId, ResourceDescriptor};
pub use response::ApiResponse;
pub use routes::{Arity, HandlerRef, RouteEntry, RouteGroup, RouteTableBuilder};
pub use verbs::{Verb, VerbConfig, VerbPartition, VerbSet};
