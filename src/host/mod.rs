//! Host-registration interface and the axum-backed host.

mod router;

pub use router::AxumHost;

use crate::error::HostError;
use crate::routes::RouteGroup;

/// Receives named route groups. Once registered, a group belongs to the host.
pub trait RouteHost: Send + Sync {
    fn register_route_group(&self, group: RouteGroup) -> Result<(), HostError>;
}
