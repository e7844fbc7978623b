//! Registration: validate config, build the route table, name it, hand it to the host.

use crate::config::{validate, ApiConfig, Callbacks, Manifest, ResolvedApi};
use crate::error::{ConfigError, RegistrationError};
use crate::handlers::HandlerFactory;
use crate::host::RouteHost;
use crate::naming::{base_name, NameRegistry};
use crate::resource::ResourceDescriptor;
use crate::routes::{RouteGroup, RouteTableBuilder, EVAL_SEGMENT};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

/// Qualified paths already exposed, for the `/eval/<collection>` hazard.
#[derive(Debug, Default)]
struct ExposedPaths {
    /// `<prefix>/eval/<collection>` of every registration with function evaluation.
    eval: BTreeSet<String>,
    /// `<prefix>/<collection>` of every registration.
    collections: BTreeSet<String>,
}

/// True if `eval_path` is the collection path itself or one of its `<id>` instance paths.
fn shadows(eval_path: &str, collection_path: &str) -> bool {
    if eval_path == collection_path {
        return true;
    }
    eval_path
        .strip_prefix(collection_path)
        .and_then(|rest| rest.strip_prefix('/'))
        .is_some_and(|segment| !segment.is_empty() && !segment.contains('/'))
}

fn eval_path(resolved: &ResolvedApi) -> String {
    format!("{}/{}/{}", resolved.url_prefix, EVAL_SEGMENT, resolved.collection_name())
}

fn collection_path(resolved: &ResolvedApi) -> String {
    format!("{}{}", resolved.url_prefix, resolved.descriptor.collection_path())
}

impl ExposedPaths {
    /// Reject when an eval route and a collection or instance route would share a path,
    /// within this registration or against any earlier one, whatever the prefixes.
    fn check(&self, resolved: &ResolvedApi) -> Result<(), ConfigError> {
        let collection = collection_path(resolved);
        let own_eval = resolved.verbs.allow_function_eval.then(|| eval_path(resolved));
        let clash = self
            .eval
            .iter()
            .chain(own_eval.iter())
            .find(|e| shadows(e, &collection))
            .or_else(|| {
                own_eval
                    .as_ref()
                    .filter(|e| self.collections.iter().any(|c| shadows(e, c)))
            });
        match clash {
            Some(path) => Err(ConfigError::EvalCollision { path: path.clone() }),
            None => Ok(()),
        }
    }

    fn record(&mut self, resolved: &ResolvedApi) {
        self.collections.insert(collection_path(resolved));
        if resolved.verbs.allow_function_eval {
            self.eval.insert(eval_path(resolved));
        }
    }
}

pub struct ApiManager {
    registry: Arc<NameRegistry>,
    factory: Arc<dyn HandlerFactory>,
    host: Arc<dyn RouteHost>,
    exposed: Mutex<ExposedPaths>,
}

impl ApiManager {
    pub fn new(host: Arc<dyn RouteHost>, factory: Arc<dyn HandlerFactory>) -> Self {
        Self::with_registry(host, factory, Arc::new(NameRegistry::new()))
    }

    /// Share a name registry with other managers or out-of-band registrations.
    pub fn with_registry(
        host: Arc<dyn RouteHost>,
        factory: Arc<dyn HandlerFactory>,
        registry: Arc<NameRegistry>,
    ) -> Self {
        Self {
            registry,
            factory,
            host,
            exposed: Mutex::new(ExposedPaths::default()),
        }
    }

    pub fn registry(&self) -> &Arc<NameRegistry> {
        &self.registry
    }

    /// Build and name the route group without handing it to the host.
    pub fn create_api_group(
        &self,
        descriptor: &ResourceDescriptor,
        config: &ApiConfig,
        callbacks: Callbacks,
    ) -> Result<RouteGroup, RegistrationError> {
        self.logged(descriptor, |m| m.register(descriptor, config, &callbacks, false))
    }

    /// Build, name, and register the route group with the host.
    pub fn create_api(
        &self,
        descriptor: &ResourceDescriptor,
        config: &ApiConfig,
        callbacks: Callbacks,
    ) -> Result<RouteGroup, RegistrationError> {
        self.logged(descriptor, |m| m.register(descriptor, config, &callbacks, true))
    }

    /// Register every resource in a manifest with default callbacks. Stops at the first failure.
    pub fn create_apis(&self, manifest: &Manifest) -> Result<Vec<RouteGroup>, RegistrationError> {
        manifest
            .resources
            .iter()
            .map(|r| self.create_api(&r.resource, &r.api, Callbacks::default()))
            .collect()
    }

    fn logged<F>(&self, descriptor: &ResourceDescriptor, f: F) -> Result<RouteGroup, RegistrationError>
    where
        F: FnOnce(&Self) -> Result<RouteGroup, RegistrationError>,
    {
        let result = f(self);
        match &result {
            Ok(group) => {
                tracing::info!(
                    group = %group.name,
                    prefix = %group.url_prefix,
                    routes = group.entries.len(),
                    "api group created"
                );
                for entry in &group.entries {
                    tracing::debug!(group = %group.name, route = %entry, "route");
                }
            }
            Err(e) => {
                tracing::warn!(collection = %descriptor.collection_name, error = %e, "api registration rejected");
            }
        }
        result
    }

    fn register(
        &self,
        descriptor: &ResourceDescriptor,
        config: &ApiConfig,
        callbacks: &Callbacks,
        hand_to_host: bool,
    ) -> Result<RouteGroup, RegistrationError> {
        let resolved = validate(descriptor, config, callbacks)?;
        let entries = RouteTableBuilder::new(&resolved.descriptor, &resolved.verbs)
            .build(self.factory.as_ref(), &resolved.options);

        // Held until the paths are recorded so the hazard check and its record cannot interleave.
        let mut exposed = self.exposed.lock().map_err(|_| RegistrationError::StateUnavailable)?;
        exposed.check(&resolved)?;

        let name = self.registry.allocate(&base_name(resolved.collection_name()))?;
        let group = RouteGroup {
            name,
            url_prefix: resolved.url_prefix.clone(),
            entries,
        };

        if hand_to_host {
            if let Err(e) = self.host.register_route_group(group.clone()) {
                if let Err(release_err) = self.registry.release(&group.name) {
                    tracing::warn!(group = %group.name, error = %release_err, "could not release rejected group name");
                }
                return Err(e.into());
            }
        }

        exposed.record(&resolved);
        Ok(group)
    }
}
