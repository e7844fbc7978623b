//! Raw api configuration as accepted from callers and JSON manifests.

use crate::handlers::{AuthDecision, Processors};
use crate::resource::ResourceDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

fn default_verbs() -> Vec<String> {
    vec!["GET".to_string()]
}

fn default_url_prefix() -> String {
    "/api".to_string()
}

fn default_results_per_page() -> i64 {
    10
}

/// Declarative options for exposing one resource.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Enabled verbs, case-insensitive. Read-only by default.
    #[serde(default = "default_verbs")]
    pub verbs: Vec<String>,
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,
    /// Overrides the descriptor's collection name in paths and the group name.
    #[serde(default)]
    pub collection_name: Option<String>,
    /// PATCH/PUT on the collection path update every matching instance.
    #[serde(default)]
    pub allow_bulk_patch: bool,
    /// Adds `GET <prefix>/eval/<collection>`. Do not combine with a collection named `eval`.
    #[serde(default)]
    pub allow_function_eval: bool,
    /// Verbs gated behind the authentication decision; requires `Callbacks::auth_decision`.
    #[serde(default)]
    pub auth_required_for: Vec<String>,
    #[serde(default)]
    pub include_fields: Option<Vec<String>>,
    #[serde(default)]
    pub patchable_fields: Option<Vec<String>>,
    /// Non-positive disables pagination.
    #[serde(default = "default_results_per_page")]
    pub results_per_page: i64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            verbs: default_verbs(),
            url_prefix: default_url_prefix(),
            collection_name: None,
            allow_bulk_patch: false,
            allow_function_eval: false,
            auth_required_for: Vec::new(),
            include_fields: None,
            patchable_fields: None,
            results_per_page: default_results_per_page(),
        }
    }
}

/// Runtime callbacks that cannot live in a serialized config.
#[derive(Clone, Default)]
pub struct Callbacks {
    pub auth_decision: Option<AuthDecision>,
    pub processors: Option<Arc<dyn Processors>>,
}

impl Callbacks {
    pub fn with_auth(decision: AuthDecision) -> Self {
        Self {
            auth_decision: Some(decision),
            processors: None,
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("auth_decision", &self.auth_decision.is_some())
            .field("processors", &self.processors.is_some())
            .finish()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResourceApi {
    pub resource: ResourceDescriptor,
    #[serde(default)]
    pub api: ApiConfig,
}

/// All resources to expose, as loaded from a JSON manifest.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub resources: Vec<ResourceApi>,
}
