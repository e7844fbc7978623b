//! Config validation: verbs, auth preconditions, and URL segment shape.

use crate::config::{ApiConfig, Callbacks, ResolvedApi};
use crate::error::ConfigError;
use crate::handlers::{AuthGate, HandlerOptions, NoopProcessors};
use crate::resource::ResourceDescriptor;
use crate::verbs::{VerbConfig, VerbSet};
use regex::Regex;
use std::sync::Arc;

const SEGMENT_PATTERN: &str = r"^[A-Za-z0-9_.~-]+$";

fn is_segment(s: &str) -> bool {
    if s == "." || s == ".." {
        return false;
    }
    Regex::new(SEGMENT_PATTERN).map(|re| re.is_match(s)).unwrap_or(false)
}

/// `""` stays empty; otherwise must start with `/`. Trailing slashes are dropped.
pub fn normalize_url_prefix(prefix: &str) -> Result<String, ConfigError> {
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    let well_formed = trimmed.starts_with('/')
        && !trimmed.contains("//")
        && trimmed[1..].split('/').all(is_segment);
    if !well_formed {
        return Err(ConfigError::InvalidUrlPrefix(prefix.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Validate `config` for `descriptor` and flatten it for the builder.
///
/// The auth precondition is checked first so a request for an auth gate
/// without a decision function fails before anything else is looked at.
pub fn validate(
    descriptor: &ResourceDescriptor,
    config: &ApiConfig,
    callbacks: &Callbacks,
) -> Result<ResolvedApi, ConfigError> {
    let auth_required_for = VerbSet::parse(&config.auth_required_for)?;
    let auth = match (auth_required_for.is_empty(), &callbacks.auth_decision) {
        (true, _) => None,
        (false, None) => {
            return Err(ConfigError::MissingAuthDecision {
                verbs: auth_required_for.to_string(),
            })
        }
        (false, Some(decision)) => Some(AuthGate::new(auth_required_for, decision.clone())),
    };

    let verbs = VerbSet::parse(&config.verbs)?;
    let url_prefix = normalize_url_prefix(&config.url_prefix)?;

    let collection_name = config
        .collection_name
        .as_deref()
        .unwrap_or(&descriptor.collection_name);
    if !is_segment(collection_name) {
        return Err(ConfigError::InvalidCollectionName(collection_name.to_string()));
    }
    if let Some(bad) = descriptor.one_to_many_relations.iter().find(|r| !is_segment(r)) {
        return Err(ConfigError::InvalidRelationName(bad.clone()));
    }

    Ok(ResolvedApi {
        descriptor: descriptor.renamed(collection_name),
        url_prefix,
        verbs: VerbConfig {
            verbs,
            allow_bulk_patch: config.allow_bulk_patch,
            allow_function_eval: config.allow_function_eval,
        },
        options: HandlerOptions {
            include_fields: config.include_fields.clone(),
            patchable_fields: config.patchable_fields.clone(),
            results_per_page: config.results_per_page,
            processors: callbacks
                .processors
                .clone()
                .unwrap_or_else(|| Arc::new(NoopProcessors)),
            auth,
        },
    })
}
