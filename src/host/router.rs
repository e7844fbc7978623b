//! Mounts registered route groups on an axum `Router`.
//!
//! `<id>` placeholders become axum `:id` params. The int and string entries of
//! one pattern share an axum route; the id kind is decided when the segment is
//! parsed (integer first). All verbs on one path are merged into one
//! `MethodRouter`, and duplicate `(path, verb)` bindings are rejected at
//! registration instead of panicking inside axum.

use crate::error::{AppError, HostError};
use crate::handlers::{CrudRequest, EvalRequest, QueryParams, RelatedRequest};
use crate::host::RouteHost;
use crate::resource::InstanceId;
use crate::response::ApiResponse;
use crate::routes::{Arity, HandlerRef, RouteGroup, ID_PLACEHOLDER};
use crate::verbs::Verb;
use axum::{
    body::Bytes,
    extract::{Path, Query},
    routing::{MethodFilter, MethodRouter},
    Router,
};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

const AXUM_ID_PARAM: &str = ":id";

/// One verb on one concrete axum path.
#[derive(Clone)]
struct Binding {
    path: String,
    verb: Verb,
    arity: Arity,
    handler: HandlerRef,
}

fn bindings(group: &RouteGroup) -> Vec<Binding> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for entry in &group.entries {
        let path = group.qualified_pattern(entry).replace(ID_PLACEHOLDER, AXUM_ID_PARAM);
        for verb in entry.verbs.iter() {
            // The string-kind twin of an int-kind entry lands on the same axum path.
            if seen.insert((path.clone(), verb)) {
                out.push(Binding {
                    path: path.clone(),
                    verb,
                    arity: entry.arity,
                    handler: entry.handler.clone(),
                });
            }
        }
    }
    out
}

fn method_filter(verb: Verb) -> MethodFilter {
    match verb {
        Verb::Get => MethodFilter::GET,
        Verb::Post => MethodFilter::POST,
        Verb::Patch => MethodFilter::PATCH,
        Verb::Put => MethodFilter::PUT,
        Verb::Delete => MethodFilter::DELETE,
    }
}

fn parse_body(raw: &Bytes) -> Result<Option<Value>, AppError> {
    if raw.is_empty() {
        return Ok(None);
    }
    serde_json::from_slice(raw)
        .map(Some)
        .map_err(|e| AppError::BadRequest(format!("body must be JSON: {}", e)))
}

async fn dispatch(
    handler: HandlerRef,
    verb: Verb,
    raw_id: Option<String>,
    query: QueryParams,
    raw_body: Bytes,
) -> Result<ApiResponse, AppError> {
    let body = parse_body(&raw_body)?;
    let id = raw_id.as_deref().map(InstanceId::parse);
    match handler {
        HandlerRef::Crud(h) => h.handle(CrudRequest { verb, id, query, body }).await,
        HandlerRef::Relation { handler, relation } => {
            let id = id.ok_or_else(|| AppError::BadRequest("missing instance identifier".into()))?;
            handler.related(RelatedRequest { id, relation, query }).await
        }
        HandlerRef::FunctionEval(h) => h.evaluate(EvalRequest { query, body }).await,
    }
}

fn attach(router: MethodRouter, binding: Binding) -> MethodRouter {
    let filter = method_filter(binding.verb);
    let verb = binding.verb;
    let handler = binding.handler;
    match binding.arity {
        Arity::Instance => router.on(
            filter,
            move |Path(id): Path<String>, Query(query): Query<QueryParams>, body: Bytes| {
                let handler = handler.clone();
                async move { dispatch(handler, verb, Some(id), query, body).await }
            },
        ),
        Arity::Collection | Arity::Optional => router.on(
            filter,
            move |Query(query): Query<QueryParams>, body: Bytes| {
                let handler = handler.clone();
                async move { dispatch(handler, verb, None, query, body).await }
            },
        ),
    }
}

/// Route host that collects groups and serves them through axum.
#[derive(Default)]
pub struct AxumHost {
    groups: Mutex<Vec<RouteGroup>>,
}

impl AxumHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group_names(&self) -> Result<Vec<String>, HostError> {
        let groups = self.groups.lock().map_err(|_| HostError::Unavailable)?;
        Ok(groups.iter().map(|g| g.name.clone()).collect())
    }

    /// Router over every group registered so far.
    pub fn router(&self) -> Result<Router, HostError> {
        let groups = self.groups.lock().map_err(|_| HostError::Unavailable)?;
        let mut by_path: BTreeMap<String, MethodRouter> = BTreeMap::new();
        for group in groups.iter() {
            for binding in bindings(group) {
                let current = by_path.remove(&binding.path).unwrap_or_else(MethodRouter::new);
                by_path.insert(binding.path.clone(), attach(current, binding));
            }
        }
        let mut router = Router::new();
        for (path, methods) in by_path {
            tracing::debug!(path = %path, "mounting route");
            router = router.route(&path, methods);
        }
        Ok(router)
    }
}

impl RouteHost for AxumHost {
    fn register_route_group(&self, group: RouteGroup) -> Result<(), HostError> {
        let mut groups = self.groups.lock().map_err(|_| HostError::Unavailable)?;
        if groups.iter().any(|g| g.name == group.name) {
            return Err(HostError::DuplicateGroup(group.name));
        }
        let taken: BTreeSet<(String, Verb)> = groups
            .iter()
            .flat_map(bindings)
            .map(|b| (b.path, b.verb))
            .collect();
        if let Some(b) = bindings(&group).into_iter().find(|b| taken.contains(&(b.path.clone(), b.verb))) {
            return Err(HostError::ConflictingRoute {
                path: b.path,
                verb: b.verb.to_string(),
            });
        }
        groups.push(group);
        Ok(())
    }
}
