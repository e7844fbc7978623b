//! In-memory handler capabilities so the example runs without a database.

use async_trait::async_trait;
use restless_sdk::{
    ApiResponse, AppError, CrudHandler, CrudRequest, EvalRequest, FunctionEvalHandler, HandlerFactory,
    HandlerOptions, InstanceId, QueryParams, RelatedRequest, ResourceDescriptor, Verb,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

type Rows = BTreeMap<i64, Map<String, Value>>;

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<BTreeMap<String, Rows>>,
}

#[derive(Clone, Default)]
pub struct MemoryFactory {
    store: Arc<MemoryStore>,
}

impl HandlerFactory for MemoryFactory {
    fn crud_handler(&self, descriptor: &ResourceDescriptor, options: &HandlerOptions) -> Arc<dyn CrudHandler> {
        Arc::new(MemoryCrud {
            collection: descriptor.collection_name.clone(),
            store: self.store.clone(),
            options: options.clone(),
        })
    }

    fn function_eval_handler(&self, descriptor: &ResourceDescriptor) -> Arc<dyn FunctionEvalHandler> {
        Arc::new(MemoryEval {
            collection: descriptor.collection_name.clone(),
            store: self.store.clone(),
        })
    }
}

fn lock_err<T>(_: T) -> AppError {
    AppError::Internal("store lock".into())
}

fn int_id(id: &InstanceId) -> Result<i64, AppError> {
    match id {
        InstanceId::Int(n) => Ok(*n),
        InstanceId::Str(s) => Err(AppError::NotFound(s.clone())),
    }
}

fn body_object(body: Option<Value>) -> Result<Value, AppError> {
    match body {
        Some(v @ Value::Object(_)) => Ok(v),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

/// Exact-match filters from the query string; `page` is reserved.
fn matches(row: &Map<String, Value>, query: &QueryParams) -> bool {
    query.iter().filter(|(k, _)| k.as_str() != "page").all(|(k, v)| match row.get(k) {
        Some(Value::String(s)) => s == v,
        Some(other) => other.to_string() == *v,
        None => false,
    })
}

fn with_id(id: i64, row: &Map<String, Value>) -> Value {
    let mut out = row.clone();
    out.insert("id".into(), Value::from(id));
    Value::Object(out)
}

struct MemoryCrud {
    collection: String,
    store: Arc<MemoryStore>,
    options: HandlerOptions,
}

impl MemoryCrud {
    fn project(&self, value: Value) -> Value {
        match (&self.options.include_fields, value) {
            (Some(fields), Value::Object(map)) => Value::Object(
                map.into_iter()
                    .filter(|(k, _)| k == "id" || fields.contains(k))
                    .collect(),
            ),
            (_, v) => v,
        }
    }

    fn apply_patch(&self, row: &mut Map<String, Value>, patch: &Value) {
        if let Value::Object(fields) = patch {
            for (k, v) in fields {
                let allowed = self
                    .options
                    .patchable_fields
                    .as_ref()
                    .map_or(true, |p| p.contains(k));
                if allowed && k != "id" {
                    row.insert(k.clone(), v.clone());
                }
            }
        }
    }

    fn list(&self, mut query: QueryParams) -> Result<ApiResponse, AppError> {
        self.options.processors.before_read(&mut query)?;
        let collections = self.store.collections.read().map_err(lock_err)?;
        let rows: Vec<Value> = collections
            .get(&self.collection)
            .into_iter()
            .flatten()
            .filter(|(_, row)| matches(row, &query))
            .map(|(id, row)| self.project(with_id(*id, row)))
            .collect();
        let rows = match self.options.page_size() {
            Some(size) => {
                let page: usize = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1).max(1);
                rows.into_iter()
                    .skip((page - 1) * size as usize)
                    .take(size as usize)
                    .collect()
            }
            None => rows,
        };
        let mut result = Value::Array(rows);
        self.options.processors.after_read(&mut result);
        let rows = match result {
            Value::Array(rows) => rows,
            other => vec![other],
        };
        Ok(ApiResponse::many(rows))
    }

    fn read(&self, id: &InstanceId) -> Result<ApiResponse, AppError> {
        let n = int_id(id)?;
        let collections = self.store.collections.read().map_err(lock_err)?;
        let row = collections
            .get(&self.collection)
            .and_then(|rows| rows.get(&n))
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        let mut result = self.project(with_id(n, row));
        self.options.processors.after_read(&mut result);
        Ok(ApiResponse::one(result))
    }

    fn create(&self, body: Option<Value>) -> Result<ApiResponse, AppError> {
        let mut body = body_object(body)?;
        self.options.processors.before_create(&mut body)?;
        let mut collections = self.store.collections.write().map_err(lock_err)?;
        let rows = collections.entry(self.collection.clone()).or_default();
        let id = rows.keys().next_back().map_or(1, |n| n + 1);
        let mut row = Map::new();
        self.apply_patch(&mut row, &body);
        rows.insert(id, row.clone());
        let mut created = with_id(id, &row);
        self.options.processors.after_create(&mut created);
        Ok(ApiResponse::created(created))
    }

    fn update(&self, id: Option<&InstanceId>, query: &QueryParams, body: Option<Value>) -> Result<ApiResponse, AppError> {
        let mut body = body_object(body)?;
        self.options.processors.before_update(id, &mut body)?;
        let target = id.map(int_id).transpose()?;
        let mut collections = self.store.collections.write().map_err(lock_err)?;
        let rows = collections.entry(self.collection.clone()).or_default();
        let mut updated = Vec::new();
        for (n, row) in rows.iter_mut() {
            let selected = match target {
                Some(t) => *n == t,
                None => matches(row, query),
            };
            if selected {
                self.apply_patch(row, &body);
                updated.push(with_id(*n, row));
            }
        }
        match (id, updated.pop()) {
            (Some(_), Some(mut one)) => {
                self.options.processors.after_update(&mut one);
                Ok(ApiResponse::one(one))
            }
            (Some(id), None) => Err(AppError::NotFound(id.to_string())),
            (None, last) => {
                updated.extend(last);
                Ok(ApiResponse::many(updated))
            }
        }
    }

    fn delete(&self, id: &InstanceId) -> Result<ApiResponse, AppError> {
        let n = int_id(id)?;
        let mut collections = self.store.collections.write().map_err(lock_err)?;
        let rows = collections.entry(self.collection.clone()).or_default();
        if !rows.contains_key(&n) {
            return Err(AppError::NotFound(id.to_string()));
        }
        self.options.processors.before_delete(id)?;
        rows.remove(&n);
        self.options.processors.after_delete(id);
        Ok(ApiResponse::no_content())
    }
}

#[async_trait]
impl CrudHandler for MemoryCrud {
    async fn handle(&self, request: CrudRequest) -> Result<ApiResponse, AppError> {
        match (request.verb, &request.id) {
            (Verb::Get, None) => self.list(request.query),
            (Verb::Get, Some(id)) => self.read(id),
            (Verb::Post, _) => self.create(request.body),
            (Verb::Patch | Verb::Put, id) => self.update(id.as_ref(), &request.query, request.body),
            (Verb::Delete, Some(id)) => self.delete(id),
            (Verb::Delete, None) => Err(AppError::MethodNotAllowed("DELETE on a collection".into())),
        }
    }

    /// Rows of the related collection whose `<collection>_id` equals the instance id.
    async fn related(&self, request: RelatedRequest) -> Result<ApiResponse, AppError> {
        let n = int_id(&request.id)?;
        let fk = format!("{}_id", self.collection);
        let collections = self.store.collections.read().map_err(lock_err)?;
        if !collections.get(&self.collection).is_some_and(|rows| rows.contains_key(&n)) {
            return Err(AppError::NotFound(request.id.to_string()));
        }
        let rows = collections
            .get(&request.relation)
            .into_iter()
            .flatten()
            .filter(|(_, row)| row.get(&fk).and_then(Value::as_i64) == Some(n))
            .map(|(id, row)| with_id(*id, row))
            .collect();
        Ok(ApiResponse::many(rows))
    }
}

struct MemoryEval {
    collection: String,
    store: Arc<MemoryStore>,
}

#[async_trait]
impl FunctionEvalHandler for MemoryEval {
    /// Supports `?functions=count`, the only aggregate the in-memory store knows.
    async fn evaluate(&self, request: EvalRequest) -> Result<ApiResponse, AppError> {
        let collections = self.store.collections.read().map_err(lock_err)?;
        let count = collections.get(&self.collection).map_or(0, |rows| rows.len());
        let mut out = Map::new();
        for name in request.query.get("functions").map(String::as_str).unwrap_or("count").split(',') {
            match name.trim() {
                "count" => {
                    out.insert("count".into(), Value::from(count));
                }
                other => return Err(AppError::BadRequest(format!("unknown function: {}", other))),
            }
        }
        Ok(ApiResponse::one(Value::Object(out)))
    }
}
