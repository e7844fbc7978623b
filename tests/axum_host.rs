use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use restless_sdk::{
    ApiConfig, ApiManager, ApiResponse, AppError, AxumHost, Callbacks, CrudHandler, CrudRequest, EvalRequest,
    FunctionEvalHandler, HandlerFactory, HandlerOptions, HostError, RegistrationError, RelatedRequest,
    ResourceDescriptor, RouteHost,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

/// Echoes what it was asked to do.
struct Echo {
    collection: String,
}

#[async_trait]
impl CrudHandler for Echo {
    async fn handle(&self, request: CrudRequest) -> Result<ApiResponse, AppError> {
        Ok(ApiResponse::one(json!({
            "collection": self.collection,
            "verb": request.verb.as_str(),
            "id": request.id,
            "query": request.query,
            "body": request.body,
        })))
    }

    async fn related(&self, request: RelatedRequest) -> Result<ApiResponse, AppError> {
        Ok(ApiResponse::many(vec![json!({
            "collection": self.collection,
            "id": request.id,
            "relation": request.relation,
        })]))
    }
}

#[async_trait]
impl FunctionEvalHandler for Echo {
    async fn evaluate(&self, request: EvalRequest) -> Result<ApiResponse, AppError> {
        Ok(ApiResponse::one(json!({ "eval": self.collection, "query": request.query })))
    }
}

struct EchoFactory;

impl HandlerFactory for EchoFactory {
    fn crud_handler(&self, descriptor: &ResourceDescriptor, _options: &HandlerOptions) -> Arc<dyn CrudHandler> {
        Arc::new(Echo {
            collection: descriptor.collection_name.clone(),
        })
    }

    fn function_eval_handler(&self, descriptor: &ResourceDescriptor) -> Arc<dyn FunctionEvalHandler> {
        Arc::new(Echo {
            collection: descriptor.collection_name.clone(),
        })
    }
}

fn setup() -> (Arc<AxumHost>, ApiManager) {
    let host = Arc::new(AxumHost::new());
    let manager = ApiManager::new(host.clone(), Arc::new(EchoFactory));
    (host, manager)
}

async fn call(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = match body {
        Some(v) => Body::from(v.to_string()),
        None => Body::empty(),
    };
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn full_config() -> ApiConfig {
    ApiConfig {
        verbs: vec!["GET".into(), "POST".into(), "PATCH".into(), "DELETE".into()],
        allow_bulk_patch: true,
        allow_function_eval: true,
        ..Default::default()
    }
}

#[tokio::test]
async fn dispatches_by_arity_and_identifier_kind() {
    let (host, manager) = setup();
    let person = ResourceDescriptor::new("person").with_relation("articles");
    manager.create_api(&person, &full_config(), Callbacks::default()).unwrap();
    let router = host.router().unwrap();

    let (status, body) = call(&router, "GET", "/api/person?page=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], Value::Null);
    assert_eq!(body["data"]["query"]["page"], "2");

    let (_, body) = call(&router, "GET", "/api/person/7", None).await;
    assert_eq!(body["data"]["id"], 7);

    let (_, body) = call(&router, "GET", "/api/person/abc", None).await;
    assert_eq!(body["data"]["id"], "abc");

    let (status, body) = call(&router, "PATCH", "/api/person", Some(json!({"age": 3}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["verb"], "PATCH");
    assert_eq!(body["data"]["body"], json!({"age": 3}));

    let (_, body) = call(&router, "DELETE", "/api/person/7", None).await;
    assert_eq!(body["data"]["verb"], "DELETE");

    let (_, body) = call(&router, "GET", "/api/person/7/articles/", None).await;
    assert_eq!(body["data"][0]["relation"], "articles");
    assert_eq!(body["data"][0]["id"], 7);
    assert_eq!(body["meta"]["count"], 1);

    let (_, body) = call(&router, "GET", "/api/eval/person", None).await;
    assert_eq!(body["data"]["eval"], "person");
}

#[tokio::test]
async fn unbound_verbs_are_not_routed() {
    let (host, manager) = setup();
    manager
        .create_api(&ResourceDescriptor::new("person"), &ApiConfig::default(), Callbacks::default())
        .unwrap();
    let router = host.router().unwrap();

    let (status, _) = call(&router, "POST", "/api/person", Some(json!({}))).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    let (status, _) = call(&router, "DELETE", "/api/person/1", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    let (status, _) = call(&router, "GET", "/api/eval/person", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn gated_verbs_need_a_positive_decision() {
    let (host, manager) = setup();
    let allowed = Arc::new(AtomicBool::new(false));
    let flag = allowed.clone();
    let config = ApiConfig {
        verbs: vec!["GET".into(), "POST".into()],
        auth_required_for: vec!["POST".into()],
        ..Default::default()
    };
    manager
        .create_api(
            &ResourceDescriptor::new("person"),
            &config,
            Callbacks::with_auth(Arc::new(move || flag.load(Ordering::SeqCst))),
        )
        .unwrap();
    let router = host.router().unwrap();

    let (status, body) = call(&router, "POST", "/api/person", Some(json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "unauthorized");

    let (status, _) = call(&router, "GET", "/api/person", None).await;
    assert_eq!(status, StatusCode::OK);

    allowed.store(true, Ordering::SeqCst);
    let (status, _) = call(&router, "POST", "/api/person", Some(json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn invalid_json_body_is_a_bad_request() {
    let (host, manager) = setup();
    let config = ApiConfig {
        verbs: vec!["POST".into()],
        ..Default::default()
    };
    manager
        .create_api(&ResourceDescriptor::new("person"), &config, Callbacks::default())
        .unwrap();
    let router = host.router().unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/api/person")
        .body(Body::from("{not json"))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn same_collection_needs_distinct_prefixes_on_one_host() {
    let (host, manager) = setup();
    let person = ResourceDescriptor::new("person");
    let first = manager.create_api(&person, &ApiConfig::default(), Callbacks::default()).unwrap();
    assert_eq!(first.name, "personapi0");

    let err = manager
        .create_api(&person, &ApiConfig::default(), Callbacks::default())
        .unwrap_err();
    assert!(matches!(err, RegistrationError::Host(HostError::ConflictingRoute { .. })));
    assert_eq!(manager.registry().names().unwrap(), vec!["personapi0".to_string()]);

    let v2 = ApiConfig {
        url_prefix: "/api/v2".into(),
        ..Default::default()
    };
    let second = manager.create_api(&person, &v2, Callbacks::default()).unwrap();
    assert_eq!(second.name, "personapi1");
    assert_eq!(host.group_names().unwrap(), vec!["personapi0", "personapi1"]);

    let router = host.router().unwrap();
    let (status, body) = call(&router, "GET", "/api/v2/person/5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], 5);
}

#[test]
fn host_rejects_duplicate_group_names() {
    let (host, manager) = setup();
    let group = manager
        .create_api_group(&ResourceDescriptor::new("person"), &ApiConfig::default(), Callbacks::default())
        .unwrap();
    host.register_route_group(group.clone()).unwrap();
    let err = host.register_route_group(group).unwrap_err();
    assert!(matches!(err, HostError::DuplicateGroup(ref n) if n == "personapi0"));
}
