//! Standard response envelope helpers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct SuccessOne<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

#[derive(Serialize)]
pub struct SuccessMany<T> {
    pub data: Vec<T>,
    pub meta: MetaCount,
}

#[derive(Serialize)]
pub struct MetaCount {
    pub count: u64,
}

/// What a handler capability hands back to the host: a status and an optional JSON body.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: Option<Value>) -> Self {
        Self { status, body }
    }

    /// 200 with `{ "data": ... }`.
    pub fn one(data: Value) -> Self {
        Self::enveloped(StatusCode::OK, SuccessOne { data, meta: None })
    }

    /// 201 with `{ "data": ... }`.
    pub fn created(data: Value) -> Self {
        Self::enveloped(StatusCode::CREATED, SuccessOne { data, meta: None })
    }

    /// 200 with `{ "data": [...], "meta": { "count": n } }`.
    pub fn many(rows: Vec<Value>) -> Self {
        let count = rows.len() as u64;
        Self::enveloped(
            StatusCode::OK,
            SuccessMany {
                data: rows,
                meta: MetaCount { count },
            },
        )
    }

    pub fn no_content() -> Self {
        Self::new(StatusCode::NO_CONTENT, None)
    }

    fn enveloped<T: Serialize>(status: StatusCode, body: T) -> Self {
        // Envelopes hold `Value`s only, so serialization cannot fail.
        Self::new(status, serde_json::to_value(body).ok())
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        match self.body {
            Some(body) => (self.status, Json(body)).into_response(),
            None => self.status.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn many_carries_count() {
        let r = ApiResponse::many(vec![json!({"id": 1}), json!({"id": 2})]);
        assert_eq!(r.status, StatusCode::OK);
        assert_eq!(r.body, Some(json!({"data": [{"id": 1}, {"id": 2}], "meta": {"count": 2}})));
    }

    #[test]
    fn created_omits_meta() {
        let r = ApiResponse::created(json!({"id": 9}));
        assert_eq!(r.status, StatusCode::CREATED);
        assert_eq!(r.body, Some(json!({"data": {"id": 9}})));
    }
}
