//! # Validating Extractors
//!
//! Extractors that run a rule table before the handler body. Any violation
//! short-circuits the request with a 400 listing every violation.

use std::collections::HashMap;

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::validation::schemas::{ID_PARAM, PAGE_QUERY};
use crate::validation::RuleSet;

use super::error::ApiError;

/// A request DTO paired with the rules its raw JSON must satisfy
pub trait Validated: DeserializeOwned {
    const RULES: RuleSet;
}

fn check(rules: &RuleSet, input: &Value) -> Result<(), ApiError> {
    let violations = rules.evaluate(input);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(violations))
    }
}

/// JSON body checked against `T::RULES` before deserialization
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: Validated,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        check(&T::RULES, &value)?;

        serde_json::from_value(value)
            .map(ValidJson)
            .map_err(|e| ApiError::BadRequest(e.to_string()))
    }
}

/// Path `:id` that must have the shape of a record id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidId(pub String);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for ValidId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        check(&ID_PARAM, &json!({ "id": id }))?;
        Ok(ValidId(id))
    }
}

/// Optional `?page=` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery(pub Option<u64>);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for PageQuery {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        let input: Map<String, Value> = params
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();
        let input = Value::Object(input);
        check(&PAGE_QUERY, &input)?;

        let page = input
            .get("page")
            .and_then(Value::as_str)
            .and_then(|page| page.trim().parse().ok());
        Ok(PageQuery(page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header;
    use serde::Deserialize;

    use crate::validation::schemas::LOGIN;

    #[derive(Debug, Deserialize)]
    struct Credentials {
        email: String,
    }

    impl Validated for Credentials {
        const RULES: RuleSet = LOGIN;
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_json_accepts_conforming_body() {
        let req = json_request(r#"{"email":"ada@example.com","password":"x"}"#);
        let ValidJson(body) = ValidJson::<Credentials>::from_request(req, &()).await.unwrap();
        assert_eq!(body.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_valid_json_reports_violations() {
        let req = json_request(r#"{"email":7}"#);
        match ValidJson::<Credentials>::from_request(req, &()).await {
            Err(ApiError::Validation(violations)) => {
                let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
                assert_eq!(fields, vec!["email", "password"]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let req = json_request("{not json");
        let result = ValidJson::<Credentials>::from_request(req, &()).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_page_query() {
        let (mut parts, _) = Request::builder()
            .uri("/products?page=2")
            .body(Body::empty())
            .unwrap()
            .into_parts();
        let page = PageQuery::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(page, PageQuery(Some(2)));

        let (mut parts, _) = Request::builder()
            .uri("/products")
            .body(Body::empty())
            .unwrap()
            .into_parts();
        let page = PageQuery::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(page, PageQuery(None));

        let (mut parts, _) = Request::builder()
            .uri("/products?page=zero")
            .body(Body::empty())
            .unwrap()
            .into_parts();
        let result = PageQuery::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}
