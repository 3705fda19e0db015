//! Stateless HTTP request builder and response parser for the GitLab API.
//!
//! # Design
//! `Client` holds only the API root and an optional token, and carries no
//! mutable state between calls. `build` turns an endpoint, its path arguments
//! and caller arguments into an `HttpRequest`; `parse` turns an
//! `HttpResponse` into a decoded payload. Parameter validation happens inside
//! `build`, so a rejected argument never produces a request at all.

use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::endpoint::{Endpoint, PathArg};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::page::Pagination;
use crate::params::{ParamValue, Params};

/// A decoded response body plus its pagination headers.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    pub body: Value,
    pub pagination: Pagination,
}

/// Synchronous, stateless client for the GitLab REST API.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    token: Option<String>,
}

impl Client {
    /// `base_url` is the API root, e.g. `https://gitlab.example.com/api/v4`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let client = Self::new(&config.base_url);
        match &config.token {
            Some(token) => client.with_token(token),
            None => client,
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build(
        &self,
        endpoint: &Endpoint,
        path: &[PathArg<'_>],
        args: Params,
    ) -> Result<HttpRequest, ApiError> {
        let resolved = endpoint.resolve(args)?;
        let relative = endpoint.render_path(path)?;
        let mut url = format!("{}/{relative}", self.base_url);

        let mut headers = Vec::new();
        if let Some(token) = &self.token {
            headers.push(("private-token".to_string(), token.clone()));
        }

        let mut body = None;
        if endpoint.method.uses_query() {
            if !resolved.is_empty() {
                url.push('?');
                url.push_str(&query_string(&resolved));
            }
        } else if !resolved.is_empty() {
            let json: serde_json::Map<String, Value> = resolved
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect();
            let encoded = serde_json::to_string(&json)
                .map_err(|e| ApiError::SerializationError(e.to_string()))?;
            headers.push(("content-type".to_string(), "application/json".to_string()));
            body = Some(encoded);
        }

        debug!(endpoint = endpoint.name, method = %endpoint.method, path = %url, "built request");
        Ok(HttpRequest {
            method: endpoint.method,
            path: url,
            headers,
            body,
        })
    }

    pub fn parse(&self, response: HttpResponse) -> Result<Payload, ApiError> {
        debug!(status = response.status, "parsing response");
        check_status(&response)?;
        let pagination = Pagination::from_response(&response);
        let body = if response.body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&response.body)
                .map_err(|e| ApiError::DeserializationError(e.to_string()))?
        };
        Ok(Payload { body, pagination })
    }
}

fn query_string(params: &Params) -> String {
    let mut pairs = Vec::new();
    for (key, value) in params {
        let key = urlencoding::encode(key);
        match value {
            ParamValue::List(items) => {
                for item in items {
                    pairs.push(format!("{key}[]={}", urlencoding::encode(&item.to_text())));
                }
            }
            other => pairs.push(format!("{key}={}", urlencoding::encode(&other.to_text()))),
        }
    }
    pairs.join("&")
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{environments, merge_requests, registry};
    use crate::error::ValidationError;
    use crate::http::HttpMethod;
    use crate::params;
    use crate::path::ResourceId;

    fn client() -> Client {
        Client::new("http://localhost:3000/api/v4")
    }

    fn project_mr(iid: u64) -> [PathArg<'static>; 2] {
        [
            ("project", ResourceId::from(1)),
            ("merge_request_iid", ResourceId::from(iid)),
        ]
    }

    #[test]
    fn get_parameters_go_in_the_query_string() {
        let req = client()
            .build(
                &registry::REPOSITORIES,
                &[("repository_id", ResourceId::from(1))],
                params! { "tags" => true, "tags_count" => true },
            )
            .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.path,
            "http://localhost:3000/api/v4/registry/repositories/1?tags=true&tags_count=true"
        );
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn put_parameters_go_in_a_json_body() {
        let req = client()
            .build(
                &merge_requests::UPDATE,
                &project_mr(42),
                params! { "state_event" => "close" },
            )
            .unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/api/v4/projects/1/merge_requests/42");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"state_event": "close"}));
    }

    #[test]
    fn list_values_repeat_their_key() {
        let req = client()
            .build(
                &environments::ALL,
                &[("project", ResourceId::from("group/project"))],
                params! { "search" => "prod env" },
            )
            .unwrap();
        assert_eq!(
            req.path,
            "http://localhost:3000/api/v4/projects/group%2Fproject/environments?search=prod%20env"
        );
        let mut list = Params::new();
        list.insert("ids".to_string(), ParamValue::from(vec![1, 2]));
        assert_eq!(query_string(&list), "ids[]=1&ids[]=2");
    }

    #[test]
    fn invalid_arguments_never_produce_a_request() {
        let err = client()
            .build(&merge_requests::UPDATE, &project_mr(1), params! { "nope" => 1 })
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Validation(ValidationError::UnknownParameter(_))
        ));
    }

    #[test]
    fn token_is_sent_as_private_token_header() {
        let req = client()
            .with_token("secret")
            .build(&merge_requests::SHOW, &project_mr(3), Params::new())
            .unwrap();
        assert_eq!(
            req.headers,
            vec![("private-token".to_string(), "secret".to_string())]
        );
    }

    #[test]
    fn trailing_slash_is_stripped() {
        assert_eq!(Client::new("http://localhost:3000/api/v4/").base_url(), "http://localhost:3000/api/v4");
    }

    #[test]
    fn parse_success_reads_body_and_pagination() {
        let response = HttpResponse {
            status: 200,
            headers: vec![("x-next-page".to_string(), "2".to_string())],
            body: r#"[{"id":1}]"#.to_string(),
        };
        let payload = client().parse(response).unwrap();
        assert_eq!(payload.body, serde_json::json!([{"id": 1}]));
        assert_eq!(payload.pagination.next_page, Some(2));
    }

    #[test]
    fn parse_empty_body_is_null() {
        let response = HttpResponse {
            status: 204,
            headers: Vec::new(),
            body: String::new(),
        };
        assert_eq!(client().parse(response).unwrap().body, Value::Null);
    }

    #[test]
    fn parse_not_found() {
        let response = HttpResponse {
            status: 404,
            headers: Vec::new(),
            body: r#"{"message":"404 Not found"}"#.to_string(),
        };
        assert!(matches!(client().parse(response).unwrap_err(), ApiError::NotFound));
    }

    #[test]
    fn parse_wrong_status() {
        let response = HttpResponse {
            status: 405,
            headers: Vec::new(),
            body: "method not allowed".to_string(),
        };
        let err = client().parse(response).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 405, .. }));
    }

    #[test]
    fn parse_bad_json() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: "not json".to_string(),
        };
        let err = client().parse(response).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}
