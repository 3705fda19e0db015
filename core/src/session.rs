//! The executor seam and the dispatch capability handed to domain objects.
//!
//! # Design
//! `Executor` is the only piece that performs I/O. `Session` pairs it with a
//! [`Client`] and implements [`Dispatch`]: build, execute, parse. Domain
//! objects never store a session; each remote method takes `&dyn Dispatch`
//! explicitly, so ownership stays with the caller.

use serde_json::Value;
use tracing::debug;

use crate::client::{Client, Payload};
use crate::endpoint::{Endpoint, PathArg};
use crate::error::{ApiError, TransportError};
use crate::http::{HttpRequest, HttpResponse};
use crate::page::Page;
use crate::params::Params;

/// Performs one HTTP round-trip.
pub trait Executor {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<F> Executor for F
where
    F: Fn(HttpRequest) -> Result<HttpResponse, TransportError>,
{
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self(request)
    }
}

/// Issues endpoint operations on behalf of callers and domain objects.
pub trait Dispatch {
    fn dispatch(
        &self,
        endpoint: &Endpoint,
        path: &[PathArg<'_>],
        args: Params,
    ) -> Result<Payload, ApiError>;

    /// Dispatches and returns only the decoded body.
    fn call(
        &self,
        endpoint: &Endpoint,
        path: &[PathArg<'_>],
        args: Params,
    ) -> Result<Value, ApiError> {
        Ok(self.dispatch(endpoint, path, args)?.body)
    }

    /// Dispatches a list endpoint; a non-array body is treated as one item.
    fn call_page(
        &self,
        endpoint: &Endpoint,
        path: &[PathArg<'_>],
        args: Params,
    ) -> Result<Page<Value>, ApiError> {
        let payload = self.dispatch(endpoint, path, args)?;
        let items = match payload.body {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            other => vec![other],
        };
        Ok(Page {
            items,
            pagination: payload.pagination,
        })
    }
}

pub struct Session<E> {
    client: Client,
    executor: E,
}

impl<E: Executor> Session<E> {
    pub fn new(client: Client, executor: E) -> Self {
        Self { client, executor }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }
}

impl<E: Executor> Dispatch for Session<E> {
    fn dispatch(
        &self,
        endpoint: &Endpoint,
        path: &[PathArg<'_>],
        args: Params,
    ) -> Result<Payload, ApiError> {
        let request = self.client.build(endpoint, path, args)?;
        debug!(endpoint = endpoint.name, "dispatching");
        let response = self.executor.execute(request)?;
        self.client.parse(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::api::merge_requests;
    use crate::path::ResourceId;

    type Reply = Result<HttpResponse, TransportError>;

    fn client() -> Client {
        Client::new("http://gitlab.test/api/v4")
    }

    fn ok(body: &str) -> Reply {
        Ok(HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        })
    }

    #[test]
    fn closures_act_as_executors() {
        let seen = RefCell::new(Vec::new());
        let session = Session::new(client(), |req: HttpRequest| -> Reply {
            seen.borrow_mut().push(req.path);
            ok(r#"{"iid":5}"#)
        });
        let body = session
            .call(
                &merge_requests::SHOW,
                &[("project", ResourceId::from(1)), ("merge_request_iid", ResourceId::from(5))],
                Params::new(),
            )
            .unwrap();
        assert_eq!(body["iid"], 5);
        assert_eq!(
            *seen.borrow(),
            vec!["http://gitlab.test/api/v4/projects/1/merge_requests/5".to_string()]
        );
    }

    #[test]
    fn validation_failure_skips_the_executor() {
        let calls = RefCell::new(0);
        let session = Session::new(client(), |_req: HttpRequest| -> Reply {
            *calls.borrow_mut() += 1;
            ok("{}")
        });
        let err = session
            .call(
                &merge_requests::ALL,
                &[("project", ResourceId::from(1))],
                crate::params! { "state" => "bogus" },
            )
            .unwrap_err();
        assert!(err.validation().is_some());
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn transport_errors_pass_through() {
        let session = Session::new(client(), |_req: HttpRequest| -> Reply {
            Err(TransportError::new("connection reset"))
        });
        let err = session
            .call(&merge_requests::ALL, &[("project", ResourceId::from(1))], Params::new())
            .unwrap_err();
        match err {
            ApiError::Transport(inner) => assert_eq!(inner.message(), "connection reset"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn call_page_wraps_list_bodies() {
        let session = Session::new(client(), |_req: HttpRequest| -> Reply {
            Ok(HttpResponse {
                status: 200,
                headers: vec![("x-next-page".to_string(), "2".to_string())],
                body: r#"[{"iid":1},{"iid":2}]"#.to_string(),
            })
        });
        let page = session
            .call_page(&merge_requests::ALL, &[("project", ResourceId::from(1))], Params::new())
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(page.has_next());
    }
}
