//! Typed, synchronous client core for the GitLab REST API.
//!
//! # Overview
//! Two protocols cooperate here. Outbound, every remote action is a static
//! [`Endpoint`] whose parameter rules are checked by [`params::resolve`]
//! before a request is built; unknown or malformed arguments never reach the
//! network. Inbound, JSON payloads are hydrated into immutable, schema-bound
//! domain objects ([`model`]) that can issue further requests through an
//! explicitly passed [`Dispatch`] and return fresh successors.
//!
//! # Design
//! - `Client` is stateless: it builds `HttpRequest` values and parses
//!   `HttpResponse` values without touching the network.
//! - An [`Executor`] supplied by the caller performs the round-trip;
//!   [`Session`] glues the two together.
//! - Domain objects never hold a session, so their lifetime and ownership
//!   stay independent of the connection.

pub mod api;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod model;
pub mod page;
pub mod params;
pub mod path;
pub mod session;

pub use client::{Client, Payload};
pub use config::Config;
pub use endpoint::{Endpoint, PathArg, Scope};
pub use error::{ApiError, TransportError, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use model::{Attr, Entity, File, MergeRequest, Milestone, Model, Note, Project, User};
pub use page::{Page, Pagination};
pub use params::{ParamRule, ParamValue, Params, Scalar, TypeTag};
pub use path::{encode_segment, project_path, ResourceId};
pub use session::{Dispatch, Executor, Session};
