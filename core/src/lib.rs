//! Transport-agnostic core of the todo resource service.
//!
//! # Overview
//! Turns a plain-data `HttpRequest` (verb, path remainder, raw query, raw
//! body) into a plain-data `HttpResponse`, consulting a `TodoStore` along the
//! way. The caller owns the socket; the core owns routing, partial-update
//! reconciliation and JSON encoding.
//!
//! # Design
//! - `path::classify` is the single place that decides collection vs item vs
//!   invalid addressing.
//! - `query::decode_form` reads creation parameters (query and body) the way
//!   a servlet parameter map does; `query::decode_query` reads the first body
//!   line of an update.
//! - `TodoStore` is injected, so any backend (SQLite in the server crate,
//!   `MemoryStore` here) can sit behind `Resources`.

pub mod error;
pub mod http;
pub mod path;
pub mod query;
pub mod resource;
pub mod store;
pub mod types;

pub use error::{DecodeError, ResourceError, StoreError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use path::{classify, Target};
pub use query::{decode_form, decode_query};
pub use resource::{today, Clock, Resources};
pub use store::{MemoryStore, TodoStore};
pub use types::{Todo, TodoPatch};
