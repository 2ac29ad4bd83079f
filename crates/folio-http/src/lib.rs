//! # Folio HTTP
//!
//! Request, response and handler plumbing for Folio REST endpoints.
//!
//! This crate owns the surface the conditional-request layer works against:
//!
//! - [`Request`]: method, URI, headers and body, with raw header and cookie accessors
//! - [`Response`]: a mutable response with `set_status`, `set_header` and `header_line`
//! - [`Handler`] and [`Middleware`]: async traits for endpoints and wrappers
//! - [`MiddlewareChain`]: composition of middleware around one handler
//! - [`Error`] and [`Result`]: the shared error type

pub mod error;
pub mod middleware;
pub mod request;
pub mod response;

pub use error::{Error, Result};
pub use middleware::{Handler, Middleware, MiddlewareChain};
pub use request::{Request, RequestBuilder};
pub use response::Response;
