//! Request-handling boundary for the beer catalog.
//!
//! # Responsibility
//! - Translate raw request parameters into service calls.
//! - Translate service results and errors into status + JSON bodies.
//!
//! # Invariants
//! - Malformed input never reaches the services.
//! - Every `ServiceError` maps to exactly one status code.
//!
//! The HTTP server itself lives outside this crate; any framework can call
//! `BeerApi::handle_get` or `serve_request` from its route handlers.

pub mod api;
pub mod dto;
