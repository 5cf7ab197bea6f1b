//! Catalog domain model.
//!
//! # Responsibility
//! - Define the canonical `Beer` record read by the lookup and query paths.
//! - Define paging value types shared by services and the request boundary.
//!
//! # Invariants
//! - Every record is identified by a stable `BeerId`.
//! - Page values are immutable once constructed.

pub mod beer;
pub mod page;
