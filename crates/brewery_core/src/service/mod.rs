//! Catalog use-case services.
//!
//! # Responsibility
//! - Turn lookup and list requests into repository calls.
//! - Classify every failure into the service error taxonomy.
//!
//! # Invariants
//! - Services hold no mutable state between calls.
//! - Services never retry store calls.

pub mod beer_service;
