//! Repository layer for the beer catalog.
//!
//! # Responsibility
//! - Define the read contract the services consume (`BeerRepository`).
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Absence is reported as `Ok(None)`; only transport and data faults are
//!   errors.

pub mod beer_repo;
