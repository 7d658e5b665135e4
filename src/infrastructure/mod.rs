//! Infrastructure layer for external integrations.
//!
//! Implements the seams defined by the domain layer:
//!
//! - [`cache`] - Caching abstractions (Redis, in-memory, and no-op backends)
//! - [`persistence`] - PostgreSQL repository implementation

pub mod cache;
pub mod persistence;
