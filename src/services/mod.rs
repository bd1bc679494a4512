//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business rules and persistence so route handlers can
//! stay focused on request parsing, auth plumbing and status mapping. Each
//! store is an async trait with a Postgres implementation and the shared
//! in-memory implementation in [`memory`].

pub mod drawing;
pub mod memory;
pub mod session;
