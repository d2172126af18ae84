//! Message board service with a paginated feed behind a read-through page
//! cache that is flushed on every write.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
