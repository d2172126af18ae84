//! Application services layer scaffolding.

pub mod board;
pub mod error;
pub mod pagination;
pub mod repos;
