//! Shared types and harvest selection logic for Greenhouse Harvest Planning
//!
//! This crate contains the domain model and the pure planning algorithms shared
//! between the backend, the browser (via WASM), and tests. It performs no I/O.

pub mod models;
pub mod schedule;
pub mod selector;
pub mod types;
pub mod validation;

pub use models::*;
pub use schedule::*;
pub use selector::*;
pub use types::*;
pub use validation::*;
