//! Common test infrastructure shared across integration tests.

pub mod repository;

#[allow(unused_imports)]
pub use repository::*;
