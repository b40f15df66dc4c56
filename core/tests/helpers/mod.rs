//! Test helper modules for integration tests

pub mod fixture;

pub use fixture::*;
