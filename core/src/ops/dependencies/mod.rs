//! Trigger dependency writes

pub mod set;

pub use set::{SetDependenciesAction, SetDependenciesInput, SetDependenciesOutput};
