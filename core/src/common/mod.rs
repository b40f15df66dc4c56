pub mod errors;

pub use errors::{InheritanceError, Result};
