//! Create an object on a host or template and push it to everything linked beneath

pub mod action;
pub mod input;
pub mod output;

pub use action::CreateObjectAction;
pub use input::CreateObjectInput;
pub use output::CreateObjectOutput;
