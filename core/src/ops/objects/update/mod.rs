//! Rewrite an original object and re-propagate it

pub mod action;
pub mod input;
pub mod output;

pub use action::UpdateObjectAction;
pub use input::UpdateObjectInput;
pub use output::UpdateObjectOutput;
