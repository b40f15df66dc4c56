//! Delete an original object together with everything inherited from it

pub mod action;
pub mod input;
pub mod output;

pub use action::DeleteObjectAction;
pub use input::DeleteObjectInput;
pub use output::DeleteObjectOutput;
