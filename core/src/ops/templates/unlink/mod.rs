//! Unlink owners from templates, detaching or deleting what they inherited

pub mod action;
pub mod input;
pub mod output;

pub use action::UnlinkTemplatesAction;
pub use input::UnlinkTemplatesInput;
pub use output::UnlinkTemplatesOutput;
