//! Link owners to templates and synchronize every template object onto them

pub mod action;
pub mod input;
pub mod output;

pub use action::LinkTemplatesAction;
pub use input::LinkTemplatesInput;
pub use output::LinkTemplatesOutput;
