//! Replace the up triggers of one trigger

pub mod action;
pub mod input;
pub mod output;

pub use action::SetDependenciesAction;
pub use input::SetDependenciesInput;
pub use output::SetDependenciesOutput;
