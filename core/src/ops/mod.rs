//! Caller facing operations
//!
//! Each operation is an [`EngineAction`](crate::infra::action::EngineAction) dispatched through
//! the [`ActionManager`](crate::infra::action::ActionManager): one permission check, one
//! transaction, then the engine does the propagation.

pub mod dependencies;
pub mod objects;
pub mod templates;
