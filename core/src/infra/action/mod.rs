//! Action system - caller initiated configuration writes
//!
//! Every write a caller can request is an action. The [`manager::ActionManager`] checks the
//! caller's permission once, opens the transaction and logs the outcome, so actions only carry
//! their own semantics.

use crate::{
	common::Result,
	domain::OwnerId,
	engine::InheritanceEngine,
	infra::store::{ConfigStore, Store},
};

pub mod manager;

pub use manager::ActionManager;

/// A configuration write scoped to a set of owners.
pub trait EngineAction: Sized {
	/// The input this action is built from
	type Input;

	/// The output type for this action, usually the ids written plus a propagation report
	type Output;

	/// Build the action, rejecting malformed input before anything is read
	fn from_input(input: Self::Input) -> std::result::Result<Self, String>;

	/// Get the action kind for logging/identification
	fn action_kind(&self) -> &'static str;

	/// Owners the caller must be allowed to write
	fn target_owners<S>(&self, store: &S) -> Result<Vec<OwnerId>>
	where
		S: ConfigStore + ?Sized;

	/// Execute this action inside the transaction opened by the manager
	fn execute<S>(self, engine: &InheritanceEngine, store: &mut S) -> Result<Self::Output>
	where
		S: Store + ?Sized;
}
