//! Action manager - central router for all actions

use super::EngineAction;
use crate::{
	common::{InheritanceError, Result},
	context::CallerContext,
	engine::InheritanceEngine,
	infra::store::{transaction, Store},
};
use tracing::{error, info, warn};

/// Central manager for all action execution
#[derive(Debug, Clone, Default)]
pub struct ActionManager {
	engine: InheritanceEngine,
}

impl ActionManager {
	pub fn new(engine: InheritanceEngine) -> Self {
		Self { engine }
	}

	pub fn engine(&self) -> &InheritanceEngine {
		&self.engine
	}

	/// Check permissions, then run `action` in one transaction
	pub fn dispatch<A, S>(&self, ctx: &CallerContext, store: &mut S, action: A) -> Result<A::Output>
	where
		A: EngineAction,
		S: Store + ?Sized,
	{
		let action_kind = action.action_kind();
		let span = ctx.span(action_kind);
		let _guard = span.enter();

		info!("Executing action: {}", action_kind);

		let result = self.authorize(ctx, &*store, &action).and_then(|()| {
			transaction(store, |store| action.execute(&self.engine, store))
		});

		match &result {
			Ok(_) => info!("Action {} completed successfully", action_kind),
			Err(e) => error!("Action {} failed: {}", action_kind, e),
		}

		result
	}

	fn authorize<A, S>(&self, ctx: &CallerContext, store: &S, action: &A) -> Result<()>
	where
		A: EngineAction,
		S: Store + ?Sized,
	{
		let owners = action.target_owners(store)?;

		if store.check_caller_may_write(ctx, &owners)? {
			return Ok(());
		}

		warn!(owners = owners.len(), "Caller may not write to every target owner");
		Err(InheritanceError::PermissionDenied {
			user: ctx.user.clone(),
			owners,
		})
	}
}
