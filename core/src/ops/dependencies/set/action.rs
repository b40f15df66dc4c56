//! Set dependencies action

use super::{input::SetDependenciesInput, output::SetDependenciesOutput};
use crate::{
	common::{InheritanceError, Result},
	domain::{DependencyEdge, OwnerId},
	engine::InheritanceEngine,
	infra::{
		action::EngineAction,
		store::{ConfigStore, Store},
	},
};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct SetDependenciesAction {
	input: SetDependenciesInput,
}

impl SetDependenciesAction {
	pub fn new(input: SetDependenciesInput) -> Self {
		Self { input }
	}
}

impl EngineAction for SetDependenciesAction {
	type Input = SetDependenciesInput;
	type Output = SetDependenciesOutput;

	fn from_input(input: SetDependenciesInput) -> std::result::Result<Self, String> {
		Ok(SetDependenciesAction::new(input))
	}

	fn action_kind(&self) -> &'static str {
		"dependencies.set"
	}

	fn target_owners<S>(&self, store: &S) -> Result<Vec<OwnerId>>
	where
		S: ConfigStore + ?Sized,
	{
		Ok(vec![store.object(self.input.trigger)?.owner_id])
	}

	fn execute<S>(self, engine: &InheritanceEngine, store: &mut S) -> Result<Self::Output>
	where
		S: Store + ?Sized,
	{
		let SetDependenciesInput { trigger, ups } = self.input;

		if store.object(trigger)?.is_inherited() {
			return Err(InheritanceError::InheritedObjectReadOnly(trigger));
		}

		let current = store.read_dependency_edges(&[trigger])?;
		let proposed: Vec<DependencyEdge> =
			ups.iter().map(|&up| DependencyEdge::new(trigger, up)).collect();

		// The whole new set is checked as if the current one were already gone
		engine.validate_replacement(&*store, &proposed, &current)?;

		store.delete_dependency_edges(&current)?;
		store.write_dependency_edges(&proposed)?;

		let added: Vec<DependencyEdge> = proposed
			.iter()
			.filter(|edge| !current.contains(edge))
			.copied()
			.collect();
		let removed: Vec<DependencyEdge> = current
			.iter()
			.filter(|edge| !proposed.contains(edge))
			.copied()
			.collect();
		debug!(
			trigger = %trigger,
			added = added.len(),
			removed = removed.len(),
			"Replaced dependencies"
		);

		let report = engine.resync_dependencies(store, trigger)?;

		Ok(SetDependenciesOutput {
			added,
			removed,
			report,
		})
	}
}
