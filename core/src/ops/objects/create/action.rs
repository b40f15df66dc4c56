//! Create object action

use super::{input::CreateObjectInput, output::CreateObjectOutput};
use crate::{
	common::Result,
	domain::{ConfigObject, DependencyEdge, OwnerId, Report},
	engine::InheritanceEngine,
	infra::{
		action::EngineAction,
		store::{ConfigStore, Store},
	},
	ops::objects::{ensure_key_free, resolve_bindings, validate_body},
};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CreateObjectAction {
	input: CreateObjectInput,
}

impl CreateObjectAction {
	pub fn new(input: CreateObjectInput) -> Self {
		Self { input }
	}
}

impl EngineAction for CreateObjectAction {
	type Input = CreateObjectInput;
	type Output = CreateObjectOutput;

	fn from_input(input: CreateObjectInput) -> std::result::Result<Self, String> {
		input.validate()?;
		Ok(CreateObjectAction::new(input))
	}

	fn action_kind(&self) -> &'static str {
		"objects.create"
	}

	fn target_owners<S>(&self, _store: &S) -> Result<Vec<OwnerId>>
	where
		S: ConfigStore + ?Sized,
	{
		Ok(vec![self.input.owner])
	}

	fn execute<S>(self, engine: &InheritanceEngine, store: &mut S) -> Result<Self::Output>
	where
		S: Store + ?Sized,
	{
		let CreateObjectInput {
			owner,
			body,
			dependencies,
		} = self.input;
		let owner = store.owner(owner)?;

		validate_body(&*store, &owner, &body)?;
		ensure_key_free(&*store, &owner, &body, None)?;

		let mut object = ConfigObject::original(owner.id, body);
		object.bindings = resolve_bindings(engine, &*store, &owner, &object.body)?;
		let id = store.write_object(object)?;
		debug!(object = %id, owner = %owner.name, "Created object");

		let edges: Vec<DependencyEdge> = dependencies
			.into_iter()
			.map(|up| DependencyEdge::new(id, up))
			.collect();
		engine.validate_replacement(&*store, &edges, &[])?;
		store.write_dependency_edges(&edges)?;

		let linked = store.find_linked_owners(owner.id)?;
		let report = if linked.is_empty() {
			Report::new()
		} else {
			engine.propagate_in(store, id, &linked)?
		};

		Ok(CreateObjectOutput { object: id, report })
	}
}
