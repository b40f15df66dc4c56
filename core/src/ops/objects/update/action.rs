//! Update object action

use super::{input::UpdateObjectInput, output::UpdateObjectOutput};
use crate::{
	common::{InheritanceError, Result},
	domain::{ConfigObject, ObjectOrigin, OwnerId, Report},
	engine::InheritanceEngine,
	infra::{
		action::EngineAction,
		store::{ConfigStore, Store},
	},
	ops::objects::{ensure_key_free, resolve_bindings, validate_body},
};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct UpdateObjectAction {
	input: UpdateObjectInput,
}

impl UpdateObjectAction {
	pub fn new(input: UpdateObjectInput) -> Self {
		Self { input }
	}
}

impl EngineAction for UpdateObjectAction {
	type Input = UpdateObjectInput;
	type Output = UpdateObjectOutput;

	fn from_input(input: UpdateObjectInput) -> std::result::Result<Self, String> {
		Ok(UpdateObjectAction::new(input))
	}

	fn action_kind(&self) -> &'static str {
		"objects.update"
	}

	fn target_owners<S>(&self, store: &S) -> Result<Vec<OwnerId>>
	where
		S: ConfigStore + ?Sized,
	{
		Ok(vec![store.object(self.input.object)?.owner_id])
	}

	fn execute<S>(self, engine: &InheritanceEngine, store: &mut S) -> Result<Self::Output>
	where
		S: Store + ?Sized,
	{
		let UpdateObjectInput { object: id, body } = self.input;
		let existing = store.object(id)?;

		if existing.is_inherited() {
			return Err(InheritanceError::InheritedObjectReadOnly(id));
		}
		if existing.origin == ObjectOrigin::Discovered {
			return Err(InheritanceError::InvalidOperation(format!(
				"object {id} was created by discovery"
			)));
		}

		let owner = store.owner(existing.owner_id)?;
		// Kind is fixed for the life of an object
		if existing.kind() != body.kind() {
			return Err(InheritanceError::TypeMismatch {
				owner: owner.name,
				key: existing.natural_key().to_string(),
			});
		}

		validate_body(&*store, &owner, &body)?;
		ensure_key_free(&*store, &owner, &body, Some(id))?;

		let bindings = resolve_bindings(engine, &*store, &owner, &body)?;
		let updated = ConfigObject {
			body,
			bindings,
			..existing
		};
		store.update_object(id, updated)?;
		debug!(object = %id, owner = %owner.name, "Updated object");

		let linked = store.find_linked_owners(owner.id)?;
		let report = if linked.is_empty() {
			Report::new()
		} else {
			engine.propagate_in(store, id, &linked)?
		};

		Ok(UpdateObjectOutput { object: id, report })
	}
}
