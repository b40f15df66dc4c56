//! Delete object action

use super::{input::DeleteObjectInput, output::DeleteObjectOutput};
use crate::{
	common::{InheritanceError, Result},
	domain::OwnerId,
	engine::InheritanceEngine,
	infra::{
		action::EngineAction,
		store::{ConfigStore, Store},
	},
	ops::objects::cascade_delete,
};

#[derive(Debug, Clone)]
pub struct DeleteObjectAction {
	input: DeleteObjectInput,
}

impl DeleteObjectAction {
	pub fn new(input: DeleteObjectInput) -> Self {
		Self { input }
	}
}

impl EngineAction for DeleteObjectAction {
	type Input = DeleteObjectInput;
	type Output = DeleteObjectOutput;

	fn from_input(input: DeleteObjectInput) -> std::result::Result<Self, String> {
		Ok(DeleteObjectAction::new(input))
	}

	fn action_kind(&self) -> &'static str {
		"objects.delete"
	}

	fn target_owners<S>(&self, store: &S) -> Result<Vec<OwnerId>>
	where
		S: ConfigStore + ?Sized,
	{
		Ok(vec![store.object(self.input.object)?.owner_id])
	}

	fn execute<S>(self, _engine: &InheritanceEngine, store: &mut S) -> Result<Self::Output>
	where
		S: Store + ?Sized,
	{
		let id = self.input.object;
		if store.object(id)?.is_inherited() {
			return Err(InheritanceError::InheritedObjectReadOnly(id));
		}

		let deleted = cascade_delete(store, id)?;
		Ok(DeleteObjectOutput { deleted })
	}
}
