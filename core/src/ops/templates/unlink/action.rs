//! Unlink templates action

use super::{input::UnlinkTemplatesInput, output::UnlinkTemplatesOutput};
use crate::{
	common::{InheritanceError, Result},
	domain::{ConfigObject, ObjectId, ObjectOrigin, OwnerId, TemplateLink},
	engine::{sync_kind_order, InheritanceEngine},
	infra::{
		action::EngineAction,
		store::{ConfigStore, Store},
	},
	ops::objects::cascade_delete,
};
use std::collections::HashSet;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct UnlinkTemplatesAction {
	input: UnlinkTemplatesInput,
}

impl UnlinkTemplatesAction {
	pub fn new(input: UnlinkTemplatesInput) -> Self {
		Self { input }
	}
}

impl EngineAction for UnlinkTemplatesAction {
	type Input = UnlinkTemplatesInput;
	type Output = UnlinkTemplatesOutput;

	fn from_input(input: UnlinkTemplatesInput) -> std::result::Result<Self, String> {
		if input.owners.is_empty() || input.templates.is_empty() {
			return Err("at least one owner and one template are required".to_string());
		}
		Ok(UnlinkTemplatesAction::new(input))
	}

	fn action_kind(&self) -> &'static str {
		"templates.unlink"
	}

	fn target_owners<S>(&self, _store: &S) -> Result<Vec<OwnerId>>
	where
		S: ConfigStore + ?Sized,
	{
		Ok(self.input.owners.clone())
	}

	fn execute<S>(self, _engine: &InheritanceEngine, store: &mut S) -> Result<Self::Output>
	where
		S: Store + ?Sized,
	{
		let UnlinkTemplatesInput {
			owners,
			templates,
			clear,
		} = self.input;

		// Dependents go before what they bind to when deleting
		let mut kinds = sync_kind_order()?;
		if clear {
			kinds.reverse();
		}

		let mut output = UnlinkTemplatesOutput::default();
		let mut gone: HashSet<ObjectId> = HashSet::new();

		for &owner in &owners {
			for &template in &templates {
				if !store.find_parent_templates(owner)?.contains(&template) {
					return Err(InheritanceError::InvalidOperation(format!(
						"owner {owner} is not linked to template {template}"
					)));
				}
				store.delete_template_link(TemplateLink::new(owner, template))?;

				for kind in &kinds {
					for object in store.find_objects(template, kind.namespace(), None)? {
						if object.kind() != *kind {
							continue;
						}

						for child in store.find_inherited(object.id, Some(owner))? {
							if gone.contains(&child.id) {
								continue;
							}

							if clear {
								let deleted = cascade_delete(store, child.id)?;
								gone.extend(deleted.iter().copied());
								output.deleted.extend(deleted);
							} else {
								let id = child.id;
								store.update_object(
									id,
									ConfigObject {
										template_id: None,
										origin: ObjectOrigin::Original,
										..child
									},
								)?;
								debug!(object = %id, owner = %owner, "Detached inherited object");
								output.detached.push(id);
							}
						}
					}
				}
			}
		}

		info!(
			detached = output.detached.len(),
			deleted = output.deleted.len(),
			"Unlinked templates"
		);

		Ok(output)
	}
}
