//! Link templates action

use super::{input::LinkTemplatesInput, output::LinkTemplatesOutput};
use crate::{
	common::{InheritanceError, Result},
	domain::{ObjectId, ObjectOrigin, OwnerId, Report, TemplateLink},
	engine::{order::compute_order, sync_kind_order, InheritanceEngine},
	infra::{
		action::EngineAction,
		store::{ConfigStore, Store},
	},
};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::info;

#[derive(Debug, Clone)]
pub struct LinkTemplatesAction {
	input: LinkTemplatesInput,
}

impl LinkTemplatesAction {
	pub fn new(input: LinkTemplatesInput) -> Self {
		Self { input }
	}
}

impl EngineAction for LinkTemplatesAction {
	type Input = LinkTemplatesInput;
	type Output = LinkTemplatesOutput;

	fn from_input(input: LinkTemplatesInput) -> std::result::Result<Self, String> {
		input.validate()?;
		Ok(LinkTemplatesAction::new(input))
	}

	fn action_kind(&self) -> &'static str {
		"templates.link"
	}

	fn target_owners<S>(&self, _store: &S) -> Result<Vec<OwnerId>>
	where
		S: ConfigStore + ?Sized,
	{
		Ok(self.input.owners.clone())
	}

	fn execute<S>(self, engine: &InheritanceEngine, store: &mut S) -> Result<Self::Output>
	where
		S: Store + ?Sized,
	{
		let LinkTemplatesInput { owners, templates } = self.input;

		for &template in &templates {
			let template = store.owner(template)?;
			if !template.is_template() {
				return Err(InheritanceError::InvalidOperation(format!(
					"\"{}\" is not a template",
					template.name
				)));
			}
		}

		let mut linked = Vec::new();
		for &owner in &owners {
			let parents = store.find_parent_templates(store.owner(owner)?.id)?;
			for &template in &templates {
				let link = TemplateLink::new(owner, template);
				if !parents.contains(&template) && !linked.contains(&link) {
					linked.push(link);
				}
			}
		}

		check_link_cycles(&*store, &linked)?;
		for link in &linked {
			store.write_template_link(*link)?;
		}

		// Whatever an object binds to has to reach the new owners before the object does
		let mut batch: Vec<(ObjectId, Vec<OwnerId>)> = Vec::new();
		for kind in sync_kind_order()? {
			for &template in &templates {
				for object in store.find_objects(template, kind.namespace(), None)? {
					if object.kind() == kind && object.origin != ObjectOrigin::Discovered {
						batch.push((object.id, owners.clone()));
					}
				}
			}
		}

		let report = if batch.is_empty() {
			Report::new()
		} else {
			engine.propagate_batch(store, &batch)?
		};

		info!(
			links = linked.len(),
			objects = batch.len(),
			"Linked templates"
		);

		Ok(LinkTemplatesOutput { linked, report })
	}
}

/// Rejects `links` when adding them would make a template its own ancestor
fn check_link_cycles<S>(store: &S, links: &[TemplateLink]) -> Result<()>
where
	S: ConfigStore + ?Sized,
{
	if links.is_empty() {
		return Ok(());
	}

	let mut parents: BTreeMap<OwnerId, Vec<OwnerId>> = BTreeMap::new();
	let mut queue: VecDeque<OwnerId> = links
		.iter()
		.flat_map(|link| [link.child, link.parent])
		.collect::<BTreeSet<_>>()
		.into_iter()
		.collect();

	while let Some(owner) = queue.pop_front() {
		if parents.contains_key(&owner) {
			continue;
		}
		let found = store.find_parent_templates(owner)?;
		queue.extend(found.iter().copied());
		parents.insert(owner, found);
	}

	for link in links {
		parents.entry(link.child).or_default().push(link.parent);
	}

	compute_order(parents)
		.map(|_| ())
		.map_err(|e| InheritanceError::InvalidOperation(format!("template link rejected: {e}")))
}
