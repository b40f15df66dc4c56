//! Identity matching
//!
//! Finds, on a target owner, the object a candidate corresponds to. Lookups go by lineage first
//! (the child already tracking the candidate) and by natural key second.

use crate::{
	domain::{ConfigObject, OwnerId},
	infra::store::{ConfigStore, StoreResult},
};
use tracing::trace;

#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
	/// Nothing on the target carries the candidate's key
	None,
	/// The target's tracked child of the candidate
	ExistingInherited(ConfigObject),
	/// An object the candidate must not touch: authored on the target, inherited from another
	/// source or created by discovery
	ExistingForeign(ConfigObject),
}

/// Match `candidate` against the objects of `target`
pub fn match_object<S>(store: &S, candidate: &ConfigObject, target: OwnerId) -> StoreResult<MatchResult>
where
	S: ConfigStore + ?Sized,
{
	let key = candidate.natural_key();
	let namespace = candidate.kind().namespace();

	let tracked = store
		.find_inherited(candidate.id, Some(target))?
		.into_iter()
		.next();
	let same_key = store.find_objects(target, namespace, Some(&key))?;

	let result = match tracked {
		Some(child) => {
			// A renamed source must not take over another object's key
			match same_key.into_iter().find(|object| object.id != child.id) {
				Some(other) => MatchResult::ExistingForeign(other),
				None => MatchResult::ExistingInherited(child),
			}
		}
		// Whatever carries the key here is untracked: local, from another source, or discovered
		None => match same_key.into_iter().next() {
			Some(existing) => MatchResult::ExistingForeign(existing),
			None => MatchResult::None,
		},
	};

	trace!(
		object = %candidate.id,
		owner = %target,
		result = result.label(),
		"Matched candidate"
	);

	Ok(result)
}

impl MatchResult {
	pub fn label(&self) -> &'static str {
		match self {
			Self::None => "none",
			Self::ExistingInherited(_) => "existing_inherited",
			Self::ExistingForeign(_) => "existing_foreign",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		domain::{ObjectBody, ObjectOrigin, TriggerBody},
		infra::store::InMemoryStore,
	};
	use lineage_expression::Expression;

	fn trigger(owner: OwnerId, owner_name: &str, description: &str) -> ConfigObject {
		let expression = Expression::parse(format!("last(/{owner_name}/agent.ping)=0")).unwrap();
		ConfigObject::original(
			owner,
			ObjectBody::Trigger(TriggerBody::new(description, expression)),
		)
	}

	#[test]
	fn test_none_when_key_is_free() {
		let mut store = InMemoryStore::new();
		let template = store.add_template("T");
		let host = store.add_host("H");
		let source = trigger(template, "T", "Down");

		assert_eq!(
			match_object(&store, &source, host).unwrap(),
			MatchResult::None
		);
	}

	#[test]
	fn test_tracked_child_is_inherited() {
		let mut store = InMemoryStore::new();
		let template = store.add_template("T");
		let host = store.add_host("H");
		let source = trigger(template, "T", "Down");
		let owner = store.owner(host).unwrap();
		let child = ConfigObject::inherited_from(&source, &owner, vec![]);
		store.insert_object(child.clone());

		assert_eq!(
			match_object(&store, &source, host).unwrap(),
			MatchResult::ExistingInherited(child)
		);
	}

	#[test]
	fn test_untracked_same_key_is_foreign() {
		let mut store = InMemoryStore::new();
		let template = store.add_template("T");
		let host = store.add_host("H");
		let source = trigger(template, "T", "Down");
		let local = trigger(host, "H", "Down");
		store.insert_object(local.clone());

		assert_eq!(
			match_object(&store, &source, host).unwrap(),
			MatchResult::ExistingForeign(local)
		);
	}

	#[test]
	fn test_renamed_source_colliding_with_other_object() {
		let mut store = InMemoryStore::new();
		let template = store.add_template("T");
		let host = store.add_host("H");
		let owner = store.owner(host).unwrap();

		let before = trigger(template, "T", "Down");
		let child = ConfigObject::inherited_from(&before, &owner, vec![]);
		store.insert_object(child.clone());

		let local = trigger(host, "H", "Unreachable");
		store.insert_object(local.clone());

		// The template trigger is renamed to a description the host already uses
		let mut renamed = before.clone();
		if let ObjectBody::Trigger(body) = &mut renamed.body {
			body.description = "Unreachable".to_string();
		}

		assert_eq!(
			match_object(&store, &renamed, host).unwrap(),
			MatchResult::ExistingForeign(local)
		);

		// Renamed to a free description, the child is still tracked
		if let ObjectBody::Trigger(body) = &mut renamed.body {
			body.description = "Ping lost".to_string();
		}
		assert_eq!(
			match_object(&store, &renamed, host).unwrap(),
			MatchResult::ExistingInherited(child)
		);
	}

	#[test]
	fn test_discovered_is_foreign() {
		let mut store = InMemoryStore::new();
		let template = store.add_template("T");
		let host = store.add_host("H");
		let source = trigger(template, "T", "Down");

		let mut discovered = trigger(host, "H", "Down");
		discovered.origin = ObjectOrigin::Discovered;
		store.insert_object(discovered.clone());

		assert_eq!(
			match_object(&store, &source, host).unwrap(),
			MatchResult::ExistingForeign(discovered)
		);
	}
}
