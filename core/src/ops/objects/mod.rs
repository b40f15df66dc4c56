//! Objects authored directly on a host or template

pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateObjectAction, CreateObjectInput, CreateObjectOutput};
pub use delete::{DeleteObjectAction, DeleteObjectInput, DeleteObjectOutput};
pub use update::{UpdateObjectAction, UpdateObjectInput, UpdateObjectOutput};

use crate::{
	common::{InheritanceError, Result},
	domain::{
		Binding, BindingRole, BindingTarget, ConfigObject, Inheritable, KeyNamespace, NaturalKey,
		ObjectBody, ObjectId, Owner,
	},
	engine::{
		resolver::{ResolveError, Resolver},
		InheritanceEngine,
	},
	infra::store::{ConfigStore, Store},
};
use std::collections::{HashSet, VecDeque};
use tracing::debug;

const NAMESPACES: [KeyNamespace; 4] = [
	KeyNamespace::Item,
	KeyNamespace::HostPrototype,
	KeyNamespace::Trigger,
	KeyNamespace::Graph,
];

/// Trigger expressions must reference `owner` and only items that exist on owners of its kind
///
/// Host prototypes may only list templates that exist.
pub(crate) fn validate_body<S>(store: &S, owner: &Owner, body: &ObjectBody) -> Result<()>
where
	S: ConfigStore + ?Sized,
{
	if let ObjectBody::HostPrototype(prototype) = body {
		return validate_prototype_templates(store, &prototype.templates);
	}

	let Some(trigger) = body.trigger() else {
		return Ok(());
	};

	if !trigger.expression.references_host(&owner.name) {
		return Err(InheritanceError::InvalidOperation(format!(
			"trigger \"{}\" must reference at least one item of \"{}\"",
			trigger.description, owner.name
		)));
	}

	let expressions = std::iter::once(&trigger.expression).chain(&trigger.recovery_expression);
	for query in expressions.flat_map(|expression| expression.queries()) {
		let referenced = store
			.owner_by_name(query.host())?
			.ok_or_else(|| InheritanceError::NotFound(format!("owner \"{}\"", query.host())))?;

		if referenced.kind != owner.kind {
			return Err(InheritanceError::InvalidOperation(format!(
				"trigger \"{}\" cannot mix items of hosts and templates",
				trigger.description
			)));
		}

		let role = BindingRole::Item(query.key().to_string());
		if store.find_binding(referenced.id, &role)?.is_none() {
			return Err(InheritanceError::NotFound(format!(
				"item \"{}\" on \"{}\"",
				query.key(),
				referenced.name
			)));
		}
	}

	Ok(())
}

fn validate_prototype_templates<S>(store: &S, templates: &[String]) -> Result<()>
where
	S: ConfigStore + ?Sized,
{
	for name in templates {
		let template = store
			.owner_by_name(name)?
			.ok_or_else(|| InheritanceError::NotFound(format!("template \"{name}\"")))?;

		if !template.is_template() {
			return Err(InheritanceError::InvalidOperation(format!(
				"host prototypes can only link templates, \"{name}\" is a host"
			)));
		}
	}
	Ok(())
}

/// Fails when another object on `owner` already uses the natural key of `body`
pub(crate) fn ensure_key_free<S>(
	store: &S,
	owner: &Owner,
	body: &ObjectBody,
	except: Option<ObjectId>,
) -> Result<()>
where
	S: ConfigStore + ?Sized,
{
	let key = body.natural_key();
	let taken = store
		.find_objects(owner.id, key.namespace(), Some(&key))?
		.iter()
		.any(|object| Some(object.id) != except);

	if taken {
		return Err(InheritanceError::ForeignObjectConflict {
			owner: owner.name.clone(),
			key: key.to_string(),
		});
	}
	Ok(())
}

/// Bindings for an object authored on `owner`; a missing binding is an error here, not a skip
pub(crate) fn resolve_bindings<S>(
	engine: &InheritanceEngine,
	store: &S,
	owner: &Owner,
	body: &ObjectBody,
) -> Result<Vec<Binding>>
where
	S: ConfigStore + ?Sized,
{
	Resolver::new(&engine.config().interface_priority)
		.resolve(store, body, owner)
		.map_err(|e| match e {
			ResolveError::NoCompatibleBinding { role } => InheritanceError::NoCompatibleBinding {
				owner: owner.name.clone(),
				role: role.name().to_string(),
				key: ResolveError::missing_key(&role),
			},
			ResolveError::Store(e) => e.into(),
		})
}

/// Deletes `root`, its inherited descendants and every object bound to any of them
///
/// Returns the deleted ids, `root` first.
pub(crate) fn cascade_delete<S>(store: &mut S, root: ObjectId) -> Result<Vec<ObjectId>>
where
	S: Store + ?Sized,
{
	let mut deleted = Vec::new();
	let mut seen = HashSet::from([root]);
	let mut queue = VecDeque::from([root]);

	while let Some(id) = queue.pop_front() {
		let object = store.object(id)?;

		let mut next: Vec<ObjectId> = store
			.find_inherited(id, None)?
			.into_iter()
			.map(|child| child.id)
			.collect();
		next.extend(bound_to(&*store, &object)?);

		for id in next {
			if seen.insert(id) {
				queue.push_back(id);
			}
		}
		deleted.push(id);
	}

	let mut edges = store.read_dependency_edges(&deleted)?;
	edges.extend(store.read_dependents(&deleted)?);
	edges.sort();
	edges.dedup();
	store.delete_dependency_edges(&edges)?;

	// Dependents before what they hang off
	for id in deleted.iter().rev() {
		store.delete_object(*id)?;
	}

	debug!(root = %root, objects = deleted.len(), edges = edges.len(), "Cascade deleted");
	Ok(deleted)
}

/// Objects on the same owner that bind to `object`
fn bound_to<S>(store: &S, object: &ConfigObject) -> Result<Vec<ObjectId>>
where
	S: ConfigStore + ?Sized,
{
	// Template side item roles are markers, match those by key
	let marker_key = match (&object.body, object.natural_key()) {
		(ObjectBody::Item(_) | ObjectBody::ItemPrototype(_), NaturalKey::Item(key)) => Some(key),
		_ => None,
	};

	let mut bound = Vec::new();
	for namespace in NAMESPACES {
		for candidate in store.find_objects(object.owner_id, namespace, None)? {
			if candidate.id == object.id {
				continue;
			}

			let uses = candidate.bindings.iter().any(|binding| match binding.target {
				Some(target) => target == BindingTarget::Object(object.id),
				None => {
					!matches!(binding.role, BindingRole::Interface(_))
						&& marker_key.is_some()
						&& binding.role.key() == marker_key.as_deref()
				}
			});

			if uses {
				bound.push(candidate.id);
			}
		}
	}

	Ok(bound)
}
