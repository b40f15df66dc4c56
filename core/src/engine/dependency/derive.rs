//! Re-deriving dependency edges for inherited copies
//!
//! A child never copies its parent's edges. Each parent edge is re-pointed at the child owner's
//! own copy of the up trigger, or dropped when that owner never received it.

use crate::{
	domain::{ConfigObject, DependencyEdge, DroppedDependency, ObjectId, OwnerId},
	infra::store::{ConfigStore, StoreResult},
};
use std::collections::{HashSet, VecDeque};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DerivedEdges {
	pub edges: Vec<DependencyEdge>,
	pub dropped: Vec<DroppedDependency>,
}

/// Edges `child` must have given the current edges of `parent`
pub fn derive_child_edges<S>(
	store: &S,
	parent: &ConfigObject,
	child: &ConfigObject,
) -> StoreResult<DerivedEdges>
where
	S: ConfigStore + ?Sized,
{
	let mut derived = DerivedEdges::default();

	for edge in store.read_dependency_edges(&[parent.id])? {
		let up = store.object(edge.up)?;
		let up_owner = store.owner(up.owner_id)?;

		// Host triggers are already concrete, every copy depends on the same one
		if !up_owner.is_template() {
			derived.edges.push(DependencyEdge::new(child.id, up.id));
			continue;
		}

		match find_copy_on(store, up.id, child.owner_id)? {
			Some(copy) => derived.edges.push(DependencyEdge::new(child.id, copy)),
			None => derived.dropped.push(DroppedDependency {
				owner: child.owner_id,
				down: child.id,
				parent_edge: edge,
			}),
		}
	}

	Ok(derived)
}

/// The copy of `object` owned by `owner`, at any inheritance depth
pub fn find_copy_on<S>(store: &S, object: ObjectId, owner: OwnerId) -> StoreResult<Option<ObjectId>>
where
	S: ConfigStore + ?Sized,
{
	let mut visited = HashSet::from([object]);
	let mut queue = VecDeque::from([object]);

	while let Some(id) = queue.pop_front() {
		for child in store.find_inherited(id, None)? {
			if child.owner_id == owner {
				return Ok(Some(child.id));
			}
			if visited.insert(child.id) {
				queue.push_back(child.id);
			}
		}
	}

	Ok(None)
}
