//! Everything the dependency rules look at, loaded once per validation
//!
//! The rules themselves never touch the store. They run over this snapshot of the triggers named
//! by the proposed edges, the owners holding them and the existing edges reachable from them.

use crate::{
	domain::{DependencyEdge, ObjectId, ObjectKind, OwnerId, OwnerKind},
	infra::store::{ConfigStore, StoreResult},
};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

#[derive(Debug, Clone)]
pub struct TriggerInfo {
	pub id: ObjectId,
	pub kind: ObjectKind,
	pub owner: OwnerId,
	pub owner_kind: OwnerKind,
	/// Objects this one was inherited from, nearest first
	pub lineage: Vec<ObjectId>,
}

#[derive(Debug, Default)]
pub struct Topology {
	triggers: HashMap<ObjectId, TriggerInfo>,
	/// Transitive parent templates of each owner
	ancestors: HashMap<OwnerId, HashSet<OwnerId>>,
	/// Transitively linked hosts and templates of each owner
	descendants: HashMap<OwnerId, HashSet<OwnerId>>,
	/// Directly linked hosts and templates of each owner
	children: HashMap<OwnerId, Vec<OwnerId>>,
	/// Stored edges reachable from the proposed ones, minus the edges being removed
	existing: BTreeSet<DependencyEdge>,
}

impl Topology {
	pub fn load<S>(
		store: &S,
		proposed: &[DependencyEdge],
		removed: &[DependencyEdge],
	) -> StoreResult<Self>
	where
		S: ConfigStore + ?Sized,
	{
		let mut topology = Self::default();

		let mut ids: Vec<ObjectId> = Vec::new();
		for edge in proposed {
			for id in [edge.down, edge.up] {
				if !ids.contains(&id) {
					ids.push(id);
				}
			}
		}

		for &id in &ids {
			let object = store.object(id)?;
			let owner = store.owner(object.owner_id)?;

			let mut lineage = Vec::new();
			let mut parent = object.template_id;
			while let Some(parent_id) = parent {
				if lineage.contains(&parent_id) {
					break;
				}
				lineage.push(parent_id);
				parent = store.object(parent_id)?.template_id;
			}

			topology.load_owner(store, owner.id)?;
			topology.triggers.insert(
				id,
				TriggerInfo {
					id,
					kind: object.kind(),
					owner: owner.id,
					owner_kind: owner.kind,
					lineage,
				},
			);
		}

		// Follow up-edges from every trigger involved so cycles through stored edges are seen
		let mut seen: HashSet<ObjectId> = ids.iter().copied().collect();
		let mut frontier = ids;
		while !frontier.is_empty() {
			let edges = store.read_dependency_edges(&frontier)?;
			frontier = Vec::new();

			for edge in edges {
				if removed.contains(&edge) {
					continue;
				}
				if seen.insert(edge.up) {
					frontier.push(edge.up);
				}
				topology.existing.insert(edge);
			}
		}

		Ok(topology)
	}

	fn load_owner<S>(&mut self, store: &S, owner: OwnerId) -> StoreResult<()>
	where
		S: ConfigStore + ?Sized,
	{
		if self.children.contains_key(&owner) {
			return Ok(());
		}

		let children = store.find_linked_owners(owner)?;
		for &child in &children {
			if !self.ancestors.contains_key(&child) {
				let ancestors = closure(child, |id| store.find_parent_templates(id))?;
				self.ancestors.insert(child, ancestors);
			}
		}

		let ancestors = closure(owner, |id| store.find_parent_templates(id))?;
		let descendants = closure(owner, |id| store.find_linked_owners(id))?;

		self.ancestors.insert(owner, ancestors);
		self.descendants.insert(owner, descendants);
		self.children.insert(owner, children);
		Ok(())
	}

	pub fn trigger(&self, id: ObjectId) -> Option<&TriggerInfo> {
		self.triggers.get(&id)
	}

	pub fn existing(&self) -> &BTreeSet<DependencyEdge> {
		&self.existing
	}

	pub fn is_ancestor(&self, owner: OwnerId, candidate: OwnerId) -> bool {
		self.ancestors
			.get(&owner)
			.is_some_and(|ancestors| ancestors.contains(&candidate))
	}

	pub fn is_descendant(&self, owner: OwnerId, candidate: OwnerId) -> bool {
		self.descendants
			.get(&owner)
			.is_some_and(|descendants| descendants.contains(&candidate))
	}

	pub fn children(&self, owner: OwnerId) -> &[OwnerId] {
		self.children
			.get(&owner)
			.map(Vec::as_slice)
			.unwrap_or_default()
	}
}

/// Everything reachable from `start` through `next`, `start` excluded
fn closure<F>(start: OwnerId, mut next: F) -> StoreResult<HashSet<OwnerId>>
where
	F: FnMut(OwnerId) -> StoreResult<Vec<OwnerId>>,
{
	let mut found = HashSet::new();
	let mut queue = VecDeque::from([start]);

	while let Some(owner) = queue.pop_front() {
		for linked in next(owner)? {
			if linked != start && found.insert(linked) {
				queue.push_back(linked);
			}
		}
	}

	Ok(found)
}
