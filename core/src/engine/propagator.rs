//! Recursive propagation driver
//!
//! Walks the template link graph from a source object down to every host and template beneath
//! its targets. Per target it resolves bindings, matches, classifies and then writes. Every
//! written child becomes the source for the owners linked beneath it.
//!
//! Dependency edges of trigger copies are derived once every object of the run is written, in
//! write order, so an up trigger delivered later in the same run is still found.

use super::{
	classifier::{classify, Action},
	dependency::{self, derive_child_edges, Topology},
	matcher::match_object,
	resolver::{ResolveError, Resolver},
};
use crate::{
	common::Result,
	config::EngineConfig,
	domain::{
		ConfigObject, DependencyEdge, Inheritable, NaturalKey, ObjectId, ObjectOrigin, Owner,
		OwnerId, PropagatedCopy, RejectReason, Rejection, Report,
	},
	infra::store::Store,
};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, debug_span, trace, warn};

pub(crate) struct Propagator<'a, S: Store + ?Sized> {
	store: &'a mut S,
	resolver: Resolver<'a>,
	/// What each (owner, key) pair received during this run: source and copy
	delivered: HashMap<(OwnerId, NaturalKey), (ObjectId, ObjectId)>,
	/// `(parent, child)` trigger pairs whose edges must be derived
	pending_edges: Vec<(ObjectId, ObjectId)>,
}

impl<'a, S: Store + ?Sized> Propagator<'a, S> {
	pub fn new(store: &'a mut S, config: &'a EngineConfig) -> Self {
		Self {
			store,
			resolver: Resolver::new(&config.interface_priority),
			delivered: HashMap::new(),
			pending_edges: Vec::new(),
		}
	}

	/// Propagates every source onto its targets, then derives trigger dependencies
	pub fn run(mut self, sources: &[(ConfigObject, Vec<OwnerId>)]) -> Result<Report> {
		let mut report = Report::new();

		for (source, targets) in sources {
			report = report.merge(self.propagate_level(source, targets)?);
		}

		Ok(report.merge(self.sync_dependencies()?))
	}

	/// Re-derives the edges of every inherited descendant of `root`, parents first
	pub fn resync_descendants(mut self, root: ObjectId) -> Result<Report> {
		let mut queue = VecDeque::from([root]);
		let mut visited = HashSet::from([root]);

		while let Some(parent) = queue.pop_front() {
			for child in self.store.find_inherited(parent, None)? {
				if visited.insert(child.id) {
					self.pending_edges.push((parent, child.id));
					queue.push_back(child.id);
				}
			}
		}

		self.sync_dependencies()
	}

	fn propagate_level(&mut self, source: &ConfigObject, targets: &[OwnerId]) -> Result<Report> {
		let mut report = Report::new();
		let mut seen = HashSet::new();

		for &target in targets {
			if !seen.insert(target) {
				continue;
			}

			let owner = self.store.owner(target)?;
			report = report.merge(self.propagate_to(source, &owner)?);
		}

		Ok(report)
	}

	fn propagate_to(&mut self, source: &ConfigObject, target: &Owner) -> Result<Report> {
		let span = debug_span!("propagate_to", object = %source.id, owner = %target.name);
		let _guard = span.enter();

		let mut report = Report::new();
		let key = source.natural_key();

		if let Some(&(earlier, copy)) = self.delivered.get(&(target.id, key.clone())) {
			if earlier != source.id {
				warn!(key = %key, "Key already inherited from another template");
				report.rejected.push(Rejection {
					owner: target.id,
					source: source.id,
					reason: RejectReason::ForeignObjectConflict {
						key: key.to_string(),
						existing: copy,
					},
				});
			}
			return Ok(report);
		}

		let body = source.body.clone_for_owner(target);

		let bindings = match self.resolver.resolve(&*self.store, &body, target) {
			Ok(bindings) => bindings,
			Err(ResolveError::NoCompatibleBinding { role }) => {
				warn!(role = %role, "Skipping target without a compatible binding");
				report.rejected.push(Rejection {
					owner: target.id,
					source: source.id,
					reason: RejectReason::NoCompatibleBinding {
						role: role.name().to_string(),
						key: ResolveError::missing_key(&role),
					},
				});
				return Ok(report);
			}
			Err(ResolveError::Store(e)) => return Err(e.into()),
		};

		let matched = match_object(&*self.store, source, target.id)?;

		let child = match classify(matched, source) {
			Action::Create => {
				let child = ConfigObject {
					id: ObjectId::new(),
					owner_id: target.id,
					template_id: Some(source.id),
					origin: ObjectOrigin::Inherited,
					body,
					bindings,
				};
				self.store.write_object(child.clone())?;
				debug!(child = %child.id, "Created inherited copy");

				report.created.push(PropagatedCopy {
					owner: target.id,
					object: child.id,
					source: source.id,
				});
				child
			}
			Action::UpdateInPlace(existing) => {
				let refreshed = ConfigObject {
					id: existing.id,
					owner_id: target.id,
					template_id: Some(source.id),
					origin: ObjectOrigin::Inherited,
					body,
					bindings,
				};

				if refreshed != existing {
					self.store.update_object(existing.id, refreshed.clone())?;
					debug!(child = %existing.id, "Updated inherited copy");
				} else {
					trace!(child = %existing.id, "Inherited copy already up to date");
				}

				report.updated.push(PropagatedCopy {
					owner: target.id,
					object: refreshed.id,
					source: source.id,
				});
				refreshed
			}
			Action::Reject(reason) => {
				debug!(reason = %reason, "Rejected");
				report.rejected.push(Rejection {
					owner: target.id,
					source: source.id,
					reason,
				});
				return Ok(report);
			}
		};

		self.delivered.insert((target.id, key), (source.id, child.id));
		if child.kind().is_trigger() {
			self.pending_edges.push((source.id, child.id));
		}

		let linked = self.store.find_linked_owners(target.id)?;
		if !linked.is_empty() {
			report = report.merge(self.propagate_level(&child, &linked)?);
		}

		Ok(report)
	}

	/// Replaces the edges of every pending child with the ones derived from its parent
	fn sync_dependencies(&mut self) -> Result<Report> {
		let mut report = Report::new();

		for (parent_id, child_id) in std::mem::take(&mut self.pending_edges) {
			let parent = self.store.object(parent_id)?;
			let child = self.store.object(child_id)?;

			let derived = derive_child_edges(&*self.store, &parent, &child)?;
			let current = self.store.read_dependency_edges(&[child.id])?;

			let removed: Vec<DependencyEdge> = current
				.iter()
				.filter(|edge| !derived.edges.contains(edge))
				.copied()
				.collect();
			let added: Vec<DependencyEdge> = derived
				.edges
				.iter()
				.filter(|edge| !current.contains(edge))
				.copied()
				.collect();

			if !added.is_empty() {
				let topology = Topology::load(&*self.store, &added, &removed)?;
				dependency::validate(&topology, &added)?;
			}

			self.store.delete_dependency_edges(&removed)?;
			self.store.write_dependency_edges(&added)?;

			for dropped in &derived.dropped {
				warn!(
					owner = %dropped.owner,
					child = %dropped.down,
					up = %dropped.parent_edge.up,
					"Dropped dependency, the owner has no copy of the up trigger"
				);
			}

			trace!(
				child = %child.id,
				added = added.len(),
				removed = removed.len(),
				"Synchronized dependencies"
			);
			report.dropped_dependencies.extend(derived.dropped);
		}

		Ok(report)
	}
}
