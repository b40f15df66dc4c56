//! Trigger dependency validation
//!
//! Checks a batch of proposed `down -> up` edges against the stored ones. Rules run in this
//! order and the first violation wins:
//!
//! 1. kinds: both ends are triggers, a trigger never depends on a prototype
//! 2. self dependency
//! 3. cycles over stored plus proposed edges
//! 4. template boundaries (host on template, parent template, child owner, linkage)
//! 5. lineage: no dependency between a trigger and its own template ancestry
//! 6. duplicates, against storage and within the batch
//!
//! Edges declared by a caller and edges derived for propagated copies go through every rule.
//! The stored edges of a source about to be re-propagated only go through the structural ones
//! (kinds, self, cycles, lineage); their boundaries were checked when they were declared.

pub mod derive;
pub mod topology;

pub use derive::{derive_child_edges, find_copy_on, DerivedEdges};
pub use topology::{Topology, TriggerInfo};

use crate::domain::{DependencyEdge, ObjectId, ObjectKind, OwnerId, OwnerKind};
use std::collections::{HashMap, HashSet, VecDeque};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DependencyViolation {
	#[error("object {0} is not a trigger")]
	NotATrigger(ObjectId),

	#[error("trigger {down} cannot depend on trigger prototype {up}")]
	PrototypeDependency { down: ObjectId, up: ObjectId },

	#[error("trigger {trigger} cannot depend on itself")]
	SelfDependency { trigger: ObjectId },

	#[error("circular dependency: {}", format_path(.path))]
	CircularDependency { path: Vec<ObjectId> },

	#[error("host trigger {down} cannot depend on template trigger {up}")]
	HostDependsOnTemplate { down: ObjectId, up: ObjectId },

	#[error("trigger {down} cannot depend on trigger {up} from a parent template")]
	DependencyOnParentTemplate { down: ObjectId, up: ObjectId },

	#[error("trigger {down} cannot depend on trigger {up} from a linked host or template")]
	DependencyOnChildOwner { down: ObjectId, up: ObjectId },

	#[error("trigger {down} depends on trigger {up} whose template is not linked to {owner}")]
	TemplateLinkageMismatch {
		down: ObjectId,
		up: ObjectId,
		owner: OwnerId,
	},

	#[error("trigger {down} cannot depend on trigger {up} from its own inheritance chain")]
	InheritedParent { down: ObjectId, up: ObjectId },

	#[error("dependency {down} -> {up} already exists")]
	DuplicateDependency { down: ObjectId, up: ObjectId },
}

fn format_path(path: &[ObjectId]) -> String {
	path.iter()
		.map(ToString::to_string)
		.collect::<Vec<_>>()
		.join(" -> ")
}

/// Runs every rule
pub fn validate(topology: &Topology, proposed: &[DependencyEdge]) -> Result<(), DependencyViolation> {
	check_kinds(topology, proposed)?;
	check_self(proposed)?;
	check_cycles(topology, proposed)?;
	check_boundaries(topology, proposed)?;
	check_lineage(topology, proposed)?;
	check_duplicates(topology, proposed)
}

/// Runs the rules that hold whatever the owners are linked to
pub fn validate_structure(
	topology: &Topology,
	proposed: &[DependencyEdge],
) -> Result<(), DependencyViolation> {
	check_kinds(topology, proposed)?;
	check_self(proposed)?;
	check_cycles(topology, proposed)?;
	check_lineage(topology, proposed)
}

fn endpoints<'a>(
	topology: &'a Topology,
	edge: &DependencyEdge,
) -> Result<(&'a TriggerInfo, &'a TriggerInfo), DependencyViolation> {
	let down = topology
		.trigger(edge.down)
		.ok_or(DependencyViolation::NotATrigger(edge.down))?;
	let up = topology
		.trigger(edge.up)
		.ok_or(DependencyViolation::NotATrigger(edge.up))?;
	Ok((down, up))
}

fn check_kinds(topology: &Topology, proposed: &[DependencyEdge]) -> Result<(), DependencyViolation> {
	for edge in proposed {
		let (down, up) = endpoints(topology, edge)?;

		for info in [down, up] {
			if !info.kind.is_trigger() {
				return Err(DependencyViolation::NotATrigger(info.id));
			}
		}

		if down.kind == ObjectKind::Trigger && up.kind == ObjectKind::TriggerPrototype {
			return Err(DependencyViolation::PrototypeDependency {
				down: edge.down,
				up: edge.up,
			});
		}
	}

	Ok(())
}

fn check_self(proposed: &[DependencyEdge]) -> Result<(), DependencyViolation> {
	match proposed.iter().find(|edge| edge.down == edge.up) {
		Some(edge) => Err(DependencyViolation::SelfDependency { trigger: edge.down }),
		None => Ok(()),
	}
}

fn check_cycles(topology: &Topology, proposed: &[DependencyEdge]) -> Result<(), DependencyViolation> {
	let mut ups: HashMap<ObjectId, Vec<ObjectId>> = HashMap::new();
	for edge in topology.existing().iter().chain(proposed) {
		ups.entry(edge.down).or_default().push(edge.up);
	}

	for edge in proposed {
		if let Some(path) = path_between(&ups, edge.up, edge.down) {
			let mut cycle = Vec::with_capacity(path.len() + 1);
			cycle.push(edge.down);
			cycle.extend(path);
			return Err(DependencyViolation::CircularDependency { path: cycle });
		}
	}

	Ok(())
}

/// Shortest `from -> ... -> to` path following up-edges, both ends included
fn path_between(
	ups: &HashMap<ObjectId, Vec<ObjectId>>,
	from: ObjectId,
	to: ObjectId,
) -> Option<Vec<ObjectId>> {
	let mut previous: HashMap<ObjectId, ObjectId> = HashMap::new();
	let mut visited = HashSet::from([from]);
	let mut queue = VecDeque::from([from]);

	while let Some(node) = queue.pop_front() {
		if node == to {
			let mut path = vec![to];
			let mut current = to;
			while let Some(&before) = previous.get(&current) {
				path.push(before);
				current = before;
			}
			path.reverse();
			return Some(path);
		}

		for &next in ups.get(&node).into_iter().flatten() {
			if visited.insert(next) {
				previous.insert(next, node);
				queue.push_back(next);
			}
		}
	}

	None
}

fn check_boundaries(
	topology: &Topology,
	proposed: &[DependencyEdge],
) -> Result<(), DependencyViolation> {
	for edge in proposed {
		let (down, up) = endpoints(topology, edge)?;
		let (down_id, up_id) = (edge.down, edge.up);

		match (down.owner_kind, up.owner_kind) {
			(OwnerKind::Host, OwnerKind::Template) => {
				return Err(DependencyViolation::HostDependsOnTemplate {
					down: down_id,
					up: up_id,
				});
			}
			(OwnerKind::Host, OwnerKind::Host) => {}
			(OwnerKind::Template, _) if down.owner == up.owner => {}
			(OwnerKind::Template, up_kind) => {
				if topology.is_descendant(down.owner, up.owner) {
					return Err(DependencyViolation::DependencyOnChildOwner {
						down: down_id,
						up: up_id,
					});
				}

				if up_kind == OwnerKind::Template {
					if topology.is_ancestor(down.owner, up.owner) {
						return Err(DependencyViolation::DependencyOnParentTemplate {
							down: down_id,
							up: up_id,
						});
					}

					// Every owner receiving the down trigger must also receive the up trigger
					for &owner in topology.children(down.owner) {
						if !topology.is_ancestor(owner, up.owner) {
							return Err(DependencyViolation::TemplateLinkageMismatch {
								down: down_id,
								up: up_id,
								owner,
							});
						}
					}
				}
			}
		}
	}

	Ok(())
}

fn check_lineage(topology: &Topology, proposed: &[DependencyEdge]) -> Result<(), DependencyViolation> {
	for edge in proposed {
		let (down, up) = endpoints(topology, edge)?;

		if down.lineage.contains(&edge.up) || up.lineage.contains(&edge.down) {
			return Err(DependencyViolation::InheritedParent {
				down: edge.down,
				up: edge.up,
			});
		}
	}

	Ok(())
}

fn check_duplicates(
	topology: &Topology,
	proposed: &[DependencyEdge],
) -> Result<(), DependencyViolation> {
	let mut batch = HashSet::new();

	for edge in proposed {
		if topology.existing().contains(edge) || !batch.insert(*edge) {
			return Err(DependencyViolation::DuplicateDependency {
				down: edge.down,
				up: edge.up,
			});
		}
	}

	Ok(())
}
