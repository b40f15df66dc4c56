//! Propagation outcome
//!
//! Every level of the recursion returns its own [`Report`]; callers fold them together with
//! [`Report::merge`]. Nothing is accumulated in shared state.

use super::{DependencyEdge, ObjectId, OwnerId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A child copy written (or confirmed up to date) on an owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagatedCopy {
	pub owner: OwnerId,
	pub object: ObjectId,
	/// Object the copy was derived from
	pub source: ObjectId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum RejectReason {
	/// The owner has nothing to satisfy one of the object's binding roles
	NoCompatibleBinding { role: String, key: String },
	/// The tracked child is of a different kind or graph type
	TypeMismatch { key: String },
	/// The key is taken by an object not inherited from this source
	ForeignObjectConflict { key: String, existing: ObjectId },
}

impl fmt::Display for RejectReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::NoCompatibleBinding { role, key } => {
				write!(f, "no compatible {role} for \"{key}\"")
			}
			Self::TypeMismatch { key } => {
				write!(f, "\"{key}\" already exists with a different type")
			}
			Self::ForeignObjectConflict { key, .. } => write!(
				f,
				"\"{key}\" already exists and is not inherited from this template"
			),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
	pub owner: OwnerId,
	pub source: ObjectId,
	pub reason: RejectReason,
}

/// An inherited edge that had no counterpart on the child's owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedDependency {
	pub owner: OwnerId,
	/// The child trigger that would have been the down side
	pub down: ObjectId,
	/// The parent edge the child edge would have been derived from
	pub parent_edge: DependencyEdge,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
	pub created: Vec<PropagatedCopy>,
	pub updated: Vec<PropagatedCopy>,
	pub rejected: Vec<Rejection>,
	pub dropped_dependencies: Vec<DroppedDependency>,
}

impl Report {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends `other` after the entries of `self`
	#[must_use]
	pub fn merge(mut self, other: Report) -> Self {
		self.created.extend(other.created);
		self.updated.extend(other.updated);
		self.rejected.extend(other.rejected);
		self.dropped_dependencies.extend(other.dropped_dependencies);
		self
	}

	pub fn is_empty(&self) -> bool {
		self.created.is_empty()
			&& self.updated.is_empty()
			&& self.rejected.is_empty()
			&& self.dropped_dependencies.is_empty()
	}

	pub fn created_owners(&self) -> Vec<OwnerId> {
		self.created.iter().map(|copy| copy.owner).collect()
	}

	pub fn updated_owners(&self) -> Vec<OwnerId> {
		self.updated.iter().map(|copy| copy.owner).collect()
	}

	pub fn rejected_owners(&self) -> Vec<OwnerId> {
		self.rejected.iter().map(|rejection| rejection.owner).collect()
	}

	/// Copy (created or updated) of `source` on `owner`, if any
	pub fn copy_on(&self, owner: OwnerId, source: ObjectId) -> Option<ObjectId> {
		self.created
			.iter()
			.chain(&self.updated)
			.find(|copy| copy.owner == owner && copy.source == source)
			.map(|copy| copy.object)
	}
}
