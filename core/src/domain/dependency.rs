use super::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `down` is suppressed while `up` is in problem state
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
	pub down: ObjectId,
	pub up: ObjectId,
}

impl DependencyEdge {
	pub fn new(down: ObjectId, up: ObjectId) -> Self {
		Self { down, up }
	}
}

impl fmt::Display for DependencyEdge {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} -> {}", self.down, self.up)
	}
}
