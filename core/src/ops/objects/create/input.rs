//! Input types for object creation

use crate::domain::{ObjectBody, ObjectId, OwnerId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateObjectInput {
	/// Host or template the object is authored on
	pub owner: OwnerId,

	pub body: ObjectBody,

	/// Up triggers the new trigger depends on
	#[serde(default)]
	pub dependencies: Vec<ObjectId>,
}

impl CreateObjectInput {
	pub fn new(owner: OwnerId, body: ObjectBody) -> Self {
		Self {
			owner,
			body,
			dependencies: Vec::new(),
		}
	}

	pub fn with_dependencies(mut self, dependencies: impl IntoIterator<Item = ObjectId>) -> Self {
		self.dependencies = dependencies.into_iter().collect();
		self
	}

	/// Validate the input
	pub fn validate(&self) -> Result<(), String> {
		if !self.dependencies.is_empty() && !self.body.kind().is_trigger() {
			return Err(format!("a {} cannot have dependencies", self.body.kind()));
		}
		Ok(())
	}
}
