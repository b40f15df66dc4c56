use crate::domain::{ObjectBody, ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateObjectInput {
	pub object: ObjectId,

	/// Replacement body, of the same kind as the stored one
	pub body: ObjectBody,
}

impl UpdateObjectInput {
	pub fn new(object: ObjectId, body: ObjectBody) -> Self {
		Self { object, body }
	}
}
