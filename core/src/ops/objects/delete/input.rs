use crate::domain::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteObjectInput {
	pub object: ObjectId,
}

impl DeleteObjectInput {
	pub fn new(object: ObjectId) -> Self {
		Self { object }
	}
}
