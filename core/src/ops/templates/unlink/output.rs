use crate::domain::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlinkTemplatesOutput {
	/// Inherited objects that became originals of their owner
	pub detached: Vec<ObjectId>,

	/// Inherited objects removed along with their descendants
	pub deleted: Vec<ObjectId>,
}
