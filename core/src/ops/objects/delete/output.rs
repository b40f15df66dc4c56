use crate::domain::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteObjectOutput {
	/// The object itself first, then its descendants and dependents
	pub deleted: Vec<ObjectId>,
}
