use crate::domain::{ObjectId, Report};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateObjectOutput {
	pub object: ObjectId,
	pub report: Report,
}
