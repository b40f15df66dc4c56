//! Object creation output

use crate::domain::{ObjectId, Report};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateObjectOutput {
	pub object: ObjectId,

	/// What propagating the new object to linked owners did
	pub report: Report,
}
