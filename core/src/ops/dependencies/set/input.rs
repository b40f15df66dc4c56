use crate::domain::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetDependenciesInput {
	/// The down trigger
	pub trigger: ObjectId,

	/// Complete new set of up triggers, empty clears every dependency
	pub ups: Vec<ObjectId>,
}

impl SetDependenciesInput {
	pub fn new(trigger: ObjectId, ups: impl IntoIterator<Item = ObjectId>) -> Self {
		Self {
			trigger,
			ups: ups.into_iter().collect(),
		}
	}
}
