use crate::domain::OwnerId;
use serde::{Deserialize, Serialize};

/// Links every owner to every template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkTemplatesInput {
	pub owners: Vec<OwnerId>,
	pub templates: Vec<OwnerId>,
}

impl LinkTemplatesInput {
	pub fn new(
		owners: impl IntoIterator<Item = OwnerId>,
		templates: impl IntoIterator<Item = OwnerId>,
	) -> Self {
		Self {
			owners: owners.into_iter().collect(),
			templates: templates.into_iter().collect(),
		}
	}

	/// Validate the input
	pub fn validate(&self) -> Result<(), String> {
		if self.owners.is_empty() || self.templates.is_empty() {
			return Err("at least one owner and one template are required".to_string());
		}
		if self.owners.iter().any(|owner| self.templates.contains(owner)) {
			return Err("a template cannot be linked to itself".to_string());
		}
		Ok(())
	}
}
