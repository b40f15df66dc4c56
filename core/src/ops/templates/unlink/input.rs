use crate::domain::OwnerId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlinkTemplatesInput {
	pub owners: Vec<OwnerId>,
	pub templates: Vec<OwnerId>,

	/// Delete inherited objects instead of keeping them as originals
	#[serde(default)]
	pub clear: bool,
}

impl UnlinkTemplatesInput {
	pub fn new(
		owners: impl IntoIterator<Item = OwnerId>,
		templates: impl IntoIterator<Item = OwnerId>,
	) -> Self {
		Self {
			owners: owners.into_iter().collect(),
			templates: templates.into_iter().collect(),
			clear: false,
		}
	}

	pub fn with_clear(mut self, clear: bool) -> Self {
		self.clear = clear;
		self
	}
}
