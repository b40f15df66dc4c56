use crate::domain::{Report, TemplateLink};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTemplatesOutput {
	/// Links that did not exist before
	pub linked: Vec<TemplateLink>,

	pub report: Report,
}
