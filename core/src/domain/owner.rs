//! Hosts, templates and the links between them

use super::OwnerId;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OwnerKind {
	/// A concrete monitored entity
	Host,
	/// A reusable container of object definitions
	Template,
}

/// Anything that can own configuration objects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
	pub id: OwnerId,
	/// Technical name, the one trigger expressions reference
	pub name: String,
	pub kind: OwnerKind,
}

impl Owner {
	pub fn host(name: impl Into<String>) -> Self {
		Self {
			id: OwnerId::new(),
			name: name.into(),
			kind: OwnerKind::Host,
		}
	}

	pub fn template(name: impl Into<String>) -> Self {
		Self {
			id: OwnerId::new(),
			name: name.into(),
			kind: OwnerKind::Template,
		}
	}

	pub fn is_template(&self) -> bool {
		self.kind == OwnerKind::Template
	}
}

/// `child` (host or template) is linked to the template `parent`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TemplateLink {
	pub child: OwnerId,
	pub parent: OwnerId,
}

impl TemplateLink {
	pub fn new(child: OwnerId, parent: OwnerId) -> Self {
		Self { child, parent }
	}
}
