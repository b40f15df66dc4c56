//! Host specific references carried by configuration objects
//!
//! A binding pairs a role (what the object needs) with the concrete record on the object's owner
//! that satisfies it. Roles travel with the object when it is copied; targets never do, they are
//! looked up again on every new owner.

use super::{InterfaceId, InterfaceRequirement, ObjectId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "role", content = "key")]
pub enum BindingRole {
	/// Polling interface, for items, rules and prototypes of interface-bound item types
	Interface(InterfaceRequirement),
	/// Item (or item prototype) referenced by a trigger expression or drawn on a graph
	Item(String),
	/// Item whose last value is the graph's y-axis minimum
	AxisMin(String),
	/// Item whose last value is the graph's y-axis maximum
	AxisMax(String),
	/// Discovery rule an item or host prototype hangs off
	ParentRule(String),
}

impl BindingRole {
	/// Item key the role refers to, if any
	pub fn key(&self) -> Option<&str> {
		match self {
			Self::Interface(_) => None,
			Self::Item(key) | Self::AxisMin(key) | Self::AxisMax(key) | Self::ParentRule(key) => {
				Some(key)
			}
		}
	}

	/// Structural roles are resolved on every owner, templates included
	pub fn is_structural(&self) -> bool {
		matches!(self, Self::ParentRule(_))
	}

	pub fn name(&self) -> &'static str {
		match self {
			Self::Interface(_) => "interface",
			Self::Item(_) => "item",
			Self::AxisMin(_) => "y_min_item",
			Self::AxisMax(_) => "y_max_item",
			Self::ParentRule(_) => "discovery_rule",
		}
	}
}

impl fmt::Display for BindingRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Interface(InterfaceRequirement::Exact(interface_type)) => {
				write!(f, "interface({interface_type})")
			}
			Self::Interface(InterfaceRequirement::Any) => write!(f, "interface(any)"),
			_ => write!(f, "{}({})", self.name(), self.key().unwrap_or_default()),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "id")]
pub enum BindingTarget {
	Interface(InterfaceId),
	/// Item, item prototype or discovery rule on the same owner
	Object(ObjectId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
	pub role: BindingRole,
	/// `None` on templates for host specific roles
	pub target: Option<BindingTarget>,
}

impl Binding {
	pub fn marker(role: BindingRole) -> Self {
		Self { role, target: None }
	}

	pub fn resolved(role: BindingRole, target: BindingTarget) -> Self {
		Self {
			role,
			target: Some(target),
		}
	}
}
