//! Item types and host interfaces
//!
//! Interfaces are not propagated by the engine. They belong to hosts and exist so that inherited
//! items and discovery rules have something on their new owner to poll through.

use super::{InterfaceId, OwnerId};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

#[derive(
	Debug,
	Clone,
	Copy,
	PartialEq,
	Eq,
	PartialOrd,
	Ord,
	Hash,
	Serialize,
	Deserialize,
	Display,
	EnumString,
	AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InterfaceType {
	Agent,
	Snmp,
	Ipmi,
	Jmx,
}

impl InterfaceType {
	/// Order tried for items that can poll through any interface
	pub const DEFAULT_PRIORITY: [InterfaceType; 4] = [
		InterfaceType::Agent,
		InterfaceType::Snmp,
		InterfaceType::Jmx,
		InterfaceType::Ipmi,
	];
}

/// What kind of interface an item type polls through
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "interface")]
pub enum InterfaceRequirement {
	Exact(InterfaceType),
	Any,
}

#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ItemType {
	Agent,
	AgentActive,
	Snmp,
	Ipmi,
	Jmx,
	Simple,
	External,
	Trapper,
	Calculated,
	Dependent,
	Internal,
	HttpAgent,
}

impl ItemType {
	/// `None` when the item is not polled through a host interface at all
	pub fn interface_requirement(&self) -> Option<InterfaceRequirement> {
		match self {
			Self::Agent => Some(InterfaceRequirement::Exact(InterfaceType::Agent)),
			Self::Snmp => Some(InterfaceRequirement::Exact(InterfaceType::Snmp)),
			Self::Ipmi => Some(InterfaceRequirement::Exact(InterfaceType::Ipmi)),
			Self::Jmx => Some(InterfaceRequirement::Exact(InterfaceType::Jmx)),
			Self::Simple | Self::External => Some(InterfaceRequirement::Any),
			Self::AgentActive
			| Self::Trapper
			| Self::Calculated
			| Self::Dependent
			| Self::Internal
			| Self::HttpAgent => None,
		}
	}
}

#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ValueType {
	Float,
	Unsigned,
	Character,
	Log,
	Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
	pub id: InterfaceId,
	pub owner_id: OwnerId,
	pub interface_type: InterfaceType,
	/// Only the main interface of each type is used for binding
	pub main: bool,
}

impl Interface {
	pub fn main(owner_id: OwnerId, interface_type: InterfaceType) -> Self {
		Self {
			id: InterfaceId::new(),
			owner_id,
			interface_type,
			main: true,
		}
	}
}
