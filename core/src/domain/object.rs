//! Propagated configuration objects

use super::{
	Binding, BindingRole, DiscoveryRuleBody, GraphBody, GraphType, HostPrototypeBody, Inheritable,
	ItemBody, ItemPrototypeBody, ObjectId, Owner, OwnerId, TriggerBody,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{AsRefStr, Display, EnumIter, EnumString};

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
	EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ObjectKind {
	Item,
	DiscoveryRule,
	ItemPrototype,
	HostPrototype,
	Trigger,
	TriggerPrototype,
	Graph,
	GraphPrototype,
}

impl ObjectKind {
	pub fn namespace(&self) -> KeyNamespace {
		match self {
			Self::Item | Self::DiscoveryRule | Self::ItemPrototype => KeyNamespace::Item,
			Self::HostPrototype => KeyNamespace::HostPrototype,
			Self::Trigger | Self::TriggerPrototype => KeyNamespace::Trigger,
			Self::Graph | Self::GraphPrototype => KeyNamespace::Graph,
		}
	}

	/// Kinds whose objects must already exist on an owner before objects of this kind can bind
	pub fn depends_on(&self) -> &'static [ObjectKind] {
		match self {
			Self::Item | Self::DiscoveryRule => &[],
			Self::ItemPrototype | Self::HostPrototype => &[Self::DiscoveryRule],
			Self::Trigger | Self::Graph => &[Self::Item],
			Self::TriggerPrototype | Self::GraphPrototype => &[Self::Item, Self::ItemPrototype],
		}
	}

	/// Only triggers take part in dependency edges
	pub fn is_trigger(&self) -> bool {
		matches!(self, Self::Trigger | Self::TriggerPrototype)
	}
}

/// Objects sharing a namespace collide on equal keys, whatever their kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum KeyNamespace {
	Item,
	HostPrototype,
	Trigger,
	Graph,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NaturalKey {
	Item(String),
	/// Host name pattern, unique per discovery rule
	HostPrototype {
		rule: String,
		host: String,
	},
	Trigger {
		description: String,
		/// Expression with every owner reference normalized away
		expression: String,
	},
	Graph(String),
}

impl NaturalKey {
	pub fn namespace(&self) -> KeyNamespace {
		match self {
			Self::Item(_) => KeyNamespace::Item,
			Self::HostPrototype { .. } => KeyNamespace::HostPrototype,
			Self::Trigger { .. } => KeyNamespace::Trigger,
			Self::Graph(_) => KeyNamespace::Graph,
		}
	}
}

impl fmt::Display for NaturalKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Item(key) => f.write_str(key),
			Self::HostPrototype { rule, host } => write!(f, "{host} ({rule})"),
			Self::Trigger {
				description,
				expression,
			} => write!(f, "{description} [{expression}]"),
			Self::Graph(name) => f.write_str(name),
		}
	}
}

/// Kind plus the flags that make two objects with the same key incompatible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variant {
	pub kind: ObjectKind,
	pub graph_type: Option<GraphType>,
}

impl fmt::Display for Variant {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.graph_type {
			Some(graph_type) => write!(f, "{} ({})", self.kind, graph_type),
			None => write!(f, "{}", self.kind),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ObjectOrigin {
	/// Authored on its owner
	Original,
	/// Propagated from a template object
	Inherited,
	/// Created by low-level discovery from a prototype
	Discovered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ObjectBody {
	Item(ItemBody),
	DiscoveryRule(DiscoveryRuleBody),
	ItemPrototype(ItemPrototypeBody),
	HostPrototype(HostPrototypeBody),
	Trigger(TriggerBody),
	TriggerPrototype(TriggerBody),
	Graph(GraphBody),
	GraphPrototype(GraphBody),
}

impl ObjectBody {
	pub fn kind(&self) -> ObjectKind {
		match self {
			Self::Item(_) => ObjectKind::Item,
			Self::DiscoveryRule(_) => ObjectKind::DiscoveryRule,
			Self::ItemPrototype(_) => ObjectKind::ItemPrototype,
			Self::HostPrototype(_) => ObjectKind::HostPrototype,
			Self::Trigger(_) => ObjectKind::Trigger,
			Self::TriggerPrototype(_) => ObjectKind::TriggerPrototype,
			Self::Graph(_) => ObjectKind::Graph,
			Self::GraphPrototype(_) => ObjectKind::GraphPrototype,
		}
	}

	pub fn variant(&self) -> Variant {
		let graph_type = match self {
			Self::Graph(graph) | Self::GraphPrototype(graph) => Some(graph.graph_type),
			_ => None,
		};

		Variant {
			kind: self.kind(),
			graph_type,
		}
	}

	pub fn trigger(&self) -> Option<&TriggerBody> {
		match self {
			Self::Trigger(trigger) | Self::TriggerPrototype(trigger) => Some(trigger),
			_ => None,
		}
	}
}

impl Inheritable for ObjectBody {
	fn natural_key(&self) -> NaturalKey {
		match self {
			Self::Item(item) => item.natural_key(),
			Self::DiscoveryRule(rule) => rule.natural_key(),
			Self::ItemPrototype(prototype) => prototype.natural_key(),
			Self::HostPrototype(prototype) => prototype.natural_key(),
			Self::Trigger(trigger) | Self::TriggerPrototype(trigger) => trigger.natural_key(),
			Self::Graph(graph) | Self::GraphPrototype(graph) => graph.natural_key(),
		}
	}

	fn binding_roles(&self) -> Vec<BindingRole> {
		match self {
			Self::Item(item) => item.binding_roles(),
			Self::DiscoveryRule(rule) => rule.binding_roles(),
			Self::ItemPrototype(prototype) => prototype.binding_roles(),
			Self::HostPrototype(prototype) => prototype.binding_roles(),
			Self::Trigger(trigger) | Self::TriggerPrototype(trigger) => trigger.binding_roles(),
			Self::Graph(graph) | Self::GraphPrototype(graph) => graph.binding_roles(),
		}
	}

	fn clone_for_owner(&self, owner: &Owner) -> Self {
		match self {
			Self::Item(item) => Self::Item(item.clone_for_owner(owner)),
			Self::DiscoveryRule(rule) => Self::DiscoveryRule(rule.clone_for_owner(owner)),
			Self::ItemPrototype(prototype) => {
				Self::ItemPrototype(prototype.clone_for_owner(owner))
			}
			Self::HostPrototype(prototype) => {
				Self::HostPrototype(prototype.clone_for_owner(owner))
			}
			Self::Trigger(trigger) => Self::Trigger(trigger.clone_for_owner(owner)),
			Self::TriggerPrototype(trigger) => {
				Self::TriggerPrototype(trigger.clone_for_owner(owner))
			}
			Self::Graph(graph) => Self::Graph(graph.clone_for_owner(owner)),
			Self::GraphPrototype(graph) => Self::GraphPrototype(graph.clone_for_owner(owner)),
		}
	}
}

/// An item, discovery rule, prototype, trigger or graph owned by a host or template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigObject {
	pub id: ObjectId,
	pub owner_id: OwnerId,
	/// Object this one was inherited from, `None` for originals
	#[serde(default)]
	pub template_id: Option<ObjectId>,
	pub origin: ObjectOrigin,
	pub body: ObjectBody,
	#[serde(default)]
	pub bindings: Vec<Binding>,
}

impl ConfigObject {
	/// A fresh, unbound object authored on `owner_id`
	pub fn original(owner_id: OwnerId, body: ObjectBody) -> Self {
		Self {
			id: ObjectId::new(),
			owner_id,
			template_id: None,
			origin: ObjectOrigin::Original,
			body,
			bindings: Vec::new(),
		}
	}

	/// A fresh child of `source` owned by `owner`
	pub fn inherited_from(source: &ConfigObject, owner: &Owner, bindings: Vec<Binding>) -> Self {
		Self {
			id: ObjectId::new(),
			owner_id: owner.id,
			template_id: Some(source.id),
			origin: ObjectOrigin::Inherited,
			body: source.body.clone_for_owner(owner),
			bindings,
		}
	}

	pub fn kind(&self) -> ObjectKind {
		self.body.kind()
	}

	pub fn variant(&self) -> Variant {
		self.body.variant()
	}

	pub fn natural_key(&self) -> NaturalKey {
		self.body.natural_key()
	}

	pub fn is_inherited(&self) -> bool {
		self.template_id.is_some()
	}

	pub fn binding(&self, role: &BindingRole) -> Option<&Binding> {
		self.bindings.iter().find(|binding| &binding.role == role)
	}
}
