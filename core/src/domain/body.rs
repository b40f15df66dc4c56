//! Per kind object payloads
//!
//! Each payload knows three things about itself: its natural key, the binding roles it needs on
//! whatever owner it lands on, and how to rewrite itself for a new owner. The propagator only ever
//! talks to these through [`Inheritable`].

use super::{BindingRole, ItemType, NaturalKey, Owner, ValueType};
use lineage_expression::Expression;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Capability every propagated payload implements
pub trait Inheritable {
	/// Owner independent identity used to match copies across owners
	fn natural_key(&self) -> NaturalKey;

	/// Host specific references the payload needs on its owner
	fn binding_roles(&self) -> Vec<BindingRole>;

	/// Copy of the payload as it must look once owned by `owner`
	fn clone_for_owner(&self, owner: &Owner) -> Self;
}

#[derive(
	Debug,
	Clone,
	Copy,
	Default,
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
pub enum Severity {
	#[default]
	NotClassified,
	Information,
	Warning,
	Average,
	High,
	Disaster,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerBody {
	pub description: String,
	pub expression: Expression,
	#[serde(default)]
	pub recovery_expression: Option<Expression>,
	#[serde(default)]
	pub priority: Severity,
	#[serde(default = "enabled_default")]
	pub enabled: bool,
	#[serde(default)]
	pub comments: String,
	#[serde(default)]
	pub manual_close: bool,
}

fn enabled_default() -> bool {
	true
}

impl TriggerBody {
	pub fn new(description: impl Into<String>, expression: Expression) -> Self {
		Self {
			description: description.into(),
			expression,
			recovery_expression: None,
			priority: Severity::default(),
			enabled: true,
			comments: String::new(),
			manual_close: false,
		}
	}

	/// Every item key referenced by the problem and recovery expressions
	pub fn item_keys(&self) -> Vec<String> {
		let mut keys = self.expression.keys();
		if let Some(recovery) = &self.recovery_expression {
			keys.extend(recovery.keys());
		}
		keys.into_iter().map(str::to_string).collect()
	}
}

impl Inheritable for TriggerBody {
	fn natural_key(&self) -> NaturalKey {
		NaturalKey::Trigger {
			description: self.description.clone(),
			expression: self.expression.normalized(),
		}
	}

	fn binding_roles(&self) -> Vec<BindingRole> {
		self.item_keys().into_iter().map(BindingRole::Item).collect()
	}

	fn clone_for_owner(&self, owner: &Owner) -> Self {
		Self {
			expression: self.expression.rebind(&owner.name),
			recovery_expression: self
				.recovery_expression
				.as_ref()
				.map(|recovery| recovery.rebind(&owner.name)),
			..self.clone()
		}
	}
}

#[derive(
	Debug,
	Clone,
	Copy,
	Default,
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
pub enum GraphType {
	#[default]
	Normal,
	Stacked,
	Pie,
	Exploded,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSide {
	#[default]
	Left,
	Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphItem {
	pub key: String,
	pub color: String,
	#[serde(default)]
	pub axis: AxisSide,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum AxisBound {
	#[default]
	Calculated,
	Fixed(f64),
	/// Last value of the item with this key
	Item(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphBody {
	pub name: String,
	#[serde(default)]
	pub graph_type: GraphType,
	pub width: u32,
	pub height: u32,
	pub items: Vec<GraphItem>,
	#[serde(default)]
	pub y_min: AxisBound,
	#[serde(default)]
	pub y_max: AxisBound,
}

impl GraphBody {
	pub fn new(name: impl Into<String>, items: Vec<GraphItem>) -> Self {
		Self {
			name: name.into(),
			graph_type: GraphType::Normal,
			width: 900,
			height: 200,
			items,
			y_min: AxisBound::Calculated,
			y_max: AxisBound::Calculated,
		}
	}
}

impl Inheritable for GraphBody {
	fn natural_key(&self) -> NaturalKey {
		NaturalKey::Graph(self.name.clone())
	}

	fn binding_roles(&self) -> Vec<BindingRole> {
		let mut roles: Vec<BindingRole> = Vec::with_capacity(self.items.len() + 2);

		for item in &self.items {
			let role = BindingRole::Item(item.key.clone());
			if !roles.contains(&role) {
				roles.push(role);
			}
		}

		if let AxisBound::Item(key) = &self.y_min {
			roles.push(BindingRole::AxisMin(key.clone()));
		}
		if let AxisBound::Item(key) = &self.y_max {
			roles.push(BindingRole::AxisMax(key.clone()));
		}

		roles
	}

	fn clone_for_owner(&self, _owner: &Owner) -> Self {
		// Graph items are addressed by key, bindings carry the per owner ids
		self.clone()
	}
}

/// A plain item, the record triggers and graphs read their values from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemBody {
	pub key: String,
	pub name: String,
	pub item_type: ItemType,
	pub value_type: ValueType,
	pub delay: String,
	#[serde(default)]
	pub units: String,
	/// How long history is kept
	pub history: String,
}

impl ItemBody {
	pub fn new(key: impl Into<String>, name: impl Into<String>, item_type: ItemType) -> Self {
		Self {
			key: key.into(),
			name: name.into(),
			item_type,
			value_type: ValueType::Float,
			delay: "1m".to_string(),
			units: String::new(),
			history: "90d".to_string(),
		}
	}
}

impl Inheritable for ItemBody {
	fn natural_key(&self) -> NaturalKey {
		NaturalKey::Item(self.key.clone())
	}

	fn binding_roles(&self) -> Vec<BindingRole> {
		self.item_type
			.interface_requirement()
			.map(BindingRole::Interface)
			.into_iter()
			.collect()
	}

	fn clone_for_owner(&self, _owner: &Owner) -> Self {
		self.clone()
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryRuleBody {
	pub key: String,
	pub name: String,
	pub item_type: ItemType,
	pub delay: String,
	/// How long undiscovered entities are kept
	pub lifetime: String,
}

impl DiscoveryRuleBody {
	pub fn new(key: impl Into<String>, name: impl Into<String>, item_type: ItemType) -> Self {
		Self {
			key: key.into(),
			name: name.into(),
			item_type,
			delay: "1h".to_string(),
			lifetime: "30d".to_string(),
		}
	}
}

impl Inheritable for DiscoveryRuleBody {
	fn natural_key(&self) -> NaturalKey {
		NaturalKey::Item(self.key.clone())
	}

	fn binding_roles(&self) -> Vec<BindingRole> {
		self.item_type
			.interface_requirement()
			.map(BindingRole::Interface)
			.into_iter()
			.collect()
	}

	fn clone_for_owner(&self, _owner: &Owner) -> Self {
		self.clone()
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPrototypeBody {
	pub key: String,
	pub name: String,
	pub item_type: ItemType,
	pub value_type: ValueType,
	pub delay: String,
	/// Key of the discovery rule on the same owner
	pub rule_key: String,
}

impl ItemPrototypeBody {
	pub fn new(
		key: impl Into<String>,
		name: impl Into<String>,
		item_type: ItemType,
		rule_key: impl Into<String>,
	) -> Self {
		Self {
			key: key.into(),
			name: name.into(),
			item_type,
			value_type: ValueType::Float,
			delay: "1m".to_string(),
			rule_key: rule_key.into(),
		}
	}
}

impl Inheritable for ItemPrototypeBody {
	fn natural_key(&self) -> NaturalKey {
		NaturalKey::Item(self.key.clone())
	}

	fn binding_roles(&self) -> Vec<BindingRole> {
		let mut roles = vec![BindingRole::ParentRule(self.rule_key.clone())];
		roles.extend(
			self.item_type
				.interface_requirement()
				.map(BindingRole::Interface),
		);
		roles
	}

	fn clone_for_owner(&self, _owner: &Owner) -> Self {
		self.clone()
	}
}

/// Host created by a discovery rule for every entity it finds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPrototypeBody {
	/// Technical name pattern, carries low-level discovery macros
	pub host: String,
	pub name: String,
	/// Key of the discovery rule on the same owner
	pub rule_key: String,
	#[serde(default = "enabled_default")]
	pub enabled: bool,
	/// Templates every discovered host gets linked to
	#[serde(default)]
	pub templates: Vec<String>,
}

impl HostPrototypeBody {
	pub fn new(host: impl Into<String>, rule_key: impl Into<String>) -> Self {
		let host = host.into();
		Self {
			name: host.clone(),
			host,
			rule_key: rule_key.into(),
			enabled: true,
			templates: Vec::new(),
		}
	}
}

impl Inheritable for HostPrototypeBody {
	fn natural_key(&self) -> NaturalKey {
		NaturalKey::HostPrototype {
			rule: self.rule_key.clone(),
			host: self.host.clone(),
		}
	}

	fn binding_roles(&self) -> Vec<BindingRole> {
		vec![BindingRole::ParentRule(self.rule_key.clone())]
	}

	fn clone_for_owner(&self, _owner: &Owner) -> Self {
		self.clone()
	}
}
