//! Domain model of the configuration hierarchy
//!
//! - Owners (hosts and templates) linked to parent templates
//! - Host interfaces, the records items and rules poll through
//! - Configuration objects with per kind payloads, items included, propagated down template links
//! - Trigger dependency edges
//! - The report a propagation returns

pub mod binding;
pub mod body;
pub mod dependency;
pub mod ids;
pub mod item;
pub mod object;
pub mod owner;
pub mod report;

pub use binding::{Binding, BindingRole, BindingTarget};
pub use body::{
	AxisBound, AxisSide, DiscoveryRuleBody, GraphBody, GraphItem, GraphType, HostPrototypeBody,
	Inheritable, ItemBody, ItemPrototypeBody, Severity, TriggerBody,
};
pub use dependency::DependencyEdge;
pub use ids::{InterfaceId, ObjectId, OwnerId};
pub use item::{Interface, InterfaceRequirement, InterfaceType, ItemType, ValueType};
pub use object::{ConfigObject, KeyNamespace, NaturalKey, ObjectBody, ObjectKind, ObjectOrigin, Variant};
pub use owner::{Owner, OwnerKind, TemplateLink};
pub use report::{DroppedDependency, PropagatedCopy, RejectReason, Rejection, Report};
