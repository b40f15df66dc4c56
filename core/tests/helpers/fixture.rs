//! Store fixture shared by the integration tests
//!
//! Builds small host/template hierarchies directly in an [`InMemoryStore`] and runs engine calls
//! and actions as a super admin.

#![allow(dead_code)]

use lineage_core::{
	domain::{
		AxisSide, ConfigObject, DependencyEdge, GraphBody, GraphItem, InterfaceType, ItemType,
		ObjectBody, ObjectId, ObjectKind, OwnerId, Report, TriggerBody,
	},
	ActionManager, CallerContext, ConfigStore, EngineAction, EngineConfig, InMemoryStore,
	InheritanceEngine,
};
use lineage_expression::Expression;

pub struct Fixture {
	pub store: InMemoryStore,
	pub manager: ActionManager,
	pub ctx: CallerContext,
}

impl Default for Fixture {
	fn default() -> Self {
		Self::new()
	}
}

impl Fixture {
	pub fn new() -> Self {
		Self::with_config(EngineConfig::default())
	}

	pub fn with_config(config: EngineConfig) -> Self {
		Self {
			store: InMemoryStore::new(),
			manager: ActionManager::new(InheritanceEngine::new(config)),
			ctx: CallerContext::super_admin("admin"),
		}
	}

	pub fn engine(&self) -> &InheritanceEngine {
		self.manager.engine()
	}

	/// A template carrying original `items`, so trigger expressions written on it validate
	pub fn template(&mut self, name: &str, items: &[&str]) -> OwnerId {
		let id = self.store.add_template(name);
		for key in items {
			self.store.add_item(id, *key, ItemType::Agent);
		}
		id
	}

	/// A host with a main agent interface and original `items`
	///
	/// Seeded items are not tracked, so linking a template with the same keys rejects them.
	pub fn host(&mut self, name: &str, items: &[&str]) -> OwnerId {
		let id = self.store.add_host(name);
		self.store.add_interface(id, InterfaceType::Agent);
		for key in items {
			self.store.add_item(id, *key, ItemType::Agent);
		}
		id
	}

	pub fn link(&mut self, child: OwnerId, parent: OwnerId) {
		self.store.add_link(child, parent);
	}

	pub fn name(&self, owner: OwnerId) -> String {
		self.store.owner(owner).expect("owner exists").name
	}

	/// `last(/<owner>/<key>)>0` described as `description`
	pub fn trigger_body(&self, owner: OwnerId, description: &str, key: &str) -> ObjectBody {
		let expression = Expression::parse(format!("last(/{}/{key})>0", self.name(owner)))
			.expect("valid expression");
		ObjectBody::Trigger(TriggerBody::new(description, expression))
	}

	/// Stores an original trigger without going through any action
	pub fn trigger(&mut self, owner: OwnerId, description: &str, key: &str) -> ObjectId {
		let body = self.trigger_body(owner, description, key);
		self.store.insert_object(ConfigObject::original(owner, body))
	}

	/// Stores an original normal graph drawing `keys`
	pub fn graph(&mut self, owner: OwnerId, name: &str, keys: &[&str]) -> ObjectId {
		let items = keys
			.iter()
			.map(|key| GraphItem {
				key: key.to_string(),
				color: "1A7C11".to_string(),
				axis: AxisSide::Left,
			})
			.collect();
		let body = ObjectBody::Graph(GraphBody::new(name, items));
		self.store.insert_object(ConfigObject::original(owner, body))
	}

	pub fn depend(&mut self, down: ObjectId, up: ObjectId) {
		self.store
			.write_dependency_edges(&[DependencyEdge::new(down, up)])
			.expect("edge written");
	}

	pub fn propagate(&mut self, source: ObjectId, targets: &[OwnerId]) -> lineage_core::Result<Report> {
		self.manager
			.engine()
			.propagate(&self.ctx, &mut self.store, source, targets)
	}

	pub fn dispatch<A: EngineAction>(&mut self, action: A) -> lineage_core::Result<A::Output> {
		self.manager.dispatch(&self.ctx, &mut self.store, action)
	}

	/// The direct child of `source` on `owner`
	pub fn copy_on(&self, source: ObjectId, owner: OwnerId) -> Option<ConfigObject> {
		self.store
			.find_inherited(source, Some(owner))
			.expect("lookup")
			.into_iter()
			.next()
	}

	pub fn object(&self, id: ObjectId) -> ConfigObject {
		self.store.object(id).expect("object exists")
	}

	/// Objects of one kind on `owner`, skipping the items the fixture seeds
	pub fn objects_of_kind(&self, owner: OwnerId, kind: ObjectKind) -> Vec<ConfigObject> {
		self.store
			.objects_of(owner)
			.into_iter()
			.filter(|object| object.kind() == kind)
			.cloned()
			.collect()
	}

	pub fn edges_of(&self, down: ObjectId) -> Vec<DependencyEdge> {
		self.store.read_dependency_edges(&[down]).expect("edges")
	}
}

/// Owner ids in a stable order for comparisons
pub fn sorted(mut owners: Vec<OwnerId>) -> Vec<OwnerId> {
	owners.sort();
	owners
}
