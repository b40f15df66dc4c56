//! In-memory store
//!
//! Keeps the whole configuration in ordered maps. Transactions snapshot the state on `begin` and
//! restore it on `rollback`, which gives the same all-or-nothing behaviour a database transaction
//! would. The state is plain serde data so fixtures can be loaded from JSON.

use super::{ConfigStore, StoreError, StoreResult, Transactional};
use crate::{
	context::{CallerContext, UserRole},
	domain::{
		BindingRole, BindingTarget, ConfigObject, DependencyEdge, Interface, InterfaceId,
		InterfaceRequirement, InterfaceType, ItemBody, ItemType, KeyNamespace, NaturalKey,
		ObjectBody, ObjectId, ObjectKind, Owner, OwnerId, TemplateLink,
	},
};
use serde::{Deserialize, Serialize};
use std::{
	collections::{BTreeMap, BTreeSet},
	fs,
	path::Path,
};
use tracing::{debug, trace};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
	#[serde(default)]
	pub owners: BTreeMap<OwnerId, Owner>,
	#[serde(default)]
	pub links: BTreeSet<TemplateLink>,
	#[serde(default)]
	pub interfaces: BTreeMap<InterfaceId, Interface>,
	#[serde(default)]
	pub objects: BTreeMap<ObjectId, ConfigObject>,
	#[serde(default)]
	pub dependencies: BTreeSet<DependencyEdge>,
	/// Owners each non super admin user may write to
	#[serde(default)]
	pub grants: BTreeMap<String, BTreeSet<OwnerId>>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
	state: StoreState,
	snapshots: Vec<StoreState>,
	/// Remaining successful writes before every further write fails
	fail_after: Option<usize>,
}

impl InMemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_state(state: StoreState) -> Self {
		Self {
			state,
			..Default::default()
		}
	}

	pub fn from_json(json: &str) -> StoreResult<Self> {
		Ok(Self::from_state(serde_json::from_str(json)?))
	}

	pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
		Self::from_json(&fs::read_to_string(path)?)
	}

	pub fn to_json(&self) -> StoreResult<String> {
		Ok(serde_json::to_string_pretty(&self.state)?)
	}

	pub fn dump(&self, path: impl AsRef<Path>) -> StoreResult<()> {
		fs::write(path, self.to_json()?)?;
		Ok(())
	}

	pub fn state(&self) -> &StoreState {
		&self.state
	}

	/// Let `writes` more writes succeed, then fail every write after that
	pub fn fail_after_writes(&mut self, writes: usize) {
		self.fail_after = Some(writes);
	}

	pub fn clear_failures(&mut self) {
		self.fail_after = None;
	}

	pub fn add_host(&mut self, name: impl Into<String>) -> OwnerId {
		self.add_owner(Owner::host(name))
	}

	pub fn add_template(&mut self, name: impl Into<String>) -> OwnerId {
		self.add_owner(Owner::template(name))
	}

	pub fn add_owner(&mut self, owner: Owner) -> OwnerId {
		let id = owner.id;
		self.state.owners.insert(id, owner);
		id
	}

	/// Records a link without synchronizing anything
	pub fn add_link(&mut self, child: OwnerId, parent: OwnerId) {
		self.state.links.insert(TemplateLink::new(child, parent));
	}

	/// Stores an original item named after its key, without bindings
	pub fn add_item(&mut self, owner: OwnerId, key: impl Into<String>, item_type: ItemType) -> ObjectId {
		let key = key.into();
		let body = ObjectBody::Item(ItemBody::new(key.clone(), key, item_type));
		self.insert_object(ConfigObject::original(owner, body))
	}

	pub fn add_interface(&mut self, owner: OwnerId, interface_type: InterfaceType) -> InterfaceId {
		let interface = Interface::main(owner, interface_type);
		let id = interface.id;
		self.state.interfaces.insert(id, interface);
		id
	}

	/// Inserts an object as is, bypassing the engine
	pub fn insert_object(&mut self, object: ConfigObject) -> ObjectId {
		let id = object.id;
		self.state.objects.insert(id, object);
		id
	}

	pub fn grant(&mut self, user: impl Into<String>, owners: impl IntoIterator<Item = OwnerId>) {
		self.state
			.grants
			.entry(user.into())
			.or_default()
			.extend(owners);
	}

	pub fn objects_of(&self, owner: OwnerId) -> Vec<&ConfigObject> {
		self.state
			.objects
			.values()
			.filter(|object| object.owner_id == owner)
			.collect()
	}

	pub fn dependency_edges(&self) -> Vec<DependencyEdge> {
		self.state.dependencies.iter().copied().collect()
	}

	fn record_write(&mut self, what: &str) -> StoreResult<()> {
		match self.fail_after.as_mut() {
			Some(0) => Err(StoreError::WriteFailed(format!("injected failure on {what}"))),
			Some(remaining) => {
				*remaining -= 1;
				Ok(())
			}
			None => Ok(()),
		}
	}

	fn main_interface(&self, owner: OwnerId, interface_type: InterfaceType) -> Option<InterfaceId> {
		self.state
			.interfaces
			.values()
			.find(|interface| {
				interface.owner_id == owner
					&& interface.main && interface.interface_type == interface_type
			})
			.map(|interface| interface.id)
	}

	fn object_by_key(&self, owner: OwnerId, kind: ObjectKind, key: &str) -> Option<ObjectId> {
		let natural_key = NaturalKey::Item(key.to_string());
		self.state
			.objects
			.values()
			.find(|object| {
				object.owner_id == owner && object.kind() == kind && object.natural_key() == natural_key
			})
			.map(|object| object.id)
	}

	fn item_target(&self, owner: OwnerId, key: &str) -> Option<BindingTarget> {
		self.object_by_key(owner, ObjectKind::Item, key)
			.or_else(|| self.object_by_key(owner, ObjectKind::ItemPrototype, key))
			.map(BindingTarget::Object)
	}
}

impl ConfigStore for InMemoryStore {
	fn owner(&self, id: OwnerId) -> StoreResult<Owner> {
		self.state
			.owners
			.get(&id)
			.cloned()
			.ok_or_else(|| StoreError::not_found("owner", id))
	}

	fn owner_by_name(&self, name: &str) -> StoreResult<Option<Owner>> {
		Ok(self
			.state
			.owners
			.values()
			.find(|owner| owner.name == name)
			.cloned())
	}

	fn object(&self, id: ObjectId) -> StoreResult<ConfigObject> {
		self.state
			.objects
			.get(&id)
			.cloned()
			.ok_or_else(|| StoreError::not_found("object", id))
	}

	fn find_objects(
		&self,
		owner: OwnerId,
		namespace: KeyNamespace,
		key: Option<&NaturalKey>,
	) -> StoreResult<Vec<ConfigObject>> {
		Ok(self
			.state
			.objects
			.values()
			.filter(|object| object.owner_id == owner && object.kind().namespace() == namespace)
			.filter(|object| key.map_or(true, |key| &object.natural_key() == key))
			.cloned()
			.collect())
	}

	fn find_inherited(
		&self,
		template_object: ObjectId,
		owner: Option<OwnerId>,
	) -> StoreResult<Vec<ConfigObject>> {
		Ok(self
			.state
			.objects
			.values()
			.filter(|object| object.template_id == Some(template_object))
			.filter(|object| owner.map_or(true, |owner| object.owner_id == owner))
			.cloned()
			.collect())
	}

	fn find_linked_owners(&self, template: OwnerId) -> StoreResult<Vec<OwnerId>> {
		Ok(self
			.state
			.links
			.iter()
			.filter(|link| link.parent == template)
			.map(|link| link.child)
			.collect())
	}

	fn find_parent_templates(&self, owner: OwnerId) -> StoreResult<Vec<OwnerId>> {
		Ok(self
			.state
			.links
			.iter()
			.filter(|link| link.child == owner)
			.map(|link| link.parent)
			.collect())
	}

	fn find_binding(
		&self,
		owner: OwnerId,
		role: &BindingRole,
	) -> StoreResult<Option<BindingTarget>> {
		let target = match role {
			BindingRole::Interface(InterfaceRequirement::Exact(interface_type)) => self
				.main_interface(owner, *interface_type)
				.map(BindingTarget::Interface),
			BindingRole::Interface(InterfaceRequirement::Any) => InterfaceType::DEFAULT_PRIORITY
				.iter()
				.find_map(|interface_type| self.main_interface(owner, *interface_type))
				.map(BindingTarget::Interface),
			BindingRole::Item(key) | BindingRole::AxisMin(key) | BindingRole::AxisMax(key) => {
				self.item_target(owner, key)
			}
			BindingRole::ParentRule(key) => self
				.object_by_key(owner, ObjectKind::DiscoveryRule, key)
				.map(BindingTarget::Object),
		};

		trace!(owner = %owner, role = %role, found = target.is_some(), "Binding lookup");
		Ok(target)
	}

	fn write_object(&mut self, object: ConfigObject) -> StoreResult<ObjectId> {
		self.record_write("write_object")?;

		if !self.state.owners.contains_key(&object.owner_id) {
			return Err(StoreError::not_found("owner", object.owner_id));
		}
		if self.state.objects.contains_key(&object.id) {
			return Err(StoreError::Constraint(format!(
				"object {} already exists",
				object.id
			)));
		}

		let id = object.id;
		self.state.objects.insert(id, object);
		Ok(id)
	}

	fn update_object(&mut self, id: ObjectId, object: ConfigObject) -> StoreResult<()> {
		self.record_write("update_object")?;

		let slot = self
			.state
			.objects
			.get_mut(&id)
			.ok_or_else(|| StoreError::not_found("object", id))?;

		*slot = ConfigObject { id, ..object };
		Ok(())
	}

	fn delete_object(&mut self, id: ObjectId) -> StoreResult<()> {
		self.record_write("delete_object")?;

		if self.state.objects.remove(&id).is_none() {
			return Err(StoreError::not_found("object", id));
		}

		self.state
			.dependencies
			.retain(|edge| edge.down != id && edge.up != id);
		Ok(())
	}

	fn read_dependency_edges(&self, downs: &[ObjectId]) -> StoreResult<Vec<DependencyEdge>> {
		Ok(self
			.state
			.dependencies
			.iter()
			.filter(|edge| downs.contains(&edge.down))
			.copied()
			.collect())
	}

	fn read_dependents(&self, ups: &[ObjectId]) -> StoreResult<Vec<DependencyEdge>> {
		Ok(self
			.state
			.dependencies
			.iter()
			.filter(|edge| ups.contains(&edge.up))
			.copied()
			.collect())
	}

	fn write_dependency_edges(&mut self, edges: &[DependencyEdge]) -> StoreResult<()> {
		if edges.is_empty() {
			return Ok(());
		}
		self.record_write("write_dependency_edges")?;

		for edge in edges {
			for id in [edge.down, edge.up] {
				if !self.state.objects.contains_key(&id) {
					return Err(StoreError::not_found("trigger", id));
				}
			}
			if !self.state.dependencies.insert(*edge) {
				return Err(StoreError::Constraint(format!("dependency {edge} already exists")));
			}
		}

		Ok(())
	}

	fn delete_dependency_edges(&mut self, edges: &[DependencyEdge]) -> StoreResult<()> {
		if edges.is_empty() {
			return Ok(());
		}
		self.record_write("delete_dependency_edges")?;

		for edge in edges {
			self.state.dependencies.remove(edge);
		}
		Ok(())
	}

	fn write_template_link(&mut self, link: TemplateLink) -> StoreResult<()> {
		self.record_write("write_template_link")?;

		for id in [link.child, link.parent] {
			if !self.state.owners.contains_key(&id) {
				return Err(StoreError::not_found("owner", id));
			}
		}

		self.state.links.insert(link);
		Ok(())
	}

	fn delete_template_link(&mut self, link: TemplateLink) -> StoreResult<()> {
		self.record_write("delete_template_link")?;

		if !self.state.links.remove(&link) {
			return Err(StoreError::not_found(
				"template link",
				format!("{} -> {}", link.child, link.parent),
			));
		}
		Ok(())
	}

	fn check_caller_may_write(&self, ctx: &CallerContext, owners: &[OwnerId]) -> StoreResult<bool> {
		if ctx.is_super_admin() {
			return Ok(true);
		}

		// Plain users never write configuration
		Ok(ctx.role == UserRole::Admin
			&& self
				.state
				.grants
				.get(&ctx.user)
				.is_some_and(|granted| owners.iter().all(|owner| granted.contains(owner))))
	}
}

impl Transactional for InMemoryStore {
	fn begin(&mut self) -> StoreResult<()> {
		self.snapshots.push(self.state.clone());
		debug!(depth = self.snapshots.len(), "Transaction started");
		Ok(())
	}

	fn commit(&mut self) -> StoreResult<()> {
		self.snapshots
			.pop()
			.ok_or_else(|| StoreError::Transaction("commit without begin".to_string()))?;
		debug!(depth = self.snapshots.len(), "Transaction committed");
		Ok(())
	}

	fn rollback(&mut self) -> StoreResult<()> {
		self.state = self
			.snapshots
			.pop()
			.ok_or_else(|| StoreError::Transaction("rollback without begin".to_string()))?;
		debug!(depth = self.snapshots.len(), "Transaction rolled back");
		Ok(())
	}
}
