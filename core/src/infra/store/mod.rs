//! Storage collaborator contracts
//!
//! The engine never builds queries itself. Everything it reads or writes goes through
//! [`ConfigStore`], and every call that writes runs inside one [`Transactional`] scope.

pub mod error;
pub mod memory;

pub use error::{StoreError, StoreResult};
pub use memory::{InMemoryStore, StoreState};

use crate::{
	context::CallerContext,
	domain::{
		BindingRole, BindingTarget, ConfigObject, DependencyEdge, KeyNamespace, NaturalKey,
		ObjectId, Owner, OwnerId, TemplateLink,
	},
};
use tracing::error;

/// Lookups and writes the engine needs from the configuration database
pub trait ConfigStore {
	fn owner(&self, id: OwnerId) -> StoreResult<Owner>;

	fn owner_by_name(&self, name: &str) -> StoreResult<Option<Owner>>;

	fn object(&self, id: ObjectId) -> StoreResult<ConfigObject>;

	/// Objects of `owner` in `namespace`, optionally restricted to one natural key
	fn find_objects(
		&self,
		owner: OwnerId,
		namespace: KeyNamespace,
		key: Option<&NaturalKey>,
	) -> StoreResult<Vec<ConfigObject>>;

	/// Direct children of `template_object`, optionally restricted to one owner
	fn find_inherited(
		&self,
		template_object: ObjectId,
		owner: Option<OwnerId>,
	) -> StoreResult<Vec<ConfigObject>>;

	/// Hosts and templates directly linked to `template`
	fn find_linked_owners(&self, template: OwnerId) -> StoreResult<Vec<OwnerId>>;

	/// Templates `owner` is directly linked to
	fn find_parent_templates(&self, owner: OwnerId) -> StoreResult<Vec<OwnerId>>;

	/// Record on `owner` satisfying `role`
	fn find_binding(&self, owner: OwnerId, role: &BindingRole)
		-> StoreResult<Option<BindingTarget>>;

	fn write_object(&mut self, object: ConfigObject) -> StoreResult<ObjectId>;

	fn update_object(&mut self, id: ObjectId, object: ConfigObject) -> StoreResult<()>;

	/// Removes the object and every dependency edge touching it
	fn delete_object(&mut self, id: ObjectId) -> StoreResult<()>;

	/// Edges whose down side is one of `downs`
	fn read_dependency_edges(&self, downs: &[ObjectId]) -> StoreResult<Vec<DependencyEdge>>;

	/// Edges whose up side is one of `ups`
	fn read_dependents(&self, ups: &[ObjectId]) -> StoreResult<Vec<DependencyEdge>>;

	fn write_dependency_edges(&mut self, edges: &[DependencyEdge]) -> StoreResult<()>;

	fn delete_dependency_edges(&mut self, edges: &[DependencyEdge]) -> StoreResult<()>;

	fn write_template_link(&mut self, link: TemplateLink) -> StoreResult<()>;

	fn delete_template_link(&mut self, link: TemplateLink) -> StoreResult<()>;

	/// Permission gate, called once per request by the operation layer
	fn check_caller_may_write(&self, ctx: &CallerContext, owners: &[OwnerId])
		-> StoreResult<bool>;
}

/// All-or-nothing scope around a set of writes
///
/// Scopes nest: a rollback only undoes the writes made since the matching `begin`.
pub trait Transactional {
	fn begin(&mut self) -> StoreResult<()>;

	fn commit(&mut self) -> StoreResult<()>;

	fn rollback(&mut self) -> StoreResult<()>;
}

/// Everything the engine needs from a store
pub trait Store: ConfigStore + Transactional {}

impl<T: ConfigStore + Transactional + ?Sized> Store for T {}

/// Runs `f` in one transaction: commit on `Ok`, rollback on `Err`
pub fn transaction<S, T, E, F>(store: &mut S, f: F) -> Result<T, E>
where
	S: Transactional + ?Sized,
	E: From<StoreError>,
	F: FnOnce(&mut S) -> Result<T, E>,
{
	store.begin()?;

	match f(store) {
		Ok(value) => {
			store.commit()?;
			Ok(value)
		}
		Err(e) => {
			if let Err(rollback_error) = store.rollback() {
				error!(error = %rollback_error, "Rollback failed");
			}
			Err(e)
		}
	}
}
