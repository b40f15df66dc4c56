//! Binding resolution
//!
//! Re-targets an object's host specific references onto a new owner. Templates only get role
//! markers, except for structural roles which always point at the owner's own records.

use crate::{
	domain::{
		Binding, BindingRole, BindingTarget, Inheritable, InterfaceRequirement, InterfaceType,
		ObjectBody, Owner,
	},
	infra::store::{ConfigStore, StoreError},
};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error)]
pub enum ResolveError {
	#[error("no compatible {} for \"{}\"", .role.name(), ResolveError::missing_key(.role))]
	NoCompatibleBinding { role: BindingRole },

	#[error(transparent)]
	Store(#[from] StoreError),
}

impl ResolveError {
	/// Key to report to the user for a missing binding
	pub fn missing_key(role: &BindingRole) -> String {
		match role {
			BindingRole::Interface(InterfaceRequirement::Exact(interface_type)) => {
				format!("{interface_type} interface")
			}
			BindingRole::Interface(InterfaceRequirement::Any) => "any interface".to_string(),
			_ => role.key().unwrap_or_default().to_string(),
		}
	}
}

pub struct Resolver<'a> {
	interface_priority: &'a [InterfaceType],
}

impl<'a> Resolver<'a> {
	pub fn new(interface_priority: &'a [InterfaceType]) -> Self {
		Self { interface_priority }
	}

	/// Bindings `body` needs once owned by `target`
	///
	/// Fails on the first role the target cannot satisfy.
	pub fn resolve<S>(
		&self,
		store: &S,
		body: &ObjectBody,
		target: &Owner,
	) -> Result<Vec<Binding>, ResolveError>
	where
		S: ConfigStore + ?Sized,
	{
		body.binding_roles()
			.into_iter()
			.map(|role| {
				if target.is_template() && !role.is_structural() {
					return Ok(Binding::marker(role));
				}

				match self.lookup(store, target, &role)? {
					Some(found) => Ok(Binding::resolved(role, found)),
					None => {
						trace!(owner = %target.id, role = %role, "No binding");
						Err(ResolveError::NoCompatibleBinding { role })
					}
				}
			})
			.collect()
	}

	fn lookup<S>(
		&self,
		store: &S,
		target: &Owner,
		role: &BindingRole,
	) -> Result<Option<BindingTarget>, StoreError>
	where
		S: ConfigStore + ?Sized,
	{
		if let BindingRole::Interface(InterfaceRequirement::Any) = role {
			for interface_type in self.interface_priority {
				let exact = BindingRole::Interface(InterfaceRequirement::Exact(*interface_type));
				if let Some(found) = store.find_binding(target.id, &exact)? {
					return Ok(Some(found));
				}
			}
			return Ok(None);
		}

		store.find_binding(target.id, role)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		domain::{DiscoveryRuleBody, GraphBody, GraphItem, ItemPrototypeBody, ItemType, AxisSide},
		infra::store::InMemoryStore,
	};

	#[test]
	fn test_any_interface_walks_priority() {
		let mut store = InMemoryStore::new();
		let host = store.add_host("H");
		store.add_interface(host, InterfaceType::Agent);
		let snmp = store.add_interface(host, InterfaceType::Snmp);
		let owner = store.owner(host).unwrap();

		let body =
			ObjectBody::DiscoveryRule(DiscoveryRuleBody::new("net.if.discovery", "Net", ItemType::Simple));

		let priority = [InterfaceType::Snmp, InterfaceType::Agent];
		let bindings = Resolver::new(&priority).resolve(&store, &body, &owner).unwrap();

		assert_eq!(
			bindings,
			vec![Binding::resolved(
				BindingRole::Interface(InterfaceRequirement::Any),
				BindingTarget::Interface(snmp)
			)]
		);
	}

	#[test]
	fn test_missing_item_fails() {
		let mut store = InMemoryStore::new();
		let host = store.add_host("H");
		store.add_item(host, "net.in", ItemType::Agent);
		let owner = store.owner(host).unwrap();

		let body = ObjectBody::Graph(GraphBody::new(
			"Traffic",
			vec![
				GraphItem {
					key: "net.in".into(),
					color: "00AA00".into(),
					axis: AxisSide::Left,
				},
				GraphItem {
					key: "net.out".into(),
					color: "AA0000".into(),
					axis: AxisSide::Left,
				},
			],
		));

		let error = Resolver::new(&InterfaceType::DEFAULT_PRIORITY)
			.resolve(&store, &body, &owner)
			.unwrap_err();

		assert!(matches!(
			error,
			ResolveError::NoCompatibleBinding { role: BindingRole::Item(key) } if key == "net.out"
		));
	}

	#[test]
	fn test_templates_get_markers_but_structural_roles_resolve() {
		let mut store = InMemoryStore::new();
		let template = store.add_template("T");
		let owner = store.owner(template).unwrap();
		let rule = crate::domain::ConfigObject::original(
			template,
			ObjectBody::DiscoveryRule(DiscoveryRuleBody::new("fs.discovery", "FS", ItemType::Agent)),
		);
		let rule_id = store.insert_object(rule);

		let body = ObjectBody::ItemPrototype(ItemPrototypeBody::new(
			"vfs.fs.size[{#FS}]",
			"Size",
			ItemType::Agent,
			"fs.discovery",
		));

		let bindings = Resolver::new(&InterfaceType::DEFAULT_PRIORITY)
			.resolve(&store, &body, &owner)
			.unwrap();

		assert_eq!(
			bindings,
			vec![
				Binding::resolved(
					BindingRole::ParentRule("fs.discovery".into()),
					BindingTarget::Object(rule_id)
				),
				Binding::marker(BindingRole::Interface(InterfaceRequirement::Exact(
					InterfaceType::Agent
				))),
			]
		);
	}

	#[test]
	fn test_missing_parent_rule_on_template_fails() {
		let mut store = InMemoryStore::new();
		let template = store.add_template("T");
		let owner = store.owner(template).unwrap();

		let body = ObjectBody::ItemPrototype(ItemPrototypeBody::new(
			"vfs.fs.size[{#FS}]",
			"Size",
			ItemType::Trapper,
			"fs.discovery",
		));

		assert!(Resolver::new(&InterfaceType::DEFAULT_PRIORITY)
			.resolve(&store, &body, &owner)
			.is_err());
	}
}
