//! Integration tests for object create, update and delete operations

mod helpers;

use helpers::*;
use lineage_core::{
	domain::{
		AxisSide, DependencyEdge, GraphBody, GraphItem, ItemBody, ItemType, ObjectBody, ObjectId,
		ObjectKind,
	},
	ops::objects::{
		CreateObjectAction, CreateObjectInput, CreateObjectOutput, DeleteObjectAction,
		DeleteObjectInput, DeleteObjectOutput, UpdateObjectAction, UpdateObjectInput,
		UpdateObjectOutput,
	},
	EngineAction, InheritanceError,
};
use lineage_expression::Expression;
use pretty_assertions::assert_eq;

fn create(fx: &mut Fixture, input: CreateObjectInput) -> lineage_core::Result<CreateObjectOutput> {
	let action = CreateObjectAction::from_input(input).map_err(InheritanceError::InvalidOperation)?;
	fx.dispatch(action)
}

fn update(fx: &mut Fixture, id: ObjectId, body: ObjectBody) -> lineage_core::Result<UpdateObjectOutput> {
	let action = UpdateObjectAction::from_input(UpdateObjectInput::new(id, body))
		.map_err(InheritanceError::InvalidOperation)?;
	fx.dispatch(action)
}

fn delete(fx: &mut Fixture, id: ObjectId) -> lineage_core::Result<DeleteObjectOutput> {
	let action = DeleteObjectAction::from_input(DeleteObjectInput::new(id))
		.map_err(InheritanceError::InvalidOperation)?;
	fx.dispatch(action)
}

#[test]
fn test_create_propagates_to_linked_hosts() -> anyhow::Result<()> {
	let mut fx = Fixture::new();
	let template = fx.template("Template OS", &["system.cpu.load"]);
	let h1 = fx.host("H1", &["system.cpu.load"]);
	let h2 = fx.host("H2", &["system.cpu.load"]);
	fx.link(h1, template);
	fx.link(h2, template);

	let body = fx.trigger_body(template, "High CPU load", "system.cpu.load");
	let output = create(&mut fx, CreateObjectInput::new(template, body))?;

	assert_eq!(sorted(output.report.created_owners()), sorted(vec![h1, h2]));
	assert!(fx.copy_on(output.object, h1).is_some());
	Ok(())
}

#[test]
fn test_create_validates_the_expression() {
	let mut fx = Fixture::new();
	let template = fx.template("Template OS", &["system.cpu.load"]);
	let other = fx.template("Template Other", &["system.cpu.load"]);
	let host = fx.host("H1", &["system.cpu.load"]);

	// Must reference the owner itself
	let body = fx.trigger_body(other, "High CPU load", "system.cpu.load");
	assert!(matches!(
		create(&mut fx, CreateObjectInput::new(template, body)),
		Err(InheritanceError::InvalidOperation(_))
	));

	// Items must exist
	let body = fx.trigger_body(template, "Missing", "vm.memory.size");
	assert!(matches!(
		create(&mut fx, CreateObjectInput::new(template, body)),
		Err(InheritanceError::NotFound(_))
	));

	// Templates and hosts do not mix
	let expression = Expression::parse(
		"last(/Template OS/system.cpu.load)>0 and last(/H1/system.cpu.load)>0",
	)
	.expect("valid expression");
	let body = ObjectBody::Trigger(lineage_core::domain::TriggerBody::new("Mixed", expression));
	assert!(matches!(
		create(&mut fx, CreateObjectInput::new(template, body)),
		Err(InheritanceError::InvalidOperation(_))
	));

	assert!(fx.objects_of_kind(template, ObjectKind::Trigger).is_empty());
	assert!(fx.objects_of_kind(host, ObjectKind::Trigger).is_empty());
}

#[test]
fn test_create_rejects_taken_key() -> anyhow::Result<()> {
	let mut fx = Fixture::new();
	let host = fx.host("H1", &["system.cpu.load"]);
	let body = fx.trigger_body(host, "High CPU load", "system.cpu.load");
	create(&mut fx, CreateObjectInput::new(host, body.clone()))?;

	assert!(matches!(
		create(&mut fx, CreateObjectInput::new(host, body)),
		Err(InheritanceError::ForeignObjectConflict { .. })
	));
	Ok(())
}

#[test]
fn test_create_on_host_needs_bindings() {
	let mut fx = Fixture::new();
	let host = fx.host("router", &["net.if.in"]);
	let body = ObjectBody::Graph(GraphBody::new(
		"Traffic",
		vec![GraphItem {
			key: "net.if.out".into(),
			color: "F63100".into(),
			axis: AxisSide::Left,
		}],
	));

	assert!(matches!(
		create(&mut fx, CreateObjectInput::new(host, body)),
		Err(InheritanceError::NoCompatibleBinding { ref key, .. }) if key == "net.if.out"
	));
}

#[test]
fn test_create_with_dependencies() -> anyhow::Result<()> {
	let mut fx = Fixture::new();
	let host = fx.host("db-01", &["agent.ping", "mysql.ping"]);
	let up = fx.trigger(host, "Agent unreachable", "agent.ping");

	let body = fx.trigger_body(host, "MySQL down", "mysql.ping");
	let output = create(
		&mut fx,
		CreateObjectInput::new(host, body).with_dependencies([up]),
	)?;

	assert_eq!(
		fx.edges_of(output.object),
		vec![DependencyEdge::new(output.object, up)]
	);
	Ok(())
}

#[test]
fn test_spanning_templates_must_share_links() {
	let mut fx = Fixture::new();
	let os = fx.template("Template OS", &["agent.ping"]);
	let db = fx.template("Template DB", &["mysql.ping"]);
	let host = fx.host("db-01", &["agent.ping", "mysql.ping"]);
	fx.link(host, os);

	let expression = Expression::parse(
		"last(/Template OS/agent.ping)=0 and last(/Template DB/mysql.ping)=0",
	)
	.expect("valid expression");
	let body = ObjectBody::Trigger(lineage_core::domain::TriggerBody::new("All down", expression));
	let result = create(&mut fx, CreateObjectInput::new(os, body));

	assert!(matches!(
		result,
		Err(InheritanceError::TemplateLinkageMismatch { ref templates, .. }) if templates.len() == 2
	));
	assert!(fx.objects_of_kind(os, ObjectKind::Trigger).is_empty());
	assert!(fx.objects_of_kind(db, ObjectKind::Trigger).is_empty());
}

#[test]
fn test_update_refreshes_copies() -> anyhow::Result<()> {
	let mut fx = Fixture::new();
	let template = fx.template("Template OS", &["system.cpu.load"]);
	let host = fx.host("H1", &["system.cpu.load"]);
	fx.link(host, template);
	let source = fx.trigger(template, "High CPU load", "system.cpu.load");
	fx.propagate(source, &[host])?;

	let body = fx.trigger_body(template, "CPU overloaded", "system.cpu.load");
	let output = update(&mut fx, source, body)?;

	assert_eq!(output.report.updated_owners(), vec![host]);
	let copy = fx.copy_on(source, host).expect("copy");
	assert_eq!(
		copy.body.trigger().map(|trigger| trigger.description.as_str()),
		Some("CPU overloaded")
	);
	Ok(())
}

#[test]
fn test_inherited_objects_are_read_only() -> anyhow::Result<()> {
	let mut fx = Fixture::new();
	let template = fx.template("Template OS", &["system.cpu.load"]);
	let host = fx.host("H1", &["system.cpu.load"]);
	fx.link(host, template);
	let source = fx.trigger(template, "High CPU load", "system.cpu.load");
	fx.propagate(source, &[host])?;
	let copy = fx.copy_on(source, host).expect("copy");

	let body = fx.trigger_body(host, "Edited", "system.cpu.load");
	assert!(matches!(
		update(&mut fx, copy.id, body),
		Err(InheritanceError::InheritedObjectReadOnly(id)) if id == copy.id
	));
	assert!(matches!(
		delete(&mut fx, copy.id),
		Err(InheritanceError::InheritedObjectReadOnly(_))
	));

	let graph = fx.graph(template, "Load", &["system.cpu.load"]);
	let body = fx.trigger_body(template, "Not a graph", "system.cpu.load");
	assert!(matches!(
		update(&mut fx, graph, body),
		Err(InheritanceError::TypeMismatch { ref key, .. }) if key == "Load"
	));
	assert!(fx.object(graph).body.trigger().is_none());
	Ok(())
}

#[test]
fn test_delete_cascades_to_copies_and_edges() -> anyhow::Result<()> {
	let mut fx = Fixture::new();
	let template = fx.template("Template OS", &["agent.ping", "system.cpu.load"]);
	let host = fx.host("H1", &["agent.ping", "system.cpu.load"]);
	fx.link(host, template);
	let down = fx.trigger(template, "High CPU load", "system.cpu.load");
	let up = fx.trigger(template, "Agent unreachable", "agent.ping");
	fx.depend(down, up);
	fx.propagate(up, &[host])?;
	fx.propagate(down, &[host])?;
	let up_copy = fx.copy_on(up, host).expect("up copy");

	let output = delete(&mut fx, up)?;

	assert_eq!(output.deleted.first(), Some(&up));
	assert!(output.deleted.contains(&up_copy.id));
	assert!(fx.store.dependency_edges().is_empty());
	assert!(fx.copy_on(down, host).is_some());
	Ok(())
}

#[test]
fn test_deleting_an_item_removes_what_reads_it() -> anyhow::Result<()> {
	let mut fx = Fixture::new();
	let template = fx.template("Template OS", &[]);
	let host = fx.host("H1", &[]);
	fx.link(host, template);

	let body = ObjectBody::Item(ItemBody::new("agent.ping", "Agent ping", ItemType::Agent));
	let item = create(&mut fx, CreateObjectInput::new(template, body))?.object;
	let body = fx.trigger_body(template, "Agent unreachable", "agent.ping");
	let trigger = create(&mut fx, CreateObjectInput::new(template, body))?.object;
	let item_copy = fx.copy_on(item, host).expect("item copy");
	let trigger_copy = fx.copy_on(trigger, host).expect("trigger copy");

	let output = delete(&mut fx, item)?;

	assert_eq!(output.deleted.first(), Some(&item));
	for id in [trigger, item_copy.id, trigger_copy.id] {
		assert!(output.deleted.contains(&id));
	}
	assert!(fx.store.objects_of(template).is_empty());
	assert!(fx.store.objects_of(host).is_empty());
	Ok(())
}
