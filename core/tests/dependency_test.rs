//! Integration tests for trigger dependencies
//!
//! Declared edges go through the validator before anything is written. Edges of inherited
//! copies are derived from the template side, re-pointed at each owner's own copies.

mod helpers;

use helpers::*;
use lineage_core::{
	domain::DependencyEdge,
	engine::dependency::DependencyViolation,
	ops::{
		dependencies::{SetDependenciesAction, SetDependenciesInput},
		templates::{LinkTemplatesAction, LinkTemplatesInput},
	},
	EngineAction, InheritanceError,
};
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

fn set(
	fx: &mut Fixture,
	trigger: lineage_core::domain::ObjectId,
	ups: &[lineage_core::domain::ObjectId],
) -> lineage_core::Result<lineage_core::ops::dependencies::SetDependenciesOutput> {
	let action = SetDependenciesAction::from_input(SetDependenciesInput::new(trigger, ups.to_vec()))
		.map_err(InheritanceError::InvalidOperation)?;
	fx.dispatch(action)
}

fn violation(result: lineage_core::Result<impl std::fmt::Debug>) -> DependencyViolation {
	match result {
		Err(InheritanceError::Dependency(violation)) => violation,
		other => panic!("expected a dependency violation, got {other:?}"),
	}
}

#[test]
fn test_cycle_in_one_batch_is_rejected() {
	let mut fx = Fixture::new();
	let host = fx.host("db-01", &["a", "b", "c"]);
	let a = fx.trigger(host, "A", "a");
	let b = fx.trigger(host, "B", "b");
	let c = fx.trigger(host, "C", "c");

	let batch = [
		DependencyEdge::new(a, b),
		DependencyEdge::new(b, c),
		DependencyEdge::new(c, a),
	];
	let result = fx.engine().validate_dependencies(&fx.ctx, &fx.store, &batch);

	match violation(result) {
		DependencyViolation::CircularDependency { path } => {
			assert_eq!(path.len(), 4);
			assert_eq!(path.first(), path.last());
		}
		other => panic!("expected a cycle, got {other:?}"),
	}
	assert!(fx.store.dependency_edges().is_empty());
}

#[test]
fn test_cycle_through_stored_edges_persists_nothing_new() -> anyhow::Result<()> {
	let mut fx = Fixture::new();
	let host = fx.host("db-01", &["a", "b", "c"]);
	let a = fx.trigger(host, "A", "a");
	let b = fx.trigger(host, "B", "b");
	let c = fx.trigger(host, "C", "c");

	set(&mut fx, a, &[b])?;
	set(&mut fx, b, &[c])?;

	assert!(matches!(
		violation(set(&mut fx, c, &[a])),
		DependencyViolation::CircularDependency { .. }
	));
	let mut expected = vec![DependencyEdge::new(a, b), DependencyEdge::new(b, c)];
	expected.sort();
	assert_eq!(fx.store.dependency_edges(), expected);
	Ok(())
}

#[test]
fn test_self_and_duplicate_dependencies() {
	let mut fx = Fixture::new();
	let host = fx.host("db-01", &["a", "b"]);
	let a = fx.trigger(host, "A", "a");
	let b = fx.trigger(host, "B", "b");

	assert_eq!(
		violation(set(&mut fx, a, &[a])),
		DependencyViolation::SelfDependency { trigger: a }
	);
	assert_eq!(
		violation(set(&mut fx, a, &[b, b])),
		DependencyViolation::DuplicateDependency { down: a, up: b }
	);
	assert!(fx.edges_of(a).is_empty());
}

#[test]
fn test_replacing_dependencies() -> anyhow::Result<()> {
	let mut fx = Fixture::new();
	let host = fx.host("db-01", &["a", "b", "c"]);
	let a = fx.trigger(host, "A", "a");
	let b = fx.trigger(host, "B", "b");
	let c = fx.trigger(host, "C", "c");

	set(&mut fx, a, &[b])?;
	let output = set(&mut fx, a, &[b, c])?;

	assert_eq!(output.added, vec![DependencyEdge::new(a, c)]);
	assert!(output.removed.is_empty());

	let output = set(&mut fx, a, &[])?;
	assert_eq!(output.removed.len(), 2);
	assert!(fx.edges_of(a).is_empty());
	Ok(())
}

#[test]
#[traced_test]
fn test_host_trigger_cannot_depend_on_template_trigger() {
	let mut fx = Fixture::new();
	let template = fx.template("Template OS", &["agent.ping"]);
	let host = fx.host("web-01", &["agent.ping"]);
	let on_template = fx.trigger(template, "Agent unreachable", "agent.ping");
	let on_host = fx.trigger(host, "Web down", "agent.ping");

	assert_eq!(
		violation(set(&mut fx, on_host, &[on_template])),
		DependencyViolation::HostDependsOnTemplate {
			down: on_host,
			up: on_template
		}
	);
	assert!(logs_contain("Rejected dependency edges"));
}

#[test]
fn test_template_trigger_may_depend_on_host_trigger() -> anyhow::Result<()> {
	let mut fx = Fixture::new();
	let template = fx.template("Template OS", &["agent.ping"]);
	let router = fx.host("router", &["icmpping"]);
	let host = fx.host("web-01", &["agent.ping"]);
	fx.link(host, template);
	let down = fx.trigger(template, "Agent unreachable", "agent.ping");
	let up = fx.trigger(router, "Router down", "icmpping");

	set(&mut fx, down, &[up])?;
	fx.propagate(down, &[host])?;

	let copy = fx.copy_on(down, host).expect("copy on the host");
	assert_eq!(fx.edges_of(copy.id), vec![DependencyEdge::new(copy.id, up)]);
	Ok(())
}

#[test]
fn test_up_template_must_reach_every_owner_of_down_template() {
	let mut fx = Fixture::new();
	let apps = fx.template("Template App", &["app.ping"]);
	let os = fx.template("Template OS", &["agent.ping"]);
	let host = fx.host("web-01", &["app.ping"]);
	fx.link(host, apps);
	let down = fx.trigger(apps, "App down", "app.ping");
	let up = fx.trigger(os, "Agent unreachable", "agent.ping");

	assert_eq!(
		violation(set(&mut fx, down, &[up])),
		DependencyViolation::TemplateLinkageMismatch {
			down,
			up,
			owner: host
		}
	);
}

#[test]
#[traced_test]
fn test_edge_to_missing_up_copy_is_dropped() -> anyhow::Result<()> {
	let mut fx = Fixture::new();
	let template = fx.template("Template OS", &["agent.ping", "system.cpu.load"]);
	let h4 = fx.host("H4", &["agent.ping", "system.cpu.load"]);
	fx.link(h4, template);
	let p1 = fx.trigger(template, "High CPU load", "system.cpu.load");
	let p2 = fx.trigger(template, "Agent unreachable", "agent.ping");
	fx.depend(p1, p2);

	let report = fx.propagate(p1, &[h4])?;

	let copy = fx.copy_on(p1, h4).expect("P1 reached H4");
	assert!(fx.edges_of(copy.id).is_empty());
	assert_eq!(report.dropped_dependencies.len(), 1);
	assert_eq!(report.dropped_dependencies[0].down, copy.id);
	assert_eq!(
		report.dropped_dependencies[0].parent_edge,
		DependencyEdge::new(p1, p2)
	);
	assert!(logs_contain("Dropped dependency"));
	Ok(())
}

#[test]
fn test_linking_derives_edges_between_copies() -> anyhow::Result<()> {
	let mut fx = Fixture::new();
	let template = fx.template("Template OS", &["agent.ping", "system.cpu.load"]);
	let host = fx.host("web-01", &["agent.ping", "system.cpu.load"]);
	let p1 = fx.trigger(template, "High CPU load", "system.cpu.load");
	let p2 = fx.trigger(template, "Agent unreachable", "agent.ping");
	fx.depend(p1, p2);

	let action = LinkTemplatesAction::from_input(LinkTemplatesInput::new([host], [template]))
		.map_err(anyhow::Error::msg)?;
	let output = fx.dispatch(action)?;

	let down = fx.copy_on(p1, host).expect("P1 copy");
	let up = fx.copy_on(p2, host).expect("P2 copy");
	assert_eq!(fx.edges_of(down.id), vec![DependencyEdge::new(down.id, up.id)]);
	assert!(output.report.dropped_dependencies.is_empty());
	Ok(())
}

#[test]
fn test_template_edge_changes_reach_copies() -> anyhow::Result<()> {
	let mut fx = Fixture::new();
	let template = fx.template("Template OS", &["agent.ping", "system.cpu.load"]);
	let host = fx.host("web-01", &["agent.ping", "system.cpu.load"]);
	fx.link(host, template);
	let p1 = fx.trigger(template, "High CPU load", "system.cpu.load");
	let p2 = fx.trigger(template, "Agent unreachable", "agent.ping");
	fx.propagate(p2, &[host])?;
	fx.propagate(p1, &[host])?;

	let down = fx.copy_on(p1, host).expect("P1 copy");
	let up = fx.copy_on(p2, host).expect("P2 copy");
	assert!(fx.edges_of(down.id).is_empty());

	set(&mut fx, p1, &[p2])?;
	assert_eq!(fx.edges_of(down.id), vec![DependencyEdge::new(down.id, up.id)]);

	set(&mut fx, p1, &[])?;
	assert!(fx.edges_of(down.id).is_empty());
	Ok(())
}

#[test]
fn test_inherited_trigger_dependencies_are_read_only() -> anyhow::Result<()> {
	let mut fx = Fixture::new();
	let template = fx.template("Template OS", &["agent.ping"]);
	let host = fx.host("web-01", &["agent.ping", "icmpping"]);
	fx.link(host, template);
	let source = fx.trigger(template, "Agent unreachable", "agent.ping");
	let local = fx.trigger(host, "No ping", "icmpping");
	fx.propagate(source, &[host])?;

	let copy = fx.copy_on(source, host).expect("copy");
	assert!(matches!(
		set(&mut fx, copy.id, &[local]),
		Err(InheritanceError::InheritedObjectReadOnly(id)) if id == copy.id
	));
	Ok(())
}
