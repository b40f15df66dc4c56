//! Inheritance engine
//!
//! Pushes template owned objects down the link graph and keeps trigger dependencies valid while
//! doing so. Two entry points face callers:
//!
//! - [`InheritanceEngine::propagate`] for one source onto a set of linked owners
//! - [`InheritanceEngine::validate_dependencies`] for a proposed batch of edges
//!
//! Both take the caller's context. Writes happen inside a single transaction so any failure
//! leaves the store exactly as it was.

pub mod classifier;
pub mod dependency;
pub mod matcher;
pub mod order;
pub mod propagator;
pub mod resolver;

use crate::{
	common::{InheritanceError, Result},
	config::EngineConfig,
	context::CallerContext,
	domain::{ConfigObject, DependencyEdge, ObjectId, ObjectKind, OwnerId, Report},
	infra::store::{transaction, ConfigStore, Store},
};
use dependency::Topology;
use order::compute_order;
use propagator::Propagator;
use std::collections::BTreeSet;
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct InheritanceEngine {
	config: EngineConfig,
}

impl InheritanceEngine {
	pub fn new(config: EngineConfig) -> Self {
		Self { config }
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	/// Propagates `source` onto `targets` and everything linked beneath them, all or nothing
	///
	/// Per target conflicts and missing bindings end up in the returned [`Report`]. Storage
	/// failures and dependency violations fail the whole call and roll every write back.
	pub fn propagate<S>(
		&self,
		ctx: &CallerContext,
		store: &mut S,
		source: ObjectId,
		targets: &[OwnerId],
	) -> Result<Report>
	where
		S: Store + ?Sized,
	{
		let span = ctx.span("propagate");
		let _guard = span.enter();

		transaction(store, |store| self.propagate_in(store, source, targets))
	}

	/// Checks a batch of proposed edges against the stored ones without writing anything
	pub fn validate_dependencies<S>(
		&self,
		ctx: &CallerContext,
		store: &S,
		edges: &[DependencyEdge],
	) -> Result<()>
	where
		S: ConfigStore + ?Sized,
	{
		let span = ctx.span("validate_dependencies");
		let _guard = span.enter();

		self.validate_replacement(store, edges, &[])
	}

	/// [`Self::propagate`] inside a transaction the caller already opened
	pub(crate) fn propagate_in<S>(
		&self,
		store: &mut S,
		source: ObjectId,
		targets: &[OwnerId],
	) -> Result<Report>
	where
		S: Store + ?Sized,
	{
		self.propagate_batch(store, &[(source, targets.to_vec())])
	}

	/// Propagates several sources in one run so later sources can find copies of earlier ones
	pub(crate) fn propagate_batch<S>(
		&self,
		store: &mut S,
		batch: &[(ObjectId, Vec<OwnerId>)],
	) -> Result<Report>
	where
		S: Store + ?Sized,
	{
		let mut sources = Vec::with_capacity(batch.len());

		for (source_id, targets) in batch {
			self.check_target_limit(targets)?;

			let source = store.object(*source_id)?;
			check_targets_linked(&*store, &source, targets)?;

			if source.kind().is_trigger() {
				check_template_linkage(&*store, &source)?;
				check_source_edges(&*store, &source)?;
			}

			sources.push((source, targets.clone()));
		}

		let report = Propagator::new(store, &self.config).run(&sources)?;

		info!(
			sources = sources.len(),
			created = report.created.len(),
			updated = report.updated.len(),
			rejected = report.rejected.len(),
			dropped_dependencies = report.dropped_dependencies.len(),
			"Propagation finished"
		);

		Ok(report)
	}

	/// Full validation of `proposed` with `removed` treated as already gone
	pub(crate) fn validate_replacement<S>(
		&self,
		store: &S,
		proposed: &[DependencyEdge],
		removed: &[DependencyEdge],
	) -> Result<()>
	where
		S: ConfigStore + ?Sized,
	{
		if proposed.is_empty() {
			return Ok(());
		}

		let topology = Topology::load(store, proposed, removed)?;
		dependency::validate(&topology, proposed).map_err(|violation| {
			warn!(%violation, edges = proposed.len(), "Rejected dependency edges");
			InheritanceError::from(violation)
		})
	}

	/// Re-derives the edges of every inherited descendant of `object`
	pub(crate) fn resync_dependencies<S>(&self, store: &mut S, object: ObjectId) -> Result<Report>
	where
		S: Store + ?Sized,
	{
		Propagator::new(store, &self.config).resync_descendants(object)
	}

	fn check_target_limit(&self, targets: &[OwnerId]) -> Result<()> {
		if let Some(limit) = self.config.target_limit() {
			if targets.len() > limit {
				return Err(InheritanceError::TargetLimitExceeded {
					requested: targets.len(),
					limit,
				});
			}
		}
		Ok(())
	}
}

/// Object kinds in the order they must be synchronized: whatever a kind binds to comes first
pub fn sync_kind_order() -> Result<Vec<ObjectKind>> {
	compute_order(ObjectKind::iter().map(|kind| (kind, kind.depends_on().to_vec())))
		.map_err(|e| InheritanceError::InvalidOperation(e.to_string()))
}

fn check_targets_linked<S>(store: &S, source: &ConfigObject, targets: &[OwnerId]) -> Result<()>
where
	S: ConfigStore + ?Sized,
{
	let linked = store.find_linked_owners(source.owner_id)?;

	match targets.iter().find(|target| !linked.contains(target)) {
		Some(target) => Err(InheritanceError::InvalidOperation(format!(
			"owner {target} is not linked to the owner of object {}",
			source.id
		))),
		None => Ok(()),
	}
}

/// A trigger reading items of several templates only goes where all of them go
fn check_template_linkage<S>(store: &S, source: &ConfigObject) -> Result<()>
where
	S: ConfigStore + ?Sized,
{
	let Some(trigger) = source.body.trigger() else {
		return Ok(());
	};

	let mut names = trigger.expression.hosts();
	if let Some(recovery) = &trigger.recovery_expression {
		names.extend(recovery.hosts());
	}

	let mut templates = Vec::new();
	for name in names {
		if let Some(owner) = store.owner_by_name(name)? {
			if owner.is_template() {
				templates.push(owner);
			}
		}
	}

	if templates.len() < 2 {
		return Ok(());
	}

	let mut linked_sets = Vec::with_capacity(templates.len());
	for template in &templates {
		let linked: BTreeSet<OwnerId> = store.find_linked_owners(template.id)?.into_iter().collect();
		linked_sets.push(linked);
	}

	if linked_sets.windows(2).all(|pair| pair[0] == pair[1]) {
		return Ok(());
	}

	debug!(trigger = %source.id, templates = templates.len(), "Templates linked to different owners");
	Err(InheritanceError::TemplateLinkageMismatch {
		trigger: source.id,
		templates: templates.into_iter().map(|owner| owner.name).collect(),
	})
}

/// Structural rules on the edges the source already has
fn check_source_edges<S>(store: &S, source: &ConfigObject) -> Result<()>
where
	S: ConfigStore + ?Sized,
{
	let edges = store.read_dependency_edges(&[source.id])?;
	if edges.is_empty() {
		return Ok(());
	}

	let topology = Topology::load(store, &edges, &edges)?;
	dependency::validate_structure(&topology, &edges)?;
	Ok(())
}
