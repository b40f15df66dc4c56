//!
//! # Template inheritance engine
//!
//! Templates own items, discovery rules, item and host prototypes, triggers and graphs. Linking
//! a host (or another template) to a template gives it a copy of each of those objects, bound to
//! its own interfaces and items and kept in step whenever the template changes.
//!
//! The crate is layered:
//! - [`domain`]: owners, objects, bindings, dependency edges and the propagation report
//! - [`infra::store`]: the storage collaborator contract plus an in-memory transactional store
//! - [`engine`]: matching, binding resolution, conflict classification, dependency validation
//!   and the recursive propagator behind [`InheritanceEngine`]
//! - [`ops`]: caller operations dispatched through the [`ActionManager`], one permission check
//!   and one transaction each
//!
//! ```
//! use lineage_core::{CallerContext, InMemoryStore, InheritanceEngine};
//!
//! let mut store = InMemoryStore::new();
//! let template = store.add_template("Template OS");
//! let host = store.add_host("web-01");
//! store.add_link(host, template);
//!
//! let engine = InheritanceEngine::default();
//! let ctx = CallerContext::super_admin("admin");
//! assert!(engine.validate_dependencies(&ctx, &store, &[]).is_ok());
//! ```

#![warn(
	clippy::all,
	clippy::correctness,
	clippy::perf,
	clippy::style,
	clippy::suspicious,
	clippy::complexity,
	clippy::unwrap_used,
	unused_qualifications,
	rust_2018_idioms,
	trivial_casts,
	trivial_numeric_casts,
	unused_allocation,
	deprecated
)]

pub mod common;
pub mod config;
pub mod context;
pub mod domain;
pub mod engine;
pub mod infra;
pub mod ops;

pub use common::{InheritanceError, Result};
pub use config::{EngineConfig, LoggingConfig};
pub use context::{CallerContext, UserRole};
pub use domain::Report;
pub use engine::InheritanceEngine;
pub use infra::{
	action::{ActionManager, EngineAction},
	logging::init_tracing,
	store::{ConfigStore, InMemoryStore, Store, StoreError, Transactional},
};
