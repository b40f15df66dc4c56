//! Unified error handling for the engine

use crate::{
	domain::{ObjectId, OwnerId},
	engine::dependency::DependencyViolation,
	infra::store::StoreError,
};
use lineage_expression::ExpressionError;
use thiserror::Error;

/// Main error type for engine and operation calls
#[derive(Error, Debug)]
pub enum InheritanceError {
	#[error("No compatible {role} for \"{key}\" on \"{owner}\"")]
	NoCompatibleBinding {
		owner: String,
		role: String,
		key: String,
	},

	#[error("\"{key}\" already exists on \"{owner}\" with a different type")]
	TypeMismatch { owner: String, key: String },

	#[error("\"{key}\" already exists on \"{owner}\"")]
	ForeignObjectConflict { owner: String, key: String },

	/// Self, cycle, duplicate, boundary and lineage violations of a dependency write
	#[error("Invalid trigger dependency: {0}")]
	Dependency(#[from] DependencyViolation),

	/// A trigger spanning several templates whose linked owner sets differ
	#[error(
		"Trigger {trigger} belongs to templates with different linkages: {}",
		templates.join(", ")
	)]
	TemplateLinkageMismatch {
		trigger: ObjectId,
		templates: Vec<String>,
	},

	#[error("Storage failure: {0}")]
	Storage(#[from] StoreError),

	#[error("Invalid expression: {0}")]
	Expression(#[from] ExpressionError),

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("User \"{user}\" may not write to {} owner(s)", owners.len())]
	PermissionDenied { user: String, owners: Vec<OwnerId> },

	#[error("Cannot modify inherited object {0}, edit its template instead")]
	InheritedObjectReadOnly(ObjectId),

	#[error("Propagation to {requested} owners exceeds the limit of {limit}")]
	TargetLimitExceeded { requested: usize, limit: usize },

	#[error("Invalid operation: {0}")]
	InvalidOperation(String),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, InheritanceError>;
