use crate::domain::{DependencyEdge, Report};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetDependenciesOutput {
	pub added: Vec<DependencyEdge>,
	pub removed: Vec<DependencyEdge>,

	/// Edges re-derived on inherited copies, including the ones that had to be dropped
	pub report: Report,
}
