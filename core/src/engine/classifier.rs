//! Conflict classification
//!
//! Decides what a propagation step may do on one target. Consulted before every write.

use super::matcher::MatchResult;
use crate::domain::{ConfigObject, RejectReason};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
	Create,
	/// Refresh this tracked child
	UpdateInPlace(ConfigObject),
	Reject(RejectReason),
}

pub fn classify(matched: MatchResult, candidate: &ConfigObject) -> Action {
	match matched {
		MatchResult::None => Action::Create,
		MatchResult::ExistingInherited(existing) => {
			if existing.variant() != candidate.variant() {
				Action::Reject(RejectReason::TypeMismatch {
					key: candidate.natural_key().to_string(),
				})
			} else {
				Action::UpdateInPlace(existing)
			}
		}
		// Untracked objects are never overwritten, whatever their origin
		MatchResult::ExistingForeign(existing) => Action::Reject(RejectReason::ForeignObjectConflict {
			key: candidate.natural_key().to_string(),
			existing: existing.id,
		}),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::domain::{GraphBody, GraphType, ObjectBody, OwnerId};

	fn graph(graph_type: GraphType) -> ConfigObject {
		let mut body = GraphBody::new("Traffic", vec![]);
		body.graph_type = graph_type;
		ConfigObject::original(OwnerId::new(), ObjectBody::Graph(body))
	}

	#[test]
	fn test_rules() {
		let candidate = graph(GraphType::Normal);

		assert_eq!(classify(MatchResult::None, &candidate), Action::Create);

		let child = graph(GraphType::Normal);
		assert_eq!(
			classify(MatchResult::ExistingInherited(child.clone()), &candidate),
			Action::UpdateInPlace(child)
		);

		let pie = graph(GraphType::Pie);
		assert_eq!(
			classify(MatchResult::ExistingInherited(pie), &candidate),
			Action::Reject(RejectReason::TypeMismatch {
				key: "Traffic".to_string()
			})
		);

		let foreign = graph(GraphType::Normal);
		assert_eq!(
			classify(MatchResult::ExistingForeign(foreign.clone()), &candidate),
			Action::Reject(RejectReason::ForeignObjectConflict {
				key: "Traffic".to_string(),
				existing: foreign.id,
			})
		);
	}

	#[test]
	fn test_trigger_vs_prototype_is_mismatch() {
		use crate::domain::TriggerBody;
		use lineage_expression::Expression;

		let body = TriggerBody::new("Down", Expression::parse("last(/T/a)=0").unwrap());
		let candidate = ConfigObject::original(OwnerId::new(), ObjectBody::Trigger(body.clone()));
		let child = ConfigObject::original(OwnerId::new(), ObjectBody::TriggerPrototype(body));

		assert!(matches!(
			classify(MatchResult::ExistingInherited(child), &candidate),
			Action::Reject(RejectReason::TypeMismatch { .. })
		));
	}
}
