//! Identifier newtypes
//!
//! Every record the engine touches is keyed by a random UUID. The newtypes keep owners, objects
//! and interfaces from being mixed up at call sites.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			/// Generate a fresh random identifier
			pub fn new() -> Self {
				Self(Uuid::new_v4())
			}

			pub fn as_uuid(&self) -> Uuid {
				self.0
			}
		}

		impl Default for $name {
			fn default() -> Self {
				Self::new()
			}
		}

		impl From<Uuid> for $name {
			fn from(uuid: Uuid) -> Self {
				Self(uuid)
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				self.0.fmt(f)
			}
		}
	};
}

define_id!(
	/// A host or a template
	OwnerId
);

define_id!(
	/// A propagated configuration object: item, discovery rule, prototype, trigger or graph
	ObjectId
);

define_id!(
	/// A host interface
	InterfaceId
);

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_ids_are_unique_and_transparent() {
		let a = ObjectId::new();
		let b = ObjectId::new();
		assert_ne!(a, b);

		let json = serde_json::to_string(&a).unwrap();
		assert_eq!(json, format!("\"{}\"", a.as_uuid()));
		assert_eq!(serde_json::from_str::<ObjectId>(&json).unwrap(), a);
	}
}
