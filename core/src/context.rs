//! Identity of the caller behind a configuration write.
//!
//! Passed explicitly into every public entry point. Nothing in the crate reads the current user
//! from anywhere else.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use tracing::{info_span, Span};
use uuid::Uuid;

#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UserRole {
	SuperAdmin,
	Admin,
	User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerContext {
	pub user: String,
	pub role: UserRole,
	/// Correlates every log line of one request
	pub request_id: Uuid,
}

impl CallerContext {
	pub fn new(user: impl Into<String>, role: UserRole) -> Self {
		Self {
			user: user.into(),
			role,
			request_id: Uuid::new_v4(),
		}
	}

	pub fn super_admin(user: impl Into<String>) -> Self {
		Self::new(user, UserRole::SuperAdmin)
	}

	pub fn is_super_admin(&self) -> bool {
		self.role == UserRole::SuperAdmin
	}

	/// Span every operation of this request runs in
	pub fn span(&self, operation: &'static str) -> Span {
		info_span!(
			"request",
			operation,
			user = %self.user,
			role = %self.role,
			request_id = %self.request_id,
		)
	}
}
