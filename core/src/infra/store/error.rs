use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
	#[error("{entity} {id} not found")]
	NotFound { entity: &'static str, id: String },

	#[error("Write failed: {0}")]
	WriteFailed(String),

	#[error("Constraint violation: {0}")]
	Constraint(String),

	#[error("Transaction error: {0}")]
	Transaction(String),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

impl StoreError {
	pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
		Self::NotFound {
			entity,
			id: id.to_string(),
		}
	}
}

pub type StoreResult<T> = Result<T, StoreError>;
