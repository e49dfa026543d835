#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("Not found: {0}")]
	NotFound(String),
	#[error("Conflict: {0}")]
	Conflict(String),
	#[error("Invalid stored vector: {0}")]
	InvalidVector(String),
}
impl Error {
	/// Maps constraint violations raised by a write into domain errors.
	pub fn from_write(err: sqlx::Error) -> Self {
		if let sqlx::Error::Database(db_err) = &err {
			if db_err.is_unique_violation() {
				return Self::Conflict(db_err.message().to_string());
			}
			if db_err.is_foreign_key_violation() || db_err.is_check_violation() {
				return Self::InvalidArgument(db_err.message().to_string());
			}
		}

		Self::Sqlx(err)
	}
}
