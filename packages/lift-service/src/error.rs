pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<lift_storage::Error> for Error {
	fn from(err: lift_storage::Error) -> Self {
		match err {
			lift_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			lift_storage::Error::InvalidVector(message) => Self::Storage { message },
			lift_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			lift_storage::Error::NotFound(message) => Self::NotFound { message },
			lift_storage::Error::Conflict(message) => Self::Conflict { message },
		}
	}
}
impl From<lift_domain::paging::PagingError> for Error {
	fn from(err: lift_domain::paging::PagingError) -> Self {
		use lift_domain::paging::PagingError;

		let message = match err {
			PagingError::InvalidPage(raw) => format!("page must be an integer, got {raw:?}."),
			PagingError::InvalidPageSize(raw) =>
				format!("pageSize must be an integer, got {raw:?}."),
		};

		Self::InvalidRequest { message }
	}
}
