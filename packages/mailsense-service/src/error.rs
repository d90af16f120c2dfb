pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Unauthorized: {message}")]
	Unauthorized { message: String },
	#[error("Mail credential rejected: {message}")]
	CredentialRejected { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<mailsense_storage::Error> for Error {
	fn from(err: mailsense_storage::Error) -> Self {
		match err {
			mailsense_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			mailsense_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			mailsense_storage::Error::NotFound(message) => Self::NotFound { message },
			mailsense_storage::Error::Conflict(message) => Self::Conflict { message },
		}
	}
}

impl Error {
	/// Upstream 401/403 means the caller's delegated credential is bad, which
	/// is the caller's problem, not an outage.
	pub(crate) fn from_provider(err: mailsense_providers::Error) -> Self {
		if err.is_credential_rejection() {
			Self::CredentialRejected { message: err.to_string() }
		} else {
			Self::Provider { message: err.to_string() }
		}
	}
}
