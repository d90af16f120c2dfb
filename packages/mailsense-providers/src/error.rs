pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("{message}")]
	InvalidConfig { message: String },
	#[error("{message}")]
	InvalidResponse { message: String },
	#[error("Upstream returned {status}: {message}")]
	Upstream { status: u16, message: String },
}
impl Error {
	/// True when the upstream rejected the caller's credential, as opposed to
	/// failing for its own reasons. The service maps this to a 400, not a 502.
	pub fn is_credential_rejection(&self) -> bool {
		match self {
			Self::Upstream { status, .. } => matches!(status, 401 | 403),
			Self::Reqwest(err) => matches!(err.status().map(|s| s.as_u16()), Some(401 | 403)),
			_ => false,
		}
	}
}
