pub mod annotator;
pub mod graph;

mod error;

pub use error::{Error, Result};

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName};
use serde_json::{Map, Value};

const MAX_UPSTREAM_ERROR_CHARS: usize = 512;

pub fn bearer_headers(token: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, format!("Bearer {token}").parse()?);

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

pub(crate) async fn check_status(res: reqwest::Response) -> Result<reqwest::Response> {
	let status = res.status();

	if status.is_success() {
		return Ok(res);
	}

	let mut message = res.text().await.unwrap_or_default();

	if message.chars().count() > MAX_UPSTREAM_ERROR_CHARS {
		message = message.chars().take(MAX_UPSTREAM_ERROR_CHARS).collect();
		message.push_str("...");
	}

	Err(Error::Upstream { status: status.as_u16(), message })
}
