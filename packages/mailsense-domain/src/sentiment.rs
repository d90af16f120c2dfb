use serde::{Deserialize, Serialize};

/// The three labels the dashboard aggregates over. Anything else coming back
/// from the annotator is treated as an invalid annotation, not coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
	Positive,
	Negative,
	Neutral,
}

impl Sentiment {
	pub fn parse_label(label: &str) -> Option<Self> {
		match label.trim().to_ascii_lowercase().as_str() {
			"positive" => Some(Self::Positive),
			"negative" => Some(Self::Negative),
			"neutral" => Some(Self::Neutral),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Positive => "positive",
			Self::Negative => "negative",
			Self::Neutral => "neutral",
		}
	}
}
