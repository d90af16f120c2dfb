use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
	Identified,
	InProgress,
	Completed,
}

impl TaskStatus {
	pub fn parse_label(label: &str) -> Option<Self> {
		match label.trim().to_ascii_lowercase().as_str() {
			"identified" => Some(Self::Identified),
			"in_progress" => Some(Self::InProgress),
			"completed" => Some(Self::Completed),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Identified => "identified",
			Self::InProgress => "in_progress",
			Self::Completed => "completed",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
	Low,
	Medium,
	High,
}

impl TaskPriority {
	/// Priorities come from the annotator as free text. Unknown labels fall
	/// back to medium instead of dropping the task.
	pub fn parse_label_lenient(label: Option<&str>) -> Self {
		match label.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
			Some("low") => Self::Low,
			Some("high") | Some("urgent") | Some("critical") => Self::High,
			_ => Self::Medium,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Low => "low",
			Self::Medium => "medium",
			Self::High => "high",
		}
	}
}
