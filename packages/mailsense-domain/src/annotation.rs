use time::{Date, macros::format_description};

/// An extracted task is persisted only when its confidence is strictly above
/// the configured threshold.
pub fn meets_confidence(confidence: f32, threshold: f32) -> bool {
	confidence.is_finite() && confidence > threshold
}

/// Urgency is stored as an integer 0-10; the annotator occasionally returns
/// values outside the requested range.
pub fn clamp_urgency(urgency: i64) -> i32 {
	urgency.clamp(0, 10) as i32
}

/// Due dates are requested as ISO `YYYY-MM-DD`. Anything else ("next Friday",
/// empty strings) becomes None rather than failing the task.
pub fn parse_due_date(raw: &str) -> Option<Date> {
	let format = format_description!("[year]-[month]-[day]");

	Date::parse(raw.trim(), &format).ok()
}
