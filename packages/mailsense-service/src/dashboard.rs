use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime};

use mailsense_storage::{models::Employee, queries};

use crate::{MailsenseService, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
	pub email_count: i64,
	pub task_count: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentBucket {
	pub sentiment: String,
	pub count: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentResponse {
	pub distribution: Vec<SentimentBucket>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayVolume {
	#[serde(with = "crate::time_serde::date")]
	pub day: Date,
	pub count: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeResponse {
	pub days: Vec<DayVolume>,
}

impl MailsenseService {
	pub async fn metrics(&self, employee: &Employee) -> Result<MetricsResponse> {
		let email_count = queries::email_count(&self.db, employee.org_id).await?;
		let task_count = queries::task_count(&self.db, employee.org_id).await?;

		Ok(MetricsResponse { email_count, task_count })
	}

	pub async fn sentiment(&self, employee: &Employee) -> Result<SentimentResponse> {
		let rows = queries::sentiment_distribution(&self.db, employee.org_id).await?;
		let distribution = rows
			.into_iter()
			.map(|(sentiment, count)| SentimentBucket { sentiment, count })
			.collect();

		Ok(SentimentResponse { distribution })
	}

	/// Per-day received counts over the requested window, zero-filled so the
	/// chart always renders a contiguous axis.
	pub async fn email_volume(
		&self,
		employee: &Employee,
		days: Option<u32>,
	) -> Result<VolumeResponse> {
		let days = days.unwrap_or(self.cfg.dashboard.volume_days).clamp(1, 90);
		let today = OffsetDateTime::now_utc().date();
		let start = today - Duration::days(days as i64 - 1);
		let since = start.midnight().assume_utc();
		let rows = queries::daily_email_volume(&self.db, employee.org_id, since).await?;

		Ok(VolumeResponse { days: fill_daily_volume(&rows, start, days) })
	}
}

fn fill_daily_volume(rows: &[(Date, i64)], start: Date, days: u32) -> Vec<DayVolume> {
	let counts: HashMap<Date, i64> = rows.iter().cloned().collect();

	(0..days)
		.map(|offset| {
			let day = start + Duration::days(offset as i64);

			DayVolume { day, count: counts.get(&day).copied().unwrap_or(0) }
		})
		.collect()
}
