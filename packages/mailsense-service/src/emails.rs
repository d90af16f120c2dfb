use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use mailsense_storage::{models::Employee, queries};

use crate::{MailsenseService, Result};

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEmailItem {
	pub email_id: Uuid,
	pub message_id: String,
	pub subject: String,
	pub body_preview: String,
	pub sender_name: Option<String>,
	pub sender_address: Option<String>,
	#[serde(with = "crate::time_serde")]
	pub received_at: OffsetDateTime,
	pub is_read: bool,
	pub importance: String,
	pub has_attachments: bool,
	pub sentiment: Option<String>,
	pub urgency_score: Option<i32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEmailsResponse {
	pub emails: Vec<RecentEmailItem>,
}

impl MailsenseService {
	pub async fn recent_emails(
		&self,
		employee: &Employee,
		limit: Option<u32>,
	) -> Result<RecentEmailsResponse> {
		let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
		let rows = queries::recent_emails(&self.db, employee.employee_id, limit as i64).await?;
		let emails = rows
			.into_iter()
			.map(|row| RecentEmailItem {
				email_id: row.email_id,
				message_id: row.message_id,
				subject: row.subject,
				body_preview: row.body_preview,
				sender_name: row.sender_name,
				sender_address: row.sender_address,
				received_at: row.received_at,
				is_read: row.is_read,
				importance: row.importance,
				has_attachments: row.has_attachments,
				sentiment: row.sentiment,
				urgency_score: row.urgency_score,
			})
			.collect();

		Ok(RecentEmailsResponse { emails })
	}
}
