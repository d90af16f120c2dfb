use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Organization {
	pub org_id: Uuid,
	pub name: String,
	pub domain: String,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Employee {
	pub employee_id: Uuid,
	pub org_id: Uuid,
	pub email: String,
	pub display_name: String,
	pub department: Option<String>,
	pub job_title: Option<String>,
	pub last_sync_at: Option<OffsetDateTime>,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Email {
	pub email_id: Uuid,
	pub message_id: String,
	pub conversation_id: Option<String>,
	pub employee_id: Uuid,
	pub sender_address: Option<String>,
	pub sender_name: Option<String>,
	pub subject: String,
	pub body_preview: String,
	pub received_at: OffsetDateTime,
	pub is_read: bool,
	pub importance: String,
	pub has_attachments: bool,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmailAnalysis {
	pub analysis_id: Uuid,
	pub email_id: Uuid,
	pub sentiment: String,
	pub urgency_score: i32,
	pub topics: Vec<String>,
	pub action_items: Vec<String>,
	pub summary: String,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Task {
	pub task_id: Uuid,
	pub title: String,
	pub description: String,
	pub assigned_to: Uuid,
	pub status: String,
	pub priority: String,
	pub due_date: Option<Date>,
	pub confidence: f32,
	pub source_email_id: Uuid,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
	pub token: String,
	pub employee_id: Uuid,
	pub created_at: OffsetDateTime,
	pub expires_at: OffsetDateTime,
}

/// Recent-emails listing row: the email plus its analysis sentiment when one
/// exists.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmailWithSentiment {
	pub email_id: Uuid,
	pub message_id: String,
	pub subject: String,
	pub body_preview: String,
	pub sender_address: Option<String>,
	pub sender_name: Option<String>,
	pub received_at: OffsetDateTime,
	pub is_read: bool,
	pub importance: String,
	pub has_attachments: bool,
	pub sentiment: Option<String>,
	pub urgency_score: Option<i32>,
}
