use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use mailsense_domain::task::TaskStatus;
use mailsense_storage::{models::Employee, queries};

use crate::{Error, MailsenseService, Result};

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskItem {
	pub task_id: Uuid,
	pub title: String,
	pub description: String,
	pub assigned_to: Uuid,
	pub status: String,
	pub priority: String,
	#[serde(with = "crate::time_serde::date::option")]
	pub due_date: Option<Date>,
	pub confidence: f32,
	pub source_email_id: Uuid,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentTasksResponse {
	pub tasks: Vec<TaskItem>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusRequest {
	pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusResponse {
	pub task_id: Uuid,
	pub status: String,
}

impl MailsenseService {
	pub async fn recent_tasks(
		&self,
		employee: &Employee,
		limit: Option<u32>,
	) -> Result<RecentTasksResponse> {
		let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
		let rows = queries::recent_tasks(&self.db, employee.org_id, limit as i64).await?;
		let tasks = rows
			.into_iter()
			.map(|task| TaskItem {
				task_id: task.task_id,
				title: task.title,
				description: task.description,
				assigned_to: task.assigned_to,
				status: task.status,
				priority: task.priority,
				due_date: task.due_date,
				confidence: task.confidence,
				source_email_id: task.source_email_id,
				created_at: task.created_at,
			})
			.collect();

		Ok(RecentTasksResponse { tasks })
	}

	/// Status updates are org-scoped and report a missing task as 404 rather
	/// than succeeding with zero rows affected.
	pub async fn update_task_status(
		&self,
		employee: &Employee,
		task_id: Uuid,
		req: TaskStatusRequest,
	) -> Result<TaskStatusResponse> {
		let Some(status) = TaskStatus::parse_label(&req.status) else {
			return Err(Error::InvalidRequest {
				message: format!("Unknown task status label: {}.", req.status),
			});
		};

		let now = OffsetDateTime::now_utc();
		let affected = queries::update_task_status(
			&self.db,
			task_id,
			employee.org_id,
			status.as_str(),
			now,
		)
		.await?;

		if affected == 0 {
			return Err(Error::NotFound { message: format!("Task {task_id} does not exist.") });
		}

		tracing::info!(task = %task_id, status = status.as_str(), "Task status updated.");

		Ok(TaskStatusResponse { task_id, status: status.as_str().to_string() })
	}
}
