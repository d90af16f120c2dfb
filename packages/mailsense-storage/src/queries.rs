use sqlx::{Executor, Postgres, Transaction};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::{
	Result,
	db::Db,
	models::{Email, EmailAnalysis, EmailWithSentiment, Employee, Organization, Session, Task},
};

const EMPLOYEE_COLUMNS: &str = "\
employee_id, org_id, email, display_name, department, job_title, last_sync_at, created_at";

const TASK_COLUMNS: &str = "\
task_id, title, description, assigned_to, status, priority, due_date, confidence, \
source_email_id, created_at, updated_at";

pub async fn find_or_create_organization(
	db: &Db,
	name: &str,
	domain: &str,
	now: OffsetDateTime,
) -> Result<Organization> {
	sqlx::query(
		"\
INSERT INTO organizations (org_id, name, domain, created_at)
VALUES ($1, $2, $3, $4)
ON CONFLICT (domain) DO NOTHING",
	)
	.bind(Uuid::new_v4())
	.bind(name)
	.bind(domain)
	.bind(now)
	.execute(&db.pool)
	.await?;

	let org = sqlx::query_as::<_, Organization>(
		"SELECT org_id, name, domain, created_at FROM organizations WHERE domain = $1",
	)
	.bind(domain)
	.fetch_one(&db.pool)
	.await?;

	Ok(org)
}

/// Lazily creates the employee on first sign-in and refreshes the mutable
/// profile fields on every later one. The organization assignment never moves.
pub async fn upsert_employee(
	db: &Db,
	org_id: Uuid,
	email: &str,
	display_name: &str,
	department: Option<&str>,
	job_title: Option<&str>,
	now: OffsetDateTime,
) -> Result<Employee> {
	let employee = sqlx::query_as::<_, Employee>(&format!(
		"\
INSERT INTO employees (employee_id, org_id, email, display_name, department, job_title, created_at)
VALUES ($1, $2, $3, $4, $5, $6, $7)
ON CONFLICT (email) DO UPDATE
SET
	display_name = EXCLUDED.display_name,
	department = EXCLUDED.department,
	job_title = EXCLUDED.job_title
RETURNING {EMPLOYEE_COLUMNS}"
	))
	.bind(Uuid::new_v4())
	.bind(org_id)
	.bind(email)
	.bind(display_name)
	.bind(department)
	.bind(job_title)
	.bind(now)
	.fetch_one(&db.pool)
	.await?;

	Ok(employee)
}

pub async fn find_employee_by_email(
	db: &Db,
	org_id: Uuid,
	email: &str,
) -> Result<Option<Employee>> {
	let employee = sqlx::query_as::<_, Employee>(&format!(
		"SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE org_id = $1 AND email = $2"
	))
	.bind(org_id)
	.bind(email)
	.fetch_optional(&db.pool)
	.await?;

	Ok(employee)
}

pub async fn update_last_sync(db: &Db, employee_id: Uuid, now: OffsetDateTime) -> Result<()> {
	sqlx::query("UPDATE employees SET last_sync_at = $1 WHERE employee_id = $2")
		.bind(now)
		.bind(employee_id)
		.execute(&db.pool)
		.await?;

	Ok(())
}

pub async fn team(db: &Db, org_id: Uuid) -> Result<Vec<Employee>> {
	let employees = sqlx::query_as::<_, Employee>(&format!(
		"SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE org_id = $1 ORDER BY display_name"
	))
	.bind(org_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(employees)
}

pub async fn insert_session(db: &Db, session: &Session) -> Result<()> {
	sqlx::query(
		"INSERT INTO sessions (token, employee_id, created_at, expires_at) VALUES ($1, $2, $3, $4)",
	)
	.bind(&session.token)
	.bind(session.employee_id)
	.bind(session.created_at)
	.bind(session.expires_at)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn fetch_session_employee(
	db: &Db,
	token: &str,
	now: OffsetDateTime,
) -> Result<Option<Employee>> {
	let employee = sqlx::query_as::<_, Employee>(
		"\
SELECT
	e.employee_id, e.org_id, e.email, e.display_name, e.department, e.job_title,
	e.last_sync_at, e.created_at
FROM sessions s
JOIN employees e ON e.employee_id = s.employee_id
WHERE s.token = $1 AND s.expires_at > $2",
	)
	.bind(token)
	.bind(now)
	.fetch_optional(&db.pool)
	.await?;

	Ok(employee)
}

pub async fn purge_expired_sessions(
	db: &Db,
	employee_id: Uuid,
	now: OffsetDateTime,
) -> Result<u64> {
	let result = sqlx::query("DELETE FROM sessions WHERE employee_id = $1 AND expires_at <= $2")
		.bind(employee_id)
		.bind(now)
		.execute(&db.pool)
		.await?;

	Ok(result.rows_affected())
}

/// Which of the fetched page's message ids are already stored. The sync loop
/// checks the whole page up front instead of trusting a last-row lookback.
pub async fn existing_message_ids(db: &Db, message_ids: &[String]) -> Result<Vec<String>> {
	if message_ids.is_empty() {
		return Ok(Vec::new());
	}

	let known = sqlx::query_scalar::<_, String>(
		"SELECT message_id FROM emails WHERE message_id = ANY($1)",
	)
	.bind(message_ids)
	.fetch_all(&db.pool)
	.await?;

	Ok(known)
}

/// Returns false when the unique constraint on message_id absorbed the insert,
/// which is how a concurrent sync for the same mailbox shows up.
pub async fn insert_email(db: &Db, email: &Email) -> Result<bool> {
	let result = sqlx::query(
		"\
INSERT INTO emails (
	email_id,
	message_id,
	conversation_id,
	employee_id,
	sender_address,
	sender_name,
	subject,
	body_preview,
	received_at,
	is_read,
	importance,
	has_attachments,
	created_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
ON CONFLICT (message_id) DO NOTHING",
	)
	.bind(email.email_id)
	.bind(&email.message_id)
	.bind(&email.conversation_id)
	.bind(email.employee_id)
	.bind(&email.sender_address)
	.bind(&email.sender_name)
	.bind(&email.subject)
	.bind(&email.body_preview)
	.bind(email.received_at)
	.bind(email.is_read)
	.bind(&email.importance)
	.bind(email.has_attachments)
	.bind(email.created_at)
	.execute(&db.pool)
	.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn insert_analysis(db: &Db, analysis: &EmailAnalysis) -> Result<()> {
	insert_analysis_exec(&db.pool, analysis).await
}

pub async fn insert_analysis_tx(
	tx: &mut Transaction<'_, Postgres>,
	analysis: &EmailAnalysis,
) -> Result<()> {
	insert_analysis_exec(&mut **tx, analysis).await
}

pub async fn insert_task(db: &Db, task: &Task) -> Result<()> {
	insert_task_exec(&db.pool, task).await
}

pub async fn insert_task_tx(tx: &mut Transaction<'_, Postgres>, task: &Task) -> Result<()> {
	insert_task_exec(&mut **tx, task).await
}

pub async fn update_task_status(
	db: &Db,
	task_id: Uuid,
	org_id: Uuid,
	status: &str,
	now: OffsetDateTime,
) -> Result<u64> {
	let result = sqlx::query(
		"\
UPDATE tasks
SET status = $1, updated_at = $2
WHERE task_id = $3
	AND assigned_to IN (SELECT employee_id FROM employees WHERE org_id = $4)",
	)
	.bind(status)
	.bind(now)
	.bind(task_id)
	.bind(org_id)
	.execute(&db.pool)
	.await?;

	Ok(result.rows_affected())
}

pub async fn recent_tasks(db: &Db, org_id: Uuid, limit: i64) -> Result<Vec<Task>> {
	let tasks = sqlx::query_as::<_, Task>(&format!(
		"\
SELECT {TASK_COLUMNS}
FROM tasks
WHERE assigned_to IN (SELECT employee_id FROM employees WHERE org_id = $1)
ORDER BY created_at DESC
LIMIT $2"
	))
	.bind(org_id)
	.bind(limit)
	.fetch_all(&db.pool)
	.await?;

	Ok(tasks)
}

pub async fn recent_emails(
	db: &Db,
	employee_id: Uuid,
	limit: i64,
) -> Result<Vec<EmailWithSentiment>> {
	let emails = sqlx::query_as::<_, EmailWithSentiment>(
		"\
SELECT
	e.email_id,
	e.message_id,
	e.subject,
	e.body_preview,
	e.sender_address,
	e.sender_name,
	e.received_at,
	e.is_read,
	e.importance,
	e.has_attachments,
	a.sentiment,
	a.urgency_score
FROM emails e
LEFT JOIN email_analysis a ON a.email_id = e.email_id
WHERE e.employee_id = $1
ORDER BY e.received_at DESC
LIMIT $2",
	)
	.bind(employee_id)
	.bind(limit)
	.fetch_all(&db.pool)
	.await?;

	Ok(emails)
}

pub async fn email_count(db: &Db, org_id: Uuid) -> Result<i64> {
	let count = sqlx::query_scalar::<_, i64>(
		"\
SELECT COUNT(*)
FROM emails e
JOIN employees emp ON emp.employee_id = e.employee_id
WHERE emp.org_id = $1",
	)
	.bind(org_id)
	.fetch_one(&db.pool)
	.await?;

	Ok(count)
}

pub async fn task_count(db: &Db, org_id: Uuid) -> Result<i64> {
	let count = sqlx::query_scalar::<_, i64>(
		"\
SELECT COUNT(*)
FROM tasks t
JOIN employees emp ON emp.employee_id = t.assigned_to
WHERE emp.org_id = $1",
	)
	.bind(org_id)
	.fetch_one(&db.pool)
	.await?;

	Ok(count)
}

pub async fn analyzed_email_count(db: &Db, org_id: Uuid) -> Result<i64> {
	let count = sqlx::query_scalar::<_, i64>(
		"\
SELECT COUNT(*)
FROM email_analysis a
JOIN emails e ON e.email_id = a.email_id
JOIN employees emp ON emp.employee_id = e.employee_id
WHERE emp.org_id = $1",
	)
	.bind(org_id)
	.fetch_one(&db.pool)
	.await?;

	Ok(count)
}

pub async fn sentiment_distribution(db: &Db, org_id: Uuid) -> Result<Vec<(String, i64)>> {
	let rows = sqlx::query_as::<_, (String, i64)>(
		"\
SELECT a.sentiment, COUNT(*)
FROM email_analysis a
JOIN emails e ON e.email_id = a.email_id
JOIN employees emp ON emp.employee_id = e.employee_id
WHERE emp.org_id = $1
GROUP BY a.sentiment
ORDER BY a.sentiment",
	)
	.bind(org_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn daily_email_volume(
	db: &Db,
	org_id: Uuid,
	since: OffsetDateTime,
) -> Result<Vec<(Date, i64)>> {
	let rows = sqlx::query_as::<_, (Date, i64)>(
		"\
SELECT (e.received_at AT TIME ZONE 'UTC')::date AS day, COUNT(*)
FROM emails e
JOIN employees emp ON emp.employee_id = e.employee_id
WHERE emp.org_id = $1 AND e.received_at >= $2
GROUP BY day
ORDER BY day",
	)
	.bind(org_id)
	.bind(since)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

async fn insert_analysis_exec<'e, E>(executor: E, analysis: &EmailAnalysis) -> Result<()>
where
	E: Executor<'e, Database = Postgres>,
{
	sqlx::query(
		"\
INSERT INTO email_analysis (
	analysis_id,
	email_id,
	sentiment,
	urgency_score,
	topics,
	action_items,
	summary,
	created_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
	)
	.bind(analysis.analysis_id)
	.bind(analysis.email_id)
	.bind(&analysis.sentiment)
	.bind(analysis.urgency_score)
	.bind(&analysis.topics)
	.bind(&analysis.action_items)
	.bind(&analysis.summary)
	.bind(analysis.created_at)
	.execute(executor)
	.await?;

	Ok(())
}

async fn insert_task_exec<'e, E>(executor: E, task: &Task) -> Result<()>
where
	E: Executor<'e, Database = Postgres>,
{
	sqlx::query(
		"\
INSERT INTO tasks (
	task_id,
	title,
	description,
	assigned_to,
	status,
	priority,
	due_date,
	confidence,
	source_email_id,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
	)
	.bind(task.task_id)
	.bind(&task.title)
	.bind(&task.description)
	.bind(task.assigned_to)
	.bind(&task.status)
	.bind(&task.priority)
	.bind(task.due_date)
	.bind(task.confidence)
	.bind(task.source_email_id)
	.bind(task.created_at)
	.bind(task.updated_at)
	.execute(executor)
	.await?;

	Ok(())
}
