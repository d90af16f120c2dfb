use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use uuid::Uuid;

use mailsense_domain::{annotation, sentiment::Sentiment, task::{TaskPriority, TaskStatus}};
use mailsense_providers::graph::GraphMessage;
use mailsense_storage::{
	models::{Email, EmailAnalysis, Employee, Task},
	queries,
};

use crate::{Error, MailsenseService, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
	pub access_token: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncOutcomeStatus {
	Stored,
	StoredWithoutAnalysis,
	Duplicate,
	Failed,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
	pub message_id: String,
	pub status: SyncOutcomeStatus,
	pub tasks_created: u32,
	pub tasks_discarded: u32,
	pub error: Option<String>,
}
impl SyncOutcome {
	fn stored(message_id: String, tasks_created: u32, tasks_discarded: u32) -> Self {
		Self {
			message_id,
			status: SyncOutcomeStatus::Stored,
			tasks_created,
			tasks_discarded,
			error: None,
		}
	}

	fn stored_without_analysis(message_id: String, error: String) -> Self {
		Self {
			message_id,
			status: SyncOutcomeStatus::StoredWithoutAnalysis,
			tasks_created: 0,
			tasks_discarded: 0,
			error: Some(error),
		}
	}

	fn duplicate(message_id: String) -> Self {
		Self {
			message_id,
			status: SyncOutcomeStatus::Duplicate,
			tasks_created: 0,
			tasks_discarded: 0,
			error: None,
		}
	}

	fn failed(message_id: String, error: String) -> Self {
		Self {
			message_id,
			status: SyncOutcomeStatus::Failed,
			tasks_created: 0,
			tasks_discarded: 0,
			error: Some(error),
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
	pub success: bool,
	pub processed_count: u32,
	pub total_fetched: u32,
	pub duplicate_count: u32,
	pub outcomes: Vec<SyncOutcome>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
struct AnnotationOutput {
	summary: Option<String>,
	sentiment: Option<String>,
	urgency: Option<i64>,
	#[serde(default)]
	topics: Vec<String>,
	#[serde(default)]
	action_items: Vec<String>,
	#[serde(default)]
	tasks: Vec<ExtractedTask>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
struct ExtractedTask {
	title: Option<String>,
	description: Option<String>,
	assignee_hint: Option<String>,
	due_date: Option<String>,
	priority: Option<String>,
	confidence: Option<f32>,
}

impl MailsenseService {
	/// One sync pass: validate the credential, fetch one page of messages,
	/// skip everything already stored, persist and annotate the rest, then
	/// stamp the employee's last sync time. Per-message failures are
	/// isolated; only credential validation and the page fetch can fail the
	/// whole call.
	pub async fn sync(&self, employee: &Employee, req: SyncRequest) -> Result<SyncResponse> {
		if req.access_token.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: "accessToken must be non-empty.".to_string(),
			});
		}

		let graph_cfg = &self.cfg.providers.graph;
		let _profile = self
			.providers
			.mail
			.profile(graph_cfg, &req.access_token)
			.await
			.map_err(Error::from_provider)?;
		let messages = self
			.providers
			.mail
			.recent_messages(graph_cfg, &req.access_token)
			.await
			.map_err(Error::from_provider)?;
		let total_fetched = messages.len() as u32;
		let page_ids: Vec<String> = messages.iter().map(|message| message.id.clone()).collect();
		let known: HashSet<String> =
			queries::existing_message_ids(&self.db, &page_ids).await?.into_iter().collect();
		let mut outcomes = Vec::with_capacity(messages.len());

		for message in &messages {
			if known.contains(&message.id) {
				outcomes.push(SyncOutcome::duplicate(message.id.clone()));

				continue;
			}

			outcomes.push(self.ingest_message(employee, message).await);
		}

		let now = OffsetDateTime::now_utc();

		queries::update_last_sync(&self.db, employee.employee_id, now).await?;

		let (processed_count, duplicate_count) = tally(&outcomes);

		tracing::info!(
			employee = %employee.email,
			processed = processed_count,
			duplicates = duplicate_count,
			total = total_fetched,
			"Mailbox sync finished."
		);

		Ok(SyncResponse {
			success: true,
			processed_count,
			total_fetched,
			duplicate_count,
			outcomes,
		})
	}

	async fn ingest_message(&self, employee: &Employee, message: &GraphMessage) -> SyncOutcome {
		let now = OffsetDateTime::now_utc();
		let email = email_row(employee, message, now);

		match queries::insert_email(&self.db, &email).await {
			Ok(true) => {},
			// A concurrent sync for the same mailbox won the insert race.
			Ok(false) => return SyncOutcome::duplicate(message.id.clone()),
			Err(err) => {
				tracing::error!(error = %err, message_id = %message.id, "Failed to persist email.");

				return SyncOutcome::failed(message.id.clone(), err.to_string());
			},
		}

		match self.annotate_and_persist(employee, message, &email).await {
			Ok((tasks_created, tasks_discarded)) =>
				SyncOutcome::stored(message.id.clone(), tasks_created, tasks_discarded),
			Err(err) => {
				tracing::warn!(
					error = %err,
					message_id = %message.id,
					"Annotation failed. Email stored without analysis."
				);

				SyncOutcome::stored_without_analysis(message.id.clone(), err.to_string())
			},
		}
	}

	async fn annotate_and_persist(
		&self,
		employee: &Employee,
		message: &GraphMessage,
		email: &Email,
	) -> Result<(u32, u32)> {
		let messages_json =
			build_annotator_messages(message, self.cfg.ingest.max_tasks_per_email);
		let raw = self
			.providers
			.annotator
			.annotate(&self.cfg.providers.annotator, &messages_json)
			.await
			.map_err(Error::from_provider)?;
		let output: AnnotationOutput = parse_annotation(raw)?;
		let Some(sentiment) = output.sentiment.as_deref().and_then(Sentiment::parse_label) else {
			return Err(Error::Provider {
				message: "Annotator returned an unknown sentiment label.".to_string(),
			});
		};

		let now = OffsetDateTime::now_utc();
		let analysis = EmailAnalysis {
			analysis_id: Uuid::new_v4(),
			email_id: email.email_id,
			sentiment: sentiment.as_str().to_string(),
			urgency_score: annotation::clamp_urgency(output.urgency.unwrap_or(0)),
			topics: output.topics,
			action_items: output.action_items,
			summary: output.summary.unwrap_or_default(),
			created_at: now,
		};
		let threshold = self.cfg.ingest.task_confidence_threshold;
		let max_tasks = self.cfg.ingest.max_tasks_per_email as usize;
		let mut tasks = Vec::new();
		let mut tasks_discarded = 0_u32;

		for extracted in output.tasks.into_iter().take(max_tasks) {
			let confidence = extracted.confidence.unwrap_or(0.0);

			if !annotation::meets_confidence(confidence, threshold) {
				tasks_discarded += 1;

				continue;
			}

			let assigned_to = self.resolve_assignee(employee, extracted.assignee_hint.as_deref()).await;

			tasks.push(task_row(extracted, confidence, assigned_to, email.email_id, now));
		}

		let mut tx = self.db.pool.begin().await?;

		queries::insert_analysis_tx(&mut tx, &analysis).await?;

		for task in &tasks {
			queries::insert_task_tx(&mut tx, task).await?;
		}

		tx.commit().await?;

		Ok((tasks.len() as u32, tasks_discarded))
	}

	/// An assignee hint only sticks when it names a mailbox already known in
	/// the caller's organization; otherwise the syncing employee owns the
	/// task.
	async fn resolve_assignee(&self, employee: &Employee, hint: Option<&str>) -> Uuid {
		let Some(hint) = hint.map(str::trim).filter(|hint| hint.contains('@')) else {
			return employee.employee_id;
		};
		let hint = hint.to_ascii_lowercase();

		match queries::find_employee_by_email(&self.db, employee.org_id, &hint).await {
			Ok(Some(assignee)) => assignee.employee_id,
			Ok(None) => employee.employee_id,
			Err(err) => {
				tracing::warn!(error = %err, "Assignee lookup failed. Assigning to the caller.");

				employee.employee_id
			},
		}
	}
}

fn tally(outcomes: &[SyncOutcome]) -> (u32, u32) {
	let mut processed = 0_u32;
	let mut duplicates = 0_u32;

	for outcome in outcomes {
		match outcome.status {
			SyncOutcomeStatus::Stored | SyncOutcomeStatus::StoredWithoutAnalysis => processed += 1,
			SyncOutcomeStatus::Duplicate => duplicates += 1,
			SyncOutcomeStatus::Failed => {},
		}
	}

	(processed, duplicates)
}

fn email_row(employee: &Employee, message: &GraphMessage, now: OffsetDateTime) -> Email {
	let received_at = message
		.received_date_time
		.as_deref()
		.and_then(|raw| OffsetDateTime::parse(raw, &Rfc3339).ok())
		.unwrap_or(now);

	Email {
		email_id: Uuid::new_v4(),
		message_id: message.id.clone(),
		conversation_id: message.conversation_id.clone(),
		employee_id: employee.employee_id,
		sender_address: message.sender_address().map(str::to_string),
		sender_name: message.sender_name().map(str::to_string),
		subject: message.subject.clone().unwrap_or_default(),
		body_preview: message.body_preview.clone().unwrap_or_default(),
		received_at,
		is_read: message.is_read,
		importance: message.importance.clone().unwrap_or_else(|| "normal".to_string()),
		has_attachments: message.has_attachments,
		created_at: now,
	}
}

fn task_row(
	extracted: ExtractedTask,
	confidence: f32,
	assigned_to: Uuid,
	source_email_id: Uuid,
	now: OffsetDateTime,
) -> Task {
	Task {
		task_id: Uuid::new_v4(),
		title: extracted.title.unwrap_or_else(|| "Untitled task".to_string()),
		description: extracted.description.unwrap_or_default(),
		assigned_to,
		status: TaskStatus::Identified.as_str().to_string(),
		priority: TaskPriority::parse_label_lenient(extracted.priority.as_deref())
			.as_str()
			.to_string(),
		due_date: extracted.due_date.as_deref().and_then(annotation::parse_due_date),
		confidence,
		source_email_id,
		created_at: now,
		updated_at: now,
	}
}

fn parse_annotation(raw: Value) -> Result<AnnotationOutput> {
	serde_json::from_value(raw).map_err(|_| Error::Provider {
		message: "Annotator output does not match the expected shape.".to_string(),
	})
}

fn build_annotator_messages(message: &GraphMessage, max_tasks: u32) -> Vec<Value> {
	let schema = serde_json::json!({
		"summary": "string",
		"sentiment": "positive|negative|neutral",
		"urgency": "integer 0-10",
		"topics": ["string"],
		"action_items": ["string"],
		"tasks": [
			{
				"title": "string",
				"description": "string",
				"assignee_hint": "mail address or null",
				"due_date": "YYYY-MM-DD or null",
				"priority": "low|medium|high",
				"confidence": 0.0
			}
		]
	});
	let system_prompt = "You are an email analysis engine for a team dashboard. \
Output must be valid JSON only and must match the provided schema exactly. \
Classify the overall sentiment as positive, negative, or neutral and rate urgency as an integer from 0 to 10. \
Extract at most MAX_TASKS concrete, actionable tasks, each with a confidence between 0 and 1; omit vague or speculative items. \
Use the recipient list to fill assignee_hint with a mail address, or null when unclear. \
Only emit a due_date when the email states one, formatted YYYY-MM-DD. \
If the email contains no actionable content, return an empty tasks array.";
	let recipients: Vec<&str> = message
		.to_recipients
		.iter()
		.filter_map(|recipient| recipient.email_address.as_ref()?.address.as_deref())
		.collect();
	let user_prompt = format!(
		"Return JSON matching this exact schema:\n{schema}\nConstraints:\n- MAX_TASKS = {max_tasks}\nSubject: {subject}\nFrom: {sender}\nTo: {recipients}\nBody:\n{body}",
		subject = message.subject.as_deref().unwrap_or(""),
		sender = message.sender_address().unwrap_or(""),
		recipients = recipients.join(", "),
		body = message.body_preview.as_deref().unwrap_or(""),
	);

	vec![
		serde_json::json!({ "role": "system", "content": system_prompt }),
		serde_json::json!({ "role": "user", "content": user_prompt }),
	]
}
