mod dashboard;
mod sessions;
mod sync_flow;
mod task_status;

use std::sync::{
	Arc, Mutex,
	atomic::{AtomicUsize, Ordering},
};

use serde_json::{Map, Value};

use mailsense_config::{
	AnnotatorConfig, Config, Dashboard, GraphConfig, Ingest, Postgres, Security, Service, Storage,
};
use mailsense_providers::graph::{GraphEmailAddress, GraphMessage, GraphProfile, GraphRecipient};
use mailsense_service::{
	AnnotatorProvider, BoxFuture, MailProvider, MailsenseService, ProviderResult, Providers,
	SignInRequest,
};
use mailsense_storage::{db::Db, models::Employee};
use mailsense_testkit::TestDatabase;

pub struct StubMail {
	pub profile: GraphProfile,
	pub messages: Vec<GraphMessage>,
}
impl MailProvider for StubMail {
	fn profile<'a>(
		&'a self,
		_cfg: &'a GraphConfig,
		_access_token: &'a str,
	) -> BoxFuture<'a, ProviderResult<GraphProfile>> {
		let profile = self.profile.clone();

		Box::pin(async move { Ok(profile) })
	}

	fn recent_messages<'a>(
		&'a self,
		_cfg: &'a GraphConfig,
		_access_token: &'a str,
	) -> BoxFuture<'a, ProviderResult<Vec<GraphMessage>>> {
		let messages = self.messages.clone();

		Box::pin(async move { Ok(messages) })
	}
}

/// Fails every call the way Graph fails an expired delegated token.
pub struct RejectingMail;
impl MailProvider for RejectingMail {
	fn profile<'a>(
		&'a self,
		_cfg: &'a GraphConfig,
		_access_token: &'a str,
	) -> BoxFuture<'a, ProviderResult<GraphProfile>> {
		Box::pin(async move { Err(rejected_credential()) })
	}

	fn recent_messages<'a>(
		&'a self,
		_cfg: &'a GraphConfig,
		_access_token: &'a str,
	) -> BoxFuture<'a, ProviderResult<Vec<GraphMessage>>> {
		Box::pin(async move { Err(rejected_credential()) })
	}
}

pub struct StubAnnotator {
	pub payload: Value,
}
impl AnnotatorProvider for StubAnnotator {
	fn annotate<'a>(
		&'a self,
		_cfg: &'a AnnotatorConfig,
		_messages: &'a [Value],
	) -> BoxFuture<'a, ProviderResult<Value>> {
		let payload = self.payload.clone();

		Box::pin(async move { Ok(payload) })
	}
}

/// Returns the queued responses in order; None entries fail that call. Calls
/// past the end of the queue return an empty neutral annotation.
pub struct SequenceAnnotator {
	pub responses: Mutex<Vec<Option<Value>>>,
	pub calls: Arc<AtomicUsize>,
}
impl SequenceAnnotator {
	pub fn new(responses: Vec<Option<Value>>) -> Self {
		Self { responses: Mutex::new(responses), calls: Arc::new(AtomicUsize::new(0)) }
	}
}
impl AnnotatorProvider for SequenceAnnotator {
	fn annotate<'a>(
		&'a self,
		_cfg: &'a AnnotatorConfig,
		_messages: &'a [Value],
	) -> BoxFuture<'a, ProviderResult<Value>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let next = {
			let mut queue = self.responses.lock().unwrap_or_else(|err| err.into_inner());

			if queue.is_empty() { None } else { Some(queue.remove(0)) }
		};

		Box::pin(async move {
			match next {
				Some(Some(payload)) => Ok(payload),
				Some(None) => Err(mailsense_providers::Error::InvalidResponse {
					message: "Annotator content is not valid JSON.".to_string(),
				}),
				None => Ok(annotation_payload("neutral", serde_json::json!([]))),
			}
		})
	}
}

fn rejected_credential() -> mailsense_providers::Error {
	mailsense_providers::Error::Upstream {
		status: 401,
		message: "InvalidAuthenticationToken".to_string(),
	}
}

pub fn test_config(dsn: String) -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
		},
		storage: Storage { postgres: Postgres { dsn, pool_max_conns: 2 } },
		providers: mailsense_config::Providers {
			graph: GraphConfig {
				api_base: "http://127.0.0.1:1".to_string(),
				page_size: 50,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			annotator: AnnotatorConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/".to_string(),
				model: "test".to_string(),
				temperature: 0.1,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
		},
		ingest: Ingest { task_confidence_threshold: 0.7, max_tasks_per_email: 5 },
		dashboard: Dashboard { volume_days: 7 },
		security: Security { bind_localhost_only: true, session_ttl_hours: 24 },
	}
}

pub fn graph_profile(address: &str, display_name: &str) -> GraphProfile {
	GraphProfile {
		id: "user-1".to_string(),
		mail: Some(address.to_string()),
		user_principal_name: None,
		display_name: Some(display_name.to_string()),
		department: Some("Finance".to_string()),
		job_title: Some("Analyst".to_string()),
	}
}

pub fn graph_message(id: &str, subject: &str, received: &str) -> GraphMessage {
	GraphMessage {
		id: id.to_string(),
		conversation_id: Some(format!("conv-{id}")),
		subject: Some(subject.to_string()),
		body_preview: Some("Please review the attached figures before Friday.".to_string()),
		received_date_time: Some(received.to_string()),
		sender: Some(GraphRecipient {
			email_address: Some(GraphEmailAddress {
				name: Some("Dana Park".to_string()),
				address: Some("dana@contoso.com".to_string()),
			}),
		}),
		to_recipients: Vec::new(),
		importance: Some("normal".to_string()),
		has_attachments: false,
		is_read: false,
	}
}

pub fn annotation_payload(sentiment: &str, tasks: Value) -> Value {
	serde_json::json!({
		"summary": "Short summary of the email.",
		"sentiment": sentiment,
		"urgency": 4,
		"topics": ["budget"],
		"action_items": ["Review the figures."],
		"tasks": tasks,
	})
}

pub async fn test_db() -> Option<TestDatabase> {
	let base_dsn = mailsense_testkit::env_dsn()?;
	let db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");

	Some(db)
}

pub async fn build_service(cfg: Config, providers: Providers) -> MailsenseService {
	let db = Db::connect(&cfg.storage.postgres).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	MailsenseService::with_providers(cfg, db, providers)
}

/// Signs in through the service's own flow and hands back the employee row
/// the way the HTTP layer would see it.
pub async fn signed_in_employee(service: &MailsenseService) -> Employee {
	let session = service
		.sign_in(SignInRequest { access_token: "delegated-token".to_string() })
		.await
		.expect("Failed to sign in.");

	service.authenticate(&session.token).await.expect("Failed to authenticate session.")
}
