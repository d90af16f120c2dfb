use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub ingest: Ingest,
	pub dashboard: Dashboard,
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub graph: GraphConfig,
	pub annotator: AnnotatorConfig,
}

/// The Microsoft Graph upstream. No api_key: every call carries the
/// caller-supplied delegated access token.
#[derive(Debug, Deserialize)]
pub struct GraphConfig {
	pub api_base: String,
	#[serde(default = "default_page_size")]
	pub page_size: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct AnnotatorConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Ingest {
	#[serde(default = "default_task_confidence_threshold")]
	pub task_confidence_threshold: f32,
	#[serde(default = "default_max_tasks_per_email")]
	pub max_tasks_per_email: u32,
}

#[derive(Debug, Deserialize)]
pub struct Dashboard {
	#[serde(default = "default_volume_days")]
	pub volume_days: u32,
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
	pub session_ttl_hours: i64,
}

fn default_page_size() -> u32 {
	50
}

fn default_task_confidence_threshold() -> f32 {
	0.7
}

fn default_max_tasks_per_email() -> u32 {
	5
}

fn default_volume_days() -> u32 {
	7
}
