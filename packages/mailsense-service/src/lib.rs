pub mod auth;
pub mod dashboard;
pub mod emails;
pub mod employees;
pub mod sync;
pub mod tasks;
pub mod time_serde;

mod error;

pub use error::{Error, Result};

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

pub use auth::{EmployeeProfile, SignInRequest, SignInResponse};
pub use dashboard::{
	DayVolume, MetricsResponse, SentimentBucket, SentimentResponse, VolumeResponse,
};
pub use emails::{RecentEmailItem, RecentEmailsResponse};
pub use employees::{TeamMember, TeamResponse};
pub use sync::{SyncOutcome, SyncOutcomeStatus, SyncRequest, SyncResponse};
pub use tasks::{RecentTasksResponse, TaskItem, TaskStatusRequest, TaskStatusResponse};

use mailsense_config::{AnnotatorConfig, Config, GraphConfig};
use mailsense_providers::{
	annotator,
	graph::{self, GraphMessage, GraphProfile},
};
use mailsense_storage::db::Db;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub type ProviderResult<T> = mailsense_providers::Result<T>;

/// Seam for the Microsoft Graph upstream. The default implementation calls
/// the real API; tests substitute stubs.
pub trait MailProvider
where
	Self: Send + Sync,
{
	fn profile<'a>(
		&'a self,
		cfg: &'a GraphConfig,
		access_token: &'a str,
	) -> BoxFuture<'a, ProviderResult<GraphProfile>>;

	fn recent_messages<'a>(
		&'a self,
		cfg: &'a GraphConfig,
		access_token: &'a str,
	) -> BoxFuture<'a, ProviderResult<Vec<GraphMessage>>>;
}

/// Seam for the LLM annotation upstream.
pub trait AnnotatorProvider
where
	Self: Send + Sync,
{
	fn annotate<'a>(
		&'a self,
		cfg: &'a AnnotatorConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, ProviderResult<Value>>;
}

#[derive(Clone)]
pub struct Providers {
	pub mail: Arc<dyn MailProvider>,
	pub annotator: Arc<dyn AnnotatorProvider>,
}

struct DefaultProviders;

impl MailProvider for DefaultProviders {
	fn profile<'a>(
		&'a self,
		cfg: &'a GraphConfig,
		access_token: &'a str,
	) -> BoxFuture<'a, ProviderResult<GraphProfile>> {
		Box::pin(graph::profile(cfg, access_token))
	}

	fn recent_messages<'a>(
		&'a self,
		cfg: &'a GraphConfig,
		access_token: &'a str,
	) -> BoxFuture<'a, ProviderResult<Vec<GraphMessage>>> {
		Box::pin(graph::recent_messages(cfg, access_token))
	}
}

impl AnnotatorProvider for DefaultProviders {
	fn annotate<'a>(
		&'a self,
		cfg: &'a AnnotatorConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, ProviderResult<Value>> {
		Box::pin(annotator::annotate(cfg, messages))
	}
}

impl Providers {
	pub fn new(mail: Arc<dyn MailProvider>, annotator: Arc<dyn AnnotatorProvider>) -> Self {
		Self { mail, annotator }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { mail: provider.clone(), annotator: provider }
	}
}

pub struct MailsenseService {
	pub cfg: Config,
	pub db: Db,
	pub providers: Providers,
}
impl MailsenseService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, db, providers: Providers::default() }
	}

	pub fn with_providers(cfg: Config, db: Db, providers: Providers) -> Self {
		Self { cfg, db, providers }
	}
}
