mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	AnnotatorConfig, Config, Dashboard, GraphConfig, Ingest, Postgres, Providers, Security, Service,
	Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.graph.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.graph.api_base must be non-empty.".to_string(),
		});
	}
	if cfg.providers.graph.page_size == 0 || cfg.providers.graph.page_size > 50 {
		return Err(Error::Validation {
			message: "providers.graph.page_size must be between 1 and 50.".to_string(),
		});
	}
	if cfg.providers.graph.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.graph.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.annotator.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.annotator.api_key must be non-empty.".to_string(),
		});
	}
	if cfg.providers.annotator.model.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.annotator.model must be non-empty.".to_string(),
		});
	}
	if cfg.providers.annotator.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.annotator.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if !cfg.providers.annotator.temperature.is_finite()
		|| !(0.0..=2.0).contains(&cfg.providers.annotator.temperature)
	{
		return Err(Error::Validation {
			message: "providers.annotator.temperature must be in the range 0.0-2.0.".to_string(),
		});
	}
	if !cfg.ingest.task_confidence_threshold.is_finite()
		|| !(0.0..=1.0).contains(&cfg.ingest.task_confidence_threshold)
	{
		return Err(Error::Validation {
			message: "ingest.task_confidence_threshold must be in the range 0.0-1.0.".to_string(),
		});
	}
	if cfg.ingest.max_tasks_per_email == 0 {
		return Err(Error::Validation {
			message: "ingest.max_tasks_per_email must be greater than zero.".to_string(),
		});
	}
	if cfg.dashboard.volume_days == 0 || cfg.dashboard.volume_days > 90 {
		return Err(Error::Validation {
			message: "dashboard.volume_days must be between 1 and 90.".to_string(),
		});
	}
	if cfg.security.session_ttl_hours <= 0 {
		return Err(Error::Validation {
			message: "security.session_ttl_hours must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	strip_trailing_slash(&mut cfg.providers.graph.api_base);
	strip_trailing_slash(&mut cfg.providers.annotator.api_base);
}

fn strip_trailing_slash(base: &mut String) {
	while base.ends_with('/') {
		base.pop();
	}
}
