use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use mailsense_storage::{
	models::{Employee, Session},
	queries,
};

use crate::{Error, MailsenseService, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
	pub access_token: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProfile {
	pub employee_id: Uuid,
	pub org_id: Uuid,
	pub email: String,
	pub display_name: String,
	pub department: Option<String>,
	pub job_title: Option<String>,
	#[serde(with = "crate::time_serde::option")]
	pub last_sync_at: Option<OffsetDateTime>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
	pub token: String,
	#[serde(with = "crate::time_serde")]
	pub expires_at: OffsetDateTime,
	pub employee: EmployeeProfile,
}

impl MailsenseService {
	/// Exchanges a delegated Graph credential for an application session.
	/// The organization and employee rows are created lazily on first
	/// sign-in; profile fields are refreshed on every later one.
	pub async fn sign_in(&self, req: SignInRequest) -> Result<SignInResponse> {
		if req.access_token.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: "accessToken must be non-empty.".to_string(),
			});
		}

		let profile = self
			.providers
			.mail
			.profile(&self.cfg.providers.graph, &req.access_token)
			.await
			.map_err(Error::from_provider)?;
		let Some(address) = profile.address() else {
			return Err(Error::InvalidRequest {
				message: "Mail account has no usable address.".to_string(),
			});
		};
		let address = address.to_ascii_lowercase();
		let Some(domain) = mailsense_domain::mailbox::org_domain(&address) else {
			return Err(Error::InvalidRequest {
				message: "Mail address has no usable organization domain.".to_string(),
			});
		};

		let now = OffsetDateTime::now_utc();
		let org = queries::find_or_create_organization(&self.db, &domain, &domain, now).await?;
		let display_name = profile.display_name.clone().unwrap_or_else(|| address.clone());
		let employee = queries::upsert_employee(
			&self.db,
			org.org_id,
			&address,
			&display_name,
			profile.department.as_deref(),
			profile.job_title.as_deref(),
			now,
		)
		.await?;

		queries::purge_expired_sessions(&self.db, employee.employee_id, now).await?;

		let session = Session {
			token: Uuid::new_v4().simple().to_string(),
			employee_id: employee.employee_id,
			created_at: now,
			expires_at: now + Duration::hours(self.cfg.security.session_ttl_hours),
		};

		queries::insert_session(&self.db, &session).await?;
		tracing::info!(employee = %employee.email, org = %org.domain, "Employee signed in.");

		Ok(SignInResponse {
			token: session.token,
			expires_at: session.expires_at,
			employee: employee_profile(&employee),
		})
	}

	/// Resolves a bearer session token to its employee. Expired and unknown
	/// tokens are indistinguishable to the caller.
	pub async fn authenticate(&self, token: &str) -> Result<Employee> {
		let token = token.trim();

		if token.is_empty() {
			return Err(Error::Unauthorized {
				message: "Missing bearer session token.".to_string(),
			});
		}

		let now = OffsetDateTime::now_utc();

		match queries::fetch_session_employee(&self.db, token, now).await? {
			Some(employee) => Ok(employee),
			None => Err(Error::Unauthorized {
				message: "Session token is unknown or expired.".to_string(),
			}),
		}
	}
}

pub(crate) fn employee_profile(employee: &Employee) -> EmployeeProfile {
	EmployeeProfile {
		employee_id: employee.employee_id,
		org_id: employee.org_id,
		email: employee.email.clone(),
		display_name: employee.display_name.clone(),
		department: employee.department.clone(),
		job_title: employee.job_title.clone(),
		last_sync_at: employee.last_sync_at,
	}
}
