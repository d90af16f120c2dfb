use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use mailsense_storage::{models::Employee, queries};

use crate::{MailsenseService, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
	pub employee_id: Uuid,
	pub email: String,
	pub display_name: String,
	pub department: Option<String>,
	pub job_title: Option<String>,
	#[serde(with = "crate::time_serde::option")]
	pub last_sync_at: Option<OffsetDateTime>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamResponse {
	pub members: Vec<TeamMember>,
}

impl MailsenseService {
	pub async fn team(&self, employee: &Employee) -> Result<TeamResponse> {
		let rows = queries::team(&self.db, employee.org_id).await?;
		let members = rows
			.into_iter()
			.map(|member| TeamMember {
				employee_id: member.employee_id,
				email: member.email,
				display_name: member.display_name,
				department: member.department,
				job_title: member.job_title,
				last_sync_at: member.last_sync_at,
			})
			.collect();

		Ok(TeamResponse { members })
	}
}
