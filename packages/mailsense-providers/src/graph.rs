use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::Result;

const MESSAGE_SELECT_FIELDS: &str = "id,conversationId,subject,bodyPreview,receivedDateTime,\
sender,toRecipients,importance,hasAttachments,isRead";

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphProfile {
	pub id: String,
	pub mail: Option<String>,
	pub user_principal_name: Option<String>,
	pub display_name: Option<String>,
	pub department: Option<String>,
	pub job_title: Option<String>,
}
impl GraphProfile {
	/// Graph reports work accounts under `mail`; some tenants only populate
	/// the principal name.
	pub fn address(&self) -> Option<&str> {
		self.mail
			.as_deref()
			.filter(|mail| !mail.trim().is_empty())
			.or(self.user_principal_name.as_deref())
			.filter(|address| !address.trim().is_empty())
	}
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEmailAddress {
	pub name: Option<String>,
	pub address: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphRecipient {
	pub email_address: Option<GraphEmailAddress>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMessage {
	pub id: String,
	#[serde(default)]
	pub conversation_id: Option<String>,
	#[serde(default)]
	pub subject: Option<String>,
	#[serde(default)]
	pub body_preview: Option<String>,
	#[serde(default)]
	pub received_date_time: Option<String>,
	#[serde(default)]
	pub sender: Option<GraphRecipient>,
	#[serde(default)]
	pub to_recipients: Vec<GraphRecipient>,
	#[serde(default)]
	pub importance: Option<String>,
	#[serde(default)]
	pub has_attachments: bool,
	#[serde(default)]
	pub is_read: bool,
}
impl GraphMessage {
	pub fn sender_address(&self) -> Option<&str> {
		self.sender.as_ref()?.email_address.as_ref()?.address.as_deref()
	}

	pub fn sender_name(&self) -> Option<&str> {
		self.sender.as_ref()?.email_address.as_ref()?.name.as_deref()
	}
}

#[derive(Debug, Deserialize)]
struct MessagePage {
	value: Vec<GraphMessage>,
}

pub async fn profile(
	cfg: &mailsense_config::GraphConfig,
	access_token: &str,
) -> Result<GraphProfile> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}/me", cfg.api_base);
	let res = client
		.get(&url)
		.headers(crate::bearer_headers(access_token, &cfg.default_headers)?)
		.send()
		.await?;
	let profile = crate::check_status(res).await?.json().await?;

	Ok(profile)
}

/// First page only, newest first. No cursor is followed; `page_size` is the
/// hard bound per sync call.
pub async fn recent_messages(
	cfg: &mailsense_config::GraphConfig,
	access_token: &str,
) -> Result<Vec<GraphMessage>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}/me/messages", cfg.api_base);
	let res = client
		.get(&url)
		.query(&[
			("$top", cfg.page_size.to_string()),
			("$orderby", "receivedDateTime desc".to_string()),
			("$select", MESSAGE_SELECT_FIELDS.to_string()),
		])
		.headers(crate::bearer_headers(access_token, &cfg.default_headers)?)
		.send()
		.await?;
	let page: MessagePage = crate::check_status(res).await?.json().await?;

	Ok(page.value)
}
