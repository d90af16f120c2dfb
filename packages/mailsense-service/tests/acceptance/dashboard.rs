use std::sync::Arc;

use mailsense_service::{Providers, SyncRequest};
use mailsense_storage::queries;

use crate::{SequenceAnnotator, StubAnnotator, StubMail};

#[tokio::test]
#[ignore = "Requires external Postgres. Set MAILSENSE_PG_DSN to run."]
async fn sentiment_distribution_sums_to_the_analyzed_count() {
	let Some(test_db) = crate::test_db().await else {
		return;
	};
	let mail = Arc::new(StubMail {
		profile: crate::graph_profile("pat@contoso.com", "Pat Shaw"),
		messages: vec![
			crate::graph_message("MSG-1", "Praise", "2026-03-02T11:00:00Z"),
			crate::graph_message("MSG-2", "Complaint", "2026-03-02T10:00:00Z"),
			crate::graph_message("MSG-3", "FYI", "2026-03-02T09:00:00Z"),
			crate::graph_message("MSG-4", "Broken annotation", "2026-03-02T08:00:00Z"),
		],
	});
	// Three annotations land, the fourth fails; the distribution must cover
	// exactly the analyzed three.
	let annotator = Arc::new(SequenceAnnotator::new(vec![
		Some(crate::annotation_payload("positive", serde_json::json!([]))),
		Some(crate::annotation_payload("negative", serde_json::json!([]))),
		Some(crate::annotation_payload("neutral", serde_json::json!([]))),
		None,
	]));
	let service = crate::build_service(
		crate::test_config(test_db.dsn().to_string()),
		Providers::new(mail, annotator),
	)
	.await;
	let employee = crate::signed_in_employee(&service).await;

	service
		.sync(&employee, SyncRequest { access_token: "delegated-token".to_string() })
		.await
		.expect("Sync failed.");

	let sentiment = service.sentiment(&employee).await.expect("Failed to fetch sentiment.");
	let total: i64 = sentiment.distribution.iter().map(|bucket| bucket.count).sum();
	let analyzed = queries::analyzed_email_count(&service.db, employee.org_id)
		.await
		.expect("Failed to count analyses.");

	assert_eq!(analyzed, 3);
	assert_eq!(total, analyzed);
	assert_eq!(sentiment.distribution.len(), 3);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MAILSENSE_PG_DSN to run."]
async fn metrics_and_volume_cover_the_synced_mailbox() {
	let Some(test_db) = crate::test_db().await else {
		return;
	};
	let mail = Arc::new(StubMail {
		profile: crate::graph_profile("pat@contoso.com", "Pat Shaw"),
		messages: vec![
			crate::graph_message("MSG-1", "Budget", "2026-03-02T11:00:00Z"),
			crate::graph_message("MSG-2", "Planning", "2026-03-02T10:00:00Z"),
		],
	});
	let tasks = serde_json::json!([
		{ "title": "Send revised numbers", "confidence": 0.9 }
	]);
	let annotator = Arc::new(StubAnnotator { payload: crate::annotation_payload("neutral", tasks) });
	let service = crate::build_service(
		crate::test_config(test_db.dsn().to_string()),
		Providers::new(mail, annotator),
	)
	.await;
	let employee = crate::signed_in_employee(&service).await;

	service
		.sync(&employee, SyncRequest { access_token: "delegated-token".to_string() })
		.await
		.expect("Sync failed.");

	let metrics = service.metrics(&employee).await.expect("Failed to fetch metrics.");

	assert_eq!(metrics.email_count, 2);
	assert_eq!(metrics.task_count, 2);

	let volume = service.email_volume(&employee, Some(7)).await.expect("Failed to fetch volume.");
	let total: i64 = volume.days.iter().map(|day| day.count).sum();

	// Synthetic received times sit outside the rolling window; the axis is
	// still 7 contiguous days.
	assert_eq!(volume.days.len(), 7);
	assert!(total <= 2);

	let recent = service
		.recent_emails(&employee, Some(10))
		.await
		.expect("Failed to fetch recent emails.");

	assert_eq!(recent.emails.len(), 2);
	assert_eq!(recent.emails[0].sentiment.as_deref(), Some("neutral"));

	let team = service.team(&employee).await.expect("Failed to fetch team.");

	assert_eq!(team.members.len(), 1);
	assert_eq!(team.members[0].email, "pat@contoso.com");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
