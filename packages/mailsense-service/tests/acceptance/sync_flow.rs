use std::sync::Arc;

use mailsense_service::{Providers, SyncOutcomeStatus, SyncRequest};
use mailsense_storage::queries;

use crate::{SequenceAnnotator, StubAnnotator, StubMail};

#[tokio::test]
#[ignore = "Requires external Postgres. Set MAILSENSE_PG_DSN to run."]
async fn duplicates_are_skipped_anywhere_in_the_page() {
	let Some(test_db) = crate::test_db().await else {
		return;
	};
	let profile = crate::graph_profile("pat@contoso.com", "Pat Shaw");
	let annotator =
		Arc::new(StubAnnotator { payload: crate::annotation_payload("neutral", serde_json::json!([])) });

	// First pass stores only the middle message of the later page.
	let mail = Arc::new(StubMail {
		profile: profile.clone(),
		messages: vec![crate::graph_message("MSG-B", "Second", "2026-03-02T10:00:00Z")],
	});
	let service = crate::build_service(
		crate::test_config(test_db.dsn().to_string()),
		Providers::new(mail, annotator.clone()),
	)
	.await;
	let employee = crate::signed_in_employee(&service).await;
	let first = service
		.sync(&employee, SyncRequest { access_token: "delegated-token".to_string() })
		.await
		.expect("First sync failed.");

	assert_eq!(first.processed_count, 1);
	assert_eq!(first.total_fetched, 1);

	// The duplicate is not adjacent to the page head; the page-level check
	// must still catch it.
	let mail = Arc::new(StubMail {
		profile,
		messages: vec![
			crate::graph_message("MSG-A", "First", "2026-03-02T11:00:00Z"),
			crate::graph_message("MSG-B", "Second", "2026-03-02T10:00:00Z"),
			crate::graph_message("MSG-C", "Third", "2026-03-02T09:00:00Z"),
		],
	});
	let service = crate::build_service(
		crate::test_config(test_db.dsn().to_string()),
		Providers::new(mail, annotator),
	)
	.await;
	let second = service
		.sync(&employee, SyncRequest { access_token: "delegated-token".to_string() })
		.await
		.expect("Second sync failed.");

	assert_eq!(second.total_fetched, 3);
	assert_eq!(second.processed_count, 2);
	assert_eq!(second.duplicate_count, 1);
	assert_eq!(second.outcomes[1].status, SyncOutcomeStatus::Duplicate);

	let email_count = queries::email_count(&service.db, employee.org_id)
		.await
		.expect("Failed to count emails.");

	assert_eq!(email_count, 3);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MAILSENSE_PG_DSN to run."]
async fn annotation_failure_keeps_the_email_and_the_loop_running() {
	let Some(test_db) = crate::test_db().await else {
		return;
	};
	let mail = Arc::new(StubMail {
		profile: crate::graph_profile("pat@contoso.com", "Pat Shaw"),
		messages: vec![
			crate::graph_message("MSG-1", "First", "2026-03-02T11:00:00Z"),
			crate::graph_message("MSG-2", "Second", "2026-03-02T10:00:00Z"),
			crate::graph_message("MSG-3", "Third", "2026-03-02T09:00:00Z"),
		],
	});
	// Message #1's annotation blows up; #2 and #3 succeed.
	let annotator = Arc::new(SequenceAnnotator::new(vec![
		None,
		Some(crate::annotation_payload("positive", serde_json::json!([]))),
		Some(crate::annotation_payload("negative", serde_json::json!([]))),
	]));
	let service = crate::build_service(
		crate::test_config(test_db.dsn().to_string()),
		Providers::new(mail, annotator),
	)
	.await;
	let employee = crate::signed_in_employee(&service).await;
	let response = service
		.sync(&employee, SyncRequest { access_token: "delegated-token".to_string() })
		.await
		.expect("Sync failed.");

	assert_eq!(response.processed_count, 3);
	assert_eq!(response.outcomes[0].status, SyncOutcomeStatus::StoredWithoutAnalysis);
	assert!(response.outcomes[0].error.is_some());
	assert_eq!(response.outcomes[1].status, SyncOutcomeStatus::Stored);
	assert_eq!(response.outcomes[2].status, SyncOutcomeStatus::Stored);

	let email_count = queries::email_count(&service.db, employee.org_id)
		.await
		.expect("Failed to count emails.");
	let analyzed = queries::analyzed_email_count(&service.db, employee.org_id)
		.await
		.expect("Failed to count analyses.");

	assert_eq!(email_count, 3);
	assert_eq!(analyzed, 2);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MAILSENSE_PG_DSN to run."]
async fn tasks_below_the_confidence_threshold_are_discarded() {
	let Some(test_db) = crate::test_db().await else {
		return;
	};
	let mail = Arc::new(StubMail {
		profile: crate::graph_profile("pat@contoso.com", "Pat Shaw"),
		messages: vec![crate::graph_message("MSG-1", "Budget", "2026-03-02T11:00:00Z")],
	});
	let tasks = serde_json::json!([
		{ "title": "Send revised numbers", "confidence": 0.9, "priority": "high" },
		{ "title": "Exactly at the threshold", "confidence": 0.7 },
		{ "title": "Maybe circulate notes", "confidence": 0.4 }
	]);
	let annotator =
		Arc::new(StubAnnotator { payload: crate::annotation_payload("neutral", tasks) });
	let service = crate::build_service(
		crate::test_config(test_db.dsn().to_string()),
		Providers::new(mail, annotator),
	)
	.await;
	let employee = crate::signed_in_employee(&service).await;
	let response = service
		.sync(&employee, SyncRequest { access_token: "delegated-token".to_string() })
		.await
		.expect("Sync failed.");

	assert_eq!(response.outcomes[0].tasks_created, 1);
	assert_eq!(response.outcomes[0].tasks_discarded, 2);

	let task_count = queries::task_count(&service.db, employee.org_id)
		.await
		.expect("Failed to count tasks.");

	assert_eq!(task_count, 1);

	let tasks = queries::recent_tasks(&service.db, employee.org_id, 10)
		.await
		.expect("Failed to list tasks.");

	assert_eq!(tasks[0].title, "Send revised numbers");
	assert_eq!(tasks[0].status, "identified");
	assert_eq!(tasks[0].priority, "high");
	assert_eq!(tasks[0].assigned_to, employee.employee_id);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MAILSENSE_PG_DSN to run."]
async fn sync_stamps_last_sync_at() {
	let Some(test_db) = crate::test_db().await else {
		return;
	};
	let mail = Arc::new(StubMail {
		profile: crate::graph_profile("pat@contoso.com", "Pat Shaw"),
		messages: Vec::new(),
	});
	let annotator =
		Arc::new(StubAnnotator { payload: crate::annotation_payload("neutral", serde_json::json!([])) });
	let service = crate::build_service(
		crate::test_config(test_db.dsn().to_string()),
		Providers::new(mail, annotator),
	)
	.await;
	let employee = crate::signed_in_employee(&service).await;

	assert!(employee.last_sync_at.is_none());

	let response = service
		.sync(&employee, SyncRequest { access_token: "delegated-token".to_string() })
		.await
		.expect("Sync failed.");

	assert_eq!(response.total_fetched, 0);
	assert_eq!(response.processed_count, 0);

	let refreshed = queries::find_employee_by_email(&service.db, employee.org_id, &employee.email)
		.await
		.expect("Failed to refetch employee.")
		.expect("Employee must exist.");

	assert!(refreshed.last_sync_at.is_some());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
