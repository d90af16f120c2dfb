use std::sync::Arc;

use uuid::Uuid;

use mailsense_service::{Error, Providers, SyncRequest, TaskStatusRequest};

use crate::{StubAnnotator, StubMail};

#[tokio::test]
#[ignore = "Requires external Postgres. Set MAILSENSE_PG_DSN to run."]
async fn status_updates_round_trip_and_missing_tasks_are_404() {
	let Some(test_db) = crate::test_db().await else {
		return;
	};
	let mail = Arc::new(StubMail {
		profile: crate::graph_profile("pat@contoso.com", "Pat Shaw"),
		messages: vec![crate::graph_message("MSG-1", "Budget", "2026-03-02T11:00:00Z")],
	});
	let tasks = serde_json::json!([
		{ "title": "Send revised numbers", "confidence": 0.95 }
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

	let listed = service.recent_tasks(&employee, None).await.expect("Failed to list tasks.");
	let task_id = listed.tasks[0].task_id;
	let updated = service
		.update_task_status(
			&employee,
			task_id,
			TaskStatusRequest { status: "completed".to_string() },
		)
		.await
		.expect("Failed to update task status.");

	assert_eq!(updated.status, "completed");

	let listed = service.recent_tasks(&employee, None).await.expect("Failed to list tasks.");

	assert_eq!(listed.tasks[0].status, "completed");

	let missing = service
		.update_task_status(
			&employee,
			Uuid::new_v4(),
			TaskStatusRequest { status: "completed".to_string() },
		)
		.await;

	assert!(matches!(missing, Err(Error::NotFound { .. })));

	let unknown_label = service
		.update_task_status(&employee, task_id, TaskStatusRequest { status: "done".to_string() })
		.await;

	assert!(matches!(unknown_label, Err(Error::InvalidRequest { .. })));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
