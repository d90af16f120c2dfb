use std::sync::Arc;

use mailsense_service::{Error, Providers, SignInRequest};

use crate::{RejectingMail, StubAnnotator, StubMail};

#[tokio::test]
#[ignore = "Requires external Postgres. Set MAILSENSE_PG_DSN to run."]
async fn sign_in_creates_org_and_employee_lazily() {
	let Some(test_db) = crate::test_db().await else {
		return;
	};
	let mail = Arc::new(StubMail {
		profile: crate::graph_profile("Pat.Shaw@Contoso.com", "Pat Shaw"),
		messages: Vec::new(),
	});
	let annotator =
		Arc::new(StubAnnotator { payload: crate::annotation_payload("neutral", serde_json::json!([])) });
	let service = crate::build_service(
		crate::test_config(test_db.dsn().to_string()),
		Providers::new(mail, annotator),
	)
	.await;
	let first = service
		.sign_in(SignInRequest { access_token: "delegated-token".to_string() })
		.await
		.expect("First sign-in failed.");

	assert_eq!(first.employee.email, "pat.shaw@contoso.com");

	// A second sign-in reuses the same rows and mints a fresh token.
	let second = service
		.sign_in(SignInRequest { access_token: "delegated-token".to_string() })
		.await
		.expect("Second sign-in failed.");

	assert_eq!(second.employee.employee_id, first.employee.employee_id);
	assert_eq!(second.employee.org_id, first.employee.org_id);
	assert_ne!(second.token, first.token);

	let employee = service.authenticate(&first.token).await.expect("Failed to authenticate.");

	assert_eq!(employee.employee_id, first.employee.employee_id);

	let unknown = service.authenticate("not-a-token").await;

	assert!(matches!(unknown, Err(Error::Unauthorized { .. })));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set MAILSENSE_PG_DSN to run."]
async fn rejected_graph_credentials_surface_as_credential_errors() {
	let Some(test_db) = crate::test_db().await else {
		return;
	};
	let annotator =
		Arc::new(StubAnnotator { payload: crate::annotation_payload("neutral", serde_json::json!([])) });
	let service = crate::build_service(
		crate::test_config(test_db.dsn().to_string()),
		Providers::new(Arc::new(RejectingMail), annotator),
	)
	.await;
	let result = service
		.sign_in(SignInRequest { access_token: "expired-token".to_string() })
		.await;

	assert!(matches!(result, Err(Error::CredentialRejected { .. })));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
