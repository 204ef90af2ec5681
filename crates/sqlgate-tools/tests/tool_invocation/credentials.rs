use crate::common::*;
use pretty_assertions::assert_eq;
use sqlgate_core::{CredentialsConfig, CredentialsError};
use sqlgate_tools::{CREDENTIAL_CHECK_QUERY, ExecutionError, ToolError, validate_credentials};

fn inline(project_id: Option<&str>) -> CredentialsConfig {
    CredentialsConfig {
        service_account_json: Some(SERVICE_ACCOUNT_JSON.to_string()),
        project_id: project_id.map(str::to_string),
        ..CredentialsConfig::default()
    }
}

#[tokio::test]
async fn test_check_query_runs_and_closes() {
    let factory = FakeFactory::returning(people());

    let account = validate_credentials(&factory, &inline(None)).await.unwrap();

    assert_eq!(account.project_id, "analytics-test");
    assert_eq!(
        account.client_email(),
        Some("gate@analytics-test.iam.gserviceaccount.com")
    );
    let queries = factory.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].sql, CREDENTIAL_CHECK_QUERY);
    assert_eq!(queries[0].max_results, None);
    assert_eq!(factory.closes(), 1);
}

#[tokio::test]
async fn test_project_override_reaches_factory() {
    let factory = FakeFactory::returning(people());

    let account = validate_credentials(&factory, &inline(Some("billing-prod")))
        .await
        .unwrap();

    assert_eq!(account.project_id, "billing-prod");
    assert_eq!(factory.projects(), vec!["billing-prod"]);
}

#[tokio::test]
async fn test_engine_rejection() {
    let factory = FakeFactory::failing(ExecutionError::new(
        "Forbidden",
        "bigquery.jobs.create denied",
    ));

    let err = validate_credentials(&factory, &inline(None))
        .await
        .unwrap_err();

    match err {
        ToolError::CredentialValidation(reason) => {
            assert_eq!(reason, "Forbidden: bigquery.jobs.create denied")
        }
        other => panic!("expected credential validation failure, got {other:?}"),
    }
    assert_eq!(factory.closes(), 1);
}

#[tokio::test]
async fn test_connect_rejection() {
    let factory = FakeFactory::refusing(ExecutionError::new("Unauthenticated", "invalid_grant"));

    let err = validate_credentials(&factory, &inline(None))
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::CredentialValidation(_)));
    assert_eq!(factory.closes(), 0);
}

#[tokio::test]
async fn test_resolution_failure_skips_engine() {
    let factory = FakeFactory::returning(people());

    let err = validate_credentials(&factory, &CredentialsConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ToolError::Credentials(CredentialsError::MissingServiceAccountJson)
    ));
    assert_eq!(err.to_string(), "service_account_json is required");
    assert_eq!(factory.connects(), 0);
}
