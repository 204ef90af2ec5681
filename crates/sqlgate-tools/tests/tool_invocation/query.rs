use crate::common::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use sqlgate_core::OperationKind;
use sqlgate_guard::GateError;
use sqlgate_tools::{QUERY_TOOL, ToolError, ToolMessage};

#[tokio::test]
async fn test_select_emits_data_columns_then_records() {
    let factory = FakeFactory::returning(people());
    let registry = registry(&factory);

    let stream = registry
        .call(QUERY_TOOL, &query_args("select id, name from people"))
        .unwrap();

    assert_eq!(
        messages(stream).await,
        vec![
            ToolMessage::variable("data", json!([[1, "ada"], [2, "grace"], [3, "edsger"]])),
            ToolMessage::variable("columns", json!(["id", "name"])),
            ToolMessage::json(json!({
                "data": [
                    {"id": 1, "name": "ada"},
                    {"id": 2, "name": "grace"},
                    {"id": 3, "name": "edsger"}
                ]
            })),
        ]
    );
}

#[tokio::test]
async fn test_engine_receives_canonical_text() {
    let factory = FakeFactory::returning(people());
    let registry = registry(&factory);

    let stream = registry
        .call(QUERY_TOOL, &query_args("select   id\nfrom people   where id = 1"))
        .unwrap();
    messages(stream).await;

    let queries = factory.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].sql, "SELECT id FROM people WHERE id = 1");
    assert_eq!(queries[0].maximum_bytes_billed, 10_000_000_000);
}

#[tokio::test]
async fn test_default_row_limit() {
    let factory = FakeFactory::returning(people());
    let stream = registry(&factory)
        .call(QUERY_TOOL, &query_args("SELECT id FROM people"))
        .unwrap();
    messages(stream).await;

    assert_eq!(factory.queries()[0].max_results, Some(100));
}

#[tokio::test]
async fn test_row_limit_is_passed_and_applied() {
    let factory = FakeFactory::returning(people());
    let arguments = args(json!({"query": "SELECT id, name FROM people", "max_fetched_rows": "2"}));

    let stream = registry(&factory).call(QUERY_TOOL, &arguments).unwrap();
    let out = messages(stream).await;

    assert_eq!(factory.queries()[0].max_results, Some(2));
    assert_eq!(
        out[0],
        ToolMessage::variable("data", json!([[1, "ada"], [2, "grace"]]))
    );
}

#[tokio::test]
async fn test_unusable_row_limit_falls_back() {
    for raw in [json!("ten"), json!("-5"), json!(-5), json!(true), json!(null)] {
        let factory = FakeFactory::returning(people());
        let arguments = args(json!({"query": "SELECT 1", "max_fetched_rows": raw}));

        let stream = registry(&factory).call(QUERY_TOOL, &arguments).unwrap();
        messages(stream).await;

        assert_eq!(factory.queries()[0].max_results, Some(100), "{raw}");
    }
}

#[tokio::test]
async fn test_insert_rejected_by_query_tool() {
    let factory = FakeFactory::returning(people());
    let err = registry(&factory)
        .call(QUERY_TOOL, &query_args("INSERT INTO t (a) VALUES (1)"))
        .err()
        .unwrap();

    match err {
        ToolError::Gate(GateError::OperationNotPermitted { found, .. }) => {
            assert_eq!(found, OperationKind::Insert)
        }
        other => panic!("expected routing rejection, got {other:?}"),
    }
    assert_eq!(factory.connects(), 0);
}

#[tokio::test]
async fn test_positional_marker_rejected_by_query_tool() {
    let factory = FakeFactory::returning(people());
    let err = registry(&factory)
        .call(QUERY_TOOL, &query_args("SELECT * FROM people WHERE id = ?"))
        .err()
        .unwrap();

    assert_eq!(
        err.to_string(),
        "Not allowed Placeholder -> `?`, Should use named parameters if needed"
    );
    assert_eq!(factory.connects(), 0);
}

#[tokio::test]
async fn test_missing_query_is_empty() {
    let factory = FakeFactory::returning(people());
    let err = registry(&factory)
        .call(QUERY_TOOL, &args(json!({})))
        .err()
        .unwrap();

    assert!(matches!(err, ToolError::Gate(GateError::EmptyQuery)));
    assert_eq!(err.to_string(), "SQL query is required");
}

#[tokio::test]
async fn test_non_string_query_is_invalid() {
    let factory = FakeFactory::returning(people());
    let err = registry(&factory)
        .call(QUERY_TOOL, &args(json!({"query": 42})))
        .err()
        .unwrap();

    assert!(matches!(err, ToolError::InvalidArguments { ref tool, .. } if tool == QUERY_TOOL));
}
