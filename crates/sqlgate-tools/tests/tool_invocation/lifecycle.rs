use crate::common::*;
use futures::StreamExt;
use std::task::Poll;
use pretty_assertions::assert_eq;
use sqlgate_core::{ExecutionConfig, OperationKind};
use sqlgate_tools::{ExecutionError, MUTATION_TOOL, QUERY_TOOL, ToolError, ToolRegistry};

#[tokio::test]
async fn test_stream_is_lazy() {
    let factory = FakeFactory::returning(people());
    let stream = registry(&factory)
        .call(QUERY_TOOL, &query_args("SELECT 1"))
        .unwrap();

    assert_eq!(factory.connects(), 0);
    drop(stream);
    assert_eq!(factory.connects(), 0);
}

#[tokio::test]
async fn test_one_client_per_invocation_closed_on_success() {
    let factory = FakeFactory::returning(people());
    let registry = registry(&factory);

    for _ in 0..3 {
        let stream = registry
            .call(QUERY_TOOL, &query_args("SELECT id FROM people"))
            .unwrap();
        messages(stream).await;
    }

    assert_eq!(factory.connects(), 3);
    assert_eq!(factory.closes(), 3);
    assert_eq!(factory.projects(), vec!["analytics-test"; 3]);
}

#[tokio::test]
async fn test_client_closed_when_job_fails() {
    let factory = FakeFactory::failing(ExecutionError::new(
        "Forbidden",
        "Access Denied: Table ds.people",
    ));
    let stream = registry(&factory)
        .call(MUTATION_TOOL, &query_args("DELETE FROM ds.people WHERE id = 1"))
        .unwrap();

    let items = collect(stream).await;
    assert_eq!(items.len(), 1);
    assert_eq!(factory.closes(), 1);

    let err = items.into_iter().next().unwrap().unwrap_err();
    let cause = err.execution_cause().unwrap();
    assert_eq!(cause.kind, "Forbidden");
    assert_eq!(cause.message, "Access Denied: Table ds.people");
    match err {
        ToolError::Execution { operation, sql, .. } => {
            assert_eq!(operation, OperationKind::Delete);
            assert_eq!(sql, "DELETE FROM ds.people WHERE id = 1");
        }
        other => panic!("expected execution failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_client_closed_when_stream_dropped_mid_job() {
    let factory = FakeFactory::stalling();
    let mut stream = registry(&factory)
        .call(QUERY_TOOL, &query_args("SELECT id FROM people"))
        .unwrap();

    assert!(matches!(futures::poll!(stream.next()), Poll::Pending));
    assert_eq!(factory.connects(), 1);
    assert_eq!(factory.queries().len(), 1);
    assert_eq!(factory.closes(), 0);

    drop(stream);
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
    assert_eq!(factory.closes(), 1);
}

#[test]
fn test_client_closed_when_dropped_outside_runtime() {
    let factory = FakeFactory::stalling();
    let mut stream = registry(&factory)
        .call(MUTATION_TOOL, &query_args("DELETE FROM ds.people WHERE id = 1"))
        .unwrap();

    let waker = futures::task::noop_waker();
    let mut cx = std::task::Context::from_waker(&waker);
    assert!(stream.poll_next_unpin(&mut cx).is_pending());
    assert_eq!(factory.queries().len(), 1);

    drop(stream);
    assert_eq!(factory.closes(), 1);
}

#[tokio::test]
async fn test_connect_failure_surfaces_without_close() {
    let factory = FakeFactory::refusing(ExecutionError::new("Unauthenticated", "bad key"));
    let mut stream = registry(&factory)
        .call(QUERY_TOOL, &query_args("SELECT 1"))
        .unwrap();

    let first = stream.next().await.unwrap();
    assert!(matches!(first, Err(ToolError::Execution { .. })));
    assert!(stream.next().await.is_none());
    assert_eq!(factory.connects(), 1);
    assert_eq!(factory.closes(), 0);
    assert!(factory.queries().is_empty());
}

#[tokio::test]
async fn test_execution_config_reaches_client() {
    let factory = FakeFactory::returning(people());
    let runtime = runtime(&factory).with_execution_config(ExecutionConfig {
        maximum_bytes_billed: 1_000,
    });

    let stream = ToolRegistry::with_builtin(runtime)
        .call(QUERY_TOOL, &query_args("SELECT 1"))
        .unwrap();
    messages(stream).await;

    assert_eq!(factory.queries()[0].maximum_bytes_billed, 1_000);
}
