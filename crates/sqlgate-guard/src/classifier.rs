//! Statement classification.
//!
//! Only the outermost statement decides the kind. A `SELECT` whose subqueries
//! or CTEs do anything at all is still a `SELECT`.

use crate::parser::StatementTree;
use sqlgate_core::OperationKind;
use sqlparser::ast::{Query, SetExpr, Statement};

/// Classify a parsed statement.
pub fn classify(tree: &StatementTree) -> OperationKind {
    let kind = classify_statement(tree.statement());
    tracing::debug!(operation = %kind, "Classified statement");
    kind
}

/// Get the operation kind of a statement node.
pub fn classify_statement(stmt: &Statement) -> OperationKind {
    match stmt {
        Statement::Query(query) => classify_query(query),
        Statement::Insert { .. } => OperationKind::Insert,
        Statement::Update { .. } => OperationKind::Update,
        Statement::Delete { .. } => OperationKind::Delete,
        _ => OperationKind::Other,
    }
}

/// A query expression takes the kind of its body. `WITH … INSERT` parses as a
/// query whose body is the INSERT; UPDATE and DELETE likewise.
fn classify_query(query: &Query) -> OperationKind {
    match query.body.as_ref() {
        SetExpr::Select(_)
        | SetExpr::SetOperation { .. }
        | SetExpr::Values(_)
        | SetExpr::Table(_) => OperationKind::Select,
        SetExpr::Query(inner) => classify_query(inner),
        SetExpr::Insert(stmt) | SetExpr::Update(stmt) | SetExpr::Delete(stmt) => {
            classify_statement(stmt)
        }
        _ => OperationKind::Other,
    }
}
