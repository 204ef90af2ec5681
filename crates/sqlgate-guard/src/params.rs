//! Parameter marker detection.
//!
//! Statements must carry their values inline; any placeholder the caller would
//! have to bind later is rejected, wherever it is written.
//!
//! ## Traversal order
//!
//! Markers are reported in the textual order of the statement's canonical
//! rendering. For the statements in scope this is the same as a pre-order walk
//! with children in AST declaration order: projection, FROM, WHERE, GROUP BY,
//! HAVING, ORDER BY, LIMIT; SET before WHERE for UPDATE; left operand before
//! right. Subqueries and CTEs are covered where they appear.
//!
//! Two sources are combined. The expression walk finds the placeholders the
//! parser built (`?`, `$1`, `:id`, `@id` in value position). The token scan of
//! the rendering places those in text order and also catches `@name` written
//! where no expression is: table names, aliases, function names, column lists.

use crate::error::PolicyViolation;
use crate::parser::{StatementTree, parser_dialect};
use sqlgate_core::MarkerKind;
use sqlparser::ast::{Expr, Ident, Value, visit_expressions};
use sqlparser::tokenizer::{Token, Tokenizer, Word};
use std::ops::ControlFlow;

/// A parameter marker found in a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterMarker {
    pub kind: MarkerKind,
    /// The marker as written, e.g. `?`, `$1`, `:id`, `@id`.
    pub token: String,
}

impl ParameterMarker {
    fn new(kind: MarkerKind, token: impl Into<String>) -> Self {
        Self {
            kind,
            token: token.into(),
        }
    }

    /// The rejection this marker earns.
    pub fn violation(&self) -> PolicyViolation {
        match self.kind {
            MarkerKind::Positional => PolicyViolation::positional(&self.token),
            MarkerKind::Named => PolicyViolation::named(&self.token),
        }
    }
}

/// Rejects statements that carry positional or named parameter markers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterGuard;

impl ParameterGuard {
    pub fn new() -> Self {
        Self
    }

    /// Fail on the first marker in traversal order.
    pub fn check(&self, tree: &StatementTree) -> Result<(), PolicyViolation> {
        match self.find_markers(tree).into_iter().next() {
            Some(marker) => {
                tracing::warn!(
                    marker = %marker.kind,
                    token = %marker.token,
                    "Rejected statement carrying a parameter marker"
                );
                Err(marker.violation())
            }
            None => Ok(()),
        }
    }

    /// Every marker in the statement, in traversal order.
    pub fn find_markers(&self, tree: &StatementTree) -> Vec<ParameterMarker> {
        let mut pending = expression_markers(tree);

        let rendered = tree.statement().to_string();
        let dialect = parser_dialect(tree.dialect());
        let tokens = match Tokenizer::new(dialect.as_ref(), &rendered).tokenize() {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::debug!(error = %e, "Rendered statement did not tokenize");
                return pending;
            }
        };

        let mut markers = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let (marker, width) = token_marker(&tokens[i], tokens.get(i + 1), &pending);
            if let Some(marker) = marker {
                if let Some(pos) = pending.iter().position(|m| m.token == marker.token) {
                    pending.remove(pos);
                }
                markers.push(marker);
            }
            i += width;
        }

        // Placeholders the scan could not place still count.
        markers.extend(pending);
        markers
    }
}

/// Markers in expression position, in pre-order.
fn expression_markers(tree: &StatementTree) -> Vec<ParameterMarker> {
    let mut markers = Vec::new();
    let _ = visit_expressions(tree.statement(), |expr| {
        if let Some(marker) = marker_in(expr) {
            markers.push(marker);
        }
        ControlFlow::<()>::Continue(())
    });
    markers
}

/// The marker this expression node is, if any. Children are not inspected.
pub fn marker_in(expr: &Expr) -> Option<ParameterMarker> {
    match expr {
        Expr::Value(value) => match &value.value {
            Value::Placeholder(token) => Some(placeholder_marker(token)),
            _ => None,
        },
        // Dialects that allow `@` to start an identifier (BigQuery among them)
        // tokenize `@id` as a plain identifier rather than a placeholder.
        Expr::Identifier(ident) => at_identifier_marker(ident),
        Expr::CompoundIdentifier(parts) => parts.first().and_then(at_identifier_marker),
        _ => None,
    }
}

/// The marker starting at `token`, and how many tokens it spans.
///
/// Sigils the tokenizer splits from their name (`:` `id`, `@` `id`) only count
/// when the parser built the joined placeholder, so `a:b` path access and
/// slices are left alone.
fn token_marker(
    token: &Token,
    next: Option<&Token>,
    pending: &[ParameterMarker],
) -> (Option<ParameterMarker>, usize) {
    match token {
        Token::Placeholder(s) => (Some(placeholder_marker(s)), 1),
        Token::Word(word) => (word_marker(word), 1),
        Token::Colon | Token::AtSign | Token::Question => {
            let sigil = token.to_string();
            if let Some(next) = next
                && matches!(next, Token::Word(_) | Token::Number(..))
            {
                let joined = format!("{}{}", sigil, next);
                if let Some(marker) = pending.iter().find(|m| m.token == joined) {
                    return (Some(marker.clone()), 2);
                }
            }
            (pending.iter().find(|m| m.token == sigil).cloned(), 1)
        }
        _ => (None, 1),
    }
}

fn word_marker(word: &Word) -> Option<ParameterMarker> {
    at_name_marker(&word.value, word.quote_style.is_some())
}

/// `?`, `?1`, `$1` carry no name and are positional; `:id`, `@id`, `$id` are named.
fn placeholder_marker(token: &str) -> ParameterMarker {
    let mut chars = token.chars();
    let rest = match chars.next() {
        Some('?' | '$' | ':' | '@') => chars.as_str(),
        _ => token,
    };

    if rest.chars().all(|c| c.is_ascii_digit()) {
        ParameterMarker::new(MarkerKind::Positional, token)
    } else {
        ParameterMarker::new(MarkerKind::Named, token)
    }
}

fn at_identifier_marker(ident: &Ident) -> Option<ParameterMarker> {
    at_name_marker(&ident.value, ident.quote_style.is_some())
}

fn at_name_marker(value: &str, quoted: bool) -> Option<ParameterMarker> {
    // `@@name` is a system variable, not a parameter.
    if !quoted && value.starts_with('@') && !value.starts_with("@@") && value.len() > 1 {
        Some(ParameterMarker::new(MarkerKind::Named, value))
    } else {
        None
    }
}
