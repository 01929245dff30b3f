use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::{Expr, Invocation, StatementRef};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Separator between an endpoint and the action invoked on it.
pub const ACTION_SEPARATOR: &str = "->";

/// Source rendering and call classification the sizing pass relies on.
pub trait SourceModel {
    fn render_statement(&self, statement: StatementRef<'_>) -> String;

    fn render_invocation(&self, invocation: &Invocation) -> String;

    /// The remote call made by `statement`, if it makes one.
    fn remote_call<'a>(&self, statement: StatementRef<'a>) -> Option<&'a Invocation>;

    fn endpoint_name(&self, invocation: &Invocation) -> String;
}

/// Renders the node model back to its single-line surface syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceGen;

impl SourceModel for SourceGen {
    fn render_statement(&self, statement: StatementRef<'_>) -> String {
        match statement {
            StatementRef::Expression(node) => format!("{};", render_expr(&node.expression)),
            StatementRef::VariableDef(node) => match &node.initializer {
                Some(init) => format!("{} {} = {};", node.type_name, node.name, render_expr(init)),
                None => format!("{} {};", node.type_name, node.name),
            },
            StatementRef::Assignment(node) => format!(
                "{} = {};",
                node.targets.join(", "),
                render_expr(&node.expression)
            ),
        }
    }

    fn render_invocation(&self, invocation: &Invocation) -> String {
        render_invocation(invocation)
    }

    fn remote_call<'a>(&self, statement: StatementRef<'a>) -> Option<&'a Invocation> {
        match statement.expression()?.unwrap_check() {
            Expr::Invocation(invocation) if invocation.action => Some(invocation),
            _ => None,
        }
    }

    fn endpoint_name(&self, invocation: &Invocation) -> String {
        invocation
            .receiver
            .as_deref()
            .map(render_expr)
            .unwrap_or_default()
    }
}

pub fn render_expr(expr: &Expr) -> String {
    match expr {
        Expr::Literal { value } => normalize_whitespace(value),
        Expr::Identifier { name } => normalize_whitespace(name),
        Expr::Binary { op, left, right } => {
            format!("{} {} {}", render_expr(left), op.trim(), render_expr(right))
        }
        Expr::FieldAccess { target, field } => format!("{}.{}", render_expr(target), field),
        Expr::Check { expression } => format!("check {}", render_expr(expression)),
        Expr::Invocation(invocation) => render_invocation(invocation),
    }
}

fn render_invocation(invocation: &Invocation) -> String {
    let arguments = invocation
        .arguments
        .iter()
        .map(render_expr)
        .collect::<Vec<_>>()
        .join(", ");
    match invocation.receiver.as_deref() {
        Some(receiver) if invocation.action => format!(
            "{}{}{}({})",
            render_expr(receiver),
            ACTION_SEPARATOR,
            invocation.name,
            arguments
        ),
        Some(receiver) => format!("{}.{}({})", render_expr(receiver), invocation.name, arguments),
        None => format!("{}({})", invocation.name, arguments),
    }
}

fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}

/// Text after the last action separator, or an empty string without one.
pub fn action_label(source: &str) -> &str {
    match source.rfind(ACTION_SEPARATOR) {
        Some(idx) => &source[idx + ACTION_SEPARATOR.len()..],
        None => "",
    }
}
