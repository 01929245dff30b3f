use crate::ast::StatementRef;
use crate::config::SizingConfig;
use crate::source::{SourceModel, action_label};
use crate::view_state::{BoundingBox, StatementViewState};

use super::EndpointScope;
use super::text::{TextMeasure, fit_statement_text};

/// Sizes one statement row. Calls into an endpoint of `scope` become action
/// rows: taller, labelled with just the action, and tied to the endpoint
/// lane they run against.
pub(super) fn size_statement<M, S>(
    statement: StatementRef<'_>,
    config: &SizingConfig,
    metrics: &M,
    source: &S,
    scope: Option<&EndpointScope>,
) -> StatementViewState
where
    M: TextMeasure + ?Sized,
    S: SourceModel + ?Sized,
{
    let settings = &config.statement;
    let label = fit_statement_text(&source.render_statement(statement), settings, metrics);
    let mut view_state = StatementViewState {
        bbox: BoundingBox {
            width: settings.width.max(label.width),
            height: settings.height,
            left_margin: None,
            label: Some(label.text),
        },
        is_action: false,
        endpoint: None,
    };

    let Some(invocation) = source.remote_call(statement) else {
        return view_state;
    };
    let endpoint_name = source.endpoint_name(invocation);
    let Some(endpoint) = scope.and_then(|scope| scope.resolve(&endpoint_name)) else {
        tracing::debug!(
            endpoint = %endpoint_name,
            "action target not in scope, sizing as a plain statement"
        );
        return view_state;
    };

    let rendered = source.render_invocation(invocation);
    let action = fit_statement_text(action_label(&rendered), settings, metrics);
    view_state.endpoint = Some(endpoint);
    view_state.is_action = true;
    view_state.bbox.height = settings.action_height;
    view_state.bbox.label = Some(action.text);
    view_state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Assignment, Expr, ExpressionStatement, Invocation, VariableDef};
    use crate::layout::{ELLIPSIS, MonospaceMetrics, ScopedEndpoint};
    use crate::source::SourceGen;

    const MONO: MonospaceMetrics = MonospaceMetrics { char_width: 7.0 };

    fn scope(names: &[&str]) -> EndpointScope {
        EndpointScope {
            function: "main".to_string(),
            function_index: 0,
            endpoints: names
                .iter()
                .map(|name| ScopedEndpoint {
                    name: name.to_string(),
                    caller: false,
                })
                .collect(),
        }
    }

    fn expression(expr: Expr) -> ExpressionStatement {
        ExpressionStatement::new(expr)
    }

    #[test]
    fn short_statement_gets_min_width() {
        let config = SizingConfig::default();
        let stmt = expression(Expr::Invocation(Invocation::call("f", Vec::new())));
        let vs = size_statement(StatementRef::Expression(&stmt), &config, &MONO, &SourceGen, None);
        assert_eq!(vs.bbox.width, config.statement.width);
        assert_eq!(vs.bbox.height, config.statement.height);
        assert_eq!(vs.bbox.label.as_deref(), Some("f();"));
        assert!(!vs.is_action);
    }

    #[test]
    fn long_statement_is_truncated_to_max_width() {
        let config = SizingConfig::default();
        let def = VariableDef {
            type_name: "string".to_string(),
            name: "message".to_string(),
            initializer: Some(Expr::literal(
                "\"a greeting long enough to run past the statement width limit\"",
            )),
            view_state: Default::default(),
        };
        let vs = size_statement(StatementRef::VariableDef(&def), &config, &MONO, &SourceGen, None);
        assert_eq!(vs.bbox.width, config.statement.max_width);
        let label = vs.bbox.label.expect("label");
        assert!(label.starts_with("string message = "));
        assert!(label.ends_with(ELLIPSIS));
    }

    #[test]
    fn action_in_scope_uses_action_height_and_label() {
        let config = SizingConfig::default();
        let stmt = Assignment {
            targets: vec!["response".to_string()],
            expression: Expr::Check {
                expression: Box::new(Expr::Invocation(Invocation::action(
                    "orderEP",
                    "post",
                    vec![Expr::literal("\"/orders\""), Expr::identifier("payload")],
                ))),
            },
            view_state: Default::default(),
        };
        let scope = scope(&["caller", "orderEP"]);
        let vs = size_statement(
            StatementRef::Assignment(&stmt),
            &config,
            &MONO,
            &SourceGen,
            Some(&scope),
        );
        assert!(vs.is_action);
        assert_eq!(vs.bbox.height, config.statement.action_height);
        assert_eq!(vs.bbox.label.as_deref(), Some("post(\"/orders\", payload)"));
        let endpoint = vs.endpoint.expect("endpoint");
        assert_eq!(endpoint.endpoint, "orderEP");
        assert_eq!(endpoint.index, 1);
        // Width still comes from the full statement source, which overflows.
        assert_eq!(vs.bbox.width, config.statement.max_width);
    }

    #[test]
    fn unresolved_action_stays_a_plain_statement() {
        let config = SizingConfig::default();
        let stmt = expression(Expr::Invocation(Invocation::action("ghost", "get", Vec::new())));
        let scope = scope(&["orderEP"]);
        let vs = size_statement(
            StatementRef::Expression(&stmt),
            &config,
            &MONO,
            &SourceGen,
            Some(&scope),
        );
        assert!(!vs.is_action);
        assert!(vs.endpoint.is_none());
        assert_eq!(vs.bbox.height, config.statement.height);
        assert_eq!(vs.bbox.label.as_deref(), Some("ghost->get();"));
    }

    #[test]
    fn action_height_ignores_label_length() {
        let config = SizingConfig::default();
        let scope = scope(&["ep"]);
        for name in ["a", "anExtremelyLongActionNameThatOverflowsTheStatementWidthEasily"] {
            let stmt = expression(Expr::Invocation(Invocation::action("ep", name, Vec::new())));
            let vs = size_statement(
                StatementRef::Expression(&stmt),
                &config,
                &MONO,
                &SourceGen,
                Some(&scope),
            );
            assert_eq!(vs.bbox.height, config.statement.action_height, "{name}");
        }
    }
}
