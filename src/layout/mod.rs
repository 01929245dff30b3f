//! Post-order box sizing.
//!
//! [`SizingPass`] is a [`Visitor`]: every `end_*` handler reads the boxes of
//! already-sized children and writes the visited node's own view-state. The
//! pass also carries the endpoint scope, the list of endpoints that call
//! statements resolve against.

mod control_flow;
mod function;
mod statement;
pub mod text;

use crate::ast::{
    Assignment, Block, ExpressionStatement, Foreach, Function, If, Node, StatementRef,
    VariableDef, While,
};
use crate::config::{SizingConfig, TextConfig};
use crate::source::SourceModel;
use crate::text_metrics::FontMetrics;
use crate::view_state::{EndpointRef, StatementViewState};
use crate::visitor::{Visitor, walk};

pub use text::{
    ELLIPSIS, FittedText, GlyphTable, MonospaceMetrics, TextMeasure, fit_statement_text, fit_text,
};

/// Sizes every node of `node`'s subtree in one pass.
#[tracing::instrument(level = "debug", skip_all, fields(kind = node.kind_name()))]
pub fn size_tree<M, S>(node: &mut Node, config: &SizingConfig, metrics: &M, source: &S)
where
    M: TextMeasure + ?Sized,
    S: SourceModel + ?Sized,
{
    let mut pass = SizingPass::new(config, metrics, source);
    walk(&mut pass, node);
}

/// The text metrics `text` asks for: the glyph table when fast metrics are
/// on, system fonts otherwise.
pub fn text_measure_for(text: &TextConfig) -> Box<dyn TextMeasure + Send + Sync> {
    if text.fast_text_metrics {
        Box::new(GlyphTable::new(text.font_size))
    } else {
        let metrics = FontMetrics::new(&text.font_family, text.font_size);
        tracing::debug!(
            family = %text.font_family,
            system_font = metrics.has_face(),
            "text metrics ready"
        );
        Box::new(metrics)
    }
}

/// Endpoints opened by a non-lambda function, in declaration order.
#[derive(Debug, Clone)]
pub struct EndpointScope {
    pub function: String,
    /// Pre-order position of `function` among the functions of the tree.
    pub function_index: usize,
    pub endpoints: Vec<ScopedEndpoint>,
}

#[derive(Debug, Clone)]
pub struct ScopedEndpoint {
    pub name: String,
    pub caller: bool,
}

impl EndpointScope {
    fn of(function: &Function, function_index: usize) -> Self {
        Self {
            function: function.name.clone(),
            function_index,
            endpoints: function
                .visible_endpoints
                .iter()
                .map(|endpoint| ScopedEndpoint {
                    name: endpoint.name.clone(),
                    caller: endpoint.caller,
                })
                .collect(),
        }
    }

    /// First endpoint named exactly `name`.
    pub fn resolve(&self, name: &str) -> Option<EndpointRef> {
        self.endpoints
            .iter()
            .position(|endpoint| endpoint.name == name)
            .map(|index| EndpointRef {
                function: self.function.clone(),
                function_index: self.function_index,
                endpoint: name.to_string(),
                index,
            })
    }
}

pub struct SizingPass<'a, M: ?Sized, S: ?Sized> {
    config: &'a SizingConfig,
    metrics: &'a M,
    source: &'a S,
    scopes: Vec<EndpointScope>,
    /// One entry per function currently being visited: whether it opened a
    /// scope that has to be closed again on the way out.
    opened: Vec<bool>,
    functions_entered: usize,
}

impl<'a, M, S> SizingPass<'a, M, S>
where
    M: TextMeasure + ?Sized,
    S: SourceModel + ?Sized,
{
    pub fn new(config: &'a SizingConfig, metrics: &'a M, source: &'a S) -> Self {
        Self {
            config,
            metrics,
            source,
            scopes: Vec::new(),
            opened: Vec::new(),
            functions_entered: 0,
        }
    }

    /// The scope call statements currently resolve against.
    pub fn active_scope(&self) -> Option<&EndpointScope> {
        self.scopes.last()
    }

    fn statement(&self, statement: StatementRef<'_>) -> StatementViewState {
        statement::size_statement(
            statement,
            self.config,
            self.metrics,
            self.source,
            self.active_scope(),
        )
    }
}

impl<M, S> Visitor for SizingPass<'_, M, S>
where
    M: TextMeasure + ?Sized,
    S: SourceModel + ?Sized,
{
    fn begin_function(&mut self, node: &mut Function) {
        let function_index = self.functions_entered;
        self.functions_entered += 1;
        let opens = !node.lambda && !node.visible_endpoints.is_empty();
        if opens {
            tracing::debug!(
                function = %node.name,
                endpoints = node.visible_endpoints.len(),
                "entering endpoint scope"
            );
            self.scopes.push(EndpointScope::of(node, function_index));
        }
        self.opened.push(opens);
    }

    fn end_function(&mut self, node: &mut Function) {
        function::size_function(node, self.config);
        if self.opened.pop().unwrap_or(false) {
            self.scopes.pop();
        }
    }

    fn end_block(&mut self, node: &mut Block) {
        control_flow::size_block(node);
    }

    fn end_if(&mut self, node: &mut If) {
        control_flow::size_if(node, self.config);
    }

    fn end_while(&mut self, node: &mut While) {
        control_flow::size_while(node, self.config);
    }

    fn end_foreach(&mut self, node: &mut Foreach) {
        control_flow::size_foreach(node, self.config);
    }

    fn end_expression_statement(&mut self, node: &mut ExpressionStatement) {
        node.view_state = self.statement(StatementRef::Expression(node));
    }

    fn end_variable_def(&mut self, node: &mut VariableDef) {
        node.view_state = self.statement(StatementRef::VariableDef(node));
    }

    fn end_assignment(&mut self, node: &mut Assignment) {
        node.view_state = self.statement(StatementRef::Assignment(node));
    }
}
