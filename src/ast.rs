use serde::{Deserialize, Serialize};

use crate::view_state::{
    BoundingBox, EndpointRef, EndpointViewState, FunctionViewState, StatementViewState, ViewState,
};

/// A program-structure node. The tree is strict: every node owns its
/// children and sizing never touches the structural fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Node {
    CompilationUnit(CompilationUnit),
    Function(Function),
    Block(Block),
    If(If),
    While(While),
    Foreach(Foreach),
    ExpressionStatement(ExpressionStatement),
    VariableDef(VariableDef),
    Assignment(Assignment),
    Return(Return),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilationUnit {
    #[serde(default)]
    pub top_level_nodes: Vec<Node>,
    #[serde(default)]
    pub view_state: ViewState,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    pub name: String,
    /// Closures and workers declared inside another function.
    #[serde(default)]
    pub lambda: bool,
    #[serde(default)]
    pub visible_endpoints: Vec<VisibleEndpoint>,
    #[serde(default)]
    pub body: Block,
    #[serde(default)]
    pub view_state: FunctionViewState,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleEndpoint {
    pub name: String,
    /// The pseudo-endpoint standing for the function's caller. It never gets
    /// a lane of its own.
    #[serde(default)]
    pub caller: bool,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub view_state: EndpointViewState,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(default)]
    pub statements: Vec<Node>,
    #[serde(default)]
    pub view_state: ViewState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct If {
    pub condition: Expr,
    #[serde(default)]
    pub body: Block,
    /// Either a plain block or another `If` for `else if` chains.
    #[serde(default)]
    pub else_statement: Option<Box<Node>>,
    #[serde(default)]
    pub view_state: ViewState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct While {
    pub condition: Expr,
    #[serde(default)]
    pub body: Block,
    #[serde(default)]
    pub view_state: ViewState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Foreach {
    #[serde(default)]
    pub variables: Vec<String>,
    pub collection: Expr,
    #[serde(default)]
    pub body: Block,
    #[serde(default)]
    pub view_state: ViewState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionStatement {
    pub expression: Expr,
    #[serde(default)]
    pub view_state: StatementViewState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDef {
    pub type_name: String,
    pub name: String,
    #[serde(default)]
    pub initializer: Option<Expr>,
    #[serde(default)]
    pub view_state: StatementViewState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub targets: Vec<String>,
    pub expression: Expr,
    #[serde(default)]
    pub view_state: StatementViewState,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Return {
    #[serde(default)]
    pub expression: Option<Expr>,
    #[serde(default)]
    pub view_state: ViewState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Expr {
    Literal { value: String },
    Identifier { name: String },
    Binary {
        op: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    FieldAccess { target: Box<Expr>, field: String },
    /// `check <expr>`: error-propagating wrapper, transparent for call
    /// classification.
    Check { expression: Box<Expr> },
    Invocation(Invocation),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invocation {
    #[serde(default)]
    pub receiver: Option<Box<Expr>>,
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<Expr>,
    /// Remote call against an endpoint, written `receiver->name(..)`.
    #[serde(default)]
    pub action: bool,
}

impl Node {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::CompilationUnit(_) => "CompilationUnit",
            Node::Function(_) => "Function",
            Node::Block(_) => "Block",
            Node::If(_) => "If",
            Node::While(_) => "While",
            Node::Foreach(_) => "Foreach",
            Node::ExpressionStatement(_) => "ExpressionStatement",
            Node::VariableDef(_) => "VariableDef",
            Node::Assignment(_) => "Assignment",
            Node::Return(_) => "Return",
        }
    }

    /// The node's primary bounding box, whatever shape its view-state has.
    pub fn bbox(&self) -> &BoundingBox {
        match self {
            Node::CompilationUnit(unit) => &unit.view_state.bbox,
            Node::Function(function) => &function.view_state.bbox,
            Node::Block(block) => &block.view_state.bbox,
            Node::If(node) => &node.view_state.bbox,
            Node::While(node) => &node.view_state.bbox,
            Node::Foreach(node) => &node.view_state.bbox,
            Node::ExpressionStatement(node) => &node.view_state.bbox,
            Node::VariableDef(node) => &node.view_state.bbox,
            Node::Assignment(node) => &node.view_state.bbox,
            Node::Return(node) => &node.view_state.bbox,
        }
    }

    pub fn statement_view_state(&self) -> Option<&StatementViewState> {
        match self {
            Node::ExpressionStatement(node) => Some(&node.view_state),
            Node::VariableDef(node) => Some(&node.view_state),
            Node::Assignment(node) => Some(&node.view_state),
            _ => None,
        }
    }

    /// Every function in the subtree, in the order a walk enters them.
    pub fn functions(&self) -> Vec<&Function> {
        let mut out = Vec::new();
        collect_functions(self, &mut out);
        out
    }

    /// The endpoint lane `key` points at, when `self` is the tree it was
    /// sized in.
    pub fn endpoint(&self, key: &EndpointRef) -> Option<&VisibleEndpoint> {
        let function = self.functions().into_iter().nth(key.function_index)?;
        function
            .visible_endpoints
            .get(key.index)
            .filter(|endpoint| function.name == key.function && endpoint.name == key.endpoint)
    }
}

fn collect_functions<'a>(node: &'a Node, out: &mut Vec<&'a Function>) {
    fn block<'a>(block: &'a Block, out: &mut Vec<&'a Function>) {
        for statement in &block.statements {
            collect_functions(statement, out);
        }
    }
    match node {
        Node::CompilationUnit(unit) => {
            for child in &unit.top_level_nodes {
                collect_functions(child, out);
            }
        }
        Node::Function(function) => {
            out.push(function);
            block(&function.body, out);
        }
        Node::Block(inner) => block(inner, out),
        Node::If(node) => {
            block(&node.body, out);
            if let Some(else_statement) = node.else_statement.as_deref() {
                collect_functions(else_statement, out);
            }
        }
        Node::While(node) => block(&node.body, out),
        Node::Foreach(node) => block(&node.body, out),
        Node::ExpressionStatement(_)
        | Node::VariableDef(_)
        | Node::Assignment(_)
        | Node::Return(_) => {}
    }
}

impl Expr {
    pub fn identifier(name: &str) -> Self {
        Expr::Identifier {
            name: name.to_string(),
        }
    }

    pub fn literal(value: &str) -> Self {
        Expr::Literal {
            value: value.to_string(),
        }
    }

    /// Strips any `check` wrappers.
    pub fn unwrap_check(&self) -> &Expr {
        let mut current = self;
        while let Expr::Check { expression } = current {
            current = expression;
        }
        current
    }
}

impl Invocation {
    /// `endpoint->name(args)`.
    pub fn action(endpoint: &str, name: &str, arguments: Vec<Expr>) -> Self {
        Self {
            receiver: Some(Box::new(Expr::identifier(endpoint))),
            name: name.to_string(),
            arguments,
            action: true,
        }
    }

    /// Plain local call `name(args)`.
    pub fn call(name: &str, arguments: Vec<Expr>) -> Self {
        Self {
            receiver: None,
            name: name.to_string(),
            arguments,
            action: false,
        }
    }
}

impl Function {
    pub fn new(name: &str, endpoints: Vec<VisibleEndpoint>, statements: Vec<Node>) -> Self {
        Self {
            name: name.to_string(),
            lambda: false,
            visible_endpoints: endpoints,
            body: Block::new(statements),
            view_state: FunctionViewState::default(),
        }
    }
}

impl VisibleEndpoint {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn caller(name: &str) -> Self {
        Self {
            name: name.to_string(),
            caller: true,
            ..Default::default()
        }
    }
}

impl Block {
    pub fn new(statements: Vec<Node>) -> Self {
        Self {
            statements,
            view_state: ViewState::default(),
        }
    }
}

impl ExpressionStatement {
    pub fn new(expression: Expr) -> Self {
        Self {
            expression,
            view_state: StatementViewState::default(),
        }
    }
}

/// Borrowed view over the three statement kinds that share one sizing rule.
#[derive(Debug, Clone, Copy)]
pub enum StatementRef<'a> {
    Expression(&'a ExpressionStatement),
    VariableDef(&'a VariableDef),
    Assignment(&'a Assignment),
}

impl<'a> StatementRef<'a> {
    /// The expression whose value the statement computes, if any.
    pub fn expression(self) -> Option<&'a Expr> {
        match self {
            StatementRef::Expression(node) => Some(&node.expression),
            StatementRef::VariableDef(node) => node.initializer.as_ref(),
            StatementRef::Assignment(node) => Some(&node.expression),
        }
    }
}
