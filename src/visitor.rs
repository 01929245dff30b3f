//! Depth-first driver over the node tree.
//!
//! `walk` visits every child before calling the `end_*` callback of its
//! parent, so a handler always sees fully sized children. Functions also get
//! a `begin_function` call before their body is visited.

use crate::ast::{
    Assignment, Block, CompilationUnit, ExpressionStatement, Foreach, Function, If, Node, Return,
    VariableDef, While,
};

/// Per-kind callbacks. Every method defaults to a no-op; a pass overrides
/// the kinds it cares about.
pub trait Visitor {
    fn begin_function(&mut self, _node: &mut Function) {}
    fn end_function(&mut self, _node: &mut Function) {}
    fn end_compilation_unit(&mut self, _node: &mut CompilationUnit) {}
    fn end_block(&mut self, _node: &mut Block) {}
    fn end_if(&mut self, _node: &mut If) {}
    fn end_while(&mut self, _node: &mut While) {}
    fn end_foreach(&mut self, _node: &mut Foreach) {}
    fn end_expression_statement(&mut self, _node: &mut ExpressionStatement) {}
    fn end_variable_def(&mut self, _node: &mut VariableDef) {}
    fn end_assignment(&mut self, _node: &mut Assignment) {}
    fn end_return(&mut self, _node: &mut Return) {}
}

pub fn walk<V: Visitor + ?Sized>(visitor: &mut V, node: &mut Node) {
    match node {
        Node::CompilationUnit(unit) => {
            for child in &mut unit.top_level_nodes {
                walk(visitor, child);
            }
            visitor.end_compilation_unit(unit);
        }
        Node::Function(function) => walk_function(visitor, function),
        Node::Block(block) => walk_block(visitor, block),
        Node::If(node) => {
            walk_block(visitor, &mut node.body);
            if let Some(else_statement) = node.else_statement.as_deref_mut() {
                walk(visitor, else_statement);
            }
            visitor.end_if(node);
        }
        Node::While(node) => {
            walk_block(visitor, &mut node.body);
            visitor.end_while(node);
        }
        Node::Foreach(node) => {
            walk_block(visitor, &mut node.body);
            visitor.end_foreach(node);
        }
        Node::ExpressionStatement(node) => visitor.end_expression_statement(node),
        Node::VariableDef(node) => visitor.end_variable_def(node),
        Node::Assignment(node) => visitor.end_assignment(node),
        Node::Return(node) => visitor.end_return(node),
    }
}

pub fn walk_function<V: Visitor + ?Sized>(visitor: &mut V, function: &mut Function) {
    visitor.begin_function(function);
    walk_block(visitor, &mut function.body);
    visitor.end_function(function);
}

pub fn walk_block<V: Visitor + ?Sized>(visitor: &mut V, block: &mut Block) {
    for statement in &mut block.statements {
        walk(visitor, statement);
    }
    visitor.end_block(block);
}
