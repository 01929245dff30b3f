use crate::ast::Node;
use crate::config::DumpConfig;
use crate::view_state::{BoundingBox, EndpointRef, SimpleBox};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub boxes: Vec<BoxDump>,
}

/// One sized box. `path` is the slash-separated position of the node from
/// the root; sub-boxes of a function extend their function's path.
#[derive(Debug, Serialize)]
pub struct BoxDump {
    pub path: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Declared type of an endpoint lane.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    pub width: f32,
    pub height: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_margin: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_action: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<EndpointRef>,
}

impl BoxDump {
    fn from_bbox(path: String, kind: &str, bbox: &BoundingBox) -> Self {
        Self {
            path,
            kind: kind.to_string(),
            name: None,
            type_name: None,
            width: bbox.width,
            height: bbox.height,
            left_margin: bbox.left_margin,
            label: bbox.label.clone(),
            is_action: false,
            endpoint: None,
        }
    }

    fn from_simple(path: String, kind: &str, simple: SimpleBox) -> Self {
        Self::from_bbox(path, kind, &BoundingBox::new(simple.width, simple.height))
    }
}

impl LayoutDump {
    pub fn from_tree(root: &Node, config: &DumpConfig) -> Self {
        let mut boxes = Vec::new();
        collect(root, "0".to_string(), config, &mut boxes);
        let bbox = root.bbox();
        Self {
            width: bbox.width,
            height: bbox.height,
            boxes,
        }
    }

    pub fn node_count(&self) -> usize {
        self.boxes
            .iter()
            .filter(|entry| !entry.kind.contains('.'))
            .count()
    }
}

fn collect(node: &Node, path: String, config: &DumpConfig, out: &mut Vec<BoxDump>) {
    let mut entry = BoxDump::from_bbox(path.clone(), node.kind_name(), node.bbox());
    if let Some(statement) = node.statement_view_state() {
        entry.is_action = statement.is_action;
        entry.endpoint = statement.endpoint.clone();
    }

    match node {
        Node::CompilationUnit(unit) => {
            out.push(entry);
            for (idx, child) in unit.top_level_nodes.iter().enumerate() {
                collect(child, format!("{path}/{idx}"), config, out);
            }
        }
        Node::Function(function) => {
            entry.name = Some(function.name.clone());
            out.push(entry);
            if config.include_sub_boxes {
                let vs = &function.view_state;
                out.push(BoxDump::from_simple(format!("{path}/body"), "Function.body", vs.body));
                out.push(BoxDump::from_simple(
                    format!("{path}/header"),
                    "Function.header",
                    vs.header,
                ));
                out.push(BoxDump::from_simple(
                    format!("{path}/client"),
                    "Function.client",
                    vs.client,
                ));
                out.push(BoxDump::from_bbox(
                    format!("{path}/defaultWorker"),
                    "Function.defaultWorker",
                    &vs.default_worker.bbox,
                ));
                out.push(BoxDump::from_simple(
                    format!("{path}/defaultWorker/lifeline"),
                    "Function.lifeline",
                    vs.default_worker.lifeline,
                ));
                for (idx, endpoint) in function.visible_endpoints.iter().enumerate() {
                    let mut lane = BoxDump::from_bbox(
                        format!("{path}/endpoint/{idx}"),
                        "Function.endpoint",
                        &endpoint.view_state.bbox,
                    );
                    lane.name = Some(endpoint.name.clone());
                    lane.type_name = endpoint.type_name.clone();
                    out.push(lane);
                }
            }
            out.push(BoxDump::from_bbox(
                format!("{path}/block"),
                "Block",
                &function.body.view_state.bbox,
            ));
            collect_block_children(&function.body.statements, &path, "", config, out);
        }
        Node::Block(block) => {
            out.push(entry);
            collect_block_children(&block.statements, &path, "", config, out);
        }
        Node::If(node) => {
            out.push(entry);
            out.push(BoxDump::from_bbox(format!("{path}/then"), "Block", &node.body.view_state.bbox));
            collect_block_children(&node.body.statements, &path, "then/", config, out);
            if let Some(else_statement) = node.else_statement.as_deref() {
                collect(else_statement, format!("{path}/else"), config, out);
            }
        }
        Node::While(node) => {
            out.push(entry);
            out.push(BoxDump::from_bbox(format!("{path}/do"), "Block", &node.body.view_state.bbox));
            collect_block_children(&node.body.statements, &path, "do/", config, out);
        }
        Node::Foreach(node) => {
            out.push(entry);
            out.push(BoxDump::from_bbox(format!("{path}/do"), "Block", &node.body.view_state.bbox));
            collect_block_children(&node.body.statements, &path, "do/", config, out);
        }
        Node::ExpressionStatement(_)
        | Node::VariableDef(_)
        | Node::Assignment(_)
        | Node::Return(_) => out.push(entry),
    }
}

fn collect_block_children(
    statements: &[Node],
    path: &str,
    prefix: &str,
    config: &DumpConfig,
    out: &mut Vec<BoxDump>,
) {
    for (idx, child) in statements.iter().enumerate() {
        collect(child, format!("{path}/{prefix}{idx}"), config, out);
    }
}

pub fn write_dump(dump: &LayoutDump, path: Option<&Path>, pretty: bool) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            write_json(dump, &mut writer, pretty)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_json(dump, &mut writer, pretty)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

fn write_json<W: Write>(dump: &LayoutDump, writer: W, pretty: bool) -> serde_json::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, dump)
    } else {
        serde_json::to_writer(writer, dump)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Block, Expr, ExpressionStatement, Function, Invocation, VisibleEndpoint, While};

    fn sample() -> Node {
        Node::Function(Function::new(
            "main",
            vec![VisibleEndpoint::new("ep")],
            vec![
                Node::ExpressionStatement(ExpressionStatement::new(Expr::Invocation(
                    Invocation::call("a", Vec::new()),
                ))),
                Node::While(While {
                    condition: Expr::literal("true"),
                    body: Block::new(vec![Node::ExpressionStatement(ExpressionStatement::new(
                        Expr::Invocation(Invocation::call("b", Vec::new())),
                    ))]),
                    view_state: Default::default(),
                }),
            ],
        ))
    }

    #[test]
    fn dump_lists_each_node_once() {
        let dump = LayoutDump::from_tree(&sample(), &DumpConfig::default());
        // function, its block, two statements, while, while's block
        assert_eq!(dump.node_count(), 6);
        let paths: Vec<&str> = dump.boxes.iter().map(|entry| entry.path.as_str()).collect();
        assert!(paths.contains(&"0/1/do/0"));
        assert!(paths.contains(&"0/endpoint/0"));
    }

    #[test]
    fn containers_precede_their_children() {
        let dump = LayoutDump::from_tree(&sample(), &DumpConfig::default());
        let position = |path: &str| {
            dump.boxes
                .iter()
                .position(|entry| entry.path == path)
                .unwrap_or_else(|| panic!("missing {path}"))
        };
        assert_eq!(position("0"), 0);
        assert!(position("0/block") < position("0/0"));
        assert!(position("0/1") < position("0/1/do"));
        assert!(position("0/1/do") < position("0/1/do/0"));
        assert!(position("0/defaultWorker") < position("0/defaultWorker/lifeline"));
    }

    #[test]
    fn endpoint_lanes_carry_their_type() {
        let mut tree = sample();
        if let Node::Function(function) = &mut tree {
            function.visible_endpoints[0].type_name = Some("http:Client".to_string());
        }
        let dump = LayoutDump::from_tree(&tree, &DumpConfig::default());
        let lane = dump
            .boxes
            .iter()
            .find(|entry| entry.kind == "Function.endpoint")
            .expect("lane");
        assert_eq!(lane.type_name.as_deref(), Some("http:Client"));
    }

    #[test]
    fn sub_boxes_can_be_left_out() {
        let config = DumpConfig {
            include_sub_boxes: false,
            ..DumpConfig::default()
        };
        let dump = LayoutDump::from_tree(&sample(), &config);
        assert!(dump.boxes.iter().all(|entry| !entry.kind.contains('.')));
    }

    #[test]
    fn serializes_without_empty_fields() {
        let dump = LayoutDump::from_tree(&sample(), &DumpConfig::default());
        let mut buf = Vec::new();
        write_json(&dump, &mut buf, false).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("\"kind\":\"While\""));
        assert!(!text.contains("isAction"));
        assert!(!text.contains("is_action"));
    }
}
