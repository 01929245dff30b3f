use crate::ast::{Block, Foreach, If, While};
use crate::config::{FlowControlConfig, SizingConfig};
use crate::view_state::BoundingBox;

/// Statements stack vertically: heights add up, the widest one sets the
/// width. The left margin is the smallest one any child declares.
pub(super) fn size_block(node: &mut Block) {
    let statements = &node.statements;
    let width = statements
        .iter()
        .map(|statement| statement.bbox().width)
        .fold(0.0, f32::max);
    let height = statements
        .iter()
        .map(|statement| statement.bbox().height)
        .sum::<f32>();
    let left_margin = statements
        .iter()
        .filter_map(|statement| statement.bbox().declared_left_margin())
        .reduce(f32::min);

    let bbox = &mut node.view_state.bbox;
    bbox.width = width;
    bbox.height = height;
    bbox.left_margin = left_margin;
}

pub(super) fn size_while(node: &mut While, config: &SizingConfig) {
    let flow = &config.flow_ctrl;
    size_loop(
        &mut node.view_state.bbox,
        &node.body.view_state.bbox,
        flow.condition_height,
        flow,
    );
}

pub(super) fn size_foreach(node: &mut Foreach, config: &SizingConfig) {
    let flow = &config.flow_ctrl;
    size_loop(
        &mut node.view_state.bbox,
        &node.body.view_state.bbox,
        flow.foreach_height,
        flow,
    );
}

fn size_loop(
    bbox: &mut BoundingBox,
    body: &BoundingBox,
    header_height: f32,
    flow: &FlowControlConfig,
) {
    bbox.width = body.width + flow.right_margin;
    bbox.height = body.height + header_height + flow.while_gap + flow.bottom_margin;
    bbox.left_margin = Some(nested_left_margin(body, flow));
}

/// The else branch sits beside the body, so its width adds rather than
/// maxes.
pub(super) fn size_if(node: &mut If, config: &SizingConfig) {
    let flow = &config.flow_ctrl;
    let body = &node.body.view_state.bbox;

    let mut width = body.width;
    let mut height = body.height + flow.condition_height + flow.bottom_margin;
    if let Some(else_statement) = node.else_statement.as_deref() {
        let else_box = else_statement.bbox();
        width += else_box.width;
        height += else_box.height;
    }

    let left_margin = nested_left_margin(body, flow);
    let bbox = &mut node.view_state.bbox;
    bbox.width = width;
    bbox.height = height;
    bbox.left_margin = Some(left_margin);
}

fn nested_left_margin(body: &BoundingBox, flow: &FlowControlConfig) -> f32 {
    match body.declared_left_margin() {
        Some(margin) => margin + flow.left_margin,
        None => flow.left_margin_default,
    }
}
