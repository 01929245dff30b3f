use crate::ast::Function;
use crate::config::SizingConfig;
use crate::view_state::{BoundingBox, SimpleBox};

/// Composes a function panel from its sized body: a client lifeline, the
/// default worker holding the body, one lane per non-caller endpoint and a
/// heading.
pub(super) fn size_function(node: &mut Function, config: &SizingConfig) {
    let life_line = &config.life_line;
    let panel = &config.panel.padding;
    let heading = &config.panel_heading;
    let body = &node.body.view_state.bbox;
    let headers = life_line.header_height * 2.0;

    let client_height = life_line.line_height + headers;
    // One extra statement row for the closing marker.
    let worker_height = body.height + headers + config.statement.height;
    let worker_width = if body.width != 0.0 {
        body.width
    } else {
        life_line.width
    };
    let worker_margin = body
        .declared_left_margin()
        .unwrap_or(life_line.left_margin);

    // Both tracks render at the same height.
    let line_height = client_height.max(worker_height);

    let mut endpoint_width = 0.0;
    for endpoint in node.visible_endpoints.iter_mut().filter(|ep| !ep.caller) {
        let bbox = &mut endpoint.view_state.bbox;
        bbox.width = life_line.width;
        bbox.height = line_height;
        endpoint_width += bbox.width + life_line.horizontal_gutter;
    }

    let view_state = &mut node.view_state;
    view_state.client = SimpleBox {
        width: life_line.width,
        height: line_height,
    };
    view_state.default_worker.bbox = BoundingBox {
        width: worker_width,
        height: line_height,
        left_margin: Some(worker_margin),
        label: view_state.default_worker.bbox.label.take(),
    };
    view_state.default_worker.lifeline = SimpleBox {
        width: life_line.width,
        height: line_height,
    };
    view_state.body = SimpleBox {
        width: panel.left + endpoint_width + panel.right,
        height: panel.top + line_height + panel.bottom,
    };
    view_state.header = SimpleBox {
        width: heading.padding.total(),
        height: heading.height,
    };
    view_state.bbox.width = view_state.body.width.max(view_state.header.width);
    view_state.bbox.height = view_state.body.height + view_state.header.height;

    tracing::trace!(
        function = %node.name,
        width = view_state.bbox.width,
        height = view_state.bbox.height,
        "sized function"
    );
}
