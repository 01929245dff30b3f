use serde::{Deserialize, Serialize};

/// Width, height and the optional extras a sized node carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub width: f32,
    pub height: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_margin: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl BoundingBox {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// A left margin only counts when it is set and non-zero.
    pub fn declared_left_margin(&self) -> Option<f32> {
        self.left_margin.filter(|margin| *margin > 0.0)
    }
}

/// Width and height only; used for the function's fixed-shape sub-boxes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimpleBox {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    #[serde(default)]
    pub bbox: BoundingBox,
}

/// Key of the endpoint lane a statement calls into. Points into the endpoint
/// list of the function that opened the scope. `function_index` is that
/// function's position among all functions of the sized tree, pre-order, so
/// two functions sharing a name still get distinct keys; `Node::endpoint`
/// resolves a key against the same tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointRef {
    pub function: String,
    pub function_index: usize,
    pub endpoint: String,
    pub index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementViewState {
    #[serde(default)]
    pub bbox: BoundingBox,
    #[serde(default)]
    pub is_action: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<EndpointRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerViewState {
    #[serde(default)]
    pub bbox: BoundingBox,
    #[serde(default)]
    pub lifeline: SimpleBox,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionViewState {
    #[serde(default)]
    pub bbox: BoundingBox,
    #[serde(default)]
    pub body: SimpleBox,
    #[serde(default)]
    pub header: SimpleBox,
    /// Lifeline of the caller.
    #[serde(default)]
    pub client: SimpleBox,
    #[serde(default)]
    pub default_worker: WorkerViewState,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointViewState {
    #[serde(default)]
    pub bbox: BoundingBox,
}
