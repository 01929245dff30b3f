use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: json5::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalPadding {
    pub left: f32,
    pub right: f32,
}

impl HorizontalPadding {
    pub fn total(&self) -> f32 {
        self.left + self.right
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementConfig {
    /// Minimum statement width; also the lower bound handed to the fitter.
    pub width: f32,
    pub max_width: f32,
    pub height: f32,
    pub action_height: f32,
    pub padding: HorizontalPadding,
}

impl Default for StatementConfig {
    fn default() -> Self {
        Self {
            width: 120.0,
            max_width: 220.0,
            height: 30.0,
            action_height: 40.0,
            padding: HorizontalPadding {
                left: 5.0,
                right: 5.0,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifeLineConfig {
    pub width: f32,
    pub left_margin: f32,
    pub line_height: f32,
    pub header_height: f32,
    /// Horizontal space between neighbouring endpoint lanes.
    pub horizontal_gutter: f32,
}

impl Default for LifeLineConfig {
    fn default() -> Self {
        Self {
            width: 120.0,
            left_margin: 60.0,
            line_height: 240.0,
            header_height: 30.0,
            horizontal_gutter: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    pub padding: Padding,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            padding: Padding {
                top: 10.0,
                right: 60.0,
                bottom: 10.0,
                left: 60.0,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelHeadingConfig {
    pub height: f32,
    pub padding: HorizontalPadding,
}

impl Default for PanelHeadingConfig {
    fn default() -> Self {
        Self {
            height: 35.0,
            padding: HorizontalPadding {
                left: 35.0,
                right: 35.0,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowControlConfig {
    pub right_margin: f32,
    /// Added to a body's own left margin.
    pub left_margin: f32,
    /// Used when the body declares no left margin.
    pub left_margin_default: f32,
    pub condition_height: f32,
    pub foreach_height: f32,
    pub while_gap: f32,
    pub bottom_margin: f32,
}

impl Default for FlowControlConfig {
    fn default() -> Self {
        Self {
            right_margin: 50.0,
            left_margin: 50.0,
            left_margin_default: 60.0,
            condition_height: 60.0,
            foreach_height: 50.0,
            while_gap: 20.0,
            bottom_margin: 30.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextConfig {
    pub font_family: String,
    pub font_size: f32,
    /// Measure with the calibrated glyph table instead of system fonts.
    pub fast_text_metrics: bool,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_family: "Roboto, Helvetica, Arial, sans-serif".to_string(),
            font_size: 14.0,
            fast_text_metrics: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SizingConfig {
    pub statement: StatementConfig,
    pub life_line: LifeLineConfig,
    pub panel: PanelConfig,
    pub panel_heading: PanelHeadingConfig,
    pub flow_ctrl: FlowControlConfig,
    pub text: TextConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpConfig {
    pub pretty: bool,
    /// Also emit the function sub-boxes and endpoint lanes.
    pub include_sub_boxes: bool,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            include_sub_boxes: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub sizing: SizingConfig,
    pub dump: DumpConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct HorizontalPaddingFile {
    left: Option<f32>,
    right: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PaddingFile {
    top: Option<f32>,
    right: Option<f32>,
    bottom: Option<f32>,
    left: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct HeightFile {
    height: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct GutterFile {
    h: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct StatementConfigFile {
    width: Option<f32>,
    max_width: Option<f32>,
    height: Option<f32>,
    action_height: Option<f32>,
    padding: Option<HorizontalPaddingFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct LifeLineConfigFile {
    width: Option<f32>,
    left_margin: Option<f32>,
    line: Option<HeightFile>,
    header: Option<HeightFile>,
    gutter: Option<GutterFile>,
    line_height: Option<f32>,
    header_height: Option<f32>,
    horizontal_gutter: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PanelConfigFile {
    padding: Option<PaddingFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PanelHeadingConfigFile {
    height: Option<f32>,
    padding: Option<HorizontalPaddingFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct FlowControlConfigFile {
    right_margin: Option<f32>,
    left_margin: Option<f32>,
    left_margin_default: Option<f32>,
    condition: Option<HeightFile>,
    foreach: Option<HeightFile>,
    condition_height: Option<f32>,
    foreach_height: Option<f32>,
    while_gap: Option<f32>,
    bottom_margin: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct TextConfigFile {
    font_family: Option<String>,
    font_size: Option<f32>,
    fast_text_metrics: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct DumpConfigFile {
    pretty: Option<bool>,
    include_sub_boxes: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ConfigFile {
    statement: Option<StatementConfigFile>,
    life_line: Option<LifeLineConfigFile>,
    panel: Option<PanelConfigFile>,
    panel_heading: Option<PanelHeadingConfigFile>,
    #[serde(alias = "flowControl")]
    flow_ctrl: Option<FlowControlConfigFile>,
    text: Option<TextConfigFile>,
    dump: Option<DumpConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded sizing config");
    Ok(config)
}

/// Applies a JSON5 override document on top of the defaults. Fields the
/// document leaves out keep their default value.
pub fn parse_config(contents: &str) -> Result<Config, json5::Error> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    let mut config = Config::default();
    let sizing = &mut config.sizing;

    if let Some(statement) = parsed.statement {
        if let Some(v) = statement.width {
            sizing.statement.width = v;
        }
        if let Some(v) = statement.max_width {
            sizing.statement.max_width = v;
        }
        if let Some(v) = statement.height {
            sizing.statement.height = v;
        }
        if let Some(v) = statement.action_height {
            sizing.statement.action_height = v;
        }
        if let Some(padding) = statement.padding {
            merge_horizontal_padding(&mut sizing.statement.padding, padding);
        }
    }

    if let Some(life_line) = parsed.life_line {
        if let Some(v) = life_line.width {
            sizing.life_line.width = v;
        }
        if let Some(v) = life_line.left_margin {
            sizing.life_line.left_margin = v;
        }
        if let Some(v) = nested_height(life_line.line).or(life_line.line_height) {
            sizing.life_line.line_height = v;
        }
        if let Some(v) = nested_height(life_line.header).or(life_line.header_height) {
            sizing.life_line.header_height = v;
        }
        let gutter = life_line.gutter.and_then(|gutter| gutter.h);
        if let Some(v) = gutter.or(life_line.horizontal_gutter) {
            sizing.life_line.horizontal_gutter = v;
        }
    }

    if let Some(padding) = parsed.panel.and_then(|panel| panel.padding) {
        let target = &mut sizing.panel.padding;
        if let Some(v) = padding.top {
            target.top = v;
        }
        if let Some(v) = padding.right {
            target.right = v;
        }
        if let Some(v) = padding.bottom {
            target.bottom = v;
        }
        if let Some(v) = padding.left {
            target.left = v;
        }
    }

    if let Some(heading) = parsed.panel_heading {
        if let Some(v) = heading.height {
            sizing.panel_heading.height = v;
        }
        if let Some(padding) = heading.padding {
            merge_horizontal_padding(&mut sizing.panel_heading.padding, padding);
        }
    }

    if let Some(flow) = parsed.flow_ctrl {
        if let Some(v) = flow.right_margin {
            sizing.flow_ctrl.right_margin = v;
        }
        if let Some(v) = flow.left_margin {
            sizing.flow_ctrl.left_margin = v;
        }
        if let Some(v) = flow.left_margin_default {
            sizing.flow_ctrl.left_margin_default = v;
        }
        if let Some(v) = nested_height(flow.condition).or(flow.condition_height) {
            sizing.flow_ctrl.condition_height = v;
        }
        if let Some(v) = nested_height(flow.foreach).or(flow.foreach_height) {
            sizing.flow_ctrl.foreach_height = v;
        }
        if let Some(v) = flow.while_gap {
            sizing.flow_ctrl.while_gap = v;
        }
        if let Some(v) = flow.bottom_margin {
            sizing.flow_ctrl.bottom_margin = v;
        }
    }

    if let Some(text) = parsed.text {
        if let Some(v) = text.font_family {
            sizing.text.font_family = v;
        }
        if let Some(v) = text.font_size {
            sizing.text.font_size = v;
        }
        if let Some(v) = text.fast_text_metrics {
            sizing.text.fast_text_metrics = v;
        }
    }

    if let Some(dump) = parsed.dump {
        if let Some(v) = dump.pretty {
            config.dump.pretty = v;
        }
        if let Some(v) = dump.include_sub_boxes {
            config.dump.include_sub_boxes = v;
        }
    }

    Ok(config)
}

fn nested_height(file: Option<HeightFile>) -> Option<f32> {
    file.and_then(|file| file.height)
}

fn merge_horizontal_padding(target: &mut HorizontalPadding, file: HorizontalPaddingFile) {
    if let Some(v) = file.left {
        target.left = v;
    }
    if let Some(v) = file.right {
        target.right = v;
    }
}
