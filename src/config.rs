use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Interior padding of the canvas, outside which no node is placed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

impl Default for Padding {
    fn default() -> Self {
        // Wide horizontal padding leaves room for step labels and the legend.
        Self {
            top: 20.0,
            right: 250.0,
            bottom: 20.0,
            left: 300.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub node_width: f32,
    pub node_height: f32,
    pub node_spacing: f32,
    pub rank_spacing: f32,
    pub margin_x: f32,
    pub margin_y: f32,
    pub padding: Padding,
    pub max_canvas_width: f32,
    pub canvas_height: f32,
    /// Horizontal breathing room subtracted from the viewport width.
    pub viewport_gutter: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 40.0,
            node_height: 40.0,
            node_spacing: 20.0,
            rank_spacing: 50.0,
            margin_x: 0.0,
            margin_y: 0.0,
            padding: Padding::default(),
            max_canvas_width: 1750.0,
            canvas_height: 1200.0,
            viewport_gutter: 20.0,
        }
    }
}

impl LayoutConfig {
    /// Canvas size that fits a viewport of the given width.
    pub fn canvas_for_viewport(&self, viewport_width: f32) -> (f32, f32) {
        let width = self
            .max_canvas_width
            .min(viewport_width - self.viewport_gutter)
            .max(1.0);
        (width, self.canvas_height)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    pub source: String,
    pub sink: String,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            source: "START".to_string(),
            sink: "SINK".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1750.0,
            height: 1200.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub paths: PathConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::default();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            paths: PathConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaddingFile {
    top: Option<f32>,
    right: Option<f32>,
    bottom: Option<f32>,
    left: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    node_width: Option<f32>,
    node_height: Option<f32>,
    node_spacing: Option<f32>,
    rank_spacing: Option<f32>,
    margin_x: Option<f32>,
    margin_y: Option<f32>,
    padding: Option<PaddingFile>,
    max_canvas_width: Option<f32>,
    canvas_height: Option<f32>,
    viewport_gutter: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PathConfigFile {
    source: Option<String>,
    sink: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    node_label_size: Option<f32>,
    step_label_size: Option<f32>,
    highlight_color: Option<String>,
    selection_color: Option<String>,
    node_stroke: Option<String>,
    fallback_node_fill: Option<String>,
    fallback_edge_stroke: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    layout: Option<LayoutConfigFile>,
    paths: Option<PathConfigFile>,
    theme_variables: Option<ThemeVariables>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(layout) = parsed.layout {
        let target = &mut config.layout;
        if let Some(v) = layout.node_width {
            target.node_width = v;
        }
        if let Some(v) = layout.node_height {
            target.node_height = v;
        }
        if let Some(v) = layout.node_spacing {
            target.node_spacing = v;
        }
        if let Some(v) = layout.rank_spacing {
            target.rank_spacing = v;
        }
        if let Some(v) = layout.margin_x {
            target.margin_x = v;
        }
        if let Some(v) = layout.margin_y {
            target.margin_y = v;
        }
        if let Some(padding) = layout.padding {
            if let Some(v) = padding.top {
                target.padding.top = v;
            }
            if let Some(v) = padding.right {
                target.padding.right = v;
            }
            if let Some(v) = padding.bottom {
                target.padding.bottom = v;
            }
            if let Some(v) = padding.left {
                target.padding.left = v;
            }
        }
        if let Some(v) = layout.max_canvas_width {
            target.max_canvas_width = v;
        }
        if let Some(v) = layout.canvas_height {
            target.canvas_height = v;
        }
        if let Some(v) = layout.viewport_gutter {
            target.viewport_gutter = v;
        }
    }

    if let Some(paths) = parsed.paths {
        if let Some(v) = paths.source {
            config.paths.source = v;
        }
        if let Some(v) = paths.sink {
            config.paths.sink = v;
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.node_label_size {
            config.theme.node_label_size = v;
        }
        if let Some(v) = vars.step_label_size {
            config.theme.step_label_size = v;
        }
        if let Some(v) = vars.highlight_color {
            config.theme.highlight_color = v;
        }
        if let Some(v) = vars.selection_color {
            config.theme.selection_color = v;
        }
        if let Some(v) = vars.node_stroke {
            config.theme.node_stroke = v;
        }
        if let Some(v) = vars.fallback_node_fill {
            config.theme.fallback_node_fill = v;
        }
        if let Some(v) = vars.fallback_edge_stroke {
            config.theme.fallback_edge_stroke = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v.clone();
            config.render.background = v;
        }
    }

    config.render.width = config.layout.max_canvas_width;
    config.render.height = config.layout.canvas_height;

    Ok(config)
}
