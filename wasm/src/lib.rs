use pathway_viz::{AnnotationTable, Config, InlineSource, Viewer};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewerOptions {
    viewport_width: Option<f32>,
    source: Option<String>,
    sink: Option<String>,
    highlight_color: Option<String>,
    font_family: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HighlightState {
    selected: Vec<String>,
    nodes: Vec<String>,
    edges: Vec<usize>,
    path_count: usize,
}

fn build_viewer(options: ViewerOptions) -> Viewer {
    let mut config = Config::default();
    if let Some(source) = options.source {
        config.paths.source = source;
    }
    if let Some(sink) = options.sink {
        config.paths.sink = sink;
    }
    if let Some(color) = options.highlight_color {
        config.theme.highlight_color = color;
    }
    if let Some(font_family) = options.font_family {
        config.theme.font_family = font_family;
    }
    Viewer::new(config, options.viewport_width.unwrap_or(1770.0))
}

fn highlight_state(viewer: &Viewer) -> HighlightState {
    HighlightState {
        selected: viewer.selection().iter().map(str::to_string).collect(),
        nodes: viewer.highlight().nodes.iter().cloned().collect(),
        edges: viewer.highlight().edges.iter().copied().collect(),
        path_count: viewer.path_count(),
    }
}

/// Browser-side session: the host page fetches the documents, forwards
/// pointer clicks and re-renders from the returned SVG.
#[wasm_bindgen]
pub struct ModuleViewer {
    inner: Viewer,
}

#[wasm_bindgen]
impl ModuleViewer {
    #[wasm_bindgen(constructor)]
    pub fn new(options_json: Option<String>) -> Result<ModuleViewer, JsValue> {
        let options = match options_json {
            Some(raw) => serde_json::from_str::<ViewerOptions>(&raw)
                .map_err(|error| JsValue::from_str(&error.to_string()))?,
            None => ViewerOptions::default(),
        };
        Ok(ModuleViewer {
            inner: build_viewer(options),
        })
    }

    /// Loads `module_id` from the two documents and returns the fresh SVG.
    pub fn search(
        &mut self,
        nodes_json: &str,
        adjacency_json: &str,
        module_id: &str,
    ) -> Result<String, JsValue> {
        let source = InlineSource::new(nodes_json, adjacency_json);
        self.inner
            .search(&source, module_id)
            .map_err(|error| JsValue::from_str(&error.to_string()))?;
        Ok(self.svg())
    }

    /// Handles a node click (`modifier` = ctrl/meta held) and returns the
    /// restyled SVG.
    pub fn click(&mut self, node_id: &str, modifier: bool) -> String {
        self.inner.click(node_id, modifier);
        self.svg()
    }

    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&mut self) -> String {
        self.inner.clear_selection();
        self.svg()
    }

    pub fn resize(&mut self, viewport_width: f32) -> String {
        self.inner.resize(viewport_width);
        self.svg()
    }

    /// Applies an uploaded CSV; `None` clears the table. A CSV without the
    /// required columns is rejected and the previous table stays.
    #[wasm_bindgen(js_name = setAnnotations)]
    pub fn set_annotations(&mut self, csv_text: Option<String>) -> Result<usize, JsValue> {
        let Some(text) = csv_text else {
            self.inner.set_annotations(None);
            return Ok(0);
        };
        match AnnotationTable::parse_csv(&text) {
            Ok(table) => {
                let count = table.len();
                self.inner.set_annotations(Some(table));
                Ok(count)
            }
            Err(error) => Err(JsValue::from_str(&error.to_string())),
        }
    }

    /// Selection and highlight sets as JSON.
    #[wasm_bindgen(js_name = highlightState)]
    pub fn highlight_state(&self) -> String {
        serde_json::to_string(&highlight_state(&self.inner)).unwrap_or_default()
    }

    pub fn svg(&self) -> String {
        self.inner.render().unwrap_or_default()
    }
}
