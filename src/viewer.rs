//! Interactive session over one loaded module.
//!
//! A [`Viewer`] owns the current module, its layout, the optional annotation
//! table, the selection, and the derived highlight. Every operation is
//! synchronous; a failed load or annotation parse leaves the session as it
//! was.

use crate::annotation::AnnotationTable;
use crate::config::Config;
use crate::error::{AnnotationError, LoadError};
use crate::highlight::{EdgeLookup, Highlight, clear_highlight, project};
use crate::ir::Module;
use crate::layout::{Canvas, Layout, compute_layout};
use crate::paths::find_paths_through_required;
use crate::render::{Scene, render_svg};
use crate::selection::SelectionModel;
use crate::store::{DocumentSource, load_module};
use log::{debug, info};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Nothing selected; baseline styling.
    Idle,
    /// At least one node selected; highlight reflects the selection.
    Selected,
}

#[derive(Debug, Clone)]
pub struct Viewer {
    config: Config,
    viewport_width: f32,
    module: Option<Module>,
    layout: Option<Layout>,
    edge_lookup: EdgeLookup,
    annotations: Option<AnnotationTable>,
    selection: SelectionModel,
    highlight: Highlight,
    path_count: usize,
}

impl Viewer {
    pub fn new(config: Config, viewport_width: f32) -> Self {
        Self {
            config,
            viewport_width,
            module: None,
            layout: None,
            edge_lookup: EdgeLookup::default(),
            annotations: None,
            selection: SelectionModel::new(),
            highlight: Highlight::default(),
            path_count: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn module(&self) -> Option<&Module> {
        self.module.as_ref()
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn annotations(&self) -> Option<&AnnotationTable> {
        self.annotations.as_ref()
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn highlight(&self) -> &Highlight {
        &self.highlight
    }

    /// Number of paths behind the current highlight.
    pub fn path_count(&self) -> usize {
        self.path_count
    }

    pub fn state(&self) -> ViewState {
        if self.selection.is_empty() {
            ViewState::Idle
        } else {
            ViewState::Selected
        }
    }

    /// Fetches a module fresh and makes it current. On error the previous
    /// module, selection and highlight stay in place.
    pub fn search(&mut self, source: &dyn DocumentSource, raw_id: &str) -> Result<(), LoadError> {
        let module = load_module(source, raw_id)?;
        self.show(module);
        Ok(())
    }

    /// Replaces the current module and lays it out. Selection and highlight
    /// are reset since the old ids no longer apply.
    pub fn show(&mut self, module: Module) {
        self.edge_lookup = EdgeLookup::new(&module.links);
        self.module = Some(module);
        self.selection.clear();
        self.highlight = clear_highlight();
        self.path_count = 0;
        self.relayout();
    }

    /// Re-lays the current module out for a new viewport width.
    pub fn resize(&mut self, viewport_width: f32) {
        self.viewport_width = viewport_width;
        self.relayout();
    }

    fn relayout(&mut self) {
        let Some(module) = self.module.as_mut() else {
            return;
        };
        let canvas = Canvas::for_viewport(self.viewport_width, &self.config.layout);
        let layout = compute_layout(&mut module.nodes, &module.links, canvas, &self.config.layout);
        debug!(
            "laid out {} on {}x{} canvas",
            module.id, layout.canvas.width, layout.canvas.height
        );
        self.layout = Some(layout);
    }

    /// Pointer click on a node; `modifier_pressed` is ctrl/meta.
    pub fn click(&mut self, node_id: &str, modifier_pressed: bool) -> &Highlight {
        self.selection.click(node_id, modifier_pressed);
        self.refresh_highlight();
        &self.highlight
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.refresh_highlight();
    }

    fn refresh_highlight(&mut self) {
        self.highlight = clear_highlight();
        self.path_count = 0;
        if self.selection.is_empty() {
            return;
        }
        let Some(module) = self.module.as_ref() else {
            return;
        };
        let paths = find_paths_through_required(
            &module.links,
            self.selection.as_set(),
            &self.config.paths.source,
            &self.config.paths.sink,
        );
        debug!(
            "{} paths through {} selected nodes",
            paths.len(),
            self.selection.len()
        );
        self.path_count = paths.len();
        self.highlight = project(&paths, &self.edge_lookup);
    }

    pub fn set_annotations(&mut self, annotations: Option<AnnotationTable>) {
        self.annotations = annotations;
    }

    /// Parses a CSV and makes it the active annotation table. A parse failure
    /// keeps the previous table.
    pub fn load_annotations(&mut self, path: &Path) -> Result<usize, AnnotationError> {
        let table = AnnotationTable::from_path(path)?;
        let count = table.len();
        info!("loaded {count} annotations from {}", path.display());
        self.annotations = Some(table);
        Ok(count)
    }

    pub fn scene(&self) -> Option<Scene<'_>> {
        let module = self.module.as_ref()?;
        let layout = self.layout.as_ref()?;
        Some(Scene {
            module,
            layout,
            annotations: self.annotations.as_ref(),
            selection: &self.selection,
            highlight: &self.highlight,
        })
    }

    /// SVG for the current state, or `None` before the first load.
    pub fn render(&self) -> Option<String> {
        self.scene().map(|scene| render_svg(&scene, &self.config.theme))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Link, ModuleId, Node};
    use crate::store::InlineSource;

    fn module(id: &str) -> Module {
        Module::new(
            ModuleId::parse(id).unwrap(),
            vec![
                Node::new("START", 0, 1.0),
                Node::new("A", 1, 0.5),
                Node::new("B", 1, 0.5),
                Node::new("SINK", 2, 1.0),
            ],
            vec![
                Link::new("START", "A"),
                Link::new("A", "SINK"),
                Link::new("START", "B"),
                Link::new("B", "SINK"),
            ],
        )
    }

    fn viewer() -> Viewer {
        let mut viewer = Viewer::new(Config::default(), 1600.0);
        viewer.show(module("M00001"));
        viewer
    }

    #[test]
    fn click_highlights_paths() {
        let mut viewer = viewer();
        assert_eq!(viewer.state(), ViewState::Idle);
        let highlight = viewer.click("A", false).clone();
        assert_eq!(viewer.state(), ViewState::Selected);
        assert_eq!(viewer.path_count(), 1);
        assert!(highlight.has_node("START") && highlight.has_node("A") && highlight.has_node("SINK"));
        assert!(!highlight.has_node("B"));
        assert_eq!(highlight.edges.len(), 2);
    }

    #[test]
    fn incompatible_selection_clears_highlight() {
        let mut viewer = viewer();
        viewer.click("A", false);
        viewer.click("B", true);
        assert_eq!(viewer.state(), ViewState::Selected);
        assert!(viewer.highlight().is_empty());
    }

    #[test]
    fn toggling_off_last_node_returns_to_idle() {
        let mut viewer = viewer();
        viewer.click("A", true);
        viewer.click("A", true);
        assert_eq!(viewer.state(), ViewState::Idle);
        assert!(viewer.highlight().is_empty());
    }

    #[test]
    fn new_module_resets_selection() {
        let mut viewer = viewer();
        viewer.click("A", false);
        viewer.show(module("M00002"));
        assert_eq!(viewer.state(), ViewState::Idle);
        assert!(viewer.highlight().is_empty());
    }

    #[test]
    fn failed_search_keeps_previous_module() {
        let mut viewer = viewer();
        viewer.click("A", false);
        let source = InlineSource::new("{}", "{}");
        assert!(viewer.search(&source, "M00009").is_err());
        assert!(viewer.search(&source, "short").is_err());
        assert_eq!(viewer.module().unwrap().id.as_str(), "M00001");
        assert!(viewer.selection().contains("A"));
        assert!(!viewer.highlight().is_empty());
    }

    #[test]
    fn resize_keeps_selection_and_moves_nodes() {
        let mut viewer = viewer();
        viewer.click("A", false);
        let before = viewer.highlight().clone();
        viewer.resize(900.0);
        assert_eq!(viewer.layout().unwrap().canvas.width, 880.0);
        assert_eq!(viewer.highlight(), &before);
        let canvas = viewer.layout().unwrap().canvas;
        let (x0, x1) = canvas.x_range();
        for node in &viewer.module().unwrap().nodes {
            assert!(node.x >= x0 - 1e-3 && node.x <= x1 + 1e-3);
        }
    }

    #[test]
    fn render_before_load_is_none() {
        let viewer = Viewer::new(Config::default(), 1200.0);
        assert!(viewer.render().is_none());
    }

    #[test]
    fn failed_annotation_load_keeps_table() {
        let mut viewer = viewer();
        let table = AnnotationTable::parse_csv("KO,E-value\nA,1e-9\n").unwrap();
        viewer.set_annotations(Some(table.clone()));
        assert!(viewer.load_annotations(Path::new("/nonexistent.csv")).is_err());
        assert_eq!(viewer.annotations(), Some(&table));
    }
}
