mod layers;

pub use layers::{LayerPosition, layer_positions};

use crate::config::{LayoutConfig, Padding};
use crate::ir::{Link, Node};
use crate::scale::LinearScale;
use dagre_rust::{
    GraphConfig as DagreConfig, GraphEdge as DagreEdge, GraphNode as DagreNode,
    layout as dagre_layout,
};
use graphlib_rust::{Graph as DagreGraph, GraphOption};
use log::{debug, warn};
use std::collections::{HashMap, HashSet};

/// Destination drawing area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
    pub padding: Padding,
}

impl Canvas {
    pub fn new(width: f32, height: f32, padding: Padding) -> Self {
        Self {
            width,
            height,
            padding,
        }
    }

    /// Canvas sized for a viewport, using the configured limits and padding.
    pub fn for_viewport(viewport_width: f32, config: &LayoutConfig) -> Self {
        let (width, height) = config.canvas_for_viewport(viewport_width);
        Self::new(width, height, config.padding)
    }

    pub fn x_range(&self) -> (f32, f32) {
        (self.padding.left, self.width - self.padding.right)
    }

    pub fn y_range(&self) -> (f32, f32) {
        (self.padding.top, self.height - self.padding.bottom)
    }
}

/// Result of one layout pass. Node coordinates live on the nodes themselves.
#[derive(Debug, Clone)]
pub struct Layout {
    pub canvas: Canvas,
    /// Bounding box of the layered drawing before it is mapped onto the canvas.
    pub internal_width: f32,
    pub internal_height: f32,
    pub x_scale: LinearScale,
    pub y_scale: LinearScale,
    pub layers: Vec<LayerPosition>,
    /// Ids the layered layout did not place; they sit at the padded origin.
    pub unplaced: Vec<String>,
}

/// Lays `nodes` out top-to-bottom in layers and writes canvas coordinates
/// into each node's `x`/`y`.
pub fn compute_layout(
    nodes: &mut [Node],
    links: &[Link],
    canvas: Canvas,
    config: &LayoutConfig,
) -> Layout {
    let internal = assign_positions_dagre(nodes, links, config);
    place_on_canvas(nodes, &internal, canvas, config)
}

/// Maps layout-space centers onto the padded canvas. Nodes missing from
/// `internal` are pinned to the padded origin and reported as unplaced.
fn place_on_canvas(
    nodes: &mut [Node],
    internal: &HashMap<String, (f32, f32)>,
    canvas: Canvas,
    config: &LayoutConfig,
) -> Layout {
    let (internal_width, internal_height) = internal
        .values()
        .fold((0.0f32, 0.0f32), |(w, h), (x, y)| {
            (
                w.max(x + config.node_width / 2.0 + config.margin_x),
                h.max(y + config.node_height / 2.0 + config.margin_y),
            )
        });

    let (x0, x1) = canvas.x_range();
    let (y0, y1) = canvas.y_range();
    let x_scale = LinearScale::new((0.0, internal_width as f64), (x0 as f64, x1 as f64)).clamped();
    let y_scale = LinearScale::new((0.0, internal_height as f64), (y0 as f64, y1 as f64)).clamped();

    let mut unplaced = Vec::new();
    for node in nodes.iter_mut() {
        match internal.get(&node.id) {
            Some((x, y)) => {
                node.x = x_scale.apply(*x as f64) as f32;
                node.y = y_scale.apply(*y as f64) as f32;
            }
            None => {
                warn!("node {} has no layered position; using canvas origin", node.id);
                node.x = x0;
                node.y = y0;
                unplaced.push(node.id.clone());
            }
        }
    }

    let layers = layer_positions(nodes);

    Layout {
        canvas,
        internal_width,
        internal_height,
        x_scale,
        y_scale,
        layers,
        unplaced,
    }
}

/// Runs the layered layout and returns each node's center in layout space.
fn assign_positions_dagre(
    nodes: &[Node],
    links: &[Link],
    config: &LayoutConfig,
) -> HashMap<String, (f32, f32)> {
    let mut positions = HashMap::new();
    if nodes.is_empty() {
        return positions;
    }

    let mut dagre_graph: DagreGraph<DagreConfig, DagreNode, DagreEdge> =
        DagreGraph::new(Some(GraphOption {
            directed: Some(true),
            multigraph: Some(false),
            compound: Some(false),
        }));

    let mut graph_config = DagreConfig::default();
    graph_config.rankdir = Some("tb".to_string());
    graph_config.nodesep = Some(config.node_spacing);
    graph_config.ranksep = Some(config.rank_spacing);
    graph_config.marginx = Some(config.margin_x);
    graph_config.marginy = Some(config.margin_y);
    dagre_graph.set_graph(graph_config);

    let mut node_set: HashSet<&str> = HashSet::new();
    for node in nodes {
        if !node_set.insert(node.id.as_str()) {
            continue;
        }
        let mut dagre_node = DagreNode::default();
        dagre_node.width = config.node_width;
        dagre_node.height = config.node_height;
        dagre_graph.set_node(node.id.clone(), Some(dagre_node));
    }

    // Parallel links collapse into a single layout edge.
    let mut seen_edges: HashSet<(&str, &str)> = HashSet::new();
    for link in links {
        let (from, to) = (link.source.as_str(), link.target.as_str());
        if !node_set.contains(from) || !node_set.contains(to) {
            debug!("layout ignores dangling link {from} -> {to}");
            continue;
        }
        if from == to || !seen_edges.insert((from, to)) {
            continue;
        }
        let mut edge_label = DagreEdge::default();
        edge_label.minlen = Some(1.0);
        let _ = dagre_graph.set_edge(&from.to_string(), &to.to_string(), Some(edge_label), None);
    }

    dagre_layout::run_layout(&mut dagre_graph);

    for id in node_set {
        let Some(dagre_node) = dagre_graph.node(&id.to_string()) else {
            continue;
        };
        if dagre_node.x.is_finite() && dagre_node.y.is_finite() {
            positions.insert(id.to_string(), (dagre_node.x, dagre_node.y));
        }
    }

    positions
}
