use crate::annotation::AnnotationTable;
use crate::highlight::Highlight;
use crate::ir::{Link, Module, Node};
use crate::layout::Layout;
use crate::scale::{LinearScale, SequentialScale, extent};
use crate::selection::SelectionModel;
use crate::theme::{ColorRamp, Theme};
use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;

const NODE_RADIUS_RANGE: (f64, f64) = (5.0, 20.0);
const EDGE_WIDTH_RANGE: (f64, f64) = (1.0, 3.0);
const LABEL_OFFSET: (f32, f32) = (-20.0, -25.0);
const STEP_LABEL_GAP: f32 = 10.0;
const LEGEND_GAP: f32 = 10.0;
const LEGEND_TOP: f32 = 20.0;
const LEGEND_BAR_Y: f32 = 20.0;
const LEGEND_BAR_W: f32 = 20.0;
const LEGEND_BAR_H: f32 = 150.0;
const LEGEND_TICKS: [f64; 6] = [5.0, 10.0, 20.0, 30.0, 40.0, 50.0];
const PANEL_GAP: f32 = 20.0;
const PANEL_INSET: f32 = 12.0;
const PANEL_LINE: f32 = 24.0;
const PANEL_BOX_H: f32 = 140.0;
/// Extra height below the canvas taken by the attribute panel.
pub const ATTR_PANEL_HEIGHT: f32 = PANEL_GAP + PANEL_BOX_H;

/// Everything the render surface reads; nothing here is mutated.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub module: &'a Module,
    pub layout: &'a Layout,
    pub annotations: Option<&'a AnnotationTable>,
    pub selection: &'a SelectionModel,
    pub highlight: &'a Highlight,
}

/// Resolved presentation of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStyle {
    pub radius: f32,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f32,
}

/// Resolved presentation of one link.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeStyle {
    pub stroke: String,
    pub stroke_width: f32,
    pub dasharray: Option<&'static str>,
}

/// Data-driven scales shared by every node and link of a module.
struct Styler<'a> {
    theme: &'a Theme,
    radius: Option<LinearScale>,
    node_fill: Option<SequentialScale>,
    evalue_fill: SequentialScale,
    edge_stroke: Option<SequentialScale>,
    edge_width: Option<LinearScale>,
}

impl<'a> Styler<'a> {
    fn new(module: &Module, theme: &'a Theme) -> Self {
        let occurrence = extent(module.nodes.iter().map(|n| n.ko_occurrence));
        let radius = occurrence
            .filter(|(lo, hi)| lo < hi)
            .map(|domain| LinearScale::new(domain, NODE_RADIUS_RANGE));
        let node_fill = occurrence
            .map(|domain| SequentialScale::new(domain, ColorRamp::greys()).reshaped(0.3, 0.8));
        let evalue_fill =
            SequentialScale::new(theme.evalue_exponent_domain, ColorRamp::reds()).clamped();

        let edge_occurrence = extent(module.links.iter().map(|l| l.edge_occurence));
        let edge_stroke = edge_occurrence
            .map(|domain| SequentialScale::new(domain, ColorRamp::greys()).reshaped(0.5, 0.8));
        let edge_width = edge_occurrence.map(|domain| LinearScale::new(domain, EDGE_WIDTH_RANGE));

        Self {
            theme,
            radius,
            node_fill,
            evalue_fill,
            edge_stroke,
            edge_width,
        }
    }

    fn base_fill(&self, node: &Node) -> String {
        self.node_fill
            .and_then(|scale| scale.color(node.ko_occurrence))
            .unwrap_or_else(|| self.theme.fallback_node_fill.clone())
    }

    fn node(&self, node: &Node, scene: &Scene<'_>) -> NodeStyle {
        let radius = self
            .radius
            .map(|scale| scale.apply(node.ko_occurrence) as f32)
            .filter(|r| r.is_finite() && *r > 0.0)
            .unwrap_or_else(|| node.radius());

        let fill = match scene.annotations.and_then(|table| table.for_node(&node.id)) {
            Some(evalue) if evalue > 0.0 => self
                .evalue_fill
                .color(-evalue.log10())
                .unwrap_or_else(|| self.base_fill(node)),
            _ => self.base_fill(node),
        };

        let (stroke, stroke_width) = if scene.highlight.has_node(&node.id) {
            (
                self.theme.highlight_color.clone(),
                self.theme.highlight_node_stroke_width,
            )
        } else if scene.selection.contains(&node.id) {
            (
                self.theme.selection_color.clone(),
                self.theme.selection_stroke_width,
            )
        } else {
            (self.theme.node_stroke.clone(), self.theme.node_stroke_width)
        };

        NodeStyle {
            radius,
            fill,
            stroke,
            stroke_width,
        }
    }

    fn edge(&self, index: usize, link: &Link, highlight: &Highlight) -> EdgeStyle {
        let dasharray = link.is_theoretical().then_some("6 3");
        if highlight.has_edge(index) {
            return EdgeStyle {
                stroke: self.theme.highlight_color.clone(),
                stroke_width: self.theme.highlight_edge_width,
                dasharray,
            };
        }
        let stroke = self
            .edge_stroke
            .and_then(|scale| scale.color(link.edge_occurence))
            .unwrap_or_else(|| self.theme.fallback_edge_stroke.clone());
        let stroke_width = self
            .edge_width
            .map(|scale| scale.apply(link.edge_occurence) as f32)
            .filter(|w| w.is_finite() && *w > 0.0)
            .unwrap_or(1.0);
        EdgeStyle {
            stroke,
            stroke_width,
            dasharray,
        }
    }
}

/// Per-node styles keyed by id, in the same terms the SVG uses.
pub fn node_styles(scene: &Scene<'_>, theme: &Theme) -> HashMap<String, NodeStyle> {
    let styler = Styler::new(scene.module, theme);
    scene
        .module
        .nodes
        .iter()
        .map(|node| (node.id.clone(), styler.node(node, scene)))
        .collect()
}

/// Per-link styles indexed like `module.links`.
pub fn edge_styles(scene: &Scene<'_>, theme: &Theme) -> Vec<EdgeStyle> {
    let styler = Styler::new(scene.module, theme);
    scene
        .module
        .links
        .iter()
        .enumerate()
        .map(|(idx, link)| styler.edge(idx, link, scene.highlight))
        .collect()
}

/// Full document size: the canvas plus the attribute panel below it.
pub fn document_size(layout: &Layout) -> (f32, f32) {
    (layout.canvas.width, layout.canvas.height + ATTR_PANEL_HEIGHT)
}

pub fn render_svg(scene: &Scene<'_>, theme: &Theme) -> String {
    let mut svg = String::new();
    let canvas = scene.layout.canvas;
    let (width, height) = document_size(scene.layout);
    let styler = Styler::new(scene.module, theme);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" data-module=\"{}\">",
        escape_xml(scene.module.id.as_str())
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    svg.push_str("<defs>");
    svg.push_str(
        "<marker id=\"arrowhead\" viewBox=\"-0 -5 10 10\" refX=\"35\" refY=\"0\" orient=\"auto\" markerWidth=\"4\" markerHeight=\"4\"><path d=\"M 0,-5 L 10,0 L 0,5\" fill=\"context-stroke\" stroke=\"none\"/></marker>",
    );
    svg.push_str(&evalue_gradient_svg());
    svg.push_str("</defs>");

    let positions: HashMap<&str, &Node> = scene
        .module
        .nodes
        .iter()
        .map(|node| (node.id.as_str(), node))
        .collect();

    // Heavier links are drawn last so they sit on top.
    let mut order: Vec<usize> = (0..scene.module.links.len()).collect();
    order.sort_by(|a, b| {
        let wa = scene.module.links[*a].edge_weight;
        let wb = scene.module.links[*b].edge_weight;
        wa.total_cmp(&wb)
    });

    svg.push_str("<g class=\"links\">");
    for idx in order {
        let link = &scene.module.links[idx];
        let (Some(from), Some(to)) = (
            positions.get(link.source.as_str()),
            positions.get(link.target.as_str()),
        ) else {
            continue;
        };
        let style = styler.edge(idx, link, scene.highlight);
        let class = if scene.highlight.has_edge(idx) {
            "link highlighted"
        } else {
            "link"
        };
        let dash = style
            .dasharray
            .map(|d| format!(" stroke-dasharray=\"{d}\""))
            .unwrap_or_default();
        svg.push_str(&format!(
            "<line class=\"{class}\" data-index=\"{idx}\" x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"{:.2}\"{dash} marker-end=\"url(#arrowhead)\"><title>Edge Occurrence: {}</title></line>",
            from.x,
            from.y,
            to.x,
            to.y,
            style.stroke,
            style.stroke_width,
            link.edge_occurence
        ));
    }
    svg.push_str("</g>");

    svg.push_str("<g class=\"nodes\">");
    for node in &scene.module.nodes {
        let style = styler.node(node, scene);
        let mut class = String::from("node");
        if scene.highlight.has_node(&node.id) {
            class.push_str(" highlighted");
        }
        if scene.selection.contains(&node.id) {
            class.push_str(" selected");
        }
        svg.push_str(&format!(
            "<circle class=\"{class}\" data-id=\"{}\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"><title>{}</title></circle>",
            escape_xml(&node.id),
            node.x,
            node.y,
            style.radius,
            style.fill,
            style.stroke,
            style.stroke_width,
            escape_xml(&tooltip(node, scene.annotations))
        ));
    }
    for node in &scene.module.nodes {
        svg.push_str(&format!(
            "<text class=\"node-label\" x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"start\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            node.x + LABEL_OFFSET.0,
            node.y + LABEL_OFFSET.1,
            escape_xml(&theme.font_family),
            theme.node_label_size,
            theme.text_color,
            escape_xml(&node.id)
        ));
    }
    svg.push_str("</g>");

    let label_x = canvas.padding.left - STEP_LABEL_GAP;
    for layer in &scene.layout.layers {
        svg.push_str(&format!(
            "<text class=\"group-label\" x=\"{label_x:.2}\" y=\"{:.2}\" text-anchor=\"end\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">Step {}</text>",
            layer.y,
            escape_xml(&theme.font_family),
            theme.step_label_size,
            theme.text_color,
            layer.group
        ));
    }

    svg.push_str(&legend_svg(width - canvas.padding.right + LEGEND_GAP, theme));
    svg.push_str(&attribute_panel_svg(scene.layout, theme));

    svg.push_str("</svg>");
    svg
}

fn tooltip(node: &Node, annotations: Option<&AnnotationTable>) -> String {
    match annotations.and_then(|table| table.for_node(&node.id)) {
        Some(evalue) => format!(
            "Node Occurrence: {}\nE-value: {}",
            node.ko_occurrence, evalue
        ),
        None => format!("Node Occurrence: {}", node.ko_occurrence),
    }
}

fn evalue_gradient_svg() -> String {
    let reds = ColorRamp::reds();
    let low = reds.at(0.0).unwrap_or_default();
    let high = reds.at(1.0).unwrap_or_default();
    format!(
        "<linearGradient id=\"evalueGradient\" x1=\"0%\" y1=\"100%\" x2=\"0%\" y2=\"0%\"><stop offset=\"0%\" stop-color=\"{low}\"/><stop offset=\"100%\" stop-color=\"{high}\"/></linearGradient>"
    )
}

fn legend_svg(x: f32, theme: &Theme) -> String {
    let mut svg = String::new();
    let font = escape_xml(&theme.font_family);
    svg.push_str(&format!(
        "<g class=\"color-legend\" transform=\"translate({x:.2}, {LEGEND_TOP})\">"
    ));
    svg.push_str(&format!(
        "<text font-family=\"{font}\" font-size=\"14\" font-weight=\"bold\" fill=\"{}\">Node Color</text>",
        theme.text_color
    ));
    svg.push_str(&format!(
        "<text x=\"0\" y=\"{:.2}\" font-family=\"{font}\" font-size=\"10\" fill=\"{}\">−log₁₀(E)</text>",
        LEGEND_BAR_Y - 6.0,
        theme.text_color
    ));
    let bar_y = LEGEND_BAR_Y;
    svg.push_str(&format!(
        "<rect x=\"0\" y=\"{bar_y:.2}\" width=\"{LEGEND_BAR_W}\" height=\"{LEGEND_BAR_H}\" fill=\"url(#evalueGradient)\" stroke=\"{}\"/>",
        theme.legend_border
    ));
    let (lo, hi) = theme.evalue_exponent_domain;
    let tick_scale = LinearScale::new((lo, hi), ((bar_y + LEGEND_BAR_H) as f64, bar_y as f64));
    for tick in LEGEND_TICKS.iter().filter(|t| **t >= lo && **t <= hi) {
        let y = tick_scale.apply(*tick);
        svg.push_str(&format!(
            "<line x1=\"{LEGEND_BAR_W}\" y1=\"{y:.2}\" x2=\"{}\" y2=\"{y:.2}\" stroke=\"{}\"/>",
            LEGEND_BAR_W + 4.0,
            theme.legend_border
        ));
        svg.push_str(&format!(
            "<text class=\"legend-tick\" x=\"{}\" y=\"{y:.2}\" dominant-baseline=\"middle\" font-family=\"{font}\" font-size=\"10\" fill=\"{}\">{}</text>",
            LEGEND_BAR_W + 7.0,
            theme.text_color,
            tick
        ));
    }
    svg.push_str("</g>");
    svg
}

enum Glyph {
    Dot { radius: f32, fill: &'static str },
    Stroke { color: &'static str, width: f32, dash: Option<&'static str>, arrow: bool },
}

static NODE_ROWS: [(Glyph, &str); 3] = [
    (Glyph::Dot { radius: 4.0, fill: "#999" }, "Representation: Protein ID in database"),
    (Glyph::Dot { radius: 5.0, fill: "#333" }, "Size & Color → frequency of catalysis"),
    (
        Glyph::Stroke { color: "black", width: 1.0, dash: None, arrow: true },
        "Y-pos → step via max distance from sink",
    ),
];

static EDGE_ROWS: [(Glyph, &str); 4] = [
    (
        Glyph::Stroke { color: "#888", width: 1.0, dash: None, arrow: true },
        "Representation → connects enzyme steps",
    ),
    (
        Glyph::Stroke { color: "#333", width: 4.0, dash: None, arrow: false },
        "Width & Color → dependency strength",
    ),
    (
        Glyph::Stroke { color: "black", width: 2.0, dash: None, arrow: false },
        "Solid → observed in real data",
    ),
    (
        Glyph::Stroke { color: "black", width: 2.0, dash: Some("4 2"), arrow: false },
        "Dashed → theoretical",
    ),
];

/// Key to the visual encoding, drawn in two columns under the graph.
fn attribute_panel_svg(layout: &Layout, theme: &Theme) -> String {
    let canvas = layout.canvas;
    let inner_w = (canvas.width - canvas.padding.left - canvas.padding.right).max(0.0);
    let font = escape_xml(&theme.font_family);
    let mut svg = String::new();
    svg.push_str(&format!(
        "<g class=\"attr-panel\" transform=\"translate(0, {:.2})\">",
        canvas.height + PANEL_GAP
    ));
    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"0\" width=\"{inner_w:.2}\" height=\"{PANEL_BOX_H}\" rx=\"4\" fill=\"#fafafa\" stroke=\"#ccc\"/>",
        canvas.padding.left
    ));
    let columns = [
        ("Nodes (Proteins):", &NODE_ROWS[..]),
        ("Edges (Catalytic Transitions):", &EDGE_ROWS[..]),
    ];
    for (col, (heading, rows)) in columns.iter().enumerate() {
        let x = canvas.padding.left + inner_w / 2.0 * col as f32 + PANEL_INSET;
        let mut y = PANEL_INSET + 14.0;
        svg.push_str(&format!(
            "<text x=\"{x:.2}\" y=\"{y:.2}\" font-family=\"{font}\" font-size=\"13\" font-weight=\"bold\" fill=\"{}\">{}</text>",
            theme.text_color,
            escape_xml(heading)
        ));
        for (glyph, text) in rows.iter() {
            y += PANEL_LINE;
            let mark_y = y - 6.0;
            match glyph {
                Glyph::Dot { radius, fill } => svg.push_str(&format!(
                    "<circle cx=\"{x:.2}\" cy=\"{mark_y:.2}\" r=\"{radius}\" fill=\"{fill}\"/>"
                )),
                Glyph::Stroke { color, width, dash, arrow } => {
                    let dash = dash
                        .map(|d| format!(" stroke-dasharray=\"{d}\""))
                        .unwrap_or_default();
                    let marker = if *arrow { " marker-end=\"url(#arrowhead)\"" } else { "" };
                    svg.push_str(&format!(
                        "<line x1=\"{:.2}\" y1=\"{mark_y:.2}\" x2=\"{:.2}\" y2=\"{mark_y:.2}\" stroke=\"{color}\" stroke-width=\"{width}\"{dash}{marker}/>",
                        x - 4.0,
                        x + 4.0
                    ));
                }
            }
            svg.push_str(&format!(
                "<text x=\"{:.2}\" y=\"{y:.2}\" font-family=\"{font}\" font-size=\"12\" fill=\"{}\">{}</text>",
                x + 12.0,
                theme.text_color,
                escape_xml(text)
            ));
        }
    }
    svg.push_str("</g>");
    svg
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &crate::config::RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Helvetica".to_string();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("Invalid render size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
