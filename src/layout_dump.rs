use crate::layout::LayerPosition;
use crate::render::Scene;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub module: String,
    pub width: f32,
    pub height: f32,
    pub internal_width: f32,
    pub internal_height: f32,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
    pub layers: Vec<LayerPosition>,
    pub selected: Vec<String>,
    pub unplaced: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub group: i64,
    pub x: f32,
    pub y: f32,
    pub evalue: Option<f64>,
    pub highlighted: bool,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub index: usize,
    pub source: String,
    pub target: String,
    pub edge_weight: f64,
    pub edge_occurence: f64,
    pub highlighted: bool,
}

impl LayoutDump {
    pub fn from_scene(scene: &Scene<'_>) -> Self {
        let nodes = scene
            .module
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                group: node.group,
                x: node.x,
                y: node.y,
                evalue: scene.annotations.and_then(|table| table.for_node(&node.id)),
                highlighted: scene.highlight.has_node(&node.id),
            })
            .collect();

        let edges = scene
            .module
            .links
            .iter()
            .enumerate()
            .map(|(index, link)| EdgeDump {
                index,
                source: link.source.clone(),
                target: link.target.clone(),
                edge_weight: link.edge_weight,
                edge_occurence: link.edge_occurence,
                highlighted: scene.highlight.has_edge(index),
            })
            .collect();

        LayoutDump {
            module: scene.module.id.to_string(),
            width: scene.layout.canvas.width,
            height: scene.layout.canvas.height,
            internal_width: scene.layout.internal_width,
            internal_height: scene.layout.internal_height,
            nodes,
            edges,
            layers: scene.layout.layers.clone(),
            selected: scene.selection.iter().map(str::to_string).collect(),
            unplaced: scene.layout.unplaced.clone(),
        }
    }
}

pub fn write_layout_dump(path: &Path, scene: &Scene<'_>) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_scene(scene);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
