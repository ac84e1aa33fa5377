use crate::error::LoadError;
use crate::ir::{Adjacency, DEFAULT_NODE_RADIUS, Module, ModuleId, Node};
use log::info;
use serde_json::{Map, Value};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Nodes,
    Adjacency,
}

impl DocumentKind {
    fn label(self) -> &'static str {
        match self {
            DocumentKind::Nodes => "nodes document",
            DocumentKind::Adjacency => "adjacency document",
        }
    }
}

/// Where the two module documents come from.
pub trait DocumentSource {
    /// Human-readable location used in error messages.
    fn location(&self, kind: DocumentKind) -> String;

    fn fetch(&self, kind: DocumentKind) -> Result<String, LoadError>;
}

/// Documents read from disk on every fetch.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub nodes: PathBuf,
    pub adjacency: PathBuf,
}

impl FileSource {
    pub fn new(nodes: impl Into<PathBuf>, adjacency: impl Into<PathBuf>) -> Self {
        Self {
            nodes: nodes.into(),
            adjacency: adjacency.into(),
        }
    }

    fn path(&self, kind: DocumentKind) -> &PathBuf {
        match kind {
            DocumentKind::Nodes => &self.nodes,
            DocumentKind::Adjacency => &self.adjacency,
        }
    }
}

impl DocumentSource for FileSource {
    fn location(&self, kind: DocumentKind) -> String {
        self.path(kind).display().to_string()
    }

    fn fetch(&self, kind: DocumentKind) -> Result<String, LoadError> {
        std::fs::read_to_string(self.path(kind)).map_err(|source| LoadError::Fetch {
            location: self.location(kind),
            source,
        })
    }
}

/// Documents already held in memory (e.g. handed over by a host page).
#[derive(Debug, Clone, Default)]
pub struct InlineSource {
    pub nodes: String,
    pub adjacency: String,
}

impl InlineSource {
    pub fn new(nodes: impl Into<String>, adjacency: impl Into<String>) -> Self {
        Self {
            nodes: nodes.into(),
            adjacency: adjacency.into(),
        }
    }
}

impl DocumentSource for InlineSource {
    fn location(&self, kind: DocumentKind) -> String {
        format!("inline {}", kind.label())
    }

    fn fetch(&self, kind: DocumentKind) -> Result<String, LoadError> {
        Ok(match kind {
            DocumentKind::Nodes => self.nodes.clone(),
            DocumentKind::Adjacency => self.adjacency.clone(),
        })
    }
}

/// Validates `raw_id`, fetches both documents and extracts the module.
///
/// Nodes without a radius get the default one. Both documents must know the
/// module key.
pub fn load_module(source: &dyn DocumentSource, raw_id: &str) -> Result<Module, LoadError> {
    let id = ModuleId::parse(raw_id)?;

    let nodes_doc = fetch_json(source, DocumentKind::Nodes)?;
    let adjacency_doc = fetch_json(source, DocumentKind::Adjacency)?;

    let nodes_value = nodes_doc
        .get(id.as_str())
        .filter(|value| !value.is_null())
        .ok_or_else(|| LoadError::MissingNodes(id.to_string()))?;
    let mut nodes: Vec<Node> =
        serde_json::from_value(nodes_value.clone()).map_err(|err| LoadError::Parse {
            location: format!("{} [{}]", source.location(DocumentKind::Nodes), id),
            source: err,
        })?;
    for node in &mut nodes {
        node.node_radius.get_or_insert(DEFAULT_NODE_RADIUS);
    }

    let adjacency_value = adjacency_doc
        .get(id.as_str())
        .filter(|value| !value.is_null())
        .ok_or_else(|| LoadError::MissingAdjacency(id.to_string()))?;
    let adjacency: Adjacency =
        serde_json::from_value(adjacency_value.clone()).map_err(|err| LoadError::Parse {
            location: format!("{} [{}]", source.location(DocumentKind::Adjacency), id),
            source: err,
        })?;

    info!(
        "loaded module {id}: {} nodes, {} links",
        nodes.len(),
        adjacency.links.len()
    );
    Ok(Module::new(id, nodes, adjacency.links))
}

fn fetch_json(source: &dyn DocumentSource, kind: DocumentKind) -> Result<Map<String, Value>, LoadError> {
    let text = source.fetch(kind)?;
    serde_json::from_str(&text).map_err(|err| LoadError::Parse {
        location: source.location(kind),
        source: err,
    })
}
