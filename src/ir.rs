use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_NODE_RADIUS: f32 = 10.0;
pub const MODULE_ID_LEN: usize = 6;

/// One enzyme/protein in a pathway module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    /// Pathway step; nodes sharing a group are drawn as one labelled layer.
    #[serde(default)]
    pub group: i64,
    #[serde(rename = "KO_Occurrence", default)]
    pub ko_occurrence: f64,
    #[serde(rename = "node-radius", default, skip_serializing_if = "Option::is_none")]
    pub node_radius: Option<f32>,
    /// Canvas position, written by the layout pass.
    #[serde(skip)]
    pub x: f32,
    #[serde(skip)]
    pub y: f32,
}

impl Node {
    pub fn new(id: impl Into<String>, group: i64, ko_occurrence: f64) -> Self {
        Self {
            id: id.into(),
            group,
            ko_occurrence,
            node_radius: None,
            x: 0.0,
            y: 0.0,
        }
    }

    pub fn radius(&self) -> f32 {
        self.node_radius.unwrap_or(DEFAULT_NODE_RADIUS)
    }
}

/// A directed catalytic transition. Parallel links are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub edge_weight: f64,
    // Field name matches the upstream documents.
    #[serde(default)]
    pub edge_occurence: f64,
}

impl Link {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            edge_weight: 1.0,
            edge_occurence: 1.0,
        }
    }

    pub fn with_occurrence(mut self, occurrence: f64) -> Self {
        self.edge_occurence = occurrence;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.edge_weight = weight;
        self
    }

    /// Links with zero observed occurrence are theoretical and drawn dashed.
    pub fn is_theoretical(&self) -> bool {
        self.edge_occurence == 0.0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Adjacency {
    #[serde(default)]
    pub links: Vec<Link>,
}

/// Validated 6-character module key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn parse(raw: &str) -> Result<Self, crate::error::ModuleIdError> {
        let trimmed = raw.trim();
        let len = trimmed.chars().count();
        if len != MODULE_ID_LEN {
            return Err(crate::error::ModuleIdError::Length {
                found: len,
                expected: MODULE_ID_LEN,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Module {
    pub id: ModuleId,
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl Module {
    pub fn new(id: ModuleId, nodes: Vec<Node>, links: Vec<Link>) -> Self {
        Self { id, nodes, links }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn node_index(&self) -> BTreeMap<&str, &Node> {
        self.nodes.iter().map(|node| (node.id.as_str(), node)).collect()
    }

    /// Links whose endpoints both exist in the node list.
    pub fn resolved_links(&self) -> impl Iterator<Item = (usize, &Link)> {
        let index = self.node_index();
        self.links
            .iter()
            .enumerate()
            .filter(move |(_, link)| {
                index.contains_key(link.source.as_str()) && index.contains_key(link.target.as_str())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_id_requires_six_chars() {
        assert!(ModuleId::parse("M00001").is_ok());
        assert!(ModuleId::parse("").is_err());
        assert!(ModuleId::parse("M0001").is_err());
        assert!(ModuleId::parse("M000001").is_err());
    }

    #[test]
    fn module_id_trims_whitespace() {
        let id = ModuleId::parse("  M00002 ").unwrap();
        assert_eq!(id.as_str(), "M00002");
    }

    #[test]
    fn node_deserializes_upstream_field_names() {
        let node: Node =
            serde_json::from_str(r#"{"id":"K00844_1","group":2,"KO_Occurrence":0.75}"#).unwrap();
        assert_eq!(node.id, "K00844_1");
        assert_eq!(node.group, 2);
        assert_eq!(node.ko_occurrence, 0.75);
        assert_eq!(node.node_radius, None);
        assert_eq!(node.radius(), DEFAULT_NODE_RADIUS);
    }

    #[test]
    fn resolved_links_skip_dangling_endpoints() {
        let module = Module::new(
            ModuleId::parse("M00001").unwrap(),
            vec![Node::new("START", 0, 1.0), Node::new("A", 1, 1.0)],
            vec![Link::new("START", "A"), Link::new("A", "GHOST")],
        );
        let resolved: Vec<usize> = module.resolved_links().map(|(idx, _)| idx).collect();
        assert_eq!(resolved, vec![0]);
    }
}
