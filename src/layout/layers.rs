use crate::ir::Node;
use serde::Serialize;
use std::collections::BTreeMap;

/// Vertical position of one pathway step, used for its "Step N" label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayerPosition {
    pub group: i64,
    pub y: f32,
}

/// Mean node `y` per group, ascending by group.
pub fn layer_positions(nodes: &[Node]) -> Vec<LayerPosition> {
    let mut sums: BTreeMap<i64, (f32, usize)> = BTreeMap::new();
    for node in nodes {
        let entry = sums.entry(node.group).or_insert((0.0, 0));
        entry.0 += node.y;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(group, (total, count))| LayerPosition {
            group,
            y: total / count as f32,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_each_group() {
        let mut a = Node::new("A", 2, 1.0);
        a.y = 100.0;
        let mut b = Node::new("B", 2, 1.0);
        b.y = 120.0;
        let mut c = Node::new("C", 1, 1.0);
        c.y = 40.0;
        let layers = layer_positions(&[a, b, c]);
        assert_eq!(
            layers,
            vec![
                LayerPosition { group: 1, y: 40.0 },
                LayerPosition { group: 2, y: 110.0 },
            ]
        );
    }
}
