use std::collections::BTreeSet;

/// Node ids picked by the user. Ids are not checked against any graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionModel {
    selected: BTreeSet<String>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A modifier click (ctrl/meta) toggles `node_id`; a plain click makes it
    /// the only selected id.
    pub fn click(&mut self, node_id: &str, modifier_pressed: bool) {
        if modifier_pressed {
            if !self.selected.remove(node_id) {
                self.selected.insert(node_id.to_string());
            }
            return;
        }
        self.selected.clear();
        self.selected.insert(node_id.to_string());
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.selected.contains(node_id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    pub fn as_set(&self) -> &BTreeSet<String> {
        &self.selected
    }
}
