use std::collections::HashMap;

use crate::model::{ActionCategory, ActionDefinition};

/// Read-only taxonomy of permission identifiers, grouped by category.
///
/// Selection state lives in the statement's `actions` list, not here.
#[derive(Debug, Clone)]
pub struct ActionCatalog {
    categories: Vec<ActionCategory>,
    // action -> (category index, action index)
    index: HashMap<String, (usize, usize)>,
}

impl ActionCatalog {
    pub fn new(categories: Vec<ActionCategory>) -> Self {
        let mut index = HashMap::new();
        for (ci, category) in categories.iter().enumerate() {
            for (ai, def) in category.actions.iter().enumerate() {
                // First definition wins if an action is listed twice.
                index.entry(def.action.clone()).or_insert((ci, ai));
            }
        }
        Self { categories, index }
    }

    /// Categories in display order.
    pub fn categories(&self) -> &[ActionCategory] {
        &self.categories
    }

    pub fn find(&self, action: &str) -> Option<&ActionDefinition> {
        self.index
            .get(action)
            .map(|&(ci, ai)| &self.categories[ci].actions[ai])
    }

    /// Display label for an action; unknown actions fall back to the raw string.
    pub fn label_of(&self, action: &str) -> String {
        self.find(action)
            .map(|d| d.label.clone())
            .unwrap_or_else(|| action.to_string())
    }

    /// Every action in catalog order.
    pub fn all_actions(&self) -> impl Iterator<Item = &ActionDefinition> {
        self.categories.iter().flat_map(|c| c.actions.iter())
    }
}
