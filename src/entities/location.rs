use super::item::Item;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Direction label -> destination location id. Not necessarily symmetric.
    #[serde(default)]
    pub connections: BTreeMap<String, String>,
    /// Enemy template ids that may appear here.
    #[serde(default)]
    pub enemies: Vec<String>,
    #[serde(default)]
    pub npcs: Vec<String>,
    /// Items lying on the ground, ready to take.
    #[serde(default)]
    pub ground_items: Vec<Item>,
    #[serde(default)]
    pub beacon: bool,
    #[serde(default)]
    pub visited: bool,
    #[serde(default)]
    pub first_visit_text: Option<String>,
}

impl Location {
    pub fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            connections: BTreeMap::new(),
            enemies: Vec::new(),
            npcs: Vec::new(),
            ground_items: Vec::new(),
            beacon: false,
            visited: false,
            first_visit_text: None,
        }
    }

    pub fn connect(&mut self, direction: &str, destination: &str) {
        self.connections
            .insert(direction.to_string(), destination.to_string());
    }

    pub fn destination(&self, direction: &str) -> Option<&str> {
        self.connections.get(direction).map(String::as_str)
    }

    /// Marks the location visited, returning the first-visit narrative the
    /// first time only.
    pub fn visit(&mut self) -> Option<String> {
        if self.visited {
            return None;
        }
        self.visited = true;
        self.first_visit_text.clone()
    }
}
