use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One selectable reply in a dialogue node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueOption {
    pub label: String,
    /// Node the conversation moves to; None ends the conversation.
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub relationship_delta: i32,
    #[serde(default)]
    pub starts_quest: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueNode {
    pub text: String,
    #[serde(default)]
    pub options: Vec<DialogueOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Dialogue graph keyed by node name; conversations start at `current_node`.
    pub dialogue: BTreeMap<String, DialogueNode>,
    pub current_node: String,
    #[serde(default)]
    pub met: bool,
    #[serde(default)]
    pub relationship: i32,
    /// Item ids offered for sale, if this NPC trades.
    #[serde(default)]
    pub shop: Vec<String>,
    #[serde(default)]
    pub faction: Option<String>,
}

impl Npc {
    pub fn new(id: &str, name: &str, description: &str) -> Self {
        let mut dialogue = BTreeMap::new();
        dialogue.insert(
            "greeting".to_string(),
            DialogueNode {
                text: "...".to_string(),
                options: Vec::new(),
            },
        );
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            dialogue,
            current_node: "greeting".to_string(),
            met: false,
            relationship: 0,
            shop: Vec::new(),
            faction: None,
        }
    }

    pub fn node(&self) -> Option<&DialogueNode> {
        self.dialogue.get(&self.current_node)
    }

    /// Greets the player, marking the NPC as met on first contact.
    pub fn greet(&mut self) -> Option<&DialogueNode> {
        self.met = true;
        self.dialogue.get(&self.current_node)
    }

    /// Applies a chosen option: relationship shift, node re-key, and reports
    /// any quest the option starts. Returns None for an out-of-range choice.
    pub fn choose(&mut self, index: usize) -> Option<DialogueOption> {
        let option = self.node()?.options.get(index)?.clone();
        self.relationship += option.relationship_delta;
        if let Some(next) = &option.next {
            if self.dialogue.contains_key(next) {
                self.current_node = next.clone();
            }
        }
        Some(option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blacksmith() -> Npc {
        let mut npc = Npc::new("blacksmith_andre", "Andre", "A broad-backed smith.");
        npc.dialogue.insert(
            "greeting".to_string(),
            DialogueNode {
                text: "Need something forged?".to_string(),
                options: vec![
                    DialogueOption {
                        label: "Who are you?".to_string(),
                        next: Some("about".to_string()),
                        relationship_delta: 1,
                        starts_quest: None,
                    },
                    DialogueOption {
                        label: "Farewell.".to_string(),
                        next: None,
                        relationship_delta: 0,
                        starts_quest: None,
                    },
                ],
            },
        );
        npc.dialogue.insert(
            "about".to_string(),
            DialogueNode {
                text: "Just a smith, tending an old fire.".to_string(),
                options: Vec::new(),
            },
        );
        npc
    }

    #[test]
    fn greet_sets_met_flag() {
        let mut npc = blacksmith();
        assert!(!npc.met);
        npc.greet();
        assert!(npc.met);
    }

    #[test]
    fn choosing_option_rekeys_node_and_shifts_relationship() {
        let mut npc = blacksmith();
        npc.greet();
        let option = npc.choose(0).unwrap();
        assert_eq!(option.next.as_deref(), Some("about"));
        assert_eq!(npc.current_node, "about");
        assert_eq!(npc.relationship, 1);
    }

    #[test]
    fn out_of_range_choice_is_none() {
        let mut npc = blacksmith();
        npc.greet();
        assert!(npc.choose(9).is_none());
        assert_eq!(npc.current_node, "greeting");
    }
}
