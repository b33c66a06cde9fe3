use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    /// Collect N of an item id.
    Item,
    /// Defeat N of an enemy id.
    Kill,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub kind: ObjectiveKind,
    pub target: String,
    pub required: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    #[serde(default)]
    pub essence: u64,
    #[serde(default)]
    pub item_id: Option<String>,
    /// (faction, reputation delta)
    #[serde(default)]
    pub faction: Option<(String, i64)>,
    #[serde(default)]
    pub lore: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub name: String,
    pub description: String,
    pub objectives: Vec<Objective>,
    pub reward: Reward,
}

impl Quest {
    pub fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            objectives: Vec::new(),
            reward: Reward::default(),
        }
    }

    pub fn objective(mut self, kind: ObjectiveKind, target: &str, required: u32) -> Self {
        self.objectives.push(Objective {
            kind,
            target: target.to_string(),
            required,
        });
        self
    }

    pub fn reward(mut self, reward: Reward) -> Self {
        self.reward = reward;
        self
    }
}
