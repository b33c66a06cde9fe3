//! Per-player quest tracking.
//!
//! Quest definitions live in the world; the log only stores the player's
//! position in each quest's lifecycle: not started, active with per-objective
//! counts, or completed. Completed is terminal.

use crate::entities::quest::{ObjectiveKind, Quest};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestState {
    NotStarted,
    Active,
    Completed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestLog {
    /// Quest id -> progress counts, one per objective, in definition order.
    active: BTreeMap<String, Vec<u32>>,
    completed: BTreeSet<String>,
}

impl QuestLog {
    pub fn state(&self, quest_id: &str) -> QuestState {
        if self.completed.contains(quest_id) {
            QuestState::Completed
        } else if self.active.contains_key(quest_id) {
            QuestState::Active
        } else {
            QuestState::NotStarted
        }
    }

    /// Accepts a quest. Returns false if it is already active or completed.
    pub fn start(&mut self, quest: &Quest) -> bool {
        if self.state(&quest.id) != QuestState::NotStarted {
            return false;
        }
        self.active
            .insert(quest.id.clone(), vec![0; quest.objectives.len()]);
        true
    }

    /// Progress counts for an active quest, in objective order.
    pub fn progress(&self, quest_id: &str) -> Option<&[u32]> {
        self.active.get(quest_id).map(Vec::as_slice)
    }

    pub fn active_ids(&self) -> impl Iterator<Item = &str> {
        self.active.keys().map(String::as_str)
    }

    pub fn completed_ids(&self) -> impl Iterator<Item = &str> {
        self.completed.iter().map(String::as_str)
    }

    /// Records a game event (an item gained or an enemy killed) against every
    /// active quest with a matching objective. Counts clamp at the objective's
    /// requirement. Returns the ids of quests whose objectives are now all met.
    pub fn record(
        &mut self,
        quests: &BTreeMap<String, Quest>,
        kind: ObjectiveKind,
        target: &str,
        amount: u32,
    ) -> Vec<String> {
        let mut ready = Vec::new();
        for (id, counts) in &mut self.active {
            let Some(quest) = quests.get(id) else {
                continue;
            };
            for (objective, count) in quest.objectives.iter().zip(counts.iter_mut()) {
                if objective.kind == kind && objective.target == target {
                    *count = (*count + amount).min(objective.required);
                }
            }
            let done = quest
                .objectives
                .iter()
                .zip(counts.iter())
                .all(|(objective, count)| *count >= objective.required);
            if done {
                ready.push(id.clone());
            }
        }
        ready
    }

    pub fn is_complete(&self, quest: &Quest) -> bool {
        match self.active.get(&quest.id) {
            Some(counts) => quest
                .objectives
                .iter()
                .zip(counts.iter())
                .all(|(objective, count)| *count >= objective.required),
            None => false,
        }
    }

    /// Moves a quest from active to completed if all objectives are met.
    /// Returns true only on the transition, so rewards are handed out once.
    pub fn try_complete(&mut self, quest: &Quest) -> bool {
        if !self.is_complete(quest) {
            return false;
        }
        self.active.remove(&quest.id);
        self.completed.insert(quest.id.clone())
    }
}
