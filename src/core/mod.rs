pub mod combat_math;
pub mod constants;
pub mod encounter;
pub mod progression;
pub mod quest_log;

pub use encounter::{Encounter, EncounterError, EnemyTurnOutcome, StrikeOutcome};
pub use progression::ProgressionError;
pub use quest_log::{QuestLog, QuestState};
