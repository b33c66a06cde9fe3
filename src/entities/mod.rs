pub mod class;
pub mod enemy;
pub mod inventory;
pub mod item;
pub mod location;
pub mod npc;
pub mod player;
pub mod quest;

pub use class::{MoveEffect, MovePower, MoveScaling, PlayerClass, SpecialMove};
pub use enemy::{AttackPattern, BossPhase, Enemy, LootDrop};
pub use inventory::{EquipSlot, Equipment, Inventory};
pub use item::{DamageType, Item, ItemKind};
pub use location::Location;
pub use npc::Npc;
pub use player::{Player, Stance, StatKind, Stats};
pub use quest::{Objective, ObjectiveKind, Quest, Reward};
