//! Ardenvale: a single-player terminal RPG in the souls-like mold.
//!
//! Turn-based encounters with stances, combos, and boss phases; an essence
//! economy for leveling; beacons for rest and respawn; a small connected
//! world with NPC dialogue and quests; JSON save snapshots.

pub mod commands;
pub mod core;
pub mod entities;
pub mod input;
pub mod save;
pub mod session;
pub mod ui;
pub mod world;
