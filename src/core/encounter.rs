//! Turn-based encounter resolution.
//!
//! An `Encounter` owns a cloned enemy plus all transient combat state: the
//! round-robin attack pattern cursor, the boss phase index, the player's
//! combo chain, stun, and timed effects. Nothing here touches the world;
//! the session layer feeds inputs in and narrates the outcomes.

use super::combat_math::{
    attack_power, combo_mult, defense_term, resistance_mult, resolve_damage, weakness_mult,
};
use super::constants::{BRACE_DAMAGE_REDUCTION, COMBO_WINDOW_SECS};
use crate::entities::class::{MoveEffect, MovePower, MoveScaling, SpecialMove};
use crate::entities::enemy::{AttackPattern, BossPhase, Enemy};
use crate::entities::player::{Player, StatKind};
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncounterError {
    #[error("not enough stamina: need {needed}, have {have}")]
    NotEnoughStamina { needed: u32, have: u32 },
}

/// A player-side effect with a remaining duration in enemy turns.
#[derive(Debug, Clone, PartialEq)]
enum EffectKind {
    DefenseBoost { amount: u32 },
    Evasion { chance: f64 },
    DamageShield { reduction: f64 },
    AttackBuff { amount: u32 },
}

#[derive(Debug, Clone, PartialEq)]
struct ActiveEffect {
    kind: EffectKind,
    turns_left: u32,
}

/// Report of one player strike.
#[derive(Debug, Clone, PartialEq)]
pub struct StrikeOutcome {
    pub move_name: Option<String>,
    pub damage: u32,
    /// Combo stacks that boosted this hit.
    pub combo_stacks: u32,
    pub exploited_weakness: bool,
    pub stunned_enemy: bool,
    pub defeated: bool,
    pub phase_message: Option<String>,
}

/// Report of one enemy turn.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyTurnOutcome {
    pub pattern_name: String,
    pub damage: u32,
    pub dodged: bool,
    /// The enemy spent the turn stunned and did nothing.
    pub was_stunned: bool,
    pub heavy: bool,
    pub player_defeated: bool,
}

#[derive(Debug, Clone)]
pub struct Encounter {
    pub enemy: Enemy,
    pattern_index: usize,
    current_phase: usize,
    combo_stacks: u32,
    last_hit_at: Option<f64>,
    enemy_stunned: bool,
    effects: Vec<ActiveEffect>,
}

impl Encounter {
    /// Starts a fight. The encounter owns its enemy; world templates hand
    /// over a fresh copy via `World::spawn_enemy`.
    pub fn new(enemy: Enemy) -> Self {
        Self {
            enemy,
            pattern_index: 0,
            current_phase: 0,
            combo_stacks: 0,
            last_hit_at: None,
            enemy_stunned: false,
            effects: Vec::new(),
        }
    }

    pub fn combo_stacks(&self) -> u32 {
        self.combo_stacks
    }

    pub fn enemy_stunned(&self) -> bool {
        self.enemy_stunned
    }

    pub fn current_phase(&self) -> usize {
        self.current_phase
    }

    fn phase(&self) -> Option<&BossPhase> {
        self.enemy.phases.get(self.current_phase)
    }

    fn phase_attack_boost(&self) -> u32 {
        self.phase().map_or(0, |p| p.attack_boost)
    }

    fn phase_defense_boost(&self) -> u32 {
        self.phase().map_or(0, |p| p.defense_boost)
    }

    fn effect_defense_bonus(&self) -> u32 {
        self.effects
            .iter()
            .map(|e| match e.kind {
                EffectKind::DefenseBoost { amount } => amount,
                _ => 0,
            })
            .sum()
    }

    fn effect_attack_bonus(&self) -> u32 {
        self.effects
            .iter()
            .map(|e| match e.kind {
                EffectKind::AttackBuff { amount } => amount,
                _ => 0,
            })
            .sum()
    }

    fn evasion_chance(&self) -> f64 {
        self.effects
            .iter()
            .filter_map(|e| match e.kind {
                EffectKind::Evasion { chance } => Some(chance),
                _ => None,
            })
            .fold(0.0, f64::max)
    }

    fn shield_reduction(&self) -> f64 {
        self.effects
            .iter()
            .filter_map(|e| match e.kind {
                EffectKind::DamageShield { reduction } => Some(reduction),
                _ => None,
            })
            .fold(0.0, f64::max)
    }

    /// Registers an attack buff from a consumable, lasting `turns` enemy turns.
    pub fn add_attack_buff(&mut self, amount: u32, turns: u32) {
        self.effects.push(ActiveEffect {
            kind: EffectKind::AttackBuff { amount },
            turns_left: turns,
        });
    }

    /// Peeks at the attack the enemy will use this turn, without advancing
    /// the pattern cursor. Used to raise the brace prompt on heavy swings.
    pub fn next_pattern(&self) -> AttackPattern {
        let patterns = self
            .phase()
            .and_then(|p| p.patterns.as_ref())
            .unwrap_or(&self.enemy.attack_patterns);
        if patterns.is_empty() {
            return AttackPattern::basic(self.enemy.attack);
        }
        patterns[self.pattern_index % patterns.len()].clone()
    }

    /// Applies damage to the enemy and runs the single phase transition this
    /// damage event may cause. Later phases are scanned in order and the
    /// first whose trigger the HP percentage has reached wins; the phase
    /// index never moves backward.
    fn damage_enemy(&mut self, amount: u32) -> Option<String> {
        self.enemy.take_damage(amount);
        if !self.enemy.is_alive() {
            return None;
        }
        let hp_percent = self.enemy.hp_percent();
        for index in self.current_phase + 1..self.enemy.phases.len() {
            if hp_percent <= self.enemy.phases[index].hp_percent_trigger {
                self.current_phase = index;
                // A new phase starts its attack cycle from the top.
                self.pattern_index = 0;
                return self.enemy.phases[index].message.clone();
            }
        }
        None
    }

    /// A basic attack. Free of stamina cost; chains into a combo when the
    /// previous hit landed within the combo window.
    pub fn player_attack(&mut self, player: &Player, now: f64) -> StrikeOutcome {
        let within_window = self
            .last_hit_at
            .is_some_and(|t| now - t <= COMBO_WINDOW_SECS);
        if !within_window {
            self.combo_stacks = 0;
        }
        let stacks = self.combo_stacks;

        let base = player.base_attack() + self.effect_attack_bonus();
        let ap = attack_power(base, player.stance);
        let weak = self.enemy.is_weak_to(player.attack_damage_type());
        let mult = weakness_mult(weak) * combo_mult(stacks);
        let dt = defense_term(self.enemy.defense + self.phase_defense_boost());
        let damage = resolve_damage(ap, mult, dt);

        let phase_message = self.damage_enemy(damage);
        self.combo_stacks = stacks + 1;
        self.last_hit_at = Some(now);

        StrikeOutcome {
            move_name: None,
            damage,
            combo_stacks: stacks,
            exploited_weakness: weak,
            stunned_enemy: false,
            defeated: !self.enemy.is_alive(),
            phase_message,
        }
    }

    /// A class special move. Stamina is checked before anything else changes;
    /// a rejected move leaves the encounter untouched. Specials sit outside
    /// the combo chain: they neither consume nor extend it.
    pub fn special_move(
        &mut self,
        player: &mut Player,
        mv: &SpecialMove,
        rng: &mut impl Rng,
    ) -> Result<StrikeOutcome, EncounterError> {
        if player.stamina < mv.stamina_cost {
            return Err(EncounterError::NotEnoughStamina {
                needed: mv.stamina_cost,
                have: player.stamina,
            });
        }
        player.spend_stamina(mv.stamina_cost);

        let mut base = match mv.power {
            MovePower::Multiplier(m) => (player.base_attack() as f64 * m) as u32,
            MovePower::Flat(flat) => flat,
        };
        if base > 0 {
            base += match mv.scaling {
                Some(MoveScaling::Faith) => player.stats.get(StatKind::Faith) / 2,
                Some(MoveScaling::Intelligence) => player.stats.get(StatKind::Intelligence) / 2,
                Some(MoveScaling::Dexterity) => player.stats.get(StatKind::Dexterity) / 2,
                None => 0,
            };
            base += self.effect_attack_bonus();
        }

        let (damage, weak, phase_message) = if base > 0 {
            let ap = attack_power(base, player.stance);
            let weak = self.enemy.is_weak_to(mv.damage_type);
            let dt = defense_term(self.enemy.defense + self.phase_defense_boost());
            let damage = resolve_damage(ap, weakness_mult(weak), dt);
            let message = self.damage_enemy(damage);
            (damage, weak, message)
        } else {
            (0, false, None)
        };

        let mut stunned_enemy = false;
        match mv.effect {
            Some(MoveEffect::StunChance { chance }) => {
                if self.enemy.is_alive() && rng.gen_bool(chance) {
                    self.enemy_stunned = true;
                    stunned_enemy = true;
                }
            }
            Some(MoveEffect::DefenseBoost { amount, turns }) => self.effects.push(ActiveEffect {
                kind: EffectKind::DefenseBoost { amount },
                turns_left: turns,
            }),
            Some(MoveEffect::EvasionBoost { chance, turns }) => self.effects.push(ActiveEffect {
                kind: EffectKind::Evasion { chance },
                turns_left: turns,
            }),
            Some(MoveEffect::DamageShield { reduction, turns }) => self.effects.push(ActiveEffect {
                kind: EffectKind::DamageShield { reduction },
                turns_left: turns,
            }),
            None => {}
        }

        Ok(StrikeOutcome {
            move_name: Some(mv.name.to_string()),
            damage,
            combo_stacks: 0,
            exploited_weakness: weak,
            stunned_enemy,
            defeated: !self.enemy.is_alive(),
            phase_message,
        })
    }

    /// The enemy's turn. `braced` is whether the player answered the brace
    /// prompt in time; it halves heavy-attack damage and does nothing
    /// against ordinary swings. Effects tick down and the player regains
    /// stamina at the end of the turn.
    pub fn enemy_turn(
        &mut self,
        player: &mut Player,
        braced: bool,
        rng: &mut impl Rng,
    ) -> EnemyTurnOutcome {
        if self.enemy_stunned {
            self.enemy_stunned = false;
            self.end_of_turn(player);
            return EnemyTurnOutcome {
                pattern_name: String::new(),
                damage: 0,
                dodged: false,
                was_stunned: true,
                heavy: false,
                player_defeated: false,
            };
        }

        let pattern = self.next_pattern();
        self.pattern_index = self.pattern_index.wrapping_add(1);

        let evasion = self.evasion_chance();
        if evasion > 0.0 && rng.gen_bool(evasion) {
            self.end_of_turn(player);
            return EnemyTurnOutcome {
                pattern_name: pattern.name,
                damage: 0,
                dodged: true,
                was_stunned: false,
                heavy: pattern.heavy,
                player_defeated: false,
            };
        }

        let ap = pattern.damage + self.phase_attack_boost();
        let resist = resistance_mult(player.resistance_percent(pattern.damage_type));
        let dt = defense_term(player.effective_defense() + self.effect_defense_bonus());
        let mut damage = resolve_damage(ap, resist, dt);
        if pattern.heavy && braced {
            damage = ((damage as f64 * BRACE_DAMAGE_REDUCTION) as u32).max(1);
        }
        let shield = self.shield_reduction();
        if shield > 0.0 {
            damage = ((damage as f64 * (1.0 - shield)) as u32).max(1);
        }
        player.take_damage(damage);

        self.end_of_turn(player);
        EnemyTurnOutcome {
            pattern_name: pattern.name,
            damage,
            dodged: false,
            was_stunned: false,
            heavy: pattern.heavy,
            player_defeated: !player.is_alive(),
        }
    }

    fn end_of_turn(&mut self, player: &mut Player) {
        for effect in &mut self.effects {
            effect.turns_left = effect.turns_left.saturating_sub(1);
        }
        self.effects.retain(|e| e.turns_left > 0);
        player.restore_stamina(player.stamina_regen());
    }

    /// Rolls the defeated enemy's loot table. Each entry drops independently;
    /// quantity is uniform over the entry's range.
    pub fn roll_loot(&self, rng: &mut impl Rng) -> Vec<(String, u32)> {
        let mut drops = Vec::new();
        for entry in &self.enemy.loot {
            if entry.chance >= 1.0 || rng.gen_bool(entry.chance.max(0.0)) {
                let (low, high) = entry.quantity;
                let quantity = if high > low {
                    rng.gen_range(low..=high)
                } else {
                    low
                };
                drops.push((entry.item_id.clone(), quantity));
            }
        }
        drops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::class::PlayerClass;
    use crate::entities::enemy::LootDrop;
    use crate::entities::item::DamageType;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn warrior() -> Player {
        Player::new("Tarn", PlayerClass::Warrior, "firelink_shrine")
    }

    fn soldier() -> Enemy {
        let mut enemy = Enemy::new("hollow_soldier", "Hollow Soldier", 3, 400, 8, 4);
        enemy.attack_patterns = vec![
            AttackPattern::basic(8),
            AttackPattern {
                name: "overhead slam".to_string(),
                damage: 14,
                damage_type: DamageType::Physical,
                heavy: true,
            },
        ];
        enemy
    }

    fn frost_boss() -> Enemy {
        let mut boss = Enemy::new("vordt", "Vordt of the Boreal Valley", 12, 300, 20, 10);
        boss.weaknesses.insert(DamageType::Fire);
        boss.phases = vec![
            BossPhase {
                hp_percent_trigger: 100,
                attack_boost: 0,
                defense_boost: 0,
                patterns: None,
                message: None,
            },
            BossPhase {
                hp_percent_trigger: 50,
                attack_boost: 6,
                defense_boost: 2,
                patterns: Some(vec![AttackPattern {
                    name: "frost charge".to_string(),
                    damage: 18,
                    damage_type: DamageType::Frost,
                    heavy: true,
                }]),
                message: Some("Vordt howls and frost spills across the floor.".to_string()),
            },
            BossPhase {
                hp_percent_trigger: 20,
                attack_boost: 12,
                defense_boost: 0,
                patterns: None,
                message: Some("Vordt charges with nothing left to lose.".to_string()),
            },
        ];
        boss
    }

    #[test]
    fn combo_builds_inside_window_and_resets_outside() {
        let player = warrior();
        let mut fight = Encounter::new(soldier());

        let first = fight.player_attack(&player, 0.0);
        assert_eq!(first.combo_stacks, 0);
        let second = fight.player_attack(&player, 1.5);
        assert_eq!(second.combo_stacks, 1);
        let third = fight.player_attack(&player, 3.0);
        assert_eq!(third.combo_stacks, 2);
        assert!(third.damage >= second.damage);

        // 2.0s exactly is still inside the window; beyond it the chain drops.
        let late = fight.player_attack(&player, 5.1);
        assert_eq!(late.combo_stacks, 0);
    }

    #[test]
    fn weakness_raises_player_damage() {
        let player = warrior();
        let boss = frost_boss();

        let neutral = Encounter::new(boss.clone())
            .player_attack(&player, 0.0)
            .damage;

        let mut fire_boss = boss;
        fire_boss.weaknesses.clear();
        fire_boss.weaknesses.insert(DamageType::Physical);
        let exploited = Encounter::new(fire_boss).player_attack(&player, 0.0);
        assert!(exploited.exploited_weakness);
        assert!(exploited.damage > neutral);
    }

    #[test]
    fn phase_transitions_fire_once_and_never_go_back() {
        let mut fight = Encounter::new(frost_boss());
        assert_eq!(fight.current_phase(), 0);

        // Drop to 45% in one event: the 50% phase triggers.
        let message = fight.damage_enemy(165);
        assert_eq!(fight.current_phase(), 1);
        assert!(message.unwrap().contains("frost"));

        // Next event crosses 20%.
        let message = fight.damage_enemy(90);
        assert_eq!(fight.current_phase(), 2);
        assert!(message.is_some());

        // Further damage stays in the final phase with no message.
        assert!(fight.damage_enemy(10).is_none());
        assert_eq!(fight.current_phase(), 2);
    }

    #[test]
    fn one_transition_per_damage_event_even_across_two_thresholds() {
        let mut fight = Encounter::new(frost_boss());
        // 300 -> 30 HP is 10%, beyond both the 50% and 20% triggers, but a
        // single event advances one phase only.
        fight.damage_enemy(270);
        assert_eq!(fight.current_phase(), 1);
        fight.damage_enemy(1);
        assert_eq!(fight.current_phase(), 2);
    }

    #[test]
    fn phase_pattern_override_and_boosts_apply() {
        let mut player = warrior();
        let mut fight = Encounter::new(frost_boss());
        fight.damage_enemy(160);
        assert_eq!(fight.current_phase(), 1);

        let pattern = fight.next_pattern();
        assert_eq!(pattern.name, "frost charge");
        assert!(pattern.heavy);

        let hp_before = player.hp;
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let outcome = fight.enemy_turn(&mut player, false, &mut rng);
        // 18 base + 6 phase boost, against warrior defense.
        assert!(outcome.damage > 0);
        assert_eq!(player.hp, hp_before - outcome.damage);
    }

    #[test]
    fn special_move_rejected_without_stamina_leaves_state_alone() {
        let mut player = warrior();
        player.stamina = 5;
        let mut fight = Encounter::new(soldier());
        let hp_before = fight.enemy.hp;
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let heavy_swing = PlayerClass::Warrior.find_move("heavy").unwrap();
        let err = fight
            .special_move(&mut player, heavy_swing, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            EncounterError::NotEnoughStamina {
                needed: 20,
                have: 5
            }
        );
        assert_eq!(player.stamina, 5);
        assert_eq!(fight.enemy.hp, hp_before);
    }

    #[test]
    fn special_move_spends_stamina_and_hits_harder() {
        let mut player = warrior();
        let mut fight = Encounter::new(soldier());
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let basic = fight.player_attack(&player, 0.0).damage;
        let heavy_swing = PlayerClass::Warrior.find_move("heavy").unwrap();
        let outcome = fight
            .special_move(&mut player, heavy_swing, &mut rng)
            .unwrap();
        assert_eq!(player.stamina, player.max_stamina - 20);
        assert!(outcome.damage > basic);
        assert_eq!(outcome.move_name.as_deref(), Some("Heavy Swing"));
    }

    #[test]
    fn stun_skips_exactly_one_enemy_turn() {
        let mut player = warrior();
        let mut fight = Encounter::new(soldier());
        fight.enemy_stunned = true;
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let skipped = fight.enemy_turn(&mut player, false, &mut rng);
        assert!(skipped.was_stunned);
        assert_eq!(skipped.damage, 0);
        assert_eq!(player.hp, player.max_hp);

        let swung = fight.enemy_turn(&mut player, false, &mut rng);
        assert!(!swung.was_stunned);
        assert!(swung.damage > 0);
    }

    #[test]
    fn bracing_halves_heavy_damage_only() {
        let mut fight = Encounter::new(soldier());
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        // Pattern 0 is the light strike: brace changes nothing.
        let mut player = warrior();
        let light = fight.enemy_turn(&mut player, true, &mut rng);
        assert!(!light.heavy);

        // Pattern 1 is the heavy slam.
        assert!(fight.next_pattern().heavy);
        let mut braced_player = warrior();
        let mut braced_fight = fight.clone();
        let braced = braced_fight.enemy_turn(&mut braced_player, true, &mut rng);
        let mut open_player = warrior();
        let open = fight.enemy_turn(&mut open_player, false, &mut rng);
        assert!(braced.heavy && open.heavy);
        assert_eq!(braced.damage, ((open.damage as f64 * 0.5) as u32).max(1));
    }

    #[test]
    fn war_cry_defense_boost_expires_after_three_turns() {
        let mut player = warrior();
        let mut fight = Encounter::new(soldier());
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let war_cry = PlayerClass::Warrior.find_move("war").unwrap();
        let outcome = fight.special_move(&mut player, war_cry, &mut rng).unwrap();
        assert_eq!(outcome.damage, 0);
        assert_eq!(fight.effect_defense_bonus(), 5);

        for _ in 0..3 {
            fight.enemy_turn(&mut player, false, &mut rng);
        }
        assert_eq!(fight.effect_defense_bonus(), 0);
    }

    #[test]
    fn guaranteed_evasion_dodges_the_swing() {
        let mut player = warrior();
        let mut fight = Encounter::new(soldier());
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let vanish = SpecialMove {
            name: "Vanish",
            stamina_cost: 0,
            power: MovePower::Flat(0),
            damage_type: DamageType::Physical,
            scaling: None,
            effect: Some(MoveEffect::EvasionBoost {
                chance: 1.0,
                turns: 1,
            }),
        };
        fight.special_move(&mut player, &vanish, &mut rng).unwrap();
        let outcome = fight.enemy_turn(&mut player, false, &mut rng);
        assert!(outcome.dodged);
        assert_eq!(player.hp, player.max_hp);
    }

    #[test]
    fn stamina_regenerates_each_round() {
        let mut player = warrior();
        player.stamina = 0;
        let mut fight = Encounter::new(soldier());
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        fight.enemy_turn(&mut player, false, &mut rng);
        // Warrior: 5 base + 9 dex / 5 = 6.
        assert_eq!(player.stamina, 6);
    }

    #[test]
    fn certain_loot_always_drops() {
        let mut enemy = soldier();
        enemy.loot = vec![
            LootDrop {
                item_id: "ember".to_string(),
                chance: 1.0,
                quantity: (1, 1),
            },
            LootDrop {
                item_id: "never".to_string(),
                chance: 0.0,
                quantity: (1, 1),
            },
        ];
        let fight = Encounter::new(enemy);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let drops = fight.roll_loot(&mut rng);
        assert_eq!(drops, vec![("ember".to_string(), 1)]);
    }
}
