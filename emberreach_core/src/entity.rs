//! Shared combatant state for NPCs and the player (§3 Data Model).
//!
//! The spec describes the Player record as "same as NPC shape plus" a list
//! of player-only fields. Rather than duplicate the shared fields in both
//! `Npc` and `Player`, this module factors them into [`CombatantCore`] that
//! both embed; `combat.rs`, `magic.rs`, and `effect.rs` operate against this
//! shared shape so a single code path resolves hit/damage/heal/effects for
//! either kind of combatant.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use emberreach_data::StatsDef as Stats;

use crate::config::MINIMUM_DAMAGE_TAKEN;
use crate::effect::{self, Effect};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatantCore {
    pub instance_id: Uuid,
    pub name: String,
    pub region_id: Uuid,
    pub room_id: Uuid,
    pub stats: Stats,
    pub level: i64,
    pub health: i64,
    pub max_health: i64,
    pub mana: i64,
    pub max_mana: i64,
    pub faction: String,
    #[serde(default)]
    pub combat_targets: HashSet<Uuid>,
    #[serde(default)]
    pub in_combat: bool,
    #[serde(default)]
    pub last_combat_action: f64,
    #[serde(default)]
    pub last_attack_time: f64,
    #[serde(default)]
    pub spell_cooldowns: HashMap<Uuid, f64>,
    #[serde(default)]
    pub active_effects: Vec<Effect>,
    /// damage_type -> percentage reduction (can be negative: weakness).
    #[serde(default)]
    pub resistances: HashMap<String, i64>,
    #[serde(default = "default_alive")]
    pub is_alive: bool,
}

fn default_alive() -> bool {
    true
}

impl CombatantCore {
    pub fn new(instance_id: Uuid, name: impl Into<String>, region_id: Uuid, room_id: Uuid, stats: Stats, level: i64) -> Self {
        let max_health = stats.max_health;
        Self {
            instance_id,
            name: name.into(),
            region_id,
            room_id,
            stats,
            level,
            health: max_health,
            max_health,
            mana: 0,
            max_mana: 0,
            faction: String::new(),
            combat_targets: HashSet::new(),
            in_combat: false,
            last_combat_action: 0.0,
            last_attack_time: 0.0,
            spell_cooldowns: HashMap::new(),
            active_effects: Vec::new(),
            resistances: HashMap::new(),
            is_alive: true,
        }
    }

    pub fn health_fraction(&self) -> f64 {
        if self.max_health <= 0 {
            0.0
        } else {
            self.health as f64 / self.max_health as f64
        }
    }

    pub fn mana_fraction(&self) -> f64 {
        if self.max_mana <= 0 {
            0.0
        } else {
            self.mana as f64 / self.max_mana as f64
        }
    }

    /// Percentage reduction for `damage_type`; 0 if not specified.
    pub fn get_resistance(&self, damage_type: &str) -> i64 {
        *self.resistances.get(damage_type).unwrap_or(&0)
    }

    /// Apply `amount` raw damage of `damage_type`, subtracting resistance
    /// (invariant §3.8: 100% resistance yields zero damage and the minimum
    /// floor does not apply when fully resisted). Clamps health to
    /// `[0, max_health]` (invariant §3.6). Returns the damage actually
    /// applied.
    pub fn take_damage(&mut self, amount: i64, damage_type: &str) -> i64 {
        if amount <= 0 {
            return 0;
        }
        let resistance = self.get_resistance(damage_type).clamp(-1000, 100);
        let reduced = (amount as f64 * (1.0 - resistance as f64 / 100.0)).floor() as i64;
        let applied = if resistance >= 100 {
            0
        } else {
            reduced.max(MINIMUM_DAMAGE_TAKEN)
        };
        let applied = applied.min(self.health);
        self.health = (self.health - applied).max(0);
        applied
    }

    /// Heal by `amount`, never past `max_health`. Returns the amount actually
    /// restored.
    pub fn heal(&mut self, amount: i64) -> i64 {
        if amount <= 0 {
            return 0;
        }
        let before = self.health;
        self.health = (self.health + amount).min(self.max_health);
        self.health - before
    }

    pub fn has_effect(&self, name: &str) -> bool {
        self.active_effects.iter().any(|e| e.name == name)
    }

    pub fn apply_effect(&mut self, incoming: Effect) {
        effect::apply_effect(&mut self.active_effects, incoming);
    }

    pub fn remove_effects_by_tag(&mut self, tags: &[&str]) -> Vec<Effect> {
        effect::remove_effects_by_tag(&mut self.active_effects, tags)
    }

    /// Base stat plus any active `stat_mod` modifiers (§4.4).
    pub fn effective_stat(&self, stat: &str) -> i64 {
        let base = match stat {
            "attack_power" => self.stats.attack_power,
            "defense" => self.stats.defense,
            "agility" => self.stats.agility,
            "intellect" => self.stats.intellect,
            "dexterity" => self.stats.dexterity,
            "wisdom" => self.stats.wisdom,
            _ => 0,
        };
        base + effect::effective_stat_modifier(&self.active_effects, stat)
    }

    pub fn is_stunned(&self) -> bool {
        effect::is_stunned(&self.active_effects)
    }

    pub fn is_silenced(&self) -> bool {
        effect::is_silenced(&self.active_effects)
    }

    pub fn is_blind(&self) -> bool {
        effect::is_blind(&self.active_effects)
    }

    pub fn has_vampirism(&self) -> bool {
        effect::has_vampirism(&self.active_effects)
    }

    /// Clear combat state and effects on death (invariant §3.5, §8).
    pub fn die(&mut self) {
        self.is_alive = false;
        self.health = 0;
        self.active_effects.clear();
        self.combat_targets.clear();
        self.in_combat = false;
    }

    /// Drop stale dead/out-of-room targets before resolving an action
    /// (invariant §3.3). `alive_in_room` answers whether a candidate id is
    /// both alive and present in this combatant's current room.
    pub fn prune_targets(&mut self, alive_in_room: impl Fn(Uuid) -> bool) {
        self.combat_targets.retain(|id| alive_in_room(*id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core() -> CombatantCore {
        CombatantCore::new(Uuid::new_v4(), "Test", Uuid::nil(), Uuid::nil(), Stats::default(), 1)
    }

    #[test]
    fn full_resistance_yields_zero_damage_bypassing_floor() {
        let mut c = core();
        c.resistances.insert("fire".to_string(), 100);
        assert_eq!(c.take_damage(50, "fire"), 0);
    }

    #[test]
    fn partial_resistance_scales_linearly() {
        let mut c = core();
        c.resistances.insert("fire".to_string(), 50);
        assert_eq!(c.take_damage(10, "fire"), 5);
    }

    #[test]
    fn damage_below_floor_is_raised_to_minimum_unless_fully_resisted() {
        let mut c = core();
        assert_eq!(c.take_damage(1, "physical"), MINIMUM_DAMAGE_TAKEN);
    }

    #[test]
    fn health_clamps_to_max_on_heal() {
        let mut c = core();
        c.health = c.max_health - 2;
        assert_eq!(c.heal(10), 2);
        assert_eq!(c.health, c.max_health);
    }

    #[test]
    fn die_clears_effects_and_combat_state() {
        let mut c = core();
        c.apply_effect(Effect::new("Poison", crate::effect::EffectKind::Dot, 5.0));
        c.combat_targets.insert(Uuid::new_v4());
        c.die();
        assert!(!c.is_alive);
        assert!(c.active_effects.is_empty());
        assert!(c.combat_targets.is_empty());
    }
}
