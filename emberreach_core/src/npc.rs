//! Live NPC instances and their behavior-scoped state (§3, §4.8, §4.9).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use emberreach_data::BehaviorDef as BehaviorKind;

use crate::entity::{CombatantCore, Stats};

/// A special attack an NPC may fire with fixed probability per tick (§4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialAbility {
    pub name: String,
    pub damage_multiplier: f64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub hour: u32,
    pub room_id: Uuid,
    pub behavior_override: Option<BehaviorKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootEntry {
    pub item_template_id: Uuid,
    pub chance: f64,
    pub qty_min: u32,
    pub qty_max: u32,
}

/// Transient AI bookkeeping that doesn't belong on the permanent record but
/// must survive a save/load round trip (current path while retreating or
/// patrolling, the behavior stashed away during a retreat, etc).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiState {
    pub current_path: Vec<String>,
    pub original_behavior: Option<BehaviorKind>,
    pub current_activity: Option<String>,
    pub patrol_index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Npc {
    pub core: CombatantCore,
    pub template_id: Uuid,
    pub description: String,
    pub behavior_type: BehaviorKind,
    pub ai_state: AiState,
    #[serde(default)]
    pub usable_spells: Vec<Uuid>,
    #[serde(default)]
    pub loot_table: Vec<LootEntry>,
    #[serde(default)]
    pub special_abilities: Vec<SpecialAbility>,
    #[serde(default)]
    pub schedule: Vec<ScheduleEntry>,
    #[serde(default)]
    pub patrol_points: Vec<Uuid>,
    pub follow_target: Option<Uuid>,
    pub owner_id: Option<Uuid>,
    #[serde(default)]
    pub creation_time: f64,
    pub summon_duration: Option<f64>,
    pub home_region: Option<Uuid>,
    pub home_room: Option<Uuid>,
    #[serde(default)]
    pub respawnable: bool,
    #[serde(default)]
    pub is_trading: bool,
    #[serde(default)]
    pub aggression: f64,
    #[serde(default = "default_flee_threshold")]
    pub flee_threshold: f64,
    #[serde(default = "default_move_cooldown")]
    pub move_cooldown: f64,
    #[serde(default = "default_combat_cooldown")]
    pub combat_cooldown: f64,
    #[serde(default = "default_attack_cooldown")]
    pub attack_cooldown: f64,
    #[serde(default)]
    pub last_moved: f64,
}

fn default_flee_threshold() -> f64 {
    crate::config::NPC_DEFAULT_FLEE_THRESHOLD
}
fn default_move_cooldown() -> f64 {
    crate::config::NPC_DEFAULT_MOVE_COOLDOWN
}
fn default_combat_cooldown() -> f64 {
    crate::config::NPC_DEFAULT_COMBAT_COOLDOWN
}
fn default_attack_cooldown() -> f64 {
    crate::config::NPC_DEFAULT_ATTACK_COOLDOWN
}

impl Npc {
    pub fn new(instance_id: Uuid, template_id: Uuid, name: impl Into<String>, region_id: Uuid, room_id: Uuid, stats: Stats, level: i64, behavior_type: BehaviorKind) -> Self {
        Self {
            core: CombatantCore::new(instance_id, name, region_id, room_id, stats, level),
            template_id,
            description: String::new(),
            behavior_type,
            ai_state: AiState::default(),
            usable_spells: Vec::new(),
            loot_table: Vec::new(),
            special_abilities: Vec::new(),
            schedule: Vec::new(),
            patrol_points: Vec::new(),
            follow_target: None,
            owner_id: None,
            creation_time: 0.0,
            summon_duration: None,
            home_region: None,
            home_room: None,
            respawnable: false,
            is_trading: false,
            aggression: crate::config::NPC_DEFAULT_AGGRESSION,
            flee_threshold: default_flee_threshold(),
            move_cooldown: default_move_cooldown(),
            combat_cooldown: default_combat_cooldown(),
            attack_cooldown: default_attack_cooldown(),
            last_moved: 0.0,
        }
    }

    pub fn instance_id(&self) -> Uuid {
        self.core.instance_id
    }

    pub fn is_alive(&self) -> bool {
        self.core.is_alive
    }

    /// `true` once a summon has outlived its duration (§4.8 step 3).
    pub fn summon_expired(&self, now: f64) -> bool {
        matches!(self.summon_duration, Some(duration) if now > self.creation_time + duration)
    }

    /// Roll the loot table and return `(item_template_id, quantity)` drops.
    pub fn roll_loot(&self, rng: &mut crate::rng::RollStream) -> Vec<(Uuid, u32)> {
        self.loot_table
            .iter()
            .filter(|entry| rng.chance(entry.chance))
            .map(|entry| {
                let qty = rng.uniform_inclusive(entry.qty_min as i64, entry.qty_max as i64).max(1) as u32;
                (entry.item_template_id, qty)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn npc() -> Npc {
        Npc::new(Uuid::new_v4(), Uuid::nil(), "Goblin", Uuid::nil(), Uuid::nil(), Stats::default(), 3, BehaviorKind::Wanderer)
    }

    #[test]
    fn summon_expires_strictly_after_duration_elapses() {
        let mut m = npc();
        m.creation_time = 0.0;
        m.summon_duration = Some(30.0);
        assert!(!m.summon_expired(30.0));
        assert!(m.summon_expired(30.1));
    }

    #[test]
    fn non_summon_never_expires() {
        let m = npc();
        assert!(!m.summon_expired(1_000_000.0));
    }
}
