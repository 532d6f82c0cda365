//! The player character (§3 Data Model: "same as NPC shape plus...").

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{CombatantCore, Stats};
use crate::skill::Skill;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub core: CombatantCore,
    pub class: String,
    pub xp: i64,
    #[serde(default)]
    pub gold: i64,
    #[serde(default)]
    pub known_spells: HashSet<Uuid>,
    /// spell_id -> live minion instance ids (invariant §3.4).
    #[serde(default)]
    pub active_summons: HashMap<Uuid, Vec<Uuid>>,
    /// faction -> reputation score (§4.13).
    #[serde(default)]
    pub reputation: HashMap<String, i64>,
    #[serde(default)]
    pub inventory: Vec<Uuid>,
    #[serde(default = "default_inventory_capacity")]
    pub inventory_capacity: usize,
    /// slot name -> equipped item.
    #[serde(default)]
    pub equipment: HashMap<String, Uuid>,
    #[serde(default)]
    pub quest_log: Vec<Uuid>,
    #[serde(default)]
    pub completed_quest_log: Vec<Uuid>,
    #[serde(default)]
    pub collections_progress: HashMap<String, u32>,
    #[serde(default)]
    pub skills: HashMap<String, Skill>,
    pub respawn_region: Uuid,
    pub respawn_room: Uuid,
}

fn default_inventory_capacity() -> usize {
    20
}

impl Player {
    pub fn new(instance_id: Uuid, name: impl Into<String>, class: impl Into<String>, region_id: Uuid, room_id: Uuid, stats: Stats) -> Self {
        Self {
            core: CombatantCore::new(instance_id, name, region_id, room_id, stats, 1),
            class: class.into(),
            xp: 0,
            gold: 0,
            known_spells: HashSet::new(),
            active_summons: HashMap::new(),
            reputation: HashMap::new(),
            inventory: Vec::new(),
            inventory_capacity: default_inventory_capacity(),
            equipment: HashMap::new(),
            quest_log: Vec::new(),
            completed_quest_log: Vec::new(),
            collections_progress: HashMap::new(),
            skills: HashMap::new(),
            respawn_region: region_id,
            respawn_room: room_id,
        }
    }

    pub fn instance_id(&self) -> Uuid {
        self.core.instance_id
    }

    /// Inventory has a free slot (non-stacking add, §8 boundary behavior).
    pub fn has_inventory_room(&self) -> bool {
        self.inventory.len() < self.inventory_capacity
    }

    pub fn register_summon(&mut self, spell_id: Uuid, npc_id: Uuid) {
        self.active_summons.entry(spell_id).or_default().push(npc_id);
    }

    /// Remove a summon's linkage (owner change or despawn, §8 invariant).
    pub fn unlink_summon(&mut self, npc_id: Uuid) {
        for list in self.active_summons.values_mut() {
            list.retain(|id| *id != npc_id);
        }
        self.active_summons.retain(|_, list| !list.is_empty());
    }

    /// Faction relation base plus reputation offset (§4.13).
    pub fn relation_to_faction(&self, faction: &str, base_relation: i64) -> i64 {
        base_relation + self.reputation.get(faction).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(Uuid::new_v4(), "Hero", "warrior", Uuid::nil(), Uuid::nil(), Stats::default())
    }

    #[test]
    fn unlinking_a_summon_removes_it_from_every_list() {
        let mut p = player();
        let spell = Uuid::new_v4();
        let npc = Uuid::new_v4();
        p.register_summon(spell, npc);
        assert_eq!(p.active_summons[&spell], vec![npc]);
        p.unlink_summon(npc);
        assert!(!p.active_summons.contains_key(&spell));
    }

    #[test]
    fn hostile_relation_below_zero() {
        let mut p = player();
        p.reputation.insert("bandits".to_string(), -5);
        assert!(p.relation_to_faction("bandits", 0) < 0);
    }
}
