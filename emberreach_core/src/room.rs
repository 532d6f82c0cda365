//! Room definitions and spatial utilities (§3, §4.2).
//!
//! Any location a player or NPC can inhabit is represented as a `Room`.
//! A room exclusively owns its item list (§3 Ownership); exits encode their
//! destination as a bare room id within the same region or `"region:room"`
//! across regions -- resolved one level up, in [`crate::world`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Any visitable location in the game world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// direction -> destination, encoded `"room"` or `"region:room"`.
    #[serde(default)]
    pub exits: HashMap<String, String>,
    #[serde(default)]
    pub exit_requirements: HashMap<String, ExitRequirement>,
    #[serde(default)]
    pub env_interactions: HashMap<String, EnvInteraction>,
    #[serde(default)]
    pub items: Vec<Uuid>,
    #[serde(default)]
    pub npcs: Vec<Uuid>,
    #[serde(default)]
    pub visited: bool,
    #[serde(default)]
    pub properties: RoomProperties,
}

impl Room {
    pub fn new(id: Uuid, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            exits: HashMap::new(),
            exit_requirements: HashMap::new(),
            env_interactions: HashMap::new(),
            items: Vec::new(),
            npcs: Vec::new(),
            visited: false,
            properties: RoomProperties::default(),
        }
    }

    pub fn get_exit(&self, direction: &str) -> Option<&str> {
        self.exits.get(direction).map(String::as_str)
    }

    pub fn add_item(&mut self, item_id: Uuid) {
        self.items.push(item_id);
    }

    pub fn remove_item(&mut self, item_id: Uuid) -> Option<Uuid> {
        let pos = self.items.iter().position(|id| *id == item_id)?;
        Some(self.items.remove(pos))
    }

    pub fn add_npc(&mut self, npc_id: Uuid) {
        if !self.npcs.contains(&npc_id) {
            self.npcs.push(npc_id);
        }
    }

    pub fn remove_npc(&mut self, npc_id: Uuid) {
        self.npcs.retain(|id| *id != npc_id);
    }

    /// Whether monsters may spawn here: not a safe zone, not flagged
    /// `no_monster_spawn` (§4.9).
    pub fn spawnable(&self) -> bool {
        !self.properties.safe_zone && !self.properties.no_monster_spawn
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomProperties {
    #[serde(default)]
    pub outdoors: bool,
    #[serde(default)]
    pub safe_zone: bool,
    #[serde(default)]
    pub no_monster_spawn: bool,
    pub locked_by: Option<Uuid>,
}

/// A requirement gating traversal of an exit (§4.7).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExitRequirement {
    Key { obj_id: Uuid },
    SkillCheck { skill: String, difficulty: u32 },
}

/// A room reaction to a spell of a given damage type landing on it (§4.2).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnvInteraction {
    ClearExitReq { direction: String, duration_secs: f64, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove_item_preserves_order_of_remaining() {
        let mut room = Room::new(Uuid::nil(), "Cellar", "A damp cellar.");
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        room.add_item(a);
        room.add_item(b);
        assert_eq!(room.remove_item(a), Some(a));
        assert_eq!(room.items, vec![b]);
        assert_eq!(room.remove_item(a), None);
    }

    #[test]
    fn spawnable_respects_safe_zone_and_flag() {
        let mut room = Room::new(Uuid::nil(), "Square", "");
        assert!(room.spawnable());
        room.properties.safe_zone = true;
        assert!(!room.spawnable());
        room.properties.safe_zone = false;
        room.properties.no_monster_spawn = true;
        assert!(!room.spawnable());
    }
}
