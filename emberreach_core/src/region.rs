//! Regions group rooms and carry region-scoped properties (§3, §4.2).
//!
//! A region exclusively owns its rooms (§3 Ownership). Dynamic regions
//! (`instance_*`, `dynamic_*`) are created by [`crate::instance`] and carry
//! the same shape as authored regions so the rest of the engine need not
//! distinguish them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::room::Room;

/// A named grouping of rooms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub properties: RegionProperties,
    pub rooms: HashMap<Uuid, Room>,
}

impl Region {
    pub fn new(id: Uuid, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            properties: RegionProperties::default(),
            rooms: HashMap::new(),
        }
    }

    pub fn get_room(&self, room_id: Uuid) -> Option<&Room> {
        self.rooms.get(&room_id)
    }

    pub fn get_room_mut(&mut self, room_id: Uuid) -> Option<&mut Room> {
        self.rooms.get_mut(&room_id)
    }

    /// `true` for dynamic regions created at runtime (instance or procedural
    /// spawner sub-regions), identified by a naming convention rather than a
    /// dedicated flag so save data doesn't need a parallel bookkeeping field.
    pub fn is_dynamic(&self) -> bool {
        self.name.starts_with("instance_") || self.name.starts_with("dynamic_")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionProperties {
    #[serde(default)]
    pub safe_zone: bool,
    #[serde(default)]
    pub outdoors: bool,
    pub spawner_config: Option<SpawnerConfig>,
}

/// Per-region monster population control (§4.9).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnerConfig {
    pub monster_types: Vec<String>,
    pub max_population: usize,
    pub spawn_interval_secs: f64,
    #[serde(default)]
    pub last_spawn_attempt: f64,
}
