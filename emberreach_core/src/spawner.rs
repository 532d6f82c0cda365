//! Spawner and respawn manager (§4.9), grounded in the pattern used by
//! `npc_spawner.rs` in the wider reference pack: per-zone spawn config plus
//! a flat list of pending respawn timers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::NPC_DEFAULT_RESPAWN_COOLDOWN;
use crate::region::{Region, SpawnerConfig};
use crate::room::Room;

/// A pending respawn for a friendly/neutral NPC with a home room (§4.9).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespawnEntry {
    pub template_id: Uuid,
    pub instance_id: Uuid,
    pub name: String,
    pub home_region_id: Uuid,
    pub home_room_id: Uuid,
    pub respawn_time: f64,
}

pub fn queue_respawn(template_id: Uuid, instance_id: Uuid, name: impl Into<String>, home_region_id: Uuid, home_room_id: Uuid, now: f64) -> RespawnEntry {
    RespawnEntry {
        template_id,
        instance_id,
        name: name.into(),
        home_region_id,
        home_room_id,
        respawn_time: now + NPC_DEFAULT_RESPAWN_COOLDOWN,
    }
}

/// Drain and return every entry whose `respawn_time` has elapsed (§4.9).
pub fn pop_due_respawns(queue: &mut Vec<RespawnEntry>, now: f64) -> Vec<RespawnEntry> {
    let (due, remaining): (Vec<_>, Vec<_>) = queue.drain(..).partition(|entry| entry.respawn_time <= now);
    *queue = remaining;
    due
}

/// `true` once a region's spawner is due to attempt another spawn (§4.9).
pub fn spawner_due(config: &SpawnerConfig, now: f64) -> bool {
    now - config.last_spawn_attempt >= config.spawn_interval_secs
}

/// Rooms in `region` eligible to receive a spawned monster: not a safe zone,
/// not flagged `no_monster_spawn`, and not currently holding the player.
pub fn eligible_spawn_rooms<'a>(region: &'a Region, player_room_id: Uuid) -> Vec<&'a Room> {
    region.rooms.values().filter(|room| room.spawnable() && room.id != player_room_id).collect()
}

/// `true` while the region's live population is below its configured cap.
pub fn under_population_cap(config: &SpawnerConfig, current_population: usize) -> bool {
    current_population < config.max_population
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_respawns_are_removed_and_returned_in_one_pass() {
        let mut queue = vec![
            RespawnEntry { template_id: Uuid::nil(), instance_id: Uuid::new_v4(), name: "a".into(), home_region_id: Uuid::nil(), home_room_id: Uuid::nil(), respawn_time: 5.0 },
            RespawnEntry { template_id: Uuid::nil(), instance_id: Uuid::new_v4(), name: "b".into(), home_region_id: Uuid::nil(), home_room_id: Uuid::nil(), respawn_time: 50.0 },
        ];
        let due = pop_due_respawns(&mut queue, 10.0);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].name, "a");
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn spawner_respects_interval() {
        let config = SpawnerConfig { monster_types: vec![], max_population: 5, spawn_interval_secs: 60.0, last_spawn_attempt: 0.0 };
        assert!(!spawner_due(&config, 30.0));
        assert!(spawner_due(&config, 60.0));
    }
}
