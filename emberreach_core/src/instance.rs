//! Procedural instance layouts and instantiation bookkeeping (§4.12).
//!
//! Layout generation is a pure grid random walk; it knows nothing about the
//! rest of the world. Instantiating/tearing down a region in the live world
//! graph (patching the two linking exits) is orchestrated by
//! [`crate::world::World`], which has the region/room maps this module does
//! not.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rng::RollStream;
use crate::room::Room;

const DIRECTIONS: [(&str, (i32, i32), &str); 4] =
    [("north", (0, 1), "south"), ("south", (0, -1), "north"), ("east", (1, 0), "west"), ("west", (-1, 0), "east")];

/// A freshly generated, unlinked-to-the-world set of rooms plus the index
/// of the entry room (grid origin), which is where the `out` exit lives.
pub struct GeneratedLayout {
    pub rooms: Vec<Room>,
    pub entry_index: usize,
}

/// Non-linear grid random walk (§4.12): place `Uniform(min, max)` rooms,
/// extending from a random frontier room into a free adjacent cell each
/// step, then add a handful of extra loop edges between already-placed
/// neighbors.
pub fn generate_layout(min_rooms: usize, max_rooms: usize, rng: &mut RollStream) -> GeneratedLayout {
    let target = rng.uniform_inclusive(min_rooms.max(1) as i64, max_rooms.max(min_rooms).max(1) as i64).max(1) as usize;

    let mut positions: HashMap<(i32, i32), usize> = HashMap::new();
    let mut rooms: Vec<Room> = Vec::new();

    let origin_id = Uuid::new_v4();
    let mut origin = Room::new(origin_id, "Entry Chamber", "A rough-hewn chamber.");
    origin.exits.insert("out".to_string(), "dynamic:out".to_string());
    rooms.push(origin);
    positions.insert((0, 0), 0);

    let mut frontier = vec![0usize];

    while rooms.len() < target {
        let free_candidates: Vec<usize> = frontier
            .iter()
            .copied()
            .filter(|&idx| free_directions(idx, &positions, &rooms).next().is_some())
            .collect();
        let Some(&pick_idx) = rng.pick_index(free_candidates.len()).and_then(|i| free_candidates.get(i)) else {
            break;
        };

        let free: Vec<_> = free_directions(pick_idx, &positions, &rooms).collect();
        let Some(&(direction, delta, opposite)) = rng.pick_index(free.len()).and_then(|i| free.get(i)) else {
            break;
        };

        let current_pos = room_position(pick_idx, &positions);
        let new_pos = (current_pos.0 + delta.0, current_pos.1 + delta.1);

        let new_id = Uuid::new_v4();
        let mut new_room = Room::new(new_id, format!("Room {}", rooms.len()), "A narrow passage.");
        new_room.exits.insert(opposite.to_string(), rooms[pick_idx].id.to_string());
        let new_idx = rooms.len();
        rooms.push(new_room);
        positions.insert(new_pos, new_idx);

        rooms[pick_idx].exits.insert(direction.to_string(), rooms[new_idx].id.to_string());
        frontier.push(new_idx);
    }

    let n = rooms.len();
    let extra_attempts = if n >= 2 { rng.uniform_inclusive((n / 3).max(1) as i64, (n - 1).max(1) as i64).max(0) as usize } else { 0 };
    for _ in 0..extra_attempts {
        let Some(idx) = rng.pick_index(n) else { break };
        let pos = room_position(idx, &positions);
        for (direction, delta, opposite) in DIRECTIONS {
            if rooms[idx].exits.contains_key(direction) {
                continue;
            }
            let neighbor_pos = (pos.0 + delta.0, pos.1 + delta.1);
            let linkable = positions.get(&neighbor_pos).copied().filter(|&ni| !rooms[ni].exits.contains_key(opposite));
            if let Some(neighbor_idx) = linkable {
                let neighbor_id = rooms[neighbor_idx].id;
                let this_id = rooms[idx].id;
                rooms[idx].exits.insert(direction.to_string(), neighbor_id.to_string());
                rooms[neighbor_idx].exits.insert(opposite.to_string(), this_id.to_string());
                break;
            }
        }
    }

    GeneratedLayout { rooms, entry_index: 0 }
}

fn room_position(idx: usize, positions: &HashMap<(i32, i32), usize>) -> (i32, i32) {
    positions.iter().find(|(_, &v)| v == idx).map(|(&k, _)| k).unwrap_or((0, 0))
}

fn free_directions<'a>(idx: usize, positions: &'a HashMap<(i32, i32), usize>, rooms: &'a [Room]) -> impl Iterator<Item = (&'static str, (i32, i32), &'static str)> + 'a {
    let pos = room_position(idx, positions);
    DIRECTIONS.into_iter().filter(move |(direction, delta, _)| {
        !rooms[idx].exits.contains_key(*direction) && !positions.contains_key(&(pos.0 + delta.0, pos.1 + delta.1))
    })
}

/// Bookkeeping for one instantiated quest region so cleanup can restore both
/// patched exits exactly (§4.12 Cleanup).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceLink {
    pub instance_region_id: Uuid,
    pub quest_instance_id: Uuid,
    pub external_region_id: Uuid,
    pub external_room_id: Uuid,
    pub external_exit_command: String,
    pub entry_room_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_layout_has_requested_room_count_range() {
        let mut rng = RollStream::new(11);
        let layout = generate_layout(3, 6, &mut rng);
        assert!(layout.rooms.len() >= 1 && layout.rooms.len() <= 6);
    }

    #[test]
    fn every_placed_room_is_reachable_from_the_entry() {
        let mut rng = RollStream::new(4);
        let layout = generate_layout(5, 5, &mut rng);
        let by_id: HashMap<Uuid, &Room> = layout.rooms.iter().map(|r| (r.id, r)).collect();

        let mut seen = std::collections::HashSet::new();
        let mut stack = vec![layout.rooms[layout.entry_index].id];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(room) = by_id.get(&id) {
                for dest in room.exits.values() {
                    if dest == "dynamic:out" {
                        continue;
                    }
                    if let Ok(dest_id) = Uuid::parse_str(dest) {
                        stack.push(dest_id);
                    }
                }
            }
        }
        assert_eq!(seen.len(), layout.rooms.len());
    }
}
