//! Shortest-path search over the room graph (§4.3), ported from the
//! original engine's `pathfinding.py`.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use uuid::Uuid;

/// Read-only view of the room graph the pathfinder walks. Implemented by
/// [`crate::world::World`]; kept as a trait so this module has no
/// dependency on the world aggregate itself.
pub trait RoomGraph {
    fn room_exists(&self, region_id: Uuid, room_id: Uuid) -> bool;
    /// `(direction, dest_region_id, dest_room_id)` for every exit out of the room.
    fn exits_of(&self, region_id: Uuid, room_id: Uuid) -> Vec<(String, Uuid, Uuid)>;
}

type Node = (Uuid, Uuid);

/// Best-first search from `source` to `target`, cost 1 per hop plus a +1
/// heuristic penalty when the next node's region differs from the target's
/// region (prefers intra-region paths). Returns the ordered list of
/// direction strings; `Some(vec![])` when source equals target; `None` when
/// no path exists.
pub fn find_path(graph: &impl RoomGraph, source: Node, target: Node) -> Option<Vec<String>> {
    if source == target {
        return Some(Vec::new());
    }

    let mut open = BinaryHeap::new();
    open.push(Reverse((0i64, source)));
    let mut g_score: HashMap<Node, i64> = HashMap::from([(source, 0)]);
    let mut path_to: HashMap<Node, Vec<String>> = HashMap::from([(source, Vec::new())]);
    let mut visited: std::collections::HashSet<Node> = std::collections::HashSet::new();

    while let Some(Reverse((_, current))) = open.pop() {
        if current == target {
            return path_to.remove(&target);
        }
        if !visited.insert(current) {
            continue;
        }

        for (direction, next_region, next_room) in graph.exits_of(current.0, current.1) {
            let next = (next_region, next_room);
            if !graph.room_exists(next_region, next_room) {
                continue;
            }
            let new_cost = g_score[&current] + 1;
            if new_cost < *g_score.get(&next).unwrap_or(&i64::MAX) {
                g_score.insert(next, new_cost);
                let penalty = if next_region == target.0 { 0 } else { 1 };
                open.push(Reverse((new_cost + penalty, next)));
                let mut extended = path_to[&current].clone();
                extended.push(direction);
                path_to.insert(next, extended);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A tiny fixed graph: A -north-> B -north-> C, and A -east-> D (dead end).
    struct FixedGraph {
        region: Uuid,
        a: Uuid,
        b: Uuid,
        c: Uuid,
        d: Uuid,
    }

    impl RoomGraph for FixedGraph {
        fn room_exists(&self, region_id: Uuid, room_id: Uuid) -> bool {
            region_id == self.region && [self.a, self.b, self.c, self.d].contains(&room_id)
        }

        fn exits_of(&self, _region_id: Uuid, room_id: Uuid) -> Vec<(String, Uuid, Uuid)> {
            if room_id == self.a {
                vec![("north".into(), self.region, self.b), ("east".into(), self.region, self.d)]
            } else if room_id == self.b {
                vec![("north".into(), self.region, self.c), ("south".into(), self.region, self.a)]
            } else {
                vec![]
            }
        }
    }

    fn graph() -> FixedGraph {
        FixedGraph { region: Uuid::new_v4(), a: Uuid::new_v4(), b: Uuid::new_v4(), c: Uuid::new_v4(), d: Uuid::new_v4() }
    }

    #[test]
    fn same_source_and_target_is_empty_path() {
        let g = graph();
        assert_eq!(find_path(&g, (g.region, g.a), (g.region, g.a)), Some(vec![]));
    }

    #[test]
    fn finds_shortest_route() {
        let g = graph();
        let path = find_path(&g, (g.region, g.a), (g.region, g.c)).unwrap();
        assert_eq!(path, vec!["north".to_string(), "north".to_string()]);
    }

    #[test]
    fn unreachable_destination_returns_none() {
        let g = graph();
        let stray = Uuid::new_v4();
        assert_eq!(find_path(&g, (g.region, g.a), (g.region, stray)), None);
    }
}
