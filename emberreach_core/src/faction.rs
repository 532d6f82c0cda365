//! Reputation and faction relations (§4.13).

/// Pairwise default relation between two faction names. Unknown pairs and
/// a faction's relation to itself default to neutral (0).
fn base_relation(a: &str, b: &str) -> i64 {
    if a == b {
        return 100;
    }
    const MATRIX: &[(&str, &str, i64)] = &[
        ("town_guard", "bandits", -50),
        ("bandits", "town_guard", -50),
        ("town_guard", "wildlife", 0),
        ("merchants", "bandits", -30),
        ("bandits", "merchants", -30),
        ("player_minion", "town_guard", 100),
        ("player_minion", "bandits", -100),
    ];
    MATRIX.iter().find(|(x, y, _)| (*x == a && *y == b) || (*x == b && *y == a)).map(|(.., rel)| *rel).unwrap_or(0)
}

/// An NPC's relation toward the player: base faction relation plus the
/// player's reputation with that faction (§4.13).
pub fn relation_to_player(npc_faction: &str, player_faction: &str, player_reputation: i64) -> i64 {
    base_relation(npc_faction, player_faction) + player_reputation
}

pub fn is_hostile(relation: i64) -> bool {
    relation < 0
}

/// Relation between two arbitrary factions, used by `is_hostile_to` for
/// NPC-vs-NPC hostility checks (no reputation offset applies there).
pub fn is_hostile_to(faction_a: &str, faction_b: &str) -> bool {
    is_hostile(base_relation(faction_a, faction_b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_faction_is_never_hostile() {
        assert!(!is_hostile_to("bandits", "bandits"));
    }

    #[test]
    fn reputation_can_flip_an_otherwise_hostile_relation() {
        let relation = relation_to_player("bandits", "merchants", 60);
        assert!(!is_hostile(relation));
    }
}
