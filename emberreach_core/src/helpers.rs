//! Helpers Module
//!
//! This module contains helper / simplifier functions that don't clearly
//! belong in another module. Prefer adding generally useful, low‑level
//! utilities here to avoid duplication across the codebase.

use std::collections::HashMap;

use uuid::Uuid;

use crate::item::Item;
use crate::npc::Npc;
use crate::room::Room;

/// Pluralization helper for simple English "s" suffix rules.
pub fn plural_s(count: isize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Pluralize a word with a simple "s" suffix based on count.
pub fn pluralize(word: &str, count: isize) -> String {
    format!("{}{}", word, plural_s(count))
}

/// Convenience: the room's display name, or a standard fallback string.
pub fn room_name_or_unknown(rooms: &HashMap<Uuid, Room>, room_id: Uuid) -> String {
    rooms.get(&room_id).map(|r| r.name.as_str()).unwrap_or("somewhere unknown").to_string()
}

/// Convenience: the item's display name, or a standard fallback string.
pub fn item_name_or_unknown(items: &HashMap<Uuid, Item>, item_id: Uuid) -> String {
    items.get(&item_id).map(|i| i.name.as_str()).unwrap_or("an unknown item").to_string()
}

/// Convenience: the NPC's display name, or a standard fallback string.
pub fn npc_name_or_unknown(npcs: &HashMap<Uuid, Npc>, npc_id: Uuid) -> String {
    npcs.get(&npc_id).map(|n| n.core.name.as_str()).unwrap_or("someone unknown").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plural_s_only_fires_off_one() {
        assert_eq!(plural_s(1), "");
        assert_eq!(plural_s(0), "s");
        assert_eq!(plural_s(2), "s");
    }

    #[test]
    fn pluralize_appends_the_suffix() {
        assert_eq!(pluralize("sword", 1), "sword");
        assert_eq!(pluralize("sword", 3), "swords");
    }

    #[test]
    fn missing_ids_fall_back_to_the_unknown_string() {
        let rooms: HashMap<Uuid, Room> = HashMap::new();
        assert_eq!(room_name_or_unknown(&rooms, Uuid::nil()), "somewhere unknown");
    }
}
