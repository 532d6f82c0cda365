//! Item instances (§3 Data Model).
//!
//! An item is in exactly one of: a room's item list, an inventory slot, an
//! equipment slot, or the contents of a container (invariant §3.7). Location
//! is tracked on the item itself so transfers are a single field write plus
//! removal from the old collection -- the same pattern the teacher used for
//! its `Item.location`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use emberreach_data::ItemSubtypeDef as ItemSubtype;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ItemLocation {
    Room(Uuid),
    Inventory(Uuid),
    Equipment(Uuid),
    Container(Uuid),
    /// Dropped out of the world entirely (consumed, destroyed).
    Nowhere,
}

/// A live item instance built from a template (`emberreach_data::ItemTemplate`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub instance_id: Uuid,
    pub template_id: Uuid,
    pub name: String,
    pub description: String,
    pub subtype: ItemSubtype,
    pub weight: f64,
    pub value: i64,
    pub location: ItemLocation,
    pub properties: ItemProperties,
    /// Ids of items nested inside this one, if it's a container.
    #[serde(default)]
    pub contents: HashSet<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemProperties {
    pub durability: Option<u32>,
    pub charges: Option<u32>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub is_open: bool,
    #[serde(default)]
    pub stackable: bool,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub spell_to_learn: Option<Uuid>,
    #[serde(default)]
    pub cursed: bool,
    pub key_id: Option<Uuid>,
}

fn default_quantity() -> u32 {
    1
}

impl Item {
    pub fn is_container(&self) -> bool {
        self.subtype == ItemSubtype::Container
    }

    /// Toggle lock state; locking also forces the container closed (§4.6.1).
    pub fn set_locked(&mut self, locked: bool) {
        self.properties.locked = locked;
        if locked {
            self.properties.is_open = false;
        }
    }

    /// Reject nesting an ancestor container into one of its own descendants
    /// (§9: container contents follow a strict tree).
    pub fn would_cycle(&self, candidate_child: Uuid, all_items: &std::collections::HashMap<Uuid, Item>) -> bool {
        if candidate_child == self.instance_id {
            return true;
        }
        let mut stack: Vec<Uuid> = self.contents.iter().copied().collect();
        while let Some(id) = stack.pop() {
            if id == candidate_child {
                return true;
            }
            if let Some(item) = all_items.get(&id) {
                stack.extend(item.contents.iter().copied());
            }
        }
        false
    }

    /// Attempt to merge `quantity` additional units into this stack.
    /// Returns `false` if the item isn't stackable (caller should instead add
    /// a new slot/item, per §8 boundary behavior).
    pub fn try_stack(&mut self, quantity: u32) -> bool {
        if !self.properties.stackable {
            return false;
        }
        self.properties.quantity += quantity;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn item(id: Uuid, subtype: ItemSubtype) -> Item {
        Item {
            instance_id: id,
            template_id: Uuid::nil(),
            name: "thing".into(),
            description: String::new(),
            subtype,
            weight: 1.0,
            value: 0,
            location: ItemLocation::Nowhere,
            properties: ItemProperties::default(),
            contents: HashSet::new(),
        }
    }

    #[test]
    fn locking_a_container_forces_it_closed() {
        let mut chest = item(Uuid::new_v4(), ItemSubtype::Container);
        chest.properties.is_open = true;
        chest.set_locked(true);
        assert!(chest.properties.locked);
        assert!(!chest.properties.is_open);
    }

    #[test]
    fn nesting_a_container_into_its_own_descendant_is_rejected() {
        let outer_id = Uuid::new_v4();
        let inner_id = Uuid::new_v4();
        let mut outer = item(outer_id, ItemSubtype::Container);
        outer.contents.insert(inner_id);
        let inner = item(inner_id, ItemSubtype::Container);

        let mut all = HashMap::new();
        all.insert(inner_id, inner);
        all.insert(outer_id, outer.clone());

        assert!(outer.would_cycle(outer_id, &all));
        assert!(outer.would_cycle(inner_id, &all));
    }

    #[test]
    fn stacking_requires_stackable_flag() {
        let mut potion = item(Uuid::new_v4(), ItemSubtype::Consumable);
        assert!(!potion.try_stack(3));
        potion.properties.stackable = true;
        assert!(potion.try_stack(3));
        assert_eq!(potion.properties.quantity, 4);
    }
}
