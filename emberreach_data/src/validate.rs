use std::collections::HashSet;
use std::fmt;

use crate::*;

/// Validation error for malformed or missing references in a `WorldDef`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    DuplicateId { kind: &'static str, id: String },
    MissingReference { kind: &'static str, id: String, context: String },
    InvalidValue { context: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateId { kind, id } => {
                write!(f, "duplicate {kind} id '{id}'")
            },
            ValidationError::MissingReference { kind, id, context } => {
                write!(f, "missing {kind} '{id}' ({context})")
            },
            ValidationError::InvalidValue { context } => {
                write!(f, "invalid value ({context})")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate cross-references and basic invariants in a `WorldDef` before it
/// is handed to the world loader.
///
/// ```
/// use emberreach_data::{GameDef, PlayerStartDef, RegionDef, RoomDef, WorldDef, validate_world};
///
/// let world = WorldDef {
///     game: GameDef {
///         title: "Demo".into(),
///         player: PlayerStartDef {
///             name: "Hero".into(),
///             start_region: "town".into(),
///             start_room: "square".into(),
///             ..Default::default()
///         },
///         ..Default::default()
///     },
///     regions: vec![RegionDef {
///         id: "town".into(),
///         name: "Town".into(),
///         properties: Default::default(),
///         rooms: vec![RoomDef {
///             id: "square".into(),
///             name: "Square".into(),
///             description: "A square.".into(),
///             exits: Default::default(),
///             exit_requirements: Default::default(),
///             env_interactions: Default::default(),
///             properties: Default::default(),
///         }],
///     }],
///     ..Default::default()
/// };
///
/// assert!(validate_world(&world).is_empty());
/// ```
pub fn validate_world(world: &WorldDef) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut region_ids = HashSet::new();
    let mut room_ids: HashSet<(String, String)> = HashSet::new();
    let mut item_ids = HashSet::new();
    let mut npc_ids = HashSet::new();
    let mut spell_ids = HashSet::new();

    for region in &world.regions {
        if !region_ids.insert(region.id.clone()) {
            errors.push(ValidationError::DuplicateId { kind: "region", id: region.id.clone() });
        }
        for room in &region.rooms {
            if !room_ids.insert((region.id.clone(), room.id.clone())) {
                errors.push(ValidationError::DuplicateId {
                    kind: "room",
                    id: format!("{}:{}", region.id, room.id),
                });
            }
        }
    }

    for item in &world.items {
        if !item_ids.insert(item.id.clone()) {
            errors.push(ValidationError::DuplicateId { kind: "item", id: item.id.clone() });
        }
    }
    for npc in &world.npcs {
        if !npc_ids.insert(npc.id.clone()) {
            errors.push(ValidationError::DuplicateId { kind: "npc", id: npc.id.clone() });
        }
        if let Some(home_region) = &npc.home_region {
            if !region_ids.contains(home_region) {
                errors.push(ValidationError::MissingReference {
                    kind: "region",
                    id: home_region.clone(),
                    context: format!("npc '{}' home_region", npc.id),
                });
            }
        }
        for loot in &npc.loot_table {
            if !(0.0..=1.0).contains(&loot.chance) {
                errors.push(ValidationError::InvalidValue {
                    context: format!("npc '{}' loot entry '{}' chance out of [0,1]", npc.id, loot.item_id),
                });
            }
        }
    }
    for spell in &world.spells {
        if !spell_ids.insert(spell.id.clone()) {
            errors.push(ValidationError::DuplicateId { kind: "spell", id: spell.id.clone() });
        }
    }

    // exits must point somewhere resolvable, either intra-region ("room") or
    // cross-region ("region:room")
    for region in &world.regions {
        for room in &region.rooms {
            for dest in room.exits.values() {
                let (dest_region, dest_room) = match dest.split_once(':') {
                    Some((r, rm)) => (r.to_string(), rm.to_string()),
                    None => (region.id.clone(), dest.clone()),
                };
                if !room_ids.contains(&(dest_region.clone(), dest_room.clone())) {
                    errors.push(ValidationError::MissingReference {
                        kind: "room",
                        id: format!("{dest_region}:{dest_room}"),
                        context: format!("exit from {}:{}", region.id, room.id),
                    });
                }
            }
        }
    }

    if !region_ids.contains(&world.game.player.start_region) {
        errors.push(ValidationError::MissingReference {
            kind: "region",
            id: world.game.player.start_region.clone(),
            context: "player start_region".to_string(),
        });
    } else if !room_ids.contains(&(world.game.player.start_region.clone(), world.game.player.start_room.clone())) {
        errors.push(ValidationError::MissingReference {
            kind: "room",
            id: format!("{}:{}", world.game.player.start_region, world.game.player.start_room),
            context: "player start_room".to_string(),
        });
    }

    errors
}
