//! Player action resolvers (§4.7): movement, inventory transfers, container
//! interaction, gathering, spellcasting, and quest turn-in. Each operation
//! resolves its preconditions, mutates the entity store, and returns a
//! message -- the command vocabulary that turns player utterances into calls
//! here is an external collaborator (§1 Non-goals), not part of this module.

use log::info;
use uuid::Uuid;

use crate::config;
use crate::effect::{Effect, EffectKind};
use crate::error::{GameError, GameResult};
use crate::item::{Item, ItemLocation};
use crate::magic::{self, ResistanceFlavor, Spell, SpellEffect, SpellTarget};
use crate::quest::TurnInOutcome;
use crate::room::ExitRequirement;
use crate::skill;
use crate::world::World;

impl World {
    /// Resolve an exit, apply any lock/skill-check requirement, and move the
    /// player (§4.7 Movement). Entering an `instance_*` region is otherwise
    /// a normal transit; completion checks run on the next tick's quest scan.
    pub fn move_player(&mut self, direction: &str) -> GameResult<String> {
        let (region_id, room_id) = (self.player.core.region_id, self.player.core.room_id);
        let (requirement, dest_raw) = {
            let room = self.room(region_id, room_id).ok_or_else(|| GameError::missing_room(room_id))?;
            (room.exit_requirements.get(direction).cloned(), room.get_exit(direction).map(str::to_string))
        };
        let dest_raw = dest_raw.ok_or_else(|| GameError::precondition(format!("there is no way {direction}")))?;

        if let Some(requirement) = requirement {
            self.check_exit_requirement(&requirement)?;
        }

        let (dest_region, dest_room) = self.parse_exit_dest(region_id, &dest_raw).ok_or_else(|| GameError::precondition("that exit leads nowhere valid"))?;
        if self.room(dest_region, dest_room).is_none() {
            return Err(GameError::missing_room(dest_room));
        }

        if let Some(room) = self.room_mut(region_id, room_id) {
            room.npcs.retain(|id| *id != self.player.core.instance_id);
        }
        self.player.core.region_id = dest_region;
        self.player.core.room_id = dest_room;
        if let Some(room) = self.room_mut(dest_region, dest_room) {
            room.visited = true;
        }
        let name = self.room(dest_region, dest_room).map(|r| r.name.clone()).unwrap_or_default();
        Ok(format!("You go {direction} to {name}."))
    }

    fn check_exit_requirement(&mut self, requirement: &ExitRequirement) -> GameResult<()> {
        match requirement {
            ExitRequirement::Key { obj_id } => {
                let holds_key = self.player.inventory.iter().any(|id| *id == *obj_id);
                if holds_key {
                    Ok(())
                } else {
                    Err(GameError::precondition("that way is locked"))
                }
            },
            ExitRequirement::SkillCheck { skill: skill_name, difficulty } => {
                let Some(skill_record) = self.player.skills.get(skill_name).cloned() else {
                    return Err(GameError::precondition(format!("that requires {skill_name}")));
                };
                let stats = self.player.core.stats;
                let mut rng = std::mem::take(&mut self.rng);
                let (succeeded, _) = skill::attempt_check(&skill_record, &stats, skill_name, *difficulty, &mut rng);
                self.rng = rng;
                if succeeded { Ok(()) } else { Err(GameError::precondition("you aren't skilled enough to pass that way")) }
            },
        }
    }

    /// Room → inventory transfer (§4.7, §3 Ownership).
    pub fn get_item(&mut self, item_id: Uuid) -> GameResult<String> {
        if !self.player.has_inventory_room() {
            return Err(GameError::precondition("your inventory is full"));
        }
        let (region_id, room_id) = (self.player.core.region_id, self.player.core.room_id);
        let room = self.room_mut(region_id, room_id).ok_or_else(|| GameError::missing_room(room_id))?;
        room.remove_item(item_id).ok_or_else(|| GameError::precondition("that isn't here"))?;

        let name = self.items.get(&item_id).map(|i| i.name.clone()).unwrap_or_default();
        if let Some(item) = self.items.get_mut(&item_id) {
            item.location = ItemLocation::Inventory(self.player.core.instance_id);
        }
        self.player.inventory.push(item_id);
        Ok(format!("You pick up {name}."))
    }

    /// Inventory → room transfer (§4.7).
    pub fn drop_item(&mut self, item_id: Uuid) -> GameResult<String> {
        let pos = self.player.inventory.iter().position(|id| *id == item_id).ok_or_else(|| GameError::precondition("you aren't carrying that"))?;
        self.player.inventory.remove(pos);

        let (region_id, room_id) = (self.player.core.region_id, self.player.core.room_id);
        let name = self.items.get(&item_id).map(|i| i.name.clone()).unwrap_or_default();
        if let Some(item) = self.items.get_mut(&item_id) {
            item.location = ItemLocation::Room(room_id);
        }
        if let Some(room) = self.room_mut(region_id, room_id) {
            room.add_item(item_id);
        }
        Ok(format!("You drop {name}."))
    }

    /// Give an item to an NPC in the same room (§4.7 give/deliver).
    pub fn give_item(&mut self, item_id: Uuid, npc_id: Uuid) -> GameResult<String> {
        let npc = self.npcs.get(&npc_id).ok_or_else(|| GameError::missing_npc(npc_id))?;
        if npc.core.region_id != self.player.core.region_id || npc.core.room_id != self.player.core.room_id {
            return Err(GameError::precondition("they aren't here"));
        }
        let pos = self.player.inventory.iter().position(|id| *id == item_id).ok_or_else(|| GameError::precondition("you aren't carrying that"))?;
        self.player.inventory.remove(pos);
        let name = self.items.get(&item_id).map(|i| i.name.clone()).unwrap_or_default();
        if let Some(item) = self.items.get_mut(&item_id) {
            item.location = ItemLocation::Nowhere;
        }
        Ok(format!("You hand over {name}."))
    }

    /// Equip an inventory item into `slot`, swapping out whatever was there (§4.7).
    pub fn equip_item(&mut self, item_id: Uuid, slot: &str) -> GameResult<String> {
        let pos = self.player.inventory.iter().position(|id| *id == item_id).ok_or_else(|| GameError::precondition("you aren't carrying that"))?;
        self.player.inventory.remove(pos);
        if let Some(previous) = self.player.equipment.insert(slot.to_string(), item_id) {
            self.player.inventory.push(previous);
            if let Some(item) = self.items.get_mut(&previous) {
                item.location = ItemLocation::Inventory(self.player.core.instance_id);
            }
        }
        if let Some(item) = self.items.get_mut(&item_id) {
            item.location = ItemLocation::Equipment(self.player.core.instance_id);
        }
        let name = self.items.get(&item_id).map(|i| i.name.clone()).unwrap_or_default();
        Ok(format!("You equip {name}."))
    }

    /// Unequip whatever occupies `slot`, back into inventory (§4.7).
    pub fn unequip_item(&mut self, slot: &str) -> GameResult<String> {
        if !self.player.has_inventory_room() {
            return Err(GameError::precondition("your inventory is full"));
        }
        let item_id = self.player.equipment.remove(slot).ok_or_else(|| GameError::precondition("nothing is equipped there"))?;
        if let Some(item) = self.items.get_mut(&item_id) {
            item.location = ItemLocation::Inventory(self.player.core.instance_id);
        }
        self.player.inventory.push(item_id);
        let name = self.items.get(&item_id).map(|i| i.name.clone()).unwrap_or_default();
        Ok(format!("You unequip {name}."))
    }

    /// Toggle open/closed on a container, rejecting a locked one (§4.7).
    pub fn open_container(&mut self, item_id: Uuid) -> GameResult<String> {
        let item = self.items.get_mut(&item_id).ok_or_else(|| GameError::missing_item(item_id))?;
        if !item.is_container() {
            return Err(GameError::precondition("that isn't something you can open"));
        }
        if item.properties.locked {
            return Err(GameError::precondition("it's locked"));
        }
        item.properties.is_open = true;
        Ok(format!("You open {}.", item.name))
    }

    pub fn close_container(&mut self, item_id: Uuid) -> GameResult<String> {
        let item = self.items.get_mut(&item_id).ok_or_else(|| GameError::missing_item(item_id))?;
        if !item.is_container() {
            return Err(GameError::precondition("that isn't something you can close"));
        }
        item.properties.is_open = false;
        Ok(format!("You close {}.", item.name))
    }

    /// `use <key> on <container>` / `use <container>`: unlock a container
    /// (§4.7). With a declared `key_id` the held item must match it exactly;
    /// otherwise fall back to a fuzzy name match against the container's
    /// name, per the original's lenient "use a thing on the chest" phrasing.
    pub fn use_item_on_container(&mut self, key_item_id: Uuid, container_id: Uuid) -> GameResult<String> {
        let key_item = self.items.get(&key_item_id).ok_or_else(|| GameError::missing_item(key_item_id))?;
        let key_name = key_item.name.clone();
        let key_declared_id = key_item.properties.key_id;

        let container = self.items.get(&container_id).ok_or_else(|| GameError::missing_item(container_id))?;
        if !container.is_container() {
            return Err(GameError::precondition("that isn't a container"));
        }
        if !container.properties.locked {
            return Err(GameError::precondition("it isn't locked"));
        }

        let matches = match container.properties.key_id {
            Some(expected) => key_declared_id == Some(expected),
            None => container.name.to_lowercase().contains(&key_name.to_lowercase()),
        };
        if !matches {
            return Err(GameError::precondition("that doesn't fit"));
        }

        let container = self.items.get_mut(&container_id).expect("checked above");
        container.set_locked(false);
        Ok(format!("You unlock {}.", container.name))
    }

    /// Harvest a resource node via a skill check; success consumes one unit
    /// and drops the yield into inventory (§4.7 gather, §4.11).
    pub fn gather(&mut self, node_item_id: Uuid, skill_name: &str, difficulty: u32, yield_template_id: Uuid) -> GameResult<String> {
        if !self.player.has_inventory_room() {
            return Err(GameError::precondition("your inventory is full"));
        }
        {
            let node = self.items.get(&node_item_id).ok_or_else(|| GameError::missing_item(node_item_id))?;
            if node.subtype != crate::item::ItemSubtype::ResourceNode {
                return Err(GameError::precondition("there's nothing to gather there"));
            }
        }
        let mut skill_record = self.player.skills.entry(skill_name.to_string()).or_default().clone();
        let stats = self.player.core.stats;
        let mut rng = std::mem::take(&mut self.rng);
        let (succeeded, _) = skill::attempt_check(&skill_record, &stats, skill_name, difficulty, &mut rng);
        self.rng = rng;
        if !succeeded {
            self.player.skills.insert(skill_name.to_string(), skill_record);
            return Ok("You fail to gather anything.".to_string());
        }
        skill::grant_xp(&mut skill_record, config::CRAFT_SUCCESS_MIN_XP as f64);
        self.player.skills.insert(skill_name.to_string(), skill_record);
        let gained = self.spawn_loot_item(yield_template_id, 1);
        self.player.inventory.push(gained);
        Ok("You gather something useful.".to_string())
    }

    /// §4.6 cast dispatch: resolve preconditions, commit the cast, then apply
    /// every effect in the spell's effect list against the resolved target(s).
    pub fn cast_spell(&mut self, caster_id: Uuid, spell_id: Uuid, target_id: Option<Uuid>) -> GameResult<String> {
        let spell = self.spells.get(&spell_id).cloned().ok_or_else(|| GameError::precondition("you don't know a spell like that"))?;
        let now = self.now();

        let knows_spell = if caster_id == self.player.core.instance_id {
            self.player.known_spells.contains(&spell_id)
        } else {
            self.npcs.get(&caster_id).is_some_and(|n| n.usable_spells.contains(&spell_id))
        };
        {
            let caster = self.combatant(caster_id).ok_or_else(|| GameError::missing_npc(caster_id))?;
            magic::can_cast(caster, knows_spell, &spell, now)?;
        }

        let targets = self.resolve_spell_targets(caster_id, &spell, target_id)?;

        if let Some(caster) = self.combatant_mut(caster_id) {
            magic::commit_cast(caster, &spell, now);
        }

        let mut messages = Vec::new();
        for target_id in targets {
            messages.push(self.apply_spell_effects(caster_id, target_id, &spell));
        }
        Ok(messages.join(" "))
    }

    fn resolve_spell_targets(&self, caster_id: Uuid, spell: &Spell, target_id: Option<Uuid>) -> GameResult<Vec<Uuid>> {
        match spell.target_type {
            SpellTarget::SelfTarget => Ok(vec![caster_id]),
            SpellTarget::Friendly | SpellTarget::Enemy => {
                let target = target_id.ok_or_else(|| GameError::precondition("cast that on whom?"))?;
                self.combatant(target).ok_or_else(|| GameError::missing_npc(target))?;
                Ok(vec![target])
            },
            SpellTarget::AllEnemies => {
                let (region_id, room_id) = self.combatant(caster_id).map(|c| (c.region_id, c.room_id)).ok_or_else(|| GameError::missing_npc(caster_id))?;
                let occupants = self.occupants_of(region_id, room_id);
                let enemies: Vec<Uuid> = occupants
                    .into_iter()
                    .filter(|&id| id != caster_id)
                    .filter(|&id| self.npcs.get(&id).is_some_and(|n| self.is_npc_hostile(n, caster_id)) || id == self.player.core.instance_id)
                    .collect();
                Ok(enemies)
            },
            SpellTarget::Item => {
                let target = target_id.ok_or_else(|| GameError::precondition("cast that on what?"))?;
                self.items.get(&target).ok_or_else(|| GameError::missing_item(target))?;
                Ok(vec![target])
            },
        }
    }

    fn apply_spell_effects(&mut self, caster_id: Uuid, target_id: Uuid, spell: &Spell) -> String {
        let mut rng = std::mem::take(&mut self.rng);
        let mut parts = Vec::new();
        for spell_effect in &spell.effects {
            let part = self.apply_one_spell_effect(caster_id, target_id, spell_effect, &mut rng);
            if let Some(part) = part {
                parts.push(part);
            }
        }
        self.rng = rng;
        if parts.is_empty() { format!("{} has no effect.", spell.name) } else { parts.join(" ") }
    }

    fn apply_one_spell_effect(&mut self, caster_id: Uuid, target_id: Uuid, spell_effect: &SpellEffect, rng: &mut crate::rng::RollStream) -> Option<String> {
        match spell_effect {
            SpellEffect::Damage { damage_type, base } => {
                let target_level = self.combatant(target_id)?.level;
                let value = {
                    let caster = self.combatant(caster_id)?;
                    magic::effective_value(*base, caster, target_level, true, rng)
                };
                let flavor = self.combatant(target_id).map(|t| magic::resistance_flavor(t, damage_type));
                let dealt = magic::apply_damage(self.combatant_mut(target_id)?, value, damage_type);
                let flavor_note = match flavor.flatten() {
                    Some(ResistanceFlavor::Weakness) => " (it's vulnerable)",
                    Some(ResistanceFlavor::StrongResistance) => " (heavily resisted)",
                    Some(ResistanceFlavor::Resistance) => " (resisted)",
                    None => "",
                };
                Some(format!("It deals {dealt} {damage_type} damage{flavor_note}."))
            },
            SpellEffect::LifeTap { damage_type, base } => {
                let target_level = self.combatant(target_id)?.level;
                let value = {
                    let caster = self.combatant(caster_id)?;
                    magic::effective_value(*base, caster, target_level, true, rng)
                };
                if caster_id == target_id {
                    return Some("You cannot tap your own life force.".to_string());
                }
                let mut target_core = self.combatant(target_id)?.clone();
                let mut caster_core = self.combatant(caster_id)?.clone();
                let (dealt, healed) = magic::apply_life_tap(&mut caster_core, &mut target_core, value, damage_type);
                *self.combatant_mut(target_id)? = target_core;
                *self.combatant_mut(caster_id)? = caster_core;
                Some(format!("It drains {dealt} {damage_type} damage, healing you for {healed}."))
            },
            SpellEffect::Heal { base } => {
                let target_level = self.combatant(target_id)?.level;
                let value = {
                    let caster = self.combatant(caster_id)?;
                    magic::effective_value(*base, caster, target_level, false, rng)
                };
                let healed = magic::apply_heal(self.combatant_mut(target_id)?, value);
                Some(format!("It restores {healed} health."))
            },
            SpellEffect::Cleanse { tags } => {
                let removed = magic::apply_cleanse(self.combatant_mut(target_id)?, tags);
                Some(format!("{removed} affliction(s) lifted."))
            },
            SpellEffect::ApplyDot { name, damage_type, damage_per_tick, tick_interval_secs, duration_secs } => {
                magic::apply_dot(self.combatant_mut(target_id)?, name, damage_type, *damage_per_tick, *tick_interval_secs, *duration_secs, caster_id);
                Some(format!("{name} takes hold."))
            },
            SpellEffect::ApplyEffect { name, tags, duration_secs, modifier_stat, modifier_amount } => {
                let mut effect = Effect::new(name, EffectKind::StatMod, *duration_secs);
                effect.tags = tags.iter().cloned().collect();
                effect.source_id = Some(caster_id);
                if let (Some(stat), Some(amount)) = (modifier_stat, modifier_amount) {
                    effect.modifiers.push((stat.clone(), *amount));
                }
                magic::apply_effect_record(self.combatant_mut(target_id)?, effect, None);
                Some(format!("{name} settles over the target."))
            },
            SpellEffect::Lock => {
                let item = self.items.get_mut(&target_id)?;
                item.set_locked(true);
                Some(format!("{} locks shut.", item.name))
            },
            SpellEffect::Unlock => {
                let item = self.items.get_mut(&target_id)?;
                item.set_locked(false);
                Some(format!("{} clicks open.", item.name))
            },
            SpellEffect::RemoveCurse => {
                let item = self.items.get_mut(&target_id)?;
                if item.properties.cursed {
                    item.properties.cursed = false;
                    Some(format!("The curse lifts from {}.", item.name))
                } else {
                    Some("Nothing happens.".to_string())
                }
            },
            SpellEffect::Summon => {
                info!("summon effect requires a content registry to resolve the summoned template; skipped");
                None
            },
        }
    }

    /// `talk <giver> complete` (§4.10 Turn-in): attempt the active objective
    /// against the player's inventory, apply rewards on completion, and
    /// replenish the board.
    pub fn attempt_quest_turn_in(&mut self, quest_id: Uuid, choice_id: Option<&str>) -> GameResult<String> {
        let pos = self.quest_board.iter().position(|q| q.id == quest_id).ok_or_else(|| GameError::precondition("you have no such quest"))?;

        let mut inventory_pairs: Vec<(Uuid, Uuid)> =
            self.player.inventory.iter().filter_map(|id| self.items.get(id).map(|item| (item.template_id, *id))).collect();

        let rng_cell = std::cell::RefCell::new(std::mem::take(&mut self.rng));
        let stats = self.player.core.stats;
        let skills = self.player.skills.clone();
        let skill_check = |skill_name: &str, difficulty: u32| {
            let skill_record = skills.get(skill_name).cloned().unwrap_or_default();
            let mut rng = rng_cell.borrow_mut();
            skill::attempt_check(&skill_record, &stats, skill_name, difficulty, &mut rng).0
        };

        let outcome = {
            let quest = &mut self.quest_board[pos];
            crate::quest::attempt_turn_in(quest, &mut inventory_pairs, skill_check, choice_id)
        };
        self.rng = rng_cell.into_inner();

        match outcome {
            TurnInOutcome::NotReady => Err(GameError::precondition("that isn't ready to turn in yet")),
            TurnInOutcome::Advanced => {
                self.sync_inventory_from_pairs(inventory_pairs);
                Ok("You make progress.".to_string())
            },
            TurnInOutcome::Completed => {
                self.sync_inventory_from_pairs(inventory_pairs);
                let rewards = self.quest_board[pos].rewards.clone();
                self.player.xp += rewards.xp;
                self.player.gold += rewards.gold;
                for item_template_id in &rewards.item_template_ids {
                    if !self.player.has_inventory_room() {
                        break;
                    }
                    let new_item = self.spawn_loot_item(*item_template_id, 1);
                    self.player.inventory.push(new_item);
                }
                self.player.quest_log.retain(|id| *id != quest_id);
                self.player.completed_quest_log.push(quest_id);
                self.quest_board.remove(pos);
                Ok(format!("Quest complete! +{} xp, +{} gold.", rewards.xp, rewards.gold))
            },
        }
    }

    fn sync_inventory_from_pairs(&mut self, pairs: Vec<(Uuid, Uuid)>) {
        let kept: std::collections::HashSet<Uuid> = pairs.into_iter().map(|(_, instance_id)| instance_id).collect();
        let consumed: Vec<Uuid> = self.player.inventory.iter().filter(|id| !kept.contains(id)).copied().collect();
        self.player.inventory.retain(|id| kept.contains(id));
        for item_id in consumed {
            if let Some(item) = self.items.get_mut(&item_id) {
                item.location = ItemLocation::Nowhere;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Stats;
    use crate::item::{ItemProperties, ItemSubtype};
    use crate::player::Player;
    use crate::region::Region;
    use crate::room::Room;
    use std::collections::HashSet;

    fn test_world() -> (World, Uuid, Uuid) {
        let region_id = Uuid::new_v4();
        let room_id = Uuid::new_v4();
        let mut region = Region::new(region_id, "Town", "");
        region.rooms.insert(room_id, Room::new(room_id, "Square", ""));

        let player = Player::new(Uuid::new_v4(), "Hero", "warrior", region_id, room_id, Stats::default());
        let mut world = World::new("test", player, 3);
        world.regions.insert(region_id, region);
        (world, region_id, room_id)
    }

    fn place_item(world: &mut World, room_id: Uuid, region_id: Uuid) -> Uuid {
        let item_id = Uuid::new_v4();
        world.items.insert(
            item_id,
            Item {
                instance_id: item_id,
                template_id: Uuid::new_v4(),
                name: "rusty key".into(),
                description: String::new(),
                subtype: ItemSubtype::Key,
                weight: 0.1,
                value: 1,
                location: ItemLocation::Room(room_id),
                properties: ItemProperties::default(),
                contents: HashSet::new(),
            },
        );
        if let Some(room) = world.room_mut(region_id, room_id) {
            room.add_item(item_id);
        }
        item_id
    }

    #[test]
    fn get_item_moves_it_from_room_to_inventory() {
        let (mut world, region_id, room_id) = test_world();
        let item_id = place_item(&mut world, room_id, region_id);
        world.get_item(item_id).unwrap();
        assert_eq!(world.player.inventory, vec![item_id]);
        assert!(world.room(region_id, room_id).unwrap().items.is_empty());
    }

    #[test]
    fn drop_item_requires_carrying_it_first() {
        let (mut world, _region_id, _room_id) = test_world();
        assert!(world.drop_item(Uuid::new_v4()).is_err());
    }

    #[test]
    fn locked_exit_without_the_key_is_rejected() {
        let (mut world, region_id, room_id) = test_world();
        let other_room_id = Uuid::new_v4();
        let key_id = Uuid::new_v4();
        if let Some(region) = world.regions.get_mut(&region_id) {
            region.rooms.insert(other_room_id, Room::new(other_room_id, "Vault", ""));
        }
        if let Some(room) = world.room_mut(region_id, room_id) {
            room.exits.insert("north".to_string(), other_room_id.to_string());
            room.exit_requirements.insert("north".to_string(), ExitRequirement::Key { obj_id: key_id });
        }
        assert!(world.move_player("north").is_err());
        world.player.inventory.push(key_id);
        assert!(world.move_player("north").is_ok());
    }

    #[test]
    fn equip_then_unequip_round_trips_through_inventory() {
        let (mut world, region_id, room_id) = test_world();
        let item_id = place_item(&mut world, room_id, region_id);
        world.get_item(item_id).unwrap();
        world.equip_item(item_id, "mainhand").unwrap();
        assert!(world.player.inventory.is_empty());
        world.unequip_item("mainhand").unwrap();
        assert_eq!(world.player.inventory, vec![item_id]);
    }
}
