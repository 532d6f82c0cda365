//! The world aggregate and tick orchestration (§2, §5).
//!
//! `World` is the single owner of all shared mutable state; every other
//! module operates on borrowed pieces of it or through the `RoomGraph`/
//! `BehaviorEnvironment` traits so they stay independently testable.

use std::collections::HashMap;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::behavior::{self, BehaviorEnvironment, NpcDecision};
use crate::clock::{Clock, Weather};
use crate::combat;
use crate::config;
use crate::effect::tick_effect;
use crate::entity::{CombatantCore, Stats};
use crate::error::{GameError, GameResult};
use crate::event::GameEvent;
use crate::instance::InstanceLink;
use crate::magic::Spell;
use crate::npc::{BehaviorKind, Npc};
use crate::pathfinder::{self, RoomGraph};
use crate::player::Player;
use crate::quest::Quest;
use crate::region::Region;
use crate::rng::RollStream;
use crate::room::Room;
use crate::scheduler::Scheduler;
use crate::spawner::{self, RespawnEntry};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The full simulation state (§3 Data Model, §5 Resource Model).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub world_slug: String,
    pub world_version: String,
    pub regions: HashMap<Uuid, Region>,
    pub items: HashMap<Uuid, crate::item::Item>,
    pub npcs: HashMap<Uuid, Npc>,
    pub player: Player,
    pub clock: Clock,
    pub weather: Weather,
    pub rng: RollStream,
    pub scheduler: Scheduler,
    #[serde(default)]
    pub quest_board: Vec<Quest>,
    #[serde(default)]
    pub respawn_queue: Vec<RespawnEntry>,
    #[serde(default)]
    pub instance_links: Vec<InstanceLink>,
    #[serde(default)]
    pub spells: HashMap<Uuid, Spell>,
    #[serde(default)]
    pub max_quests_on_board: usize,
}

impl World {
    pub fn new(world_slug: impl Into<String>, player: Player, seed: u64) -> Self {
        Self {
            world_slug: world_slug.into(),
            world_version: ENGINE_VERSION.to_string(),
            regions: HashMap::new(),
            items: HashMap::new(),
            npcs: HashMap::new(),
            player,
            clock: Clock::new(1.0 / 60.0, 60, 24, 30, 12),
            weather: Weather::default(),
            rng: RollStream::new(seed),
            scheduler: Scheduler::default(),
            quest_board: Vec::new(),
            respawn_queue: Vec::new(),
            instance_links: Vec::new(),
            spells: HashMap::new(),
            max_quests_on_board: config::DEFAULT_MAX_QUESTS_ON_BOARD,
        }
    }

    pub fn now(&self) -> f64 {
        self.clock.game_time
    }

    pub(crate) fn parse_exit_dest(&self, region_id: Uuid, raw: &str) -> Option<(Uuid, Uuid)> {
        if let Some((region_str, room_str)) = raw.split_once(':') {
            let dest_region = Uuid::parse_str(region_str).ok()?;
            let dest_room = Uuid::parse_str(room_str).ok()?;
            Some((dest_region, dest_room))
        } else {
            let dest_room = Uuid::parse_str(raw).ok()?;
            Some((region_id, dest_room))
        }
    }

    pub fn room(&self, region_id: Uuid, room_id: Uuid) -> Option<&Room> {
        self.regions.get(&region_id)?.rooms.get(&room_id)
    }

    pub fn room_mut(&mut self, region_id: Uuid, room_id: Uuid) -> Option<&mut Room> {
        self.regions.get_mut(&region_id)?.rooms.get_mut(&room_id)
    }

    /// Living occupants (NPCs and/or the player) of a room.
    pub(crate) fn occupants_of(&self, region_id: Uuid, room_id: Uuid) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = self
            .npcs
            .values()
            .filter(|n| n.core.is_alive && n.core.region_id == region_id && n.core.room_id == room_id)
            .map(|n| n.core.instance_id)
            .collect();
        if self.player.core.region_id == region_id && self.player.core.room_id == room_id && self.player.core.is_alive {
            ids.push(self.player.core.instance_id);
        }
        ids
    }

    pub(crate) fn combatant(&self, id: Uuid) -> Option<&CombatantCore> {
        if id == self.player.core.instance_id {
            Some(&self.player.core)
        } else {
            self.npcs.get(&id).map(|n| &n.core)
        }
    }

    pub(crate) fn combatant_mut(&mut self, id: Uuid) -> Option<&mut CombatantCore> {
        if id == self.player.core.instance_id {
            Some(&mut self.player.core)
        } else {
            self.npcs.get_mut(&id).map(|n| &mut n.core)
        }
    }

    fn npc_relation_to_player(&self, npc: &Npc) -> i64 {
        self.player.relation_to_faction(&npc.core.faction, 0)
    }

    pub(crate) fn is_npc_hostile(&self, npc: &Npc, other: Uuid) -> bool {
        if other == self.player.core.instance_id {
            let relation = self.npc_relation_to_player(npc);
            return crate::faction::is_hostile(relation);
        }
        self.npcs.get(&other).is_some_and(|o| crate::faction::is_hostile_to(&npc.core.faction, &o.core.faction))
    }

    /// §4.5 physical attack, dispatched by a player or NPC action handler
    /// (`execute_attack` plus killed-target bookkeeping: xp, loot, events).
    pub fn resolve_attack(&mut self, attacker_id: Uuid, defender_id: Uuid) -> GameResult<(combat::AttackResult, Vec<GameEvent>)> {
        if attacker_id == defender_id {
            return Err(GameError::precondition("cannot attack yourself"));
        }
        let attacker_is_player = attacker_id == self.player.core.instance_id;
        let mut attacker = self.combatant(attacker_id).cloned().ok_or_else(|| GameError::missing_npc(attacker_id))?;
        let mut defender = self.combatant(defender_id).cloned().ok_or_else(|| GameError::missing_npc(defender_id))?;

        let result = combat::execute_attack(&mut attacker, &mut defender, attacker_is_player, &mut self.rng);

        if let Some(slot) = self.combatant_mut(attacker_id) {
            *slot = attacker;
        }
        if result.target_defeated {
            defender.die();
        }
        if let Some(slot) = self.combatant_mut(defender_id) {
            *slot = defender;
        }

        let mut events = Vec::new();
        if result.target_defeated && defender_id != self.player.core.instance_id {
            events.extend(self.on_npc_defeated(attacker_id, defender_id)?);
        }

        Ok((result, events))
    }

    fn on_npc_defeated(&mut self, killer_id: Uuid, npc_id: Uuid) -> GameResult<Vec<GameEvent>> {
        let npc_template_id = self.npcs.get(&npc_id).map(|n| n.template_id).unwrap_or(Uuid::nil());
        let events = vec![GameEvent::NpcKilled { player_id: self.player.core.instance_id, npc_id, npc_template_id }];

        let ready = crate::quest::on_npc_killed(&mut self.quest_board, npc_template_id);
        if !ready.is_empty() {
            info!("{} quest(s) reached ready-to-complete from an npc kill", ready.len());
        }

        if killer_id == self.player.core.instance_id {
            let loot = if let Some(npc) = self.npcs.get(&npc_id) {
                let xp = combat::calculate_xp_gain(self.player.core.level, npc.core.level, npc.core.max_health);
                self.player.xp += xp;
                npc.roll_loot(&mut self.rng)
            } else {
                Vec::new()
            };
            for (item_template_id, quantity) in loot {
                if !self.player.has_inventory_room() {
                    warn!("loot dropped from {npc_id} but the player's inventory is full");
                    break;
                }
                let dropped_item = self.spawn_loot_item(item_template_id, quantity);
                self.player.inventory.push(dropped_item);
            }
            self.queue_respawn_if_eligible(npc_id);
        }

        Ok(events)
    }

    /// Materialize a loot-table drop as a live item instance (§4.5).
    /// Name/value/weight are filled in by the content loader once a template
    /// registry is wired in; this keeps the ownership transfer correct
    /// (world owns every item instance, §3.7) independent of that.
    pub(crate) fn spawn_loot_item(&mut self, template_id: Uuid, quantity: u32) -> Uuid {
        let instance_id = Uuid::new_v4();
        let item = crate::item::Item {
            instance_id,
            template_id,
            name: String::new(),
            description: String::new(),
            subtype: emberreach_data::ItemSubtypeDef::Generic,
            weight: 0.0,
            value: 0,
            location: crate::item::ItemLocation::Inventory(self.player.core.instance_id),
            properties: crate::item::ItemProperties { quantity, ..Default::default() },
            contents: std::collections::HashSet::new(),
        };
        self.items.insert(instance_id, item);
        instance_id
    }

    fn queue_respawn_if_eligible(&mut self, npc_id: Uuid) {
        let Some(npc) = self.npcs.get(&npc_id) else { return };
        if !npc.respawnable {
            return;
        }
        let (Some(home_region), Some(home_room)) = (npc.home_region, npc.home_room) else { return };
        let entry = spawner::queue_respawn(npc.template_id, npc.core.instance_id, npc.core.name.clone(), home_region, home_room, self.now());
        self.respawn_queue.push(entry);
        if let Some(room) = self.room_mut(npc.core.region_id, npc.core.room_id) {
            room.remove_npc(npc_id);
        }
        self.npcs.remove(&npc_id);
    }

    /// One full simulation tick (§5 Tick atomicity): clock advance, respawn
    /// scan, spawner, per-NPC effect processing and behavior step, quest
    /// completion scan, instance cleanup.
    pub fn tick(&mut self, real_dt: f64) {
        let period_changed = self.clock.advance(real_dt);
        if period_changed.is_some() {
            let season = self.clock.season();
            crate::clock::resample_weather(&mut self.weather, season, &mut self.rng);
        }

        self.process_due_respawns();
        self.process_spawners();
        self.process_npc_effects(real_dt);
        self.process_npc_behaviors();
        self.scan_quest_completions();
        self.reap_completed_instances();
    }

    fn process_due_respawns(&mut self) {
        let now = self.now();
        let due = spawner::pop_due_respawns(&mut self.respawn_queue, now);
        for entry in due {
            let npc = Npc::new(Uuid::new_v4(), entry.template_id, entry.name, entry.home_region_id, entry.home_room_id, Stats::default(), 1, BehaviorKind::Wanderer);
            if let Some(room) = self.room_mut(entry.home_region_id, entry.home_room_id) {
                room.add_npc(npc.core.instance_id);
            }
            self.npcs.insert(npc.core.instance_id, npc);
        }
    }

    fn process_spawners(&mut self) {
        let now = self.now();
        let player_room_id = self.player.core.room_id;
        let region_ids: Vec<Uuid> = self.regions.keys().copied().collect();
        for region_id in region_ids {
            let Some(region) = self.regions.get(&region_id) else { continue };
            let Some(spawner_config) = region.properties.spawner_config.clone() else { continue };
            if !spawner::spawner_due(&spawner_config, now) {
                continue;
            }
            let population = self.npcs.values().filter(|n| n.core.region_id == region_id).count();
            if !spawner::under_population_cap(&spawner_config, population) {
                continue;
            }
            let exclude_room = if region_id == self.player.core.region_id { player_room_id } else { Uuid::nil() };
            let room_id = {
                let region = self.regions.get(&region_id).expect("region_id came from self.regions.keys()");
                let eligible = spawner::eligible_spawn_rooms(region, exclude_room);
                let idx = self.rng.pick_index(eligible.len());
                idx.map(|i| eligible[i].id)
            };
            if let (Some(room_id), Some(monster_template)) = (room_id, spawner_config.monster_types.first()) {
                info!("spawner in region {region_id} picked room {room_id} for monster template \"{monster_template}\"; instantiation needs a content registry this crate doesn't own");
            }
            if let Some(region) = self.regions.get_mut(&region_id) {
                if let Some(cfg) = region.properties.spawner_config.as_mut() {
                    cfg.last_spawn_attempt = now;
                }
            }
        }
    }

    fn process_npc_effects(&mut self, dt: f64) {
        let now = self.now();
        let npc_ids: Vec<Uuid> = self.npcs.keys().copied().collect();
        for npc_id in npc_ids {
            let Some(npc) = self.npcs.get_mut(&npc_id) else { continue };
            let mut dot_fire = None;
            let mut hot_fire = None;
            for effect in &mut npc.core.active_effects {
                let result = tick_effect(effect, now, dt);
                if let Some(fired) = result.dot_fired {
                    dot_fire = Some(fired);
                }
                if let Some(fired) = result.hot_fired {
                    hot_fire = Some(fired);
                }
            }
            npc.core.active_effects.retain(|e| !e.is_expired());
            if let Some((amount, damage_type, _source)) = dot_fire {
                npc.core.take_damage(amount, damage_type.as_deref().unwrap_or("physical"));
            }
            if let Some(amount) = hot_fire {
                npc.core.heal(amount);
            }
            if npc.core.health <= 0 && npc.core.is_alive {
                npc.core.die();
            }
        }
    }

    fn process_npc_behaviors(&mut self) {
        let npc_ids: Vec<Uuid> = self.npcs.values().filter(|n| n.core.is_alive).map(|n| n.core.instance_id).collect();
        for npc_id in npc_ids {
            let Some(npc) = self.npcs.get(&npc_id) else { continue };
            let mut rng = std::mem::take(&mut self.rng);
            let decision = behavior::decide(npc, self, &mut rng);
            self.rng = rng;
            self.apply_npc_decision(npc_id, decision);
        }
    }

    fn apply_npc_decision(&mut self, npc_id: Uuid, decision: NpcDecision) {
        match decision {
            NpcDecision::None => {}
            NpcDecision::Despawn => self.despawn_minion(npc_id),
            NpcDecision::EnterCombat { target } => {
                if let Some(npc) = self.npcs.get_mut(&npc_id) {
                    npc.core.in_combat = true;
                    npc.core.combat_targets.insert(target);
                }
            }
            NpcDecision::Attack { target } => {
                let now = self.now();
                if let Some(npc) = self.npcs.get_mut(&npc_id) {
                    npc.core.last_attack_time = now;
                }
                let _ = self.resolve_attack(npc_id, target);
            }
            NpcDecision::CastHeal { spell_id, target } => {
                if let Err(err) = self.cast_spell(npc_id, spell_id, Some(target)) {
                    warn!("npc {npc_id} failed to cast heal spell {spell_id}: {err}");
                }
            }
            NpcDecision::Move { direction } | NpcDecision::Flee { direction } => {
                self.move_npc(npc_id, &direction);
            }
            NpcDecision::BeginRetreat { path } => {
                if let Some(npc) = self.npcs.get_mut(&npc_id) {
                    npc.ai_state.current_path = path;
                    npc.ai_state.original_behavior = Some(npc.behavior_type);
                    npc.behavior_type = BehaviorKind::Retreating;
                }
            }
            NpcDecision::EndRetreat => {
                if let Some(npc) = self.npcs.get_mut(&npc_id) {
                    behavior::end_retreat(npc);
                }
            }
        }
    }

    fn move_npc(&mut self, npc_id: Uuid, direction: &str) {
        let Some(npc) = self.npcs.get(&npc_id) else { return };
        let (region_id, room_id) = (npc.core.region_id, npc.core.room_id);
        let Some(dest_raw) = self.room(region_id, room_id).and_then(|r| r.get_exit(direction)).map(str::to_string) else { return };
        let Some((dest_region, dest_room)) = self.parse_exit_dest(region_id, &dest_raw) else { return };

        if let Some(room) = self.room_mut(region_id, room_id) {
            room.remove_npc(npc_id);
        }
        if let Some(room) = self.room_mut(dest_region, dest_room) {
            room.add_npc(npc_id);
        }
        let now = self.now();
        if let Some(npc) = self.npcs.get_mut(&npc_id) {
            npc.core.region_id = dest_region;
            npc.core.room_id = dest_room;
            npc.last_moved = now;
        }
    }

    fn despawn_minion(&mut self, npc_id: Uuid) {
        if let Some(npc) = self.npcs.remove(&npc_id) {
            if let Some(room) = self.room_mut(npc.core.region_id, npc.core.room_id) {
                room.remove_npc(npc_id);
            }
            if let Some(owner) = npc.owner_id {
                if owner == self.player.core.instance_id {
                    self.player.unlink_summon(npc_id);
                }
            }
        }
    }

    fn scan_quest_completions(&mut self) {
        let quest_region_pairs: Vec<(usize, Uuid)> =
            self.quest_board.iter().enumerate().filter_map(|(idx, q)| q.instance_region_id.map(|r| (idx, r))).collect();
        for (idx, region_id) in quest_region_pairs {
            let alive_template_ids: Vec<Uuid> =
                self.npcs.values().filter(|n| n.core.region_id == region_id && n.core.is_alive).map(|n| n.template_id).collect();
            if let Some(quest) = self.quest_board.get_mut(idx) {
                crate::quest::check_region_clear(quest, &alive_template_ids);
            }
        }
    }

    fn reap_completed_instances(&mut self) {
        let completed: Vec<Uuid> = self
            .instance_links
            .iter()
            .filter(|link| self.quest_board.iter().any(|q| q.id == link.quest_instance_id && matches!(q.state, crate::quest::QuestState::Completed)))
            .map(|link| link.quest_instance_id)
            .collect();
        for quest_id in completed {
            self.cleanup_quest_region(quest_id);
        }
    }

    /// §4.12 Instantiation: create the fresh region, patch both linking
    /// exits, and record the linkage so cleanup can undo it.
    pub fn instantiate_quest_region(
        &mut self,
        quest_id: Uuid,
        generated: crate::instance::GeneratedLayout,
        external_region_id: Uuid,
        external_room_id: Uuid,
        exit_command: &str,
    ) -> GameResult<Uuid> {
        let instance_region_id = Uuid::new_v4();
        let entry_room_id = generated.rooms[generated.entry_index].id;

        let mut rooms = HashMap::new();
        for room in generated.rooms {
            rooms.insert(room.id, room);
        }
        let mut region = Region::new(instance_region_id, format!("instance_{instance_region_id}"), "A pocket of space carved out for this quest.");
        region.rooms = rooms;
        self.regions.insert(instance_region_id, region);

        let out_dest = format!("{external_region_id}:{external_room_id}");
        if let Some(room) = self.room_mut(instance_region_id, entry_room_id) {
            room.exits.insert("out".to_string(), out_dest);
        }

        if self.room(external_region_id, external_room_id).is_none() {
            self.regions.remove(&instance_region_id);
            return Err(GameError::missing_room(external_room_id));
        }
        let in_dest = format!("{instance_region_id}:{entry_room_id}");
        if let Some(room) = self.room_mut(external_region_id, external_room_id) {
            room.exits.insert(exit_command.to_string(), in_dest);
        }

        self.instance_links.push(InstanceLink {
            instance_region_id,
            quest_instance_id: quest_id,
            external_region_id,
            external_room_id,
            external_exit_command: exit_command.to_string(),
            entry_room_id,
        });
        if let Some(quest) = self.quest_board.iter_mut().find(|q| q.id == quest_id) {
            quest.instance_region_id = Some(instance_region_id);
        }
        Ok(instance_region_id)
    }

    /// §4.12 Cleanup: remove the instance region and restore the patched exit.
    pub fn cleanup_quest_region(&mut self, quest_id: Uuid) {
        let Some(pos) = self.instance_links.iter().position(|l| l.quest_instance_id == quest_id) else { return };
        let link = self.instance_links.remove(pos);

        self.npcs.retain(|_, npc| npc.core.region_id != link.instance_region_id);
        self.regions.remove(&link.instance_region_id);

        if let Some(room) = self.room_mut(link.external_region_id, link.external_room_id) {
            room.exits.remove(&link.external_exit_command);
        }
    }
}

impl RoomGraph for World {
    fn room_exists(&self, region_id: Uuid, room_id: Uuid) -> bool {
        self.room(region_id, room_id).is_some()
    }

    fn exits_of(&self, region_id: Uuid, room_id: Uuid) -> Vec<(String, Uuid, Uuid)> {
        let Some(room) = self.room(region_id, room_id) else { return Vec::new() };
        room.exits
            .iter()
            .filter_map(|(direction, dest)| self.parse_exit_dest(region_id, dest).map(|(dest_region, dest_room)| (direction.clone(), dest_region, dest_room)))
            .collect()
    }
}

impl BehaviorEnvironment for World {
    fn now(&self) -> f64 {
        self.clock.game_time
    }

    fn current_hour(&self) -> u32 {
        self.clock.hour()
    }

    fn occupants(&self, region_id: Uuid, room_id: Uuid) -> Vec<Uuid> {
        self.occupants_of(region_id, room_id)
    }

    fn is_player(&self, id: Uuid) -> bool {
        id == self.player.core.instance_id
    }

    fn health_fraction_of(&self, id: Uuid) -> Option<f64> {
        self.combatant(id).map(CombatantCore::health_fraction)
    }

    fn faction_of(&self, id: Uuid) -> Option<String> {
        self.combatant(id).map(|c| c.faction.clone())
    }

    fn is_hostile(&self, npc: &Npc, other: Uuid) -> bool {
        self.is_npc_hostile(npc, other)
    }

    fn room_of(&self, id: Uuid) -> Option<(Uuid, Uuid)> {
        self.combatant(id).map(|c| (c.region_id, c.room_id))
    }

    fn exits(&self, region_id: Uuid, room_id: Uuid) -> Vec<(String, Uuid, Uuid)> {
        pathfinder::RoomGraph::exits_of(self, region_id, room_id)
    }

    fn is_safe_zone(&self, region_id: Uuid) -> bool {
        self.regions.get(&region_id).is_some_and(|r| r.properties.safe_zone)
    }

    fn is_instance_region(&self, region_id: Uuid) -> bool {
        self.regions.get(&region_id).is_some_and(Region::is_dynamic)
    }

    fn find_path(&self, from: (Uuid, Uuid), to: (Uuid, Uuid)) -> Option<Vec<String>> {
        pathfinder::find_path(self, from, to)
    }

    fn nearest_safe_room(&self, from: (Uuid, Uuid)) -> Option<((Uuid, Uuid), Vec<String>)> {
        self.regions
            .iter()
            .filter(|(_, region)| region.properties.safe_zone)
            .flat_map(|(region_id, region)| region.rooms.keys().map(move |room_id| (*region_id, *room_id)))
            .filter_map(|dest| pathfinder::find_path(self, from, dest).map(|path| (dest, path)))
            .min_by_key(|(_, path)| path.len())
    }

    fn castable_heal_spell(&self, npc: &Npc) -> Option<Uuid> {
        let now = self.now();
        npc.usable_spells
            .iter()
            .find(|id| {
                self.spells.get(*id).is_some_and(|spell| {
                    spell.effects.iter().any(|e| matches!(e, crate::magic::SpellEffect::Heal { .. }))
                        && npc.core.mana >= spell.cost
                        && npc.core.spell_cooldowns.get(*id).is_none_or(|deadline| now >= *deadline)
                })
            })
            .copied()
    }

    fn combat_target_of(&self, owner_id: Uuid) -> Option<Uuid> {
        self.combatant(owner_id).and_then(|c| c.combat_targets.iter().next().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Stats;

    fn test_world() -> (World, Uuid, Uuid, Uuid, Uuid) {
        let region_a = Uuid::new_v4();
        let region_b = Uuid::new_v4();
        let room_a = Uuid::new_v4();
        let room_b = Uuid::new_v4();

        let mut ra = Region::new(region_a, "Town", "");
        let mut room_a_obj = Room::new(room_a, "Square", "");
        room_a_obj.exits.insert("east".to_string(), room_b.to_string());
        ra.rooms.insert(room_a, room_a_obj);

        let mut rb = Region::new(region_b, "Crossregion", "");
        rb.rooms.insert(room_b, Room::new(room_b, "Bridge", ""));

        let player = Player::new(Uuid::new_v4(), "Hero", "warrior", region_a, room_a, Stats::default());
        let mut world = World::new("test", player, 7);
        world.regions.insert(region_a, ra);
        world.regions.insert(region_b, rb);
        (world, region_a, room_a, region_b, room_b)
    }

    #[test]
    fn room_graph_resolves_same_region_exit() {
        let (world, region_a, room_a, _region_b, room_b) = test_world();
        let exits = pathfinder::RoomGraph::exits_of(&world, region_a, room_a);
        assert_eq!(exits, vec![("east".to_string(), region_a, room_b)]);
    }

    #[test]
    fn attacking_yourself_is_rejected() {
        let (mut world, ..) = test_world();
        let id = world.player.core.instance_id;
        assert!(world.resolve_attack(id, id).is_err());
    }

    #[test]
    fn tick_advances_the_clock() {
        let (mut world, ..) = test_world();
        let before = world.now();
        world.tick(120.0);
        assert!(world.now() > before);
    }
}
