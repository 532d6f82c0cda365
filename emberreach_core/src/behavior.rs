//! NPC behavior dispatcher (§4.8), ported from the original engine's fixed
//! priority chain in `dispatcher.py`: nine steps, first that fires wins.
//!
//! Like [`crate::pathfinder`], this module is decoupled from the live world
//! by a read-only trait; [`crate::world::World`] implements it and is the
//! only caller that actually applies the returned [`NpcDecision`].

use uuid::Uuid;

use crate::config;
use crate::npc::{AiState, BehaviorKind, Npc};
use crate::rng::RollStream;

/// Facts about the rest of the world a behavior step needs to make a
/// decision, without this module depending on how the caller stores rooms,
/// NPCs, or the player.
pub trait BehaviorEnvironment {
    fn now(&self) -> f64;
    fn current_hour(&self) -> u32;

    /// Instance ids of every living occupant (NPC or player) of a room.
    fn occupants(&self, region_id: Uuid, room_id: Uuid) -> Vec<Uuid>;
    fn is_player(&self, id: Uuid) -> bool;
    /// `None` if `id` no longer exists (already despawned/dead).
    fn health_fraction_of(&self, id: Uuid) -> Option<f64>;
    fn faction_of(&self, id: Uuid) -> Option<String>;
    fn is_hostile(&self, npc: &Npc, other: Uuid) -> bool;
    fn room_of(&self, id: Uuid) -> Option<(Uuid, Uuid)>;

    fn exits(&self, region_id: Uuid, room_id: Uuid) -> Vec<(String, Uuid, Uuid)>;
    fn is_safe_zone(&self, region_id: Uuid) -> bool;
    fn is_instance_region(&self, region_id: Uuid) -> bool;

    fn find_path(&self, from: (Uuid, Uuid), to: (Uuid, Uuid)) -> Option<Vec<String>>;
    /// Nearest safe room reachable from `from`, with the path to it.
    fn nearest_safe_room(&self, from: (Uuid, Uuid)) -> Option<((Uuid, Uuid), Vec<String>)>;

    /// A spell this NPC could cast right now that heals (has a castable heal
    /// spell in `usable_spells`, off cooldown, affordable).
    fn castable_heal_spell(&self, npc: &Npc) -> Option<Uuid>;

    fn combat_target_of(&self, owner_id: Uuid) -> Option<Uuid>;
}

/// What a behavior step resolved to do; `World` executes it against live state.
#[derive(Debug, Clone, PartialEq)]
pub enum NpcDecision {
    None,
    Despawn,
    CastHeal { spell_id: Uuid, target: Uuid },
    EnterCombat { target: Uuid },
    Attack { target: Uuid },
    Flee { direction: String },
    Move { direction: String },
    BeginRetreat { path: Vec<String> },
    EndRetreat,
}

/// Evaluate the nine-step priority chain for one NPC at this tick (§4.8).
pub fn decide(npc: &Npc, env: &impl BehaviorEnvironment, rng: &mut RollStream) -> NpcDecision {
    if npc.core.is_stunned() {
        return NpcDecision::None;
    }
    if npc.is_trading {
        return NpcDecision::None;
    }
    if npc.owner_id.is_some() && npc.summon_expired(env.now()) {
        return NpcDecision::Despawn;
    }
    if npc.behavior_type == BehaviorKind::Healer {
        if let Some(decision) = heal_logic(npc, env) {
            return decision;
        }
    }
    if npc.behavior_type == BehaviorKind::Retreating {
        return retreat_logic(npc, env);
    }
    if npc.core.in_combat {
        return combat_logic(npc, env, rng);
    }
    if let Some(decision) = scan_for_targets(npc, env, rng) {
        return decision;
    }
    if env.now() - npc.last_moved < npc.move_cooldown {
        return NpcDecision::None;
    }
    idle_movement(npc, env, rng)
}

/// Step 4: find a castable heal spell and the most-wounded friendly target
/// in the room (self included), healing only below the healer threshold.
fn heal_logic(npc: &Npc, env: &impl BehaviorEnvironment) -> Option<NpcDecision> {
    let spell_id = env.castable_heal_spell(npc)?;
    let (region_id, room_id) = (npc.core.region_id, npc.core.room_id);
    let mut candidates: Vec<(Uuid, f64)> = env
        .occupants(region_id, room_id)
        .into_iter()
        .filter(|&id| id == npc.core.instance_id || !env.is_hostile(npc, id))
        .filter_map(|id| env.health_fraction_of(id).map(|frac| (id, frac)))
        .filter(|(_, frac)| *frac < config::NPC_HEALER_HEAL_THRESHOLD)
        .collect();
    candidates.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
    let (target, _) = candidates.into_iter().next()?;
    Some(NpcDecision::CastHeal { spell_id, target })
}

/// Step 5: follow the stored retreat path; restore the original behavior
/// once mana is full or the destination has been reached.
fn retreat_logic(npc: &Npc, _env: &impl BehaviorEnvironment) -> NpcDecision {
    if npc.core.mana >= npc.core.max_mana || npc.ai_state.current_path.is_empty() {
        return NpcDecision::EndRetreat;
    }
    NpcDecision::Move { direction: npc.ai_state.current_path[0].clone() }
}

/// Step 6: in combat, flee below the flee threshold, otherwise attack.
fn combat_logic(npc: &Npc, env: &impl BehaviorEnvironment, rng: &mut RollStream) -> NpcDecision {
    if (npc.core.health as f64) < npc.core.max_health as f64 * npc.flee_threshold {
        let (region_id, room_id) = (npc.core.region_id, npc.core.room_id);
        let candidates: Vec<(String, Uuid, Uuid)> = env.exits(region_id, room_id);
        let preferred: Vec<&(String, Uuid, Uuid)> = candidates.iter().filter(|(_, dest_region, _)| !env.is_safe_zone(*dest_region)).collect();
        let pool: Vec<&(String, Uuid, Uuid)> = if preferred.is_empty() { candidates.iter().collect() } else { preferred };
        return match rng.pick_index(pool.len()) {
            Some(idx) => NpcDecision::Flee { direction: pool[idx].0.clone() },
            None => NpcDecision::None,
        };
    }

    let target = npc.core.combat_targets.iter().copied().find(|&id| env.health_fraction_of(id).map(|f| f > 0.0).unwrap_or(false));
    match target {
        Some(target) => NpcDecision::Attack { target },
        None => NpcDecision::None,
    }
}

/// Step 7: not in combat, roll to engage a target in the room.
fn scan_for_targets(npc: &Npc, env: &impl BehaviorEnvironment, rng: &mut RollStream) -> Option<NpcDecision> {
    let (region_id, room_id) = (npc.core.region_id, npc.core.room_id);
    let occupants = env.occupants(region_id, room_id);
    let hostiles: Vec<Uuid> = occupants.into_iter().filter(|&id| id != npc.core.instance_id && env.is_hostile(npc, id)).collect();
    if hostiles.is_empty() {
        return None;
    }
    if npc.aggression <= 0.0 {
        return None;
    }
    if !rng.chance(npc.aggression) {
        return None;
    }
    let idx = rng.pick_index(hostiles.len())?;
    Some(NpcDecision::EnterCombat { target: hostiles[idx] })
}

/// Step 9: idle movement dispatched by behavior type.
fn idle_movement(npc: &Npc, env: &impl BehaviorEnvironment, rng: &mut RollStream) -> NpcDecision {
    match npc.behavior_type {
        BehaviorKind::Wanderer | BehaviorKind::Aggressive => wander(npc, env, rng),
        BehaviorKind::Patrol => patrol_step(npc, env),
        BehaviorKind::Follower => follow_step(npc, env),
        BehaviorKind::Scheduled => scheduled_step(npc, env),
        BehaviorKind::Minion => minion_step(npc, env),
        BehaviorKind::Healer | BehaviorKind::Retreating => NpcDecision::None,
    }
}

fn wander(npc: &Npc, env: &impl BehaviorEnvironment, rng: &mut RollStream) -> NpcDecision {
    if !rng.chance(config::NPC_DEFAULT_WANDER_CHANCE) {
        return NpcDecision::None;
    }
    let (region_id, room_id) = (npc.core.region_id, npc.core.room_id);
    let hostile = npc.behavior_type == BehaviorKind::Aggressive;
    let valid: Vec<(String, Uuid, Uuid)> = env
        .exits(region_id, room_id)
        .into_iter()
        .filter(|(_, dest_region, _)| {
            let leaves_instance = env.is_instance_region(region_id) && *dest_region != region_id;
            let enters_instance = !env.is_instance_region(region_id) && env.is_instance_region(*dest_region);
            !leaves_instance && !enters_instance
        })
        .collect();
    let preferred: Vec<&(String, Uuid, Uuid)> = if hostile { valid.iter().filter(|(_, dest_region, _)| !env.is_safe_zone(*dest_region)).collect() } else { valid.iter().collect() };
    let pool: Vec<&(String, Uuid, Uuid)> = if preferred.is_empty() { valid.iter().collect() } else { preferred };
    match rng.pick_index(pool.len()) {
        Some(idx) => NpcDecision::Move { direction: pool[idx].0.clone() },
        None => NpcDecision::None,
    }
}

fn patrol_step(npc: &Npc, env: &impl BehaviorEnvironment) -> NpcDecision {
    let Some(&destination) = npc.patrol_points.get(npc.ai_state.patrol_index % npc.patrol_points.len().max(1)) else {
        return NpcDecision::None;
    };
    let here = (npc.core.region_id, npc.core.room_id);
    if here.1 == destination {
        return NpcDecision::None;
    }
    match env.find_path(here, (npc.core.region_id, destination)) {
        Some(path) if !path.is_empty() => NpcDecision::Move { direction: path[0].clone() },
        _ => NpcDecision::None,
    }
}

fn follow_step(npc: &Npc, env: &impl BehaviorEnvironment) -> NpcDecision {
    let Some(target) = npc.follow_target else { return NpcDecision::None };
    let Some(target_room) = env.room_of(target) else { return NpcDecision::None };
    let here = (npc.core.region_id, npc.core.room_id);
    if here == target_room {
        return NpcDecision::None;
    }
    match env.find_path(here, target_room) {
        Some(path) if !path.is_empty() => NpcDecision::Move { direction: path[0].clone() },
        _ => NpcDecision::None,
    }
}

fn scheduled_step(npc: &Npc, env: &impl BehaviorEnvironment) -> NpcDecision {
    let hour = env.current_hour();
    let Some(entry) = npc.schedule.iter().filter(|e| e.hour <= hour).max_by_key(|e| e.hour).or_else(|| npc.schedule.iter().max_by_key(|e| e.hour)) else {
        return NpcDecision::None;
    };
    let here = (npc.core.region_id, npc.core.room_id);
    if here.1 == entry.room_id {
        return NpcDecision::None;
    }
    match env.find_path(here, (npc.core.region_id, entry.room_id)) {
        Some(path) if !path.is_empty() => NpcDecision::Move { direction: path[0].clone() },
        _ => NpcDecision::None,
    }
}

fn minion_step(npc: &Npc, env: &impl BehaviorEnvironment) -> NpcDecision {
    let Some(owner) = npc.owner_id else { return NpcDecision::None };
    let Some(owner_room) = env.room_of(owner) else { return NpcDecision::None };
    let here = (npc.core.region_id, npc.core.room_id);
    if here != owner_room {
        return match env.find_path(here, owner_room) {
            Some(path) if !path.is_empty() => NpcDecision::Move { direction: path[0].clone() },
            _ => NpcDecision::None,
        };
    }

    if let Some(owner_target) = env.combat_target_of(owner) {
        return NpcDecision::EnterCombat { target: owner_target };
    }

    let occupants = env.occupants(here.0, here.1);
    let hostile = occupants.into_iter().find(|&id| id != npc.core.instance_id && env.is_hostile(npc, id));
    match hostile {
        Some(target) => NpcDecision::EnterCombat { target },
        None => NpcDecision::None,
    }
}

/// Enter the retreat state from combat: select the nearest safe room, store
/// the path, stash the prior behavior (the spec's standalone "retreat" rule
/// under §4.8).
pub fn begin_retreat(npc: &mut Npc, env: &impl BehaviorEnvironment) {
    let here = (npc.core.region_id, npc.core.room_id);
    if let Some((_, path)) = env.nearest_safe_room(here) {
        npc.ai_state = AiState { current_path: path, original_behavior: Some(npc.behavior_type), current_activity: npc.ai_state.current_activity.clone(), patrol_index: npc.ai_state.patrol_index };
        npc.behavior_type = BehaviorKind::Retreating;
    }
}

/// Leave the retreat state, restoring whatever behavior preceded it.
pub fn end_retreat(npc: &mut Npc) {
    if let Some(original) = npc.ai_state.original_behavior.take() {
        npc.behavior_type = original;
    }
    npc.ai_state.current_path.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Stats;
    use std::collections::HashMap;

    struct FakeEnv {
        now: f64,
        hour: u32,
        occupants: HashMap<(Uuid, Uuid), Vec<Uuid>>,
        hostile_ids: std::collections::HashSet<Uuid>,
        health_fractions: HashMap<Uuid, f64>,
        exits: HashMap<(Uuid, Uuid), Vec<(String, Uuid, Uuid)>>,
        safe_zones: std::collections::HashSet<Uuid>,
        instance_regions: std::collections::HashSet<Uuid>,
    }

    impl Default for FakeEnv {
        fn default() -> Self {
            Self {
                now: 0.0,
                hour: 12,
                occupants: HashMap::new(),
                hostile_ids: Default::default(),
                health_fractions: HashMap::new(),
                exits: HashMap::new(),
                safe_zones: Default::default(),
                instance_regions: Default::default(),
            }
        }
    }

    impl BehaviorEnvironment for FakeEnv {
        fn now(&self) -> f64 {
            self.now
        }
        fn current_hour(&self) -> u32 {
            self.hour
        }
        fn occupants(&self, region_id: Uuid, room_id: Uuid) -> Vec<Uuid> {
            self.occupants.get(&(region_id, room_id)).cloned().unwrap_or_default()
        }
        fn is_player(&self, _id: Uuid) -> bool {
            false
        }
        fn health_fraction_of(&self, id: Uuid) -> Option<f64> {
            self.health_fractions.get(&id).copied()
        }
        fn faction_of(&self, _id: Uuid) -> Option<String> {
            None
        }
        fn is_hostile(&self, _npc: &Npc, other: Uuid) -> bool {
            self.hostile_ids.contains(&other)
        }
        fn room_of(&self, _id: Uuid) -> Option<(Uuid, Uuid)> {
            None
        }
        fn exits(&self, region_id: Uuid, room_id: Uuid) -> Vec<(String, Uuid, Uuid)> {
            self.exits.get(&(region_id, room_id)).cloned().unwrap_or_default()
        }
        fn is_safe_zone(&self, region_id: Uuid) -> bool {
            self.safe_zones.contains(&region_id)
        }
        fn is_instance_region(&self, region_id: Uuid) -> bool {
            self.instance_regions.contains(&region_id)
        }
        fn find_path(&self, _from: (Uuid, Uuid), _to: (Uuid, Uuid)) -> Option<Vec<String>> {
            None
        }
        fn nearest_safe_room(&self, _from: (Uuid, Uuid)) -> Option<((Uuid, Uuid), Vec<String>)> {
            None
        }
        fn castable_heal_spell(&self, _npc: &Npc) -> Option<Uuid> {
            None
        }
        fn combat_target_of(&self, _owner_id: Uuid) -> Option<Uuid> {
            None
        }
    }

    fn npc() -> Npc {
        Npc::new(Uuid::new_v4(), Uuid::nil(), "Goblin", Uuid::new_v4(), Uuid::new_v4(), Stats::default(), 3, BehaviorKind::Wanderer)
    }

    #[test]
    fn stunned_npc_never_acts() {
        let mut m = npc();
        m.core.apply_effect(crate::effect::Effect::new("Stun", crate::effect::EffectKind::Control, 5.0));
        let env = FakeEnv::default();
        let mut rng = RollStream::new(1);
        assert_eq!(decide(&m, &env, &mut rng), NpcDecision::None);
    }

    #[test]
    fn trading_npc_never_acts() {
        let mut m = npc();
        m.is_trading = true;
        let env = FakeEnv::default();
        let mut rng = RollStream::new(1);
        assert_eq!(decide(&m, &env, &mut rng), NpcDecision::None);
    }

    #[test]
    fn expired_summon_despawns_before_anything_else() {
        let mut m = npc();
        m.owner_id = Some(Uuid::new_v4());
        m.creation_time = 0.0;
        m.summon_duration = Some(10.0);
        let mut env = FakeEnv::default();
        env.now = 11.0;
        let mut rng = RollStream::new(1);
        assert_eq!(decide(&m, &env, &mut rng), NpcDecision::Despawn);
    }

    #[test]
    fn cooldown_gate_suppresses_idle_movement() {
        let mut m = npc();
        m.last_moved = 5.0;
        m.move_cooldown = 10.0;
        let mut env = FakeEnv::default();
        env.now = 8.0;
        let mut rng = RollStream::new(1);
        assert_eq!(decide(&m, &env, &mut rng), NpcDecision::None);
    }
}
