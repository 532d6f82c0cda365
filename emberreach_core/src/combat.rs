//! Physical combat resolution (§4.5), ported from `combat_system.py`.

use crate::config::{
    self, BLIND_HIT_CHANCE_CAP, HIT_CHANCE_AGILITY_FACTOR, MAX_HIT_CHANCE, MIN_HIT_CHANCE, MIN_XP_GAIN, NPC_ATTACK_DAMAGE_VARIATION_RANGE,
    NPC_BASE_HIT_CHANCE, PLAYER_ATTACK_DAMAGE_VARIATION_RANGE, PLAYER_BASE_HIT_CHANCE, VAMPIRISM_HEAL_FRACTION, XP_GAIN_HEALTH_DIVISOR,
    XP_GAIN_LEVEL_MULTIPLIER,
};
use crate::entity::CombatantCore;
use crate::rng::RollStream;

/// Outcome of one attack resolution (§4.5).
#[derive(Debug, Clone)]
pub struct AttackResult {
    pub is_hit: bool,
    pub damage: i64,
    pub target_defeated: bool,
    pub vampirism_healed: i64,
}

/// Hit probability for a physical attack from `attacker` on `defender`.
pub fn calculate_hit_chance(attacker: &CombatantCore, defender: &CombatantCore, attacker_is_player: bool) -> f64 {
    if attacker.is_blind() {
        return BLIND_HIT_CHANCE_CAP;
    }

    let base = if attacker_is_player { PLAYER_BASE_HIT_CHANCE } else { NPC_BASE_HIT_CHANCE };
    let agility_term = (attacker.effective_stat("agility") - defender.effective_stat("agility")) as f64 * HIT_CHANCE_AGILITY_FACTOR;
    let category = config::level_diff_category(attacker.level, defender.level);
    let (hit_mul, _, _) = config::level_diff_modifiers(category);

    ((base + agility_term) * hit_mul).clamp(MIN_HIT_CHANCE, MAX_HIT_CHANCE)
}

/// Base physical damage before target resistance/defense (`take_damage`
/// applies those): `max(1, attack_power + Uniform(variation)) * dmg_mul`.
pub fn calculate_physical_damage(attacker: &CombatantCore, defender: &CombatantCore, attacker_is_player: bool, rng: &mut RollStream) -> i64 {
    let (lo, hi) = if attacker_is_player { PLAYER_ATTACK_DAMAGE_VARIATION_RANGE } else { NPC_ATTACK_DAMAGE_VARIATION_RANGE };
    let variation = rng.uniform_inclusive(lo, hi);
    let base = (attacker.effective_stat("attack_power") + variation).max(1);

    let category = config::level_diff_category(attacker.level, defender.level);
    let (_, dmg_mul, _) = config::level_diff_modifiers(category);
    ((base as f64) * dmg_mul).round() as i64
}

/// XP awarded for defeating a target of `target_level`/`target_max_health`,
/// scaled by the level-difference bucket's xp multiplier (§4.5, §6 table).
pub fn calculate_xp_gain(attacker_level: i64, target_level: i64, target_max_health: i64) -> i64 {
    let category = config::level_diff_category(attacker_level, target_level);
    let (_, _, xp_mul) = config::level_diff_modifiers(category);
    let base = target_max_health as f64 / XP_GAIN_HEALTH_DIVISOR + target_level as f64 * XP_GAIN_LEVEL_MULTIPLIER;
    ((base * xp_mul).round() as i64).max(MIN_XP_GAIN)
}

/// Resolve one physical attack: roll to hit, apply damage, check defeat,
/// apply vampirism (§4.5). Caller is responsible for dispatching
/// `npc_killed` and awarding XP/loot on defeat.
pub fn execute_attack(attacker: &mut CombatantCore, defender: &mut CombatantCore, attacker_is_player: bool, rng: &mut RollStream) -> AttackResult {
    let hit_chance = calculate_hit_chance(attacker, defender, attacker_is_player);
    let is_hit = rng.chance(hit_chance);
    if !is_hit {
        return AttackResult { is_hit: false, damage: 0, target_defeated: false, vampirism_healed: 0 };
    }

    let raw_damage = calculate_physical_damage(attacker, defender, attacker_is_player, rng);
    let damage = defender.take_damage(raw_damage, "physical");
    let target_defeated = defender.health <= 0;

    let vampirism_healed = if attacker.has_vampirism() && damage > 0 {
        let amount = (damage as f64 * VAMPIRISM_HEAL_FRACTION).floor() as i64;
        attacker.heal(amount)
    } else {
        0
    };

    AttackResult { is_hit, damage, target_defeated, vampirism_healed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn combatant(level: i64) -> CombatantCore {
        CombatantCore::new(Uuid::new_v4(), "T", Uuid::nil(), Uuid::nil(), crate::entity::Stats::default(), level)
    }

    #[test]
    fn blind_caps_hit_chance_regardless_of_other_factors() {
        let mut attacker = combatant(50);
        attacker.apply_effect(crate::effect::Effect::new("Blind", crate::effect::EffectKind::Control, 5.0));
        let defender = combatant(1);
        assert_eq!(calculate_hit_chance(&attacker, &defender, true), BLIND_HIT_CHANCE_CAP);
    }

    #[test]
    fn hit_chance_is_always_clamped() {
        let attacker = combatant(1);
        let defender = combatant(60);
        let chance = calculate_hit_chance(&attacker, &defender, true);
        assert!((MIN_HIT_CHANCE..=MAX_HIT_CHANCE).contains(&chance));
    }

    #[test]
    fn vampirism_heals_half_damage_dealt() {
        let mut attacker = combatant(5);
        attacker.apply_effect(crate::effect::Effect::new("Vampirism", crate::effect::EffectKind::Control, 10.0));
        attacker.health -= 50;
        let mut defender = combatant(5);
        let damage = defender.take_damage(20, "physical");
        let healed = (damage as f64 * VAMPIRISM_HEAL_FRACTION).floor() as i64;
        attacker.heal(healed);
        assert_eq!(healed, 10);
    }
}
