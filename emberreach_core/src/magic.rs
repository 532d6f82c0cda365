//! Spell effect dispatch (§4.6, §4.6.1), ported from `effects.py`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use emberreach_data::{SpellEffectDef as SpellEffect, SpellTargetDef as SpellTarget};

use crate::config::{self, MIN_EFFECT_VALUE, SPELL_DAMAGE_VARIATION_FACTOR};
use crate::effect::{Effect, EffectKind};
use crate::entity::CombatantCore;
use crate::error::{GameError, GameResult};
use crate::rng::RollStream;

/// A live spell template (`emberreach_data::SpellTemplate` plus a resolved id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spell {
    pub id: Uuid,
    pub name: String,
    pub cost: i64,
    pub cooldown_secs: f64,
    pub target_type: SpellTarget,
    pub level_required: i64,
    pub effects: Vec<SpellEffect>,
    pub summon_duration_secs: Option<f64>,
    pub summon_template_id: Option<Uuid>,
}

/// §4.6 casting pipeline, step 1: preconditions that reject without
/// mutating anything.
pub fn can_cast(caster: &CombatantCore, knows_spell: bool, spell: &Spell, now: f64) -> GameResult<()> {
    if !caster.is_alive {
        return Err(GameError::precondition("you are in no condition to cast"));
    }
    if caster.is_stunned() {
        return Err(GameError::precondition("you are stunned"));
    }
    if caster.is_silenced() {
        return Err(GameError::precondition("you are silenced"));
    }
    if !knows_spell {
        return Err(GameError::precondition(format!("you do not know {}", spell.name)));
    }
    if caster.level < spell.level_required {
        return Err(GameError::precondition(format!("{} requires level {}", spell.name, spell.level_required)));
    }
    if caster.mana < spell.cost {
        return Err(GameError::precondition("not enough mana"));
    }
    if caster.spell_cooldowns.get(&spell.id).is_some_and(|deadline| now < *deadline) {
        return Err(GameError::precondition(format!("{} is not ready yet", spell.name)));
    }
    Ok(())
}

/// Deduct cost and set the cooldown deadline (§4.6 step 3).
pub fn commit_cast(caster: &mut CombatantCore, spell: &Spell, now: f64) {
    caster.mana -= spell.cost;
    caster.spell_cooldowns.insert(spell.id, now + spell.cooldown_secs);
}

/// `max(MIN_EFFECT, round((base + stat_scaling) * (1 ± variance))) * level_mul`
/// when `scales_with_level`; status-effect magnitudes (dot/stat_mod
/// durations, tick damage) are left at the pre-level-scaled value (§4.6.1).
pub fn effective_value(base: i64, caster: &CombatantCore, target_level: i64, scales_with_level: bool, rng: &mut RollStream) -> i64 {
    let stat_bonus = ((caster.effective_stat("intellect") - 10) / 5).max(0);
    let modified = base + stat_bonus;
    let variance = rng.uniform_f64(-SPELL_DAMAGE_VARIATION_FACTOR, SPELL_DAMAGE_VARIATION_FACTOR);
    let varied = (modified as f64 * (1.0 + variance)).round() as i64;
    let stat_based = varied.max(MIN_EFFECT_VALUE);

    if !scales_with_level {
        return stat_based;
    }
    let category = config::level_diff_category(caster.level, target_level);
    let (_, dmg_mul, _) = config::level_diff_modifiers(category);
    ((stat_based as f64) * dmg_mul).round().max(MIN_EFFECT_VALUE as f64) as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResistanceFlavor {
    Weakness,
    Resistance,
    StrongResistance,
}

/// Flavor classification from the target's resistance to `damage_type`,
/// consulted only for non-physical damage (§4.6.1).
pub fn resistance_flavor(target: &CombatantCore, damage_type: &str) -> Option<ResistanceFlavor> {
    let resistance = target.get_resistance(damage_type);
    if resistance < 0 {
        Some(ResistanceFlavor::Weakness)
    } else if resistance >= 50 {
        Some(ResistanceFlavor::StrongResistance)
    } else if resistance > 0 {
        Some(ResistanceFlavor::Resistance)
    } else {
        None
    }
}

pub fn apply_damage(target: &mut CombatantCore, value: i64, damage_type: &str) -> i64 {
    target.take_damage(value, damage_type)
}

pub fn apply_heal(target: &mut CombatantCore, value: i64) -> i64 {
    target.heal(value)
}

/// `life_tap`: deal damage, then heal the caster by half of it (§4.6.1).
pub fn apply_life_tap(caster: &mut CombatantCore, target: &mut CombatantCore, value: i64, damage_type: &str) -> (i64, i64) {
    let damage_dealt = target.take_damage(value, damage_type);
    if damage_dealt <= 0 {
        return (0, 0);
    }
    let heal_amount = (damage_dealt as f64 * config::LIFE_TAP_HEAL_FRACTION).floor() as i64;
    let healed = caster.heal(heal_amount);
    (damage_dealt, healed)
}

pub fn apply_cleanse(target: &mut CombatantCore, tags: &[String]) -> usize {
    let refs: Vec<&str> = tags.iter().map(String::as_str).collect();
    target.remove_effects_by_tag(&refs).len()
}

pub fn apply_dot(target: &mut CombatantCore, name: &str, damage_type: &str, damage_per_tick: i64, tick_interval_secs: f64, duration_secs: f64, source_id: Uuid) {
    let mut effect = Effect::new(name, EffectKind::Dot, duration_secs);
    effect.tick_interval = tick_interval_secs;
    effect.damage_per_tick = damage_per_tick;
    effect.damage_type = Some(damage_type.to_string());
    effect.source_id = Some(source_id);
    target.apply_effect(effect);
}

pub fn apply_effect_record(target: &mut CombatantCore, mut effect: Effect, duration_override: Option<f64>) {
    if let Some(duration) = duration_override {
        effect.base_duration = duration;
        effect.duration_remaining = duration;
    }
    target.apply_effect(effect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn combatant(level: i64) -> CombatantCore {
        CombatantCore::new(Uuid::new_v4(), "T", Uuid::nil(), Uuid::nil(), crate::entity::Stats::default(), level)
    }

    #[test]
    fn life_tap_heals_caster_half_of_damage_dealt() {
        let mut caster = combatant(5);
        caster.health -= 40;
        let mut target = combatant(5);
        let (damage, healed) = apply_life_tap(&mut caster, &mut target, 10, "shadow");
        assert_eq!(damage, 10);
        assert_eq!(healed, 5);
    }

    #[test]
    fn cleanse_returns_count_of_removed_effects() {
        let mut target = combatant(1);
        let mut poison = Effect::new("Venom", EffectKind::Dot, 5.0);
        poison.tags.insert("poison".to_string());
        target.apply_effect(poison);
        let removed = apply_cleanse(&mut target, &["poison".to_string(), "disease".to_string(), "curse".to_string()]);
        assert_eq!(removed, 1);
    }

    #[test]
    fn resistance_flavor_buckets_match_spec_thresholds() {
        let mut target = combatant(1);
        target.resistances.insert("fire".to_string(), -10);
        assert_eq!(resistance_flavor(&target, "fire"), Some(ResistanceFlavor::Weakness));
        target.resistances.insert("fire".to_string(), 50);
        assert_eq!(resistance_flavor(&target, "fire"), Some(ResistanceFlavor::StrongResistance));
        target.resistances.insert("fire".to_string(), 10);
        assert_eq!(resistance_flavor(&target, "fire"), Some(ResistanceFlavor::Resistance));
        target.resistances.insert("fire".to_string(), 0);
        assert_eq!(resistance_flavor(&target, "fire"), None);
    }
}
