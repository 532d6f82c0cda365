//! Status effects: damage/heal over time, stat modifiers, and control (§4.4).
//!
//! Generalized from the teacher's turn-counted `HealthEffect` queue into a
//! duration-and-tick model keyed by game-seconds, since this engine runs on
//! a continuous clock rather than discrete turns.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Dot,
    Hot,
    StatMod,
    Control,
}

/// A timed modifier or damage/heal-over-time record attached to an entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    pub name: String,
    pub kind: EffectKind,
    #[serde(default)]
    pub tags: HashSet<String>,
    pub base_duration: f64,
    pub duration_remaining: f64,
    #[serde(default)]
    pub tick_interval: f64,
    #[serde(default)]
    pub last_tick: f64,
    #[serde(default)]
    pub damage_per_tick: i64,
    #[serde(default)]
    pub heal_per_tick: i64,
    pub damage_type: Option<String>,
    /// stat name -> signed modifier, consulted by `effective_stat`.
    #[serde(default)]
    pub modifiers: Vec<(String, i64)>,
    pub source_id: Option<Uuid>,
}

impl Effect {
    pub fn new(name: impl Into<String>, kind: EffectKind, base_duration: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            tags: HashSet::new(),
            base_duration,
            duration_remaining: base_duration,
            tick_interval: 0.0,
            last_tick: 0.0,
            damage_per_tick: 0,
            heal_per_tick: 0,
            damage_type: None,
            modifiers: Vec::new(),
            source_id: None,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.duration_remaining <= 0.0
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// Result of ticking a single effect once.
pub struct EffectTick {
    /// `damage_per_tick` if a dot fired this tick, credited to `source_id`.
    pub dot_fired: Option<(i64, Option<String>, Option<Uuid>)>,
    pub hot_fired: Option<i64>,
    pub expired: bool,
}

/// Append `incoming` to `effects`, refreshing in place if an effect with the
/// same name is already present (§4.4.1: non-stacking by name, refresh reset
/// duration, distinct names stack).
pub fn apply_effect(effects: &mut Vec<Effect>, incoming: Effect) {
    if let Some(existing) = effects.iter_mut().find(|e| e.name == incoming.name) {
        existing.duration_remaining = incoming.base_duration;
        existing.base_duration = incoming.base_duration;
        if incoming.source_id.is_some() {
            existing.source_id = incoming.source_id;
        }
    } else {
        effects.push(incoming);
    }
}

/// Advance one effect by `dt` game-seconds and report any fired tick.
pub fn tick_effect(effect: &mut Effect, now: f64, dt: f64) -> EffectTick {
    effect.duration_remaining -= dt;

    let mut dot_fired = None;
    let mut hot_fired = None;

    match effect.kind {
        EffectKind::Dot => {
            if effect.tick_interval > 0.0 && now - effect.last_tick >= effect.tick_interval {
                dot_fired = Some((effect.damage_per_tick, effect.damage_type.clone(), effect.source_id));
                effect.last_tick = now;
            }
        }
        EffectKind::Hot => {
            if effect.tick_interval > 0.0 && now - effect.last_tick >= effect.tick_interval {
                hot_fired = Some(effect.heal_per_tick);
                effect.last_tick = now;
            }
        }
        EffectKind::StatMod | EffectKind::Control => {}
    }

    EffectTick { dot_fired, hot_fired, expired: effect.is_expired() }
}

/// Remove and return every effect whose tags intersect `tags` (cleanse, §4.4).
pub fn remove_effects_by_tag(effects: &mut Vec<Effect>, tags: &[&str]) -> Vec<Effect> {
    let mut removed = Vec::new();
    effects.retain(|e| {
        if tags.iter().any(|t| e.has_tag(t)) {
            removed.push(e.clone());
            false
        } else {
            true
        }
    });
    removed
}

/// Sum of signed `stat` modifiers across active `stat_mod` effects (§4.4).
pub fn effective_stat_modifier(effects: &[Effect], stat: &str) -> i64 {
    effects
        .iter()
        .filter(|e| e.kind == EffectKind::StatMod)
        .flat_map(|e| e.modifiers.iter())
        .filter(|(name, _)| name == stat)
        .map(|(_, amount)| *amount)
        .sum()
}

pub fn has_control_effect(effects: &[Effect], name: &str) -> bool {
    effects.iter().any(|e| e.kind == EffectKind::Control && e.name == name)
}

pub fn is_stunned(effects: &[Effect]) -> bool {
    has_control_effect(effects, "Stun")
}

/// Silence is either the named control effect or the `silence` tag (§4.4, §4.6).
pub fn is_silenced(effects: &[Effect]) -> bool {
    has_control_effect(effects, "Silenced") || effects.iter().any(|e| e.has_tag("silence"))
}

pub fn is_blind(effects: &[Effect]) -> bool {
    effects.iter().any(|e| e.name == "Blind")
}

pub fn has_vampirism(effects: &[Effect]) -> bool {
    effects.iter().any(|e| e.name == "Vampirism")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reapplying_same_name_refreshes_rather_than_stacks() {
        let mut effects = Vec::new();
        apply_effect(&mut effects, Effect::new("Poison", EffectKind::Dot, 10.0));
        effects[0].duration_remaining = 2.0;
        apply_effect(&mut effects, Effect::new("Poison", EffectKind::Dot, 10.0));
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].duration_remaining, 10.0);
    }

    #[test]
    fn distinct_names_stack() {
        let mut effects = Vec::new();
        apply_effect(&mut effects, Effect::new("Poison", EffectKind::Dot, 10.0));
        apply_effect(&mut effects, Effect::new("Burn", EffectKind::Dot, 5.0));
        assert_eq!(effects.len(), 2);
    }

    #[test]
    fn dot_fires_only_after_tick_interval_elapses() {
        let mut effect = Effect::new("Poison", EffectKind::Dot, 10.0);
        effect.tick_interval = 2.0;
        effect.damage_per_tick = 3;
        let first = tick_effect(&mut effect, 1.0, 1.0);
        assert!(first.dot_fired.is_none());
        let second = tick_effect(&mut effect, 2.0, 1.0);
        assert_eq!(second.dot_fired.unwrap().0, 3);
    }

    #[test]
    fn stun_and_silence_are_orthogonal() {
        let stun = vec![Effect::new("Stun", EffectKind::Control, 3.0)];
        assert!(is_stunned(&stun));
        assert!(!is_silenced(&stun));

        let silence = vec![Effect::new("Silenced", EffectKind::Control, 3.0)];
        assert!(is_silenced(&silence));
        assert!(!is_stunned(&silence));
    }

    #[test]
    fn cleanse_removes_matching_tags_only() {
        let mut poison = Effect::new("Venom", EffectKind::Dot, 5.0);
        poison.tags.insert("poison".to_string());
        let mut curse = Effect::new("Hex", EffectKind::StatMod, 5.0);
        curse.tags.insert("curse".to_string());
        let slow = Effect::new("Slow", EffectKind::StatMod, 5.0);

        let mut effects = vec![poison, curse, slow];
        let removed = remove_effects_by_tag(&mut effects, &["poison", "disease", "curse"]);
        assert_eq!(removed.len(), 2);
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].name, "Slow");
    }
}
