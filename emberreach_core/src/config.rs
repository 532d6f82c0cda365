//! Tunable simulation constants.
//!
//! Flat module-level constants, the same shape the original system used for
//! its `config_combat` / `config_quests` / `config_items` modules: one file
//! per concern, plain top-level values rather than a builder or TOML-backed
//! settings object. None of this is content (item/NPC/spell definitions
//! live in `emberreach_data`); it is the numeric backbone the resolvers use
//! regardless of what content is loaded.

// --- Combat ---
pub const MIN_HIT_CHANCE: f64 = 0.05;
pub const MAX_HIT_CHANCE: f64 = 0.95;
pub const HIT_CHANCE_AGILITY_FACTOR: f64 = 0.02;
pub const MINIMUM_DAMAGE_TAKEN: i64 = 1;
pub const MIN_XP_GAIN: i64 = 1;

pub const PLAYER_BASE_HIT_CHANCE: f64 = 0.85;
pub const NPC_BASE_HIT_CHANCE: f64 = 0.75;
pub const PLAYER_ATTACK_DAMAGE_VARIATION_RANGE: (i64, i64) = (-2, 3);
pub const NPC_ATTACK_DAMAGE_VARIATION_RANGE: (i64, i64) = (-1, 2);

pub const BLIND_HIT_CHANCE_CAP: f64 = 0.20;
pub const VAMPIRISM_HEAL_FRACTION: f64 = 0.5;
pub const LIFE_TAP_HEAL_FRACTION: f64 = 0.5;
pub const SPECIAL_ABILITY_FIRE_CHANCE: f64 = 0.2;

pub const XP_GAIN_HEALTH_DIVISOR: f64 = 5.0;
pub const XP_GAIN_LEVEL_MULTIPLIER: f64 = 5.0;

/// (hit_mul, dmg_mul, xp_mul) for the seven level-difference buckets (§6).
pub const LEVEL_DIFF_MODIFIERS: [(&str, f64, f64, f64); 7] = [
    ("purple", 0.70, 0.60, 2.50),
    ("red", 0.85, 0.75, 1.75),
    ("orange", 0.95, 0.90, 1.25),
    ("yellow", 1.00, 1.00, 1.00),
    ("blue", 1.05, 1.10, 0.80),
    ("green", 1.15, 1.25, 0.50),
    ("gray", 1.25, 1.40, 0.20),
];

// --- Magic ---
pub const SPELL_DAMAGE_VARIATION_FACTOR: f64 = 0.1;
pub const MIN_EFFECT_VALUE: i64 = 1;
pub const DEFAULT_SPELL_DAMAGE_TYPE: &str = "magical";

// --- NPC behavior ---
pub const NPC_DEFAULT_MOVE_COOLDOWN: f64 = 5.0;
pub const NPC_DEFAULT_WANDER_CHANCE: f64 = 0.3;
pub const NPC_DEFAULT_COMBAT_COOLDOWN: f64 = 2.0;
pub const NPC_DEFAULT_ATTACK_COOLDOWN: f64 = 2.0;
pub const NPC_SPELL_CAST_CHANCE: f64 = 0.5;
pub const NPC_LOW_MANA_RETREAT_THRESHOLD: f64 = 0.2;
pub const NPC_HEALER_HEAL_THRESHOLD: f64 = 0.6;
pub const NPC_DEFAULT_FLEE_THRESHOLD: f64 = 0.2;
pub const NPC_DEFAULT_RESPAWN_COOLDOWN: f64 = 300.0;
pub const NPC_DEFAULT_AGGRESSION: f64 = 0.5;

// --- Skills ---
pub const MAX_SKILL_LEVEL: u32 = 100;
pub const SKILL_BASE_XP_PER_LEVEL: f64 = 100.0;
pub const SKILL_XP_GROWTH: f64 = 1.5;

// --- Weather ---
pub const WEATHER_TRANSITION_CHANCE: f64 = 0.3;
pub const WEATHER_PERSISTENCE_CHANCE: f64 = 0.5;

// --- Quests ---
/// Fallback board size when content doesn't set `quest_pools.max_quests_on_board`
/// (see DESIGN.md: the original engine had a stray top-level constant of 5 that
/// disagreed with its own quest-system config of 10; this follows the config value).
pub const DEFAULT_MAX_QUESTS_ON_BOARD: usize = 10;

// --- Crafting / economy (peripheral, §4.14) ---
pub const CRAFT_SUCCESS_MIN_XP: i64 = 10;
pub const CRAFT_FAILURE_XP: i64 = 2;
pub const DEFAULT_VENDOR_SELL_MULTIPLIER: f64 = 2.0;
pub const DEFAULT_VENDOR_BUY_MULTIPLIER: f64 = 0.4;

/// Resolve the level-difference bucket category for `attacker_level` vs.
/// `target_level`, using the tiered-threshold rule: attackers at level <= 5
/// use the fixed small table; above that, thresholds widen linearly with
/// attacker level.
pub fn level_diff_category(attacker_level: i64, target_level: i64) -> &'static str {
    let diff = target_level - attacker_level;
    if attacker_level <= 5 {
        return match diff {
            d if d >= 3 => "purple",
            2 => "red",
            1 => "orange",
            0 => "yellow",
            -1 => "blue",
            -2 => "green",
            _ => "gray",
        };
    }

    let over = attacker_level - 5;
    let purple_threshold = 3 + over / 12;
    let red_threshold = 2 + over / 9;
    let orange_threshold = 1;
    let yellow_lower = 0 - over / 7;
    let blue_lower = yellow_lower - (1 + over / 8);
    let green_lower = blue_lower - (1 + over / 9);

    if diff >= purple_threshold {
        "purple"
    } else if diff >= red_threshold {
        "red"
    } else if diff >= orange_threshold {
        "orange"
    } else if diff >= yellow_lower {
        "yellow"
    } else if diff >= blue_lower {
        "blue"
    } else if diff >= green_lower {
        "green"
    } else {
        "gray"
    }
}

/// `(hit_mul, dmg_mul, xp_mul)` for a level-difference category.
pub fn level_diff_modifiers(category: &str) -> (f64, f64, f64) {
    LEVEL_DIFF_MODIFIERS
        .iter()
        .find(|(name, ..)| *name == category)
        .map(|(_, h, d, x)| (*h, *d, *x))
        .unwrap_or((1.0, 1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_level_attacker_uses_fixed_table() {
        assert_eq!(level_diff_category(5, 8), "purple");
        assert_eq!(level_diff_category(5, 7), "red");
        assert_eq!(level_diff_category(5, 5), "yellow");
        assert_eq!(level_diff_category(5, 3), "green");
        assert_eq!(level_diff_category(5, 1), "gray");
    }

    #[test]
    fn high_level_attacker_widens_thresholds() {
        // attacker level 17: over = 12, purple_threshold = 3 + 1 = 4
        assert_eq!(level_diff_category(17, 21), "purple");
        assert_eq!(level_diff_category(17, 20), "red");
    }

    #[test]
    fn modifiers_default_to_neutral_for_unknown_category() {
        assert_eq!(level_diff_modifiers("not-a-real-bucket"), (1.0, 1.0, 1.0));
        assert_eq!(level_diff_modifiers("purple"), (0.70, 0.60, 2.50));
    }
}
