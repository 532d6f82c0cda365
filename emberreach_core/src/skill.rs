//! Skill checks and leveling (§4.11), ported from the original engine's
//! `skill_system.py`.

use serde::{Deserialize, Serialize};

use crate::config::{MAX_SKILL_LEVEL, SKILL_BASE_XP_PER_LEVEL, SKILL_XP_GROWTH};
use crate::entity::Stats;
use crate::rng::RollStream;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Skill {
    pub level: u32,
    pub xp: f64,
}

/// XP required to advance *from* `level` to `level + 1`.
pub fn xp_required(level: u32) -> f64 {
    (SKILL_BASE_XP_PER_LEVEL * SKILL_XP_GROWTH.powi(level as i32 - 1)).floor()
}

/// The stat a named skill draws its check bonus from (§4.11 example table).
fn stat_for_skill(skill_name: &str) -> Option<&'static str> {
    match skill_name {
        "lockpicking" => Some("dexterity"),
        "crafting" => Some("intellect"),
        "mercantile" => Some("wisdom"),
        _ => None,
    }
}

fn stat_value(stats: &Stats, stat_name: &str) -> i64 {
    match stat_name {
        "dexterity" => stats.dexterity,
        "intellect" => stats.intellect,
        "wisdom" => stats.wisdom,
        "agility" => stats.agility,
        _ => 10,
    }
}

/// `(stat - 10) * 2`, the bonus formula the original skill system uses.
fn stat_bonus(stats: &Stats, skill_name: &str) -> i64 {
    stat_for_skill(skill_name).map(|stat| (stat_value(stats, stat) - 10) * 2).unwrap_or(0)
}

/// Roll Uniform[1,100] + skill level + stat bonus against `difficulty`.
pub fn attempt_check(skill: &Skill, stats: &Stats, skill_name: &str, difficulty: u32, rng: &mut RollStream) -> (bool, i64) {
    let roll = rng.uniform_inclusive(1, 100);
    let total = roll + skill.level as i64 + stat_bonus(stats, skill_name);
    (total >= difficulty as i64, total)
}

/// Add XP and level up while XP meets the per-level requirement, capped at
/// `MAX_SKILL_LEVEL`. XP beyond the last level's requirement carries over
/// (§8 boundary behavior: no wraparound once the cap is hit).
pub fn grant_xp(skill: &mut Skill, amount: f64) -> u32 {
    if skill.level >= MAX_SKILL_LEVEL {
        return 0;
    }
    skill.xp += amount;
    let mut levels_gained = 0;
    while skill.level < MAX_SKILL_LEVEL && skill.xp >= xp_required(skill.level) {
        skill.xp -= xp_required(skill.level);
        skill.level += 1;
        levels_gained += 1;
    }
    if skill.level >= MAX_SKILL_LEVEL {
        skill.xp = 0.0;
    }
    levels_gained
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xp_required_grows_geometrically() {
        assert_eq!(xp_required(1), 100.0);
        assert_eq!(xp_required(2), 150.0);
    }

    #[test]
    fn grant_xp_levels_up_and_carries_remainder() {
        let mut skill = Skill { level: 1, xp: 0.0 };
        let gained = grant_xp(&mut skill, 120.0);
        assert_eq!(gained, 1);
        assert_eq!(skill.level, 2);
        assert_eq!(skill.xp, 20.0);
    }

    #[test]
    fn grant_xp_stops_at_cap_with_no_wraparound() {
        let mut skill = Skill { level: MAX_SKILL_LEVEL, xp: 0.0 };
        grant_xp(&mut skill, 1_000_000.0);
        assert_eq!(skill.level, MAX_SKILL_LEVEL);
        assert_eq!(skill.xp, 0.0);
    }

    #[test]
    fn stat_bonus_applies_only_for_mapped_skills() {
        let mut stats = Stats::default();
        stats.dexterity = 20;
        let skill = Skill { level: 0, xp: 0.0 };
        let mut rng = RollStream::new(1);
        let (_, total_with_bonus) = attempt_check(&skill, &stats, "lockpicking", 0, &mut rng);
        let mut rng2 = RollStream::new(1);
        let (_, total_without) = attempt_check(&skill, &stats, "unmapped_skill", 0, &mut rng2);
        assert_eq!(total_with_bonus - total_without, 20);
    }
}
