use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable content-authored symbol. Resolved to a runtime `Uuid` at load time
/// (see `emberreach_core::idgen`).
pub type Sym = String;

/// Top-level content bundle consumed by the world loader.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorldDef {
    pub game: GameDef,
    #[serde(default)]
    pub regions: Vec<RegionDef>,
    #[serde(default)]
    pub items: Vec<ItemTemplate>,
    #[serde(default)]
    pub npcs: Vec<NpcTemplate>,
    #[serde(default)]
    pub spells: Vec<SpellTemplate>,
    #[serde(default)]
    pub quest_pools: QuestPools,
}

/// Game-level metadata and startup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameDef {
    pub title: String,
    #[serde(default)]
    pub seed: Option<u64>,
    pub player: PlayerStartDef,
    #[serde(default)]
    pub clock: ClockDef,
}

impl Default for GameDef {
    fn default() -> Self {
        Self {
            title: String::new(),
            seed: None,
            player: PlayerStartDef::default(),
            clock: ClockDef::default(),
        }
    }
}

/// Starting position and stats for a new player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStartDef {
    pub name: String,
    pub start_region: Sym,
    pub start_room: Sym,
    #[serde(default = "default_max_health")]
    pub max_health: i64,
    #[serde(default = "default_max_mana")]
    pub max_mana: i64,
}

impl Default for PlayerStartDef {
    fn default() -> Self {
        Self {
            name: String::new(),
            start_region: String::new(),
            start_room: String::new(),
            max_health: default_max_health(),
            max_mana: default_max_mana(),
        }
    }
}

fn default_max_health() -> i64 {
    100
}
fn default_max_mana() -> i64 {
    50
}

/// Real-to-game time ratio and calendar constants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClockDef {
    #[serde(default = "default_ratio")]
    pub real_seconds_per_game_second: f64,
    #[serde(default = "default_minutes_per_hour")]
    pub minutes_per_hour: u32,
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: u32,
    #[serde(default = "default_days_per_month")]
    pub days_per_month: u32,
    #[serde(default = "default_months_per_year")]
    pub months_per_year: u32,
}

impl Default for ClockDef {
    fn default() -> Self {
        Self {
            real_seconds_per_game_second: default_ratio(),
            minutes_per_hour: default_minutes_per_hour(),
            hours_per_day: default_hours_per_day(),
            days_per_month: default_days_per_month(),
            months_per_year: default_months_per_year(),
        }
    }
}

fn default_ratio() -> f64 {
    1.0 / 60.0
}
fn default_minutes_per_hour() -> u32 {
    60
}
fn default_hours_per_day() -> u32 {
    24
}
fn default_days_per_month() -> u32 {
    30
}
fn default_months_per_year() -> u32 {
    12
}

/// A region groups a set of rooms and carries region-scoped properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionDef {
    pub id: Sym,
    pub name: String,
    #[serde(default)]
    pub properties: RegionProperties,
    #[serde(default)]
    pub rooms: Vec<RoomDef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionProperties {
    #[serde(default)]
    pub safe_zone: bool,
    #[serde(default)]
    pub outdoors: bool,
    pub spawner_config: Option<SpawnerConfigDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnerConfigDef {
    pub monster_types: Vec<Sym>,
    pub max_population: usize,
    #[serde(default = "default_spawn_interval")]
    pub spawn_interval_secs: f64,
}

fn default_spawn_interval() -> f64 {
    120.0
}

/// Room definition used by the engine at load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDef {
    pub id: Sym,
    pub name: String,
    pub description: String,
    /// direction -> destination. Intra-region: "room". Cross-region: "region:room".
    #[serde(default)]
    pub exits: BTreeMap<String, String>,
    #[serde(default)]
    pub exit_requirements: BTreeMap<String, ExitRequirementDef>,
    #[serde(default)]
    pub env_interactions: BTreeMap<String, EnvInteractionDef>,
    #[serde(default)]
    pub properties: RoomProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomProperties {
    #[serde(default)]
    pub outdoors: bool,
    #[serde(default)]
    pub safe_zone: bool,
    #[serde(default)]
    pub no_monster_spawn: bool,
    pub locked_by: Option<Sym>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExitRequirementDef {
    Key { obj_id: Sym },
    SkillCheck { skill: String, difficulty: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnvInteractionDef {
    ClearExitReq {
        direction: String,
        duration_secs: f64,
        message: String,
    },
}

/// Item template definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemTemplate {
    pub id: Sym,
    pub name: String,
    pub description: String,
    pub subtype: ItemSubtypeDef,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub value: i64,
    #[serde(default)]
    pub stackable: bool,
    pub durability: Option<u32>,
    pub charges: Option<u32>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub key_id: Option<Sym>,
    pub spell_to_learn: Option<Sym>,
    #[serde(default)]
    pub cursed: bool,
}

fn default_weight() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemSubtypeDef {
    Weapon,
    Armor,
    Shield,
    Container,
    Consumable,
    Key,
    ResourceNode,
    Lockpick,
    Generic,
}

/// NPC template definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpcTemplate {
    pub id: Sym,
    pub name: String,
    pub description: String,
    #[serde(default = "default_level")]
    pub level: i64,
    #[serde(default)]
    pub stats: StatsDef,
    #[serde(default)]
    pub faction: String,
    pub behavior: BehaviorDef,
    #[serde(default)]
    pub respawnable: bool,
    pub home_region: Option<Sym>,
    pub home_room: Option<Sym>,
    #[serde(default)]
    pub loot_table: Vec<LootEntryDef>,
    #[serde(default)]
    pub usable_spells: Vec<Sym>,
    #[serde(default)]
    pub special_abilities: Vec<SpecialAbilityDef>,
    #[serde(default)]
    pub patrol_points: Vec<Sym>,
    #[serde(default)]
    pub schedule: Vec<ScheduleEntryDef>,
    #[serde(default)]
    pub max_mana: i64,
}

fn default_level() -> i64 {
    1
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StatsDef {
    #[serde(default = "default_stat")]
    pub attack_power: i64,
    #[serde(default = "default_stat")]
    pub defense: i64,
    #[serde(default = "default_stat")]
    pub agility: i64,
    #[serde(default = "default_stat")]
    pub intellect: i64,
    #[serde(default = "default_stat")]
    pub dexterity: i64,
    #[serde(default = "default_stat")]
    pub wisdom: i64,
    #[serde(default = "default_max_health")]
    pub max_health: i64,
}

fn default_stat() -> i64 {
    10
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorDef {
    Wanderer,
    Patrol,
    Follower,
    Scheduled,
    Healer,
    Minion,
    Retreating,
    Aggressive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootEntryDef {
    pub item_id: Sym,
    pub chance: f64,
    #[serde(default = "default_qty_min")]
    pub qty_min: u32,
    #[serde(default = "default_qty_max")]
    pub qty_max: u32,
}

fn default_qty_min() -> u32 {
    1
}
fn default_qty_max() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialAbilityDef {
    pub name: String,
    pub damage_multiplier: f64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntryDef {
    pub hour: u32,
    pub room: Sym,
    pub behavior_override: Option<BehaviorDef>,
}

/// Spell template definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellTemplate {
    pub id: Sym,
    pub name: String,
    #[serde(default)]
    pub cost: i64,
    #[serde(default)]
    pub cooldown_secs: f64,
    pub target_type: SpellTargetDef,
    #[serde(default = "default_level")]
    pub level_required: i64,
    pub effects: Vec<SpellEffectDef>,
    pub summon_duration_secs: Option<f64>,
    pub summon_template_id: Option<Sym>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellTargetDef {
    SelfTarget,
    Friendly,
    Enemy,
    AllEnemies,
    Item,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpellEffectDef {
    Damage {
        damage_type: String,
        base: i64,
    },
    LifeTap {
        damage_type: String,
        base: i64,
    },
    Heal {
        base: i64,
    },
    Cleanse {
        tags: Vec<String>,
    },
    ApplyDot {
        name: String,
        damage_type: String,
        damage_per_tick: i64,
        tick_interval_secs: f64,
        duration_secs: f64,
    },
    ApplyEffect {
        name: String,
        tags: Vec<String>,
        duration_secs: f64,
        modifier_stat: Option<String>,
        modifier_amount: Option<i64>,
    },
    Summon,
    Unlock,
    Lock,
    RemoveCurse,
}

/// Pools a `QuestGenerator` draws from when no explicit quest content exists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestPools {
    #[serde(default)]
    pub hostile_templates: Vec<Sym>,
    #[serde(default)]
    pub friendly_templates: Vec<Sym>,
    #[serde(default)]
    pub instance_templates: Vec<InstanceQuestTemplateDef>,
    #[serde(default)]
    pub max_quests_on_board: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceQuestTemplateDef {
    pub id: Sym,
    pub level: i64,
    pub possible_target_template_ids: Vec<Sym>,
    pub possible_entry_regions: Vec<Sym>,
    pub min_rooms: usize,
    pub max_rooms: usize,
}
