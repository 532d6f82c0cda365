//! Crafting and vendor economy (§4.14). The spec marks these as routine
//! interface contracts, so this module stays thin: plain resolver functions
//! over content-defined recipes and vendor configs rather than a stateful
//! subsystem of its own.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{CRAFT_FAILURE_XP, CRAFT_SUCCESS_MIN_XP, DEFAULT_VENDOR_BUY_MULTIPLIER, DEFAULT_VENDOR_SELL_MULTIPLIER};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    pub station: Option<String>,
    /// item_template_id -> quantity consumed.
    pub ingredients: HashMap<Uuid, u32>,
    pub result_item_id: Uuid,
    pub result_quantity: u32,
    pub skill: String,
    pub difficulty: u32,
    pub item_value: i64,
}

#[derive(Debug, Clone)]
pub struct CraftOutcome {
    pub success: bool,
    pub xp_awarded: i64,
    pub consumed: HashMap<Uuid, u32>,
    pub produced: Option<(Uuid, u32)>,
}

/// `true` when `held` (item_template_id -> quantity) covers every ingredient.
pub fn has_ingredients(recipe: &Recipe, held: &HashMap<Uuid, u32>) -> bool {
    recipe.ingredients.iter().all(|(item, qty)| held.get(item).copied().unwrap_or(0) >= *qty)
}

/// Craft `recipe` given a skill-check result already rolled by the caller
/// (§4.11): success grants `max(10, value/2)` xp and the result item;
/// failure grants a flat 2 xp and still consumes ingredients.
pub fn craft(recipe: &Recipe, check_succeeded: bool) -> CraftOutcome {
    let xp_awarded = if check_succeeded { (recipe.item_value / 2).max(CRAFT_SUCCESS_MIN_XP) } else { CRAFT_FAILURE_XP };
    CraftOutcome {
        success: check_succeeded,
        xp_awarded,
        consumed: recipe.ingredients.clone(),
        produced: check_succeeded.then_some((recipe.result_item_id, recipe.result_quantity)),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorConfig {
    #[serde(default = "default_sell_mul")]
    pub sell_multiplier: f64,
    #[serde(default = "default_buy_mul")]
    pub buy_multiplier: f64,
    /// Item subtypes this vendor will buy from the player; empty = buys anything.
    #[serde(default)]
    pub buys_item_types: Vec<String>,
}

fn default_sell_mul() -> f64 {
    DEFAULT_VENDOR_SELL_MULTIPLIER
}
fn default_buy_mul() -> f64 {
    DEFAULT_VENDOR_BUY_MULTIPLIER
}

impl VendorConfig {
    pub fn sell_price(&self, base_value: i64) -> i64 {
        (base_value as f64 * self.sell_multiplier).round() as i64
    }

    pub fn buy_price(&self, base_value: i64) -> i64 {
        (base_value as f64 * self.buy_multiplier).round() as i64
    }

    pub fn will_buy(&self, item_subtype: &str) -> bool {
        self.buys_item_types.is_empty() || self.buys_item_types.iter().any(|t| t == item_subtype)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe() -> Recipe {
        let mut ingredients = HashMap::new();
        ingredients.insert(Uuid::nil(), 2);
        Recipe { id: Uuid::new_v4(), name: "Potion".into(), station: None, ingredients, result_item_id: Uuid::new_v4(), result_quantity: 1, skill: "alchemy".into(), difficulty: 40, item_value: 30 }
    }

    #[test]
    fn successful_craft_awards_half_value_xp_with_a_floor() {
        let outcome = craft(&recipe(), true);
        assert_eq!(outcome.xp_awarded, 15);
        assert!(outcome.produced.is_some());
    }

    #[test]
    fn failed_craft_still_consumes_but_awards_flat_xp() {
        let outcome = craft(&recipe(), false);
        assert_eq!(outcome.xp_awarded, CRAFT_FAILURE_XP);
        assert!(outcome.produced.is_none());
        assert_eq!(outcome.consumed.get(&Uuid::nil()), Some(&2));
    }

    #[test]
    fn vendor_with_empty_filter_buys_anything() {
        let vendor = VendorConfig { sell_multiplier: 2.0, buy_multiplier: 0.5, buys_item_types: vec![] };
        assert!(vendor.will_buy("weapon"));
        assert_eq!(vendor.sell_price(10), 20);
        assert_eq!(vendor.buy_price(10), 5);
    }
}
