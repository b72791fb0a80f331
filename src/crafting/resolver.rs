//! Craft Quantity Resolution
//!
//! Turns one crafting click into the number of units the player actually
//! gained. Pure: the same interaction always resolves to the same quantity.

use tracing::{debug, warn};

use super::definition::{ClickMode, CraftInteraction};
use crate::item::{self, ItemStack};

/// Resolve how many units a crafting click produced.
///
/// Zero means the click produced nothing that counts towards a quest and the
/// caller should stop there.
pub fn resolve_craft_quantity(craft: &CraftInteraction) -> u32 {
    let recipe_yield = craft.recipe_yield();
    if recipe_yield == 0 {
        warn!(
            "Crafting interaction for '{}' reported a zero recipe yield",
            craft.result.item_id
        );
        return 0;
    }

    match craft.click {
        ClickMode::NumberKey => {
            // Result is swapped with whatever sits in the hotbar slot
            if item::is_air(craft.hotbar_slot.as_ref()) {
                recipe_yield
            } else {
                0
            }
        }
        ClickMode::Drop | ClickMode::ControlDrop => {
            // Dropping while holding something drops the cursor, not the craft
            if item::is_air(craft.cursor.as_ref()) {
                recipe_yield
            } else {
                0
            }
        }
        ClickMode::ShiftLeft | ClickMode::ShiftRight => bulk_craft_quantity(craft, recipe_yield),
        _ => recipe_yield,
    }
}

/// Units a shift-click produces: limited by the scarcest ingredient stack and
/// by how much the destination inventory can hold.
fn bulk_craft_quantity(craft: &CraftInteraction, recipe_yield: u32) -> u32 {
    let Some(max_craftable) = max_craftable_from_ingredients(&craft.matrix, recipe_yield) else {
        warn!(
            "Shift-craft of '{}' arrived with an empty ingredient grid",
            craft.result.item_id
        );
        return 0;
    };

    let capacity = item::room_for(&craft.destination, &craft.result);
    if capacity >= max_craftable {
        return max_craftable;
    }

    // Only whole crafts fit; leftover room below one yield is wasted
    let clamped = (capacity / recipe_yield) * recipe_yield;
    debug!(
        "Shift-craft of '{}' clamped from {} to {} (room for {})",
        craft.result.item_id, max_craftable, clamped, capacity
    );
    clamped
}

/// `recipe_yield` times the smallest occupied ingredient stack, or `None`
/// when no ingredient slot is occupied.
pub fn max_craftable_from_ingredients(
    matrix: &[Option<ItemStack>],
    recipe_yield: u32,
) -> Option<u32> {
    matrix
        .iter()
        .flatten()
        .filter(|stack| !stack.is_empty())
        .map(|stack| stack.quantity)
        .min()
        .map(|batches| recipe_yield.saturating_mul(batches))
}
