use serde::{Deserialize, Serialize};

// ============================================================================
// Item Stacks
// ============================================================================

/// Stack size used when an event source does not report one.
pub const DEFAULT_MAX_STACK: u32 = 64;

fn default_max_stack() -> u32 {
    DEFAULT_MAX_STACK
}

/// A stack of items as seen in an inventory slot, on the cursor or in a
/// crafting grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item_id: String,
    pub quantity: u32,
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
}

impl ItemStack {
    pub fn new(item_id: &str, quantity: u32, max_stack: u32) -> Self {
        Self {
            item_id: item_id.to_string(),
            quantity,
            max_stack,
        }
    }

    /// A zero-sized stack is air
    pub fn is_empty(&self) -> bool {
        self.quantity == 0
    }

    /// Whether `other` can merge into the same slot as this stack
    pub fn is_similar(&self, other: &ItemStack) -> bool {
        self.item_id == other.item_id
    }
}

/// True when a slot holds nothing (missing or zero-sized stack).
pub fn is_air(slot: Option<&ItemStack>) -> bool {
    slot.map_or(true, ItemStack::is_empty)
}

// ============================================================================
// Inventory Capacity
// ============================================================================

/// How many more units of `stack` the given slots can absorb.
///
/// Empty slots take a full stack, slots holding a similar item take whatever
/// is left below the stack limit, and anything else takes nothing.
pub fn room_for(slots: &[Option<ItemStack>], stack: &ItemStack) -> u32 {
    slots.iter().fold(0u32, |room, slot| {
        let free = match slot {
            Some(existing) if !existing.is_empty() => {
                if existing.is_similar(stack) {
                    stack.max_stack.saturating_sub(existing.quantity)
                } else {
                    0
                }
            }
            _ => stack.max_stack,
        };
        room.saturating_add(free)
    })
}
