//! Crafting Interaction Definitions
//!
//! Describes a single crafting click as reported by the event source: how the
//! player clicked, what the recipe yields and the inventory state around it.

use serde::{Deserialize, Serialize};

use crate::item::ItemStack;

/// How the player clicked the crafting result slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickMode {
    Left,
    Right,
    ShiftLeft,
    ShiftRight,
    /// Number key swap into a hotbar slot
    NumberKey,
    Drop,
    ControlDrop,
    Middle,
    DoubleClick,
    #[serde(other)]
    Unknown,
}

/// Snapshot of one click on a crafting result slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CraftInteraction {
    pub click: ClickMode,
    /// Recipe output; its quantity is the yield of a single craft
    pub result: ItemStack,
    /// Ingredient grid, `None` for unused cells
    #[serde(default)]
    pub matrix: Vec<Option<ItemStack>>,
    /// Contents of the hotbar slot targeted by a number key swap
    #[serde(default)]
    pub hotbar_slot: Option<ItemStack>,
    /// What the player is holding on the cursor
    #[serde(default)]
    pub cursor: Option<ItemStack>,
    /// Inventory that receives shift-clicked results
    #[serde(default)]
    pub destination: Vec<Option<ItemStack>>,
}

impl CraftInteraction {
    pub fn new(click: ClickMode, result: ItemStack) -> Self {
        Self {
            click,
            result,
            matrix: Vec::new(),
            hotbar_slot: None,
            cursor: None,
            destination: Vec::new(),
        }
    }

    pub fn with_matrix(mut self, matrix: Vec<Option<ItemStack>>) -> Self {
        self.matrix = matrix;
        self
    }

    pub fn with_destination(mut self, destination: Vec<Option<ItemStack>>) -> Self {
        self.destination = destination;
        self
    }

    pub fn with_cursor(mut self, cursor: Option<ItemStack>) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn with_hotbar_slot(mut self, hotbar_slot: Option<ItemStack>) -> Self {
        self.hotbar_slot = hotbar_slot;
        self
    }

    /// Units produced by one craft of this recipe
    pub fn recipe_yield(&self) -> u32 {
        self.result.quantity
    }
}
