//! Crafting System
//!
//! Describes crafting clicks and resolves how many units each one produced.

pub mod definition;
pub mod resolver;

pub use definition::{ClickMode, CraftInteraction};
pub use resolver::{max_craftable_from_ingredients, resolve_craft_quantity};
