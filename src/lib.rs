//! Daily quest progress tracking.
//!
//! Players work through a pool of time-boxed quests (break N blocks, craft N
//! items). The engine attributes interactions to quests, completes them,
//! dispatches reward commands and grants a one-time bonus for clearing the
//! whole pool.

pub mod config;
pub mod crafting;
pub mod item;
pub mod protocol;
pub mod quest;
