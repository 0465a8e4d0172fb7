//! This is a plugin for Bevy game engine to build and incrementally maintain
//! the zone and edge graph used by hierarchical pathfinding over tiled grids
//!

pub mod bundle;
pub mod error;
pub mod plugin;
pub mod regions;

pub mod prelude;
