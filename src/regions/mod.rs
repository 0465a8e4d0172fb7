//! A world is split into square tiles of `RegionDimensions::tile_resolution`
//! cells. Each tile is painted into zones, regions of cells connected for an
//! identical set of movement modes, and the zones are linked by directed
//! edges wherever a step crosses from one zone into another.
//!
//! ```text
//!  _______________________ _______________________
//! |                       |                       |
//! |   zone 0      |       |      zone 0           |
//! |           edge|------>|                       |
//! |               |<------|edge                   |
//! |_______________|_______|_______________________|
//! |               #       |                       |
//! |   zone 1      #       |      zone 0           |
//! |               #       |                       |
//! |_______________#_______|_______________________|
//! ```
//!
//! Edges carry the cost of travelling through their zone from every other
//! edge entering it, which allows a route across many tiles to be planned
//! over the zones before descending to individual cells.
//!

pub mod collection;
pub mod dimensions;
pub mod edge_costs;
pub mod edge_detector;
pub mod movement;
pub mod painter;
pub mod scratch;
pub mod utilities;
pub mod views;
