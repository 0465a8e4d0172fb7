//! Zone data of a tile. Every cell records the zone it was painted into and
//! the directions out of the cell that cross the zone's boundary.
//!
//! A `10x10` tile split by an impassable wall in column 5 holds two zones,
//! the wall cells belong to no zone:
//!
//! ```text
//!  ___________________________________________________________
//! |     |     |     |     |     |     |     |     |     |     |
//! |  0  |  0  |  0  |  0  |  0  |  -  |  1  |  1  |  1  |  1  |
//! |_____|_____|_____|_____|_____|_____|_____|_____|_____|_____|
//! |     |     |     |     |     |     |     |     |     |     |
//! |  0  |  0  |  0  |  0  |  0  |  -  |  1  |  1  |  1  |  1  |
//! |_____|_____|_____|_____|_____|_____|_____|_____|_____|_____|
//!                              ...
//! ```
//!

use bevy::prelude::*;

use crate::prelude::*;

/// Identifier of a zone within its tile. Ids are handed out in order of
/// painting and are reset whenever the tile is repainted
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Reflect)]
pub struct TraversableZoneId(u16);

impl Default for TraversableZoneId {
	fn default() -> Self {
		TraversableZoneId::EMPTY
	}
}

impl TraversableZoneId {
	/// The cell has not been assigned a zone
	pub const EMPTY: TraversableZoneId = TraversableZoneId(u16::MAX);
	/// Create a new instance of [TraversableZoneId]
	pub fn new(id: u16) -> Self {
		TraversableZoneId(id)
	}
	pub fn get(&self) -> u16 {
		self.0
	}
	pub fn is_empty(&self) -> bool {
		*self == TraversableZoneId::EMPTY
	}
}

/// A zone identified across the whole world
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Reflect)]
pub struct GlobalZoneId {
	/// Tile owning the zone
	tile: TileID,
	/// Zone within the tile
	zone: TraversableZoneId,
}

impl GlobalZoneId {
	/// Create a new instance of [GlobalZoneId]
	pub fn new(tile: TileID, zone: TraversableZoneId) -> Self {
		GlobalZoneId { tile, zone }
	}
	pub fn get_tile(&self) -> TileID {
		self.tile
	}
	pub fn get_zone(&self) -> TraversableZoneId {
		self.zone
	}
}

/// Zone assignment of a single cell
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ZoneCell {
	/// Zone the cell belongs to
	zone: TraversableZoneId,
	/// Traversable directions leading out of the zone
	boundary: DirectionalityInformation,
}

impl ZoneCell {
	/// Create a new instance of [ZoneCell]
	pub fn new(zone: TraversableZoneId, boundary: DirectionalityInformation) -> Self {
		ZoneCell { zone, boundary }
	}
	pub fn get_zone(&self) -> TraversableZoneId {
		self.zone
	}
	pub fn get_boundary(&self) -> DirectionalityInformation {
		self.boundary
	}
	pub fn set_boundary(&mut self, boundary: DirectionalityInformation) {
		self.boundary = boundary;
	}
}

/// Summary of a painted zone
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ZoneInfo {
	/// Movement modes able to leave every cell of the zone
	mask: MovementModeMask,
	/// Number of cells in the zone
	cell_count: u32,
}

impl ZoneInfo {
	/// Create a new instance of [ZoneInfo]
	pub fn new(mask: MovementModeMask, cell_count: u32) -> Self {
		ZoneInfo { mask, cell_count }
	}
	pub fn get_mask(&self) -> MovementModeMask {
		self.mask
	}
	pub fn get_cell_count(&self) -> u32 {
		self.cell_count
	}
	/// A single cell zone, its edges are found by inspecting the neighbours
	/// of the cell rather than walking a boundary
	pub fn is_isolated(&self) -> bool {
		self.cell_count == 1
	}
}

/// Zones of a single tile
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, PartialEq, Debug)]
pub struct RegionTile {
	/// Number of cells along each side
	resolution: usize,
	/// Zone of every cell in row-major order
	cells: Vec<ZoneCell>,
	/// Zones indexed by [TraversableZoneId]
	zones: Vec<ZoneInfo>,
	/// What needs recomputing
	state: RegionEdgeState,
}

impl RegionTile {
	/// Create an unpainted tile flagged as [RegionEdgeState::DIRTY]
	pub fn new(resolution: usize) -> Self {
		RegionTile {
			resolution,
			cells: vec![ZoneCell::default(); resolution * resolution],
			zones: Vec::new(),
			state: RegionEdgeState::DIRTY,
		}
	}
	pub fn get_resolution(&self) -> usize {
		self.resolution
	}
	/// Index of a cell, panics if out of bounds
	fn index_of(&self, cell: FieldCell) -> usize {
		if cell.get_column() >= self.resolution || cell.get_row() >= self.resolution {
			panic!("Cannot access a RegionTile cell, index out of bounds. Asked for column {}, row {}, tile resolution is {}", cell.get_column(), cell.get_row(), self.resolution)
		}
		cell.get_index(self.resolution)
	}
	pub fn get_cell(&self, cell: FieldCell) -> &ZoneCell {
		&self.cells[self.index_of(cell)]
	}
	pub fn get_cell_mut(&mut self, cell: FieldCell) -> &mut ZoneCell {
		let index = self.index_of(cell);
		&mut self.cells[index]
	}
	/// Assign a cell to a zone
	pub fn set_cell(&mut self, cell: FieldCell, zone_cell: ZoneCell) {
		let index = self.index_of(cell);
		self.cells[index] = zone_cell;
	}
	/// Every cell in row-major order
	pub fn get_cells(&self) -> &[ZoneCell] {
		&self.cells
	}
	pub fn get_zones(&self) -> &[ZoneInfo] {
		&self.zones
	}
	pub fn get_zone_info(&self, zone: TraversableZoneId) -> Option<&ZoneInfo> {
		self.zones.get(zone.get() as usize)
	}
	/// Ids of every zone of the tile
	pub fn get_zone_ids(&self) -> impl Iterator<Item = TraversableZoneId> {
		(0..self.zones.len()).map(|i| TraversableZoneId::new(i as u16))
	}
	/// Cells belonging to a zone in row-major order
	pub fn get_zone_cells(&self, zone: TraversableZoneId) -> impl Iterator<Item = FieldCell> + '_ {
		let resolution = self.resolution;
		self.cells
			.iter()
			.enumerate()
			.filter(move |(_, c)| c.zone == zone)
			.map(move |(i, _)| FieldCell::from_index(i, resolution))
	}
	/// Register a new zone and get its id
	pub fn push_zone(&mut self, info: ZoneInfo) -> TraversableZoneId {
		let id = TraversableZoneId::new(self.zones.len() as u16);
		if id.is_empty() {
			panic!("RegionTile cannot hold more than {} zones", u16::MAX);
		}
		self.zones.push(info);
		id
	}
	/// Overwrite the summary of a zone
	pub fn set_zone_info(&mut self, zone: TraversableZoneId, info: ZoneInfo) {
		match self.zones.get_mut(zone.get() as usize) {
			Some(existing) => *existing = info,
			None => panic!("Zone {:?} does not exist in this RegionTile", zone),
		}
	}
	/// Forget every zone, cells become unassigned
	pub fn reset(&mut self) {
		self.cells.fill(ZoneCell::default());
		self.zones.clear();
	}
	pub fn get_state(&self) -> RegionEdgeState {
		self.state
	}
	/// Add flags to the state
	pub fn mark(&mut self, state: RegionEdgeState) {
		self.state |= state;
	}
	/// Clear every flag
	pub fn mark_clean(&mut self) {
		self.state = RegionEdgeState::CLEAN;
	}
}
