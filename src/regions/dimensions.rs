//! The world is an unbounded grid of cells, stacked into layers. Each layer is
//! split into square tiles of `tile_resolution x tile_resolution` cells and
//! every tile is painted and detected independently.
//!
//! ```text
//!          column -1         column 0          column 1
//!       ___________________________________________________
//!      |                |                |                |
//! row  |  TileID        |  TileID        |  TileID        |
//!  -1  |  (-1, -1)      |  (0, -1)       |  (1, -1)       |
//!      |________________|________________|________________|
//!      |                |  (0,0)         |                |
//! row  |  TileID        |    x           |  TileID        |
//!   0  |  (-1, 0)       |  TileID (0, 0) |  (1, 0)        |
//!      |________________|________________|________________|
//! ```
//!
//! A [GridPosition] is a global cell coordinate, a [FieldCell] is the
//! `(column, row)` of a cell inside its tile. Rows grow southwards.
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Global position of a cell
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct GridPosition {
	/// Global column, grows eastwards
	column: i32,
	/// Global row, grows southwards
	row: i32,
	/// Layer the cell belongs to
	layer: i32,
}

impl GridPosition {
	/// Create a new instance of [GridPosition]
	pub fn new(column: i32, row: i32, layer: i32) -> Self {
		GridPosition { column, row, layer }
	}
	pub fn get_column(&self) -> i32 {
		self.column
	}
	pub fn get_row(&self) -> i32 {
		self.row
	}
	pub fn get_layer(&self) -> i32 {
		self.layer
	}
	/// The neighbouring position lying in direction `ordinal`
	pub fn step(&self, ordinal: Ordinal) -> GridPosition {
		let (dx, dy) = ordinal.get_offset();
		GridPosition::new(self.column + dx, self.row + dy, self.layer)
	}
}

/// Unique ID of a tile, `(column, row)` within a `layer`
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct TileID {
	/// Tile column
	column: i32,
	/// Tile row
	row: i32,
	/// Layer of the tile
	layer: i32,
}

impl TileID {
	/// Create a new instance of [TileID]
	pub fn new(column: i32, row: i32, layer: i32) -> Self {
		TileID { column, row, layer }
	}
	pub fn get_column(&self) -> i32 {
		self.column
	}
	pub fn get_row(&self) -> i32 {
		self.row
	}
	pub fn get_layer(&self) -> i32 {
		self.layer
	}
	/// The `(column, row)` of the tile within its layer
	pub fn get_coords(&self) -> (i32, i32) {
		(self.column, self.row)
	}
	/// The adjacent tile in direction `ordinal`
	pub fn get_neighbour(&self, ordinal: Ordinal) -> TileID {
		let (dx, dy) = ordinal.get_offset();
		TileID::new(self.column + dx, self.row + dy, self.layer)
	}
	/// All 8 adjacent tiles along with the [Ordinal] pointing at them
	pub fn get_neighbours_with_ordinal(&self) -> [(Ordinal, TileID); 8] {
		Ordinal::ALL.map(|ordinal| (ordinal, self.get_neighbour(ordinal)))
	}
	/// Number of tiles between two tiles when moving in 8 directions, tiles on
	/// different layers are infinitely far apart
	pub fn get_chebyshev_distance(&self, other: &TileID) -> Option<u32> {
		if self.layer != other.layer {
			return None;
		}
		let dx = self.column.abs_diff(other.column);
		let dy = self.row.abs_diff(other.row);
		Some(dx.max(dy))
	}
}

/// ID of a cell inside a tile in `(column, row)` format
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct FieldCell((usize, usize));

impl FieldCell {
	/// Create a new instance of [FieldCell]
	pub fn new(column: usize, row: usize) -> Self {
		FieldCell((column, row))
	}
	/// Get the `(column, row)` tuple
	pub fn get_column_row(&self) -> (usize, usize) {
		self.0
	}
	pub fn get_column(&self) -> usize {
		self.0 .0
	}
	pub fn get_row(&self) -> usize {
		self.0 .1
	}
	/// Row-major index of the cell in a tile of `resolution` columns
	pub fn get_index(&self, resolution: usize) -> usize {
		self.get_row() * resolution + self.get_column()
	}
	/// Inverse of [FieldCell::get_index]
	pub fn from_index(index: usize, resolution: usize) -> Self {
		FieldCell::new(index % resolution, index / resolution)
	}
}

/// Largest supported tile resolution, a tile must fit every cell into a
/// distinct [crate::prelude::TraversableZoneId]
pub const MAX_TILE_RESOLUTION: u32 = 255;

/// Size of the tiles of a world
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Clone, Copy, PartialEq, Eq, Debug, Reflect)]
pub struct RegionDimensions {
	/// Number of cells along each side of a tile
	tile_resolution: u32,
}

impl Default for RegionDimensions {
	fn default() -> Self {
		RegionDimensions {
			tile_resolution: 10,
		}
	}
}

impl RegionDimensions {
	/// Create a new instance of [RegionDimensions]. The resolution must be
	/// between `1` and [MAX_TILE_RESOLUTION]
	pub fn new(tile_resolution: u32) -> Self {
		if tile_resolution == 0 || tile_resolution > MAX_TILE_RESOLUTION {
			panic!(
				"Tile resolution {} is not supported, it must be within 1..={}",
				tile_resolution, MAX_TILE_RESOLUTION
			);
		}
		RegionDimensions { tile_resolution }
	}
	pub fn get_tile_resolution(&self) -> u32 {
		self.tile_resolution
	}
	/// Number of cells in a tile
	pub fn get_cell_count(&self) -> usize {
		(self.tile_resolution * self.tile_resolution) as usize
	}
	/// Find the tile a position resides in
	pub fn get_tile_of(&self, position: &GridPosition) -> TileID {
		let resolution = self.tile_resolution as i32;
		TileID::new(
			position.get_column().div_euclid(resolution),
			position.get_row().div_euclid(resolution),
			position.get_layer(),
		)
	}
	/// Find the local cell of a position within its tile
	pub fn get_field_cell(&self, position: &GridPosition) -> FieldCell {
		let resolution = self.tile_resolution as i32;
		FieldCell::new(
			position.get_column().rem_euclid(resolution) as usize,
			position.get_row().rem_euclid(resolution) as usize,
		)
	}
	/// Global position of the top left cell of a tile
	pub fn get_tile_origin(&self, tile: &TileID) -> GridPosition {
		let resolution = self.tile_resolution as i32;
		GridPosition::new(
			tile.get_column() * resolution,
			tile.get_row() * resolution,
			tile.get_layer(),
		)
	}
	/// Global position of a cell of a tile
	pub fn get_global_position(&self, tile: &TileID, cell: FieldCell) -> GridPosition {
		let origin = self.get_tile_origin(tile);
		GridPosition::new(
			origin.get_column() + cell.get_column() as i32,
			origin.get_row() + cell.get_row() as i32,
			origin.get_layer(),
		)
	}
	/// If `position` is inside `tile` get its local cell
	pub fn get_local_cell(&self, tile: &TileID, position: &GridPosition) -> Option<FieldCell> {
		if self.get_tile_of(position) == *tile {
			Some(self.get_field_cell(position))
		} else {
			None
		}
	}
	/// Is the cell part of the strip of cells running along side `side` of
	/// its tile. A diagonal names a corner and only the corner cell matches
	pub fn is_in_strip(&self, cell: FieldCell, side: Ordinal) -> bool {
		let last = self.tile_resolution as usize - 1;
		match side {
			Ordinal::North => cell.get_row() == 0,
			Ordinal::East => cell.get_column() == last,
			Ordinal::South => cell.get_row() == last,
			Ordinal::West => cell.get_column() == 0,
			diagonal => match diagonal.get_cardinal_components() {
				Some((a, b)) => self.is_in_strip(cell, a) && self.is_in_strip(cell, b),
				None => false,
			},
		}
	}
}
