//! Spatial indices over tiles. A [RegionView] is a two level lookup, first by
//! layer and then by the `(column, row)` of a tile within the layer. The zone
//! data of each tile lives in one view and the edge data in a parallel one,
//! so that edges of one tile can be written while the zones of every tile are
//! read.
//!

pub mod edge_view;
pub mod zone_view;

use std::collections::BTreeMap;
use std::ops::{BitOr, BitOrAssign};

use crate::prelude::*;

/// Per layer, per tile storage of `T`
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct RegionView<T> {
	/// Tiles of each layer keyed by `(column, row)`
	layers: BTreeMap<i32, BTreeMap<(i32, i32), T>>,
}

impl<T> Default for RegionView<T> {
	fn default() -> Self {
		RegionView {
			layers: BTreeMap::new(),
		}
	}
}

impl<T> RegionView<T> {
	/// Create a new empty instance of [RegionView]
	pub fn new() -> Self {
		RegionView::default()
	}
	pub fn get(&self, tile: &TileID) -> Option<&T> {
		self.layers.get(&tile.get_layer())?.get(&tile.get_coords())
	}
	pub fn get_mut(&mut self, tile: &TileID) -> Option<&mut T> {
		self.layers
			.get_mut(&tile.get_layer())?
			.get_mut(&tile.get_coords())
	}
	pub fn contains(&self, tile: &TileID) -> bool {
		self.get(tile).is_some()
	}
	/// Store a value for a tile, returning any value it replaced
	pub fn insert(&mut self, tile: TileID, value: T) -> Option<T> {
		self.layers
			.entry(tile.get_layer())
			.or_default()
			.insert(tile.get_coords(), value)
	}
	/// Get the value of a tile, inserting one created by `f` if missing
	pub fn get_or_insert_with<F: FnOnce() -> T>(&mut self, tile: TileID, f: F) -> &mut T {
		self.layers
			.entry(tile.get_layer())
			.or_default()
			.entry(tile.get_coords())
			.or_insert_with(f)
	}
	/// Remove the value of a tile, empty layers are dropped
	pub fn remove(&mut self, tile: &TileID) -> Option<T> {
		let layer = self.layers.get_mut(&tile.get_layer())?;
		let removed = layer.remove(&tile.get_coords());
		if layer.is_empty() {
			self.layers.remove(&tile.get_layer());
		}
		removed
	}
	/// Number of tiles stored
	pub fn len(&self) -> usize {
		self.layers.values().map(|l| l.len()).sum()
	}
	pub fn is_empty(&self) -> bool {
		self.layers.is_empty()
	}
	/// Iterate over every tile, ordered by layer then row-major `(column, row)`
	/// key order
	pub fn iter(&self) -> impl Iterator<Item = (TileID, &T)> {
		self.layers.iter().flat_map(|(layer, tiles)| {
			tiles
				.iter()
				.map(move |((column, row), value)| (TileID::new(*column, *row, *layer), value))
		})
	}
	pub fn iter_mut(&mut self) -> impl Iterator<Item = (TileID, &mut T)> {
		self.layers.iter_mut().flat_map(|(layer, tiles)| {
			let layer = *layer;
			tiles
				.iter_mut()
				.map(move |((column, row), value)| (TileID::new(*column, *row, layer), value))
		})
	}
	/// Every tile stored
	pub fn keys(&self) -> impl Iterator<Item = TileID> + '_ {
		self.iter().map(|(tile, _)| tile)
	}
}

/// Flag bits of a [RegionEdgeState]
const STATE_EDGE_NORTH: u8 = 0b0000_0001;
/// Eastern strip flag
const STATE_EDGE_EAST: u8 = 0b0000_0010;
/// Southern strip flag
const STATE_EDGE_SOUTH: u8 = 0b0000_0100;
/// Western strip flag
const STATE_EDGE_WEST: u8 = 0b0000_1000;
/// Whole tile flag
const STATE_DIRTY: u8 = 0b0001_0000;
/// Costs only flag
const STATE_PATH_DIRTY: u8 = 0b0010_0000;
/// Removal flag
const STATE_MARKED_FOR_REMOVE: u8 = 0b0100_0000;

/// What needs recomputing in a tile. Flags combine with `|`
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct RegionEdgeState(u8);

impl RegionEdgeState {
	/// Nothing to do
	pub const CLEAN: RegionEdgeState = RegionEdgeState(0);
	/// The northern strip of cells needs re-evaluation
	pub const EDGE_NORTH: RegionEdgeState = RegionEdgeState(STATE_EDGE_NORTH);
	/// The eastern strip of cells needs re-evaluation
	pub const EDGE_EAST: RegionEdgeState = RegionEdgeState(STATE_EDGE_EAST);
	/// The southern strip of cells needs re-evaluation
	pub const EDGE_SOUTH: RegionEdgeState = RegionEdgeState(STATE_EDGE_SOUTH);
	/// The western strip of cells needs re-evaluation
	pub const EDGE_WEST: RegionEdgeState = RegionEdgeState(STATE_EDGE_WEST);
	/// The whole tile must be repainted
	pub const DIRTY: RegionEdgeState = RegionEdgeState(STATE_DIRTY);
	/// Edges are valid but their costs must be recalculated
	pub const PATH_DIRTY: RegionEdgeState = RegionEdgeState(STATE_PATH_DIRTY);
	/// The backing data of the tile has gone
	pub const MARKED_FOR_REMOVE: RegionEdgeState = RegionEdgeState(STATE_MARKED_FOR_REMOVE);

	pub fn get(&self) -> u8 {
		self.0
	}
	/// Are all flags of `other` set
	pub fn contains(&self, other: RegionEdgeState) -> bool {
		self.0 & other.0 == other.0
	}
	/// Is any flag of `other` set
	pub fn intersects(&self, other: RegionEdgeState) -> bool {
		self.0 & other.0 != 0
	}
	pub fn is_clean(&self) -> bool {
		self.0 == 0
	}
	/// Flags for the strip of cells along `side`, a diagonal sets both sides
	/// meeting at its corner
	pub fn for_side(side: Ordinal) -> RegionEdgeState {
		match side {
			Ordinal::North => RegionEdgeState::EDGE_NORTH,
			Ordinal::East => RegionEdgeState::EDGE_EAST,
			Ordinal::South => RegionEdgeState::EDGE_SOUTH,
			Ordinal::West => RegionEdgeState::EDGE_WEST,
			diagonal => match diagonal.get_cardinal_components() {
				Some((a, b)) => RegionEdgeState::for_side(a) | RegionEdgeState::for_side(b),
				None => RegionEdgeState::CLEAN,
			},
		}
	}
	/// Sides whose strip flag is set
	pub fn get_sides(&self) -> Vec<Ordinal> {
		Ordinal::CARDINALS
			.into_iter()
			.filter(|side| self.contains(RegionEdgeState::for_side(*side)))
			.collect()
	}
	/// Is any strip flag set
	pub fn has_sides(&self) -> bool {
		self.0 & (STATE_EDGE_NORTH | STATE_EDGE_EAST | STATE_EDGE_SOUTH | STATE_EDGE_WEST) != 0
	}
	/// Is the tile to be fully repainted or removed
	pub fn is_dirty_or_removed(&self) -> bool {
		self.intersects(RegionEdgeState::DIRTY | RegionEdgeState::MARKED_FOR_REMOVE)
	}
}

impl BitOr for RegionEdgeState {
	type Output = RegionEdgeState;
	fn bitor(self, rhs: Self) -> Self::Output {
		RegionEdgeState(self.0 | rhs.0)
	}
}

impl BitOrAssign for RegionEdgeState {
	fn bitor_assign(&mut self, rhs: Self) {
		self.0 |= rhs.0;
	}
}

/// Notification from the movement data provider about a tile
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TileChange {
	/// Data for the tile became available
	Created,
	/// Costs or directionality of the tile changed
	Modified,
	/// Only the magnitude of costs changed, traversability is unaffected
	CostsChanged,
	/// Data along one side of the tile changed
	BoundaryChanged(Ordinal),
	/// The tile's data is gone
	Expired,
}

impl TileChange {
	/// The flags the change sets on its tile
	pub fn get_state(&self) -> RegionEdgeState {
		match self {
			TileChange::Created | TileChange::Modified => RegionEdgeState::DIRTY,
			TileChange::CostsChanged => RegionEdgeState::PATH_DIRTY,
			TileChange::BoundaryChanged(side) => RegionEdgeState::for_side(*side),
			TileChange::Expired => RegionEdgeState::MARKED_FOR_REMOVE,
		}
	}
}
