//! Useful structures and tools shared by the painter, the edge detector and
//! the cost calculator
//!

use bevy::prelude::*;

/// Lower bound on the number of steps a single boundary walk may take before
/// it is considered malformed
pub const MIN_BOUNDARY_WALK_STEPS: usize = 10_000;

/// Maximum number of steps a boundary walk across a tile of `cell_count`
/// cells may take
pub fn get_boundary_walk_limit(cell_count: usize) -> usize {
	MIN_BOUNDARY_WALK_STEPS.max(16 * cell_count + 16)
}

/// The 8 directions of movement out of a grid cell, ordered clockwise from
/// North. Rows grow southwards so North is `(0, -1)`
///
/// ```text
///  _____________________________
/// |         |         |         |
/// |   NW 7  |   N 0   |  NE 1   |
/// |_________|_________|_________|
/// |         |         |         |
/// |   W 6   |    x    |   E 2   |
/// |_________|_________|_________|
/// |         |         |         |
/// |   SW 5  |   S 4   |  SE 3   |
/// |_________|_________|_________|
/// ```
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Reflect)]
pub enum Ordinal {
	North,
	NorthEast,
	East,
	SouthEast,
	South,
	SouthWest,
	West,
	NorthWest,
}

impl Ordinal {
	/// Every direction in clockwise order starting at North
	pub const ALL: [Ordinal; 8] = [
		Ordinal::North,
		Ordinal::NorthEast,
		Ordinal::East,
		Ordinal::SouthEast,
		Ordinal::South,
		Ordinal::SouthWest,
		Ordinal::West,
		Ordinal::NorthWest,
	];
	/// The four sides of a cell or tile
	pub const CARDINALS: [Ordinal; 4] = [
		Ordinal::North,
		Ordinal::East,
		Ordinal::South,
		Ordinal::West,
	];
	/// Position of the direction in the clockwise ordering
	pub fn get_index(&self) -> usize {
		*self as usize
	}
	/// Direction at a clockwise position, wraps around
	pub fn from_index(index: usize) -> Ordinal {
		Ordinal::ALL[index % 8]
	}
	/// Returns the opposite [Ordinal] of the current
	pub fn inverse(&self) -> Ordinal {
		self.rotate_clockwise(4)
	}
	/// Turn clockwise by `steps` eighths of a full rotation
	pub fn rotate_clockwise(&self, steps: usize) -> Ordinal {
		Ordinal::from_index(self.get_index() + steps % 8)
	}
	/// Turn counter-clockwise by `steps` eighths of a full rotation
	pub fn rotate_counter_clockwise(&self, steps: usize) -> Ordinal {
		Ordinal::from_index(self.get_index() + 8 - steps % 8)
	}
	/// `true` for NE, SE, SW and NW
	pub fn is_diagonal(&self) -> bool {
		self.get_index() % 2 == 1
	}
	/// The `(column, row)` offset of a neighbour lying in this direction
	pub fn get_offset(&self) -> (i32, i32) {
		match self {
			Ordinal::North => (0, -1),
			Ordinal::NorthEast => (1, -1),
			Ordinal::East => (1, 0),
			Ordinal::SouthEast => (1, 1),
			Ordinal::South => (0, 1),
			Ordinal::SouthWest => (-1, 1),
			Ordinal::West => (-1, 0),
			Ordinal::NorthWest => (-1, -1),
		}
	}
	/// A diagonal is made of the two cardinal directions either side of it,
	/// a cardinal has no components
	pub fn get_cardinal_components(&self) -> Option<(Ordinal, Ordinal)> {
		if self.is_diagonal() {
			Some((self.rotate_counter_clockwise(1), self.rotate_clockwise(1)))
		} else {
			None
		}
	}
	/// For two cells next to each other find the [Ordinal] pointing from the
	/// `source` to the `target`
	pub fn cell_to_cell_direction(target: (i32, i32), source: (i32, i32)) -> Option<Self> {
		let direction = (target.0 - source.0, target.1 - source.1);
		Ordinal::ALL
			.iter()
			.find(|ordinal| ordinal.get_offset() == direction)
			.copied()
	}
}

/// Bit of each [Ordinal] inside a [DirectionalityInformation]
const BITS_NORTH: u8 = 0b0000_0001;
/// North-east bit
const BITS_NORTH_EAST: u8 = 0b0000_0010;
/// East bit
const BITS_EAST: u8 = 0b0000_0100;
/// South-east bit
const BITS_SOUTH_EAST: u8 = 0b0000_1000;
/// South bit
const BITS_SOUTH: u8 = 0b0001_0000;
/// South-west bit
const BITS_SOUTH_WEST: u8 = 0b0010_0000;
/// West bit
const BITS_WEST: u8 = 0b0100_0000;
/// North-west bit
const BITS_NORTH_WEST: u8 = 0b1000_0000;

/// An 8-bit set of compass directions. Used for the raw movement permissions
/// out of and into a cell and for the directions of a cell that form part of
/// a zone boundary
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Reflect)]
pub struct DirectionalityInformation(u8);

impl DirectionalityInformation {
	/// No direction
	pub const NONE: DirectionalityInformation = DirectionalityInformation(0);
	/// Every direction
	pub const ALL: DirectionalityInformation = DirectionalityInformation(u8::MAX);
	/// Create from raw bits, bit `n` is the [Ordinal] with index `n`
	pub fn new(bits: u8) -> Self {
		DirectionalityInformation(bits)
	}
	/// Create from a list of directions
	pub fn from_ordinals(ordinals: &[Ordinal]) -> Self {
		let mut info = DirectionalityInformation::NONE;
		for ordinal in ordinals {
			info.insert(*ordinal);
		}
		info
	}
	/// Get the raw bits
	pub fn get(&self) -> u8 {
		self.0
	}
	/// Bit representing an [Ordinal]
	fn bit(ordinal: Ordinal) -> u8 {
		match ordinal {
			Ordinal::North => BITS_NORTH,
			Ordinal::NorthEast => BITS_NORTH_EAST,
			Ordinal::East => BITS_EAST,
			Ordinal::SouthEast => BITS_SOUTH_EAST,
			Ordinal::South => BITS_SOUTH,
			Ordinal::SouthWest => BITS_SOUTH_WEST,
			Ordinal::West => BITS_WEST,
			Ordinal::NorthWest => BITS_NORTH_WEST,
		}
	}
	pub fn contains(&self, ordinal: Ordinal) -> bool {
		self.0 & Self::bit(ordinal) != 0
	}
	pub fn insert(&mut self, ordinal: Ordinal) {
		self.0 |= Self::bit(ordinal);
	}
	pub fn remove(&mut self, ordinal: Ordinal) {
		self.0 &= !Self::bit(ordinal);
	}
	pub fn is_empty(&self) -> bool {
		self.0 == 0
	}
	/// Number of directions set
	pub fn count(&self) -> u32 {
		self.0.count_ones()
	}
	/// Directions that are set, clockwise from North
	pub fn iter(&self) -> impl Iterator<Item = Ordinal> + '_ {
		Ordinal::ALL.into_iter().filter(|o| self.contains(*o))
	}
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn inverse_of_each() {
		let result: Vec<Ordinal> = Ordinal::ALL.iter().map(|o| o.inverse()).collect();
		let actual = vec![
			Ordinal::South,
			Ordinal::SouthWest,
			Ordinal::West,
			Ordinal::NorthWest,
			Ordinal::North,
			Ordinal::NorthEast,
			Ordinal::East,
			Ordinal::SouthEast,
		];
		assert_eq!(actual, result);
	}
	#[test]
	fn rotate_wraps() {
		assert_eq!(Ordinal::North, Ordinal::NorthWest.rotate_clockwise(1));
		assert_eq!(Ordinal::NorthWest, Ordinal::North.rotate_counter_clockwise(1));
		assert_eq!(Ordinal::East, Ordinal::West.rotate_clockwise(4));
		assert_eq!(Ordinal::SouthEast, Ordinal::SouthEast.rotate_clockwise(8));
	}
	#[test]
	fn diagonal_components() {
		assert_eq!(
			Some((Ordinal::North, Ordinal::East)),
			Ordinal::NorthEast.get_cardinal_components()
		);
		assert_eq!(
			Some((Ordinal::West, Ordinal::North)),
			Ordinal::NorthWest.get_cardinal_components()
		);
		assert_eq!(None, Ordinal::South.get_cardinal_components());
	}
	#[test]
	fn cell_to_cell_south_west() {
		let result = Ordinal::cell_to_cell_direction((6, 9), (7, 8));
		assert_eq!(Some(Ordinal::SouthWest), result);
	}
	#[test]
	fn cell_to_cell_not_adjacent() {
		let result = Ordinal::cell_to_cell_direction((6, 9), (9, 9));
		assert_eq!(None, result);
	}
	#[test]
	fn directionality_insert_remove() {
		let mut info = DirectionalityInformation::NONE;
		info.insert(Ordinal::East);
		info.insert(Ordinal::NorthWest);
		assert!(info.contains(Ordinal::East));
		assert!(!info.contains(Ordinal::West));
		assert_eq!(0b1000_0100, info.get());
		info.remove(Ordinal::East);
		assert_eq!(vec![Ordinal::NorthWest], info.iter().collect::<Vec<_>>());
		info.remove(Ordinal::NorthWest);
		assert!(info.is_empty());
	}
	#[test]
	fn directionality_all() {
		assert_eq!(8, DirectionalityInformation::ALL.count());
	}
	#[test]
	fn walk_limit_small_tile() {
		assert_eq!(10_000, get_boundary_walk_limit(100));
	}
	#[test]
	fn walk_limit_large_tile() {
		assert_eq!(16 * 1024 + 16, get_boundary_walk_limit(1024));
	}
}
