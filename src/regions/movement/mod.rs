//! Movement modes describe the different ways an actor can traverse the world
//! (walking, flying, swimming...). Each mode is registered once and assigned
//! a small stable index so that the set of modes able to traverse a cell can
//! be stored as a bitmask.
//!
//! A mode is always paired with a [DistanceCalculation] to form a
//! [MovementCombination]. The combination decides how diagonal steps are
//! weighed when edge costs are calculated.
//!

pub mod movement_field;

use crate::prelude::*;
use bevy::prelude::*;

/// Maximum number of modes a [MovementModeEncoding] can hold
pub const MAX_MOVEMENT_MODES: usize = 255;
/// Number of modes that can be represented in a [MovementModeMask]
pub const MAX_MASKABLE_MODES: usize = 64;

/// Identifier of a movement mode as used by the movement data provider
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct MovementMode(u32);

impl MovementMode {
	/// Create a new instance of [MovementMode]
	pub const fn new(id: u32) -> Self {
		MovementMode(id)
	}
	pub fn get(&self) -> u32 {
		self.0
	}
}

/// Stable index of a registered [MovementMode]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct MovementModeIndex(u8);

impl MovementModeIndex {
	/// Create a new instance of [MovementModeIndex]
	pub fn new(index: u8) -> Self {
		MovementModeIndex(index)
	}
	pub fn get(&self) -> u8 {
		self.0
	}
}

/// Set of movement modes, bit `n` is the mode with [MovementModeIndex] `n`
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct MovementModeMask(u64);

impl MovementModeMask {
	/// No modes
	pub const EMPTY: MovementModeMask = MovementModeMask(0);
	/// Create from raw bits
	pub fn new(bits: u64) -> Self {
		MovementModeMask(bits)
	}
	pub fn get(&self) -> u64 {
		self.0
	}
	/// Add a mode, indices beyond the mask capacity are ignored
	pub fn insert(&mut self, index: MovementModeIndex) {
		if (index.get() as usize) < MAX_MASKABLE_MODES {
			self.0 |= 1 << index.get();
		}
	}
	pub fn contains(&self, index: MovementModeIndex) -> bool {
		(index.get() as usize) < MAX_MASKABLE_MODES && self.0 & (1 << index.get()) != 0
	}
	pub fn is_empty(&self) -> bool {
		self.0 == 0
	}
	/// Modes present in both masks
	pub fn intersection(&self, other: &MovementModeMask) -> MovementModeMask {
		MovementModeMask(self.0 & other.0)
	}
}

/// Assigns each registered [MovementMode] a stable [MovementModeIndex] in
/// order of registration
#[derive(Clone, Default, Debug)]
pub struct MovementModeEncoding {
	/// Registered modes, a mode's position is its index
	modes: Vec<MovementMode>,
}

impl MovementModeEncoding {
	/// Register a mode and get its index. Registering an already known mode
	/// returns the existing index
	pub fn try_register(&mut self, mode: MovementMode) -> Result<MovementModeIndex, RegionError> {
		if let Some(index) = self.get_index(mode) {
			return Ok(index);
		}
		if self.modes.len() >= MAX_MOVEMENT_MODES {
			return Err(RegionError::ModeCapacityExceeded {
				mode,
				limit: MAX_MOVEMENT_MODES,
			});
		}
		self.modes.push(mode);
		Ok(MovementModeIndex::new((self.modes.len() - 1) as u8))
	}
	/// Get the index of a registered mode
	pub fn get_index(&self, mode: MovementMode) -> Option<MovementModeIndex> {
		self.modes
			.iter()
			.position(|m| *m == mode)
			.map(|i| MovementModeIndex::new(i as u8))
	}
	/// Get the mode registered at an index
	pub fn get_mode(&self, index: MovementModeIndex) -> Option<MovementMode> {
		self.modes.get(index.get() as usize).copied()
	}
	pub fn len(&self) -> usize {
		self.modes.len()
	}
	pub fn is_empty(&self) -> bool {
		self.modes.is_empty()
	}
	/// Iterate over every `(index, mode)` in order of registration
	pub fn iter(&self) -> impl Iterator<Item = (MovementModeIndex, MovementMode)> + '_ {
		self.modes
			.iter()
			.enumerate()
			.map(|(i, mode)| (MovementModeIndex::new(i as u8), *mode))
	}
}

/// How the distance of a step is measured
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub enum DistanceCalculation {
	/// Diagonal steps are allowed and cost `√2`
	#[default]
	Euclidean,
	/// Only orthogonal steps are allowed
	Manhattan,
	/// Diagonal steps are allowed and cost the same as orthogonal ones
	Chebyshev,
}

impl DistanceCalculation {
	/// Combine two styles into the most restrictive of the pair. Manhattan
	/// dominates Chebyshev which dominates Euclidean
	pub fn combine(&self, other: DistanceCalculation) -> DistanceCalculation {
		match (self, other) {
			(DistanceCalculation::Manhattan, _) | (_, DistanceCalculation::Manhattan) => {
				DistanceCalculation::Manhattan
			}
			(DistanceCalculation::Chebyshev, _) | (_, DistanceCalculation::Chebyshev) => {
				DistanceCalculation::Chebyshev
			}
			_ => DistanceCalculation::Euclidean,
		}
	}
	/// Can a step be taken in direction `ordinal`
	pub fn allows(&self, ordinal: Ordinal) -> bool {
		match self {
			DistanceCalculation::Manhattan => !ordinal.is_diagonal(),
			_ => true,
		}
	}
	/// Length of a single step in direction `ordinal`. A Manhattan diagonal is
	/// never taken directly, it is reported as the two orthogonal steps it
	/// stands for
	pub fn get_step_length(&self, ordinal: Ordinal) -> f32 {
		if !ordinal.is_diagonal() {
			return 1.0;
		}
		match self {
			DistanceCalculation::Euclidean => std::f32::consts::SQRT_2,
			DistanceCalculation::Manhattan => 2.0,
			DistanceCalculation::Chebyshev => 1.0,
		}
	}
	/// Distance between two cells that are `dx` columns and `dy` rows apart,
	/// assuming every step costs `1`
	pub fn get_distance(&self, dx: u32, dy: u32) -> f32 {
		let (low, high) = if dx < dy { (dx, dy) } else { (dy, dx) };
		match self {
			DistanceCalculation::Euclidean => {
				(high - low) as f32 + low as f32 * std::f32::consts::SQRT_2
			}
			DistanceCalculation::Manhattan => (dx + dy) as f32,
			DistanceCalculation::Chebyshev => high as f32,
		}
	}
}

/// A registered pairing of movement mode and distance style. Edge costs are
/// recorded once per combination
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Reflect)]
pub struct MovementCombination {
	/// Index of the movement mode
	mode_index: MovementModeIndex,
	/// How steps are measured
	distance: DistanceCalculation,
}

impl MovementCombination {
	/// Create a new instance of [MovementCombination]
	pub fn new(mode_index: MovementModeIndex, distance: DistanceCalculation) -> Self {
		MovementCombination {
			mode_index,
			distance,
		}
	}
	pub fn get_mode_index(&self) -> MovementModeIndex {
		self.mode_index
	}
	pub fn get_distance(&self) -> DistanceCalculation {
		self.distance
	}
}
