//! The painter splits a tile into zones. A zone is a maximal connected group
//! of cells sharing an identical set of movement modes able to leave them.
//!
//! Consider a tile where walkers can use every cell except a river (`~`) that
//! only swimmers can cross and a wall (`#`) nothing can cross:
//!
//! ```text
//!  _______________________________
//! |     |     |     |     |     |
//! |  .  |  .  |  ~  |  .  |  .  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  .  |  .  |  ~  |  #  |  .  |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! |  .  |  .  |  ~  |  .  |  .  |
//! |_____|_____|_____|_____|_____|
//! ```
//!
//! Painting produces three zones, the walkable cells west of the river, the
//! river itself and the walkable cells east of it. The wall belongs to no
//! zone.
//!
//! Alongside the zone of each cell the painter records the boundary of the
//! cell, the traversable directions that leave its zone. A diagonal that
//! cuts the corner next to a cardinal boundary direction is dropped from the
//! boundary so a crossing is never counted twice.
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Paints the zones of tiles for a fixed set of movement modes.
///
/// Two cells join when a step connects them in either direction, so a zone
/// is not guaranteed to be strongly connected. A cost table missing a path
/// between two edges of a zone means there is no route between them
pub struct RegionPainter<'a> {
	/// Size of the tiles
	dimensions: RegionDimensions,
	/// Registered modes
	modes: &'a [(MovementModeIndex, MovementMode)],
	/// Style governing which steps connect cells
	style: DistanceCalculation,
}

impl<'a> RegionPainter<'a> {
	/// Create a new instance of [RegionPainter]
	pub fn new(
		dimensions: RegionDimensions,
		modes: &'a [(MovementModeIndex, MovementMode)],
		style: DistanceCalculation,
	) -> Self {
		RegionPainter {
			dimensions,
			modes,
			style,
		}
	}
	/// Repaint every cell of a tile from scratch
	pub fn paint<P: MovementDataProvider>(
		&self,
		provider: &P,
		tile: TileID,
		region_tile: &mut RegionTile,
		scratch: &mut ScratchBuffers,
	) {
		let resolution = self.dimensions.get_tile_resolution() as usize;
		let cell_count = self.dimensions.get_cell_count();
		if region_tile.get_resolution() != resolution {
			panic!(
				"RegionTile {:?} has resolution {}, expected {}",
				tile,
				region_tile.get_resolution(),
				resolution
			);
		}
		region_tile.reset();
		let neighbourhood = MovementNeighbourhood::new(provider, tile, self.dimensions, self.modes);
		scratch.masks.clear();
		for index in 0..cell_count {
			let position = self.get_position(&tile, index);
			scratch.masks.push(neighbourhood.get_leave_mask(&position));
		}
		for index in 0..cell_count {
			let cell = FieldCell::from_index(index, resolution);
			if !region_tile.get_cell(cell).get_zone().is_empty() {
				continue;
			}
			let mask = scratch.masks[index];
			let position = self.get_position(&tile, index);
			if mask.is_empty() {
				// nothing can leave the cell, it is only a zone if it can be entered
				if self.is_enterable(&neighbourhood, &position) {
					let zone = region_tile.push_zone(ZoneInfo::new(mask, 1));
					region_tile.set_cell(cell, ZoneCell::new(zone, DirectionalityInformation::NONE));
				}
				continue;
			}
			let has_partner = Ordinal::ALL.iter().any(|direction| {
				self.get_joinable_neighbour(
					&neighbourhood,
					&tile,
					&position,
					*direction,
					mask,
					&scratch.masks,
				)
				.is_some()
			});
			if !has_partner {
				let zone = region_tile.push_zone(ZoneInfo::new(mask, 1));
				region_tile.set_cell(cell, ZoneCell::new(zone, DirectionalityInformation::NONE));
				continue;
			}
			self.flood_fill(&neighbourhood, tile, index, region_tile, scratch);
		}
		for index in 0..cell_count {
			let cell = FieldCell::from_index(index, resolution);
			if region_tile.get_cell(cell).get_zone().is_empty() {
				continue;
			}
			let boundary = self.get_boundary(&neighbourhood, &tile, region_tile, cell);
			region_tile.get_cell_mut(cell).set_boundary(boundary);
		}
		trace!(
			"Painted {:?} into {} zones",
			tile,
			region_tile.get_zones().len()
		);
	}
	/// Recompute the boundary of the cells along `sides` of an already
	/// painted tile after the data of a neighbouring tile changed. Zones are
	/// kept, an unassigned cell that has become enterable from the neighbour
	/// is given a new zone of its own.
	///
	/// An existing sink in the strips may have stopped being enterable, such
	/// tiles must be repainted instead, see [holds_strip_sink]
	pub fn refresh_strips<P: MovementDataProvider>(
		&self,
		provider: &P,
		tile: TileID,
		region_tile: &mut RegionTile,
		sides: &[Ordinal],
	) {
		let resolution = self.dimensions.get_tile_resolution() as usize;
		let neighbourhood = MovementNeighbourhood::new(provider, tile, self.dimensions, self.modes);
		for index in 0..self.dimensions.get_cell_count() {
			let cell = FieldCell::from_index(index, resolution);
			if !sides.iter().any(|side| self.dimensions.is_in_strip(cell, *side)) {
				continue;
			}
			if region_tile.get_cell(cell).get_zone().is_empty() {
				let position = self.get_position(&tile, index);
				if neighbourhood.get_leave_mask(&position).is_empty()
					&& self.is_enterable(&neighbourhood, &position)
				{
					let zone = region_tile.push_zone(ZoneInfo::new(MovementModeMask::EMPTY, 1));
					region_tile.set_cell(cell, ZoneCell::new(zone, DirectionalityInformation::NONE));
				}
				continue;
			}
			let boundary = self.get_boundary(&neighbourhood, &tile, region_tile, cell);
			region_tile.get_cell_mut(cell).set_boundary(boundary);
		}
	}
	/// Global position of a cell index of a tile
	fn get_position(&self, tile: &TileID, index: usize) -> GridPosition {
		let resolution = self.dimensions.get_tile_resolution() as usize;
		self.dimensions
			.get_global_position(tile, FieldCell::from_index(index, resolution))
	}
	/// Can any neighbour step into the cell
	fn is_enterable(&self, neighbourhood: &MovementNeighbourhood, position: &GridPosition) -> bool {
		Ordinal::ALL.iter().any(|direction| {
			let neighbour = position.step(*direction);
			!neighbourhood
				.get_step_mask(&neighbour, direction.inverse(), self.style)
				.is_empty()
		})
	}
	/// Index of the neighbour in `direction` when it lies within the tile,
	/// has the mode mask `mask` and a step connects the two cells either way
	fn get_joinable_neighbour(
		&self,
		neighbourhood: &MovementNeighbourhood,
		tile: &TileID,
		position: &GridPosition,
		direction: Ordinal,
		mask: MovementModeMask,
		masks: &[MovementModeMask],
	) -> Option<usize> {
		let neighbour = position.step(direction);
		let cell = self.dimensions.get_local_cell(tile, &neighbour)?;
		let index = cell.get_index(self.dimensions.get_tile_resolution() as usize);
		if masks[index] != mask {
			return None;
		}
		let forward = neighbourhood.get_step_mask(position, direction, self.style);
		let backward = neighbourhood.get_step_mask(&neighbour, direction.inverse(), self.style);
		if forward.is_empty() && backward.is_empty() {
			None
		} else {
			Some(index)
		}
	}
	/// Breadth first fill of a new zone seeded at `seed`
	fn flood_fill(
		&self,
		neighbourhood: &MovementNeighbourhood,
		tile: TileID,
		seed: usize,
		region_tile: &mut RegionTile,
		scratch: &mut ScratchBuffers,
	) {
		let resolution = self.dimensions.get_tile_resolution() as usize;
		let mask = scratch.masks[seed];
		let zone = region_tile.push_zone(ZoneInfo::new(mask, 0));
		region_tile.set_cell(
			FieldCell::from_index(seed, resolution),
			ZoneCell::new(zone, DirectionalityInformation::NONE),
		);
		scratch.open.push_back(seed);
		let mut cell_count = 0;
		while let Some(current) = scratch.open.pop_front() {
			cell_count += 1;
			let position = self.get_position(&tile, current);
			for direction in Ordinal::ALL {
				let Some(neighbour) = self.get_joinable_neighbour(
					neighbourhood,
					&tile,
					&position,
					direction,
					mask,
					&scratch.masks,
				) else {
					continue;
				};
				let cell = FieldCell::from_index(neighbour, resolution);
				if region_tile.get_cell(cell).get_zone().is_empty() {
					region_tile.set_cell(cell, ZoneCell::new(zone, DirectionalityInformation::NONE));
					scratch.open.push_back(neighbour);
				}
			}
		}
		region_tile.set_zone_info(zone, ZoneInfo::new(mask, cell_count));
	}
	/// Traversable directions out of a painted cell that leave its zone
	fn get_boundary(
		&self,
		neighbourhood: &MovementNeighbourhood,
		tile: &TileID,
		region_tile: &RegionTile,
		cell: FieldCell,
	) -> DirectionalityInformation {
		let zone = region_tile.get_cell(cell).get_zone();
		let position = self.dimensions.get_global_position(tile, cell);
		let mut boundary = DirectionalityInformation::NONE;
		for direction in Ordinal::ALL {
			if neighbourhood
				.get_step_mask(&position, direction, self.style)
				.is_empty()
			{
				continue;
			}
			let neighbour = position.step(direction);
			if let Some(neighbour_cell) = self.dimensions.get_local_cell(tile, &neighbour) {
				if region_tile.get_cell(neighbour_cell).get_zone() == zone {
					continue;
				}
			}
			boundary.insert(direction);
		}
		if self.style != DistanceCalculation::Manhattan {
			for direction in Ordinal::ALL {
				if let Some((a, b)) = direction.get_cardinal_components() {
					if boundary.contains(a) || boundary.contains(b) {
						boundary.remove(direction);
					}
				}
			}
		}
		boundary
	}
}

/// Does a cell along `sides` of a painted tile belong to a sink, a zone that
/// can be entered but not left. Whether a sink exists depends on the
/// neighbouring tiles, so refreshing the strips alone cannot retire one
pub fn holds_strip_sink(
	dimensions: &RegionDimensions,
	region_tile: &RegionTile,
	sides: &[Ordinal],
) -> bool {
	if !region_tile.get_zones().iter().any(|z| z.get_mask().is_empty()) {
		return false;
	}
	let resolution = dimensions.get_tile_resolution() as usize;
	region_tile
		.get_cells()
		.iter()
		.enumerate()
		.any(|(index, zone_cell)| {
			let cell = FieldCell::from_index(index, resolution);
			sides.iter().any(|side| dimensions.is_in_strip(cell, *side))
				&& region_tile
					.get_zone_info(zone_cell.get_zone())
					.is_some_and(|info| info.get_mask().is_empty())
		})
}
