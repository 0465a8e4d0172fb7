//! Raw movement data of a single movement mode over a single tile. Each cell
//! holds a cost, `0` meaning impassable, along with the directions an actor
//! may leave the cell in (outbound) and the directions it may be entered from
//! (inbound).
//!
//! ```text
//!  _____________________________
//! |         |         |         |
//! |   1.0   |   1.0   |   0.0   |
//! |_________|_________|_________|
//! |         |         |         |
//! |   1.0   |   2.5   |   0.0   |
//! |_________|_________|_________|
//! |         |         |         |
//! |   1.0   |   1.0   |   1.0   |
//! |_________|_________|_________|
//! ```
//!
//! A step from cell `a` in direction `d` to cell `b` can be made by a mode
//! when both cells have a cost above zero, `d` is an outbound direction of
//! `a` and the reverse of `d` is an inbound direction of `b`.
//!

use std::collections::{BTreeMap, BTreeSet};

use crate::prelude::*;
use bevy::prelude::*;

/// Costs and directionality of one movement mode across one tile, stored in
/// row-major order
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct MovementField {
	/// Number of cells along each side
	resolution: usize,
	/// Cost of entering each cell, `0` is impassable
	costs: Vec<f32>,
	/// Directions each cell can be left in
	outbound: Vec<DirectionalityInformation>,
	/// Directions each cell can be entered from, a bit names the side the
	/// neighbour lies on
	inbound: Vec<DirectionalityInformation>,
}

impl MovementField {
	/// Create a field where every cell has the supplied cost and can be left
	/// and entered in all directions
	pub fn new_with_cost(resolution: usize, cost: f32) -> Self {
		let count = resolution * resolution;
		MovementField {
			resolution,
			costs: vec![cost; count],
			outbound: vec![DirectionalityInformation::ALL; count],
			inbound: vec![DirectionalityInformation::ALL; count],
		}
	}
	/// Create a field from rows of costs, every cell is open in all
	/// directions
	pub fn from_rows(rows: &[Vec<f32>]) -> Self {
		let resolution = rows.len();
		let mut field = MovementField::new_with_cost(resolution, 0.0);
		for (row, values) in rows.iter().enumerate() {
			if values.len() != resolution {
				panic!(
					"MovementField rows must be square, row {} has {} values, expected {}",
					row,
					values.len(),
					resolution
				);
			}
			for (column, cost) in values.iter().enumerate() {
				field.set_cost(FieldCell::new(column, row), *cost);
			}
		}
		field
	}
	pub fn get_resolution(&self) -> usize {
		self.resolution
	}
	/// Index of a cell, panics if out of bounds
	fn index_of(&self, cell: FieldCell) -> usize {
		if cell.get_column() >= self.resolution || cell.get_row() >= self.resolution {
			panic!("Cannot access a MovementField value, index out of bounds. Asked for column {}, row {}, field resolution is {}", cell.get_column(), cell.get_row(), self.resolution)
		}
		cell.get_index(self.resolution)
	}
	pub fn get_cost(&self, cell: FieldCell) -> f32 {
		self.costs[self.index_of(cell)]
	}
	pub fn set_cost(&mut self, cell: FieldCell, cost: f32) {
		let index = self.index_of(cell);
		self.costs[index] = cost;
	}
	pub fn get_outbound(&self, cell: FieldCell) -> DirectionalityInformation {
		self.outbound[self.index_of(cell)]
	}
	pub fn set_outbound(&mut self, cell: FieldCell, directions: DirectionalityInformation) {
		let index = self.index_of(cell);
		self.outbound[index] = directions;
	}
	pub fn get_inbound(&self, cell: FieldCell) -> DirectionalityInformation {
		self.inbound[self.index_of(cell)]
	}
	pub fn set_inbound(&mut self, cell: FieldCell, directions: DirectionalityInformation) {
		let index = self.index_of(cell);
		self.inbound[index] = directions;
	}
	/// Dense costs in row-major order
	pub fn get_costs(&self) -> &[f32] {
		&self.costs
	}
	/// Dense outbound directions in row-major order
	pub fn get_outbound_directions(&self) -> &[DirectionalityInformation] {
		&self.outbound
	}
	/// Dense inbound directions in row-major order
	pub fn get_inbound_directions(&self) -> &[DirectionalityInformation] {
		&self.inbound
	}
}

/// Read-only source of per-mode movement data, addressable by tile
pub trait MovementDataProvider: Sync {
	/// Get the field of `mode` for `tile`, `None` when the tile has no data
	/// for that mode
	fn get_movement_field(&self, mode: MovementMode, tile: &TileID) -> Option<&MovementField>;
}

/// In-memory [MovementDataProvider]. Keys are movement modes and values are
/// the tiles that mode has data for
#[cfg_attr(
	feature = "serde",
	derive(serde::Deserialize, serde::Serialize),
	serde(default)
)]
#[derive(Component, Clone, Default, Debug)]
pub struct MovementFields {
	/// Size of the tiles every field covers
	dimensions: RegionDimensions,
	/// Fields of each mode
	fields: BTreeMap<MovementMode, RegionView<MovementField>>,
}

impl MovementDataProvider for MovementFields {
	fn get_movement_field(&self, mode: MovementMode, tile: &TileID) -> Option<&MovementField> {
		self.fields.get(&mode)?.get(tile)
	}
}

impl MovementFields {
	/// Create a new empty instance of [MovementFields]
	pub fn new(dimensions: &RegionDimensions) -> Self {
		MovementFields {
			dimensions: *dimensions,
			fields: BTreeMap::new(),
		}
	}
	/// Create a new instance of [MovementFields] where every mode has a field
	/// of uniform `cost` on every tile
	pub fn new_with_cost(
		dimensions: &RegionDimensions,
		modes: &[MovementMode],
		tiles: &[TileID],
		cost: f32,
	) -> Self {
		let mut movement_fields = MovementFields::new(dimensions);
		for mode in modes {
			for tile in tiles {
				movement_fields.insert_field(
					*mode,
					*tile,
					MovementField::new_with_cost(dimensions.get_tile_resolution() as usize, cost),
				);
			}
		}
		movement_fields
	}
	pub fn get_dimensions(&self) -> &RegionDimensions {
		&self.dimensions
	}
	pub fn get_tile_resolution(&self) -> usize {
		self.dimensions.get_tile_resolution() as usize
	}
	/// Insert the field of a mode for a tile, returning any field it replaced
	pub fn insert_field(
		&mut self,
		mode: MovementMode,
		tile: TileID,
		field: MovementField,
	) -> Option<MovementField> {
		if field.get_resolution() != self.get_tile_resolution() {
			panic!(
				"MovementField of resolution {} cannot be inserted into MovementFields of resolution {}",
				field.get_resolution(),
				self.get_tile_resolution()
			);
		}
		self.fields.entry(mode).or_default().insert(tile, field)
	}
	/// Remove the field of a mode for a tile
	pub fn remove_field(&mut self, mode: MovementMode, tile: &TileID) -> Option<MovementField> {
		let view = self.fields.get_mut(&mode)?;
		let removed = view.remove(tile);
		if view.is_empty() {
			self.fields.remove(&mode);
		}
		removed
	}
	/// Remove the fields of every mode for a tile
	pub fn remove_tile(&mut self, tile: &TileID) -> bool {
		let modes: Vec<MovementMode> = self.fields.keys().copied().collect();
		let mut removed = false;
		for mode in modes {
			removed |= self.remove_field(mode, tile).is_some();
		}
		removed
	}
	pub fn get_field(&self, mode: MovementMode, tile: &TileID) -> Option<&MovementField> {
		self.fields.get(&mode)?.get(tile)
	}
	pub fn get_field_mut(&mut self, mode: MovementMode, tile: &TileID) -> Option<&mut MovementField> {
		self.fields.get_mut(&mode)?.get_mut(tile)
	}
	/// Modes that have data
	pub fn get_modes(&self) -> impl Iterator<Item = &MovementMode> {
		self.fields.keys()
	}
	/// Every tile that any mode has data for
	pub fn get_tiles(&self) -> BTreeSet<TileID> {
		self.fields.values().flat_map(|view| view.keys()).collect()
	}
	/// Locate the field and local cell of a global position
	fn locate_mut(
		&mut self,
		mode: MovementMode,
		position: &GridPosition,
	) -> Result<(TileID, FieldCell, &mut MovementField), RegionError> {
		let tile = self.dimensions.get_tile_of(position);
		let cell = self.dimensions.get_field_cell(position);
		match self.get_field_mut(mode, &tile) {
			Some(field) => Ok((tile, cell, field)),
			None => Err(RegionError::UnknownTile(tile)),
		}
	}
	/// Update the cost of a cell, returning the tile that changed
	pub fn set_cell_cost(
		&mut self,
		mode: MovementMode,
		position: &GridPosition,
		cost: f32,
	) -> Result<TileID, RegionError> {
		let (tile, cell, field) = self.locate_mut(mode, position)?;
		field.set_cost(cell, cost);
		Ok(tile)
	}
	/// Update the outbound and inbound directions of a cell, returning the
	/// tile that changed
	pub fn set_cell_directionality(
		&mut self,
		mode: MovementMode,
		position: &GridPosition,
		outbound: DirectionalityInformation,
		inbound: DirectionalityInformation,
	) -> Result<TileID, RegionError> {
		let (tile, cell, field) = self.locate_mut(mode, position)?;
		field.set_outbound(cell, outbound);
		field.set_inbound(cell, inbound);
		Ok(tile)
	}
	/// From a `ron` file generate the [MovementFields]
	#[cfg(feature = "ron")]
	pub fn from_ron(path: &str) -> Result<Self, RegionError> {
		let file = std::fs::File::open(path)?;
		let fields: MovementFields = ron::de::from_reader(file)?;
		Ok(fields)
	}
	/// From a directory of CSV files generate the [MovementFields]. Each file
	/// holds the costs of one mode over one tile and is named
	/// `<mode>_<layer>_<column>_<row>.csv`. Cells are open in all directions
	#[cfg(feature = "csv")]
	pub fn from_csv_dir(dimensions: &RegionDimensions, directory: &str) -> Result<Self, RegionError> {
		let mut movement_fields = MovementFields::new(dimensions);
		let resolution = movement_fields.get_tile_resolution();
		for entry in std::fs::read_dir(directory)? {
			let path = entry?.path();
			if path.extension().and_then(|e| e.to_str()) != Some("csv") {
				continue;
			}
			let file_name = path
				.file_name()
				.and_then(|n| n.to_str())
				.unwrap_or_default()
				.to_string();
			let (mode, tile) = parse_csv_name(&file_name)?;
			let mut rdr = csv::ReaderBuilder::new()
				.has_headers(false)
				.from_path(&path)?;
			let mut rows = Vec::new();
			for record in rdr.records() {
				let mut row = Vec::new();
				for value in record?.iter() {
					let cost: f32 = value.trim().parse().map_err(|_| {
						RegionError::MalformedCsvContent {
							file: file_name.clone(),
							reason: format!("`{}` is not a cost", value),
						}
					})?;
					row.push(cost);
				}
				rows.push(row);
			}
			if rows.len() != resolution || rows.iter().any(|r| r.len() != resolution) {
				return Err(RegionError::MalformedCsvContent {
					file: file_name,
					reason: format!("expected {}x{} values", resolution, resolution),
				});
			}
			debug!("Loaded movement field of {:?} for {:?}", mode, tile);
			movement_fields.insert_field(mode, tile, MovementField::from_rows(&rows));
		}
		Ok(movement_fields)
	}
}

/// Split `<mode>_<layer>_<column>_<row>.csv` into its parts
#[cfg(feature = "csv")]
fn parse_csv_name(file_name: &str) -> Result<(MovementMode, TileID), RegionError> {
	let malformed = || RegionError::MalformedCsvName(file_name.to_string());
	let parts: Vec<&str> = file_name.trim_end_matches(".csv").split('_').collect();
	if parts.len() != 4 {
		return Err(malformed());
	}
	let mode = parts[0].parse::<u32>().map_err(|_| malformed())?;
	let layer = parts[1].parse::<i32>().map_err(|_| malformed())?;
	let column = parts[2].parse::<i32>().map_err(|_| malformed())?;
	let row = parts[3].parse::<i32>().map_err(|_| malformed())?;
	Ok((MovementMode::new(mode), TileID::new(column, row, layer)))
}

/// Movement data of a tile and its 8 neighbours for a fixed list of modes.
/// Answers which modes can leave a cell and which can make a step, for cells
/// within one tile of the centre
pub struct MovementNeighbourhood<'a> {
	/// Tile in the middle
	centre: TileID,
	/// Size of the tiles
	dimensions: RegionDimensions,
	/// Modes considered
	modes: &'a [(MovementModeIndex, MovementMode)],
	/// `fields[slot * modes.len() + mode]` where slot is
	/// `(row offset + 1) * 3 + (column offset + 1)` of the tile
	fields: Vec<Option<&'a MovementField>>,
}

impl<'a> MovementNeighbourhood<'a> {
	/// Gather the fields around `centre`
	pub fn new<P: MovementDataProvider>(
		provider: &'a P,
		centre: TileID,
		dimensions: RegionDimensions,
		modes: &'a [(MovementModeIndex, MovementMode)],
	) -> Self {
		let mut fields = Vec::with_capacity(9 * modes.len());
		for dy in -1..=1 {
			for dx in -1..=1 {
				let tile = TileID::new(
					centre.get_column() + dx,
					centre.get_row() + dy,
					centre.get_layer(),
				);
				for (_, mode) in modes {
					fields.push(provider.get_movement_field(*mode, &tile));
				}
			}
		}
		MovementNeighbourhood {
			centre,
			dimensions,
			modes,
			fields,
		}
	}
	/// Slot of the tile containing `position`, `None` beyond the neighbours
	fn get_slot(&self, position: &GridPosition) -> Option<usize> {
		let tile = self.dimensions.get_tile_of(position);
		if tile.get_layer() != self.centre.get_layer() {
			return None;
		}
		let dx = tile.get_column() - self.centre.get_column();
		let dy = tile.get_row() - self.centre.get_row();
		if dx.abs() > 1 || dy.abs() > 1 {
			return None;
		}
		Some(((dy + 1) * 3 + (dx + 1)) as usize)
	}
	/// Field of the `mode_slot`th mode at a `slot`
	fn get_field(&self, slot: usize, mode_slot: usize) -> Option<&'a MovementField> {
		self.fields[slot * self.modes.len() + mode_slot]
	}
	/// Modes that can leave the cell at `position` in at least one direction
	pub fn get_leave_mask(&self, position: &GridPosition) -> MovementModeMask {
		let mut mask = MovementModeMask::EMPTY;
		let Some(slot) = self.get_slot(position) else {
			return mask;
		};
		let cell = self.dimensions.get_field_cell(position);
		for (mode_slot, (index, _)) in self.modes.iter().enumerate() {
			if let Some(field) = self.get_field(slot, mode_slot) {
				if field.get_cost(cell) > 0.0 && !field.get_outbound(cell).is_empty() {
					mask.insert(*index);
				}
			}
		}
		mask
	}
	/// Modes that can step from `from` in direction `direction` under the
	/// distance style `style`
	pub fn get_step_mask(
		&self,
		from: &GridPosition,
		direction: Ordinal,
		style: DistanceCalculation,
	) -> MovementModeMask {
		let mut mask = MovementModeMask::EMPTY;
		if !style.allows(direction) {
			return mask;
		}
		let to = from.step(direction);
		let (Some(from_slot), Some(to_slot)) = (self.get_slot(from), self.get_slot(&to)) else {
			return mask;
		};
		let from_cell = self.dimensions.get_field_cell(from);
		let to_cell = self.dimensions.get_field_cell(&to);
		for (mode_slot, (index, _)) in self.modes.iter().enumerate() {
			let (Some(a), Some(b)) = (
				self.get_field(from_slot, mode_slot),
				self.get_field(to_slot, mode_slot),
			) else {
				continue;
			};
			if a.get_cost(from_cell) > 0.0
				&& a.get_outbound(from_cell).contains(direction)
				&& b.get_cost(to_cell) > 0.0
				&& b.get_inbound(to_cell).contains(direction.inverse())
			{
				mask.insert(*index);
			}
		}
		mask
	}
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	/// Walking registered at index 0, flying at index 1
	fn modes() -> Vec<(MovementModeIndex, MovementMode)> {
		vec![
			(MovementModeIndex::new(0), MovementMode::new(10)),
			(MovementModeIndex::new(1), MovementMode::new(20)),
		]
	}
	#[test]
	#[should_panic]
	fn field_out_of_bounds() {
		let field = MovementField::new_with_cost(10, 1.0);
		field.get_cost(FieldCell::new(10, 0));
	}
	#[test]
	fn field_from_rows() {
		let field = MovementField::from_rows(&[vec![1.0, 0.0], vec![2.0, 1.0]]);
		assert_eq!(2, field.get_resolution());
		assert_eq!(0.0, field.get_cost(FieldCell::new(1, 0)));
		assert_eq!(2.0, field.get_cost(FieldCell::new(0, 1)));
	}
	#[test]
	fn set_cell_cost_in_missing_tile() {
		let dimensions = RegionDimensions::new(10);
		let mut fields = MovementFields::new(&dimensions);
		let result = fields.set_cell_cost(MovementMode::new(1), &GridPosition::new(3, 3, 0), 4.0);
		assert!(matches!(result, Err(RegionError::UnknownTile(_))));
	}
	#[test]
	fn set_cell_cost_negative_position() {
		let dimensions = RegionDimensions::new(10);
		let mode = MovementMode::new(1);
		let tile = TileID::new(-1, 0, 0);
		let mut fields = MovementFields::new_with_cost(&dimensions, &[mode], &[tile], 1.0);
		let result = fields.set_cell_cost(mode, &GridPosition::new(-3, 2, 0), 4.0);
		assert_eq!(tile, result.unwrap());
		let cost = fields.get_field(mode, &tile).unwrap().get_cost(FieldCell::new(7, 2));
		assert_eq!(4.0, cost);
	}
	#[test]
	fn remove_tile_of_every_mode() {
		let dimensions = RegionDimensions::new(10);
		let walk = MovementMode::new(1);
		let fly = MovementMode::new(2);
		let tiles = [TileID::new(0, 0, 0), TileID::new(1, 0, 0)];
		let mut fields = MovementFields::new_with_cost(&dimensions, &[walk, fly], &tiles, 1.0);
		assert!(fields.remove_tile(&tiles[0]));
		assert_eq!(vec![tiles[1]], fields.get_tiles().into_iter().collect::<Vec<_>>());
		assert!(!fields.remove_tile(&tiles[0]));
	}
	#[test]
	fn leave_mask_per_mode() {
		let dimensions = RegionDimensions::new(10);
		let tile = TileID::new(0, 0, 0);
		let modes = modes();
		let mut fields = MovementFields::new_with_cost(
			&dimensions,
			&[MovementMode::new(10), MovementMode::new(20)],
			&[tile],
			1.0,
		);
		let position = GridPosition::new(4, 4, 0);
		fields
			.set_cell_cost(MovementMode::new(10), &position, 0.0)
			.unwrap();
		let neighbourhood = MovementNeighbourhood::new(&fields, tile, dimensions, &modes);
		assert_eq!(MovementModeMask::new(0b10), neighbourhood.get_leave_mask(&position));
		let other = GridPosition::new(5, 4, 0);
		assert_eq!(MovementModeMask::new(0b11), neighbourhood.get_leave_mask(&other));
	}
	#[test]
	fn step_respects_inbound() {
		let dimensions = RegionDimensions::new(10);
		let tile = TileID::new(0, 0, 0);
		let modes = modes();
		let walk = MovementMode::new(10);
		let mut fields = MovementFields::new_with_cost(&dimensions, &[walk], &[tile], 1.0);
		// the cell at (5, 4) refuses entry from its western side
		let mut inbound = DirectionalityInformation::ALL;
		inbound.remove(Ordinal::West);
		fields
			.set_cell_directionality(
				walk,
				&GridPosition::new(5, 4, 0),
				DirectionalityInformation::ALL,
				inbound,
			)
			.unwrap();
		let neighbourhood = MovementNeighbourhood::new(&fields, tile, dimensions, &modes);
		let style = DistanceCalculation::Euclidean;
		let from = GridPosition::new(4, 4, 0);
		assert!(neighbourhood.get_step_mask(&from, Ordinal::East, style).is_empty());
		let back = GridPosition::new(5, 4, 0);
		assert!(!neighbourhood.get_step_mask(&back, Ordinal::West, style).is_empty());
	}
	#[test]
	fn step_across_tiles() {
		let dimensions = RegionDimensions::new(10);
		let walk = MovementMode::new(10);
		let modes = modes();
		let tiles = [TileID::new(0, 0, 0), TileID::new(1, 1, 0)];
		let fields = MovementFields::new_with_cost(&dimensions, &[walk], &tiles, 1.0);
		let neighbourhood = MovementNeighbourhood::new(&fields, tiles[0], dimensions, &modes);
		let corner = GridPosition::new(9, 9, 0);
		let euclidean = DistanceCalculation::Euclidean;
		let manhattan = DistanceCalculation::Manhattan;
		assert_eq!(
			MovementModeMask::new(0b1),
			neighbourhood.get_step_mask(&corner, Ordinal::SouthEast, euclidean)
		);
		assert!(neighbourhood.get_step_mask(&corner, Ordinal::SouthEast, manhattan).is_empty());
		// tile (1, 0) has no data
		assert!(neighbourhood.get_step_mask(&corner, Ordinal::NorthEast, euclidean).is_empty());
	}
	#[test]
	#[cfg(feature = "csv")]
	fn movement_fields_from_csv() {
		let dimensions = RegionDimensions::new(10);
		let path = env!("CARGO_MANIFEST_DIR").to_string() + "/assets/csv/corridor/";
		let fields = MovementFields::from_csv_dir(&dimensions, &path).unwrap();
		let tiles: Vec<TileID> = fields.get_tiles().into_iter().collect();
		assert_eq!(
			vec![
				TileID::new(0, 0, 0),
				TileID::new(1, 0, 0),
				TileID::new(2, 0, 0)
			],
			tiles
		);
		let corridor = fields
			.get_field(MovementMode::new(1), &TileID::new(1, 0, 0))
			.unwrap();
		assert_eq!(1.0, corridor.get_cost(FieldCell::new(3, 5)));
		assert_eq!(0.0, corridor.get_cost(FieldCell::new(3, 4)));
	}
	#[test]
	#[cfg(feature = "csv")]
	fn malformed_csv_name() {
		let result = parse_csv_name("1_0_x_2.csv");
		assert!(matches!(result, Err(RegionError::MalformedCsvName(_))));
	}
	#[test]
	#[cfg(feature = "ron")]
	fn movement_fields_from_ron() {
		let path = env!("CARGO_MANIFEST_DIR").to_string() + "/assets/movement_fields.ron";
		let fields = MovementFields::from_ron(&path).unwrap();
		assert_eq!(2, fields.get_tile_resolution());
		let field = fields
			.get_field(MovementMode::new(1), &TileID::new(0, 0, 0))
			.unwrap();
		assert_eq!(0.0, field.get_cost(FieldCell::new(1, 1)));
	}
}
