//! Edges join adjacent zones. Once tiles are painted the boundary of each
//! zone needing detection is walked clockwise, cell to cell, and every run of
//! consecutive boundary crossings into the same neighbouring zone becomes a
//! single directed [RegionEdge].
//!
//! For a `10x10` tile forming one open zone surrounded by four open tiles the
//! walk starts at the top-left cell and travels around the outer ring:
//!
//! ```text
//!       N N N N N N N N N N
//!     W >-------------------v E
//!     W |                   | E
//!     W |                   | E
//!     W |       zone        | E
//!     W |                   | E
//!     W |                   | E
//!     W ^-------------------< E
//!       S S S S S S S S S S
//! ```
//!
//! producing four edges, one per neighbouring tile, each spanning a run of
//! `10` crossings. The representative cell of an edge is the midpoint of its
//! run.
//!
//! Before anything is repainted the edges of changed tiles are retracted
//! together with their mirrors in other zones, and after detection the new
//! outbound edges are stitched into the inbound records of their targets.
//!

use std::collections::BTreeSet;

use crate::prelude::*;
use bevy::prelude::*;

/// Remove every edge of a tile along with each mirror of those edges held by
/// zones of other tiles
pub fn remove_tile_edges(edges: &mut RegionView<TileEdges>, tile: &TileID) {
	let Some(removed) = edges.remove(tile) else {
		return;
	};
	for (_, zone_edges) in removed.iter() {
		for edge in zone_edges.get_outbound().values() {
			let target = edge.get_target();
			if target.get_tile() == *tile {
				continue;
			}
			if let Some(target_edges) = edges
				.get_mut(&target.get_tile())
				.and_then(|t| t.get_zone_mut(&target.get_zone()))
			{
				target_edges.remove_inbound(&edge.get_key());
				target_edges.set_costs_dirty(true);
			}
		}
		for connection in zone_edges.get_inbound().values() {
			let source = connection.get_source_edge();
			let owner = source.get_owner();
			if owner.get_tile() == *tile {
				continue;
			}
			if let Some(source_edges) = edges
				.get_mut(&owner.get_tile())
				.and_then(|t| t.get_zone_mut(&owner.get_zone()))
			{
				source_edges.remove_outbound(&source.get_local_id());
			}
		}
	}
}

/// Clear the outbound edges of every zone of `tile` with a cell in one of
/// the strips along `sides` and queue those zones for detection. Inbound
/// records are kept
pub fn clear_strip_edges(
	edges: &mut RegionView<TileEdges>,
	zones: &RegionView<RegionTile>,
	dimensions: RegionDimensions,
	tile: &TileID,
	sides: &[Ordinal],
) {
	let Some(region_tile) = zones.get(tile) else {
		return;
	};
	let resolution = dimensions.get_tile_resolution() as usize;
	let mut affected = BTreeSet::new();
	for (index, cell) in region_tile.get_cells().iter().enumerate() {
		if cell.get_zone().is_empty() {
			continue;
		}
		let field_cell = FieldCell::from_index(index, resolution);
		if sides.iter().any(|side| dimensions.is_in_strip(field_cell, *side)) {
			affected.insert(cell.get_zone());
		}
	}
	let mut released = Vec::new();
	if let Some(tile_edges) = edges.get_mut(tile) {
		for zone in &affected {
			if let Some(zone_edges) = tile_edges.get_zone_mut(zone) {
				released.extend(zone_edges.take_outbound().into_values());
				zone_edges.set_edges_dirty(true);
				zone_edges.set_costs_dirty(true);
			}
		}
	}
	for edge in released {
		let target = edge.get_target();
		if let Some(target_edges) = edges
			.get_mut(&target.get_tile())
			.and_then(|t| t.get_zone_mut(&target.get_zone()))
		{
			target_edges.remove_inbound(&edge.get_key());
			target_edges.set_costs_dirty(true);
		}
	}
}

/// Flag every zone of `tile` for cost recalculation, along with every zone
/// with an edge leading into it as its crossing costs read the tile
pub fn mark_tile_costs_dirty(edges: &mut RegionView<TileEdges>, tile: &TileID) {
	let mut sources = Vec::new();
	if let Some(tile_edges) = edges.get_mut(tile) {
		for (_, zone_edges) in tile_edges.iter_mut() {
			zone_edges.set_costs_dirty(true);
			sources.extend(
				zone_edges
					.get_inbound()
					.keys()
					.map(|key| key.get_owner()),
			);
		}
	}
	for owner in sources {
		if let Some(zone_edges) = edges
			.get_mut(&owner.get_tile())
			.and_then(|t| t.get_zone_mut(&owner.get_zone()))
		{
			zone_edges.set_costs_dirty(true);
		}
	}
}

/// Register every freshly detected outbound edge of `tiles` as an inbound
/// connection of its target zone
pub fn stitch(edges: &mut RegionView<TileEdges>, tiles: &[TileID]) {
	let mut connections = Vec::new();
	for tile in tiles {
		let Some(tile_edges) = edges.get_mut(tile) else {
			continue;
		};
		for (_, zone_edges) in tile_edges.iter_mut() {
			if !zone_edges.is_edges_dirty() {
				continue;
			}
			for edge in zone_edges.get_outbound().values() {
				connections.push((
					edge.get_target(),
					InboundConnection::new(edge.get_key(), edge.get_entry(), edge.get_direction()),
				));
			}
			zone_edges.set_edges_dirty(false);
			zone_edges.set_costs_dirty(true);
		}
	}
	for (target, connection) in connections {
		match edges
			.get_mut(&target.get_tile())
			.and_then(|t| t.get_zone_mut(&target.get_zone()))
		{
			Some(target_edges) => {
				target_edges.insert_inbound(connection);
				target_edges.set_costs_dirty(true);
			}
			None => warn!(
				"Edge {:?} leads into {:?} which has no edge data",
				connection.get_source_edge(),
				target
			),
		}
	}
}

/// What lies in one direction out of a cell being walked
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Neighbour {
	/// Same zone, the walk can move there
	Member,
	/// A traversable boundary crossing into another zone
	Crossing(GlobalZoneId),
	/// A diagonal already represented by a neighbouring cardinal crossing
	Skipped,
	/// Nothing can be crossed
	Blocked,
}

/// Runs of boundary crossings sharing a target, built up over a walk
struct RunTracker<'s> {
	/// Every crossing of the walk in order
	positions: &'s mut Vec<(GridPosition, Ordinal)>,
	/// Target and first index into `positions` of each run
	runs: &'s mut Vec<(GlobalZoneId, usize)>,
	/// Can the last run still be extended
	open: bool,
}

impl<'s> RunTracker<'s> {
	/// Start tracking with the scratch buffers
	fn new(
		positions: &'s mut Vec<(GridPosition, Ordinal)>,
		runs: &'s mut Vec<(GlobalZoneId, usize)>,
	) -> Self {
		positions.clear();
		runs.clear();
		RunTracker {
			positions,
			runs,
			open: false,
		}
	}
	/// Extend the open run or begin a new one
	fn record(&mut self, target: GlobalZoneId, position: GridPosition, direction: Ordinal) {
		let extends = self.open && self.runs.last().is_some_and(|(t, _)| *t == target);
		if !extends {
			self.runs.push((target, self.positions.len()));
		}
		self.positions.push((position, direction));
		self.open = true;
	}
	/// Stop extending the current run
	fn close(&mut self) {
		self.open = false;
	}
	/// Bounds of a run within `positions`
	fn get_bounds(&self, run: usize) -> (usize, usize) {
		let start = self.runs[run].1;
		let end = match self.runs.get(run + 1) {
			Some((_, next)) => *next,
			None => self.positions.len(),
		};
		(start, end)
	}
	/// Turn each run into an edge. When the walk finished inside a run
	/// leading to the same zone as the first run the two are one crossing
	/// split by the start of the walk and are joined
	fn emit(self, owner: GlobalZoneId, zone_edges: &mut ZoneEdges) {
		let count = self.runs.len();
		if count == 0 {
			return;
		}
		let wraps = self.open && count > 1 && self.runs[0].0 == self.runs[count - 1].0;
		for run in 0..count {
			if wraps && run == 0 {
				continue;
			}
			let (start, end) = self.get_bounds(run);
			let tail = end - start;
			let (length, midpoint) = if wraps && run == count - 1 {
				let (head_start, head_end) = self.get_bounds(0);
				let length = tail + head_end - head_start;
				let middle = length / 2;
				if middle < tail {
					(length, self.positions[start + middle])
				} else {
					(length, self.positions[head_start + middle - tail])
				}
			} else {
				(tail, self.positions[start + tail / 2])
			};
			zone_edges.push_outbound(owner, midpoint.0, midpoint.1, self.runs[run].0, length as u32);
		}
	}
}

/// Detects the edges of painted tiles
pub struct EdgeDetector<'a> {
	/// Size of the tiles
	dimensions: RegionDimensions,
	/// Painted zones of every tile
	zones: &'a RegionView<RegionTile>,
}

impl<'a> EdgeDetector<'a> {
	/// Create a new instance of [EdgeDetector]
	pub fn new(dimensions: RegionDimensions, zones: &'a RegionView<RegionTile>) -> Self {
		EdgeDetector { dimensions, zones }
	}
	/// Detect the outbound edges of `tile`. A `full` detection discards all
	/// previous edge data of the tile, otherwise only zones flagged as
	/// needing detection are walked
	pub fn detect(
		&self,
		tile: TileID,
		full: bool,
		tile_edges: &mut TileEdges,
		scratch: &mut ScratchBuffers,
	) {
		let Some(region_tile) = self.zones.get(&tile) else {
			panic!("Cannot detect edges of {:?}, it has not been painted", tile);
		};
		if full {
			*tile_edges = TileEdges::default();
		}
		for zone in region_tile.get_zone_ids() {
			tile_edges.get_or_insert_zone(zone);
		}
		let resolution = self.dimensions.get_tile_resolution() as usize;
		for zone in region_tile.get_zone_ids() {
			let Some(zone_edges) = tile_edges.get_zone_mut(&zone) else {
				continue;
			};
			if !zone_edges.is_edges_dirty() {
				continue;
			}
			let owner = GlobalZoneId::new(tile, zone);
			scratch.visited.clear();
			scratch
				.visited
				.resize(resolution * resolution, DirectionalityInformation::NONE);
			let isolated = region_tile
				.get_zone_info(zone)
				.is_some_and(|info| info.is_isolated());
			if isolated {
				if let Some(cell) = region_tile.get_zone_cells(zone).next() {
					self.record_isolated_cell(region_tile, owner, cell, zone_edges, scratch);
				}
				continue;
			}
			for cell in region_tile.get_zone_cells(zone) {
				let index = cell.get_index(resolution);
				let boundary = region_tile.get_cell(cell).get_boundary();
				for direction in boundary.iter() {
					if scratch.visited[index].contains(direction) {
						continue;
					}
					if let Neighbour::Crossing(_) = self.classify(region_tile, owner, cell, direction) {
						let start = self.get_run_start(
							region_tile,
							owner,
							cell,
							direction,
							scratch.visited[index],
						);
						self.walk(region_tile, owner, cell, start, zone_edges, scratch);
					}
				}
			}
		}
		trace!(
			"Detected {} outbound edges in {:?}",
			tile_edges.get_outbound_count(),
			tile
		);
	}
	/// Classify the neighbour of `cell` in `direction`
	fn classify(
		&self,
		region_tile: &RegionTile,
		owner: GlobalZoneId,
		cell: FieldCell,
		direction: Ordinal,
	) -> Neighbour {
		let tile = owner.get_tile();
		let position = self.dimensions.get_global_position(&tile, cell);
		let neighbour = position.step(direction);
		let local = self.dimensions.get_local_cell(&tile, &neighbour);
		if let Some(neighbour_cell) = local {
			if region_tile.get_cell(neighbour_cell).get_zone() == owner.get_zone() {
				return Neighbour::Member;
			}
		}
		let boundary = region_tile.get_cell(cell).get_boundary();
		if boundary.contains(direction) {
			let (target_tile, target_zone) = match local {
				Some(neighbour_cell) => (tile, region_tile.get_cell(neighbour_cell).get_zone()),
				None => {
					let neighbour_tile = self.dimensions.get_tile_of(&neighbour);
					let zone = self
						.zones
						.get(&neighbour_tile)
						.map(|t| t.get_cell(self.dimensions.get_field_cell(&neighbour)).get_zone())
						.unwrap_or(TraversableZoneId::EMPTY);
					(neighbour_tile, zone)
				}
			};
			if target_zone.is_empty() {
				return Neighbour::Blocked;
			}
			return Neighbour::Crossing(GlobalZoneId::new(target_tile, target_zone));
		}
		if let Some((a, b)) = direction.get_cardinal_components() {
			if boundary.contains(a) || boundary.contains(b) {
				return Neighbour::Skipped;
			}
		}
		Neighbour::Blocked
	}
	/// Step counter-clockwise from a crossing to the first unvisited
	/// crossing of its run within the cell, so a walk begins at the start of
	/// a run
	fn get_run_start(
		&self,
		region_tile: &RegionTile,
		owner: GlobalZoneId,
		cell: FieldCell,
		direction: Ordinal,
		visited: DirectionalityInformation,
	) -> Ordinal {
		let target = self.classify(region_tile, owner, cell, direction);
		let mut start = direction;
		let mut cursor = direction;
		for _ in 0..7 {
			cursor = cursor.rotate_counter_clockwise(1);
			if visited.contains(cursor) {
				break;
			}
			match self.classify(region_tile, owner, cell, cursor) {
				Neighbour::Skipped => {}
				n if n == target => start = cursor,
				_ => break,
			}
		}
		start
	}
	/// Emit the edges of a single cell zone by inspecting every neighbour
	fn record_isolated_cell(
		&self,
		region_tile: &RegionTile,
		owner: GlobalZoneId,
		cell: FieldCell,
		zone_edges: &mut ZoneEdges,
		scratch: &mut ScratchBuffers,
	) {
		let boundary = region_tile.get_cell(cell).get_boundary();
		let Some(first) = boundary
			.iter()
			.find(|d| matches!(self.classify(region_tile, owner, cell, *d), Neighbour::Crossing(_)))
		else {
			return;
		};
		let start = self.get_run_start(
			region_tile,
			owner,
			cell,
			first,
			DirectionalityInformation::NONE,
		);
		let position = self
			.dimensions
			.get_global_position(&owner.get_tile(), cell);
		let mut tracker = RunTracker::new(&mut scratch.run_positions, &mut scratch.runs);
		for step in 0..8 {
			let direction = start.rotate_clockwise(step);
			match self.classify(region_tile, owner, cell, direction) {
				Neighbour::Crossing(target) => tracker.record(target, position, direction),
				Neighbour::Skipped => {}
				Neighbour::Member | Neighbour::Blocked => tracker.close(),
			}
		}
		tracker.emit(owner, zone_edges);
	}
	/// Walk the boundary of a zone clockwise beginning at `cell` looking in
	/// `start`, emitting an edge for each run of crossings
	fn walk(
		&self,
		region_tile: &RegionTile,
		owner: GlobalZoneId,
		cell: FieldCell,
		start: Ordinal,
		zone_edges: &mut ZoneEdges,
		scratch: &mut ScratchBuffers,
	) {
		let tile = owner.get_tile();
		let resolution = self.dimensions.get_tile_resolution() as usize;
		let limit = get_boundary_walk_limit(self.dimensions.get_cell_count());
		let visited = &mut scratch.visited;
		let mut tracker = RunTracker::new(&mut scratch.run_positions, &mut scratch.runs);
		let mut current = cell;
		let mut scan_start = start;
		let mut steps = 0;
		'walk: loop {
			steps += 1;
			if steps > limit {
				panic!(
					"Boundary walk of {:?} exceeded {} steps starting at {:?}",
					owner,
					limit,
					cell.get_column_row()
				);
			}
			let position = self.dimensions.get_global_position(&tile, current);
			let index = current.get_index(resolution);
			let mut next = None;
			for offset in 0..8 {
				let direction = scan_start.rotate_clockwise(offset);
				let neighbour = self.classify(region_tile, owner, current, direction);
				if neighbour == Neighbour::Member {
					next = Some(direction);
					break;
				}
				if visited[index].contains(direction) {
					break 'walk;
				}
				visited[index].insert(direction);
				match neighbour {
					Neighbour::Crossing(target) => tracker.record(target, position, direction),
					Neighbour::Blocked => tracker.close(),
					Neighbour::Skipped | Neighbour::Member => {}
				}
			}
			let Some(direction) = next else {
				break;
			};
			let Some(moved) = self
				.dimensions
				.get_local_cell(&tile, &position.step(direction))
			else {
				panic!(
					"Boundary walk of {:?} left its tile moving {:?} from {:?}",
					owner,
					direction,
					current.get_column_row()
				);
			};
			current = moved;
			scan_start = if direction.is_diagonal() {
				direction.inverse().rotate_clockwise(1)
			} else {
				direction.inverse().rotate_clockwise(2)
			};
		}
		tracker.emit(owner, zone_edges);
	}
}

// #[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;

	const WALK: MovementMode = MovementMode::new(1);

	/// Paint every tile of `fields` for walking and run a full detection on
	/// `tile`
	fn detect(fields: &MovementFields, tile: TileID) -> (RegionView<RegionTile>, TileEdges) {
		let dimensions = *fields.get_dimensions();
		let modes = vec![(MovementModeIndex::new(0), WALK)];
		let painter = RegionPainter::new(dimensions, &modes, DistanceCalculation::Euclidean);
		let mut scratch = ScratchBuffers::default();
		let mut zones = RegionView::new();
		for id in fields.get_tiles() {
			let mut region_tile = RegionTile::new(dimensions.get_tile_resolution() as usize);
			painter.paint(fields, id, &mut region_tile, &mut scratch);
			zones.insert(id, region_tile);
		}
		let detector = EdgeDetector::new(dimensions, &zones);
		let mut tile_edges = TileEdges::default();
		detector.detect(tile, true, &mut tile_edges, &mut scratch);
		(zones, tile_edges)
	}
	/// `(direction, run_length)` of every outbound edge of a zone, sorted
	fn summary(zone_edges: &ZoneEdges) -> Vec<(Ordinal, u32)> {
		let mut result: Vec<(Ordinal, u32)> = zone_edges
			.get_outbound()
			.values()
			.map(|e| (e.get_direction(), e.get_run_length()))
			.collect();
		result.sort();
		result
	}
	/// A 3x3 block of tiles centred on the origin
	fn block() -> Vec<TileID> {
		let mut tiles = Vec::new();
		for row in -1..=1 {
			for column in -1..=1 {
				tiles.push(TileID::new(column, row, 0));
			}
		}
		tiles
	}
	#[test]
	fn open_tile_has_one_edge_per_side() {
		let dimensions = RegionDimensions::new(10);
		let fields = MovementFields::new_with_cost(&dimensions, &[WALK], &block(), 1.0);
		let (_, tile_edges) = detect(&fields, TileID::new(0, 0, 0));
		let zone = tile_edges.get_zone(&TraversableZoneId::new(0)).unwrap();
		let actual = vec![
			(Ordinal::North, 10),
			(Ordinal::East, 10),
			(Ordinal::South, 10),
			(Ordinal::West, 10),
		];
		assert_eq!(actual, summary(zone));
		let north = zone
			.get_outbound()
			.values()
			.find(|e| e.get_direction() == Ordinal::North)
			.unwrap();
		assert_eq!(GridPosition::new(5, 0, 0), north.get_source());
		assert_eq!(TileID::new(0, -1, 0), north.get_target().get_tile());
	}
	#[test]
	fn lone_tile_has_no_edges() {
		let dimensions = RegionDimensions::new(10);
		let tile = TileID::new(0, 0, 0);
		let fields = MovementFields::new_with_cost(&dimensions, &[WALK], &[tile], 1.0);
		let (_, tile_edges) = detect(&fields, tile);
		assert_eq!(0, tile_edges.get_outbound_count());
		assert!(tile_edges
			.get_zone(&TraversableZoneId::new(0))
			.unwrap()
			.is_edges_dirty());
	}
	#[test]
	fn wall_split_edges() {
		//  _______________________________________
		// |  0  0  0  0  0  #  1  1  1  1 |
		// |  0  0  0  0  0  #  1  1  1  1 |
		// |             ...               |
		// |  0  0  0  0  0  #  1  1  1  1 |
		//  ---------------------------------------
		let dimensions = RegionDimensions::new(10);
		let tile = TileID::new(0, 0, 0);
		let mut fields = MovementFields::new_with_cost(&dimensions, &[WALK], &block(), 1.0);
		for row in 0..10 {
			fields.set_cell_cost(WALK, &GridPosition::new(5, row, 0), 0.0).unwrap();
		}
		let (_, tile_edges) = detect(&fields, tile);
		let left = tile_edges.get_zone(&TraversableZoneId::new(0)).unwrap();
		let right = tile_edges.get_zone(&TraversableZoneId::new(1)).unwrap();
		assert_eq!(
			vec![(Ordinal::North, 5), (Ordinal::South, 5), (Ordinal::West, 10)],
			summary(left)
		);
		assert_eq!(
			vec![(Ordinal::North, 4), (Ordinal::East, 10), (Ordinal::South, 4)],
			summary(right)
		);
		assert!(left
			.get_outbound()
			.values()
			.all(|e| e.get_target().get_tile() != tile));
	}
	#[test]
	fn isolated_cell_single_edge() {
		let dimensions = RegionDimensions::new(10);
		let tile = TileID::new(0, 0, 0);
		let west = TileID::new(-1, 0, 0);
		let mut fields = MovementFields::new_with_cost(&dimensions, &[WALK], &[west], 1.0);
		let mut field = MovementField::new_with_cost(10, 0.0);
		field.set_cost(FieldCell::new(0, 5), 1.0);
		fields.insert_field(WALK, tile, field);
		let (zones, tile_edges) = detect(&fields, tile);
		let region_tile = zones.get(&tile).unwrap();
		assert_eq!(1, region_tile.get_zones().len());
		assert!(region_tile.get_zones()[0].is_isolated());
		let zone = tile_edges.get_zone(&TraversableZoneId::new(0)).unwrap();
		assert_eq!(vec![(Ordinal::West, 1)], summary(zone));
	}
	#[test]
	fn diagonal_crossings_form_their_own_edge() {
		// a corridor along row 5 of the tile east of an open tile
		let dimensions = RegionDimensions::new(10);
		let open = TileID::new(0, 0, 0);
		let corridor = TileID::new(1, 0, 0);
		let mut fields = MovementFields::new_with_cost(&dimensions, &[WALK], &[open], 1.0);
		let mut field = MovementField::new_with_cost(10, 0.0);
		for column in 0..10 {
			field.set_cost(FieldCell::new(column, 5), 1.0);
		}
		fields.insert_field(WALK, corridor, field);
		let (_, tile_edges) = detect(&fields, open);
		let zone = tile_edges.get_zone(&TraversableZoneId::new(0)).unwrap();
		// (9, 4) south-east and (9, 5) east form one run, (9, 6) north-east
		// is seen from the other side of the corridor mouth
		assert_eq!(
			vec![(Ordinal::NorthEast, 1), (Ordinal::East, 2)],
			summary(zone)
		);
		assert!(zone
			.get_outbound()
			.values()
			.all(|e| e.get_entry() == GridPosition::new(10, 5, 0)));
	}
	#[test]
	fn edges_retracted_from_neighbours() {
		let dimensions = RegionDimensions::new(10);
		let a = TileID::new(0, 0, 0);
		let b = TileID::new(1, 0, 0);
		let fields = MovementFields::new_with_cost(&dimensions, &[WALK], &[a, b], 1.0);
		let modes = vec![(MovementModeIndex::new(0), WALK)];
		let painter = RegionPainter::new(dimensions, &modes, DistanceCalculation::Euclidean);
		let mut scratch = ScratchBuffers::default();
		let mut zones = RegionView::new();
		for id in [a, b] {
			let mut region_tile = RegionTile::new(10);
			painter.paint(&fields, id, &mut region_tile, &mut scratch);
			zones.insert(id, region_tile);
		}
		let detector = EdgeDetector::new(dimensions, &zones);
		let mut edges = RegionView::new();
		for id in [a, b] {
			let mut tile_edges = TileEdges::default();
			detector.detect(id, true, &mut tile_edges, &mut scratch);
			edges.insert(id, tile_edges);
		}
		stitch(&mut edges, &[a, b]);
		let zone = TraversableZoneId::new(0);
		let b_zone = edges.get(&b).unwrap().get_zone(&zone).unwrap();
		assert_eq!(1, b_zone.get_inbound().len());
		assert_eq!(1, b_zone.get_outbound().len());
		assert!(!b_zone.is_edges_dirty());

		remove_tile_edges(&mut edges, &a);
		assert!(!edges.contains(&a));
		let b_zone = edges.get(&b).unwrap().get_zone(&zone).unwrap();
		assert!(b_zone.get_inbound().is_empty());
		assert!(b_zone.get_outbound().is_empty());
		assert!(b_zone.is_costs_dirty());
	}
	#[test]
	fn strip_clearing_keeps_inbound() {
		let dimensions = RegionDimensions::new(10);
		let a = TileID::new(0, 0, 0);
		let b = TileID::new(1, 0, 0);
		let fields = MovementFields::new_with_cost(&dimensions, &[WALK], &[a, b], 1.0);
		let modes = vec![(MovementModeIndex::new(0), WALK)];
		let painter = RegionPainter::new(dimensions, &modes, DistanceCalculation::Euclidean);
		let mut scratch = ScratchBuffers::default();
		let mut zones = RegionView::new();
		for id in [a, b] {
			let mut region_tile = RegionTile::new(10);
			painter.paint(&fields, id, &mut region_tile, &mut scratch);
			zones.insert(id, region_tile);
		}
		let detector = EdgeDetector::new(dimensions, &zones);
		let mut edges = RegionView::new();
		for id in [a, b] {
			let mut tile_edges = TileEdges::default();
			detector.detect(id, true, &mut tile_edges, &mut scratch);
			edges.insert(id, tile_edges);
		}
		stitch(&mut edges, &[a, b]);
		clear_strip_edges(&mut edges, &zones, dimensions, &b, &[Ordinal::West]);
		let zone = TraversableZoneId::new(0);
		let b_zone = edges.get(&b).unwrap().get_zone(&zone).unwrap();
		assert!(b_zone.get_outbound().is_empty());
		assert_eq!(1, b_zone.get_inbound().len());
		assert!(b_zone.is_edges_dirty());
		let a_zone = edges.get(&a).unwrap().get_zone(&zone).unwrap();
		assert!(a_zone.get_inbound().is_empty());
		// detect the cleared zone again and stitch it back
		let mut tile_edges = edges.remove(&b).unwrap();
		detector.detect(b, false, &mut tile_edges, &mut scratch);
		edges.insert(b, tile_edges);
		stitch(&mut edges, &[b]);
		let a_zone = edges.get(&a).unwrap().get_zone(&zone).unwrap();
		assert_eq!(1, a_zone.get_inbound().len());
	}
	#[test]
	fn costs_dirty_spreads_to_sources() {
		let a = TileID::new(0, 0, 0);
		let b = TileID::new(1, 0, 0);
		let zone = TraversableZoneId::new(0);
		let mut edges = RegionView::new();
		let mut a_edges = TileEdges::default();
		let key = a_edges.get_or_insert_zone(zone).push_outbound(
			GlobalZoneId::new(a, zone),
			GridPosition::new(9, 5, 0),
			Ordinal::East,
			GlobalZoneId::new(b, zone),
			10,
		);
		a_edges.get_or_insert_zone(zone).set_costs_dirty(false);
		let mut b_edges = TileEdges::default();
		b_edges.get_or_insert_zone(zone).insert_inbound(InboundConnection::new(
			key,
			GridPosition::new(10, 5, 0),
			Ordinal::East,
		));
		b_edges.get_or_insert_zone(zone).set_costs_dirty(false);
		edges.insert(a, a_edges);
		edges.insert(b, b_edges);
		mark_tile_costs_dirty(&mut edges, &b);
		assert!(edges.get(&b).unwrap().get_zone(&zone).unwrap().is_costs_dirty());
		assert!(edges.get(&a).unwrap().get_zone(&zone).unwrap().is_costs_dirty());
	}
	#[test]
	fn run_tracker_joins_wrapped_run() {
		let zone = TraversableZoneId::new(0);
		let owner = GlobalZoneId::new(TileID::new(0, 0, 0), zone);
		let north = GlobalZoneId::new(TileID::new(0, -1, 0), zone);
		let east = GlobalZoneId::new(TileID::new(1, 0, 0), zone);
		let mut positions = Vec::new();
		let mut runs = Vec::new();
		let mut tracker = RunTracker::new(&mut positions, &mut runs);
		tracker.record(north, GridPosition::new(2, 0, 0), Ordinal::North);
		tracker.record(north, GridPosition::new(3, 0, 0), Ordinal::North);
		tracker.close();
		tracker.record(east, GridPosition::new(9, 1, 0), Ordinal::East);
		tracker.close();
		tracker.record(north, GridPosition::new(0, 0, 0), Ordinal::North);
		tracker.record(north, GridPosition::new(1, 0, 0), Ordinal::North);
		let mut zone_edges = ZoneEdges::new_dirty();
		tracker.emit(owner, &mut zone_edges);
		let edges: Vec<&RegionEdge> = zone_edges.get_outbound().values().collect();
		assert_eq!(2, edges.len());
		assert_eq!(1, edges[0].get_run_length());
		assert_eq!(4, edges[1].get_run_length());
		assert_eq!(GridPosition::new(2, 0, 0), edges[1].get_source());
	}
}
