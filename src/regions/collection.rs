//! The [RegionGraph] owns the zones and edges of every tile and drives the
//! four stages that keep them up to date as movement data changes:
//!
//! 1. Prepare - retract the edges of changed tiles and flag the facing strips
//!    of their neighbours
//! 2. Paint - repaint changed tiles and refresh the boundaries of flagged
//!    strips
//! 3. Detect - walk the boundaries of zones needing detection and stitch the
//!    new edges into their targets
//! 4. Cost - recalculate the paths and crossing costs of dirty zones
//!
//! Stages 2 to 4 are spread across bevy's [bevy::tasks::ComputeTaskPool]
//! with each tile, or zone for costing, handled by a single job.
//!

use crate::prelude::*;
use bevy::prelude::*;

/// What a call to [RegionGraph::process_tick] did
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
	/// Tiles painted from scratch
	painted: Vec<TileID>,
	/// Tiles whose edges were detected, in full or along strips
	detected: Vec<TileID>,
	/// Tiles dropped because their data expired
	removed: Vec<TileID>,
	/// Number of zones whose costs were recalculated
	costed_zones: usize,
}

impl TickReport {
	pub fn get_painted(&self) -> &[TileID] {
		&self.painted
	}
	pub fn get_detected(&self) -> &[TileID] {
		&self.detected
	}
	pub fn get_removed(&self) -> &[TileID] {
		&self.removed
	}
	pub fn get_costed_zones(&self) -> usize {
		self.costed_zones
	}
	/// Did the tick change nothing
	pub fn is_idle(&self) -> bool {
		self.painted.is_empty()
			&& self.detected.is_empty()
			&& self.removed.is_empty()
			&& self.costed_zones == 0
	}
}

/// Zones and edges of a world split into tiles
#[derive(Component, Clone, Default, Debug)]
pub struct RegionGraph {
	/// Size of the tiles
	dimensions: RegionDimensions,
	/// Registered movement modes
	encoding: MovementModeEncoding,
	/// Registered combinations, sorted
	combinations: Vec<MovementCombination>,
	/// Style zones are painted with, the most restrictive registered
	painting_distance: DistanceCalculation,
	/// Painted zones of every known tile
	zones: RegionView<RegionTile>,
	/// Edges of every known tile
	edges: RegionView<TileEdges>,
	/// Working memory of the jobs
	arena: ScratchArena,
}

impl RegionGraph {
	/// Create a new instance of [RegionGraph] with no tiles
	pub fn new(dimensions: RegionDimensions) -> Self {
		RegionGraph {
			dimensions,
			..Default::default()
		}
	}
	pub fn get_dimensions(&self) -> &RegionDimensions {
		&self.dimensions
	}
	pub fn get_encoding(&self) -> &MovementModeEncoding {
		&self.encoding
	}
	pub fn get_combinations(&self) -> &[MovementCombination] {
		&self.combinations
	}
	pub fn get_painting_distance(&self) -> DistanceCalculation {
		self.painting_distance
	}
	pub fn get_zone_data(&self) -> &RegionView<RegionTile> {
		&self.zones
	}
	pub fn get_edge_data(&self) -> &RegionView<TileEdges> {
		&self.edges
	}
	/// Register a movement mode together with the style its edges are
	/// costed with. Registering a new mode or tightening the painting style
	/// marks every tile for repainting
	pub fn register_movement_combination(
		&mut self,
		mode: MovementMode,
		distance: DistanceCalculation,
	) -> Result<MovementCombination, RegionError> {
		let (index, new_mode) = match self.encoding.get_index(mode) {
			Some(index) => (index, false),
			None => {
				if self.encoding.len() >= MAX_MASKABLE_MODES {
					return Err(RegionError::ModeMaskCapacityExceeded {
						mode,
						index: self.encoding.len(),
						limit: MAX_MASKABLE_MODES,
					});
				}
				(self.encoding.try_register(mode)?, true)
			}
		};
		let combination = MovementCombination::new(index, distance);
		if self.combinations.contains(&combination) {
			return Ok(combination);
		}
		self.combinations.push(combination);
		self.combinations.sort();
		let painting = self
			.combinations
			.iter()
			.fold(DistanceCalculation::default(), |style, c| style.combine(c.get_distance()));
		if new_mode || painting != self.painting_distance {
			self.painting_distance = painting;
			for (_, region_tile) in self.zones.iter_mut() {
				region_tile.mark(RegionEdgeState::DIRTY);
			}
		} else {
			for (_, tile_edges) in self.edges.iter_mut() {
				for (_, zone_edges) in tile_edges.iter_mut() {
					zone_edges.set_costs_dirty(true);
				}
			}
		}
		debug!(
			"Registered {:?}, zones painted with {:?}",
			combination, self.painting_distance
		);
		Ok(combination)
	}
	/// Record a change to the movement data of a tile. Only
	/// [TileChange::Created] is accepted for a tile not yet known
	pub fn notify_tile_changed(&mut self, tile: TileID, change: TileChange) -> Result<(), RegionError> {
		let resolution = self.dimensions.get_tile_resolution() as usize;
		match (change, self.zones.get_mut(&tile)) {
			(TileChange::Created, Some(region_tile)) => {
				region_tile.mark_clean();
				region_tile.mark(RegionEdgeState::DIRTY);
			}
			(TileChange::Created, None) => {
				self.zones.insert(tile, RegionTile::new(resolution));
			}
			(change, Some(region_tile)) => region_tile.mark(change.get_state()),
			(_, None) => return Err(RegionError::UnknownTile(tile)),
		}
		Ok(())
	}
	/// Record a change to the movement data of the cell at `position`
	pub fn notify_cell_changed(&mut self, position: &GridPosition) -> Result<(), RegionError> {
		let tile = self.dimensions.get_tile_of(position);
		self.notify_tile_changed(tile, TileChange::Modified)
	}
	/// Retract the edges of every tile to be repainted or removed, flag the
	/// strips of their neighbours and clear the edges along flagged strips.
	/// A neighbour with a sink along a flagged strip is repainted too.
	/// Returns the tiles removed
	pub fn prepare_modified_zones(&mut self) -> Vec<TileID> {
		let mut changed: Vec<(TileID, RegionEdgeState)> = self
			.zones
			.iter()
			.filter(|(_, t)| t.get_state().is_dirty_or_removed())
			.map(|(tile, t)| (tile, t.get_state()))
			.collect();
		let mut flagged = 0;
		while flagged < changed.len() {
			for (tile, _) in &changed[flagged..] {
				for (ordinal, neighbour) in tile.get_neighbours_with_ordinal() {
					if let Some(region_tile) = self.zones.get_mut(&neighbour) {
						region_tile.mark(RegionEdgeState::for_side(ordinal.inverse()));
					}
				}
			}
			flagged = changed.len();
			// a sink along a flagged side may have only been enterable from
			// the changed neighbour, its tile is repainted in full
			let escalated: Vec<TileID> = self
				.zones
				.iter()
				.filter(|(_, t)| {
					let state = t.get_state();
					!state.is_dirty_or_removed()
						&& state.has_sides()
						&& holds_strip_sink(&self.dimensions, t, &state.get_sides())
				})
				.map(|(tile, _)| tile)
				.collect();
			for tile in escalated {
				if let Some(region_tile) = self.zones.get_mut(&tile) {
					trace!("Repainting {:?}, a sink borders a changed tile", tile);
					region_tile.mark(RegionEdgeState::DIRTY);
					changed.push((tile, region_tile.get_state()));
				}
			}
		}
		let mut removed = Vec::new();
		for (tile, state) in &changed {
			remove_tile_edges(&mut self.edges, tile);
			if state.contains(RegionEdgeState::MARKED_FOR_REMOVE) {
				self.zones.remove(tile);
				removed.push(*tile);
			}
		}
		let strips: Vec<(TileID, Vec<Ordinal>)> = self
			.zones
			.iter()
			.filter(|(_, t)| !t.get_state().is_dirty_or_removed() && t.get_state().has_sides())
			.map(|(tile, t)| (tile, t.get_state().get_sides()))
			.collect();
		for (tile, sides) in &strips {
			clear_strip_edges(&mut self.edges, &self.zones, self.dimensions, tile, sides);
		}
		let costs: Vec<TileID> = self
			.zones
			.iter()
			.filter(|(_, t)| {
				!t.get_state().is_dirty_or_removed()
					&& t.get_state().contains(RegionEdgeState::PATH_DIRTY)
			})
			.map(|(tile, _)| tile)
			.collect();
		for tile in &costs {
			mark_tile_costs_dirty(&mut self.edges, tile);
		}
		debug!(
			"Prepared {} changed tiles, {} strip tiles and {} cost tiles",
			changed.len(),
			strips.len(),
			costs.len()
		);
		removed
	}
	/// Repaint dirty tiles and refresh the boundaries of flagged strips.
	/// Returns the tiles painted from scratch
	pub fn recompute_pathfinder_zones<P: MovementDataProvider>(&mut self, provider: &P) -> Vec<TileID> {
		let modes: Vec<(MovementModeIndex, MovementMode)> = self.encoding.iter().collect();
		let painter = RegionPainter::new(self.dimensions, &modes, self.painting_distance);
		let mut work: Vec<(TileID, &mut RegionTile)> = self
			.zones
			.iter_mut()
			.filter(|(_, t)| {
				t.get_state().contains(RegionEdgeState::DIRTY) || t.get_state().has_sides()
			})
			.collect();
		let painted: Vec<TileID> = work
			.iter()
			.filter(|(_, t)| t.get_state().contains(RegionEdgeState::DIRTY))
			.map(|(tile, _)| *tile)
			.collect();
		self.arena.fork_join(&mut work, |(tile, region_tile), scratch| {
			let state = region_tile.get_state();
			if state.contains(RegionEdgeState::DIRTY) {
				painter.paint(provider, *tile, region_tile, scratch);
			} else {
				painter.refresh_strips(provider, *tile, region_tile, &state.get_sides());
			}
		});
		debug!(
			"Painted {} tiles, refreshed strips of {}",
			painted.len(),
			work.len() - painted.len()
		);
		painted
	}
	/// Detect the edges of repainted tiles and of zones along flagged strips,
	/// then stitch them into their targets. Every tile is left clean. Returns
	/// the tiles detected
	pub fn recompute_edges(&mut self) -> Vec<TileID> {
		let targets: Vec<(TileID, bool)> = self
			.zones
			.iter()
			.filter(|(_, t)| {
				t.get_state().contains(RegionEdgeState::DIRTY) || t.get_state().has_sides()
			})
			.map(|(tile, t)| (tile, t.get_state().contains(RegionEdgeState::DIRTY)))
			.collect();
		let mut work: Vec<(TileID, bool, TileEdges)> = targets
			.into_iter()
			.map(|(tile, full)| (tile, full, self.edges.remove(&tile).unwrap_or_default()))
			.collect();
		let detector = EdgeDetector::new(self.dimensions, &self.zones);
		self.arena
			.fork_join(&mut work, |(tile, full, tile_edges), scratch| {
				detector.detect(*tile, *full, tile_edges, scratch);
			});
		let mut detected = Vec::with_capacity(work.len());
		for (tile, _, tile_edges) in work {
			self.edges.insert(tile, tile_edges);
			detected.push(tile);
		}
		stitch(&mut self.edges, &detected);
		for (_, region_tile) in self.zones.iter_mut() {
			region_tile.mark_clean();
		}
		debug!("Detected edges of {} tiles", detected.len());
		detected
	}
	/// Recalculate the costs of every zone flagged as dirty. Returns the
	/// number of zones costed
	pub fn recalculate_edge_costs<P: MovementDataProvider, F: PathfinderFactory>(
		&mut self,
		provider: &P,
		factory: &F,
	) -> usize {
		let calculator = EdgeCostCalculator::new(
			self.dimensions,
			&self.zones,
			&self.combinations,
			&self.encoding,
		);
		let mut work: Vec<(GlobalZoneId, &mut ZoneEdges)> = self
			.edges
			.iter_mut()
			.flat_map(|(tile, tile_edges)| {
				tile_edges
					.iter_mut()
					.filter(|(_, z)| z.is_costs_dirty())
					.map(move |(zone, z)| (GlobalZoneId::new(tile, *zone), z))
			})
			.collect();
		let count = work.len();
		self.arena.fork_join(&mut work, |(owner, zone_edges), scratch| {
			calculator.calculate(provider, factory, *owner, zone_edges, scratch);
		});
		debug!("Costed {} zones", count);
		count
	}
	/// Run every stage in order
	pub fn process_tick<P: MovementDataProvider, F: PathfinderFactory>(
		&mut self,
		provider: &P,
		factory: &F,
	) -> TickReport {
		let removed = self.prepare_modified_zones();
		let painted = self.recompute_pathfinder_zones(provider);
		let detected = self.recompute_edges();
		let costed_zones = self.recalculate_edge_costs(provider, factory);
		TickReport {
			painted,
			detected,
			removed,
			costed_zones,
		}
	}
	/// Zone containing `position`, if painted
	pub fn get_zone_at(&self, position: &GridPosition) -> Option<GlobalZoneId> {
		let tile = self.dimensions.get_tile_of(position);
		let zone = self
			.zones
			.get(&tile)?
			.get_cell(self.dimensions.get_field_cell(position))
			.get_zone();
		if zone.is_empty() {
			None
		} else {
			Some(GlobalZoneId::new(tile, zone))
		}
	}
	pub fn get_zone_edges(&self, zone: &GlobalZoneId) -> Option<&ZoneEdges> {
		self.edges.get(&zone.get_tile())?.get_zone(&zone.get_zone())
	}
	pub fn get_edge(&self, key: &EdgeKey) -> Option<&RegionEdge> {
		self.get_zone_edges(&key.get_owner())?
			.get_outbound_edge(&key.get_local_id())
	}
}
