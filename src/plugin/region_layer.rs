//! Systems that feed changes of [MovementFields] into the [RegionGraph] and
//! run each stage of the graph update
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Notification that the movement data of a tile changed
#[derive(Event, Clone, Copy, Debug)]
pub struct EventMovementDataChanged {
	/// The tile whose data changed
	tile: TileID,
	/// What happened to it
	change: TileChange,
}

impl EventMovementDataChanged {
	/// Create a new instance of [EventMovementDataChanged]
	#[cfg(not(tarpaulin_include))]
	pub fn new(tile: TileID, change: TileChange) -> Self {
		EventMovementDataChanged { tile, change }
	}
	#[cfg(not(tarpaulin_include))]
	pub fn get_tile(&self) -> TileID {
		self.tile
	}
	#[cfg(not(tarpaulin_include))]
	pub fn get_change(&self) -> TileChange {
		self.change
	}
}

/// Used to update the cost of a single cell of a [MovementField]
#[derive(Event, Clone, Copy, Debug)]
pub struct EventUpdateMovementCell {
	/// Mode whose field is updated
	mode: MovementMode,
	/// Cell to update
	position: GridPosition,
	/// The cost the cell should be assigned
	cost: f32,
}

impl EventUpdateMovementCell {
	/// Create a new instance of [EventUpdateMovementCell]
	#[cfg(not(tarpaulin_include))]
	pub fn new(mode: MovementMode, position: GridPosition, cost: f32) -> Self {
		EventUpdateMovementCell {
			mode,
			position,
			cost,
		}
	}
	#[cfg(not(tarpaulin_include))]
	pub fn get_mode(&self) -> MovementMode {
		self.mode
	}
	#[cfg(not(tarpaulin_include))]
	pub fn get_position(&self) -> GridPosition {
		self.position
	}
	#[cfg(not(tarpaulin_include))]
	pub fn get_cost(&self) -> f32 {
		self.cost
	}
}

/// Read [EventUpdateMovementCell] and update the values within
/// [MovementFields]. A change between passable and impassable repaints the
/// tile, any other only recosts it
#[cfg(not(tarpaulin_include))]
pub fn process_movement_cell_updates(
	mut events: EventReader<EventUpdateMovementCell>,
	mut query: Query<(&mut RegionGraph, &mut MovementFields)>,
) {
	for event in events.read() {
		for (mut graph, mut fields) in query.iter_mut() {
			let dimensions = *fields.get_dimensions();
			let position = event.get_position();
			let tile = dimensions.get_tile_of(&position);
			let previous = fields
				.get_field(event.get_mode(), &tile)
				.map(|field| field.get_cost(dimensions.get_field_cell(&position)));
			let tile = match fields.set_cell_cost(event.get_mode(), &position, event.get_cost()) {
				Ok(tile) => tile,
				Err(e) => {
					error!("Cannot update cell {:?}: {}", position, e);
					continue;
				}
			};
			let change = match previous {
				Some(cost) if (cost > 0.0) == (event.get_cost() > 0.0) => TileChange::CostsChanged,
				_ => TileChange::Modified,
			};
			if let Err(e) = graph.notify_tile_changed(tile, change) {
				error!("{}", e);
			}
		}
	}
}

/// Read [EventMovementDataChanged] and flag the affected tiles
#[cfg(not(tarpaulin_include))]
pub fn process_movement_data_changes(
	mut events: EventReader<EventMovementDataChanged>,
	mut query: Query<&mut RegionGraph>,
) {
	for event in events.read() {
		for mut graph in query.iter_mut() {
			if let Err(e) = graph.notify_tile_changed(event.get_tile(), event.get_change()) {
				warn!("Ignoring {:?}: {}", event.get_change(), e);
			}
		}
	}
}

/// Retract edges of changed tiles and flag the strips of their neighbours
#[cfg(not(tarpaulin_include))]
pub fn prepare_modified_zones(mut query: Query<&mut RegionGraph>) {
	for mut graph in query.iter_mut() {
		let removed = graph.prepare_modified_zones();
		if !removed.is_empty() {
			debug!("Removed tiles {:?}", removed);
		}
	}
}

/// Repaint the zones of dirty tiles
#[cfg(not(tarpaulin_include))]
pub fn recompute_pathfinder_zones(mut query: Query<(&mut RegionGraph, &MovementFields)>) {
	for (mut graph, fields) in query.iter_mut() {
		graph.recompute_pathfinder_zones(fields);
	}
}

/// Detect and stitch the edges of repainted tiles
#[cfg(not(tarpaulin_include))]
pub fn recompute_edges(mut query: Query<&mut RegionGraph>) {
	for mut graph in query.iter_mut() {
		graph.recompute_edges();
	}
}

/// Recalculate the costs of zones whose edges changed
#[cfg(not(tarpaulin_include))]
pub fn recalculate_edge_costs(mut query: Query<(&mut RegionGraph, &MovementFields)>) {
	for (mut graph, fields) in query.iter_mut() {
		graph.recalculate_edge_costs(fields, &AStarPathfinderFactory);
	}
}
