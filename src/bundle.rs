//! Groups the components required by [crate::plugin::RegionGraphPlugin]
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Movement data and the zone/edge graph built over it
#[derive(Bundle)]
pub struct RegionGraphBundle {
	/// Graph maintained by the plugin's systems
	region_graph: RegionGraph,
	/// Movement data the graph is painted from
	movement_fields: MovementFields,
}

impl RegionGraphBundle {
	/// Create a new instance of [RegionGraphBundle]. Each combination is
	/// registered and every tile of `movement_fields` is queued so the first
	/// tick builds the whole graph
	pub fn new(
		movement_fields: MovementFields,
		combinations: &[(MovementMode, DistanceCalculation)],
	) -> Result<Self, RegionError> {
		let mut region_graph = RegionGraph::new(*movement_fields.get_dimensions());
		for (mode, distance) in combinations {
			region_graph.register_movement_combination(*mode, *distance)?;
		}
		for tile in movement_fields.get_tiles() {
			region_graph.notify_tile_changed(tile, TileChange::Created)?;
		}
		Ok(RegionGraphBundle {
			region_graph,
			movement_fields,
		})
	}
	/// Create a new instance of [RegionGraphBundle] where the
	/// [MovementFields] are derived from disk
	#[cfg(feature = "ron")]
	pub fn from_ron(
		path: &str,
		combinations: &[(MovementMode, DistanceCalculation)],
	) -> Result<Self, RegionError> {
		let movement_fields = MovementFields::from_ron(path)?;
		RegionGraphBundle::new(movement_fields, combinations)
	}
	/// Create a new instance of [RegionGraphBundle] from a directory of cost
	/// CSVs
	#[cfg(feature = "csv")]
	pub fn from_csv_dir(
		dimensions: &RegionDimensions,
		directory: &str,
		combinations: &[(MovementMode, DistanceCalculation)],
	) -> Result<Self, RegionError> {
		let movement_fields = MovementFields::from_csv_dir(dimensions, directory)?;
		RegionGraphBundle::new(movement_fields, combinations)
	}
	pub fn get_region_graph(&self) -> &RegionGraph {
		&self.region_graph
	}
	pub fn get_movement_fields(&self) -> &MovementFields {
		&self.movement_fields
	}
}
