//! Defines the Bevy [Plugin] for building zone/edge graphs
//!

use crate::prelude::*;
use bevy::prelude::*;

pub mod region_layer;

/// Stages of a graph update, run in order every tick
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum RegionSet {
	/// Apply notifications and retract the edges of changed tiles
	Prepare,
	/// Repaint zones
	Paint,
	/// Detect and stitch edges
	Detect,
	/// Recalculate edge costs
	Cost,
}

pub struct RegionGraphPlugin;

impl Plugin for RegionGraphPlugin {
	#[cfg(not(tarpaulin_include))]
	fn build(&self, app: &mut App) {
		app.register_type::<Ordinal>()
			.register_type::<DirectionalityInformation>()
			.register_type::<RegionDimensions>()
			.register_type::<GridPosition>()
			.register_type::<TileID>()
			.register_type::<FieldCell>()
			.register_type::<MovementMode>()
			.register_type::<MovementModeIndex>()
			.register_type::<MovementModeMask>()
			.register_type::<DistanceCalculation>()
			.register_type::<MovementCombination>()
			.register_type::<TraversableZoneId>()
			.register_type::<GlobalZoneId>()
			.add_event::<region_layer::EventMovementDataChanged>()
			.add_event::<region_layer::EventUpdateMovementCell>()
			.configure_sets(
				Update,
				(
					RegionSet::Prepare,
					RegionSet::Paint,
					RegionSet::Detect,
					RegionSet::Cost,
				)
					.chain(),
			)
			.add_systems(
				Update,
				(
					(
						region_layer::process_movement_cell_updates,
						region_layer::process_movement_data_changes,
						region_layer::prepare_modified_zones,
					)
						.chain()
						.in_set(RegionSet::Prepare),
					region_layer::recompute_pathfinder_zones.in_set(RegionSet::Paint),
					region_layer::recompute_edges.in_set(RegionSet::Detect),
					region_layer::recalculate_edge_costs.in_set(RegionSet::Cost),
				),
			);
	}
}
