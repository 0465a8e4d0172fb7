//! Costs of the edges of a zone. For every registered movement combination
//! the zone supports a pathfinder is built over the cells of the zone alone
//! and asked for the route from each inbound connection of the zone to the
//! source cell of each outbound edge:
//!
//! ```text
//!  ___________________________________________
//! |                                           |
//! |  x1 -------+                              |
//! |            |                              |
//! |            +-----------------------> s  --|--> e
//! |            |                              |
//! |  x2 -------+                              |
//! |___________________________________________|
//! ```
//!
//! The route from `x1` to `s` and from `x2` to `s` are stored on the edge
//! leaving at `s`, keyed by the inbound connection and combination. The edge
//! also records the cost of the entry cell `e` on the far side of the
//! boundary.
//!

pub mod pathfinder;

use crate::prelude::*;
use bevy::prelude::*;

/// Calculates the costs of the edges of zones
pub struct EdgeCostCalculator<'a> {
	/// Size of the tiles
	dimensions: RegionDimensions,
	/// Painted zones of every tile
	zones: &'a RegionView<RegionTile>,
	/// Every registered combination
	combinations: &'a [MovementCombination],
	/// Resolves mode indices to modes
	encoding: &'a MovementModeEncoding,
}

impl<'a> EdgeCostCalculator<'a> {
	/// Create a new instance of [EdgeCostCalculator]
	pub fn new(
		dimensions: RegionDimensions,
		zones: &'a RegionView<RegionTile>,
		combinations: &'a [MovementCombination],
		encoding: &'a MovementModeEncoding,
	) -> Self {
		EdgeCostCalculator {
			dimensions,
			zones,
			combinations,
			encoding,
		}
	}
	/// Replace every cost held by the edges of `owner`. Connections that
	/// cannot be routed are left without a cost
	pub fn calculate<P: MovementDataProvider, F: PathfinderFactory>(
		&self,
		provider: &P,
		factory: &F,
		owner: GlobalZoneId,
		zone_edges: &mut ZoneEdges,
		scratch: &mut ScratchBuffers,
	) {
		let (_, outbound) = zone_edges.get_connections_mut();
		for edge in outbound.values_mut() {
			edge.clear_costs();
		}
		let tile = owner.get_tile();
		let Some(info) = self
			.zones
			.get(&tile)
			.and_then(|t| t.get_zone_info(owner.get_zone()).map(|info| (t, *info)))
		else {
			debug!("Skipping costs of {:?}, the zone no longer exists", owner);
			zone_edges.set_costs_dirty(false);
			return;
		};
		let (region_tile, info) = info;
		for combination in self.combinations {
			if !info.get_mask().contains(combination.get_mode_index()) {
				continue;
			}
			let Some(mode) = self.encoding.get_mode(combination.get_mode_index()) else {
				continue;
			};
			let Some(field) = provider.get_movement_field(mode, &tile) else {
				continue;
			};
			let distance = combination.get_distance();
			scratch.costs.clear();
			scratch.outbound.clear();
			scratch.inbound.clear();
			for (index, cell) in region_tile.get_cells().iter().enumerate() {
				if cell.get_zone() == owner.get_zone() {
					scratch.costs.push(field.get_costs()[index]);
					scratch.outbound.push(field.get_outbound_directions()[index]);
					scratch.inbound.push(field.get_inbound_directions()[index]);
				} else {
					scratch.costs.push(0.0);
					scratch.outbound.push(DirectionalityInformation::NONE);
					scratch.inbound.push(DirectionalityInformation::NONE);
				}
			}
			let (inbound, outbound) = zone_edges.get_connections_mut();
			for edge in outbound.values_mut() {
				if !distance.allows(edge.get_direction()) {
					continue;
				}
				let entry = edge.get_entry();
				let entry_tile = self.dimensions.get_tile_of(&entry);
				if let Some(entry_field) = provider.get_movement_field(mode, &entry_tile) {
					let cost = entry_field.get_cost(self.dimensions.get_field_cell(&entry));
					if cost > 0.0 {
						edge.insert_crossing_cost(*combination, cost);
					}
				}
			}
			let profile = MovementCostProfile::new(
				tile,
				&self.dimensions,
				mode,
				distance,
				&scratch.costs,
				&scratch.outbound,
				&scratch.inbound,
			);
			let mut pathfinder = factory.build(profile, &mut scratch.search);
			for edge in outbound.values_mut() {
				let source = edge.get_source();
				pathfinder.with_target(source);
				for (key, connection) in inbound.iter() {
					let entry = connection.get_entry();
					if entry == source {
						edge.insert_path(*key, *combination, EdgePath::new(vec![entry], 0.0));
						continue;
					}
					let result = pathfinder.try_find_path(entry);
					if result.is_found() {
						let cost = result.get_cost();
						edge.insert_path(*key, *combination, EdgePath::new(result.into_path(), cost));
					}
				}
			}
		}
		zone_edges.set_costs_dirty(false);
	}
}
