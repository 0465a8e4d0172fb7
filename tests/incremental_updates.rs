//! Changes to movement data only reprocess the tiles they touch and leave a
//! graph equivalent to one built from scratch
//!

use bevy_zone_edges_plugin::prelude::*;

/// Walking
const WALK: MovementMode = MovementMode::new(1);

/// Open 10x10 tiles covering `columns` by `rows` tiles with a few pillars
fn world(columns: i32, rows: i32) -> MovementFields {
	let dimensions = RegionDimensions::new(10);
	let mut tiles = Vec::new();
	for row in 0..rows {
		for column in 0..columns {
			tiles.push(TileID::new(column, row, 0));
		}
	}
	let mut fields = MovementFields::new_with_cost(&dimensions, &[WALK], &tiles, 1.0);
	for tile in &tiles {
		let field = fields.get_field_mut(WALK, tile).unwrap();
		field.set_cost(FieldCell::new(3, 3), 0.0);
		field.set_cost(FieldCell::new(6, 7), 0.0);
		field.set_cost(FieldCell::new(4, 5), 3.0);
	}
	fields
}

/// Build the whole graph of `fields`
fn build(fields: &MovementFields) -> RegionGraph {
	let mut graph = RegionGraph::new(*fields.get_dimensions());
	graph
		.register_movement_combination(WALK, DistanceCalculation::Euclidean)
		.unwrap();
	graph
		.register_movement_combination(WALK, DistanceCalculation::Manhattan)
		.unwrap();
	for tile in fields.get_tiles() {
		graph.notify_tile_changed(tile, TileChange::Created).unwrap();
	}
	graph.process_tick(fields, &AStarPathfinderFactory);
	graph
}

/// Every edge as `(source, direction, entry, run length)` with its path
/// costs rounded, independent of zone and edge ids
fn snapshot(graph: &RegionGraph) -> Vec<(GridPosition, Ordinal, GridPosition, u32, Vec<i64>)> {
	let mut edges = Vec::new();
	for (_, tile_edges) in graph.get_edge_data().iter() {
		for (_, zone_edges) in tile_edges.iter() {
			for edge in zone_edges.get_outbound().values() {
				let mut costs: Vec<i64> = edge
					.get_paths()
					.values()
					.map(|p| (p.get_cost() * 1000.0).round() as i64)
					.collect();
				costs.sort();
				edges.push((
					edge.get_source(),
					edge.get_direction(),
					edge.get_entry(),
					edge.get_run_length(),
					costs,
				));
			}
		}
	}
	edges.sort();
	edges
}

#[test]
fn repainting_unchanged_data_is_idempotent() {
	let fields = world(3, 3);
	let mut graph = build(&fields);
	let before = snapshot(&graph);
	graph
		.notify_tile_changed(TileID::new(1, 1, 0), TileChange::Modified)
		.unwrap();
	let report = graph.process_tick(&fields, &AStarPathfinderFactory);
	assert_eq!(vec![TileID::new(1, 1, 0)], report.get_painted());
	assert_eq!(before, snapshot(&graph));
	assert_eq!(before, snapshot(&build(&fields)));
}

#[test]
fn single_cell_change_touches_tile_and_neighbours() {
	let mut fields = world(7, 7);
	let mut graph = build(&fields);
	let changed = TileID::new(3, 3, 0);
	let zones_before = graph.get_zone_data().clone();
	let edges_before = graph.get_edge_data().clone();

	let position = GridPosition::new(35, 32, 0);
	fields.set_cell_cost(WALK, &position, 0.0).unwrap();
	graph.notify_cell_changed(&position).unwrap();
	let report = graph.process_tick(&fields, &AStarPathfinderFactory);

	assert_eq!(vec![changed], report.get_painted());
	let mut detected = report.get_detected().to_vec();
	detected.sort();
	let mut expected: Vec<TileID> = changed
		.get_neighbours_with_ordinal()
		.iter()
		.map(|(_, tile)| *tile)
		.chain(std::iter::once(changed))
		.collect();
	expected.sort();
	assert_eq!(expected, detected);
	assert_eq!(None, graph.get_zone_at(&position));

	for (tile, region_tile) in zones_before.iter() {
		if changed.get_chebyshev_distance(&tile).unwrap() < 2 {
			continue;
		}
		assert_eq!(Some(region_tile), graph.get_zone_data().get(&tile));
		assert_eq!(
			edges_before.get(&tile),
			graph.get_edge_data().get(&tile),
			"{:?}",
			tile
		);
	}
}

#[test]
fn costs_only_change_keeps_zones() {
	let mut fields = world(3, 3);
	let mut graph = build(&fields);
	let zones_before = graph.get_zone_data().clone();
	let position = GridPosition::new(15, 15, 0);
	fields.set_cell_cost(WALK, &position, 4.0).unwrap();
	graph
		.notify_tile_changed(TileID::new(1, 1, 0), TileChange::CostsChanged)
		.unwrap();
	let report = graph.process_tick(&fields, &AStarPathfinderFactory);
	assert!(report.get_painted().is_empty());
	assert!(report.get_detected().is_empty());
	assert!(report.get_costed_zones() > 0);
	assert_eq!(&zones_before, graph.get_zone_data());
	assert_eq!(snapshot(&graph), snapshot(&build(&fields)));
}

#[test]
fn idle_tick_does_nothing() {
	let fields = world(2, 2);
	let mut graph = build(&fields);
	let report = graph.process_tick(&fields, &AStarPathfinderFactory);
	assert!(report.is_idle());
}

#[test]
fn boundary_change_redetects_only_the_strip() {
	//  ______________________________
	// |          |          |          |
	// |__________|__________|__________|
	// |          |    #    >|<         |
	// |          |    #    >|<         |
	// |__________|____#____>|<_________|
	// |          |          |          |
	// |__________|__________|__________|
	let mut fields = world(3, 3);
	for row in 10..20 {
		fields.set_cell_cost(WALK, &GridPosition::new(15, row, 0), 0.0).unwrap();
	}
	let mut graph = build(&fields);
	let centre = TileID::new(1, 1, 0);
	let west = graph.get_zone_at(&GridPosition::new(12, 15, 0)).unwrap();
	let east = graph.get_zone_at(&GridPosition::new(18, 15, 0)).unwrap();
	assert_ne!(west, east);
	let zones_before = graph.get_zone_data().get(&centre).unwrap().get_zones().to_vec();
	let west_before = graph.get_zone_edges(&west).unwrap().clone();
	let crosses_east = |graph: &RegionGraph| {
		graph
			.get_zone_edges(&east)
			.unwrap()
			.get_outbound()
			.values()
			.any(|e| e.get_direction() == Ordinal::East)
	};
	assert!(crosses_east(&graph));

	// the eastern neighbour can no longer be entered from the west
	for row in 10..20 {
		fields
			.set_cell_directionality(
				WALK,
				&GridPosition::new(20, row, 0),
				DirectionalityInformation::ALL,
				DirectionalityInformation::from_ordinals(&[
					Ordinal::North,
					Ordinal::NorthEast,
					Ordinal::East,
					Ordinal::SouthEast,
					Ordinal::South,
				]),
			)
			.unwrap();
	}
	graph
		.notify_tile_changed(centre, TileChange::BoundaryChanged(Ordinal::East))
		.unwrap();
	let report = graph.process_tick(&fields, &AStarPathfinderFactory);

	assert!(report.get_painted().is_empty());
	assert_eq!(vec![centre], report.get_detected());
	assert!(report.get_costed_zones() > 0);
	let region_tile = graph.get_zone_data().get(&centre).unwrap();
	assert_eq!(zones_before, region_tile.get_zones());
	assert_eq!(Some(west), graph.get_zone_at(&GridPosition::new(12, 15, 0)));
	assert_eq!(Some(&west_before), graph.get_zone_edges(&west));
	assert!(!crosses_east(&graph));
	assert!(!graph.get_zone_edges(&east).unwrap().get_outbound().is_empty());

	let rebuilt = build(&fields);
	assert_eq!(rebuilt.get_zone_data(), graph.get_zone_data());
	assert_eq!(snapshot(&rebuilt), snapshot(&graph));
}

#[test]
fn sink_retired_when_its_only_entrance_closes() {
	//  ______________________
	// |         .|           |
	// |        ##|           |
	// |        #s|<          |
	// |        ##|           |
	// |         .|           |
	// |__________|___________|
	let dimensions = RegionDimensions::new(6);
	let near = TileID::new(0, 0, 0);
	let far = TileID::new(1, 0, 0);
	let mut field = MovementField::new_with_cost(6, 1.0);
	for (column, row) in [(4, 1), (4, 2), (4, 3), (5, 1), (5, 3)] {
		field.set_cost(FieldCell::new(column, row), 0.0);
	}
	field.set_outbound(FieldCell::new(5, 2), DirectionalityInformation::NONE);
	let mut fields = MovementFields::new(&dimensions);
	fields.insert_field(WALK, near, field);
	fields.insert_field(WALK, far, MovementField::new_with_cost(6, 1.0));
	let mut graph = build(&fields);
	let sink = GridPosition::new(5, 2, 0);
	assert!(graph.get_zone_at(&sink).is_some());
	assert_eq!(2, graph.get_zone_data().get(&near).unwrap().get_zones().len());

	fields.insert_field(WALK, far, MovementField::new_with_cost(6, 0.0));
	graph.notify_tile_changed(far, TileChange::Modified).unwrap();
	let report = graph.process_tick(&fields, &AStarPathfinderFactory);

	let mut painted = report.get_painted().to_vec();
	painted.sort();
	assert_eq!(vec![near, far], painted);
	assert_eq!(None, graph.get_zone_at(&sink));
	assert_eq!(1, graph.get_zone_data().get(&near).unwrap().get_zones().len());
	let rebuilt = build(&fields);
	assert_eq!(rebuilt.get_zone_data(), graph.get_zone_data());
	assert_eq!(snapshot(&rebuilt), snapshot(&graph));
}
