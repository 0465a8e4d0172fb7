//! Measure building the zone/edge graph of a world from scratch
//!
//! World is 30 tiles by 30 tiles with a sparse sprinkling of impassable cells
//!

use bevy_zone_edges_plugin::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng};

/// Walking
const WALK: MovementMode = MovementMode::new(1);

/// Create the movement data of the world
fn prepare_fields(columns: i32, rows: i32) -> MovementFields {
	let dimensions = RegionDimensions::new(10);
	let mut tiles = Vec::new();
	for row in 0..rows {
		for column in 0..columns {
			tiles.push(TileID::new(column, row, 0));
		}
	}
	let mut fields = MovementFields::new_with_cost(&dimensions, &[WALK], &tiles, 1.0);
	let mut rng = rand::rngs::StdRng::seed_from_u64(7);
	for tile in &tiles {
		let Some(field) = fields.get_field_mut(WALK, tile) else {
			continue;
		};
		for index in 0..dimensions.get_cell_count() {
			if rng.random_bool(0.1) {
				field.set_cost(FieldCell::from_index(index, 10), 0.0);
			}
		}
	}
	fields
}

/// Register the combinations, queue every tile and run a full tick
fn init_graph(fields: &MovementFields) {
	let mut graph = RegionGraph::new(*fields.get_dimensions());
	graph
		.register_movement_combination(WALK, DistanceCalculation::Euclidean)
		.unwrap();
	for tile in fields.get_tiles() {
		graph.notify_tile_changed(tile, TileChange::Created).unwrap();
	}
	graph.process_tick(fields, &AStarPathfinderFactory);
}

pub fn criterion_benchmark(c: &mut Criterion) {
	let mut group = c.benchmark_group("data_initialisation");
	group.significance_level(0.1).sample_size(10);
	let fields = prepare_fields(30, 30);
	group.bench_function("init_region_graph", |b| {
		b.iter(|| init_graph(black_box(&fields)))
	});
	group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
