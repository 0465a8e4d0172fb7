//! Single level pathfinding within one tile. A [MovementCostProfile] narrows
//! the movement data of a tile down to a single movement mode and distance
//! style, a [PathfinderFactory] turns a profile into a [LocalPathfinder]
//! which answers queries towards a fixed target.
//!
//! The bundled [AStarPathfinderFactory] runs A* over the profile. A step from
//! `a` to `b` costs the cost of `b` scaled by the length of the step, and the
//! heuristic is the style's distance to the target scaled by the cheapest
//! cell of the profile so it never overestimates.
//!

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::prelude::*;

/// Movement data of one mode over one tile, costed for one distance style.
/// Cells with a cost of `0` cannot be entered
#[derive(Clone, Copy, Debug)]
pub struct MovementCostProfile<'a> {
	/// Tile the profile covers
	tile: TileID,
	/// Global position of the top-left cell
	origin: GridPosition,
	/// Number of cells along each side
	resolution: usize,
	/// Mode the costs belong to
	mode: MovementMode,
	/// How steps are measured
	distance: DistanceCalculation,
	/// Cost of each cell in row-major order
	costs: &'a [f32],
	/// Directions each cell can be left in
	outbound: &'a [DirectionalityInformation],
	/// Directions each cell can be entered from
	inbound: &'a [DirectionalityInformation],
}

impl<'a> MovementCostProfile<'a> {
	/// Create a new instance of [MovementCostProfile]. The slices must each
	/// hold one entry per cell of the tile
	pub fn new(
		tile: TileID,
		dimensions: &RegionDimensions,
		mode: MovementMode,
		distance: DistanceCalculation,
		costs: &'a [f32],
		outbound: &'a [DirectionalityInformation],
		inbound: &'a [DirectionalityInformation],
	) -> Self {
		let cell_count = dimensions.get_cell_count();
		if costs.len() != cell_count || outbound.len() != cell_count || inbound.len() != cell_count {
			panic!(
				"MovementCostProfile of {:?} expects {} cells, given {} costs, {} outbound and {} inbound",
				tile,
				cell_count,
				costs.len(),
				outbound.len(),
				inbound.len()
			);
		}
		MovementCostProfile {
			tile,
			origin: dimensions.get_tile_origin(&tile),
			resolution: dimensions.get_tile_resolution() as usize,
			mode,
			distance,
			costs,
			outbound,
			inbound,
		}
	}
	pub fn get_tile(&self) -> TileID {
		self.tile
	}
	pub fn get_resolution(&self) -> usize {
		self.resolution
	}
	pub fn get_mode(&self) -> MovementMode {
		self.mode
	}
	pub fn get_distance(&self) -> DistanceCalculation {
		self.distance
	}
	/// Row-major index of a position, `None` when it lies outside the tile
	pub fn get_local_index(&self, position: &GridPosition) -> Option<usize> {
		if position.get_layer() != self.origin.get_layer() {
			return None;
		}
		let column = position.get_column() - self.origin.get_column();
		let row = position.get_row() - self.origin.get_row();
		let resolution = self.resolution as i32;
		if column < 0 || row < 0 || column >= resolution || row >= resolution {
			return None;
		}
		Some(row as usize * self.resolution + column as usize)
	}
	/// Global position of a row-major index
	pub fn get_position(&self, index: usize) -> GridPosition {
		GridPosition::new(
			self.origin.get_column() + (index % self.resolution) as i32,
			self.origin.get_row() + (index / self.resolution) as i32,
			self.origin.get_layer(),
		)
	}
	pub fn get_cost(&self, index: usize) -> f32 {
		self.costs[index]
	}
	/// Cheapest enterable cell, used to keep heuristics admissible
	pub fn get_min_cost(&self) -> f32 {
		self.costs
			.iter()
			.copied()
			.filter(|c| *c > 0.0)
			.fold(f32::INFINITY, f32::min)
	}
	/// Index of the cell reached by stepping from `index` in `direction`, if
	/// the step stays in the tile and can be made
	pub fn can_step(&self, index: usize, direction: Ordinal) -> Option<usize> {
		if !self.distance.allows(direction) {
			return None;
		}
		if self.costs[index] <= 0.0 || !self.outbound[index].contains(direction) {
			return None;
		}
		let next = self.get_local_index(&self.get_position(index).step(direction))?;
		if self.costs[next] <= 0.0 || !self.inbound[next].contains(direction.inverse()) {
			return None;
		}
		Some(next)
	}
}

/// Outcome of a path query
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PathResultKind {
	/// A path was found
	Found,
	/// Source and target are valid but not connected
	NoPath,
	/// The query was malformed, no target or a position outside the profile
	InvalidRequest,
}

/// A path from a source to the target of a [LocalPathfinder]
#[derive(Clone, PartialEq, Debug)]
pub struct PathResult {
	/// Outcome of the query
	kind: PathResultKind,
	/// Positions from source to target inclusive, empty unless found
	path: Vec<GridPosition>,
	/// Total cost of the path
	cost: f32,
}

impl PathResult {
	/// Create a new instance of [PathResult]
	pub fn new(kind: PathResultKind, path: Vec<GridPosition>, cost: f32) -> Self {
		PathResult { kind, path, cost }
	}
	/// A failed query
	pub fn failed(kind: PathResultKind) -> Self {
		PathResult::new(kind, Vec::new(), 0.0)
	}
	pub fn get_kind(&self) -> PathResultKind {
		self.kind
	}
	pub fn is_found(&self) -> bool {
		self.kind == PathResultKind::Found
	}
	pub fn get_path(&self) -> &[GridPosition] {
		&self.path
	}
	pub fn get_cost(&self) -> f32 {
		self.cost
	}
	/// Take ownership of the path
	pub fn into_path(self) -> Vec<GridPosition> {
		self.path
	}
}

/// A pathfinder scoped to a single profile
pub trait LocalPathfinder {
	/// Set the position every subsequent query paths towards
	fn with_target(&mut self, target: GridPosition) -> &mut Self;
	/// Find the cheapest path from `source` to the target
	fn try_find_path(&mut self, source: GridPosition) -> PathResult;
}

/// Builds a [LocalPathfinder] for each profile. Shared between the cost jobs
/// running in parallel
pub trait PathfinderFactory: Sync {
	/// Pathfinder produced by the factory
	type Pathfinder<'a>: LocalPathfinder
	where
		Self: 'a;
	/// Create a pathfinder over `profile` working in the pooled `buffers`
	fn build<'a>(
		&'a self,
		profile: MovementCostProfile<'a>,
		buffers: &'a mut SearchBuffers,
	) -> Self::Pathfinder<'a>;
}

/// Produces [AStarPathfinder]s
#[derive(Clone, Copy, Debug, Default)]
pub struct AStarPathfinderFactory;

impl PathfinderFactory for AStarPathfinderFactory {
	type Pathfinder<'a> = AStarPathfinder<'a>;
	fn build<'a>(
		&'a self,
		profile: MovementCostProfile<'a>,
		buffers: &'a mut SearchBuffers,
	) -> Self::Pathfinder<'a> {
		AStarPathfinder::new(profile, buffers)
	}
}

/// Entry of the open set, ordered so the heap pops the lowest estimate first
#[derive(Clone, Copy, Debug)]
struct OpenNode {
	/// Cost so far plus heuristic
	estimate: f32,
	/// Cost so far
	cost: f32,
	/// Row-major cell index
	index: usize,
}

impl PartialEq for OpenNode {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for OpenNode {
	fn cmp(&self, other: &Self) -> Ordering {
		other
			.estimate
			.total_cmp(&self.estimate)
			.then_with(|| other.index.cmp(&self.index))
	}
}

/// Per query working memory of a search, pooled in [ScratchBuffers] so
/// every zone and combination costed by a job searches in the same
/// allocations
#[derive(Clone, Default, Debug)]
pub struct SearchBuffers {
	/// Best known cost of reaching each cell
	best: Vec<f32>,
	/// Predecessor of each cell on its best path
	came_from: Vec<usize>,
	/// Cells waiting to be expanded
	open: BinaryHeap<OpenNode>,
}

impl SearchBuffers {
	/// Empty every buffer keeping its allocation
	pub fn clear(&mut self) {
		self.best.clear();
		self.came_from.clear();
		self.open.clear();
	}
	pub fn is_empty(&self) -> bool {
		self.best.is_empty() && self.came_from.is_empty() && self.open.is_empty()
	}
	/// Number of cells the buffers can hold without reallocating
	pub fn get_cell_capacity(&self) -> usize {
		self.best.capacity().min(self.came_from.capacity())
	}
	/// Size the per cell buffers to `cells` and forget any previous search
	fn prepare(&mut self, cells: usize) {
		self.best.clear();
		self.best.resize(cells, f32::INFINITY);
		self.came_from.clear();
		self.came_from.resize(cells, usize::MAX);
		self.open.clear();
	}
}

/// A* over a [MovementCostProfile]
pub struct AStarPathfinder<'a> {
	/// Data searched over
	profile: MovementCostProfile<'a>,
	/// Index of the target cell
	target: Option<usize>,
	/// Borrowed working memory
	buffers: &'a mut SearchBuffers,
	/// Cost of the cheapest cell
	min_cost: f32,
}

impl<'a> AStarPathfinder<'a> {
	/// Create a new instance of [AStarPathfinder] searching in `buffers`
	pub fn new(profile: MovementCostProfile<'a>, buffers: &'a mut SearchBuffers) -> Self {
		let cells = profile.get_resolution() * profile.get_resolution();
		let min_cost = profile.get_min_cost();
		buffers.prepare(cells);
		AStarPathfinder {
			profile,
			target: None,
			buffers,
			min_cost: if min_cost.is_finite() { min_cost } else { 0.0 },
		}
	}
	/// Admissible estimate of the cost from `index` to `target`
	fn heuristic(&self, index: usize, target: usize) -> f32 {
		let resolution = self.profile.get_resolution();
		let dx = (index % resolution).abs_diff(target % resolution) as u32;
		let dy = (index / resolution).abs_diff(target / resolution) as u32;
		self.profile.get_distance().get_distance(dx, dy) * self.min_cost
	}
}

impl LocalPathfinder for AStarPathfinder<'_> {
	fn with_target(&mut self, target: GridPosition) -> &mut Self {
		self.target = self.profile.get_local_index(&target);
		self
	}
	fn try_find_path(&mut self, source: GridPosition) -> PathResult {
		let (Some(target), Some(start)) = (self.target, self.profile.get_local_index(&source))
		else {
			return PathResult::failed(PathResultKind::InvalidRequest);
		};
		if self.profile.get_cost(start) <= 0.0 || self.profile.get_cost(target) <= 0.0 {
			return PathResult::failed(PathResultKind::NoPath);
		}
		if start == target {
			return PathResult::new(PathResultKind::Found, vec![source], 0.0);
		}
		let estimate = self.heuristic(start, target);
		let buffers = &mut *self.buffers;
		buffers.best.fill(f32::INFINITY);
		buffers.came_from.fill(usize::MAX);
		buffers.open.clear();
		buffers.best[start] = 0.0;
		buffers.open.push(OpenNode {
			estimate,
			cost: 0.0,
			index: start,
		});
		while let Some(node) = self.buffers.open.pop() {
			if node.index == target {
				let mut path = vec![self.profile.get_position(target)];
				let mut current = target;
				while current != start {
					current = self.buffers.came_from[current];
					path.push(self.profile.get_position(current));
				}
				path.reverse();
				return PathResult::new(PathResultKind::Found, path, node.cost);
			}
			if node.cost > self.buffers.best[node.index] {
				continue;
			}
			for direction in Ordinal::ALL {
				let Some(next) = self.profile.can_step(node.index, direction) else {
					continue;
				};
				let cost = node.cost
					+ self.profile.get_cost(next)
						* self.profile.get_distance().get_step_length(direction);
				if cost < self.buffers.best[next] {
					let estimate = cost + self.heuristic(next, target);
					self.buffers.best[next] = cost;
					self.buffers.came_from[next] = node.index;
					self.buffers.open.push(OpenNode {
						estimate,
						cost,
						index: next,
					});
				}
			}
		}
		PathResult::failed(PathResultKind::NoPath)
	}
}
