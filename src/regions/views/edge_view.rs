//! Edge data of a tile. Each zone owns the directed edges leading out of it
//! (outbound) and a record of every edge of another zone leading into it
//! (inbound). After costs are calculated each outbound edge carries the path
//! and cost from every inbound connection of its zone to its own crossing
//! point.
//!
//! ```text
//!         zone A (tile 0,0)              zone B (tile 1,0)
//!  _______________________________________________________________
//! |                          |     |     |                        |
//! |    inbound x ----------> |  s  | --> |  e                     |
//! |                          |_____|     |                        |
//! |                          |     |     |                        |
//! |__________________________|_____|_____|________________________|
//! ```
//!
//! An outbound edge of `A` has its source `s` inside `A` and crosses into the
//! entry cell `e` of `B`. `B` records the edge as an inbound connection
//! entering at `e`. The path cost of the edge is the cost of travelling from
//! each inbound connection `x` of `A` to `s`.
//!

use std::collections::BTreeMap;

use crate::prelude::*;

/// Identifier of an outbound edge within its zone
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct LocalEdgeId(u16);

impl LocalEdgeId {
	/// Create a new instance of [LocalEdgeId]
	pub fn new(id: u16) -> Self {
		LocalEdgeId(id)
	}
	pub fn get(&self) -> u16 {
		self.0
	}
}

/// Identifies an edge across the whole world
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct EdgeKey {
	/// Zone the edge leads out of
	owner: GlobalZoneId,
	/// Id of the edge within the zone
	local_id: LocalEdgeId,
}

impl EdgeKey {
	/// Create a new instance of [EdgeKey]
	pub fn new(owner: GlobalZoneId, local_id: LocalEdgeId) -> Self {
		EdgeKey { owner, local_id }
	}
	pub fn get_owner(&self) -> GlobalZoneId {
		self.owner
	}
	pub fn get_local_id(&self) -> LocalEdgeId {
		self.local_id
	}
}

/// Cheapest route inside a zone between an inbound connection and the source
/// of an outbound edge
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, PartialEq, Debug)]
pub struct EdgePath {
	/// Cells from the inbound entry to the edge source, inclusive
	path: Vec<GridPosition>,
	/// Summed cost of every step along the path
	cost: f32,
}

impl EdgePath {
	/// Create a new instance of [EdgePath]
	pub fn new(path: Vec<GridPosition>, cost: f32) -> Self {
		EdgePath { path, cost }
	}
	pub fn get_path(&self) -> &[GridPosition] {
		&self.path
	}
	pub fn get_cost(&self) -> f32 {
		self.cost
	}
}

/// A directed boundary crossing from one zone into an adjacent zone
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, PartialEq, Debug)]
pub struct RegionEdge {
	/// Zone and id of this edge
	key: EdgeKey,
	/// Representative cell of the crossing, inside the owning zone
	source: GridPosition,
	/// Direction of the step across the boundary
	direction: Ordinal,
	/// Zone on the other side
	target: GlobalZoneId,
	/// Number of boundary positions the crossing spans
	run_length: u32,
	/// Cost of the boundary step for each movement combination
	crossing_costs: BTreeMap<MovementCombination, f32>,
	/// Route from each inbound connection of the owning zone to `source`
	paths: BTreeMap<(EdgeKey, MovementCombination), EdgePath>,
}

impl RegionEdge {
	/// Create a new instance of [RegionEdge] with no costs
	pub fn new(
		key: EdgeKey,
		source: GridPosition,
		direction: Ordinal,
		target: GlobalZoneId,
		run_length: u32,
	) -> Self {
		RegionEdge {
			key,
			source,
			direction,
			target,
			run_length,
			crossing_costs: BTreeMap::new(),
			paths: BTreeMap::new(),
		}
	}
	pub fn get_key(&self) -> EdgeKey {
		self.key
	}
	pub fn get_owner(&self) -> GlobalZoneId {
		self.key.get_owner()
	}
	pub fn get_source(&self) -> GridPosition {
		self.source
	}
	pub fn get_direction(&self) -> Ordinal {
		self.direction
	}
	pub fn get_target(&self) -> GlobalZoneId {
		self.target
	}
	/// First cell inside the target zone
	pub fn get_entry(&self) -> GridPosition {
		self.source.step(self.direction)
	}
	pub fn get_run_length(&self) -> u32 {
		self.run_length
	}
	pub fn get_crossing_costs(&self) -> &BTreeMap<MovementCombination, f32> {
		&self.crossing_costs
	}
	pub fn get_crossing_cost(&self, combination: &MovementCombination) -> Option<f32> {
		self.crossing_costs.get(combination).copied()
	}
	pub fn get_paths(&self) -> &BTreeMap<(EdgeKey, MovementCombination), EdgePath> {
		&self.paths
	}
	/// Route from an inbound connection to this edge, `None` means there is
	/// no route via this edge
	pub fn get_path(&self, inbound: &EdgeKey, combination: &MovementCombination) -> Option<&EdgePath> {
		self.paths.get(&(*inbound, *combination))
	}
	pub fn insert_crossing_cost(&mut self, combination: MovementCombination, cost: f32) {
		self.crossing_costs.insert(combination, cost);
	}
	pub fn insert_path(&mut self, inbound: EdgeKey, combination: MovementCombination, path: EdgePath) {
		self.paths.insert((inbound, combination), path);
	}
	/// Drop every recorded cost
	pub fn clear_costs(&mut self) {
		self.crossing_costs.clear();
		self.paths.clear();
	}
}

/// The record a zone keeps of an edge of another zone leading into it
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct InboundConnection {
	/// The outbound edge of the other zone
	source_edge: EdgeKey,
	/// First cell inside this zone
	entry: GridPosition,
	/// Direction of the step into this zone
	direction: Ordinal,
}

impl InboundConnection {
	/// Create a new instance of [InboundConnection]
	pub fn new(source_edge: EdgeKey, entry: GridPosition, direction: Ordinal) -> Self {
		InboundConnection {
			source_edge,
			entry,
			direction,
		}
	}
	pub fn get_source_edge(&self) -> EdgeKey {
		self.source_edge
	}
	pub fn get_entry(&self) -> GridPosition {
		self.entry
	}
	pub fn get_direction(&self) -> Ordinal {
		self.direction
	}
}

/// Edges of a single zone
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ZoneEdges {
	/// Edges leading out of the zone
	outbound: BTreeMap<LocalEdgeId, RegionEdge>,
	/// Edges of other zones leading in, keyed by the other zone's edge
	inbound: BTreeMap<EdgeKey, InboundConnection>,
	/// Id handed to the next outbound edge
	next_edge_id: u16,
	/// Outbound edges are missing and must be detected
	edges_dirty: bool,
	/// Path costs cannot be trusted
	costs_dirty: bool,
}

impl ZoneEdges {
	/// Create a zone whose edges still need detecting
	pub fn new_dirty() -> Self {
		ZoneEdges {
			edges_dirty: true,
			costs_dirty: true,
			..Default::default()
		}
	}
	/// Record a new outbound edge and get its key
	pub fn push_outbound(
		&mut self,
		owner: GlobalZoneId,
		source: GridPosition,
		direction: Ordinal,
		target: GlobalZoneId,
		run_length: u32,
	) -> EdgeKey {
		if self.next_edge_id == u16::MAX {
			panic!("Zone {:?} cannot hold more than {} edges", owner, u16::MAX);
		}
		let key = EdgeKey::new(owner, LocalEdgeId::new(self.next_edge_id));
		self.next_edge_id += 1;
		self.outbound.insert(
			key.get_local_id(),
			RegionEdge::new(key, source, direction, target, run_length),
		);
		key
	}
	pub fn get_outbound(&self) -> &BTreeMap<LocalEdgeId, RegionEdge> {
		&self.outbound
	}
	pub fn get_outbound_edge(&self, id: &LocalEdgeId) -> Option<&RegionEdge> {
		self.outbound.get(id)
	}
	pub fn remove_outbound(&mut self, id: &LocalEdgeId) -> Option<RegionEdge> {
		self.outbound.remove(id)
	}
	/// Remove every outbound edge so the zone can be detected afresh, ids
	/// restart from zero
	pub fn take_outbound(&mut self) -> BTreeMap<LocalEdgeId, RegionEdge> {
		self.next_edge_id = 0;
		std::mem::take(&mut self.outbound)
	}
	pub fn get_inbound(&self) -> &BTreeMap<EdgeKey, InboundConnection> {
		&self.inbound
	}
	pub fn insert_inbound(&mut self, connection: InboundConnection) {
		self.inbound.insert(connection.get_source_edge(), connection);
	}
	pub fn remove_inbound(&mut self, source_edge: &EdgeKey) -> Option<InboundConnection> {
		self.inbound.remove(source_edge)
	}
	/// Inbound records alongside mutable outbound edges, for writing costs
	pub fn get_connections_mut(
		&mut self,
	) -> (
		&BTreeMap<EdgeKey, InboundConnection>,
		&mut BTreeMap<LocalEdgeId, RegionEdge>,
	) {
		(&self.inbound, &mut self.outbound)
	}
	pub fn is_edges_dirty(&self) -> bool {
		self.edges_dirty
	}
	pub fn set_edges_dirty(&mut self, dirty: bool) {
		self.edges_dirty = dirty;
	}
	pub fn is_costs_dirty(&self) -> bool {
		self.costs_dirty
	}
	pub fn set_costs_dirty(&mut self, dirty: bool) {
		self.costs_dirty = dirty;
	}
}

/// Edges of every zone of a tile
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, PartialEq, Debug, Default)]
pub struct TileEdges {
	/// Edges keyed by zone
	zones: BTreeMap<TraversableZoneId, ZoneEdges>,
}

impl TileEdges {
	pub fn get_zone(&self, zone: &TraversableZoneId) -> Option<&ZoneEdges> {
		self.zones.get(zone)
	}
	pub fn get_zone_mut(&mut self, zone: &TraversableZoneId) -> Option<&mut ZoneEdges> {
		self.zones.get_mut(zone)
	}
	/// Get the edges of a zone, creating an empty dirty entry if missing
	pub fn get_or_insert_zone(&mut self, zone: TraversableZoneId) -> &mut ZoneEdges {
		self.zones.entry(zone).or_insert_with(ZoneEdges::new_dirty)
	}
	pub fn iter(&self) -> impl Iterator<Item = (&TraversableZoneId, &ZoneEdges)> {
		self.zones.iter()
	}
	pub fn iter_mut(&mut self) -> impl Iterator<Item = (&TraversableZoneId, &mut ZoneEdges)> {
		self.zones.iter_mut()
	}
	pub fn is_empty(&self) -> bool {
		self.zones.is_empty()
	}
	/// Total number of outbound edges across the tile
	pub fn get_outbound_count(&self) -> usize {
		self.zones.values().map(|z| z.get_outbound().len()).sum()
	}
}
