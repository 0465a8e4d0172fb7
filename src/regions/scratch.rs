//! Working memory for painting, detection and cost jobs. Each job borrows a
//! [ScratchBuffers] exclusively for its duration and clears it before handing
//! it back, so allocations are reused across jobs and ticks without ever
//! being shared between jobs running at the same time.
//!
//! Jobs are dispatched fork-join style on bevy's [ComputeTaskPool]. The units
//! of work are split into one contiguous chunk per worker and every chunk is
//! paired with its own buffers:
//!
//! ```text
//!  units    [ t0 t1 t2 | t3 t4 t5 | t6 t7 ]
//!  buffers  [    b0    |    b1    |   b2  ]
//! ```
//!

use std::collections::VecDeque;

use bevy::tasks::{ComputeTaskPool, TaskPool};

use crate::prelude::*;

/// Reusable allocations of a single job
#[derive(Clone, Default, Debug)]
pub struct ScratchBuffers {
	/// Cells waiting to be flood filled, as row-major indices
	pub open: VecDeque<usize>,
	/// Movement mode mask of every cell of a tile
	pub masks: Vec<MovementModeMask>,
	/// Per cell directions already inspected by a boundary walk
	pub visited: Vec<DirectionalityInformation>,
	/// Boundary positions of the runs found by a walk
	pub run_positions: Vec<(GridPosition, Ordinal)>,
	/// Target zone and start offset into `run_positions` of each run
	pub runs: Vec<(GlobalZoneId, usize)>,
	/// Per cell costs of the zone being costed
	pub costs: Vec<f32>,
	/// Per cell outbound directions of the zone being costed
	pub outbound: Vec<DirectionalityInformation>,
	/// Per cell inbound directions of the zone being costed
	pub inbound: Vec<DirectionalityInformation>,
	/// Working memory of the local pathfinder
	pub search: SearchBuffers,
}

impl ScratchBuffers {
	/// Clear every buffer keeping its allocation
	pub fn release(&mut self) {
		self.open.clear();
		self.masks.clear();
		self.visited.clear();
		self.run_positions.clear();
		self.runs.clear();
		self.costs.clear();
		self.outbound.clear();
		self.inbound.clear();
		self.search.clear();
	}
	/// Has every buffer been released
	pub fn is_released(&self) -> bool {
		self.open.is_empty()
			&& self.masks.is_empty()
			&& self.visited.is_empty()
			&& self.run_positions.is_empty()
			&& self.runs.is_empty()
			&& self.costs.is_empty()
			&& self.outbound.is_empty()
			&& self.inbound.is_empty()
			&& self.search.is_empty()
	}
}

/// A pool of [ScratchBuffers], one per concurrent chunk of work
#[derive(Clone, Default, Debug)]
pub struct ScratchArena {
	/// Buffers, kept between ticks
	buffers: Vec<ScratchBuffers>,
}

impl ScratchArena {
	/// Number of buffers allocated so far
	pub fn len(&self) -> usize {
		self.buffers.len()
	}
	pub fn is_empty(&self) -> bool {
		self.buffers.is_empty()
	}
	/// Run `job` on every unit of `work` in parallel. Units are partitioned
	/// into disjoint chunks so each job has exclusive access to its unit and
	/// to the buffers of its chunk. Returns once every job has finished
	pub fn fork_join<T, F>(&mut self, work: &mut [T], job: F)
	where
		T: Send,
		F: Fn(&mut T, &mut ScratchBuffers) + Send + Sync,
	{
		if work.is_empty() {
			return;
		}
		let pool = ComputeTaskPool::get_or_init(TaskPool::default);
		let workers = pool.thread_num().max(1);
		let chunk_size = work.len().div_ceil(workers);
		let chunk_count = work.len().div_ceil(chunk_size);
		if self.buffers.len() < chunk_count {
			self.buffers.resize_with(chunk_count, ScratchBuffers::default);
		}
		let job = &job;
		pool.scope(|scope| {
			for (chunk, scratch) in work.chunks_mut(chunk_size).zip(self.buffers.iter_mut()) {
				scope.spawn(async move {
					for unit in chunk.iter_mut() {
						job(unit, scratch);
						scratch.release();
					}
				});
			}
		});
	}
}
