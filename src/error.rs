//! Errors raised when configuring a [crate::prelude::RegionGraph] or loading
//! [crate::prelude::MovementFields] from disk
//!

use crate::prelude::*;

/// Failures that a caller can recover from. Broken internal invariants are
/// not represented here, they panic with context instead
#[derive(Debug, thiserror::Error)]
pub enum RegionError {
	/// The [MovementModeEncoding] cannot hold any more modes
	#[error("cannot register movement mode {mode:?}, the encoding is limited to {limit} modes")]
	ModeCapacityExceeded {
		/// Mode that failed to register
		mode: MovementMode,
		/// Maximum number of modes of an encoding
		limit: usize,
	},
	/// The mode would receive an index that cannot be represented in a
	/// [MovementModeMask]
	#[error("movement mode {mode:?} would be assigned index {index}, only {limit} modes can take part in zone painting")]
	ModeMaskCapacityExceeded {
		/// Mode that failed to register
		mode: MovementMode,
		/// Index the mode would have been assigned
		index: usize,
		/// Number of bits in a [MovementModeMask]
		limit: usize,
	},
	/// No data is known for the tile
	#[error("tile {0:?} is not known")]
	UnknownTile(TileID),
	/// Reading from disk failed
	#[error("failed to read movement data: {0}")]
	Io(#[from] std::io::Error),
	/// A `ron` file could not be deserialised into [MovementFields]
	#[error("failed deserialising MovementFields: {0}")]
	Ron(String),
	/// A CSV file could not be parsed
	#[error("failed reading CSV: {0}")]
	Csv(String),
	/// CSV file names must be `<mode>_<layer>_<column>_<row>.csv`
	#[error("CSV file name `{0}` does not follow `<mode>_<layer>_<column>_<row>.csv`")]
	MalformedCsvName(String),
	/// A CSV value is not a cost or the file has the wrong shape
	#[error("CSV `{file}` is malformed: {reason}")]
	MalformedCsvContent {
		/// File being read
		file: String,
		/// What was wrong
		reason: String,
	},
}

#[cfg(feature = "ron")]
impl From<ron::error::SpannedError> for RegionError {
	fn from(e: ron::error::SpannedError) -> Self {
		RegionError::Ron(e.to_string())
	}
}

#[cfg(feature = "csv")]
impl From<csv::Error> for RegionError {
	fn from(e: csv::Error) -> Self {
		RegionError::Csv(e.to_string())
	}
}
