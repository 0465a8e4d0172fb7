//! `use bevy_zone_edges_plugin::prelude::*;` to import common structures and methods
//!

#[doc(hidden)]
pub use crate::regions::{
	collection::*,
	dimensions::*,
	edge_costs::{pathfinder::*, *},
	edge_detector::*,
	movement::{movement_field::*, *},
	painter::*,
	scratch::*,
	utilities::*,
	views::{edge_view::*, zone_view::*, *},
};

#[doc(hidden)]
pub use crate::{
	bundle::*,
	error::*,
	plugin::{region_layer::*, *},
};
