//! The controller side of the parser contract: scheduling, parameter storage and the
//! measurement sink.

pub mod error;
pub mod params;
pub mod registry;
pub mod sink;
