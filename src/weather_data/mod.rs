pub mod error;
pub mod rain_accumulator;
