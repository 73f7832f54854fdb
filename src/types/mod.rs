pub mod condition;
pub mod lenient;
pub mod measurement;
pub mod station;
