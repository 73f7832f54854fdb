pub mod api;
pub mod conditions;
pub mod forecast;
pub mod observations;
