pub mod api;
pub mod retrospective;
