pub mod error;
pub mod http_source;
pub mod retry;
