pub mod api;
pub mod config;
pub mod error;
pub mod utils;
pub mod workflow;
