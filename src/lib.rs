// Crate root library declaration and module exports.
pub mod cli;
pub mod config;
pub mod export;
pub mod model;
pub mod paths;
pub mod query;
pub mod render;
pub mod stats;
