pub mod classifier;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod renderer;
pub mod server;
pub mod snapshot;
pub mod summary;

pub use error::{Error, Result, SnapshotError};
