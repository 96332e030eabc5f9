// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod loader;
pub mod persistence;
pub mod pipeline;

pub use crate::config::{BloomConfig, BuildConfig, OutputLayout};
pub use crate::error::{BuildError, Result};
pub use crate::pipeline::{BuildArtifacts, Pipeline};
