//! Shared types for chunkstats: the error enum, window and statistics models,
//! per-window calculations, text formatting and CLI settings.

pub mod calculations;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{ChunkStatsError, Result};
