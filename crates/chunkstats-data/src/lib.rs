//! Data ingestion layer for chunkstats.
//!
//! Streams CSV files in fixed-size row windows, types each window, computes
//! its statistics snapshot, and offers row filtering and histogram binning on
//! top of the window stream.

pub mod filter;
pub mod histogram;
pub mod reader;
pub mod window;

pub use chunkstats_core as core;
pub use reader::ChunkedStatsReader;
