//! Core simulation and ingestion logic for the radar / ADS-B surveillance demo.
//!
//! The write path synthesizes seeded trajectories, derives rule-based alerts
//! and persists both as CSV/JSON. The read path discovers those files again and
//! merges them into one type-normalized [`io::Dataset`].

pub mod io;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod records;
pub mod telemetry;

pub use prelude::{CoreError, CoreResult, Domain, Stream};
