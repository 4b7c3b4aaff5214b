//! File-system side of the pipeline: the dataset writer on the way out, and
//! discovery, parsing and normalization on the way back in.

pub mod dataset;
pub mod discovery;
pub mod loader;
pub mod normalize;
pub mod writer;

pub use dataset::{Cell, Dataset, Row, RowSet};
pub use discovery::{discover, select_files, Discovery, DiscoveryTier};
pub use loader::IngestionLoader;
pub use writer::{timestamp_suffix, DatasetWriter, WrittenFiles};
