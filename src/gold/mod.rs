//! Gold layer: chunking, the chunk table, and batch building

pub mod builder;
pub mod chunker;
pub mod table;
pub mod upload;

pub use builder::{build_gold, BookMeta, GoldBuild};
pub use chunker::{chunk_spans, ChunkIter, ChunkSpan};
pub use table::ChunkRecord;
