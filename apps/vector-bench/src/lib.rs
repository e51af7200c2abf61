//! Benchmark tooling for the Qdrant client: dataset generation, a timed
//! upsert/search run and recall against exact cosine neighbours.

pub mod dataset;
pub mod generate;
pub mod recall;
pub mod run;

pub use dataset::{SearchQuery, UpsertBody, UpsertFile, load_points, load_searches, write_dataset};
pub use run::{BenchReport, DEFAULT_COLLECTION, run};
