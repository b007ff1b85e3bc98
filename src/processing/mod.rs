//! Clustering algorithms and batch orchestration

pub mod aggregate;
pub mod lexical;
pub mod linkage;
pub mod pipeline;

pub use pipeline::{cluster_batch, cluster_mentions};
