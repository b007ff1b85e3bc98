//! Core domain types

pub mod cluster;
pub mod codec;
pub mod embedding;
pub mod mention;

pub use cluster::{ClusterRecord, ClusterResponse, EntityCluster, ENTITY_TAG};
pub use embedding::Embedding;
pub use mention::{ClusterRequest, LinkedMention, Mention, MentionId};
