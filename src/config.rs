//! Engine configuration and tuned constants

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::EntityCluster;

// === Clustering Thresholds ===
pub const LEXICAL_THRESHOLD: f32 = 0.2;
pub const SEMANTIC_THRESHOLD: f32 = 0.036;
pub const CENTROID_MERGE_THRESHOLD: f32 = 0.05;
pub const OVERSIZE_UNIQUE_MENTION_LIMIT: usize = 25;

/// Stopping thresholds for the three clustering passes plus the oversize
/// guard. Tuned constants; override per call rather than editing defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceThresholds {
	/// Pass 1 and pass 4: surface-form distance cutoff
	pub lexical: f32,
	/// Pass 2: cosine cutoff inside each lexical group
	pub semantic: f32,
	/// Pass 3: cosine cutoff between sub-cluster centroids
	pub centroid_merge: f32,
	/// Distinct-text count above which a cluster is re-split lexically
	pub oversize_unique_mention_limit: usize,
}

impl Default for DistanceThresholds {
	fn default() -> Self {
		Self {
			lexical: LEXICAL_THRESHOLD,
			semantic: SEMANTIC_THRESHOLD,
			centroid_merge: CENTROID_MERGE_THRESHOLD,
			oversize_unique_mention_limit: OVERSIZE_UNIQUE_MENTION_LIMIT,
		}
	}
}

/// Merge-eligibility gate applied when two clusters share a centroid-pass
/// label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
	/// Merge whenever both clusters are non-empty
	#[default]
	NonEmpty,
	/// Additionally require agreeing resolved types (or one side untyped)
	MatchingType,
}

impl MergePolicy {
	pub fn allows(&self, current: &EntityCluster, candidate: &EntityCluster) -> bool {
		match self {
			MergePolicy::NonEmpty => current.is_compatible_with(candidate),
			MergePolicy::MatchingType => {
				if !current.is_compatible_with(candidate) {
					return false;
				}
				match (current.resolved_type(), candidate.resolved_type()) {
					(Some(a), Some(b)) => a == b,
					_ => true,
				}
			}
		}
	}
}

/// Everything one pipeline invocation needs beyond the batch itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineParams {
	pub thresholds: DistanceThresholds,
	pub merge_policy: MergePolicy,
}
