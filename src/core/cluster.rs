//! Entity cluster accumulator and response payloads

use serde::{Deserialize, Serialize};

use crate::config::DistanceThresholds;
use crate::core::{Embedding, MentionId};

/// Placeholder entity tag stored alongside each member mention.
pub const ENTITY_TAG: &str = "entity";

/// Accumulates the mentions believed to denote one real-world entity.
///
/// All columns are parallel: index `i` describes one member mention. The
/// centroid is memoized and invalidated by [`add_element`](Self::add_element)
/// and [`merge`](Self::merge).
#[derive(Debug, Clone, Default)]
pub struct EntityCluster {
	mention_ids: Vec<MentionId>,
	mentions: Vec<String>,
	entities: Vec<String>,
	embeddings: Vec<Embedding>,
	types: Vec<Option<String>>,
	centroid: Option<Embedding>,
}

impl EntityCluster {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append one member mention to every column.
	pub fn add_element(
		&mut self,
		mention_id: MentionId,
		mention: String,
		entity: String,
		embedding: Embedding,
		mention_type: Option<String>,
	) {
		self.mention_ids.push(mention_id);
		self.mentions.push(mention);
		self.entities.push(entity);
		self.embeddings.push(embedding);
		self.types.push(mention_type);
		self.centroid = None;
	}

	/// Absorb every member of `other`, preserving its insertion order.
	pub fn merge(&mut self, other: EntityCluster) {
		self.mention_ids.extend(other.mention_ids);
		self.mentions.extend(other.mentions);
		self.entities.extend(other.entities);
		self.embeddings.extend(other.embeddings);
		self.types.extend(other.types);
		self.centroid = None;
	}

	pub fn len(&self) -> usize {
		self.mentions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.mentions.is_empty()
	}

	pub fn mention_ids(&self) -> &[MentionId] {
		&self.mention_ids
	}

	pub fn mentions(&self) -> &[String] {
		&self.mentions
	}

	pub fn entities(&self) -> &[String] {
		&self.entities
	}

	pub fn embeddings(&self) -> &[Embedding] {
		&self.embeddings
	}

	pub fn types(&self) -> &[Option<String>] {
		&self.types
	}

	/// Mean of the member embeddings, memoized; `None` for an empty cluster.
	pub fn centroid(&mut self) -> Option<Embedding> {
		if self.centroid.is_none() {
			self.centroid = Embedding::mean(&self.embeddings);
		}
		self.centroid.clone()
	}

	/// Merge-eligibility gate for the centroid pass: both clusters must hold
	/// at least one mention.
	pub fn is_compatible_with(&self, other: &EntityCluster) -> bool {
		!self.is_empty() && !other.is_empty()
	}

	/// Number of distinct member texts, case-insensitive.
	pub fn unique_text_count(&self) -> usize {
		let mut seen: Vec<String> = Vec::new();
		for text in &self.mentions {
			let lowered = text.to_lowercase();
			if !seen.contains(&lowered) {
				seen.push(lowered);
			}
		}
		seen.len()
	}

	/// Most frequent member text, case-insensitive, ties broken by first
	/// occurrence. The returned title keeps the casing of the first member
	/// that used the winning form.
	pub fn title(&self) -> Option<String> {
		// (lowercase key, display form, count), in first-seen order
		let mut counts: Vec<(String, &str, usize)> = Vec::new();
		for text in &self.mentions {
			let lowered = text.to_lowercase();
			if let Some(slot) = counts.iter_mut().find(|(key, _, _)| *key == lowered) {
				slot.2 += 1;
			} else {
				counts.push((lowered, text, 1));
			}
		}
		let mut best: Option<(&str, usize)> = None;
		for (_, display, count) in &counts {
			if best.map_or(true, |(_, top)| *count > top) {
				best = Some((display, *count));
			}
		}
		best.map(|(display, _)| display.to_string())
	}

	/// Most frequent non-null member type, ties broken by first occurrence.
	pub fn resolved_type(&self) -> Option<String> {
		let mut counts: Vec<(&str, usize)> = Vec::new();
		for mention_type in self.types.iter().flatten() {
			if let Some(slot) = counts.iter_mut().find(|(key, _)| *key == mention_type) {
				slot.1 += 1;
			} else {
				counts.push((mention_type, 1));
			}
		}
		let mut best: Option<(&str, usize)> = None;
		for &(key, count) in &counts {
			if best.map_or(true, |(_, top)| count > top) {
				best = Some((key, count));
			}
		}
		best.map(|(key, _)| key.to_string())
	}

	/// Response record for this cluster under the given dense id.
	pub fn to_record(&self, id: usize) -> ClusterRecord {
		ClusterRecord {
			id,
			title: self.title().unwrap_or_default(),
			entity_type: self.resolved_type(),
			nelements: self.len(),
			mentions_id: self.mention_ids.clone(),
			mentions: self.mentions.clone(),
		}
	}
}

/// One cluster in the response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterRecord {
	pub id: usize,
	pub title: String,
	#[serde(rename = "type")]
	pub entity_type: Option<String>,
	pub nelements: usize,
	pub mentions_id: Vec<MentionId>,
	pub mentions: Vec<String>,
}

/// Complete clustering result for one batch request.
#[derive(Debug, Serialize)]
pub struct ClusterResponse {
	/// nilcluster version that produced this
	pub version: String,
	/// When clustering was performed
	pub timestamp: String,
	/// Thresholds used
	pub params: DistanceThresholds,
	/// NIL clusters first, aggregated linked clusters after
	pub clusters: Vec<ClusterRecord>,
	/// Total mentions processed, NIL and linked
	pub total_mentions: usize,
}
