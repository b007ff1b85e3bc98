//! Mention batch input contract

use serde::{Deserialize, Serialize};

use crate::core::codec::{self, Dtype};
use crate::core::Embedding;
use crate::error::ClusterError;

/// Identifier of a mention annotation, numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MentionId {
	Num(i64),
	Text(String),
}

impl From<i64> for MentionId {
	fn from(id: i64) -> Self {
		MentionId::Num(id)
	}
}

impl From<&str> for MentionId {
	fn from(id: &str) -> Self {
		MentionId::Text(id.to_string())
	}
}

/// A single NIL mention ready for clustering. Immutable once ingested.
#[derive(Debug, Clone)]
pub struct Mention {
	pub id: MentionId,
	pub text: String,
	pub embedding: Embedding,
	pub mention_type: Option<String>,
}

/// An already-linked mention carrying its knowledge-base identifier.
/// These are grouped by identifier, never clustered by similarity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedMention {
	pub id: MentionId,
	pub mention: String,
	/// Knowledge-base identifier the linker resolved to.
	pub identifier: String,
	pub title: String,
	/// Type asserted by the linker's top candidate, when any.
	#[serde(default)]
	pub kb_type: Option<String>,
	/// Annotation type of the mention itself.
	#[serde(default)]
	pub mention_type: Option<String>,
	/// Auxiliary candidate types.
	#[serde(default)]
	pub types: Vec<String>,
}

/// Raw batch request as posted by the linking pipeline.
///
/// `encodings` is accepted as a legacy alias for `embeddings`; `ids` and
/// `types` are optional and synthesized or defaulted when absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClusterRequest {
	#[serde(default)]
	pub ids: Option<Vec<MentionId>>,
	#[serde(default)]
	pub mentions: Vec<String>,
	#[serde(default)]
	pub embeddings: Option<Vec<String>>,
	#[serde(default)]
	pub encodings: Option<Vec<String>>,
	#[serde(default)]
	pub types: Option<Vec<String>>,
	/// Already-linked mentions, aggregated after the NIL clusters.
	#[serde(default)]
	pub linked: Vec<LinkedMention>,
}

impl ClusterRequest {
	/// Validate the parallel fields and decode the wire-encoded embeddings.
	///
	/// An empty batch is not an error and yields no mentions; a batch with
	/// mentions but no embedding payloads violates the input contract.
	pub fn into_mentions(self) -> Result<Vec<Mention>, ClusterError> {
		let encoded = match (self.embeddings, self.encodings) {
			(Some(e), _) if !e.is_empty() => e,
			(_, Some(e)) if !e.is_empty() => e,
			_ => {
				if self.mentions.is_empty() {
					return Ok(Vec::new());
				}
				return Err(ClusterError::MissingEmbeddings);
			}
		};

		let n = self.mentions.len();
		if encoded.len() != n {
			return Err(ClusterError::LengthMismatch {
				field: "embeddings",
				actual: encoded.len(),
				expected: n,
			});
		}

		let ids: Vec<MentionId> = match self.ids {
			Some(ids) if !ids.is_empty() => {
				if ids.len() != n {
					return Err(ClusterError::LengthMismatch {
						field: "ids",
						actual: ids.len(),
						expected: n,
					});
				}
				ids
			}
			_ => (0..n as i64).map(MentionId::Num).collect(),
		};

		let types: Vec<Option<String>> = match self.types {
			Some(types) if !types.is_empty() => {
				if types.len() != n {
					return Err(ClusterError::LengthMismatch {
						field: "types",
						actual: types.len(),
						expected: n,
					});
				}
				types.into_iter().map(Some).collect()
			}
			_ => vec![None; n],
		};

		let mut mentions = Vec::with_capacity(n);
		let mut dim: Option<usize> = None;
		for (index, (((id, text), payload), mention_type)) in ids
			.into_iter()
			.zip(self.mentions)
			.zip(encoded)
			.zip(types)
			.enumerate()
		{
			let embedding = Embedding::new(codec::decode(&payload, Dtype::F32)?);
			// All vectors in one batch must share a dimensionality; a ragged
			// batch would cluster on meaningless similarities.
			match dim {
				None => dim = Some(embedding.len()),
				Some(expected) if embedding.len() != expected => {
					return Err(ClusterError::DimensionMismatch {
						index,
						actual: embedding.len(),
						expected,
					});
				}
				Some(_) => {}
			}
			mentions.push(Mention {
				id,
				text,
				embedding,
				mention_type,
			});
		}
		Ok(mentions)
	}
}
