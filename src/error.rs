//! Typed failures of the clustering engine
//!
//! The batch call either fully clusters or fails with one of these; there is
//! no partial-success mode and nothing is retried.

use thiserror::Error;

/// Failures while decoding a wire-encoded embedding vector.
#[derive(Debug, Error)]
pub enum DecodeError {
	#[error("embedding payload is not valid base64: {0}")]
	Base64(#[from] base64::DecodeError),

	#[error("payload of {len} bytes is not a whole number of {width}-byte {dtype} elements")]
	RaggedLength {
		len: usize,
		width: usize,
		dtype: &'static str,
	},
}

/// Failures of one clustering batch call.
#[derive(Debug, Error)]
pub enum ClusterError {
	/// Input contract violation: the batch carries mentions but no embedding
	/// payloads under either accepted field name.
	#[error("either `embeddings` or `encodings` is required")]
	MissingEmbeddings,

	/// A parallel request field does not line up with `mentions`.
	#[error("field `{field}` has {actual} entries, expected {expected}")]
	LengthMismatch {
		field: &'static str,
		actual: usize,
		expected: usize,
	},

	/// Embedding vectors within one batch must share a dimensionality.
	#[error("embedding at index {index} has {actual} dimensions, expected {expected}")]
	DimensionMismatch {
		index: usize,
		actual: usize,
		expected: usize,
	},

	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// Cosine distance is undefined when a vector has zero magnitude.
	/// The pipeline catches this in its semantic and centroid passes and
	/// falls back to a single cluster; it never reaches the caller from there.
	#[error("cosine distance undefined: zero-magnitude vector at index {index}")]
	UndefinedDistance { index: usize },
}
