//! Wire codec for embedding vectors
//!
//! Embeddings travel as base64 over the little-endian byte image of the
//! vector. The element type and byte order are an explicit part of the wire
//! contract, not an implicit default.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::DecodeError;

/// Element type of an encoded vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dtype {
	#[default]
	F32,
}

impl Dtype {
	/// Width of one element in bytes.
	pub fn width(self) -> usize {
		match self {
			Dtype::F32 => 4,
		}
	}

	pub fn name(self) -> &'static str {
		match self {
			Dtype::F32 => "float32",
		}
	}
}

/// Encode a vector as base64 over its little-endian bytes.
pub fn encode(v: &[f32]) -> String {
	let mut bytes = Vec::with_capacity(v.len() * 4);
	for x in v {
		bytes.extend_from_slice(&x.to_le_bytes());
	}
	STANDARD.encode(bytes)
}

/// Decode a base64 payload back into a vector. Bit-for-bit inverse of
/// [`encode`] for any finite f32 vector, the empty one included.
pub fn decode(s: &str, dtype: Dtype) -> Result<Vec<f32>, DecodeError> {
	let bytes = STANDARD.decode(s)?;
	let width = dtype.width();
	if bytes.len() % width != 0 {
		return Err(DecodeError::RaggedLength {
			len: bytes.len(),
			width,
			dtype: dtype.name(),
		});
	}
	Ok(bytes
		.chunks_exact(width)
		.map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
		.collect())
}
