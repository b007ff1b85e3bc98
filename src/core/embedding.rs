//! Mention embeddings and cosine geometry

/// A mention embedding as supplied by the encoder, unnormalized.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding(pub Vec<f32>);

impl Embedding {
	pub fn new(data: Vec<f32>) -> Self {
		Self(data)
	}

	pub fn as_slice(&self) -> &[f32] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// True when every component is zero (cosine distance undefined).
	pub fn is_zero(&self) -> bool {
		self.0.iter().all(|x| *x == 0.0)
	}

	fn norm(&self) -> f32 {
		self.0.iter().map(|x| x * x).sum::<f32>().sqrt()
	}

	/// Cosine distance `1 - cos(u, v)`; `None` when either vector has zero
	/// magnitude, never NaN.
	pub fn cosine_distance(&self, other: &Self) -> Option<f32> {
		let nu = self.norm();
		let nv = other.norm();
		if nu == 0.0 || nv == 0.0 {
			return None;
		}
		let dot: f32 = self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum();
		Some(1.0 - dot / (nu * nv))
	}

	/// Arithmetic mean of a set of embeddings; `None` when the set is empty.
	pub fn mean(embeddings: &[Embedding]) -> Option<Embedding> {
		let first = embeddings.first()?;
		let mut acc = vec![0.0f32; first.len()];
		for emb in embeddings {
			for (slot, &val) in acc.iter_mut().zip(emb.0.iter()) {
				*slot += val;
			}
		}
		let n = embeddings.len() as f32;
		for val in &mut acc {
			*val /= n;
		}
		Some(Embedding(acc))
	}
}

impl From<Vec<f32>> for Embedding {
	fn from(data: Vec<f32>) -> Self {
		Self(data)
	}
}
