//! Single-linkage agglomerative clustering with a distance threshold
//!
//! Repeatedly merges the two closest groups, measuring group distance as the
//! minimum over cross-group member pairs, and stops once the closest
//! remaining pair exceeds the threshold. There is no fixed cluster count.

use std::collections::BTreeMap;

use crate::core::Embedding;
use crate::error::ClusterError;

/// Group membership keyed by dense, zero-based label.
///
/// Labels are ordered by each group's smallest member index, so identical
/// input always yields identical labels; only membership carries meaning.
pub type Groups = BTreeMap<usize, Vec<usize>>;

/// Cluster items under a fallible pairwise distance.
///
/// The distance source is consulted once per unordered pair and never for
/// zero- or one-item input.
pub fn cluster_with<T, D>(items: &[T], mut distance: D, threshold: f32) -> Result<Groups, ClusterError>
where
	D: FnMut(usize, &T, usize, &T) -> Result<f32, ClusterError>,
{
	let n = items.len();
	let mut labeled = Groups::new();
	if n == 0 {
		return Ok(labeled);
	}
	if n == 1 {
		labeled.insert(0, vec![0]);
		return Ok(labeled);
	}

	// Full pairwise matrix, computed once up front.
	let mut pairwise = vec![0.0f32; n * n];
	for i in 0..n {
		for j in (i + 1)..n {
			let d = distance(i, &items[i], j, &items[j])?;
			pairwise[i * n + j] = d;
			pairwise[j * n + i] = d;
		}
	}

	let mut groups: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
	while groups.len() > 1 {
		// Closest pair of groups; strict less-than keeps the scan-order
		// winner on ties, making the merge order deterministic.
		let mut best: Option<(usize, usize, f32)> = None;
		for a in 0..groups.len() {
			for b in (a + 1)..groups.len() {
				let d = single_linkage(&groups[a], &groups[b], &pairwise, n);
				if best.map_or(true, |(_, _, top)| d < top) {
					best = Some((a, b, d));
				}
			}
		}
		let Some((a, b, d)) = best else {
			break;
		};
		if d > threshold {
			break;
		}
		let absorbed = groups.remove(b);
		groups[a].extend(absorbed);
	}

	for group in &mut groups {
		group.sort_unstable();
	}
	groups.sort_by_key(|group| group[0]);
	for (label, group) in groups.into_iter().enumerate() {
		labeled.insert(label, group);
	}
	Ok(labeled)
}

/// Cluster over a precomputed symmetric distance matrix.
pub fn cluster_precomputed(matrix: &[Vec<f32>], threshold: f32) -> Result<Groups, ClusterError> {
	let indices: Vec<usize> = (0..matrix.len()).collect();
	cluster_with(&indices, |_, &i, _, &j| Ok(matrix[i][j]), threshold)
}

/// Cluster feature vectors under cosine distance.
///
/// Fails with [`ClusterError::UndefinedDistance`] when a zero-magnitude
/// vector makes the cosine undefined.
pub fn cluster_cosine(vectors: &[Embedding], threshold: f32) -> Result<Groups, ClusterError> {
	cluster_with(
		vectors,
		|i, u, j, v| {
			u.cosine_distance(v).ok_or(ClusterError::UndefinedDistance {
				index: if u.is_zero() { i } else { j },
			})
		},
		threshold,
	)
}

fn single_linkage(a: &[usize], b: &[usize], pairwise: &[f32], n: usize) -> f32 {
	let mut min = f32::INFINITY;
	for &i in a {
		for &j in b {
			let d = pairwise[i * n + j];
			if d < min {
				min = d;
			}
		}
	}
	min
}
