//! Surface-form distance between mention strings

use rayon::prelude::*;
use strsim::damerau_levenshtein;

/// Strings shorter than this get the short-token penalty.
const SHORT_TOKEN_LEN: usize = 4;

/// Flat penalty discouraging merges of short tokens on small edit distances.
const SHORT_TOKEN_PENALTY: f32 = 3.0;

/// Damerau-Levenshtein distance with a penalty for non-identical short
/// tokens.
///
/// Case-insensitive and symmetric. Unbounded above; only its relation to the
/// configured lexical threshold matters.
pub fn distance(a: &str, b: &str) -> f32 {
	let short = a.chars().count() < SHORT_TOKEN_LEN || b.chars().count() < SHORT_TOKEN_LEN;
	let a = a.to_lowercase();
	let b = b.to_lowercase();
	if short {
		if a == b {
			0.0
		} else {
			damerau_levenshtein(&a, &b) as f32 + SHORT_TOKEN_PENALTY
		}
	} else {
		damerau_levenshtein(&a, &b) as f32
	}
}

/// Full symmetric pairwise matrix over mention texts.
///
/// Rows are computed in parallel; assembly is deterministic, so downstream
/// clustering sees the same matrix regardless of thread count.
pub fn distance_matrix<S: AsRef<str> + Sync>(texts: &[S]) -> Vec<Vec<f32>> {
	texts
		.par_iter()
		.map(|a| {
			texts
				.iter()
				.map(|b| distance(a.as_ref(), b.as_ref()))
				.collect()
		})
		.collect()
}
