// End-to-end pipeline tests over the batch contract

use std::collections::HashSet;

use nilcluster::config::{DistanceThresholds, PipelineParams};
use nilcluster::core::codec;
use nilcluster::core::{ClusterRequest, Embedding, LinkedMention, Mention, MentionId};
use nilcluster::error::ClusterError;
use nilcluster::processing::{cluster_batch, cluster_mentions};

fn mention(id: i64, text: &str, embedding: Vec<f32>) -> Mention {
	Mention {
		id: MentionId::Num(id),
		text: text.to_string(),
		embedding: Embedding::new(embedding),
		mention_type: None,
	}
}

fn request(mentions: &[(&str, Vec<f32>)]) -> ClusterRequest {
	ClusterRequest {
		mentions: mentions.iter().map(|(t, _)| t.to_string()).collect(),
		embeddings: Some(mentions.iter().map(|(_, e)| codec::encode(e)).collect()),
		..Default::default()
	}
}

/// Every input mention must land in exactly one output cluster.
fn assert_partition(input: &[Mention], clusters: &[nilcluster::core::EntityCluster]) {
	let mut seen: Vec<&MentionId> = Vec::new();
	for cluster in clusters {
		for id in cluster.mention_ids() {
			assert!(!seen.contains(&id), "mention {:?} appears twice", id);
			seen.push(id);
		}
	}
	let expected: HashSet<&MentionId> = input.iter().map(|m| &m.id).collect();
	let actual: HashSet<&MentionId> = seen.into_iter().collect();
	assert_eq!(actual, expected, "clusters must cover the input exactly");
}

#[test]
fn test_empty_batch_yields_empty_list() {
	let params = PipelineParams::default();
	let clusters = cluster_mentions(&[], &params).unwrap();
	assert!(clusters.is_empty());

	let response = cluster_batch(ClusterRequest::default(), &params).unwrap();
	assert!(response.clusters.is_empty());
	assert_eq!(response.total_mentions, 0);
}

#[test]
fn test_missing_embeddings_is_an_error() {
	let req = ClusterRequest {
		mentions: vec!["Milano".to_string(), "Rome".to_string()],
		..Default::default()
	};
	let err = cluster_batch(req, &PipelineParams::default()).unwrap_err();
	assert!(matches!(err, ClusterError::MissingEmbeddings));
}

#[test]
fn test_encodings_substitute_for_embeddings() {
	let req = ClusterRequest {
		mentions: vec!["Milano".to_string()],
		encodings: Some(vec![codec::encode(&[1.0, 0.0])]),
		..Default::default()
	};
	let response = cluster_batch(req, &PipelineParams::default()).unwrap();
	assert_eq!(response.clusters.len(), 1);
	assert_eq!(response.clusters[0].title, "Milano");
}

#[test]
fn test_length_mismatch_is_an_error() {
	let req = ClusterRequest {
		mentions: vec!["Milano".to_string(), "Rome".to_string()],
		embeddings: Some(vec![codec::encode(&[1.0, 0.0])]),
		..Default::default()
	};
	let err = cluster_batch(req, &PipelineParams::default()).unwrap_err();
	assert!(matches!(
		err,
		ClusterError::LengthMismatch { field: "embeddings", actual: 1, expected: 2 }
	));
}

#[test]
fn test_ragged_embedding_dimensions_are_an_error() {
	// A batch mixing 2- and 3-dimensional vectors must fail up front rather
	// than cluster over truncated dot products.
	let req = ClusterRequest {
		mentions: vec!["Milano".to_string(), "Milan".to_string()],
		embeddings: Some(vec![
			codec::encode(&[1.0, 0.0]),
			codec::encode(&[1.0, 0.0, 5.0]),
		]),
		..Default::default()
	};
	let err = cluster_batch(req, &PipelineParams::default()).unwrap_err();
	assert!(matches!(
		err,
		ClusterError::DimensionMismatch { index: 1, actual: 3, expected: 2 }
	));
}

#[test]
fn test_single_mention_batch() {
	let input = [mention(7, "Milano", vec![1.0, 0.0])];
	let clusters = cluster_mentions(&input, &PipelineParams::default()).unwrap();
	assert_eq!(clusters.len(), 1);
	assert_eq!(clusters[0].mention_ids(), &[MentionId::Num(7)]);
	assert_eq!(clusters[0].title().unwrap(), "Milano");
}

#[test]
fn test_ids_synthesized_when_absent() {
	let req = request(&[("Milano", vec![1.0, 0.0]), ("Rome", vec![0.0, 1.0])]);
	let response = cluster_batch(req, &PipelineParams::default()).unwrap();

	let mut ids: Vec<MentionId> = response
		.clusters
		.iter()
		.flat_map(|c| c.mentions_id.clone())
		.collect();
	ids.sort_by_key(|id| match id {
		MentionId::Num(n) => *n,
		MentionId::Text(_) => i64::MAX,
	});
	assert_eq!(ids, vec![MentionId::Num(0), MentionId::Num(1)]);
}

#[test]
fn test_synonym_scenario_milano_milan_rome() {
	// "Milano" and "Milan" are distinct surface forms, so the lexical pass
	// keeps them apart; their near-identical embeddings bring them back
	// together at the centroid pass. "Rome" stays far on both axes.
	let input = [
		mention(0, "Milano", vec![1.0, 0.0, 0.0]),
		mention(1, "Milan", vec![0.999, 0.001, 0.0]),
		mention(2, "Rome", vec![0.0, 0.0, 1.0]),
	];
	let clusters = cluster_mentions(&input, &PipelineParams::default()).unwrap();
	assert_partition(&input, &clusters);
	assert_eq!(clusters.len(), 2);

	let milano = clusters
		.iter()
		.find(|c| c.mentions().contains(&"Milano".to_string()))
		.unwrap();
	assert_eq!(milano.len(), 2);
	assert!(milano.mentions().contains(&"Milan".to_string()));
	// tie on frequency, first-seen wins
	assert_eq!(milano.title().unwrap(), "Milano");

	let rome = clusters
		.iter()
		.find(|c| c.mentions().contains(&"Rome".to_string()))
		.unwrap();
	assert_eq!(rome.len(), 1);
}

#[test]
fn test_identical_texts_cluster_lexically() {
	// Same surface form, orthogonal embeddings: the lexical pass joins them,
	// the semantic pass splits them again.
	let input = [
		mention(0, "Jordan", vec![1.0, 0.0]),
		mention(1, "jordan", vec![0.0, 1.0]),
	];
	let clusters = cluster_mentions(&input, &PipelineParams::default()).unwrap();
	assert_partition(&input, &clusters);
	assert_eq!(clusters.len(), 2);
}

#[test]
fn test_determinism() {
	let input: Vec<Mention> = (0..12)
		.map(|i| {
			let angle = (i % 4) as f32 * 0.4;
			mention(
				i,
				&format!("entity-{}", i % 5),
				vec![angle.cos(), angle.sin(), 0.1 * i as f32],
			)
		})
		.collect();

	let params = PipelineParams::default();
	let first = cluster_mentions(&input, &params).unwrap();
	let second = cluster_mentions(&input, &params).unwrap();

	assert_eq!(first.len(), second.len());
	for (a, b) in first.iter().zip(second.iter()) {
		assert_eq!(a.mention_ids(), b.mention_ids());
		assert_eq!(a.mentions(), b.mentions());
	}
}

#[test]
fn test_oversize_cluster_is_resplit() {
	// 30 lexically diverse texts with identical embeddings collapse into one
	// cluster at the centroid pass, then the correction pass re-splits them.
	let input: Vec<Mention> = (0..30)
		.map(|i| mention(i, &format!("entity-number-{:02}", i), vec![1.0, 2.0, 3.0]))
		.collect();

	let params = PipelineParams::default();
	let clusters = cluster_mentions(&input, &params).unwrap();
	assert_partition(&input, &clusters);
	assert!(clusters.len() > 1, "over-merged cluster must be broken up");
	for cluster in &clusters {
		assert!(
			cluster.unique_text_count() <= params.thresholds.oversize_unique_mention_limit,
			"no cluster may keep more than the distinct-text limit"
		);
	}
}

#[test]
fn test_zero_vectors_degenerate_within_lexical_group() {
	// Zero embeddings make cosine undefined; the semantic pass falls back to
	// one sub-cluster per lexical group instead of failing the batch.
	let input = [
		mention(0, "Milano", vec![0.0, 0.0]),
		mention(1, "milano", vec![0.0, 0.0]),
		mention(2, "Rome", vec![0.0, 0.0]),
	];
	let clusters = cluster_mentions(&input, &PipelineParams::default()).unwrap();
	assert_partition(&input, &clusters);
}

#[test]
fn test_types_propagate_to_records() {
	let req = ClusterRequest {
		mentions: vec!["Milano".to_string(), "milano".to_string()],
		embeddings: Some(vec![
			codec::encode(&[1.0, 0.0]),
			codec::encode(&[0.999, 0.001]),
		]),
		types: Some(vec!["LOC".to_string(), "LOC".to_string()]),
		..Default::default()
	};
	let response = cluster_batch(req, &PipelineParams::default()).unwrap();
	assert_eq!(response.clusters.len(), 1);
	assert_eq!(response.clusters[0].entity_type.as_deref(), Some("LOC"));
	assert_eq!(response.clusters[0].nelements, 2);
}

#[test]
fn test_linked_clusters_continue_id_range() {
	let mut req = request(&[("Milano", vec![1.0, 0.0]), ("Rome", vec![0.0, 1.0])]);
	req.linked = vec![
		LinkedMention {
			id: MentionId::Num(100),
			mention: "Paris".to_string(),
			identifier: "Q90".to_string(),
			title: "Paris".to_string(),
			kb_type: None,
			mention_type: Some("LOC".to_string()),
			types: Vec::new(),
		},
		LinkedMention {
			id: MentionId::Num(101),
			mention: "Lutetia".to_string(),
			identifier: "Q90".to_string(),
			title: "Paris".to_string(),
			kb_type: None,
			mention_type: Some("LOC".to_string()),
			types: Vec::new(),
		},
	];

	let response = cluster_batch(req, &PipelineParams::default()).unwrap();
	assert_eq!(response.total_mentions, 4);

	// dense, unique ids with NIL clusters first
	let ids: Vec<usize> = response.clusters.iter().map(|c| c.id).collect();
	assert_eq!(ids, (0..response.clusters.len()).collect::<Vec<_>>());

	let paris = response.clusters.last().unwrap();
	assert_eq!(paris.title, "Paris");
	assert_eq!(paris.nelements, 2);
	assert_eq!(paris.entity_type.as_deref(), Some("LOC"));
}

#[test]
fn test_custom_thresholds_are_honored() {
	// With a near-zero centroid threshold the synonym consolidation is
	// effectively disabled and Milano/Milan stay apart.
	let input = [
		mention(0, "Milano", vec![1.0, 0.0, 0.0]),
		mention(1, "Milan", vec![0.999, 0.001, 0.0]),
	];
	let params = PipelineParams {
		thresholds: DistanceThresholds {
			centroid_merge: 1e-9,
			..Default::default()
		},
		..Default::default()
	};
	let clusters = cluster_mentions(&input, &params).unwrap();
	assert_eq!(clusters.len(), 2);
}
