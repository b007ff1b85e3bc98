//! Three-pass mention clustering with oversized-cluster correction
//!
//! Pass 1 groups mentions by surface form, pass 2 splits each group by
//! embedding similarity, pass 3 re-merges sub-clusters whose centroids are
//! cosine-near (synonym consolidation). A final pass re-splits clusters that
//! accumulated too many distinct surface forms; that guard is a size
//! heuristic, not a similarity re-check.

use crate::config::PipelineParams;
use crate::core::{ClusterRequest, ClusterResponse, Embedding, EntityCluster, Mention, ENTITY_TAG};
use crate::error::ClusterError;
use crate::processing::{aggregate, lexical, linkage};
use crate::ui;

/// Partition a mention batch into entity clusters.
///
/// Every input mention lands in exactly one output cluster and each output
/// cluster has its centroid computed. An empty batch yields an empty list.
/// Holds no state across calls; concurrent invocations on separate batches
/// are safe.
pub fn cluster_mentions(
	mentions: &[Mention],
	params: &PipelineParams,
) -> Result<Vec<EntityCluster>, ClusterError> {
	if mentions.is_empty() {
		return Ok(Vec::new());
	}

	ui::debug(&format!("Clustering {} NIL mentions", mentions.len()));

	let lexical_groups = lexical_pass(mentions, params.thresholds.lexical)?;
	ui::debug(&format!("Lexical pass: {} groups", lexical_groups.len()));

	let mut subclusters = Vec::new();
	for group in &lexical_groups {
		semantic_split(group, params.thresholds.semantic, &mut subclusters)?;
	}
	ui::debug(&format!("Semantic pass: {} sub-clusters", subclusters.len()));

	let merged = centroid_merge(subclusters, params)?;
	ui::debug(&format!("Centroid pass: {} clusters", merged.len()));

	let mut clusters = correct_oversized(merged, params)?;

	for cluster in &mut clusters {
		let _ = cluster.centroid();
	}
	Ok(clusters)
}

/// Run a whole batch request: decode, cluster the NIL mentions, aggregate
/// the linked ones, and assemble the response payload.
pub fn cluster_batch(
	mut request: ClusterRequest,
	params: &PipelineParams,
) -> Result<ClusterResponse, ClusterError> {
	let linked = std::mem::take(&mut request.linked);
	let mentions = request.into_mentions()?;

	let clusters = cluster_mentions(&mentions, params)?;
	let mut records: Vec<_> = clusters
		.iter()
		.enumerate()
		.map(|(id, cluster)| cluster.to_record(id))
		.collect();

	// Linked clusters continue the id range after the NIL clusters.
	records.extend(aggregate::aggregate_linked(&linked, records.len()));

	Ok(ClusterResponse {
		version: env!("CARGO_PKG_VERSION").to_string(),
		timestamp: chrono::Utc::now().to_rfc3339(),
		params: params.thresholds,
		clusters: records,
		total_mentions: mentions.len() + linked.len(),
	})
}

/// Pass 1: full pairwise surface-form matrix plus single-linkage grouping.
/// A single mention short-circuits to one cluster with no matrix work.
fn lexical_pass(mentions: &[Mention], threshold: f32) -> Result<Vec<EntityCluster>, ClusterError> {
	if mentions.len() == 1 {
		return Ok(vec![materialize(mentions, &[0])]);
	}

	let texts: Vec<&str> = mentions.iter().map(|m| m.text.as_str()).collect();
	let matrix = lexical::distance_matrix(&texts);
	let groups = linkage::cluster_precomputed(&matrix, threshold)?;

	Ok(groups
		.values()
		.map(|members| materialize(mentions, members))
		.collect())
}

/// Pass 2: sub-cluster one lexical group by embedding cosine distance.
///
/// A group of one, or one whose vectors make the cosine undefined,
/// degenerates to a single sub-cluster holding every member.
fn semantic_split(
	group: &EntityCluster,
	threshold: f32,
	out: &mut Vec<EntityCluster>,
) -> Result<(), ClusterError> {
	let groups = if group.len() == 1 {
		linkage::Groups::from([(0, vec![0])])
	} else {
		match linkage::cluster_cosine(group.embeddings(), threshold) {
			Ok(groups) => groups,
			Err(ClusterError::UndefinedDistance { .. }) => {
				linkage::Groups::from([(0, (0..group.len()).collect())])
			}
			Err(e) => return Err(e),
		}
	};

	for members in groups.values() {
		out.push(extract(group, members));
	}
	Ok(())
}

/// Pass 3: cluster sub-cluster centroids and merge same-label sub-clusters
/// when the merge policy allows; incompatible ones start fresh accumulators
/// under labels minted past the maximum in use.
fn centroid_merge(
	subclusters: Vec<EntityCluster>,
	params: &PipelineParams,
) -> Result<Vec<EntityCluster>, ClusterError> {
	if subclusters.len() <= 1 {
		return Ok(subclusters);
	}

	let mut subclusters = subclusters;
	let centroids: Vec<_> = subclusters
		.iter_mut()
		.map(|c| c.centroid().unwrap_or_else(|| Embedding::new(Vec::new())))
		.collect();

	let groups = match linkage::cluster_cosine(&centroids, params.thresholds.centroid_merge) {
		Ok(groups) => groups,
		Err(ClusterError::UndefinedDistance { .. }) => {
			linkage::Groups::from([(0, (0..centroids.len()).collect())])
		}
		Err(e) => return Err(e),
	};

	let mut label_of = vec![0usize; subclusters.len()];
	for (&label, members) in &groups {
		for &i in members {
			label_of[i] = label;
		}
	}

	let mut next_label = groups.keys().max().copied().unwrap_or(0) + 1;
	let mut accumulators = std::collections::BTreeMap::<usize, EntityCluster>::new();
	for (i, cluster) in subclusters.into_iter().enumerate() {
		let label = label_of[i];
		let slot = match accumulators.get(&label) {
			None => label,
			Some(current) if params.merge_policy.allows(current, &cluster) => label,
			Some(_) => {
				let fresh = next_label;
				next_label += 1;
				fresh
			}
		};
		match accumulators.entry(slot) {
			std::collections::btree_map::Entry::Vacant(entry) => {
				entry.insert(cluster);
			}
			std::collections::btree_map::Entry::Occupied(mut entry) => {
				entry.get_mut().merge(cluster);
			}
		}
	}

	Ok(accumulators.into_values().collect())
}

/// Pass 4: re-split clusters holding more than the configured number of
/// distinct case-insensitive texts, using the lexical pass restricted to the
/// offending cluster's members.
fn correct_oversized(
	clusters: Vec<EntityCluster>,
	params: &PipelineParams,
) -> Result<Vec<EntityCluster>, ClusterError> {
	let limit = params.thresholds.oversize_unique_mention_limit;
	let mut kept = Vec::new();
	let mut broken = Vec::new();

	for cluster in clusters {
		if cluster.unique_text_count() <= limit {
			kept.push(cluster);
			continue;
		}

		ui::debug(&format!(
			"Re-splitting over-merged cluster ({} distinct texts, limit {})",
			cluster.unique_text_count(),
			limit
		));
		let matrix = lexical::distance_matrix(cluster.mentions());
		let groups = linkage::cluster_precomputed(&matrix, params.thresholds.lexical)?;
		for members in groups.values() {
			broken.push(extract(&cluster, members));
		}
	}

	kept.extend(broken);
	Ok(kept)
}

/// Build a cluster from a subset of the input batch, in index order.
fn materialize(mentions: &[Mention], members: &[usize]) -> EntityCluster {
	let mut cluster = EntityCluster::new();
	for &i in members {
		let m = &mentions[i];
		cluster.add_element(
			m.id.clone(),
			m.text.clone(),
			ENTITY_TAG.to_string(),
			m.embedding.clone(),
			m.mention_type.clone(),
		);
	}
	cluster
}

/// Copy a subset of a parent cluster's members into a new cluster.
fn extract(parent: &EntityCluster, members: &[usize]) -> EntityCluster {
	let mut cluster = EntityCluster::new();
	for &i in members {
		cluster.add_element(
			parent.mention_ids()[i].clone(),
			parent.mentions()[i].clone(),
			parent.entities()[i].clone(),
			parent.embeddings()[i].clone(),
			parent.types()[i].clone(),
		);
	}
	cluster
}
