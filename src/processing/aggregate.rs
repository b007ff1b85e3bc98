//! Aggregation of already-linked mentions by knowledge-base identifier
//!
//! Linked mentions are never clustered by similarity; mentions sharing a
//! knowledge-base identifier simply form one cluster.

use std::collections::HashMap;

use crate::core::{ClusterRecord, LinkedMention, MentionId};

struct LinkedGroup {
	title: String,
	ids: Vec<MentionId>,
	mentions: Vec<String>,
	kb_type: Option<String>,
	type_votes: Vec<String>,
}

/// Group linked mentions by identifier, first-seen order.
///
/// Cluster ids start at `next_id`, continuing the dense range the NIL
/// clusters occupy. The representative type is the knowledge-base type when
/// any member carries one, otherwise a majority vote over the union of each
/// member's own type and auxiliary type list.
pub fn aggregate_linked(linked: &[LinkedMention], next_id: usize) -> Vec<ClusterRecord> {
	let mut order: Vec<&str> = Vec::new();
	let mut groups: HashMap<&str, LinkedGroup> = HashMap::new();

	for mention in linked {
		let group = groups.entry(&mention.identifier).or_insert_with(|| {
			order.push(&mention.identifier);
			LinkedGroup {
				title: mention.title.clone(),
				ids: Vec::new(),
				mentions: Vec::new(),
				kb_type: None,
				type_votes: Vec::new(),
			}
		});

		group.ids.push(mention.id.clone());
		group.mentions.push(mention.mention.clone());
		if let Some(kb_type) = &mention.kb_type {
			group.kb_type = Some(kb_type.clone());
		}

		// Union of the mention's own type and its auxiliary list, one vote
		// per distinct type per mention.
		let mut votes: Vec<&String> = Vec::new();
		if let Some(own) = &mention.mention_type {
			votes.push(own);
		}
		for extra in &mention.types {
			if !votes.contains(&extra) {
				votes.push(extra);
			}
		}
		group.type_votes.extend(votes.into_iter().cloned());
	}

	order
		.into_iter()
		.enumerate()
		.map(|(offset, key)| {
			let group = &groups[key];
			ClusterRecord {
				id: next_id + offset,
				title: group.title.clone(),
				entity_type: group
					.kb_type
					.clone()
					.or_else(|| majority_vote(&group.type_votes)),
				nelements: group.mentions.len(),
				mentions_id: group.ids.clone(),
				mentions: group.mentions.clone(),
			}
		})
		.collect()
}

/// Most frequent vote, ties broken by first occurrence.
fn majority_vote(votes: &[String]) -> Option<String> {
	let mut counts: Vec<(&str, usize)> = Vec::new();
	for vote in votes {
		if let Some(slot) = counts.iter_mut().find(|(key, _)| *key == vote) {
			slot.1 += 1;
		} else {
			counts.push((vote, 1));
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
