//! Cluster command - run one batch request through the pipeline

use std::fs;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::*;

use crate::config::PipelineParams;
use crate::core::{ClusterRequest, ClusterResponse};
use crate::processing::cluster_batch;
use crate::ui;

pub fn run(
	input: Option<&Path>,
	output: Option<&Path>,
	pretty: bool,
	params: PipelineParams,
) -> Result<()> {
	let raw = read_input(input)?;
	let request: ClusterRequest =
		serde_json::from_str(&raw).context("Batch request is not valid JSON")?;

	ui::debug(&format!(
		"Thresholds: lexical={}, semantic={}, centroid_merge={}, oversize_limit={}",
		params.thresholds.lexical,
		params.thresholds.semantic,
		params.thresholds.centroid_merge,
		params.thresholds.oversize_unique_mention_limit
	));

	let start = Instant::now();
	let response = cluster_batch(request, &params).context("Clustering failed")?;
	let elapsed = start.elapsed().as_secs_f32();

	print_summary(&response, elapsed);

	let json = if pretty {
		serde_json::to_string_pretty(&response)?
	} else {
		serde_json::to_string(&response)?
	};

	match output {
		Some(path) => {
			fs::write(path, json)
				.with_context(|| format!("Failed to write {}", path.display()))?;
			ui::success(&format!("Wrote response to {}", path.display()));
		}
		None => println!("{}", json),
	}

	Ok(())
}

fn read_input(input: Option<&Path>) -> Result<String> {
	match input {
		Some(path) => {
			ui::info(&format!("Reading batch from {}", path.display()));
			fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
		}
		None => {
			let mut buffer = String::new();
			std::io::stdin()
				.read_to_string(&mut buffer)
				.context("Failed to read batch request from stdin")?;
			Ok(buffer)
		}
	}
}

fn print_summary(response: &ClusterResponse, elapsed: f32) {
	if response.clusters.is_empty() {
		ui::warn("No mentions to cluster");
		return;
	}

	ui::success(&format!(
		"{} clusters from {} mentions in {:.2}s",
		response.clusters.len(),
		response.total_mentions,
		elapsed
	));

	if !ui::Log::is_verbose() {
		return;
	}

	for cluster in &response.clusters {
		let type_display = cluster
			.entity_type
			.as_deref()
			.unwrap_or("untyped")
			.yellow();
		ui::debug(&format!(
			"  #{} {} ({}) {} mentions",
			cluster.id,
			cluster.title.bright_white(),
			type_display,
			cluster.nelements
		));
	}
}
