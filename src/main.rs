//! nilcluster - cluster NIL entity mentions from the command line
//!
//! Thin driver over the library: reads a batch request JSON, runs the
//! clustering pipeline, and prints the response.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::Colorize;

use nilcluster::cli::{Cli, Command};
use nilcluster::commands;
use nilcluster::config::{DistanceThresholds, PipelineParams};
use nilcluster::ui;

fn main() -> Result<()> {
	let cli = Cli::parse();

	ui::Log::set_verbose(cli.verbose);

	match cli.command {
		Command::Cluster {
			input,
			output,
			pretty,
			lexical,
			semantic,
			centroid_merge,
			oversize_limit,
			merge_policy,
		} => {
			print_header();
			let params = PipelineParams {
				thresholds: DistanceThresholds {
					lexical,
					semantic,
					centroid_merge,
					oversize_unique_mention_limit: oversize_limit,
				},
				merge_policy,
			};
			commands::cluster::run(input.as_deref(), output.as_deref(), pretty, params)
		}
		Command::Encode { values } => commands::codec::run_encode(values.as_deref()),
		Command::Decode { payload } => commands::codec::run_decode(payload.as_deref()),
		Command::Help { subcommand } => {
			let mut cmd = Cli::command();
			if let Some(sub) = subcommand {
				if let Some(sub_cmd) = cmd.find_subcommand_mut(&sub) {
					sub_cmd.print_help()?;
				} else {
					eprintln!("Unknown subcommand: {}", sub);
					cmd.print_help()?;
				}
			} else {
				cmd.print_help()?;
			}
			Ok(())
		}
	}
}

fn print_header() {
	println!();
	println!(
		"{}",
		format!("─── nilcluster v{} ───", env!("CARGO_PKG_VERSION"))
			.bright_blue()
			.bold()
	);
}
