use clap::{builder::Styles, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{self, MergePolicy};

fn styles() -> Styles {
	use clap::builder::styling::{AnsiColor, Color, Style};
	Styles::styled()
		.header(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Blue))))
		.usage(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Blue))))
		.literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))))
		.placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))))
		.valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))))
		.invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))))
}

#[derive(Parser, Debug)]
#[command(
	name = "nilcluster",
	author,
	version,
	about = "Cross-document clustering of NIL entity mentions",
	styles = styles(),
	disable_help_subcommand = true,
	after_help = format!(
		"{title}
  {bin} {cluster} {cluster_args}        {cluster_desc}
  {bin} {cluster} {cluster_thr_args}   {cluster_thr_desc}
  {bin} {encode} {encode_args}   {encode_desc}
  {bin} {decode} {decode_args}            {decode_desc}",
		title = "Examples:".bright_blue().bold(),
		bin = "nilcluster".bright_blue(),
		cluster = "cluster".yellow(),
		cluster_args = "-i batch.json",
		cluster_desc = "Cluster a mention batch".dimmed(),
		cluster_thr_args = "--semantic 0.05",
		cluster_thr_desc = "Override a pass threshold".dimmed(),
		encode = "encode".yellow(),
		encode_args = "\"[0.1, 0.2, 0.3]\"",
		encode_desc = "Encode a vector for transport".dimmed(),
		decode = "decode".yellow(),
		decode_args = "zczMPQ==",
		decode_desc = "Decode a wire payload".dimmed(),
	),
)]
pub struct Cli {
	/// Enable verbose debug output
	#[arg(short = 'v', long = "verbose", global = true)]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Cluster a batch of NIL mentions into entity groups
	Cluster {
		/// Batch request JSON file (reads stdin when omitted)
		#[arg(short = 'i', long = "input")]
		input: Option<PathBuf>,

		/// Write the response JSON here instead of stdout
		#[arg(short = 'o', long = "output")]
		output: Option<PathBuf>,

		/// Pretty-print the response JSON
		#[arg(long = "pretty")]
		pretty: bool,

		/// Surface-form distance threshold (passes 1 and 4)
		#[arg(long = "lexical", default_value_t = config::LEXICAL_THRESHOLD)]
		lexical: f32,

		/// Cosine distance threshold inside each lexical group (pass 2)
		#[arg(long = "semantic", default_value_t = config::SEMANTIC_THRESHOLD)]
		semantic: f32,

		/// Cosine distance threshold between centroids (pass 3)
		#[arg(long = "centroid", default_value_t = config::CENTROID_MERGE_THRESHOLD)]
		centroid_merge: f32,

		/// Distinct-text limit before a cluster is re-split lexically
		#[arg(long = "oversize-limit", default_value_t = config::OVERSIZE_UNIQUE_MENTION_LIMIT)]
		oversize_limit: usize,

		/// Merge gate for clusters sharing a centroid-pass label
		#[arg(long = "merge-policy", value_enum, default_value = "non-empty")]
		merge_policy: MergePolicy,
	},

	/// Encode a JSON float array into the embedding wire format
	Encode {
		/// JSON array of floats (reads stdin when omitted)
		#[arg(value_name = "JSON")]
		values: Option<String>,
	},

	/// Decode a wire-encoded embedding into a JSON float array
	Decode {
		/// Base64 payload (reads stdin when omitted)
		#[arg(value_name = "PAYLOAD")]
		payload: Option<String>,
	},

	/// Show help for a subcommand
	Help {
		/// Subcommand name
		subcommand: Option<String>,
	},
}
