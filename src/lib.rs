//! # nilcluster
//!
//! Cross-document clustering of NIL entity mentions (mentions a linker could
//! not resolve to a knowledge-base record). A batch of mention texts with
//! wire-encoded embeddings goes through a lexical pass, a per-group semantic
//! pass, and a centroid-level merge, with a corrective re-split of
//! over-merged clusters; already-linked mentions are aggregated by their
//! knowledge-base identifier alongside.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod processing;
pub mod ui;
