//! Encode/decode commands - embedding wire format utilities

use std::io::Read;

use anyhow::{Context, Result};

use crate::core::codec::{self, Dtype};

pub fn run_encode(values: Option<&str>) -> Result<()> {
	let raw = read_arg(values)?;
	let vector: Vec<f32> =
		serde_json::from_str(&raw).context("Expected a JSON array of floats")?;
	println!("{}", codec::encode(&vector));
	Ok(())
}

pub fn run_decode(payload: Option<&str>) -> Result<()> {
	let raw = read_arg(payload)?;
	let vector = codec::decode(raw.trim(), Dtype::F32).context("Failed to decode payload")?;
	println!("{}", serde_json::to_string(&vector)?);
	Ok(())
}

fn read_arg(arg: Option<&str>) -> Result<String> {
	match arg {
		Some(value) => Ok(value.to_string()),
		None => {
			let mut buffer = String::new();
			std::io::stdin()
				.read_to_string(&mut buffer)
				.context("Failed to read from stdin")?;
			Ok(buffer)
		}
	}
}
