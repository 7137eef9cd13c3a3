mod batch;
mod compute;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use vorodesc::{BaseStructure, DescriptorConfig};

use crate::cli::{Command, DescriptorOptions};

pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Compute(args) => compute::run(args),
        Command::Batch(args) => batch::run(args),
    }
}

/// Builds a descriptor configuration from the shared CLI options.
fn build_config(options: &DescriptorOptions) -> Result<DescriptorConfig> {
    let properties = options
        .properties
        .as_ref()
        .map(|path| {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read property table {}", path.display()))
        })
        .transpose()?;
    let base = match &options.base {
        Some(path) => BaseStructure::Reference(
            vorodesc::io::read_structure(path)
                .with_context(|| format!("Failed to read base structure {}", path.display()))?,
        ),
        None => BaseStructure::Pure,
    };
    Ok(DescriptorConfig {
        base,
        cutoff: options.cutoff,
        properties,
    })
}

/// Writes a descriptor as CSV, one value per line, full precision.
fn write_descriptor(path: Option<&Path>, descriptor: &[f64]) -> Result<()> {
    let mut text = String::with_capacity(descriptor.len() * 24);
    for value in descriptor {
        // Shortest round-trip formatting keeps the output exact.
        text.push_str(&format!("{value}\n"));
    }
    match path {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{text}"),
    }
    Ok(())
}
