use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use vorodesc::descriptor::{load_properties, DescriptorEngine};

use crate::cli::BatchArgs;

use super::{build_config, write_descriptor};

pub fn run(args: BatchArgs) -> Result<()> {
    let mut inputs: Vec<PathBuf> = fs::read_dir(&args.input)
        .with_context(|| format!("Failed to read directory {}", args.input.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    if inputs.is_empty() {
        bail!("No .json structure files in {}", args.input.display());
    }
    inputs.sort();

    let output_dir = args.output.clone().unwrap_or_else(|| args.input.clone());
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let config = build_config(&args.descriptor)?;
    // One engine for the whole batch; the property table parses once.
    let table = load_properties(config.properties.as_deref())?;
    let engine = DescriptorEngine::with_cutoff(table, config.cutoff);

    let progress = if args.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(inputs.len() as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}] {msg}",
            )
            .expect("valid progress template"),
        );
        bar
    };

    for input in &inputs {
        progress.set_message(
            input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
        let structure = vorodesc::io::read_structure(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;
        let descriptor = engine
            .compute(&structure, &config.base)
            .with_context(|| format!("Descriptor computation failed for {}", input.display()))?;
        let output = output_dir.join(input.file_stem().unwrap_or_default()).with_extension("csv");
        write_descriptor(Some(&output), &descriptor)?;
        progress.inc(1);
    }
    progress.finish_with_message("done");
    Ok(())
}
