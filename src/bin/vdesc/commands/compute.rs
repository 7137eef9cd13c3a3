use anyhow::{Context, Result};

use vorodesc::compute_descriptor;

use crate::cli::ComputeArgs;

use super::{build_config, write_descriptor};

pub fn run(args: ComputeArgs) -> Result<()> {
    let structure = vorodesc::io::read_structure(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let config = build_config(&args.descriptor)?;
    let descriptor = compute_descriptor(&structure, &config)
        .with_context(|| format!("Descriptor computation failed for {}", args.input.display()))?;
    write_descriptor(args.output.as_deref(), &descriptor)
}
