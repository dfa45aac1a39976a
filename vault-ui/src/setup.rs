//! Contract setup check
//!
//! Verifies the deployment outputs exist and parse before the UI is served.

use std::io::Write;

use vault_client::{ContractConfig, ContractFiles};

/// Load both files (pre-flight included) and report them to `out`
///
/// The ABI is echoed as the document on disk, not as re-serialised entries.
pub fn check(files: &ContractFiles, out: &mut impl Write) -> anyhow::Result<ContractConfig> {
    let config = files.load()?;

    writeln!(out, "Contract Address: {}", config.address)?;
    writeln!(out, "ABI: {}", config.abi.to_json_pretty()?)?;
    writeln!(out, "Setup complete!")?;

    Ok(config)
}
