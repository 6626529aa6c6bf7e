//! Hex parsing helpers shared by the subcommand handlers.

use anyhow::{bail, Context};

/// Parse a 64-character hex string (optionally `0x`-prefixed) into 32 bytes.
pub(crate) fn parse_hex32(input: &str, what: &str) -> anyhow::Result<[u8; 32]> {
    let hex = input.trim().trim_start_matches("0x");
    if hex.len() != 64 {
        bail!("{what} must be 64 hex chars, got {}", hex.len());
    }
    let mut out = [0u8; 32];
    for (i, chunk) in out.iter_mut().enumerate() {
        *chunk = u8::from_str_radix(&hex[2 * i..2 * i + 2], 16)
            .with_context(|| format!("invalid hex in {what} at position {}", 2 * i))?;
    }
    Ok(out)
}
