//! Simulation trace decoding and CSV export
//!
//! An external harness drives the oracle across a simulated series of blocks
//! and emits an ABI-encoded `(uint256,uint256,uint256,uint256)[]` blob: one
//! row per observation with the reserve index, the previous value, the
//! proposed value and the capped value. This module decodes the blob and
//! exports it as CSV for offline analysis.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ethereum_types::U256;

/// One decoded trace row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRow {
    /// Reserve index (0 or 1)
    pub j: U256,
    /// Value before the update
    pub prev: U256,
    /// Proposed value
    pub curr: U256,
    /// Accepted (capped) value
    pub capped: U256,
}

fn parse_words(data: &str) -> Result<Vec<U256>> {
    let hex = data.strip_prefix("0x").unwrap_or(data);
    if hex.len() % 64 != 0 {
        bail!(
            "trace data length {} is not a whole number of 256-bit words",
            hex.len()
        );
    }
    let mut words = Vec::with_capacity(hex.len() / 64);
    for (idx, chunk) in hex.as_bytes().chunks(64).enumerate() {
        let chunk = std::str::from_utf8(chunk).context("trace data is not ASCII hex")?;
        let word = U256::from_str_radix(chunk, 16)
            .map_err(|e| anyhow::anyhow!("word {idx} is not valid hex: {e}"))?;
        words.push(word);
    }
    Ok(words)
}

/// Decodes an ABI-encoded dynamic array of static 4-tuples.
///
/// Head/tail layout: one offset word (must be 0x20 for a single top-level
/// value), the array length, then `len` rows of four words each.
pub fn decode_trace(data: &str) -> Result<Vec<TraceRow>> {
    let words = parse_words(data)?;
    if words.len() < 2 {
        bail!("trace data too short: {} words", words.len());
    }
    if words[0] != U256::from(0x20) {
        bail!("unexpected ABI head offset {}", words[0]);
    }
    let len = words[1];
    if len > U256::from(u32::MAX) {
        bail!("implausible trace length {len}");
    }
    let len = len.as_usize();
    let expected = 2 + 4 * len;
    if words.len() != expected {
        bail!(
            "trace data has {} words, expected {} for {} rows",
            words.len(),
            expected,
            len
        );
    }
    let rows = words[2..]
        .chunks(4)
        .map(|row| TraceRow {
            j: row[0],
            prev: row[1],
            curr: row[2],
            capped: row[3],
        })
        .collect();
    Ok(rows)
}

/// Writes rows as `<out_dir>/<name>.csv` with a `j,prev,curr,capped` header.
/// Returns the written path.
pub fn export_csv(rows: &[TraceRow], out_dir: &Path, name: &str) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    let path = out_dir.join(format!("{name}.csv"));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("opening {}", path.display()))?;
    writer.write_record(["j", "prev", "curr", "capped"])?;
    for row in rows {
        writer.write_record([
            row.j.to_string(),
            row.prev.to_string(),
            row.curr.to_string(),
            row.capped.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(path)
}
