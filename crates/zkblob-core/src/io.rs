//! File helpers for circuits, proof artifacts and raw hex blobs.
//!
//! JSON and CBOR are picked by extension (case-insensitive). Unknown or
//! missing extensions are rejected for reads and default to JSON for writes.
//! Circuits are read-only here: they come from the Noir compiler.

use crate::{Circuit, ProofArtifact};
use anyhow::{anyhow, Context, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Ensure the parent directory for a file exists (no-op if none).
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating parent directory {}", display(path)))?;
        }
    }
    Ok(())
}

/// ------------------------------
/// Circuit
/// ------------------------------

/// Read a compiled circuit (`.json` compiler artifact or `.cbor`).
///
/// The ABI is validated after decoding.
pub fn read_circuit_auto<P: AsRef<Path>>(path: P) -> Result<Circuit> {
    let path_ref = path.as_ref();
    let c: Circuit = match ext_lower(path_ref).as_deref() {
        Some("json") => {
            let f = File::open(path_ref).with_context(|| format!("open {}", display(path_ref)))?;
            serde_json::from_reader(BufReader::new(f))
                .with_context(|| format!("deserialize JSON circuit {}", display(path_ref)))?
        }
        Some("cbor") => {
            let f = File::open(path_ref).with_context(|| format!("open {}", display(path_ref)))?;
            ciborium::de::from_reader(BufReader::new(f))
                .with_context(|| format!("deserialize CBOR circuit {}", display(path_ref)))?
        }
        Some(other) => {
            return Err(anyhow!(
                "unsupported circuit extension: {} (supported: .json, .cbor)",
                other
            ))
        }
        None => return Err(anyhow!("path has no extension (expected .json or .cbor)")),
    };
    c.validate()
        .with_context(|| format!("validating ABI of {}", display(path_ref)))?;
    Ok(c)
}

/// ------------------------------
/// ProofArtifact
/// ------------------------------

/// Read a `ProofArtifact` by extension.
pub fn read_proof_artifact_auto<P: AsRef<Path>>(path: P) -> Result<ProofArtifact> {
    let path_ref = path.as_ref();
    match ext_lower(path_ref).as_deref() {
        Some("json") => {
            let f = File::open(path_ref).with_context(|| format!("open {}", display(path_ref)))?;
            serde_json::from_reader(BufReader::new(f))
                .with_context(|| "deserialize JSON proof artifact")
        }
        Some("cbor") => {
            let f = File::open(path_ref).with_context(|| format!("open {}", display(path_ref)))?;
            ciborium::de::from_reader(BufReader::new(f))
                .with_context(|| "deserialize CBOR proof artifact")
        }
        Some(other) => Err(anyhow!(
            "unsupported proof extension: {} (supported: .json, .cbor)",
            other
        )),
        None => Err(anyhow!("path has no extension (expected .json or .cbor)")),
    }
}

/// Write a `ProofArtifact` (defaults to **JSON** if the extension is unknown).
pub fn write_proof_artifact_auto<P: AsRef<Path>>(path: P, v: &ProofArtifact) -> Result<()> {
    let path_ref = path.as_ref();
    ensure_parent_dir(path_ref)?;
    let f = File::create(path_ref).with_context(|| format!("create {}", display(path_ref)))?;
    let mut w = BufWriter::new(f);
    if ext_lower(path_ref).as_deref() == Some("cbor") {
        ciborium::ser::into_writer(v, &mut w).with_context(|| "serialize CBOR proof artifact")?;
    } else {
        serde_json::to_writer_pretty(&mut w, v).with_context(|| "serialize JSON proof artifact")?;
    }
    w.flush().with_context(|| format!("flush {}", display(path_ref)))?;
    Ok(())
}

/// ------------------------------
/// Raw hex
/// ------------------------------

/// Read a hex blob from a text file, trimming surrounding whitespace and an
/// optional `0x` prefix. Content is not validated here; the codec does that.
pub fn read_hex_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path_ref = path.as_ref();
    let raw =
        fs::read_to_string(path_ref).with_context(|| format!("read {}", display(path_ref)))?;
    let t = raw.trim();
    Ok(t.strip_prefix("0x").unwrap_or(t).to_owned())
}

/// Write a hex string followed by a newline.
pub fn write_hex_file<P: AsRef<Path>>(path: P, hex: &str) -> Result<()> {
    let path_ref = path.as_ref();
    ensure_parent_dir(path_ref)?;
    let mut f = File::create(path_ref).with_context(|| format!("create {}", display(path_ref)))?;
    writeln!(f, "{hex}").with_context(|| format!("write {}", display(path_ref)))?;
    Ok(())
}

/// Return the lowercase extension (without dot) if present.
fn ext_lower(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// Human-friendly path display for error messages.
fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
