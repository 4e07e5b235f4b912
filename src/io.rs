//! Safetensors I/O for epoch tables.
//!
//! Layout: 8-byte little-endian header length, JSON header, raw payload.
//! Every column is a 1-D tensor of shape `[n_rows]`:
//!
//! ```text
//!   "epoch_id": { "dtype": "I64", "shape": [N], "data_offsets": [0, 8N] }
//!   "time":     { "dtype": "I64", "shape": [N], "data_offsets": [8N, 16N] }
//!   "MiPf":     { "dtype": "F64", "shape": [N], "data_offsets": [16N, 24N] }
//! ```
//!
//! Column order is stored newline-joined under `__metadata__.columns`; files
//! without it fall back to data offset order. `I32`/`F32` tensors are widened
//! on read.
use anyhow::{bail, ensure, Context, Result};
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use crate::config::EpochsConfig;
use crate::qc::validate_schema;
use crate::table::{Column, EpochsTable};

// ── Low-level safetensors parser ──────────────────────────────────────────────

fn parse_header(bytes: &[u8]) -> Result<(HashMap<String, serde_json::Value>, usize)> {
    if bytes.len() < 8 {
        bail!("safetensors file too small");
    }
    let n = u64::from_le_bytes(bytes[..8].try_into()?) as usize;
    ensure!(
        n.checked_add(8).is_some_and(|end| end <= bytes.len()),
        "safetensors header length {n} exceeds file size"
    );
    let header: HashMap<String, serde_json::Value> =
        serde_json::from_slice(&bytes[8..8 + n]).context("failed to parse safetensors header")?;
    Ok((header, 8 + n))
}

fn offsets_of(name: &str, entry: &serde_json::Value) -> Result<(usize, usize)> {
    let offsets = entry["data_offsets"]
        .as_array()
        .with_context(|| format!("{name}: missing data_offsets"))?;
    ensure!(offsets.len() == 2, "{name}: data_offsets must have two entries");
    let s = offsets[0].as_u64().with_context(|| format!("{name}: bad offset"))? as usize;
    let e = offsets[1].as_u64().with_context(|| format!("{name}: bad offset"))? as usize;
    ensure!(s <= e, "{name}: data_offsets out of order");
    Ok((s, e))
}

fn read_column(name: &str, entry: &serde_json::Value, raw: &[u8]) -> Result<Column> {
    let shape = entry["shape"]
        .as_array()
        .with_context(|| format!("{name}: missing shape"))?;
    ensure!(shape.len() == 1, "{name}: expected a 1-D tensor, got shape {shape:?}");
    let dtype = entry["dtype"]
        .as_str()
        .with_context(|| format!("{name}: missing dtype"))?;

    let column = match dtype {
        "I64" => Column::from(
            raw.chunks_exact(8)
                .map(|b| i64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
                .collect::<Vec<_>>(),
        ),
        "I32" => Column::from(
            raw.chunks_exact(4)
                .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]) as i64)
                .collect::<Vec<_>>(),
        ),
        "F64" => Column::from(
            raw.chunks_exact(8)
                .map(|b| f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
                .collect::<Vec<_>>(),
        ),
        "F32" => Column::from(
            raw.chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64)
                .collect::<Vec<_>>(),
        ),
        other => bail!("{name}: unsupported dtype {other}"),
    };
    let expected = shape[0].as_u64().unwrap_or(u64::MAX) as usize;
    ensure!(
        column.len() == expected,
        "{name}: shape says {expected} rows, payload holds {}",
        column.len()
    );
    Ok(column)
}

impl EpochsTable {
    /// Parse a table from safetensors bytes.
    pub fn from_safetensors(bytes: &[u8]) -> Result<Self> {
        let (header, data_start) = parse_header(bytes)?;

        let mut entries: Vec<(usize, usize, &String, &serde_json::Value)> = Vec::new();
        for (name, entry) in &header {
            if name == "__metadata__" {
                continue;
            }
            let (s, e) = offsets_of(name, entry)?;
            entries.push((s, e, name, entry));
        }
        let order: Vec<&str> = header
            .get("__metadata__")
            .and_then(|m| m["columns"].as_str())
            .map(|names| names.split('\n').collect())
            .unwrap_or_default();
        entries.sort_by_key(|&(s, _, name, _)| {
            let pos = order.iter().position(|n| *n == name.as_str()).unwrap_or(usize::MAX);
            (pos, s, name.clone())
        });

        let mut table = EpochsTable::new();
        for (s, e, name, entry) in entries {
            let raw = data_start
                .checked_add(e)
                .and_then(|end| bytes.get(data_start + s..end))
                .with_context(|| format!("{name}: data_offsets past end of file"))?;
            let column = read_column(name, entry, raw)?;
            table.push_column(name.clone(), column)?;
        }
        Ok(table)
    }

    /// Encode the table as safetensors bytes.
    pub fn to_safetensors(&self) -> Result<Vec<u8>> {
        let mut header_map = serde_json::Map::new();
        let mut payload: Vec<u8> = Vec::new();
        for (name, column) in self.columns() {
            ensure!(
                name != "__metadata__" && !header_map.contains_key(name),
                "column {name} cannot be stored: duplicate or reserved name"
            );
            let start = payload.len();
            let dtype = match column {
                Column::Int(a) => {
                    payload.extend(a.iter().flat_map(|v| v.to_le_bytes()));
                    "I64"
                }
                Column::Float(a) => {
                    payload.extend(a.iter().flat_map(|v| v.to_le_bytes()));
                    "F64"
                }
            };
            header_map.insert(name.to_string(), serde_json::json!({
                "dtype": dtype,
                "shape": [column.len()],
                "data_offsets": [start, payload.len()],
            }));
        }

        let names: Vec<&str> = self.column_names().collect();
        header_map.insert(
            "__metadata__".to_string(),
            serde_json::json!({ "columns": names.join("\n") }),
        );

        let hdr_bytes = serde_json::to_vec(&header_map)?;
        let pad = (8 - hdr_bytes.len() % 8) % 8;
        let mut out = Vec::with_capacity(8 + hdr_bytes.len() + pad + payload.len());
        out.extend_from_slice(&((hdr_bytes.len() + pad) as u64).to_le_bytes());
        out.extend_from_slice(&hdr_bytes);
        out.extend(std::iter::repeat(b' ').take(pad));
        out.extend_from_slice(&payload);
        Ok(out)
    }

    /// Read a table written by [`EpochsTable::save`]. No QC is applied.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_safetensors(&bytes).with_context(|| format!("parsing {}", path.display()))
    }

    /// [`EpochsTable::load`] followed by the key-column schema check.
    pub fn load_checked(path: &Path, cfg: &EpochsConfig) -> Result<Self> {
        let table = Self::load(path)?;
        validate_schema(&table, cfg)?;
        Ok(table)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_safetensors()?;
        let mut f = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        f.write_all(&bytes)?;
        Ok(())
    }
}
