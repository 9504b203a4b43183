use anyhow::{anyhow, Context};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::grid::GridBounds;
use crate::store::{LayoutSnapshot, LayoutStore};

const MANIFEST_ENTRY: &str = "manifest.json";
pub const BUNDLE_FORMAT_V1: &str = "seating-layouts-v1";

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub bundle_format: String,
    pub layout_count: usize,
}

#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub imported: usize,
    /// Names already present in the target store (overwrite not requested).
    pub skipped: Vec<String>,
}

/// Export every snapshot in the store to a zip bundle: a manifest with
/// per-layout sha256 checksums plus one JSON entry per layout. The bundle is
/// written to a temporary name and renamed into place, so a failure partway
/// never leaves a truncated zip at `out_path`.
pub fn export_layout_bundle(
    store: &dyn LayoutStore,
    out_path: &Path,
) -> anyhow::Result<ExportSummary> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.to_string_lossy()))?;
    }
    let mut tmp_name = out_path.as_os_str().to_owned();
    tmp_name.push(".exporting");
    let tmp_path = std::path::PathBuf::from(tmp_name);
    if tmp_path.exists() {
        let _ = std::fs::remove_file(&tmp_path);
    }

    let layout_count = match write_bundle(store, &tmp_path) {
        Ok(count) => count,
        Err(e) => {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e);
        }
    };

    if out_path.exists() {
        std::fs::remove_file(out_path).with_context(|| {
            format!(
                "failed to remove existing bundle {}",
                out_path.to_string_lossy()
            )
        })?;
    }
    std::fs::rename(&tmp_path, out_path).with_context(|| {
        format!(
            "failed to move finished bundle to {}",
            out_path.to_string_lossy()
        )
    })?;

    Ok(ExportSummary {
        bundle_format: BUNDLE_FORMAT_V1.to_string(),
        layout_count,
    })
}

fn write_bundle(store: &dyn LayoutStore, tmp_path: &Path) -> anyhow::Result<usize> {
    let names = store
        .list()
        .map_err(|e| anyhow!("listing layouts failed: {e}"))?;

    let out_file = File::create(tmp_path).with_context(|| {
        format!(
            "failed to create output file {}",
            tmp_path.to_string_lossy()
        )
    })?;
    let mut zip = ZipWriter::new(out_file);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut layout_index = Vec::new();
    let mut bodies = Vec::new();
    for (i, name) in names.iter().enumerate() {
        let body = store
            .get(name)
            .map_err(|e| anyhow!("reading layout {name:?} failed: {e}"))?
            .ok_or_else(|| anyhow!("layout {name:?} disappeared during export"))?;
        let entry = format!("layouts/{i:04}.json");
        let digest = format!("{:x}", Sha256::digest(body.as_bytes()));
        layout_index.push(json!({
            "name": name,
            "entry": entry,
            "sha256": digest,
        }));
        bodies.push((entry, body));
    }

    let manifest = json!({
        "format": BUNDLE_FORMAT_V1,
        "version": 1,
        "appVersion": env!("CARGO_PKG_VERSION"),
        "exportedAt": chrono::Utc::now().to_rfc3339(),
        "layouts": layout_index,
    });
    zip.start_file(MANIFEST_ENTRY, opts)
        .context("failed to start manifest entry")?;
    zip.write_all(
        serde_json::to_string_pretty(&manifest)
            .context("failed to serialize manifest")?
            .as_bytes(),
    )
    .context("failed to write manifest entry")?;

    for (entry, body) in &bodies {
        zip.start_file(entry.as_str(), opts)
            .with_context(|| format!("failed to start entry {entry}"))?;
        zip.write_all(body.as_bytes())
            .with_context(|| format!("failed to write entry {entry}"))?;
    }
    zip.finish().context("failed to finalize zip bundle")?;

    Ok(names.len())
}

/// Import a bundle produced by `export_layout_bundle`. Each entry is checksum
/// verified and parsed against the importing host's grid bounds before
/// anything is written, so a bundle declaring absurd dimensions is rejected
/// instead of allocated; layouts whose names are already taken are skipped
/// unless `overwrite` is set.
pub fn import_layout_bundle(
    store: &mut dyn LayoutStore,
    in_path: &Path,
    overwrite: bool,
    bounds: GridBounds,
) -> anyhow::Result<ImportSummary> {
    let in_file = File::open(in_path)
        .with_context(|| format!("failed to open bundle {}", in_path.to_string_lossy()))?;
    let mut archive = ZipArchive::new(in_file).context("invalid zip archive")?;

    let mut manifest_text = String::new();
    archive
        .by_name(MANIFEST_ENTRY)
        .context("bundle missing manifest.json")?
        .read_to_string(&mut manifest_text)
        .context("failed to read manifest.json")?;
    let manifest: serde_json::Value =
        serde_json::from_str(&manifest_text).context("manifest.json is invalid JSON")?;
    let format = manifest
        .get("format")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    if format != BUNDLE_FORMAT_V1 {
        return Err(anyhow!("unsupported bundle format: {}", format));
    }
    let layouts = manifest
        .get("layouts")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    // Parse and verify everything first so a bad entry rejects the bundle
    // before the store is touched.
    let mut pending: Vec<(String, String)> = Vec::new();
    for item in &layouts {
        let name = item
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("manifest layout entry missing name"))?;
        let entry = item
            .get("entry")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("manifest layout {name:?} missing entry"))?;
        let expected_sha = item
            .get("sha256")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("manifest layout {name:?} missing sha256"))?;

        let mut body = String::new();
        archive
            .by_name(entry)
            .with_context(|| format!("bundle missing entry {entry}"))?
            .read_to_string(&mut body)
            .with_context(|| format!("failed to read entry {entry}"))?;
        let digest = format!("{:x}", Sha256::digest(body.as_bytes()));
        if digest != expected_sha {
            return Err(anyhow!("checksum mismatch for layout {name:?}"));
        }
        LayoutSnapshot::from_json(&body, bounds)
            .map_err(|e| anyhow!("layout {name:?} is malformed: {e}"))?;
        pending.push((name.to_string(), body));
    }

    let mut imported = 0usize;
    let mut skipped = Vec::new();
    for (name, body) in pending {
        let taken = store
            .get(&name)
            .map_err(|e| anyhow!("reading layout {name:?} failed: {e}"))?
            .is_some();
        if taken && !overwrite {
            skipped.push(name);
            continue;
        }
        store
            .set(&name, &body)
            .map_err(|e| anyhow!("writing layout {name:?} failed: {e}"))?;
        imported += 1;
    }

    tracing::info!(imported, skipped = skipped.len(), "layout bundle imported");
    Ok(ImportSummary { imported, skipped })
}
