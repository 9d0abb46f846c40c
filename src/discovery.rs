//! Discovery Module
//!
//! Recursively scans a project for connection files (`*.figma.tsx` and friends).

use std::path::Path;
use walkdir::{DirEntry, WalkDir};

use crate::error::ConnectError;

pub const CONNECTION_FILE_SUFFIXES: [&str; 4] = [".figma.tsx", ".figma.ts", ".figma.jsx", ".figma.js"];

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name == "node_modules" || name.starts_with('.')
}

pub fn is_connection_file(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    CONNECTION_FILE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Finds every connection file under `dir`, as sorted paths relative to `dir`.
pub fn find_connection_files(dir: &Path) -> Result<Vec<String>, ConnectError> {
    let mut files = Vec::new();
    if !dir.exists() {
        return Ok(files);
    }

    for entry in WalkDir::new(dir).follow_links(true).into_iter().filter_entry(|e| !is_skipped_dir(e)) {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| dir.display().to_string());
            ConnectError::io(path, e.into())
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && is_connection_file(path) {
            let relative = path.strip_prefix(dir).unwrap_or(path);
            files.push(relative.to_string_lossy().replace('\\', "/"));
        }
    }

    files.sort();
    tracing::debug!(dir = %dir.display(), count = files.len(), "discovered connection files");
    Ok(files)
}
