// SPDX-License-Identifier: PMPL-1.0-or-later
//! Directory scanner for running accessibility analysis across a project.
//!
//! Walks directory trees, identifies markup files, and runs the rule registry
//! over each one independently.

use crate::error::Result;
use crate::issue::Issue;
use crate::rules::{RuleFailure, RuleRegistry, Syntax};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

/// File extensions to scan
const SCANNABLE_EXTENSIONS: &[&str] = &["html", "htm", "xhtml", "jsx", "tsx", "svelte", "vue"];

/// Directories to skip
const SKIP_DIRS: &[&str] = &[
    "node_modules", ".git", "target", "dist", "build",
    "_build", "vendor", ".next", ".nuxt", "coverage",
];

/// Analysis result for one file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub issues: Vec<Issue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<RuleFailure>,
}

impl FileReport {
    pub fn fixable(&self) -> usize {
        self.issues.iter().filter(|i| i.is_fixable()).count()
    }
}

/// Whether `path` has an extension the scanner handles
pub fn is_scannable(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SCANNABLE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Scan a directory for accessibility issues
pub fn scan_directory(dir: &Path, registry: &RuleRegistry) -> Result<Vec<FileReport>> {
    let mut reports = Vec::new();

    info!("Scanning directory: {}", dir.display());

    for entry in WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            // Skip hidden and excluded directories below the root
            let name = e.file_name().to_str().unwrap_or("");
            if e.depth() > 0 && e.file_type().is_dir() {
                return !SKIP_DIRS.contains(&name) && !name.starts_with('.');
            }
            true
        })
    {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };

        if !entry.file_type().is_file() || !is_scannable(entry.path()) {
            continue;
        }

        match scan_file(entry.path(), registry) {
            Ok(report) => reports.push(report),
            Err(e) => info!("Skipping {}: {}", entry.path().display(), e),
        }
    }

    let issues: usize = reports.iter().map(|r| r.issues.len()).sum();
    info!("Scanned {} files, found {} issues", reports.len(), issues);

    Ok(reports)
}

/// Scan a single file for accessibility issues; `.jsx` and `.tsx` files are
/// analyzed as JSX
pub fn scan_file(path: &Path, registry: &RuleRegistry) -> Result<FileReport> {
    let content = std::fs::read_to_string(path)?;
    let analysis = registry.run_as(&content, Syntax::from_path(path));
    Ok(FileReport {
        path: path.to_path_buf(),
        issues: analysis.issues,
        failures: analysis.failures,
    })
}
