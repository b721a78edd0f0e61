//! Catalog of the published pages, one output root relative path per line.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use log::{info, warn};

use crate::{
    PublishError,
    config::{CatalogAction, CatalogDeclaration, CatalogStrategy},
    path_extension::PathExtension,
    sitetree::SiteTree,
};

/// Fresh entries of `catalog`, relative to `output_root` and sorted
fn fresh_entries(
    catalog: &CatalogDeclaration,
    tree: &SiteTree,
    output_root: &Path,
) -> Result<BTreeSet<String>, PublishError> {
    let mut entries = BTreeSet::new();
    match catalog.strategy {
        CatalogStrategy::PublishOutput => {
            for id in tree.published() {
                if let Some(output) = &tree[id].output {
                    entries.insert(output.relative_from(output_root));
                }
            }
        }
        CatalogStrategy::ScanFolder => {
            let folder = catalog.folder.as_deref().unwrap_or(output_root);
            for path in scan_html(folder)? {
                entries.insert(path.relative_from(output_root));
            }
        }
    }
    Ok(entries)
}

fn scan_html(folder: &Path) -> Result<Vec<PathBuf>, PublishError> {
    // the folder itself may contain glob meta characters like `[`
    let pattern = Path::new(&glob::Pattern::escape(&folder.to_string_lossy()))
        .join("**")
        .join("*.html");
    let mut files = vec![];
    for entry in glob::glob(&pattern.to_string_lossy())? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => warn!("Skipping unreadable path while scanning {folder:?}: {e}"),
        }
    }
    Ok(files)
}

fn existing_entries(file: &Path) -> Result<BTreeSet<String>, PublishError> {
    if !file.exists() {
        return Ok(BTreeSet::new());
    }
    let content = fs::read_to_string(file)
        .map_err(|e| PublishError::from(e).with_context(file.to_string_lossy()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect())
}

fn write_entries(file: &Path, entries: &BTreeSet<String>) -> Result<(), PublishError> {
    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| PublishError::from(e).with_context(parent.to_string_lossy()))?;
    }
    let content = entries.iter().map(String::as_str).collect::<Vec<_>>().join("\n");
    info!("Writing catalog {file:?} with {} entries", entries.len());
    fs::write(file, content).map_err(|e| PublishError::from(e).with_context(file.to_string_lossy()))
}

/// Write the catalog described by `catalog` after publishing `tree` to `output_root`
pub fn write_catalog(
    catalog: &CatalogDeclaration,
    tree: &SiteTree,
    output_root: &Path,
) -> Result<(), PublishError> {
    let file = catalog
        .output_file
        .as_deref()
        .ok_or(PublishError::config("A catalog requires an output file"))?;
    let fresh = fresh_entries(catalog, tree, output_root)?;

    match catalog.action {
        CatalogAction::ReplaceExisting => write_entries(file, &fresh),
        CatalogAction::MergeSilently => {
            let mut entries = existing_entries(file)?;
            entries.extend(fresh);
            write_entries(file, &entries)
        }
        CatalogAction::MergeAndFailIfAbsent => {
            let existing = existing_entries(file)?;
            let missing: Vec<&str> = fresh
                .iter()
                .filter(|entry| !existing.contains(*entry))
                .map(String::as_str)
                .collect();
            let message = (!missing.is_empty()).then(|| {
                format!(
                    "The output file {} should contain following entries:\n{}",
                    file.to_string_lossy(),
                    missing.join("\n")
                )
            });
            let mut entries = existing;
            entries.extend(fresh.iter().cloned());
            write_entries(file, &entries)?;
            match message {
                Some(message) => Err(PublishError::catalog(message)),
                None => Ok(()),
            }
        }
    }
}
