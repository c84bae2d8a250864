//! Lookup of matching source archives for binary archives.
//!
//! The resolver asks this before probing: a `-sources.jar` next to the
//! binary JAR is authoritative and skips decompilation entirely.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Supplies the source-form archive for a binary archive, if one is known.
pub trait SourceArchiveProvider: Send + Sync {
    fn fetch_source_archive(&self, archive_path: &Path) -> Option<PathBuf>;
}

/// Probes the Maven repository convention: `demo-1.0.jar` has its sources in
/// a sibling `demo-1.0-sources.jar` (same for `.zip`).
#[derive(Debug, Default)]
pub struct SiblingSourceArchives;

impl SourceArchiveProvider for SiblingSourceArchives {
    fn fetch_source_archive(&self, archive_path: &Path) -> Option<PathBuf> {
        let file_name = archive_path.file_name()?.to_str()?;
        let (stem, ext) = file_name
            .strip_suffix(".jar")
            .map(|s| (s, "jar"))
            .or_else(|| file_name.strip_suffix(".zip").map(|s| (s, "zip")))?;
        if stem.ends_with("-sources") {
            return None;
        }

        let candidate = archive_path.with_file_name(format!("{stem}-sources.{ext}"));
        if candidate.is_file() {
            debug!(archive = %archive_path.display(), sources = %candidate.display(), "found matching source archive");
            Some(candidate)
        } else {
            None
        }
    }
}
