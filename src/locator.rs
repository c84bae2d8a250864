//! Locators for class files living inside compiled or source archives.
//!
//! A [`ClassLocator`] identifies either an entry inside a JAR/ZIP archive or
//! a loose file on disk. Locators are immutable; the `with_*` operations
//! derive new values (sibling extension, source-archive flag, different
//! archive) and always recompute the file extension from the entry path.
//!
//! The canonical string form doubles as the cache key and as the locator
//! handed back to callers:
//!
//! - `jar:<archive>!/<entry>`    entry inside a binary archive
//! - `srcjar:<archive>!/<entry>` entry inside a source archive
//! - `file:<path>`               loose file, no archive
//!
//! `!/` is the reserved separator between the archive path and the entry
//! path. Nested archives are not supported; `!!/` stays reserved for them.

use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use memmap2::Mmap;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::ContentError;
use crate::scratch::ScratchSpace;

/// The closed set of file forms a class symbol can be stored under.
///
/// Anything that is not a compiled class or Java source is treated as Kotlin
/// source; that keeps the "as given" probe meaningful for entries whose
/// extension the resolver has never heard of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileExtension {
    Class,
    Java,
    Kotlin,
}

impl FileExtension {
    pub fn from_entry(entry: &str) -> Self {
        match Path::new(entry).extension().and_then(|e| e.to_str()) {
            Some("class") => FileExtension::Class,
            Some("java") => FileExtension::Java,
            _ => FileExtension::Kotlin,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileExtension::Class => "class",
            FileExtension::Java => "java",
            FileExtension::Kotlin => "kt",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassLocator {
    archive_path: Option<PathBuf>,
    entry_path: String,
    source: bool,
    extension: FileExtension,
}

impl ClassLocator {
    pub fn for_archive_entry(
        archive: impl Into<PathBuf>,
        entry: impl Into<String>,
        source: bool,
    ) -> Self {
        let entry_path = entry.into();
        let extension = FileExtension::from_entry(&entry_path);
        Self {
            archive_path: Some(archive.into()),
            entry_path,
            source,
            extension,
        }
    }

    /// Locator for a loose file on disk. A loose file is already its own
    /// source, so the source-archive flag is pinned to `false`.
    pub fn for_file(path: impl Into<String>) -> Self {
        let entry_path = path.into();
        let extension = FileExtension::from_entry(&entry_path);
        Self {
            archive_path: None,
            entry_path,
            source: false,
            extension,
        }
    }

    pub fn archive_path(&self) -> Option<&Path> {
        self.archive_path.as_deref()
    }

    pub fn entry_path(&self) -> &str {
        &self.entry_path
    }

    /// True when the archive (if any) holds human-readable sources rather
    /// than compiled classes.
    pub fn is_source_archive(&self) -> bool {
        self.source
    }

    /// True when the locator denotes a plain filesystem file, not an
    /// archive entry. Local locators are never upgraded to a source archive.
    pub fn is_local(&self) -> bool {
        self.archive_path.is_none()
    }

    pub fn extension(&self) -> FileExtension {
        self.extension
    }

    /// Base name of the entry without its extension, for scratch file naming.
    pub fn file_stem(&self) -> String {
        Path::new(&self.entry_path)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "entry".to_string())
    }

    pub fn with_file_extension(&self, extension: FileExtension) -> Self {
        let entry_path = Path::new(&self.entry_path)
            .with_extension(extension.as_str())
            .to_string_lossy()
            .into_owned();
        Self {
            archive_path: self.archive_path.clone(),
            entry_path,
            source: self.source,
            extension,
        }
    }

    pub fn with_source(&self, source: bool) -> Self {
        Self {
            source: source && self.archive_path.is_some(),
            ..self.clone()
        }
    }

    pub fn with_archive_path(&self, archive: impl Into<PathBuf>) -> Self {
        Self {
            archive_path: Some(archive.into()),
            ..self.clone()
        }
    }

    /// Reads the text at this locator.
    ///
    /// Returns `Ok(None)` when the backing archive, entry or file does not
    /// exist; that is the signal the resolver's fallback search runs on.
    /// Corrupt archives and other I/O failures are real errors.
    pub fn read_contents(&self) -> Result<Option<String>, ContentError> {
        Ok(self
            .read_entry_bytes()?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }

    /// Copies this locator's raw bytes into a fresh scratch file and returns
    /// its path. Used to stage compiled classes for the decompiler. Returns
    /// `Ok(None)` when the entry does not exist.
    pub fn extract_to_scratch_file(
        &self,
        scratch: &ScratchSpace,
    ) -> Result<Option<PathBuf>, ContentError> {
        let Some(bytes) = self.read_entry_bytes()? else {
            return Ok(None);
        };
        let suffix = format!(".{}", self.extension.as_str());
        let staged = scratch.create_temp_file(&self.file_stem(), &suffix)?;
        std::fs::write(&staged, bytes)?;
        Ok(Some(staged))
    }

    fn read_entry_bytes(&self) -> Result<Option<Vec<u8>>, ContentError> {
        let Some(archive_path) = &self.archive_path else {
            return match std::fs::read(&self.entry_path) {
                Ok(bytes) => Ok(Some(bytes)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            };
        };

        let file = match File::open(archive_path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mmap = unsafe { Mmap::map(&file)? };
        let mut archive =
            ZipArchive::new(Cursor::new(&mmap[..])).map_err(|e| ContentError::Archive {
                path: archive_path.clone(),
                source: e,
            })?;

        let mut entry = match archive.by_name(&self.entry_path) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => {
                return Err(ContentError::Archive {
                    path: archive_path.clone(),
                    source: e,
                });
            }
        };

        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        Ok(Some(bytes))
    }
}

impl fmt::Display for ClassLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.archive_path {
            Some(archive) => {
                let scheme = if self.source { "srcjar" } else { "jar" };
                write!(f, "{scheme}:{}!/{}", archive.display(), self.entry_path)
            }
            None => write!(f, "file:{}", self.entry_path),
        }
    }
}

impl FromStr for ClassLocator {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix("srcjar:") {
            parse_archive_locator(s, rest, true)
        } else if let Some(rest) = s.strip_prefix("jar:") {
            parse_archive_locator(s, rest, false)
        } else if let Some(rest) = s.strip_prefix("file:") {
            if rest.is_empty() {
                return Err(ContentError::InvalidLocator(s.to_string()));
            }
            Ok(ClassLocator::for_file(rest))
        } else {
            Err(ContentError::InvalidLocator(s.to_string()))
        }
    }
}

fn parse_archive_locator(
    original: &str,
    rest: &str,
    source: bool,
) -> Result<ClassLocator, ContentError> {
    let Some((archive, entry)) = rest.split_once("!/") else {
        return Err(ContentError::InvalidLocator(original.to_string()));
    };
    if archive.is_empty() || entry.is_empty() {
        return Err(ContentError::InvalidLocator(original.to_string()));
    }
    Ok(ClassLocator::for_archive_entry(archive, entry, source))
}
