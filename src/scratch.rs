//! Process-scoped scratch files for staging archive entries and decompiler
//! output.
//!
//! Every file lives inside one temporary directory owned by the
//! [`ScratchSpace`]; dropping it (at session end) removes the directory and
//! everything staged into it. Individual files are never cleaned up on their
//! own, so a decompiled result stays readable for the rest of the session.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

#[derive(Debug)]
pub struct ScratchSpace {
    dir: TempDir,
}

impl ScratchSpace {
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("class-content-")
            .tempdir()?;
        Ok(Self { dir })
    }

    /// Creates a fresh, uniquely named, writable file inside the scratch
    /// directory. `extension` includes the leading dot (e.g. `".class"`).
    /// Safe to call from multiple threads; uniqueness is handled by tempfile.
    pub fn create_temp_file(&self, base_name: &str, extension: &str) -> io::Result<PathBuf> {
        let (file, path) = tempfile::Builder::new()
            .prefix(&format!("{base_name}-"))
            .suffix(extension)
            .tempfile_in(self.dir.path())?
            .keep()
            .map_err(|e| e.error)?;
        drop(file);
        Ok(path)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_files_are_unique_and_inside_the_scratch_dir() -> io::Result<()> {
        let scratch = ScratchSpace::new()?;
        let a = scratch.create_temp_file("Foo", ".class")?;
        let b = scratch.create_temp_file("Foo", ".class")?;

        assert_ne!(a, b);
        assert!(a.starts_with(scratch.path()));
        assert!(a.file_name().unwrap().to_string_lossy().starts_with("Foo-"));
        assert!(a.extension().is_some_and(|e| e == "class"));
        assert!(a.exists());
        Ok(())
    }

    #[test]
    fn dropping_the_scratch_space_removes_its_files() -> io::Result<()> {
        let scratch = ScratchSpace::new()?;
        let file = scratch.create_temp_file("Bar", ".java")?;
        let dir = scratch.path().to_path_buf();
        std::fs::write(&file, "class Bar {}")?;

        drop(scratch);
        assert!(!file.exists());
        assert!(!dir.exists());
        Ok(())
    }
}
