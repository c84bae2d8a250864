//! Decompiler integration.
//!
//! The resolver only depends on the [`Decompiler`] trait: a file holding one
//! compiled class's bytes goes in, a freshly written file with approximate
//! source text comes out. [`CfrDecompiler`] is the CFR-backed implementation;
//! other backends plug in behind the same trait.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::ContentError;
use crate::scratch::ScratchSpace;

pub trait Decompiler: Send + Sync {
    /// Decompiles the single class contained in `class_file` and returns the
    /// path of a newly created file with the generated source text.
    /// Failures propagate; a class that was found but cannot be rendered is
    /// not a miss.
    fn decompile_class(
        &self,
        class_file: &Path,
        scratch: &ScratchSpace,
    ) -> Result<PathBuf, ContentError>;
}

fn java_command(args: &[&str]) -> Result<std::process::Output, ContentError> {
    let java_bin = std::env::var("CLASS_CONTENT_JAVA").unwrap_or_else(|_| "java".to_string());

    #[cfg(windows)]
    {
        let lower = java_bin.to_ascii_lowercase();
        if lower.ends_with(".cmd") || lower.ends_with(".bat") {
            return Command::new("cmd")
                .arg("/C")
                .arg(&java_bin)
                .args(args)
                .output()
                .map_err(|e| {
                    ContentError::Decompile(format!(
                        "failed to execute java (ensure JRE/JDK is installed): {e}"
                    ))
                });
        }
    }

    Command::new(&java_bin).args(args).output().map_err(|e| {
        ContentError::Decompile(format!(
            "failed to execute java (ensure JRE/JDK is installed): {e}"
        ))
    })
}

#[derive(Debug, Clone)]
pub struct CfrDecompiler {
    cfr_jar: PathBuf,
}

impl CfrDecompiler {
    pub fn new(cfr_jar: PathBuf) -> Self {
        Self { cfr_jar }
    }
}

impl Decompiler for CfrDecompiler {
    fn decompile_class(
        &self,
        class_file: &Path,
        scratch: &ScratchSpace,
    ) -> Result<PathBuf, ContentError> {
        debug!(class_file = %class_file.display(), "decompiling with CFR");

        let cfr_jar = self
            .cfr_jar
            .to_str()
            .ok_or_else(|| ContentError::Decompile("cfr.jar path is not valid UTF-8".into()))?;
        let class_file_arg = class_file
            .to_str()
            .ok_or_else(|| ContentError::Decompile("class file path is not valid UTF-8".into()))?;

        let output = java_command(&[
            "-jar",
            cfr_jar,
            class_file_arg,
            "--silent",
            "true",
            "--comments",
            "false",
        ])?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ContentError::Decompile(format!(
                "CFR failed: {}",
                stderr.trim()
            )));
        }

        let stem = class_file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "decompiled".to_string());
        let out_path = scratch.create_temp_file(&stem, ".java")?;
        std::fs::write(&out_path, &output.stdout)?;
        Ok(out_path)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::{Mutex, OnceLock};

    fn java_env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    fn make_executable(path: &Path) -> std::io::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(path, perms)
    }

    #[test]
    fn decompile_class_writes_cfr_stdout_to_a_scratch_file() {
        let _guard = java_env_lock().lock().expect("java env test lock poisoned");
        let dir = tempfile::tempdir().unwrap();
        let fake_cfr = dir.path().join("cfr.jar");
        let class_file = dir.path().join("Demo.class");
        let fake_java = dir.path().join("java");
        fs::write(&fake_cfr, "stub").unwrap();
        fs::write(&class_file, "stub").unwrap();
        fs::write(
            &fake_java,
            r#"#!/bin/sh
cat <<'EOF'
package org.example;

public class Demo {
}
EOF
"#,
        )
        .unwrap();
        make_executable(&fake_java).unwrap();

        // SAFETY: Guarded by java_env_lock and removed before returning.
        unsafe { std::env::set_var("CLASS_CONTENT_JAVA", &fake_java) };

        let scratch = ScratchSpace::new().unwrap();
        let decompiler = CfrDecompiler::new(fake_cfr);
        let result = decompiler.decompile_class(&class_file, &scratch);

        // SAFETY: Guarded by java_env_lock.
        unsafe { std::env::remove_var("CLASS_CONTENT_JAVA") };

        let out = result.unwrap();
        assert!(out.starts_with(scratch.path()));
        assert!(out.file_name().unwrap().to_string_lossy().starts_with("Demo-"));
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.contains("public class Demo"));
    }

    #[test]
    fn decompile_class_surfaces_cfr_stderr_on_failure() {
        let _guard = java_env_lock().lock().expect("java env test lock poisoned");
        let dir = tempfile::tempdir().unwrap();
        let fake_cfr = dir.path().join("cfr.jar");
        let class_file = dir.path().join("Demo.class");
        let fake_java = dir.path().join("java");
        fs::write(&fake_cfr, "stub").unwrap();
        fs::write(&class_file, "stub").unwrap();
        fs::write(
            &fake_java,
            r#"#!/bin/sh
echo "boom from fake cfr" >&2
exit 1
"#,
        )
        .unwrap();
        make_executable(&fake_java).unwrap();

        // SAFETY: Guarded by java_env_lock and removed before returning.
        unsafe { std::env::set_var("CLASS_CONTENT_JAVA", &fake_java) };

        let scratch = ScratchSpace::new().unwrap();
        let decompiler = CfrDecompiler::new(fake_cfr);
        let result = decompiler.decompile_class(&class_file, &scratch);

        // SAFETY: Guarded by java_env_lock.
        unsafe { std::env::remove_var("CLASS_CONTENT_JAVA") };

        let err = result.unwrap_err().to_string();
        assert!(err.contains("CFR failed"));
        assert!(err.contains("boom from fake cfr"));
    }
}
