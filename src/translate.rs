//! Java-to-Kotlin source translation.
//!
//! Translation is an opaque text-to-text step behind the [`SourceTranslator`]
//! trait; the resolver only invokes it when the translation gate in
//! [`ContentConfig`](crate::config::ContentConfig) is enabled. The bundled
//! implementation pipes the Java text through an external converter command.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::ContentError;

pub trait SourceTranslator: Send + Sync {
    /// Translates Java source text into equivalent Kotlin source text.
    fn translate(&self, java_source: &str) -> Result<String, ContentError>;
}

/// Runs an external converter that reads Java on stdin and writes Kotlin on
/// stdout.
#[derive(Debug, Clone)]
pub struct CommandTranslator {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandTranslator {
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }
}

impl SourceTranslator for CommandTranslator {
    fn translate(&self, java_source: &str) -> Result<String, ContentError> {
        debug!(program = %self.program.display(), "translating Java source to Kotlin");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ContentError::Translate(format!(
                    "failed to start converter {}: {e}",
                    self.program.display()
                ))
            })?;

        child
            .stdin
            .take()
            .ok_or_else(|| ContentError::Translate("converter stdin unavailable".into()))?
            .write_all(java_source.as_bytes())?;

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ContentError::Translate(format!(
                "converter failed: {}",
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
