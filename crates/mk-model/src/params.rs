use std::path::{Path, PathBuf};

use crate::error::ModelError;

/// A single request to run one build target once.
///
/// Construction is the only place the target is validated; once built the
/// value is never mutated by the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakeParams {
    target: String,
    file: Option<PathBuf>,
    workdir: Option<PathBuf>,
}

impl MakeParams {
    /// Create params for `target`.
    ///
    /// Returns [`ModelError::EmptyTarget`] when the target is empty. Any other
    /// string is handed to the build tool as is.
    pub fn new(target: impl Into<String>) -> Result<Self, ModelError> {
        let target = target.into();
        if target.is_empty() {
            return Err(ModelError::EmptyTarget);
        }
        Ok(Self {
            target,
            file: None,
            workdir: None,
        })
    }

    /// Path to the build file. An empty path keeps the tool's own discovery.
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = non_empty(file.into());
        self
    }

    /// Working directory for this invocation. An empty path keeps the executor default.
    pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = non_empty(workdir.into());
        self
    }

    /// Build params from the loosely typed front-end shape (`file`/`workdir` optional).
    pub fn from_parts(
        target: impl Into<String>,
        file: Option<String>,
        workdir: Option<String>,
    ) -> Result<Self, ModelError> {
        let mut params = Self::new(target)?;
        if let Some(file) = file {
            params = params.with_file(file);
        }
        if let Some(workdir) = workdir {
            params = params.with_workdir(workdir);
        }
        Ok(params)
    }

    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[inline]
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    #[inline]
    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }
}

fn non_empty(path: PathBuf) -> Option<PathBuf> {
    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}
