#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    fs,
    path::{Path, PathBuf},
};

/// Errors raised while loading a submission from disk.
#[derive(thiserror::Error, Debug)]
pub enum SubmissionError {
    /// The file is missing or could not be read to the end.
    #[error("Could not read submission file `{}`", .path.display())]
    Unreadable {
        /// Path that was attempted.
        path:   PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Learner output, read once and never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    /// Where the output was read from.
    path:  PathBuf,
    /// Lines of output, without their terminators.
    lines: Vec<String>,
}

impl Submission {
    /// Reads every line of the file at `path`. The handle is closed before
    /// this returns, whether or not reading succeeded.
    ///
    /// Bytes that are not valid UTF-8 are replaced with `U+FFFD`, so only a
    /// failure to open or read the file is an error.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, SubmissionError> {
        let path = path.as_ref().to_path_buf();
        let bytes = fs::read(&path).map_err(|source| SubmissionError::Unreadable {
            path: path.clone(),
            source,
        })?;

        let text = String::from_utf8_lossy(&bytes);
        let lines: Vec<String> = text.lines().map(String::from).collect();

        tracing::debug!("Read {} lines from {}", lines.len(), path.display());
        Ok(Self { path, lines })
    }

    /// Builds a submission from output that is already in memory.
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        Self {
            path:  path.into(),
            lines: text.lines().map(String::from).collect(),
        }
    }

    /// Path the submission was read from.
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// All lines, in file order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The line at zero-based position `index`, if the file is long enough.
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }
}
