#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_FEEDBACK_PATH, DEFAULT_SUBMISSION_DIR, FEEDBACK_PATH_ENV, FILENAME_ENV, PART_ID_ENV,
    SUBMISSION_DIR_ENV,
};

/// Problems with how the grader was invoked.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required parameter was absent or blank.
    #[error("Missing required parameter `{name}`")]
    Missing {
        /// Name of the parameter, as it appears in the environment.
        name: &'static str,
    },
    /// A `LABEL=REGEX` rule could not be understood.
    #[error("Invalid marker rule `{spec}`: {reason}")]
    InvalidRule {
        /// The rule as it was given.
        spec:   String,
        /// Why it was rejected.
        reason: String,
    },
    /// The marker task was asked to run without any rules.
    #[error("At least one marker rule is required")]
    NoRules,
    /// The command line could not be parsed, e.g. no task was named.
    #[error("Invalid command line: {message}")]
    Invocation {
        /// What the argument parser reported.
        message: String,
    },
}

/// Everything a single grading invocation needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraderConfig {
    /// Which part of the assignment is being graded.
    part_id:        String,
    /// Name of the submission file inside `submission_dir`.
    filename:       String,
    /// Directory the submission is mounted into.
    submission_dir: PathBuf,
    /// Where the feedback artifact is written.
    feedback_path:  PathBuf,
}

impl GraderConfig {
    /// Resolves a configuration from optional values, falling back to the
    /// default directories. Blank strings count as absent.
    pub fn resolve(
        part_id: Option<String>,
        filename: Option<String>,
        submission_dir: Option<PathBuf>,
        feedback_path: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let part_id = required(part_id, PART_ID_ENV)?;
        let filename = required(filename, FILENAME_ENV)?;

        Ok(Self {
            part_id,
            filename,
            submission_dir: submission_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_SUBMISSION_DIR)),
            feedback_path: feedback_path.unwrap_or_else(|| PathBuf::from(DEFAULT_FEEDBACK_PATH)),
        })
    }

    /// Reads `partId`, `filename`, `SUBMISSION_DIR` and `FEEDBACK_PATH` from
    /// the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`GraderConfig::from_env`], but asks `lookup` for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Self::resolve(
            lookup(PART_ID_ENV),
            lookup(FILENAME_ENV),
            lookup(SUBMISSION_DIR_ENV).map(PathBuf::from),
            lookup(FEEDBACK_PATH_ENV).map(PathBuf::from),
        )
    }

    /// Part identifier being graded.
    pub fn part_id(&self) -> &str {
        &self.part_id
    }

    /// Full path of the submission file.
    pub fn submission_path(&self) -> PathBuf {
        self.submission_dir.join(&self.filename)
    }

    /// Where the feedback artifact goes.
    pub fn feedback_path(&self) -> &Path {
        self.feedback_path.as_path()
    }
}

/// Where the artifact goes when no configuration could be resolved:
/// `FEEDBACK_PATH` if set, otherwise the default location.
pub fn fallback_feedback_path() -> PathBuf {
    std::env::var_os(FEEDBACK_PATH_ENV)
        .filter(|path| !path.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_FEEDBACK_PATH), PathBuf::from)
}

/// Trims `value` and rejects it when absent or empty.
fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing { name })
}
