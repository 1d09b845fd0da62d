#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use anyhow::{Context, Result};

use crate::{
    config::{ConfigError, GraderConfig},
    constants::MISSING_CONFIG_FEEDBACK,
    grade::{
        Feedback, FeedbackReport, FeedbackSink, GradeResult, PatternGrader, PatternRule,
        SearchGrader,
    },
    submission::{Submission, SubmissionError},
};

/// Which kind of check to run on the submission.
#[derive(Debug, Clone)]
pub enum Task {
    /// Look for required markers anywhere in the output.
    Markers(Vec<PatternRule>),
    /// Check the index reported by a search program.
    Search,
}

impl Task {
    /// The marker task with the built-in CUDA markers.
    pub fn default_markers() -> Self {
        Self::Markers(PatternRule::defaults())
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Markers(_) => "markers",
            Self::Search => "search",
        }
    }
}

/// Outcome of one grading invocation.
#[derive(Debug, Clone)]
pub struct Graded {
    /// One row per requirement checked.
    pub results:  Vec<GradeResult>,
    /// Artifact for the learner.
    pub feedback: Feedback,
}

/// Grades the submission named by `config`. Learner mistakes are always
/// folded into the result; only an unreadable submission in the marker task
/// or a misconfigured rule set comes back as an error.
pub fn grade(config: &GraderConfig, task: &Task) -> Result<Graded> {
    let path = config.submission_path();
    tracing::info!(
        "Grading part {} ({}) from {}",
        config.part_id(),
        task.name(),
        path.display()
    );

    match task {
        Task::Markers(rules) => {
            let submission = Submission::read(&path)?;
            let graded = PatternGrader::builder()
                .part_id(config.part_id())
                .rules(rules.clone())
                .build()
                .grade(&submission)?;
            Ok(Graded {
                results:  graded.results,
                feedback: graded.feedback,
            })
        }
        Task::Search => {
            let graded = SearchGrader::builder()
                .part_id(config.part_id())
                .build()
                .grade_file(&path);
            Ok(Graded {
                results:  vec![graded.result],
                feedback: graded.feedback,
            })
        }
    }
}

/// Grades and hands the artifact to `sink`. When grading fails, a zero-score
/// artifact explaining the failure is still emitted before the error is
/// returned.
pub fn run(config: &GraderConfig, task: &Task, sink: &impl FeedbackSink) -> Result<Graded> {
    match grade(config, task) {
        Ok(graded) => {
            sink.emit(&graded.feedback)
                .context("Could not emit feedback")?;
            Ok(graded)
        }
        Err(e) => {
            let feedback = if let Some(err) = e.downcast_ref::<SubmissionError>() {
                unreadable_feedback(config, err)
            } else if let Some(err) = e.downcast_ref::<ConfigError>() {
                config_error_feedback(err)
            } else {
                Feedback::zero(format!("Grading failed: {e}\n"))
            };
            tracing::error!("{e:#}");
            sink.emit(&feedback)
                .context("Could not emit feedback")?;
            Err(e)
        }
    }
}

/// Emits the zero-score artifact for an invocation that could not be
/// configured.
pub fn run_unconfigured(err: &ConfigError, sink: &impl FeedbackSink) -> Result<Feedback> {
    tracing::error!("{err}");
    let feedback = config_error_feedback(err);
    sink.emit(&feedback)
        .context("Could not emit feedback")?;
    Ok(feedback)
}

/// Zero-score feedback for a configuration problem.
pub fn config_error_feedback(err: &ConfigError) -> Feedback {
    match err {
        ConfigError::Missing { .. } => Feedback::zero(MISSING_CONFIG_FEEDBACK),
        other => Feedback::zero(format!("The grader is misconfigured: {other}.\n")),
    }
}

/// Zero-score feedback for a submission that could not be read at all.
pub fn unreadable_feedback(config: &GraderConfig, err: &SubmissionError) -> Feedback {
    let mut report = FeedbackReport::new(config.part_id(), &config.submission_path());
    report.push(format!("{err}, so no credit could be given."));
    report.finish(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_uses_fixed_message() {
        let feedback = config_error_feedback(&ConfigError::Missing { name: "partId" });
        assert_eq!(feedback.fractional_score, 0.0);
        assert_eq!(feedback.feedback, MISSING_CONFIG_FEEDBACK);
    }

    #[test]
    fn other_config_errors_are_explained() {
        let feedback = config_error_feedback(&ConfigError::NoRules);
        assert!(feedback.feedback.contains("At least one marker rule is required"));
    }

    #[test]
    fn invocation_errors_carry_the_parser_message() {
        let feedback = config_error_feedback(&ConfigError::Invocation {
            message: "expected `COMMAND ...`".into(),
        });
        assert_eq!(feedback.fractional_score, 0.0);
        assert_eq!(
            feedback.feedback,
            "The grader is misconfigured: Invalid command line: expected `COMMAND ...`.\n"
        );
    }

    #[test]
    fn task_names() {
        assert_eq!(Task::default_markers().name(), "markers");
        assert_eq!(Task::Search.name(), "search");
    }
}
