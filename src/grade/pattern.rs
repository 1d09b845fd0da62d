#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Marker-based grading: a submission earns credit for every required
//! pattern that shows up somewhere in its output.

use std::fmt;

use bon::Builder;
use regex::Regex;

use super::{
    feedback::{Feedback, FeedbackReport},
    results::{Grade, GradeResult},
};
use crate::{
    config::ConfigError,
    constants::{TEST_PASSED_MARKER, VECTOR_MULTIPLICATION_MARKER},
    submission::Submission,
};

/// A required marker: a human-readable label and the expression that
/// detects it.
#[derive(Clone)]
pub struct PatternRule {
    /// Name used in feedback, e.g. "Test PASSED statement".
    label: String,
    /// Expression searched for on each line.
    regex: Regex,
}

impl PatternRule {
    /// Compiles `pattern` into a rule named `label`.
    pub fn new(label: impl Into<String>, pattern: &str) -> Result<Self, ConfigError> {
        let label = label.into();
        let regex = Regex::new(pattern).map_err(|e| ConfigError::InvalidRule {
            spec:   format!("{label}={pattern}"),
            reason: e.to_string(),
        })?;
        Ok(Self { label, regex })
    }

    /// Parses a `LABEL=REGEX` rule. Only the first `=` separates the two, so
    /// the expression itself may contain `=`.
    pub fn parse(spec: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidRule {
            spec:   spec.to_owned(),
            reason: reason.to_owned(),
        };
        let (label, pattern) = spec
            .split_once('=')
            .ok_or_else(|| invalid("expected LABEL=REGEX"))?;
        let label = label.trim();
        if label.is_empty() {
            return Err(invalid("label must not be empty"));
        }
        if pattern.is_empty() {
            return Err(invalid("pattern must not be empty"));
        }
        Self::new(label, pattern)
    }

    /// The two markers the CUDA vector task expects.
    ///
    /// # Panics
    ///
    /// Only if a built-in pattern in [`crate::constants`] stops compiling,
    /// which the unit tests below guard against.
    pub fn defaults() -> Vec<Self> {
        [VECTOR_MULTIPLICATION_MARKER, TEST_PASSED_MARKER]
            .into_iter()
            .map(|(label, pattern)| {
                Self::new(label, pattern).expect("built-in marker patterns compile")
            })
            .collect()
    }

    /// Name used in feedback.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Source text of the expression.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Checks whether any line of `lines` contains this marker.
    pub fn verify(&self, lines: &[String]) -> RuleOutcome {
        let found = lines.iter().any(|line| self.regex.is_match(line));
        RuleOutcome {
            found,
            score: if found { 1.0 } else { 0.0 },
        }
    }
}

impl fmt::Debug for PatternRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternRule")
            .field("label", &self.label)
            .field("pattern", &self.regex.as_str())
            .finish()
    }
}

/// Result of checking one rule against a submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleOutcome {
    /// Whether any line matched.
    pub found: bool,
    /// `1.0` if found, `0.0` otherwise.
    pub score: f64,
}

/// Everything the marker grader concluded about one submission.
#[derive(Debug, Clone)]
pub struct PatternGrade {
    /// One row per rule, in rule order.
    pub results:  Vec<GradeResult>,
    /// Artifact for the learner.
    pub feedback: Feedback,
}

/// Grades a submission by the fraction of required markers it contains.
#[derive(Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct PatternGrader {
    /// Part being graded, used in feedback.
    part_id: String,
    /// Rules that must all be present for full credit.
    #[builder(default = PatternRule::defaults())]
    rules:   Vec<PatternRule>,
}

impl PatternGrader {
    /// Rules this grader checks.
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Runs every rule and averages the outcomes. Partial credit is spelled
    /// out rule by rule in the feedback.
    pub fn grade(&self, submission: &Submission) -> Result<PatternGrade, ConfigError> {
        if self.rules.is_empty() {
            return Err(ConfigError::NoRules);
        }

        let outcomes: Vec<(&PatternRule, RuleOutcome)> = self
            .rules
            .iter()
            .map(|rule| (rule, rule.verify(submission.lines())))
            .collect();

        let score =
            outcomes.iter().map(|(_, o)| o.score).sum::<f64>() / outcomes.len() as f64;

        let mut report = FeedbackReport::new(&self.part_id, submission.path());
        if outcomes.iter().all(|(_, o)| o.found) {
            report.push(format!("Runtime API part: {} content was fully found.", self.part_id));
        } else {
            for (rule, _) in outcomes.iter().filter(|(_, o)| !o.found) {
                tracing::warn!("Marker `{}` missing from {}", rule.label, submission.path().display());
                report.push(format!("{} was not found.", rule.label));
            }
            report.push(format!(
                "The output for {} was not found, refer to the README.md file to understand the \
                 commands to execute.",
                self.part_id
            ));
        }

        let results = outcomes
            .iter()
            .map(|(rule, outcome)| {
                GradeResult::builder()
                    .requirement(rule.label.clone())
                    .grade(if outcome.found { Grade::pass() } else { Grade::fail() })
                    .reason(if outcome.found {
                        format!("matched `{}`", rule.pattern())
                    } else {
                        format!("no line matched `{}`", rule.pattern())
                    })
                    .build()
            })
            .collect();

        tracing::info!("Part {} scored {score} on {} markers", self.part_id, self.rules.len());
        Ok(PatternGrade {
            results,
            feedback: report.finish(score),
        })
    }
}
