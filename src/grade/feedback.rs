#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// The artifact handed to the course platform: a fractional score and the
/// message shown to the learner.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TypedBuilder)]
#[builder(doc)]
pub struct Feedback {
    /// Score in `[0.0, 1.0]`.
    #[serde(rename = "fractionalScore")]
    #[builder(setter(transform = |score: f64| score.clamp(0.0, 1.0)))]
    pub fractional_score: f64,

    /// Multi-line explanation of the score.
    #[builder(setter(into))]
    pub feedback: String,
}

impl Feedback {
    /// A zero score carrying only `message`.
    pub fn zero(message: impl Into<String>) -> Self {
        Self::builder().fractional_score(0.0).feedback(message).build()
    }

    /// Serializes the artifact to a single JSON line.
    pub fn to_json(&self) -> Result<String, FeedbackError> {
        serde_json::to_string(self).map_err(FeedbackError::Serialize)
    }
}

/// Errors raised while emitting feedback.
#[derive(thiserror::Error, Debug)]
pub enum FeedbackError {
    /// The artifact could not be turned into JSON.
    #[error("Could not serialize feedback")]
    Serialize(#[source] serde_json::Error),
    /// The artifact could not be written out.
    #[error("Could not write feedback to `{}`", .path.display())]
    Write {
        /// Destination that failed.
        path:   PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Accumulates feedback text in the order the learner should read it:
/// the preamble, grader-specific lines, then the grade line.
#[derive(Debug, Clone)]
pub struct FeedbackReport {
    /// Opening line naming the part and file.
    preamble: String,
    /// Lines contributed by the grader.
    lines:    Vec<String>,
}

impl FeedbackReport {
    /// Starts a report for `part_id` graded from `file`.
    pub fn new(part_id: &str, file: &Path) -> Self {
        Self {
            preamble: format!("Processing part: {part_id} with file: {}.", file.display()),
            lines:    Vec::new(),
        }
    }

    /// Appends one diagnostic line.
    pub fn push(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    /// Appends several diagnostic lines.
    pub fn extend<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Closes the report with the grade line and pairs it with `score`.
    pub fn finish(self, score: f64) -> Feedback {
        let mut text = self.preamble;
        text.push('\n');
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text.push_str(&grade_line(score));
        text.push('\n');

        Feedback::builder()
            .fractional_score(score)
            .feedback(text)
            .build()
    }
}

/// `Your grade will be 50.0%.` for a score of `0.5`.
pub fn grade_line(score: f64) -> String {
    format!("Your grade will be {:.1}%.", score * 100.0)
}

/// Somewhere feedback can be delivered.
pub trait FeedbackSink {
    /// Delivers `feedback`. Called once per invocation.
    fn emit(&self, feedback: &Feedback) -> Result<(), FeedbackError>;
}

/// Writes the artifact as JSON to a file and echoes it to stdout for the
/// container log.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    /// Destination of the artifact.
    path: PathBuf,
}

impl JsonFileSink {
    /// Creates a sink writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FeedbackSink for JsonFileSink {
    fn emit(&self, feedback: &Feedback) -> Result<(), FeedbackError> {
        let json = feedback.to_json()?;
        println!("{json}");

        let write_err = |source| FeedbackError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(&self.path, json).map_err(write_err)?;

        tracing::info!("Feedback written to {}", self.path.display());
        Ok(())
    }
}

/// Keeps emitted feedback in memory instead of writing it anywhere.
#[derive(Debug, Default)]
pub struct MemorySink {
    /// Everything emitted so far.
    emitted: RefCell<Vec<Feedback>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything emitted so far, oldest first.
    pub fn emitted(&self) -> Vec<Feedback> {
        self.emitted.borrow().clone()
    }
}

impl FeedbackSink for MemorySink {
    fn emit(&self, feedback: &Feedback) -> Result<(), FeedbackError> {
        self.emitted.borrow_mut().push(feedback.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_orders_preamble_lines_and_grade() {
        let mut report = FeedbackReport::new("abc", Path::new("/shared/submission/out.txt"));
        report.push("first").push("second");
        let feedback = report.finish(0.5);

        assert_eq!(
            feedback.feedback,
            "Processing part: abc with file: /shared/submission/out.txt.\nfirst\nsecond\nYour \
             grade will be 50.0%.\n"
        );
        assert_eq!(feedback.fractional_score, 0.5);
    }

    #[test]
    fn json_uses_platform_field_names() {
        let json = Feedback::zero("nope").to_json().unwrap();
        assert_eq!(json, r#"{"fractionalScore":0.0,"feedback":"nope"}"#);
    }

    #[test]
    fn builder_clamps_score() {
        let feedback = Feedback::builder().fractional_score(1.5).feedback("x").build();
        assert_eq!(feedback.fractional_score, 1.0);
    }

    #[test]
    fn grade_line_formats_percentages() {
        assert_eq!(grade_line(1.0), "Your grade will be 100.0%.");
        assert_eq!(grade_line(0.0), "Your grade will be 0.0%.");
    }

    #[test]
    fn memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.emit(&Feedback::zero("a")).unwrap();
        sink.emit(&Feedback::zero("b")).unwrap();

        let emitted = sink.emitted();
        assert_eq!(emitted.len(), 2);
        assert_eq!(emitted[1].feedback, "b");
    }
}
