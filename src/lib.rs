//! # output-grader
//!
//! An autograder for submitted program output. It reads a learner's output
//! file, checks it either for required markers or for a correctly reported
//! search index, and writes a fractional score with feedback.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Invocation configuration
pub mod config;
/// A module defining a bunch of constant values to be used throughout
pub mod constants;
/// For all things related to grading
pub mod grade;
/// Ties configuration, graders and feedback emission together
pub mod runner;
/// Reading learner output from disk
pub mod submission;

pub use config::{ConfigError, GraderConfig};
pub use grade::{Feedback, FeedbackSink, JsonFileSink};
pub use runner::{Graded, Task};
pub use submission::{Submission, SubmissionError};
