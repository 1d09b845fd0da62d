#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Grading for the linear-search task. The learner program prints its input,
//! the value it searched for and the index it found; the grader redoes the
//! search and compares.

use std::{num::ParseIntError, path::Path};

use bon::Builder;

use super::{
    feedback::{Feedback, FeedbackReport},
    results::{Grade, GradeResult},
};
use crate::{
    constants::{FOUND_REQUIRED_PART, NOT_FOUND_INDEX, SEARCH_FORMAT_HINTS, SEARCH_PROGRAM},
    submission::Submission,
};

/// Why the three expected lines could not be read out of a submission.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SearchParseError {
    /// The output has fewer lines than expected. `line` is one-based.
    #[error("Line {line} is missing")]
    MissingLine {
        /// One-based line number.
        line: usize,
    },
    /// A line is too short to hold the expected token.
    #[error("Line {line} has no token at position {index}")]
    MissingToken {
        /// One-based line number.
        line:  usize,
        /// Zero-based token position.
        index: usize,
    },
    /// The reported index is not an integer.
    #[error("`{token}` is not a valid index")]
    InvalidIndex {
        /// The offending token.
        token:  String,
        /// Why it did not parse.
        #[source]
        source: ParseIntError,
    },
}

/// The three values a search submission reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRecord {
    /// Data set the search ran over, label removed.
    pub input_tokens:   Vec<String>,
    /// Value that was searched for.
    pub search_value:   String,
    /// Index the submission claims to have found, `-1` for absent.
    pub reported_index: i64,
}

impl SearchRecord {
    /// Reads the record from the first three lines of `submission`:
    ///
    /// ```text
    /// Data: 4 8 15 16
    /// Searching for value: 15
    /// Found Index: 2
    /// ```
    pub fn parse(submission: &Submission) -> Result<Self, SearchParseError> {
        let line = |n: usize| {
            submission
                .line(n - 1)
                .ok_or(SearchParseError::MissingLine { line: n })
        };
        let token = |n: usize, index: usize| -> Result<String, SearchParseError> {
            line(n)?
                .split_whitespace()
                .nth(index)
                .map(String::from)
                .ok_or(SearchParseError::MissingToken { line: n, index })
        };

        let input_tokens: Vec<String> =
            line(1)?.split_whitespace().skip(1).map(String::from).collect();
        tracing::debug!("input_data: {:?}", input_tokens);

        let search_value = token(2, 3)?;
        tracing::debug!("search_value: {search_value}");

        let index_token = token(3, 2)?;
        let reported_index =
            index_token
                .parse::<i64>()
                .map_err(|source| SearchParseError::InvalidIndex {
                    token: index_token.clone(),
                    source,
                })?;
        tracing::debug!("found_index: {reported_index}");

        Ok(Self {
            input_tokens,
            search_value,
            reported_index,
        })
    }

    /// Position of the first token equal to the search value, if any.
    pub fn expected_index(&self) -> Option<usize> {
        self.input_tokens
            .iter()
            .position(|token| *token == self.search_value)
    }
}

/// How a reported index compares with the recomputed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchVerdict {
    /// The part requires a hit, and the submission claimed a miss.
    NotFoundDisallowed,
    /// Value present, reported at its first position.
    FoundAtActual,
    /// Value present, reported somewhere else.
    FoundElsewhere,
    /// Value absent, correctly reported as absent.
    CorrectlyAbsent,
    /// Value absent, yet an index was reported.
    FalsePositive,
}

impl SearchVerdict {
    /// Decides the verdict for `record` under `part_id`. A miss reported for
    /// the found-required part fails before the search is even redone.
    pub fn decide(part_id: &str, found_required_part: &str, record: &SearchRecord) -> Self {
        if part_id == found_required_part && record.reported_index == NOT_FOUND_INDEX {
            return Self::NotFoundDisallowed;
        }

        match record.expected_index() {
            Some(actual) => {
                tracing::debug!("actual_found_index: {actual}");
                if i64::try_from(actual).is_ok_and(|actual| actual == record.reported_index) {
                    Self::FoundAtActual
                } else {
                    Self::FoundElsewhere
                }
            }
            None if record.reported_index == NOT_FOUND_INDEX => Self::CorrectlyAbsent,
            None => Self::FalsePositive,
        }
    }

    /// `1.0` for the two correct verdicts, `0.0` otherwise.
    pub fn score(self) -> f64 {
        match self {
            Self::FoundAtActual | Self::CorrectlyAbsent => 1.0,
            Self::NotFoundDisallowed | Self::FoundElsewhere | Self::FalsePositive => 0.0,
        }
    }

    /// Lines explaining the verdict to the learner.
    pub fn messages(self, part_id: &str) -> Vec<String> {
        match self {
            Self::NotFoundDisallowed => vec![format!(
                "Part {part_id} expects the search kernel to find the search value, so a Found \
                 Index of {NOT_FOUND_INDEX} scores 0."
            )],
            Self::FoundAtActual => {
                vec!["The search kernel found the search value at the actual location.".into()]
            }
            Self::FoundElsewhere => vec![
                "The search kernel did not find the search value at the actual location.".into(),
            ],
            Self::CorrectlyAbsent => vec![
                "The search kernel was correct that the search value was not in the input data."
                    .into(),
            ],
            Self::FalsePositive => vec![
                "The search value is not in the input data but the submitted search kernel found \
                 something."
                    .into(),
                "This part will have a score of 0.".into(),
            ],
        }
    }
}

/// Everything the search grader concluded about one submission.
#[derive(Debug, Clone)]
pub struct SearchGrade {
    /// The single requirement row.
    pub result:   GradeResult,
    /// Artifact for the learner.
    pub feedback: Feedback,
}

/// Grades the output of a learner's search program.
#[derive(Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct SearchGrader {
    /// Part being graded.
    part_id:             String,
    /// Part for which a "not found" answer is never accepted.
    #[builder(default = FOUND_REQUIRED_PART.to_string())]
    found_required_part: String,
}

impl SearchGrader {
    /// Grades an already loaded submission. Malformed output scores zero with
    /// a description of the expected format; it is never an error.
    pub fn grade(&self, submission: &Submission) -> SearchGrade {
        let mut report = FeedbackReport::new(&self.part_id, submission.path());

        let (score, reason) = match SearchRecord::parse(submission) {
            Ok(record) => {
                let verdict = SearchVerdict::decide(&self.part_id, &self.found_required_part, &record);
                report.extend(verdict.messages(&self.part_id));
                (verdict.score(), format!("{verdict:?}"))
            }
            Err(e) => {
                tracing::warn!("Could not parse {}: {e}", submission.path().display());
                push_format_hints(&mut report);
                (0.0, e.to_string())
            }
        };
        tracing::debug!("score: {score}");

        self.finish(report, score, reason)
    }

    /// Reads the submission at `path` and grades it. A file that cannot be
    /// read is graded like malformed output.
    pub fn grade_file(&self, path: &Path) -> SearchGrade {
        match Submission::read(path) {
            Ok(submission) => self.grade(&submission),
            Err(e) => {
                tracing::warn!("{e}");
                let mut report = FeedbackReport::new(&self.part_id, path);
                push_format_hints(&mut report);
                self.finish(report, 0.0, e.to_string())
            }
        }
    }

    /// Packages the report and the single result row.
    fn finish(&self, report: FeedbackReport, score: f64, reason: String) -> SearchGrade {
        let result = GradeResult::builder()
            .requirement(format!("Search output ({})", self.part_id))
            .grade(Grade::new(score, 1.0))
            .reason(reason)
            .build();

        tracing::info!("Part {} scored {score}", self.part_id);
        SearchGrade {
            result,
            feedback: report.finish(score),
        }
    }
}

/// Appends the parse error line and the three expected line formats.
fn push_format_hints(report: &mut FeedbackReport) {
    report
        .push(format!("An error occurred while parsing the output of {SEARCH_PROGRAM}."))
        .extend(SEARCH_FORMAT_HINTS);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(text: &str) -> Submission {
        Submission::from_text("/shared/submission/search.txt", text)
    }

    fn record(tokens: &[&str], value: &str, index: i64) -> SearchRecord {
        SearchRecord {
            input_tokens:   tokens.iter().map(|t| t.to_string()).collect(),
            search_value:   value.into(),
            reported_index: index,
        }
    }

    #[test]
    fn parses_well_formed_output() {
        let parsed = SearchRecord::parse(&submission(
            "Data: 4 8 15 16\nSearching for value: 15   \nFound Index: 2\n",
        ))
        .unwrap();

        assert_eq!(parsed, record(&["4", "8", "15", "16"], "15", 2));
        assert_eq!(parsed.expected_index(), Some(2));
    }

    #[test]
    fn last_data_token_is_searchable() {
        let parsed =
            SearchRecord::parse(&submission("Data: 1 2 3\nSearching for value: 3\nFound Index: 2"))
                .unwrap();
        assert_eq!(parsed.expected_index(), Some(2));
    }

    #[test]
    fn label_only_data_line_is_empty_input() {
        let parsed =
            SearchRecord::parse(&submission("Data:\nSearching for value: 3\nFound Index: -1"))
                .unwrap();
        assert!(parsed.input_tokens.is_empty());
        assert_eq!(parsed.expected_index(), None);
    }

    #[test]
    fn parse_errors_name_the_problem() {
        assert_eq!(
            SearchRecord::parse(&submission("Data: 1 2")),
            Err(SearchParseError::MissingLine { line: 2 })
        );
        assert_eq!(
            SearchRecord::parse(&submission("Data: 1 2\nSearching for\nFound Index: 1")),
            Err(SearchParseError::MissingToken { line: 2, index: 3 })
        );
        assert!(matches!(
            SearchRecord::parse(&submission("Data: 1 2\nSearching for value: 2\nFound Index: one")),
            Err(SearchParseError::InvalidIndex { ref token, .. }) if token == "one"
        ));
    }

    #[test]
    fn first_occurrence_wins() {
        let r = record(&["a", "b", "b"], "b", 2);
        assert_eq!(r.expected_index(), Some(1));
        assert_eq!(SearchVerdict::decide("p", FOUND_REQUIRED_PART, &r), SearchVerdict::FoundElsewhere);
    }

    #[test]
    fn verdicts_cover_every_case() {
        let abc = ["a", "b", "c"];
        let decide = |value: &str, index: i64| {
            SearchVerdict::decide("p", FOUND_REQUIRED_PART, &record(&abc, value, index))
        };

        assert_eq!(decide("b", 1), SearchVerdict::FoundAtActual);
        assert_eq!(decide("b", 0), SearchVerdict::FoundElsewhere);
        assert_eq!(decide("b", -1), SearchVerdict::FoundElsewhere);
        assert_eq!(decide("z", -1), SearchVerdict::CorrectlyAbsent);
        assert_eq!(decide("z", 2), SearchVerdict::FalsePositive);
        assert_eq!(decide("z", -2), SearchVerdict::FalsePositive);
    }

    #[test]
    fn found_required_part_rejects_not_found() {
        let present = record(&["a", "b"], "b", -1);
        let absent = record(&["a", "b"], "z", -1);

        for r in [&present, &absent] {
            let verdict = SearchVerdict::decide(FOUND_REQUIRED_PART, FOUND_REQUIRED_PART, r);
            assert_eq!(verdict, SearchVerdict::NotFoundDisallowed);
            assert_eq!(verdict.score(), 0.0);
        }
    }

    #[test]
    fn found_required_part_still_accepts_hits() {
        let r = record(&["a", "b"], "b", 1);
        assert_eq!(
            SearchVerdict::decide(FOUND_REQUIRED_PART, FOUND_REQUIRED_PART, &r),
            SearchVerdict::FoundAtActual
        );
    }

    #[test]
    fn malformed_output_scores_zero_with_hints() {
        let grader = SearchGrader::builder().part_id("p").build();
        let graded = grader.grade(&submission("Data: a b c\nSearching for value: b\nFound Index: x"));

        assert_eq!(graded.feedback.fractional_score, 0.0);
        for hint in SEARCH_FORMAT_HINTS {
            assert!(graded.feedback.feedback.contains(hint));
        }
        assert_eq!(graded.result.grade_value(), 0.0);
    }

    #[test]
    fn custom_found_required_part() {
        let grader = SearchGrader::builder()
            .part_id("other")
            .found_required_part("other")
            .build();
        let graded = grader.grade(&submission("Data: a b c\nSearching for value: z\nFound Index: -1"));
        assert_eq!(graded.feedback.fractional_score, 0.0);
    }
}
