#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Directory the submission file is mounted into by the grading container
pub const DEFAULT_SUBMISSION_DIR: &str = "/shared/submission/";

/// Well-known location the feedback artifact must be written to
pub const DEFAULT_FEEDBACK_PATH: &str = "/shared/feedback.json";

/// Environment variable holding the part identifier
pub const PART_ID_ENV: &str = "partId";

/// Environment variable holding the submission file name
pub const FILENAME_ENV: &str = "filename";

/// Environment variable overriding [`DEFAULT_SUBMISSION_DIR`]
pub const SUBMISSION_DIR_ENV: &str = "SUBMISSION_DIR";

/// Environment variable overriding [`DEFAULT_FEEDBACK_PATH`]
pub const FEEDBACK_PATH_ENV: &str = "FEEDBACK_PATH";

/// Feedback sent when the part identifier or file name was not supplied
pub const MISSING_CONFIG_FEEDBACK: &str = "Please provide the partId and filename.\n";

/// Label and pattern of the marker printed before the vector operation runs
pub const VECTOR_MULTIPLICATION_MARKER: (&str, &str) = (
    "Vector multiplication initial line of code",
    r"^.*Vector multiplication of .* elements.*$",
);

/// Label and pattern of the marker printed once the self-check succeeds
pub const TEST_PASSED_MARKER: (&str, &str) = ("Test PASSED statement", r"^.*Test PASSED.*$");

/// Part whose search value is always present, so a "not found" answer can
/// never be correct for it
pub const FOUND_REQUIRED_PART: &str = "IzONJ";

/// Index a submission reports when it claims the value is absent
pub const NOT_FOUND_INDEX: i64 = -1;

/// Name of the learner program whose output the search task checks
pub const SEARCH_PROGRAM: &str = "search.exe";

/// Hints describing the three lines the search task expects
pub const SEARCH_FORMAT_HINTS: [&str; 3] = [
    "The 1st line should start with 'Data:' and then have input data.",
    "The 2nd line should start with 'Searching for value:' and then has the search value.",
    "The 3rd line should start with 'Found Index:' and then has actual found index.",
];
