#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use tabled::{
    Table,
    settings::{Alignment, Modify, Panel, Style, Width, object::Rows},
};

/// Feedback assembly and emission.
pub mod feedback;
/// Marker (regex) grading.
pub mod pattern;
/// Shared grade result types.
pub mod results;
/// Search-output grading.
pub mod search;

pub use feedback::{Feedback, FeedbackError, FeedbackReport, FeedbackSink, JsonFileSink, MemorySink};
pub use pattern::{PatternGrade, PatternGrader, PatternRule, RuleOutcome};
pub use results::{Grade, GradeResult};
pub use search::{SearchGrade, SearchGrader, SearchParseError, SearchRecord, SearchVerdict};

/// Renders grading results as a table, with a total in the footer.
pub fn results_table(results: &[GradeResult]) -> String {
    let (grade, out_of) = results
        .iter()
        .fold((0f64, 0f64), |acc, r| (acc.0 + r.grade_value(), acc.1 + r.out_of_value()));

    Table::new(results)
        .with(Panel::header("Grading Overview"))
        .with(Panel::footer(format!("Total: {grade:.2}/{out_of:.2}")))
        .with(Modify::new(Rows::new(1..)).with(Width::wrap(32).keep_words(true)))
        .with(
            Modify::new(Rows::first())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(
            Modify::new(Rows::last())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(Style::modern())
        .to_string()
}

/// Prints the results table to stderr, keeping stdout for the artifact.
pub fn show_results(results: &[GradeResult]) {
    eprintln!("{}", results_table(results));
}
