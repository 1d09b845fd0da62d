#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # grader
//!
//! Grades one learner submission and writes the feedback artifact.
//!
//! The part identifier and file name normally arrive through the `partId`
//! and `filename` environment variables set by the grading container, e.g.
//!
//! ```text
//! partId=IzONJ filename=output.txt grader search
//! ```

use std::path::PathBuf;

use anyhow::Result;
use bpaf::*;
use dotenvy::dotenv;
use output_grader::{
    config::{ConfigError, GraderConfig, fallback_feedback_path},
    constants::{FEEDBACK_PATH_ENV, FILENAME_ENV, PART_ID_ENV, SUBMISSION_DIR_ENV},
    grade::{JsonFileSink, PatternRule, show_results},
    runner::{self, Task},
};
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Grading subcommands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Check for required output markers
    Markers {
        /// `LABEL=REGEX` rules replacing the built-in markers
        rules: Vec<String>,
    },
    /// Check a search program's reported index
    Search,
}

impl Cmd {
    /// Turns the parsed command into a grading task, compiling any rules.
    fn into_task(self) -> Result<Task, ConfigError> {
        match self {
            Cmd::Markers { rules } if rules.is_empty() => Ok(Task::default_markers()),
            Cmd::Markers { rules } => Ok(Task::Markers(
                rules
                    .iter()
                    .map(|spec| PatternRule::parse(spec))
                    .collect::<Result<_, _>>()?,
            )),
            Cmd::Search => Ok(Task::Search),
        }
    }
}

/// Top-level options.
#[derive(Debug, Clone)]
struct Opts {
    /// Part identifier
    part_id:        Option<String>,
    /// Submission file name
    filename:       Option<String>,
    /// Directory holding the submission
    submission_dir: Option<PathBuf>,
    /// Where to write the feedback artifact
    feedback_path:  Option<PathBuf>,
    /// Log parsed values and other debug output
    verbose:        bool,
    /// Skip the results table on stderr
    no_table:       bool,
    /// What to grade
    cmd:            Cmd,
}

/// Parse the command line arguments and return the options
fn options() -> Result<Opts, ParseFailure> {
    /// parses marker rules
    fn r() -> impl Parser<Vec<String>> {
        long("rule")
            .help("Required marker as LABEL=REGEX; repeat for more. Replaces the built-in markers")
            .argument::<String>("LABEL=REGEX")
            .many()
    }

    let part_id = long("part-id")
        .env(PART_ID_ENV)
        .help("Part identifier being graded")
        .argument::<String>("ID")
        .optional();

    let filename = long("filename")
        .env(FILENAME_ENV)
        .help("Name of the submission file inside the submission directory")
        .argument::<String>("FILE")
        .optional();

    let submission_dir = long("submission-dir")
        .env(SUBMISSION_DIR_ENV)
        .help("Directory holding the submission")
        .argument::<PathBuf>("DIR")
        .optional();

    let feedback_path = long("feedback-path")
        .env(FEEDBACK_PATH_ENV)
        .help("Where to write the feedback JSON")
        .argument::<PathBuf>("PATH")
        .optional();

    let verbose = short('v')
        .long("verbose")
        .help("Log parsed values and other debug output")
        .switch();

    let no_table = long("no-table")
        .help("Do not print the results table")
        .switch();

    let rules = r();
    let markers = construct!(Cmd::Markers { rules })
        .to_options()
        .command("markers")
        .help("Grade by required output markers");

    let search = pure(Cmd::Search)
        .to_options()
        .command("search")
        .help("Grade a search program's reported index");

    let cmd = construct!([markers, search]);

    construct!(Opts {
        part_id,
        filename,
        submission_dir,
        feedback_path,
        verbose,
        no_table,
        cmd
    })
    .to_options()
    .descr("Grades submitted program output and writes feedback")
    .run_inner(Args::current_args())
}

/// Logs to stderr without timestamps, at debug level when `verbose`.
fn init_tracing(verbose: bool) {
    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);
    let filter_layer = LevelFilter::from_level(if verbose { Level::DEBUG } else { Level::INFO });
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();
}

fn main() -> Result<()> {
    dotenv().ok();

    let opts = match options() {
        Ok(opts) => opts,
        Err(ParseFailure::Stderr(doc)) => {
            // the command line is unusable, but the learner still gets an artifact
            init_tracing(false);
            let err = ConfigError::Invocation {
                message: doc.monochrome(true).trim().to_owned(),
            };
            runner::run_unconfigured(&err, &JsonFileSink::new(fallback_feedback_path()))?;
            return Err(err.into());
        }
        Err(help) => {
            help.print_message(100);
            std::process::exit(help.exit_code());
        }
    };

    init_tracing(opts.verbose);

    let config = match GraderConfig::resolve(
        opts.part_id,
        opts.filename,
        opts.submission_dir,
        opts.feedback_path.clone(),
    ) {
        Ok(config) => config,
        Err(e) => {
            let feedback_path = opts.feedback_path.unwrap_or_else(fallback_feedback_path);
            runner::run_unconfigured(&e, &JsonFileSink::new(feedback_path))?;
            return Ok(());
        }
    };
    let sink = JsonFileSink::new(config.feedback_path());

    let task = match opts.cmd.into_task() {
        Ok(task) => task,
        Err(e) => {
            runner::run_unconfigured(&e, &sink)?;
            return Err(e.into());
        }
    };

    let graded = runner::run(&config, &task, &sink)?;
    if !opts.no_table {
        show_results(&graded.results);
    }

    Ok(())
}
