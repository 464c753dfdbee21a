use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use serde::Deserialize;

use relp_twophase::algorithm::options::SolverOptions;
use relp_twophase::algorithm::two_phase::strategy::pivot_rule::PivotRuleKind;
use relp_twophase::algorithm::two_phase::TwoPhase;
use relp_twophase::data::linear_algebra::matrix::Matrix;
use relp_twophase::data::linear_program::elements::{ConstraintType, Objective};
use relp_twophase::data::linear_program::equality_form::LinearProgram;

/// A two phase simplex solver that certifies its answers.
#[derive(Parser)]
#[command(version, author = "Bram van den Heuvel <bram@vandenheuvel.online>")]
struct Opts {
    /// JSON file containing the problem description
    problem_file: PathBuf,
    /// Relative tolerance for all comparisons
    #[arg(long, default_value_t = 1e-9)]
    tolerance: f64,
    /// Maximum number of basis changes per phase
    #[arg(long, default_value_t = 10_000)]
    max_iterations: u32,
    /// Use the largest relative cost instead of Bland's rule to choose the entering column
    #[arg(long)]
    largest_coefficient: bool,
    /// Print every basis change
    #[arg(long)]
    show_iterations: bool,
    /// More output, repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Problem description as read from a file.
#[derive(Deserialize)]
struct ProblemFile {
    #[serde(rename = "A")]
    constraints: Vec<Vec<f64>>,
    b: Vec<f64>,
    c: Vec<f64>,
    #[serde(default)]
    objective: Objective,
    #[serde(default)]
    constant: f64,
    /// All equalities when absent.
    #[serde(default, rename = "constraints")]
    constraint_types: Option<Vec<ConstraintType>>,
}

impl ProblemFile {
    fn into_linear_program(self) -> Result<LinearProgram> {
        let nr_rows = self.constraints.len();
        let constraints = Matrix::from_rows(self.constraints, self.c.len())
            .context("Not all rows of A have the same length as c")?;
        let constraint_types = self.constraint_types
            .unwrap_or_else(|| vec![ConstraintType::Equal; nr_rows]);

        LinearProgram::new(constraints, self.b, self.c, self.objective, self.constant, constraint_types)
            .context("Problem is inconsistent")
    }
}

fn main() -> Result<()> {
    let opts: Opts = Opts::parse();

    let level = match opts.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    Builder::new().filter_level(level).parse_default_env().init();

    println!("Reading problem file: \"{}\"...", opts.problem_file.to_string_lossy());
    let contents = fs::read_to_string(&opts.problem_file)
        .with_context(|| format!("Couldn't read {}", opts.problem_file.to_string_lossy()))?;
    let problem: ProblemFile = serde_json::from_str(&contents)
        .context("Couldn't parse the problem description")?;
    let program = problem.into_linear_program()?;
    log::debug!("Problem:\n{}", program);

    let pivot_rule = if opts.largest_coefficient {
        PivotRuleKind::LargestCoefficient
    } else {
        PivotRuleKind::Bland
    };
    let options = SolverOptions::builder()
        .tolerance(opts.tolerance)
        .max_iterations(opts.max_iterations)
        .pivot_rule(pivot_rule)
        .build()
        .context("Invalid solver options")?;

    println!("Solving...");
    let (result, records) = TwoPhase::new(&program, options).solve_recording();
    if opts.show_iterations {
        for record in &records {
            println!("{}", record);
        }
    }

    println!("{}", result);
    Ok(())
}
