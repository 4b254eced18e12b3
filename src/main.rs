use std::fs::read_to_string;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tentplan::{Problem, Scoring};
use tracing::Level;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Problem file (YAML)
    problem: PathBuf,
    /// Solver worker threads
    #[arg(long)]
    threads: Option<u32>,
    /// Debug logging, including the solver's own log
    #[arg(short, long)]
    verbose: bool,
    /// Relative optimality gap to stop at
    #[arg(long)]
    gap: Option<f64>,
    /// Wall clock limit for the solver, in seconds
    #[arg(long)]
    time_limit: Option<f64>,
    #[arg(long, value_enum)]
    scoring: Option<ScoringArg>,
    /// Weight of a disliked pair under group scoring
    #[arg(long)]
    dislike_weight: Option<f64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScoringArg {
    Participant,
    Group,
}

impl Cli {
    fn apply(&self, problem: &mut Problem) {
        if let Some(threads) = self.threads {
            problem.solver.threads = threads;
        }
        if self.verbose {
            problem.solver.verbose = true;
        }
        if self.gap.is_some() {
            problem.solver.gap = self.gap;
        }
        if self.time_limit.is_some() {
            problem.solver.time_limit = self.time_limit;
        }
        if let Some(scoring) = self.scoring {
            problem.scoring = match scoring {
                ScoringArg::Participant => Scoring::Participant,
                ScoringArg::Group => Scoring::Group,
            };
        }
        if self.dislike_weight.is_some() {
            problem.dislike_weight = self.dislike_weight;
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let buf = read_to_string(&cli.problem)?;
    let mut problem: Problem = serde_yaml::from_str(&buf)?;
    cli.apply(&mut problem);
    let plan = problem.solve()?;

    println!("{}", serde_yaml::to_string(&plan)?);
    Ok(())
}
