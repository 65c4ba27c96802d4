//! Command-line front end: `minify` a problem, or `check` that two provers disagree on it

use clap::{ArgAction, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tptp_minify::oracle::{Inconclusive, ProverRun, ProverRunner};
use tptp_minify::{
    parse_file, render_problem, Candidate, DifferentialOracle, Header, Minifier, MinifyConfig,
    MinifyError, Outcome, Progress, ProverCommand, Selection, Shrink, Verdict,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tptp-minify", version, about = "Minimize a TPTP problem on which two provers disagree")]
struct Cli {
    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shrink a problem while keeping the provers' answers different
    Minify {
        /// First prover command; the problem path is appended
        prover1: ProverCommand,
        /// Second prover command; the problem path is appended
        prover2: ProverCommand,
        infile: PathBuf,
        outfile: PathBuf,

        /// Seconds allowed per prover run
        #[arg(long, value_parser = parse_timeout, default_value = "3")]
        timeout: Duration,

        /// Directory includes are resolved against (default: $TPTP)
        #[arg(long)]
        tptp: Option<PathBuf>,

        /// Do not treat a non-zero prover exit status as a failed run
        #[arg(long)]
        ignore_exit_status: bool,

        /// Write run statistics as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Run both provers once and report whether their answers differ
    Check {
        prover1: ProverCommand,
        prover2: ProverCommand,
        file: PathBuf,

        #[arg(long, value_parser = parse_timeout, default_value = "3")]
        timeout: Duration,

        #[arg(long)]
        ignore_exit_status: bool,
    },
}

fn parse_timeout(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|e| format!("{}", e))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("{}", e))
}

/// Prints the size of every confirmed or accepted candidate
struct PrintSizes;

impl Progress for PrintSizes {
    fn confirmed(&mut self, candidate: &Candidate) {
        println!("{}", candidate.size);
    }

    fn accepted(&mut self, candidate: &Candidate, _shrink: &Shrink) {
        println!("{}", candidate.size);
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Minify {
            prover1,
            prover2,
            infile,
            outfile,
            timeout,
            tptp,
            ignore_exit_status,
            report,
        } => {
            let mut config = MinifyConfig::new(prover1, prover2);
            config.timeout = timeout;
            config.strict_exit = !ignore_exit_status;
            if tptp.is_some() {
                config.include_root = tptp;
            }
            minify(&config, &infile, &outfile, report.as_deref())
        }
        Commands::Check {
            prover1,
            prover2,
            file,
            timeout,
            ignore_exit_status,
        } => {
            let mut config = MinifyConfig::new(prover1, prover2);
            config.timeout = timeout;
            config.strict_exit = !ignore_exit_status;
            check(&config, &file)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn minify(
    config: &MinifyConfig,
    infile: &Path,
    outfile: &Path,
    report: Option<&Path>,
) -> tptp_minify::Result<ExitCode> {
    let problem = parse_file(infile, config.include_root.as_deref(), &Selection::All)?;
    let candidate = problem.candidate();
    for (functor, arities) in candidate.term.arity_conflicts() {
        warn!(%functor, ?arities, "functor used with more than one arity");
    }

    let header = Header {
        source: infile.display().to_string(),
        first_prover: config.first.to_string(),
        second_prover: config.second.to_string(),
    };
    let oracle = DifferentialOracle::new(config)?.with_header(header.clone());
    let mut minifier = Minifier::new(oracle).with_progress(PrintSizes);

    let minimized = match minifier.minify(candidate) {
        Ok(minimized) => minimized,
        Err(e @ MinifyError::NotInteresting(_)) => {
            if let Some(comparison) = minifier.oracle().last_comparison() {
                println!("{}", comparison.first);
                if let Some(second) = &comparison.second {
                    println!("{}", second);
                }
            }
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    let text = render_problem(&minimized.term, Some(&header));
    fs::write(outfile, &text).map_err(|source| MinifyError::Io {
        path: outfile.to_path_buf(),
        source,
    })?;
    if let Some(path) = report {
        let json = serde_json::to_string_pretty(minifier.stats())?;
        fs::write(path, json).map_err(|source| MinifyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    }
    print!("{}", text);
    Ok(ExitCode::SUCCESS)
}

fn check(config: &MinifyConfig, file: &Path) -> tptp_minify::Result<ExitCode> {
    let runner = ProverRunner::new(config.timeout, config.strict_exit);
    let first = report_run(runner.run_captured(&config.first, file)?);
    let second = report_run(runner.run_captured(&config.second, file)?);
    let outcome = Outcome::from_verdicts(&first, &second);
    if outcome.is_interesting() {
        println!("ok");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{}", outcome);
        Ok(ExitCode::FAILURE)
    }
}

/// Print a run's verdict, and its output when no status line was found
fn report_run(run: ProverRun) -> Verdict {
    println!("{}", run.verdict);
    if run.verdict == Verdict::Inconclusive(Inconclusive::NoVerdict) {
        print!("{}", run.stdout);
    }
    run.verdict
}
