//! Minifier configuration types.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default wall-clock budget for a single prover run
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Environment variable naming the TPTP root that includes resolve against
pub const TPTP_ENV: &str = "TPTP";

/// An external prover: program and leading arguments.
///
/// The problem file path is appended as the last argument of every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProverCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl FromStr for ProverCommand {
    type Err = String;

    /// Split a command line on whitespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace().map(str::to_string);
        let program = words
            .next()
            .ok_or_else(|| "prover command is empty".to_string())?;
        Ok(ProverCommand {
            program,
            args: words.collect(),
        })
    }
}

impl fmt::Display for ProverCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Configuration for a minification run
#[derive(Debug, Clone)]
pub struct MinifyConfig {
    pub first: ProverCommand,
    pub second: ProverCommand,
    /// Budget for each prover run; a run exceeding it is killed
    pub timeout: Duration,
    /// Directory `include` paths are resolved against
    pub include_root: Option<PathBuf>,
    /// Treat a non-zero exit status as a failed run
    pub strict_exit: bool,
}

impl MinifyConfig {
    /// Defaults, with the include root taken from `$TPTP`
    pub fn new(first: ProverCommand, second: ProverCommand) -> Self {
        MinifyConfig {
            first,
            second,
            timeout: DEFAULT_TIMEOUT,
            include_root: env::var_os(TPTP_ENV).map(PathBuf::from),
            strict_exit: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prover_command() {
        let cmd: ProverCommand = "  eprover --auto  -s ".parse().unwrap();
        assert_eq!(cmd.program, "eprover");
        assert_eq!(cmd.args, vec!["--auto", "-s"]);
        assert_eq!(cmd.to_string(), "eprover --auto -s");
    }

    #[test]
    fn test_empty_prover_command() {
        assert!("   ".parse::<ProverCommand>().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = MinifyConfig::new("a".parse().unwrap(), "b".parse().unwrap());
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.strict_exit);
    }
}
