//! The command-line surface (§0.1 `[MODULE] cli`): a `clap` derive struct
//! mirroring the two invocation shapes of §6, plus the `clausify` mode that
//! exercises the QDIMACS surface of §4.3/§6 directly.

use clap::{Parser, Subcommand, ValueEnum};

use crate::Algorithm;

/// How verbose the `log`/`env_logger` output should be (§0.2), in the same
/// shape as the teacher's `TraceLevel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TraceLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Default for TraceLevel {
    fn default() -> Self {
        Self::Error
    }
}

impl From<TraceLevel> for log::LevelFilter {
    fn from(level: TraceLevel) -> Self {
        match level {
            TraceLevel::Off => Self::Off,
            TraceLevel::Error => Self::Error,
            TraceLevel::Warn => Self::Warn,
            TraceLevel::Info => Self::Info,
            TraceLevel::Debug => Self::Debug,
            TraceLevel::Trace => Self::Trace,
        }
    }
}

/// `pastsynth <classic|bdd|random|clausify> ...` (§6).
#[derive(Debug, Parser)]
#[command(version, about = "Reachability/safety synthesis for pure-past LTL specifications")]
pub struct CliOptions {
    #[command(subcommand)]
    pub command: Command,

    /// How much diagnostic output to print to stderr (§0.2).
    #[arg(long, global = true, default_value = "error")]
    pub trace: TraceLevel,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Decide realizability of a `F(psi)`/`G(psi)` specification (§6).
    Solve {
        /// Which game-solving algorithm to use (§4.4/§4.5).
        algorithm: Algorithm,
        /// The specification formula, e.g. `F(O(u0) & c0)`.
        formula: String,
        /// Comma-separated propositions controlled by the environment;
        /// every other proposition mentioned in `formula` is inferred as an
        /// output (§0.1, mirroring `spec.cpp`'s convention).
        #[arg(long = "ins", value_delimiter = ',')]
        ins: Vec<String>,
    },
    /// Generate random pLTL specifications for benchmarking (§6, §0.`[SUPPLEMENT]`).
    Random {
        /// How many formulas to generate.
        n_formulas: usize,
        /// How many propositions (inputs + outputs) to draw from.
        n_vars: usize,
        /// The target node-count budget for each generated formula.
        size: usize,
        /// The seed for the pseudo-random generator.
        seed: u64,
    },
    /// Emit the QDIMACS encoding of the classic algorithm's first fixpoint
    /// test formula (§4.3/§6), without driving it through an oracle.
    Clausify {
        /// Accepted for symmetry with `solve`; clausify always encodes the
        /// classic algorithm's test formula, since the BDD solver has no
        /// QBF/QDIMACS form to emit.
        algorithm: Algorithm,
        /// The specification formula, e.g. `F(O(u0) & c0)`.
        formula: String,
        #[arg(long = "ins", value_delimiter = ',')]
        ins: Vec<String>,
    },
}
