//! Reachability/safety synthesis for pure-past LTL specifications (§1).
//!
//! The pipeline is: [`parser`]/[`spec`] turn formula text into a [`Spec`],
//! [`encoder::encode`] compiles the `Spec` into a symbolic [`Automaton`],
//! and [`solver::ClassicSolver`]/[`solver::BddSolver`] decide [`Status`]
//! against it by two independent algorithms (§2).

pub mod automaton;
pub mod encoder;
pub mod error;
pub mod logic;
pub mod options;
pub mod parser;
pub mod qbf;
pub mod random;
pub mod spec;
pub mod solver;

use std::fmt;

pub use automaton::Automaton;
pub use error::{Result, SynthError};
pub use spec::Spec;

/// The tri-valued realizability verdict (§1, §7): a definite result, or
/// `Unknown` when an oracle call or the outer fixpoint loop is cancelled or
/// returns `Unknown` (§5, §7). Never an error: oracle-level undecidedness is
/// a normal outcome, not a failure to compute one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Realizable,
    Unrealizable,
    Unknown,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Status::Realizable => "REALIZABLE",
                Status::Unrealizable => "UNREALIZABLE",
                Status::Unknown => "UNKNOWN",
            }
        )
    }
}

/// The two solving algorithms exposed on the CLI (§6); `novel` is out of
/// scope per §9's open questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Algorithm {
    Classic,
    Bdd,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Algorithm::Classic => "classic",
                Algorithm::Bdd => "bdd",
            }
        )
    }
}

/// Parses `formula_text`, compiles it into an automaton, and decides its
/// realizability with the chosen `algorithm` (§2). `declared_inputs` names
/// the propositions the environment controls; every other proposition
/// mentioned in the formula is inferred as an output (§0.1).
pub fn solve(
    formula_text: &str,
    declared_inputs: &[&str],
    algorithm: Algorithm,
    cancel: &dyn solver::Cancellation,
) -> Result<Status> {
    let sigma = logic::Alphabet::new();
    let declared: Vec<String> = declared_inputs.iter().map(|s| s.to_string()).collect();
    let spec = Spec::parse(&sigma, formula_text, &declared)?;
    log::debug!("parsed spec: {}", spec);

    let aut = encoder::encode(&sigma, &spec);
    log::trace!("encoded automaton:\n{}", aut);

    let status = match algorithm {
        Algorithm::Classic => solver::ClassicSolver::new().solve(&sigma, &aut, spec.game_type, cancel),
        Algorithm::Bdd => solver::BddSolver::new().solve(&aut, spec.game_type, cancel),
    };
    log::info!("{} solver result: {}", algorithm, status);
    Ok(status)
}
