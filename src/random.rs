//! Random pLTL specification generation (§6 CLI mode `random`, §0.`[SUPPLEMENT]`
//! "Random formula generation").
//!
//! A direct, idiomatic port of `original_source/src/src/random.cpp`'s
//! `random_spec`: a weighted recursive-descent generator over a budget of
//! `size` nodes, seeded by `rand::StdRng` instead of the original's
//! `std::mt19937`. The original builds a future-LTL formula first and
//! mirrors it into the past fragment (`X`->`Y`, `F`->`O`, `G`->`H`,
//! `U`/`W`->`S`, `R`/`M`->`T`); this generator builds the past-fragment
//! [`PForm`] directly, which is equivalent since every constructor it uses
//! has a one-to-one past counterpart.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::logic::{Alphabet, PForm, Proposition};
use crate::parser::GameType;

/// A randomly generated specification, in the same shape `random.cpp`'s
/// `random_spec` returns: a game type, a pLTL body, and the input/output
/// propositions it was built over.
pub struct RandomSpec {
    pub game_type: GameType,
    pub body: PForm,
    pub inputs: Vec<Proposition>,
    pub outputs: Vec<Proposition>,
}

impl std::fmt::Display for RandomSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let wrapper = match self.game_type {
            GameType::Eventually => "F",
            GameType::Always => "G",
        };
        write!(f, "'{}({})'", wrapper, self.body)?;
        for p in &self.inputs {
            write!(f, " {}", p)?;
        }
        Ok(())
    }
}

/// One node kind the generator may pick, weighted uniformly among the
/// choices available at a given remaining size budget (mirrors the
/// original's reliance on `black`'s `random_ltl_formula`, which picks
/// uniformly among applicable constructors at each step).
enum Choice {
    Atom,
    Not,
    And,
    Or,
    Implies,
    Iff,
    Yesterday,
    WYesterday,
    Once,
    Historically,
    Since,
    Triggered,
}

const UNARY_AND_ATOM: &[Choice] = &[
    Choice::Atom,
    Choice::Not,
    Choice::Yesterday,
    Choice::WYesterday,
    Choice::Once,
    Choice::Historically,
];

const ALL_CHOICES: &[Choice] = &[
    Choice::Atom,
    Choice::Not,
    Choice::And,
    Choice::Or,
    Choice::Implies,
    Choice::Iff,
    Choice::Yesterday,
    Choice::WYesterday,
    Choice::Once,
    Choice::Historically,
    Choice::Since,
    Choice::Triggered,
];

/// Generates one pLTL formula of the requested `size` (a node-count budget,
/// not exceeded) over `symbols`, following `size == 0`/`size == 1` down to
/// an atom as the original's recursive generator does.
fn random_pform(rng: &mut StdRng, symbols: &[Proposition], size: usize) -> PForm {
    if size <= 1 || symbols.is_empty() {
        return random_atom(rng, symbols);
    }

    let pool = if size == 2 { UNARY_AND_ATOM } else { ALL_CHOICES };
    match &pool[rng.gen_range(0..pool.len())] {
        Choice::Atom => random_atom(rng, symbols),
        Choice::Not => random_pform(rng, symbols, size - 1).not(),
        Choice::Yesterday => random_pform(rng, symbols, size - 1).yesterday(),
        Choice::WYesterday => random_pform(rng, symbols, size - 1).w_yesterday(),
        Choice::Once => random_pform(rng, symbols, size - 1).once(),
        Choice::Historically => random_pform(rng, symbols, size - 1).historically(),
        Choice::And => {
            let (ls, rs) = split(rng, size - 1);
            random_pform(rng, symbols, ls).and(random_pform(rng, symbols, rs))
        }
        Choice::Or => {
            let (ls, rs) = split(rng, size - 1);
            random_pform(rng, symbols, ls).or(random_pform(rng, symbols, rs))
        }
        Choice::Implies => {
            let (ls, rs) = split(rng, size - 1);
            random_pform(rng, symbols, ls).implies(random_pform(rng, symbols, rs))
        }
        Choice::Iff => {
            let (ls, rs) = split(rng, size - 1);
            random_pform(rng, symbols, ls).iff(random_pform(rng, symbols, rs))
        }
        Choice::Since => {
            let (ls, rs) = split(rng, size - 1);
            random_pform(rng, symbols, ls).since(random_pform(rng, symbols, rs))
        }
        Choice::Triggered => {
            let (ls, rs) = split(rng, size - 1);
            random_pform(rng, symbols, ls).triggered(random_pform(rng, symbols, rs))
        }
    }
}

/// Splits a `remaining` node budget between two subterms, each getting at
/// least one node.
fn split(rng: &mut StdRng, remaining: usize) -> (usize, usize) {
    if remaining <= 2 {
        return (1, 1);
    }
    let left = rng.gen_range(1..remaining);
    (left, remaining - left)
}

fn random_atom(rng: &mut StdRng, symbols: &[Proposition]) -> PForm {
    if symbols.is_empty() {
        return PForm::top();
    }
    let idx = rng.gen_range(0..symbols.len());
    PForm::prop(symbols[idx].clone())
}

/// Generates one random specification (§6's `random` mode), mirroring
/// `random_spec`: picks `F`/`G` uniformly, splits `nsymbols` (clamped to at
/// least 2) into a nonempty set of inputs `u0..` and outputs `c0..`, and
/// generates a body of the requested `size` over their union.
pub fn random_spec(sigma: &Alphabet, rng: &mut StdRng, nsymbols: usize, size: usize) -> RandomSpec {
    let game_type = if rng.gen_bool(0.5) {
        GameType::Eventually
    } else {
        GameType::Always
    };

    let nsymbols = nsymbols.max(2);
    let ninputs = rng.gen_range(1..nsymbols);
    let noutputs = nsymbols - ninputs;

    let inputs: Vec<Proposition> = (0..ninputs).map(|i| sigma.proposition(format!("u{}", i))).collect();
    let outputs: Vec<Proposition> = (0..noutputs).map(|i| sigma.proposition(format!("c{}", i))).collect();

    let mut symbols = inputs.clone();
    symbols.extend(outputs.iter().cloned());

    let body = random_pform(rng, &symbols, size);

    RandomSpec {
        game_type,
        body,
        inputs,
        outputs,
    }
}

/// Generates `n_formulas` random specifications seeded by `seed`, in the
/// exact textual shape §6 specifies: one line per formula, `'<formula>'`
/// followed by its space-separated input propositions.
pub fn random_lines(n_formulas: usize, n_vars: usize, size: usize, seed: u64) -> Vec<String> {
    let sigma = Alphabet::new();
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n_formulas)
        .map(|_| random_spec(&sigma, &mut rng, n_vars, size).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_lines_produces_requested_count() {
        let lines = random_lines(5, 3, 6, 42);
        assert_eq!(lines.len(), 5);
        for line in &lines {
            assert!(line.starts_with('\'') || line.starts_with("'F") || line.starts_with("'G"));
        }
    }

    #[test]
    fn same_seed_is_deterministic() {
        let a = random_lines(10, 4, 8, 7);
        let b = random_lines(10, 4, 8, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn every_generated_formula_parses() {
        let sigma = Alphabet::new();
        let mut rng = StdRng::seed_from_u64(1234);
        for _ in 0..20 {
            let spec = random_spec(&sigma, &mut rng, 3, 10);
            let text = format!(
                "{}({})",
                match spec.game_type {
                    GameType::Eventually => "F",
                    GameType::Always => "G",
                },
                spec.body
            );
            crate::parser::parse_spec_formula(&sigma, &text)
                .unwrap_or_else(|e| panic!("generated formula failed to parse: {} ({})", text, e));
        }
    }
}
