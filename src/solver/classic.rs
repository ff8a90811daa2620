//! The QBF-fixpoint "classic" solver (§4.4), mirroring the original's
//! `game/classic.cpp`: a Kleene iteration over quantified Boolean formulas,
//! discharged step by step through a [`QbfOracle`].
//!
//! The original does not tag iterations with an explicit step index — it
//! reuses the same proposition identities (`outputs`, `inputs`,
//! `primed(vars)`) on every iteration and relies on quantifier nesting to
//! keep them apart, resolved afterwards by [`flatten`]. This solver follows
//! that construction rather than the step-indexed `stepped(k)` variant,
//! since it is what the grounded source actually does and it reuses the
//! flatten/prenex infrastructure meaningfully.

use crate::automaton::Automaton;
use crate::logic::{primed, rename_all, Alphabet, QForm};
use crate::parser::GameType;
use crate::qbf::{flatten, EnumerationOracle, OracleResult, QbfOracle, VarisatOracle};
use crate::solver::Cancellation;
use crate::Status;

/// Solves reachability/safety games by QBF fixpoint iteration (§4.4).
///
/// Generic over the oracle backend so tests can swap in
/// [`EnumerationOracle`] for exactness while production code defaults to
/// [`VarisatOracle`].
pub struct ClassicSolver<O: QbfOracle = VarisatOracle> {
    oracle: O,
}

impl ClassicSolver<VarisatOracle> {
    pub fn new() -> Self {
        ClassicSolver {
            oracle: VarisatOracle::new(),
        }
    }
}

impl Default for ClassicSolver<VarisatOracle> {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassicSolver<EnumerationOracle> {
    /// An exact variant backed by the enumeration oracle, useful for small
    /// automata or as a cross-check against [`VarisatOracle`] (§8 invariant
    /// 6).
    pub fn exact() -> Self {
        ClassicSolver {
            oracle: EnumerationOracle,
        }
    }
}

impl<O: QbfOracle> ClassicSolver<O> {
    pub fn with_oracle(oracle: O) -> Self {
        ClassicSolver { oracle }
    }

    /// `step(W) = W ⊕ ∃outputs.∀inputs.∀primed(vars). (trans → primed(W))`,
    /// `⊕ = ∨` for reachability and `⊕ = ∧` for safety (§4.4). The
    /// quantifier nesting this introduces is resolved by [`flatten`] so
    /// that the next call to [`Self::fixpoint_step`] starts from a formula
    /// free of accidental shadowing.
    fn fixpoint_step(&self, sigma: &Alphabet, aut: &Automaton, game_type: GameType, previous: &QForm) -> QForm {
        let primed_previous = previous.rename(&|p| {
            if aut.vars.contains(p) {
                primed(p)
            } else {
                p.clone()
            }
        });
        let primed_vars = rename_all(&aut.vars, |p| primed(p));
        let shell = QForm::forall(primed_vars, aut.trans.clone().implies(primed_previous));
        let shell = QForm::forall(aut.inputs.clone(), shell);
        let shell = QForm::exists(aut.outputs.clone(), shell);

        let combined = match game_type {
            GameType::Eventually => previous.clone().or(shell),
            GameType::Always => previous.clone().and(shell),
        };

        let mut gen = sigma.fresh_generator();
        flatten(&mut gen, &combined)
    }

    /// Closed formula asking whether the fixpoint has stabilized:
    /// `∀vars. (fp -> prevfp)` for reachability, `∀vars. (prevfp -> fp)`
    /// for safety. `fp`/`prevfp` are themselves closed (quantified over
    /// outputs/inputs/primed-vars internally), so the only free variables
    /// left are `vars`, which this closes off.
    fn test(&self, aut: &Automaton, game_type: GameType, fp: &QForm, prevfp: &QForm) -> QForm {
        let body = match game_type {
            GameType::Eventually => fp.clone().implies(prevfp.clone()),
            GameType::Always => prevfp.clone().implies(fp.clone()),
        };
        QForm::forall(aut.vars.clone(), body)
    }

    /// Closed formula asking whether the initial state is won:
    /// `∃vars. (fp & init)`.
    fn win(&self, aut: &Automaton, fp: &QForm) -> QForm {
        let init = QForm::from_bform(&aut.init);
        QForm::exists(aut.vars.clone(), fp.clone().and(init))
    }

    /// The fixpoint test formula (§4.4) after a single iteration, i.e. the
    /// first query the Kleene loop asks the oracle. Exposed for the CLI's
    /// `clausify` mode (§0.1/§6), which emits this formula's QDIMACS
    /// encoding instead of driving it through the oracle.
    pub fn first_test_formula(&self, sigma: &Alphabet, aut: &Automaton, game_type: GameType) -> QForm {
        let prevfp = QForm::from_bform(&aut.objective);
        let fp = self.fixpoint_step(sigma, aut, game_type, &prevfp);
        self.test(aut, game_type, &fp, &prevfp)
    }

    /// Runs the Kleene iteration to convergence, or until `cancel` reports
    /// true, sampled once per iteration (§5).
    pub fn solve(
        &self,
        sigma: &Alphabet,
        aut: &Automaton,
        game_type: GameType,
        cancel: &dyn Cancellation,
    ) -> Status {
        let mut prevfp = QForm::from_bform(&aut.objective);
        let mut fp = self.fixpoint_step(sigma, aut, game_type, &prevfp);

        loop {
            if cancel.is_cancelled() {
                return Status::Unknown;
            }
            let test_formula = self.test(aut, game_type, &fp, &prevfp);
            match self.oracle.is_sat(&test_formula) {
                OracleResult::Unknown => return Status::Unknown,
                OracleResult::Sat => break,
                OracleResult::Unsat => {
                    prevfp = fp;
                    fp = self.fixpoint_step(sigma, aut, game_type, &prevfp);
                }
            }
        }

        match self.oracle.is_sat(&self.win(aut, &fp)) {
            OracleResult::Sat => Status::Realizable,
            OracleResult::Unsat => Status::Unrealizable,
            OracleResult::Unknown => Status::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;
    use crate::logic::Alphabet;
    use crate::solver::Never;
    use crate::spec::Spec;

    fn solve_text(sigma: &Alphabet, text: &str, inputs: &[&str]) -> Status {
        let declared: Vec<String> = inputs.iter().map(|s| s.to_string()).collect();
        let spec = Spec::parse(sigma, text, &declared).expect("spec parses");
        let aut = encode(sigma, &spec);
        let solver = ClassicSolver::exact();
        solver.solve(sigma, &aut, spec.game_type, &Never)
    }

    #[test]
    fn trivially_true_reachability_objective_is_realizable() {
        let sigma = Alphabet::new();
        assert_eq!(solve_text(&sigma, "F(true)", &[]), Status::Realizable);
    }

    #[test]
    fn trivially_false_reachability_objective_is_unrealizable() {
        let sigma = Alphabet::new();
        assert_eq!(solve_text(&sigma, "F(false)", &[]), Status::Unrealizable);
    }

    #[test]
    fn trivially_true_safety_objective_is_realizable() {
        let sigma = Alphabet::new();
        assert_eq!(solve_text(&sigma, "G(true)", &[]), Status::Realizable);
    }

    #[test]
    fn trivially_false_safety_objective_is_unrealizable() {
        let sigma = Alphabet::new();
        assert_eq!(solve_text(&sigma, "G(false)", &[]), Status::Unrealizable);
    }

    #[test]
    fn output_controlled_reachability_is_realizable() {
        let sigma = Alphabet::new();
        // the agent can always just set `a` to witness F(a) on the first step
        assert_eq!(solve_text(&sigma, "F(a)", &[]), Status::Realizable);
    }

    #[test]
    fn input_controlled_safety_of_a_single_step_is_unrealizable() {
        let sigma = Alphabet::new();
        // `a` is an input the environment can always falsify, so G(a) is unrealizable
        assert_eq!(solve_text(&sigma, "G(a)", &["a"]), Status::Unrealizable);
    }
}
