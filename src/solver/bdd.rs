//! The BDD attractor/controllable-predecessor "bdd" solver (§4.5).
//!
//! `Pre(S) = QI(S[x := τ(x)])` is realized here as the standard relational-
//! product formulation `∃primed(vars). (trans ∧ shift_to_primed(S))`, which
//! coincides with the substitution `S[x := τ(x)]` precisely because `trans`
//! is functional (`xᵢ' ↔ τᵢ` for each state variable, per [`crate::encoder`]).
//! This sidesteps a dedicated vector-compose primitive that
//! `biodivine-lib-bdd` does not expose, at the cost of one extra
//! existential projection; see `DESIGN.md`.

use biodivine_lib_bdd::{Bdd, BddVariable};

use crate::automaton::Automaton;
use crate::parser::GameType;
use crate::solver::varmgr::VarManager;
use crate::solver::Cancellation;
use crate::Status;

/// Who moves first in the underlying game (§4.5's quantifier-elimination
/// policy table). Defaults to [`StartingPlayer::Agent`], matching the
/// classic solver's `∃outputs.∀inputs` convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartingPlayer {
    Agent,
    Environment,
}

/// Solves reachability/safety games by BDD attractor computation (§4.5).
pub struct BddSolver {
    starting_player: StartingPlayer,
}

impl Default for BddSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl BddSolver {
    pub fn new() -> Self {
        BddSolver {
            starting_player: StartingPlayer::Agent,
        }
    }

    /// Uses the environment-first quantifier-elimination policy instead of
    /// the default agent-first one. Per `DESIGN.md`, this variant is
    /// transcribed exactly from §4.5's conjectural pseudocode and is not
    /// independently verified against literature.
    pub fn with_starting_player(starting_player: StartingPlayer) -> Self {
        BddSolver { starting_player }
    }

    pub fn solve(&self, aut: &Automaton, game_type: GameType, cancel: &dyn Cancellation) -> Status {
        let vm = VarManager::new(aut);
        let trans = vm.bdd_of(
            &aut.trans
                .to_bform()
                .unwrap_or_else(|| unreachable!("automaton trans must be quantifier-free")),
        );
        let goal = vm.bdd_of(&aut.objective);
        let init = vm.bdd_of(&aut.init);

        match game_type {
            GameType::Eventually => self.reachability_loop(&vm, &trans, &goal, &init, cancel),
            GameType::Always => self.safety_loop(&vm, &trans, &goal, &init, cancel),
        }
    }

    /// `Pre(S) = QI(S[x := τ(x)])`, `QI` depending on [`Self::starting_player`]
    /// per §4.5's table.
    fn pre(&self, vm: &VarManager, trans: &Bdd, target: &Bdd) -> Bdd {
        let target_primed = vm.shift_to_primed(target);
        let reach_one_step = trans.and(&target_primed).project(&vm.primed_state_cube);
        match self.starting_player {
            StartingPlayer::Agent => {
                let after_inputs = for_all(&reach_one_step, &vm.input_cube);
                after_inputs.project(&vm.output_cube)
            }
            StartingPlayer::Environment => {
                let after_outputs = reach_one_step.project(&vm.output_cube);
                for_all(&after_outputs, &vm.input_cube)
            }
        }
    }

    /// Drops every non-state variable that may remain, to land back in
    /// state-cube space.
    fn project_to_states(&self, vm: &VarManager, bdd: &Bdd) -> Bdd {
        let mut extra = vm.input_cube.clone();
        extra.extend(vm.output_cube.iter().copied());
        extra.extend(vm.primed_state_cube.iter().copied());
        bdd.project(&extra)
    }

    fn reachability_loop(
        &self,
        vm: &VarManager,
        trans: &Bdd,
        goal: &Bdd,
        init: &Bdd,
        cancel: &dyn Cancellation,
    ) -> Status {
        let mut s = goal.clone();
        let mut m = goal.clone();
        loop {
            if cancel.is_cancelled() {
                return Status::Unknown;
            }
            let p = self.pre(vm, trans, &s);
            let (s_next, m_next) = match self.starting_player {
                StartingPlayer::Agent => {
                    let m_next = m.or(&s.not().and(&p));
                    let s_next = self.project_to_states(vm, &m_next);
                    (s_next, m_next)
                }
                StartingPlayer::Environment => {
                    let n = self.project_to_states(vm, &p);
                    let s_next = s.or(&n);
                    let m_next = m.or(&s.not().and(&n).and(&p));
                    (s_next, m_next)
                }
            };
            if entails(init, &s_next) {
                return Status::Realizable;
            }
            if s_next == s {
                return Status::Unrealizable;
            }
            s = s_next;
            m = m_next;
        }
    }

    fn safety_loop(
        &self,
        vm: &VarManager,
        trans: &Bdd,
        goal: &Bdd,
        init: &Bdd,
        cancel: &dyn Cancellation,
    ) -> Status {
        let mut s = goal.clone();
        let mut m = goal.clone();
        loop {
            if cancel.is_cancelled() {
                return Status::Unknown;
            }
            let p = self.pre(vm, trans, &s);
            let m_next = m.and(&p);
            let s_next = self.project_to_states(vm, &m_next);
            if !entails(init, &s_next) {
                return Status::Unrealizable;
            }
            if s_next == s {
                return Status::Realizable;
            }
            s = s_next;
            m = m_next;
        }
    }
}

/// `∀vars. F`, via De Morgan over the existential projection the engine
/// exposes natively (`biodivine-lib-bdd` has no direct universal-
/// quantification primitive).
fn for_all(f: &Bdd, vars: &[BddVariable]) -> Bdd {
    f.not().project(vars).not()
}

/// `a ⊨ b`, i.e. `a → b` is a tautology.
fn entails(a: &Bdd, b: &Bdd) -> bool {
    a.imp(b).is_true()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;
    use crate::logic::Alphabet;
    use crate::solver::Never;
    use crate::spec::Spec;

    fn solve_text(text: &str, inputs: &[&str]) -> Status {
        let sigma = Alphabet::new();
        let declared: Vec<String> = inputs.iter().map(|s| s.to_string()).collect();
        let spec = Spec::parse(&sigma, text, &declared).expect("spec parses");
        let aut = encode(&sigma, &spec);
        BddSolver::new().solve(&aut, spec.game_type, &Never)
    }

    #[test]
    fn trivially_true_reachability_objective_is_realizable() {
        assert_eq!(solve_text("F(true)", &[]), Status::Realizable);
    }

    #[test]
    fn trivially_false_reachability_objective_is_unrealizable() {
        assert_eq!(solve_text("F(false)", &[]), Status::Unrealizable);
    }

    #[test]
    fn trivially_true_safety_objective_is_realizable() {
        assert_eq!(solve_text("G(true)", &[]), Status::Realizable);
    }

    #[test]
    fn trivially_false_safety_objective_is_unrealizable() {
        assert_eq!(solve_text("G(false)", &[]), Status::Unrealizable);
    }

    #[test]
    fn environment_first_agrees_with_agent_first_on_a_trivial_goal() {
        let sigma = Alphabet::new();
        let spec = Spec::parse(&sigma, "F(true)", &[]).expect("spec parses");
        let aut = encode(&sigma, &spec);
        let agent = BddSolver::new().solve(&aut, spec.game_type, &Never);
        let env = BddSolver::with_starting_player(StartingPlayer::Environment)
            .solve(&aut, spec.game_type, &Never);
        assert_eq!(agent, env);
    }
}
