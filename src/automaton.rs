//! The symbolic automaton produced by the encoder (§3 `Aut`, §4.1).

use std::fmt;

use crate::logic::{BForm, Proposition, QForm};

/// `{inputs, outputs, vars : vec<Prop>, init : BForm, trans : QForm,
/// objective : BForm}` (§3).
///
/// Invariants upheld by construction in [`crate::encoder::encode`]:
/// - `vars` contains exactly the propositions produced by grounding (one
///   per Y/Z/O/H/S/T subterm of the NNF body, plus the outer Y/Z imposed by
///   the objective type).
/// - `init` and `objective` only mention `vars`.
/// - `trans` mentions only `vars`, `primed(vars)`, `inputs`, and `outputs`
///   (it starts out quantifier-free; solvers build quantified formulas on
///   top of it rather than mutating it).
#[derive(Debug, Clone)]
pub struct Automaton {
    pub inputs: Vec<Proposition>,
    pub outputs: Vec<Proposition>,
    pub vars: Vec<Proposition>,
    pub init: BForm,
    pub trans: QForm,
    pub objective: BForm,
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "inputs:")?;
        for p in &self.inputs {
            writeln!(f, "- {}", p)?;
        }
        writeln!(f)?;
        writeln!(f, "outputs:")?;
        for p in &self.outputs {
            writeln!(f, "- {}", p)?;
        }
        writeln!(f)?;
        writeln!(f, "vars:")?;
        for p in &self.vars {
            writeln!(f, "- {}", p)?;
        }
        writeln!(f)?;
        writeln!(f, "init:")?;
        writeln!(f, "- {}", self.init)?;
        writeln!(f)?;
        writeln!(f, "trans:")?;
        writeln!(f, "- {}", self.trans)?;
        writeln!(f)?;
        writeln!(f, "objective:")?;
        writeln!(f, "- {}", self.objective)?;
        Ok(())
    }
}
