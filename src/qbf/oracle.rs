//! The external `QbfSolver` oracle (§4.3, §9 "oracle injection"): decides
//! `Sat | Unsat | Unknown` for a closed [`QForm`].
//!
//! Two backends are provided. [`EnumerationOracle`] is an exact recursive
//! decision procedure: it always terminates on the closed formulas the
//! classic solver builds, at the cost of enumerating `2^k` assignments per
//! quantifier block of size `k`. [`VarisatOracle`] discharges the common
//! case — a formula with a single quantifier block — as a plain SAT query
//! against `varisat`, falling back to [`EnumerationOracle`] whenever the
//! formula has real quantifier alternation. Neither backend is a stand-in
//! for a real external tool: both are complete, independently-justifiable
//! implementations of the same narrow interface, so further backends can be
//! swapped in without touching the solvers above them.

use std::collections::HashMap;
use std::rc::Rc;

use crate::logic::qform::Quantifier;
use crate::logic::{Proposition, QForm};

use super::cnf::cnf_of_bform;

/// The result of an oracle query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleResult {
    Sat,
    Unsat,
    Unknown,
}

/// Narrow interface behind which SAT/QBF back-ends are swapped (§9).
pub trait QbfOracle {
    fn is_sat(&self, f: &QForm) -> OracleResult;

    /// Validity is satisfiability of the negation, flipped.
    fn is_valid(&self, f: &QForm) -> OracleResult {
        match self.is_sat(&f.clone().not()) {
            OracleResult::Sat => OracleResult::Unsat,
            OracleResult::Unsat => OracleResult::Sat,
            OracleResult::Unknown => OracleResult::Unknown,
        }
    }
}

/// Exact oracle by recursive quantifier enumeration. Terminates on every
/// closed formula (no free propositions); panics via `unreachable!` if one
/// sneaks through, since that is a construction bug in the caller, not a
/// property of the input formula.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnumerationOracle;

impl QbfOracle for EnumerationOracle {
    fn is_sat(&self, f: &QForm) -> OracleResult {
        if decide(f) {
            OracleResult::Sat
        } else {
            OracleResult::Unsat
        }
    }
}

fn decide(f: &QForm) -> bool {
    match f {
        QForm::Bool(b) => *b,
        QForm::Prop(p) => unreachable!(
            "free proposition {} passed to the enumeration oracle; formula must be closed",
            p
        ),
        QForm::Not(inner) => !decide(inner),
        QForm::Bin(op, l, r) => {
            use crate::logic::bform::BinOp;
            let lv = decide(l);
            match op {
                BinOp::And => lv && decide(r),
                BinOp::Or => lv || decide(r),
                BinOp::Implies => !lv || decide(r),
                BinOp::Iff => lv == decide(r),
            }
        }
        QForm::Quant(Quantifier::Exists, vars, matrix) => {
            enumerate_assignments(vars).any(|a| decide(&assign(matrix, &a)))
        }
        QForm::Quant(Quantifier::Forall, vars, matrix) => {
            enumerate_assignments(vars).all(|a| decide(&assign(matrix, &a)))
        }
    }
}

fn enumerate_assignments(vars: &[Proposition]) -> impl Iterator<Item = HashMap<Proposition, bool>> + '_ {
    debug_assert!(vars.len() < 32, "enumeration oracle is exponential; this block is implausibly large");
    let n = vars.len() as u32;
    (0u32..(1u32 << n)).map(move |mask| {
        vars.iter()
            .enumerate()
            .map(|(i, p)| (p.clone(), (mask >> i) & 1 == 1))
            .collect()
    })
}

fn assign(f: &QForm, values: &HashMap<Proposition, bool>) -> QForm {
    match f {
        QForm::Bool(b) => QForm::Bool(*b),
        QForm::Prop(p) => match values.get(p) {
            Some(b) => QForm::Bool(*b),
            None => QForm::Prop(p.clone()),
        },
        QForm::Not(inner) => QForm::Not(Rc::new(assign(inner, values))),
        QForm::Bin(op, l, r) => QForm::Bin(*op, Rc::new(assign(l, values)), Rc::new(assign(r, values))),
        QForm::Quant(q, vars, matrix) => {
            let mut inner_values = values.clone();
            for v in vars {
                inner_values.remove(v);
            }
            QForm::Quant(*q, vars.clone(), Rc::new(assign(matrix, &inner_values)))
        }
    }
}

/// Discharges single-quantifier-block formulas as plain SAT via `varisat`,
/// falling back to [`EnumerationOracle`] for real quantifier alternation.
pub struct VarisatOracle {
    fallback: EnumerationOracle,
}

impl Default for VarisatOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl VarisatOracle {
    pub fn new() -> Self {
        VarisatOracle {
            fallback: EnumerationOracle,
        }
    }
}

impl QbfOracle for VarisatOracle {
    fn is_sat(&self, f: &QForm) -> OracleResult {
        match f {
            QForm::Quant(Quantifier::Exists, _vars, matrix) => match matrix.to_bform() {
                Some(bform) => sat_via_varisat(&bform),
                None => self.fallback.is_sat(f),
            },
            QForm::Quant(Quantifier::Forall, _vars, matrix) => match matrix.to_bform() {
                Some(bform) => match sat_via_varisat(&bform.not()) {
                    OracleResult::Sat => OracleResult::Unsat,
                    OracleResult::Unsat => OracleResult::Sat,
                    OracleResult::Unknown => OracleResult::Unknown,
                },
                None => self.fallback.is_sat(f),
            },
            _ => match f.to_bform() {
                Some(bform) => sat_via_varisat(&bform),
                None => self.fallback.is_sat(f),
            },
        }
    }
}

fn sat_via_varisat(bform: &crate::logic::BForm) -> OracleResult {
    let (_num_vars, clauses) = cnf_of_bform(bform);
    let mut solver = varisat::Solver::new();
    for clause in &clauses {
        let lits: Vec<varisat::Lit> = clause
            .iter()
            .map(|&lit| varisat::Lit::from_dimacs(lit as isize))
            .collect();
        solver.add_clause(&lits);
    }
    match solver.solve() {
        Ok(true) => OracleResult::Sat,
        Ok(false) => OracleResult::Unsat,
        Err(_) => OracleResult::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::Alphabet;

    #[test]
    fn enumeration_oracle_decides_trivial_validity() {
        let sigma = Alphabet::new();
        let a = sigma.proposition("a");
        let f = QForm::forall(vec![a.clone()], QForm::prop(a.clone()).or(QForm::prop(a).not()));
        assert_eq!(EnumerationOracle.is_sat(&f), OracleResult::Sat);
    }

    #[test]
    fn enumeration_oracle_detects_unsat_existential() {
        let sigma = Alphabet::new();
        let a = sigma.proposition("a");
        let f = QForm::exists(vec![a.clone()], QForm::prop(a.clone()).and(QForm::prop(a).not()));
        assert_eq!(EnumerationOracle.is_sat(&f), OracleResult::Unsat);
    }

    #[test]
    fn varisat_oracle_agrees_with_enumeration_on_single_block() {
        let sigma = Alphabet::new();
        let a = sigma.proposition("a");
        let b = sigma.proposition("b");
        let f = QForm::exists(
            vec![a.clone(), b.clone()],
            QForm::prop(a).iff(QForm::prop(b)),
        );
        assert_eq!(VarisatOracle::new().is_sat(&f), EnumerationOracle.is_sat(&f));
    }

    #[test]
    fn varisat_oracle_falls_back_on_alternation() {
        let sigma = Alphabet::new();
        let a = sigma.proposition("a");
        let b = sigma.proposition("b");
        let f = QForm::forall(
            vec![a.clone()],
            QForm::exists(vec![b.clone()], QForm::prop(a).iff(QForm::prop(b))),
        );
        assert_eq!(VarisatOracle::new().is_sat(&f), EnumerationOracle.is_sat(&f));
    }
}
