//! CNF and QDIMACS emission (§4.3/§6): Tseitin-style conversion of a
//! prenex formula's quantifier-free matrix into clauses over variables
//! `1..N`, with quantifier blocks following the prenex order. Propositions
//! the Tseitin transform introduces (one per internal gate) are not part of
//! any original block, so they are appended as a trailing innermost
//! existential block, per §4.3.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::logic::bform::BinOp;
use crate::logic::qform::Quantifier;
use crate::logic::{BForm, Proposition, QForm};

/// A quantified Boolean formula in QDIMACS text form.
#[derive(Debug, Clone)]
pub struct Qdimacs {
    pub num_vars: usize,
    /// Quantifier blocks in prenex order, each a list of 1-based variable
    /// indices.
    pub blocks: Vec<(Quantifier, Vec<usize>)>,
    /// Clauses as signed DIMACS literals.
    pub clauses: Vec<Vec<i32>>,
}

impl fmt::Display for Qdimacs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "p cnf {} {}", self.num_vars, self.clauses.len())?;
        for (q, vars) in &self.blocks {
            let tag = match q {
                Quantifier::Exists => "e",
                Quantifier::Forall => "a",
            };
            write!(f, "{}", tag)?;
            for v in vars {
                write!(f, " {}", v)?;
            }
            writeln!(f, " 0")?;
        }
        for clause in &self.clauses {
            for lit in clause {
                write!(f, "{} ", lit)?;
            }
            writeln!(f, "0")?;
        }
        Ok(())
    }
}

pub(crate) struct TseitinCtx {
    var_of_prop: HashMap<Proposition, usize>,
    var_of_subform: HashMap<BForm, usize>,
    pub(crate) next_var: usize,
    pub(crate) clauses: Vec<Vec<i32>>,
}

impl TseitinCtx {
    pub(crate) fn new() -> Self {
        TseitinCtx {
            var_of_prop: HashMap::new(),
            var_of_subform: HashMap::new(),
            next_var: 0,
            clauses: Vec::new(),
        }
    }

    pub(crate) fn var_for_prop(&mut self, p: &Proposition) -> usize {
        if let Some(&v) = self.var_of_prop.get(p) {
            return v;
        }
        self.next_var += 1;
        let v = self.next_var;
        self.var_of_prop.insert(p.clone(), v);
        v
    }

    /// Tseitin-encodes `f`, returning the variable equivalent to `f` as a
    /// whole. Memoized on structural equality so shared subterms are
    /// encoded once.
    pub(crate) fn encode(&mut self, f: &BForm) -> usize {
        if let Some(&v) = self.var_of_subform.get(f) {
            return v;
        }
        let v = match f {
            BForm::Bool(b) => {
                self.next_var += 1;
                let v = self.next_var;
                self.clauses.push(vec![if *b { v as i32 } else { -(v as i32) }]);
                v
            }
            BForm::Prop(p) => self.var_for_prop(p),
            BForm::Not(inner) => {
                let iv = self.encode(inner);
                self.next_var += 1;
                let v = self.next_var;
                self.clauses.push(vec![-(v as i32), -(iv as i32)]);
                self.clauses.push(vec![v as i32, iv as i32]);
                v
            }
            BForm::Bin(op, l, r) => {
                let lv = self.encode(l) as i32;
                let rv = self.encode(r) as i32;
                self.next_var += 1;
                let v = self.next_var as i32;
                match op {
                    BinOp::And => {
                        self.clauses.push(vec![-v, lv]);
                        self.clauses.push(vec![-v, rv]);
                        self.clauses.push(vec![v, -lv, -rv]);
                    }
                    BinOp::Or => {
                        self.clauses.push(vec![v, -lv]);
                        self.clauses.push(vec![v, -rv]);
                        self.clauses.push(vec![-v, lv, rv]);
                    }
                    BinOp::Implies => {
                        self.clauses.push(vec![v, lv]);
                        self.clauses.push(vec![v, -rv]);
                        self.clauses.push(vec![-v, -lv, rv]);
                    }
                    BinOp::Iff => {
                        self.clauses.push(vec![-v, -lv, rv]);
                        self.clauses.push(vec![-v, lv, -rv]);
                        self.clauses.push(vec![v, lv, rv]);
                        self.clauses.push(vec![v, -lv, -rv]);
                    }
                }
                v as usize
            }
        };
        self.var_of_subform.insert(f.clone(), v);
        v
    }
}

/// Tseitin-encodes a quantifier-free formula on its own, asserting it true.
/// Used by the `varisat`-backed oracle to discharge single-block formulas
/// as plain SAT queries.
pub(crate) fn cnf_of_bform(f: &BForm) -> (usize, Vec<Vec<i32>>) {
    let mut ctx = TseitinCtx::new();
    let top = ctx.encode(f) as i32;
    ctx.clauses.push(vec![top]);
    (ctx.next_var, ctx.clauses)
}

fn split_prenex(f: &QForm) -> (Vec<(Quantifier, Vec<Proposition>)>, BForm) {
    match f {
        QForm::Quant(q, vars, matrix) => {
            let (mut prefix, m) = split_prenex(matrix);
            prefix.insert(0, (*q, vars.clone()));
            (prefix, m)
        }
        other => (
            Vec::new(),
            other
                .to_bform()
                .unwrap_or_else(|| unreachable!("cnf: formula is not in prenex form")),
        ),
    }
}

/// Converts a prenex formula (as produced by [`super::prenex::prenex`])
/// into QDIMACS (§4.3/§6).
pub fn tseitin_qdimacs(prenex_form: &QForm) -> Qdimacs {
    let (prefix, matrix) = split_prenex(prenex_form);

    let mut ctx = TseitinCtx::new();
    let mut blocks: Vec<(Quantifier, Vec<usize>)> = Vec::with_capacity(prefix.len());
    for (q, vars) in &prefix {
        let idxs: Vec<usize> = vars.iter().map(|p| ctx.var_for_prop(p)).collect();
        blocks.push((*q, idxs));
    }

    let top = ctx.encode(&matrix) as i32;
    ctx.clauses.push(vec![top]);

    let declared: HashSet<usize> = blocks.iter().flat_map(|(_, vs)| vs.iter().copied()).collect();
    let mut extra: Vec<usize> = (1..=ctx.next_var).filter(|v| !declared.contains(v)).collect();
    extra.sort_unstable();
    if !extra.is_empty() {
        blocks.push((Quantifier::Exists, extra));
    }

    Qdimacs {
        num_vars: ctx.next_var,
        blocks,
        clauses: ctx.clauses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::Alphabet;

    #[test]
    fn every_clause_variable_is_declared_in_exactly_one_block() {
        let sigma = Alphabet::new();
        let a = sigma.proposition("a");
        let b = sigma.proposition("b");
        let f = QForm::exists(
            vec![a.clone()],
            QForm::forall(vec![b.clone()], QForm::prop(a).or(QForm::prop(b))),
        );
        let prenexed = crate::qbf::prenex::prenex(&f);
        let qdimacs = tseitin_qdimacs(&prenexed);

        let mut seen: HashMap<usize, usize> = HashMap::new();
        for (_, vars) in &qdimacs.blocks {
            for v in vars {
                *seen.entry(*v).or_insert(0) += 1;
            }
        }
        for clause in &qdimacs.clauses {
            for lit in clause {
                let v = lit.unsigned_abs() as usize;
                assert_eq!(*seen.get(&v).unwrap_or(&0), 1, "variable {} not in exactly one block", v);
            }
        }
    }

    #[test]
    fn block_order_follows_prenex_order() {
        let sigma = Alphabet::new();
        let a = sigma.proposition("a");
        let b = sigma.proposition("b");
        let f = QForm::forall(vec![a.clone()], QForm::exists(vec![b.clone()], QForm::prop(a).iff(QForm::prop(b))));
        let prenexed = crate::qbf::prenex::prenex(&f);
        let qdimacs = tseitin_qdimacs(&prenexed);
        assert_eq!(qdimacs.blocks[0].0, Quantifier::Forall);
        assert_eq!(qdimacs.blocks[1].0, Quantifier::Exists);
    }
}
