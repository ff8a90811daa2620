//! Prenex normalization (§4.3): pulls quantifiers outward, preserving
//! semantics, so that CNF/QDIMACS emission (§4.3/§6) has a single
//! quantifier-free matrix to work with.
//!
//! Assumes the input has already been through [`super::flatten::flatten`],
//! which is what licenses the `Q ∩ free(G) = ∅` side condition the pulling
//! rules below rely on.

use std::rc::Rc;

use crate::logic::bform::BinOp as BBinOp;
use crate::logic::qform::Quantifier;
use crate::logic::{Proposition, QForm};

/// Pulls every quantifier in `f` to the front, returning an equivalent
/// prenex formula. `↔` is desugared into two implications first, since
/// prenex pulling has no direct rule for it.
pub fn prenex(f: &QForm) -> QForm {
    let desugared = desugar_iff(f);
    let (prefix, matrix) = pull(&desugared);
    let merged = merge_adjacent(prefix);
    merged.into_iter().rev().fold(matrix, |acc, (q, vars)| match q {
        Quantifier::Exists => QForm::exists(vars, acc),
        Quantifier::Forall => QForm::forall(vars, acc),
    })
}

fn flip(q: Quantifier) -> Quantifier {
    match q {
        Quantifier::Exists => Quantifier::Forall,
        Quantifier::Forall => Quantifier::Exists,
    }
}

type Prefix = Vec<(Quantifier, Vec<Proposition>)>;

fn pull(f: &QForm) -> (Prefix, QForm) {
    match f {
        QForm::Bool(_) | QForm::Prop(_) => (Vec::new(), f.clone()),
        QForm::Not(inner) => {
            let (prefix, matrix) = pull(inner);
            let flipped = prefix.into_iter().map(|(q, vars)| (flip(q), vars)).collect();
            (flipped, matrix.not())
        }
        QForm::Bin(BBinOp::And, l, r) => combine(l, r, QForm::and),
        QForm::Bin(BBinOp::Or, l, r) => combine(l, r, QForm::or),
        QForm::Bin(BBinOp::Implies, l, r) => {
            let (lprefix, lmatrix) = pull(l);
            let (rprefix, rmatrix) = pull(r);
            let mut prefix: Prefix = lprefix.into_iter().map(|(q, vars)| (flip(q), vars)).collect();
            prefix.extend(rprefix);
            (prefix, lmatrix.not().or(rmatrix))
        }
        QForm::Bin(BBinOp::Iff, ..) => {
            unreachable!("prenex: iff must be desugared before pulling quantifiers")
        }
        QForm::Quant(q, vars, matrix) => {
            let (inner_prefix, inner_matrix) = pull(matrix);
            let mut prefix = vec![(*q, vars.clone())];
            prefix.extend(inner_prefix);
            (prefix, inner_matrix)
        }
    }
}

fn combine(l: &QForm, r: &QForm, join: impl FnOnce(QForm, QForm) -> QForm) -> (Prefix, QForm) {
    let (lprefix, lmatrix) = pull(l);
    let (rprefix, rmatrix) = pull(r);
    let mut prefix = lprefix;
    prefix.extend(rprefix);
    (prefix, join(lmatrix, rmatrix))
}

/// Merges consecutive same-quantifier blocks, giving a tighter QDIMACS
/// block sequence without changing meaning.
fn merge_adjacent(prefix: Prefix) -> Prefix {
    let mut merged: Prefix = Vec::new();
    for (q, vars) in prefix {
        if vars.is_empty() {
            continue;
        }
        if let Some((last_q, last_vars)) = merged.last_mut() {
            if *last_q == q {
                last_vars.extend(vars);
                continue;
            }
        }
        merged.push((q, vars));
    }
    merged
}

fn desugar_iff(f: &QForm) -> QForm {
    match f {
        QForm::Bool(b) => QForm::Bool(*b),
        QForm::Prop(p) => QForm::Prop(p.clone()),
        QForm::Not(inner) => QForm::Not(Rc::new(desugar_iff(inner))),
        QForm::Bin(BBinOp::Iff, l, r) => {
            let l2 = desugar_iff(l);
            let r2 = desugar_iff(r);
            l2.clone().implies(r2.clone()).and(r2.implies(l2))
        }
        QForm::Bin(op, l, r) => QForm::Bin(*op, Rc::new(desugar_iff(l)), Rc::new(desugar_iff(r))),
        QForm::Quant(q, vars, matrix) => QForm::Quant(*q, vars.clone(), Rc::new(desugar_iff(matrix))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::Alphabet;

    fn is_prenex(f: &QForm) -> bool {
        match f {
            QForm::Quant(_, _, matrix) => is_prenex(matrix),
            other => other.to_bform().is_some(),
        }
    }

    #[test]
    fn result_is_always_prenex() {
        let sigma = Alphabet::new();
        let a = sigma.proposition("a");
        let b = sigma.proposition("b");
        let f = QForm::exists(vec![a.clone()], QForm::prop(a.clone()))
            .and(QForm::forall(vec![b.clone()], QForm::prop(b)).not());
        let p = prenex(&f);
        assert!(is_prenex(&p));
    }

    #[test]
    fn negated_existential_becomes_universal() {
        let sigma = Alphabet::new();
        let a = sigma.proposition("a");
        let f = QForm::exists(vec![a.clone()], QForm::prop(a)).not();
        let p = prenex(&f);
        match p {
            QForm::Quant(Quantifier::Forall, ..) => {}
            other => panic!("expected a forall prefix, got {:?}", other),
        }
    }

    #[test]
    fn implication_antecedent_flips_quantifier() {
        let sigma = Alphabet::new();
        let a = sigma.proposition("a");
        let f = QForm::exists(vec![a.clone()], QForm::prop(a.clone())).implies(QForm::prop(a));
        let p = prenex(&f);
        match p {
            QForm::Quant(Quantifier::Forall, ..) => {}
            other => panic!("expected the antecedent's exists to flip to forall, got {:?}", other),
        }
    }
}
