//! Quantified Boolean formulas (`QForm`, §3): `BForm` extended with
//! quantifier nodes `∃Q.F` and `∀Q.F` over a finite ordered list of
//! propositions `Q`.

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use super::bform::{BForm, BinOp};
use super::prop::Proposition;

/// The two quantifier kinds of §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    /// `∃`, written `thereis` in the original source.
    Exists,
    /// `∀`, written `foreach` in the original source.
    Forall,
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantifier::Exists => write!(f, "exists"),
            Quantifier::Forall => write!(f, "forall"),
        }
    }
}

/// A QBF formula (§3): `BForm` extended with `∃Q.F`/`∀Q.F`, where `Q` is a
/// finite ordered list of propositions. Quantifiers may occur nested
/// arbitrarily, not only in prenex position; [`crate::qbf::prenex`] pulls
/// them outward when a prenex form is needed (for CNF/QDIMACS emission).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QForm {
    Bool(bool),
    Prop(Proposition),
    Not(Rc<QForm>),
    Bin(BinOp, Rc<QForm>, Rc<QForm>),
    /// `Q Q1 Q2 .. Qn . F`
    Quant(Quantifier, Vec<Proposition>, Rc<QForm>),
}

impl QForm {
    pub fn top() -> Self {
        QForm::Bool(true)
    }
    pub fn bottom() -> Self {
        QForm::Bool(false)
    }
    pub fn prop(p: Proposition) -> Self {
        QForm::Prop(p)
    }
    pub fn not(self) -> Self {
        match self {
            QForm::Not(inner) => (*inner).clone(),
            other => QForm::Not(Rc::new(other)),
        }
    }
    pub fn and(self, other: Self) -> Self {
        QForm::Bin(BinOp::And, Rc::new(self), Rc::new(other))
    }
    pub fn or(self, other: Self) -> Self {
        QForm::Bin(BinOp::Or, Rc::new(self), Rc::new(other))
    }
    pub fn implies(self, other: Self) -> Self {
        QForm::Bin(BinOp::Implies, Rc::new(self), Rc::new(other))
    }
    pub fn iff(self, other: Self) -> Self {
        QForm::Bin(BinOp::Iff, Rc::new(self), Rc::new(other))
    }

    /// `∃Q. F` ("thereis" in the original source). An empty `vars` is
    /// dropped (the node would be a no-op binder).
    pub fn exists(vars: Vec<Proposition>, f: Self) -> Self {
        if vars.is_empty() {
            f
        } else {
            QForm::Quant(Quantifier::Exists, vars, Rc::new(f))
        }
    }

    /// `∀Q. F` ("foreach" in the original source).
    pub fn forall(vars: Vec<Proposition>, f: Self) -> Self {
        if vars.is_empty() {
            f
        } else {
            QForm::Quant(Quantifier::Forall, vars, Rc::new(f))
        }
    }

    /// Lifts a quantifier-free [`BForm`] into a `QForm`.
    pub fn from_bform(f: &BForm) -> Self {
        match f {
            BForm::Bool(b) => QForm::Bool(*b),
            BForm::Prop(p) => QForm::Prop(p.clone()),
            BForm::Not(inner) => QForm::Not(Rc::new(QForm::from_bform(inner))),
            BForm::Bin(op, l, r) => QForm::Bin(
                *op,
                Rc::new(QForm::from_bform(l)),
                Rc::new(QForm::from_bform(r)),
            ),
        }
    }

    /// Converts back to a [`BForm`], provided no quantifier nodes remain.
    /// Returns `None` otherwise.
    pub fn to_bform(&self) -> Option<BForm> {
        match self {
            QForm::Bool(b) => Some(BForm::Bool(*b)),
            QForm::Prop(p) => Some(BForm::Prop(p.clone())),
            QForm::Not(inner) => Some(BForm::Not(Rc::new(inner.to_bform()?))),
            QForm::Bin(op, l, r) => Some(BForm::Bin(
                *op,
                Rc::new(l.to_bform()?),
                Rc::new(r.to_bform()?),
            )),
            QForm::Quant(..) => None,
        }
    }

    /// Renames every free proposition by `f`, recursing into quantifier
    /// bound-variable lists element-wise (§4.2). Bound occurrences inside
    /// the matrix are renamed too since the renaming operators used in this
    /// crate (`primed`, `stepped`) are injective and applied uniformly, so
    /// this never causes capture.
    pub fn rename(&self, f: &impl Fn(&Proposition) -> Proposition) -> Self {
        match self {
            QForm::Bool(b) => QForm::Bool(*b),
            QForm::Prop(p) => QForm::Prop(f(p)),
            QForm::Not(inner) => QForm::Not(Rc::new(inner.rename(f))),
            QForm::Bin(op, l, r) => QForm::Bin(*op, Rc::new(l.rename(f)), Rc::new(r.rename(f))),
            QForm::Quant(q, vars, matrix) => QForm::Quant(
                *q,
                vars.iter().map(f).collect(),
                Rc::new(matrix.rename(f)),
            ),
        }
    }

    /// The set of free propositions, i.e. occurrences not bound by an
    /// enclosing quantifier.
    pub fn free_propositions(&self) -> HashSet<Proposition> {
        let mut out = HashSet::new();
        self.collect_free(&mut HashSet::new(), &mut out);
        out
    }

    fn collect_free(&self, bound: &mut HashSet<Proposition>, out: &mut HashSet<Proposition>) {
        match self {
            QForm::Bool(_) => {}
            QForm::Prop(p) => {
                if !bound.contains(p) {
                    out.insert(p.clone());
                }
            }
            QForm::Not(inner) => inner.collect_free(bound, out),
            QForm::Bin(_, l, r) => {
                l.collect_free(bound, out);
                r.collect_free(bound, out);
            }
            QForm::Quant(_, vars, matrix) => {
                let added: Vec<_> = vars
                    .iter()
                    .filter(|v| bound.insert((*v).clone()))
                    .cloned()
                    .collect();
                matrix.collect_free(bound, out);
                for v in added {
                    bound.remove(&v);
                }
            }
        }
    }
}

impl fmt::Display for QForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QForm::Bool(true) => write!(f, "true"),
            QForm::Bool(false) => write!(f, "false"),
            QForm::Prop(p) => write!(f, "{}", p),
            QForm::Not(inner) => write!(f, "!{}", inner),
            QForm::Bin(op, l, r) => {
                let sym = match op {
                    BinOp::And => "&",
                    BinOp::Or => "|",
                    BinOp::Implies => "->",
                    BinOp::Iff => "<->",
                };
                write!(f, "({} {} {})", l, sym, r)
            }
            QForm::Quant(q, vars, matrix) => {
                let names: Vec<_> = vars.iter().map(|p| p.to_string()).collect();
                write!(f, "{} {}. {}", q, names.join(" "), matrix)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::prop::Alphabet;

    #[test]
    fn rename_recurses_into_quantifier_lists() {
        let sigma = Alphabet::new();
        let a = sigma.proposition("a");
        let f = QForm::exists(vec![a.clone()], QForm::prop(a.clone()));
        let renamed = f.rename(&|p| crate::logic::prop::primed(p));
        match renamed {
            QForm::Quant(Quantifier::Exists, vars, matrix) => {
                assert_eq!(vars, vec![crate::logic::prop::primed(&a)]);
                assert_eq!(*matrix, QForm::Prop(crate::logic::prop::primed(&a)));
            }
            _ => panic!("expected a quantifier node"),
        }
    }

    #[test]
    fn free_propositions_excludes_bound() {
        let sigma = Alphabet::new();
        let a = sigma.proposition("a");
        let b = sigma.proposition("b");
        let f = QForm::exists(vec![a.clone()], QForm::prop(a).and(QForm::prop(b.clone())));
        let free = f.free_propositions();
        assert!(free.contains(&b));
        assert_eq!(free.len(), 1);
    }
}
