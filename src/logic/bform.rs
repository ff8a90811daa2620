//! Propositional Boolean formulas (`BForm`), shared by the automaton's
//! `init`/`trans`/`objective` fields, the QBF matrix, and the decision
//! diagram translation.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::prop::Proposition;

/// A Boolean connective, used by both [`BForm::Binary`] and, via
/// [`crate::logic::qform::QForm`], the QBF matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    And,
    Or,
    Implies,
    Iff,
}

/// A propositional Boolean formula: `{⊥, ⊤, proposition, ¬, ∧, ∨, →, ↔}`
/// (§3).
///
/// Represented as an `Rc`-shared tree so that the grounding map in the
/// encoder and the memoization tables in the QBF/diagram translation can
/// key on structural identity cheaply (pointer equality after construction
/// via the smart constructors below, which never rebuild an existing
/// subtree).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BForm {
    Bool(bool),
    Prop(Proposition),
    Not(Rc<BForm>),
    Bin(BinOp, Rc<BForm>, Rc<BForm>),
}

impl BForm {
    pub fn top() -> Self {
        BForm::Bool(true)
    }
    pub fn bottom() -> Self {
        BForm::Bool(false)
    }
    pub fn prop(p: Proposition) -> Self {
        BForm::Prop(p)
    }
    pub fn not(self) -> Self {
        match self {
            BForm::Not(inner) => (*inner).clone(),
            other => BForm::Not(Rc::new(other)),
        }
    }
    pub fn and(self, other: Self) -> Self {
        BForm::Bin(BinOp::And, Rc::new(self), Rc::new(other))
    }
    pub fn or(self, other: Self) -> Self {
        BForm::Bin(BinOp::Or, Rc::new(self), Rc::new(other))
    }
    pub fn implies(self, other: Self) -> Self {
        BForm::Bin(BinOp::Implies, Rc::new(self), Rc::new(other))
    }
    pub fn iff(self, other: Self) -> Self {
        BForm::Bin(BinOp::Iff, Rc::new(self), Rc::new(other))
    }

    /// Collects every proposition occurring in the formula, in no
    /// particular order (callers that need determinism sort the result;
    /// see [`super::prop::canonical_sort`]).
    pub fn propositions(&self) -> Vec<Proposition> {
        let mut out = Vec::new();
        self.collect_propositions(&mut out);
        out
    }

    fn collect_propositions(&self, out: &mut Vec<Proposition>) {
        match self {
            BForm::Bool(_) => {}
            BForm::Prop(p) => out.push(p.clone()),
            BForm::Not(f) => f.collect_propositions(out),
            BForm::Bin(_, l, r) => {
                l.collect_propositions(out);
                r.collect_propositions(out);
            }
        }
    }

    /// Evaluates the formula under a total assignment. Panics if a
    /// proposition occurring in the formula is not assigned: the formulas
    /// this crate evaluates are always closed with respect to the
    /// assignments it builds (grounded automaton formulas, or QBF matrices
    /// after full quantifier instantiation).
    pub fn eval(&self, assignment: &HashMap<Proposition, bool>) -> bool {
        match self {
            BForm::Bool(b) => *b,
            BForm::Prop(p) => *assignment
                .get(p)
                .unwrap_or_else(|| panic!("unassigned proposition {} during evaluation", p)),
            BForm::Not(f) => !f.eval(assignment),
            BForm::Bin(op, l, r) => {
                let lv = l.eval(assignment);
                let rv = r.eval(assignment);
                match op {
                    BinOp::And => lv && rv,
                    BinOp::Or => lv || rv,
                    BinOp::Implies => !lv || rv,
                    BinOp::Iff => lv == rv,
                }
            }
        }
    }

    /// Renames every proposition in the formula via `f`.
    pub fn rename(&self, f: &impl Fn(&Proposition) -> Proposition) -> Self {
        match self {
            BForm::Bool(b) => BForm::Bool(*b),
            BForm::Prop(p) => BForm::Prop(f(p)),
            BForm::Not(inner) => BForm::Not(Rc::new(inner.rename(f))),
            BForm::Bin(op, l, r) => BForm::Bin(*op, Rc::new(l.rename(f)), Rc::new(r.rename(f))),
        }
    }
}

impl fmt::Display for BForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BForm::Bool(true) => write!(f, "true"),
            BForm::Bool(false) => write!(f, "false"),
            BForm::Prop(p) => write!(f, "{}", p),
            BForm::Not(inner) => write!(f, "!{}", inner),
            BForm::Bin(op, l, r) => {
                let sym = match op {
                    BinOp::And => "&",
                    BinOp::Or => "|",
                    BinOp::Implies => "->",
                    BinOp::Iff => "<->",
                };
                write!(f, "({} {} {})", l, sym, r)
            }
        }
    }
}

/// Builds the conjunction of `f(item)` over `items`, short-circuiting to
/// `true` on an empty iterator. Mirrors `black::big_and` as used throughout
/// the original encoder (`automata.cpp`).
pub fn big_and<T>(items: impl IntoIterator<Item = T>, f: impl Fn(T) -> BForm) -> BForm {
    items
        .into_iter()
        .map(f)
        .fold(BForm::top(), |acc, x| acc.and(x))
}

/// Builds the disjunction of `f(item)` over `items`, short-circuiting to
/// `false` on an empty iterator. Mirrors `black::big_or`.
pub fn big_or<T>(items: impl IntoIterator<Item = T>, f: impl Fn(T) -> BForm) -> BForm {
    items
        .into_iter()
        .map(f)
        .fold(BForm::bottom(), |acc, x| acc.or(x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::prop::Alphabet;

    #[test]
    fn eval_respects_connectives() {
        let sigma = Alphabet::new();
        let a = sigma.proposition("a");
        let b = sigma.proposition("b");
        let f = BForm::prop(a.clone()).and(BForm::prop(b.clone()).not());

        let mut assignment = HashMap::new();
        assignment.insert(a.clone(), true);
        assignment.insert(b.clone(), false);
        assert!(f.eval(&assignment));

        assignment.insert(b, true);
        assert!(!f.eval(&assignment));
    }

    #[test]
    fn double_negation_cancels() {
        let sigma = Alphabet::new();
        let a = sigma.proposition("a");
        let f = BForm::prop(a.clone()).not().not();
        assert_eq!(f, BForm::prop(a));
    }

    #[test]
    fn big_and_empty_is_top() {
        let items: Vec<BForm> = Vec::new();
        assert_eq!(big_and(items, |x| x), BForm::top());
    }
}
