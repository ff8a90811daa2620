//! Pure-past linear temporal logic formulas (`PForm`, §3) and their
//! negation-normal-form rewrite (§4.1 step 1).

use std::fmt;
use std::rc::Rc;

use super::prop::Proposition;

/// Unary pure-past operators, plus negation (kept unary here so NNF can
/// pattern-match on a single enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnOp {
    Not,
    /// Yesterday: `Y`.
    Yesterday,
    /// Weak yesterday: `Z`.
    WYesterday,
    /// Once: `O`.
    Once,
    /// Historically: `H`.
    Historically,
}

/// Binary connectives and binary pure-past operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    And,
    Or,
    Implies,
    Iff,
    /// Since: `S`.
    Since,
    /// Triggered: `T`.
    Triggered,
}

/// A pure-past formula (§3): `BForm` extended with `Y`, `Z`, `O`, `H`, `S`,
/// `T`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PForm {
    Bool(bool),
    Prop(Proposition),
    Un(UnOp, Rc<PForm>),
    Bin(BinOp, Rc<PForm>, Rc<PForm>),
}

impl PForm {
    pub fn top() -> Self {
        PForm::Bool(true)
    }
    pub fn bottom() -> Self {
        PForm::Bool(false)
    }
    pub fn prop(p: Proposition) -> Self {
        PForm::Prop(p)
    }
    pub fn not(self) -> Self {
        PForm::Un(UnOp::Not, Rc::new(self))
    }
    pub fn yesterday(self) -> Self {
        PForm::Un(UnOp::Yesterday, Rc::new(self))
    }
    pub fn w_yesterday(self) -> Self {
        PForm::Un(UnOp::WYesterday, Rc::new(self))
    }
    pub fn once(self) -> Self {
        PForm::Un(UnOp::Once, Rc::new(self))
    }
    pub fn historically(self) -> Self {
        PForm::Un(UnOp::Historically, Rc::new(self))
    }
    pub fn and(self, other: Self) -> Self {
        PForm::Bin(BinOp::And, Rc::new(self), Rc::new(other))
    }
    pub fn or(self, other: Self) -> Self {
        PForm::Bin(BinOp::Or, Rc::new(self), Rc::new(other))
    }
    pub fn implies(self, other: Self) -> Self {
        PForm::Bin(BinOp::Implies, Rc::new(self), Rc::new(other))
    }
    pub fn iff(self, other: Self) -> Self {
        PForm::Bin(BinOp::Iff, Rc::new(self), Rc::new(other))
    }
    pub fn since(self, other: Self) -> Self {
        PForm::Bin(BinOp::Since, Rc::new(self), Rc::new(other))
    }
    pub fn triggered(self, other: Self) -> Self {
        PForm::Bin(BinOp::Triggered, Rc::new(self), Rc::new(other))
    }

    /// Collects every proposition occurring in the formula, in no
    /// particular order.
    pub fn propositions(&self) -> Vec<Proposition> {
        let mut out = Vec::new();
        self.collect_propositions(&mut out);
        out
    }

    fn collect_propositions(&self, out: &mut Vec<Proposition>) {
        match self {
            PForm::Bool(_) => {}
            PForm::Prop(p) => out.push(p.clone()),
            PForm::Un(_, arg) => arg.collect_propositions(out),
            PForm::Bin(_, l, r) => {
                l.collect_propositions(out);
                r.collect_propositions(out);
            }
        }
    }

    /// Visits every strict subterm of `self` (not `self` itself), matching
    /// the original `for_each_child_deep` traversal used by the encoder's
    /// `collect` pass.
    pub fn for_each_child_deep(&self, f: &mut impl FnMut(&PForm)) {
        match self {
            PForm::Bool(_) | PForm::Prop(_) => {}
            PForm::Un(_, arg) => {
                f(arg);
                arg.for_each_child_deep(f);
            }
            PForm::Bin(_, l, r) => {
                f(l);
                f(r);
                l.for_each_child_deep(f);
                r.for_each_child_deep(f);
            }
        }
    }

    /// Negation-normal-form rewrite (§4.1 step 1): eliminates `->`/`<->`
    /// and pushes negation down to the atoms using the pure-past De Morgan
    /// dualities:
    /// `¬Y ≡ Z¬`, `¬Z ≡ Y¬`, `¬O ≡ H¬`, `¬H ≡ O¬`,
    /// `¬S(a,b) ≡ T(¬a,¬b)`, `¬T(a,b) ≡ S(¬a,¬b)`.
    pub fn nnf(&self) -> PForm {
        match self {
            PForm::Bool(b) => PForm::Bool(*b),
            PForm::Prop(p) => PForm::Prop(p.clone()),
            PForm::Bin(BinOp::And, l, r) => l.nnf().and(r.nnf()),
            PForm::Bin(BinOp::Or, l, r) => l.nnf().or(r.nnf()),
            PForm::Bin(BinOp::Implies, l, r) => {
                PForm::not((**l).clone()).nnf().or(r.nnf())
            }
            PForm::Bin(BinOp::Iff, l, r) => {
                let imp1 = PForm::implies((**l).clone(), (**r).clone());
                let imp2 = PForm::implies((**r).clone(), (**l).clone());
                imp1.nnf().and(imp2.nnf())
            }
            PForm::Bin(BinOp::Since, l, r) => l.nnf().since(r.nnf()),
            PForm::Bin(BinOp::Triggered, l, r) => l.nnf().triggered(r.nnf()),
            PForm::Un(UnOp::Yesterday, arg) => arg.nnf().yesterday(),
            PForm::Un(UnOp::WYesterday, arg) => arg.nnf().w_yesterday(),
            PForm::Un(UnOp::Once, arg) => arg.nnf().once(),
            PForm::Un(UnOp::Historically, arg) => arg.nnf().historically(),
            PForm::Un(UnOp::Not, arg) => nnf_negated(arg),
        }
    }
}

/// Computes the NNF of `¬arg`, i.e. pushes a negation one level through
/// `arg`'s top connective and recurses.
fn nnf_negated(arg: &PForm) -> PForm {
    match arg {
        PForm::Bool(b) => PForm::Bool(!b),
        PForm::Prop(p) => PForm::Prop(p.clone()).not(),
        PForm::Un(UnOp::Not, inner) => inner.nnf(),
        PForm::Bin(BinOp::And, l, r) => {
            PForm::not((**l).clone()).nnf().or(PForm::not((**r).clone()).nnf())
        }
        PForm::Bin(BinOp::Or, l, r) => {
            PForm::not((**l).clone()).nnf().and(PForm::not((**r).clone()).nnf())
        }
        PForm::Bin(BinOp::Implies, l, r) => l.nnf().and(PForm::not((**r).clone()).nnf()),
        PForm::Bin(BinOp::Iff, l, r) => {
            let not_imp1 = PForm::not(PForm::implies((**l).clone(), (**r).clone())).nnf();
            let not_imp2 = PForm::not(PForm::implies((**r).clone(), (**l).clone())).nnf();
            not_imp1.or(not_imp2)
        }
        PForm::Bin(BinOp::Since, l, r) => {
            PForm::not((**l).clone()).nnf().triggered(PForm::not((**r).clone()).nnf())
        }
        PForm::Bin(BinOp::Triggered, l, r) => {
            PForm::not((**l).clone()).nnf().since(PForm::not((**r).clone()).nnf())
        }
        PForm::Un(UnOp::Yesterday, op) => PForm::not((**op).clone()).nnf().w_yesterday(),
        PForm::Un(UnOp::WYesterday, op) => PForm::not((**op).clone()).nnf().yesterday(),
        PForm::Un(UnOp::Once, op) => PForm::not((**op).clone()).nnf().historically(),
        PForm::Un(UnOp::Historically, op) => PForm::not((**op).clone()).nnf().once(),
    }
}

impl fmt::Display for PForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PForm::Bool(true) => write!(f, "true"),
            PForm::Bool(false) => write!(f, "false"),
            PForm::Prop(p) => write!(f, "{}", p),
            PForm::Un(op, arg) => {
                let sym = match op {
                    UnOp::Not => "!",
                    UnOp::Yesterday => "Y",
                    UnOp::WYesterday => "Z",
                    UnOp::Once => "O",
                    UnOp::Historically => "H",
                };
                write!(f, "{}({})", sym, arg)
            }
            PForm::Bin(op, l, r) => {
                let sym = match op {
                    BinOp::And => "&",
                    BinOp::Or => "|",
                    BinOp::Implies => "->",
                    BinOp::Iff => "<->",
                    BinOp::Since => "S",
                    BinOp::Triggered => "T",
                };
                write!(f, "({} {} {})", l, sym, r)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::prop::Alphabet;

    #[test]
    fn nnf_idempotent() {
        let sigma = Alphabet::new();
        let a = sigma.proposition("a");
        let b = sigma.proposition("b");
        let f = PForm::prop(a)
            .implies(PForm::prop(b).once())
            .not()
            .historically();

        let once_nnf = f.nnf();
        let twice_nnf = once_nnf.nnf();
        assert_eq!(once_nnf, twice_nnf);
    }

    #[test]
    fn nnf_pushes_negation_to_atoms() {
        let sigma = Alphabet::new();
        let a = sigma.proposition("a");
        let f = PForm::prop(a).since(PForm::prop(sigma.proposition("b"))).not();
        let nnf = f.nnf();
        assert!(no_non_atomic_negation(&nnf));
    }

    fn no_non_atomic_negation(f: &PForm) -> bool {
        match f {
            PForm::Bool(_) | PForm::Prop(_) => true,
            PForm::Un(UnOp::Not, arg) => matches!(**arg, PForm::Prop(_) | PForm::Bool(_)),
            PForm::Un(_, arg) => no_non_atomic_negation(arg),
            PForm::Bin(_, l, r) => no_non_atomic_negation(l) && no_non_atomic_negation(r),
        }
    }

    #[test]
    fn dual_rewrites_match_spec() {
        let sigma = Alphabet::new();
        let a = sigma.proposition("a");
        let f = PForm::prop(a).yesterday().not().nnf();
        assert!(matches!(f, PForm::Un(UnOp::WYesterday, _)));
    }
}
