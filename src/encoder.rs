//! The temporal encoder (§4.1): compiles a pure-past [`Spec`] into a
//! symbolic [`Automaton`] by NNF rewriting, grounding, step-normal-form
//! unfolding, and automaton assembly.
//!
//! Grounding is the one place the original tool ties itself in a knot: it
//! names a fresh proposition after the very formula it grounds, so the
//! proposition *is* the formula (`f.sigma()->proposition(f)`), and recovers
//! it later by unboxing the name back into a formula (`lift`). That cyclic
//! encoding is re-architected here (per the design note on cyclic formula
//! references) as two plain maps owned by the [`Encoder`]: `ground_of`
//! going forward, `lift_of` going back. Propositions stay opaque handles.

use std::collections::{HashMap, HashSet};

use crate::automaton::Automaton;
use crate::logic::bform::big_and;
use crate::logic::pform::{BinOp as PBinOp, UnOp};
use crate::logic::{Alphabet, BForm, PForm, Proposition, QForm};
use crate::parser::GameType;
use crate::spec::Spec;

struct Encoder {
    sigma: Alphabet,
    ground_of: HashMap<PForm, Proposition>,
    lift_of: HashMap<Proposition, PForm>,
}

impl Encoder {
    fn new(sigma: Alphabet) -> Self {
        Encoder {
            sigma,
            ground_of: HashMap::new(),
            lift_of: HashMap::new(),
        }
    }

    /// Injectively names the subformula `f`, memoizing so that two calls on
    /// structurally-equal formulas return the same proposition (§4.1 step
    /// 2). The textual `Display` form of `f` is used as the atom's name,
    /// which is unique because `Display` is a faithful rendering of the
    /// formula's structure.
    fn ground(&mut self, f: PForm) -> Proposition {
        if let Some(p) = self.ground_of.get(&f) {
            return p.clone();
        }
        let p = self.sigma.proposition(f.to_string());
        self.ground_of.insert(f.clone(), p.clone());
        self.lift_of.insert(p.clone(), f);
        p
    }

    /// Recovers the argument of the Yesterday/WYesterday node that a state
    /// variable grounds. Every element of `vars` was produced by grounding
    /// such a node (§4.1 step 2), so this never fails on a well-formed
    /// automaton.
    fn lift_argument(&self, var: &Proposition) -> &PForm {
        match self
            .lift_of
            .get(var)
            .unwrap_or_else(|| unreachable!("ungrounded automaton variable {}", var))
        {
            PForm::Un(UnOp::Yesterday, arg) | PForm::Un(UnOp::WYesterday, arg) => arg.as_ref(),
            other => unreachable!(
                "automaton variable must ground a Yesterday/WYesterday node, found {}",
                other
            ),
        }
    }

    /// Collects the state variables and the yesterday/weak-yesterday
    /// requirements used to build `init` (§4.1 step 2). Returns
    /// `(vars, yreqs, zreqs)`, each sorted by the canonical textual key for
    /// determinism (§5).
    fn collect(
        &mut self,
        game_type: GameType,
        body: &PForm,
    ) -> (Vec<Proposition>, Vec<Proposition>, Vec<Proposition>) {
        let mut variables: HashSet<Proposition> = HashSet::new();
        let mut yreqs: HashSet<Proposition> = HashSet::new();
        let mut zreqs: HashSet<Proposition> = HashSet::new();

        match game_type {
            GameType::Eventually => {
                let p = self.ground(body.clone().yesterday());
                variables.insert(p.clone());
                yreqs.insert(p);
            }
            GameType::Always => {
                let p = self.ground(body.clone().w_yesterday());
                variables.insert(p.clone());
                zreqs.insert(p);
            }
        }

        body.for_each_child_deep(&mut |child| match child {
            PForm::Un(UnOp::Yesterday, _) => {
                let p = self.ground(child.clone());
                variables.insert(p.clone());
                yreqs.insert(p);
            }
            PForm::Un(UnOp::WYesterday, _) => {
                let p = self.ground(child.clone());
                variables.insert(p.clone());
                zreqs.insert(p);
            }
            PForm::Un(UnOp::Once, _) => {
                let p = self.ground(child.clone().yesterday());
                variables.insert(p.clone());
                yreqs.insert(p);
            }
            PForm::Un(UnOp::Historically, _) => {
                let p = self.ground(child.clone().w_yesterday());
                variables.insert(p.clone());
                zreqs.insert(p);
            }
            PForm::Bin(PBinOp::Since, ..) => {
                let p = self.ground(child.clone().yesterday());
                variables.insert(p.clone());
                yreqs.insert(p);
            }
            PForm::Bin(PBinOp::Triggered, ..) => {
                let p = self.ground(child.clone().w_yesterday());
                variables.insert(p.clone());
                zreqs.insert(p);
            }
            _ => {}
        });

        let mut variables: Vec<_> = variables.into_iter().collect();
        let mut yreqs: Vec<_> = yreqs.into_iter().collect();
        let mut zreqs: Vec<_> = zreqs.into_iter().collect();
        crate::logic::canonical_sort(&mut variables);
        crate::logic::canonical_sort(&mut yreqs);
        crate::logic::canonical_sort(&mut zreqs);
        (variables, yreqs, zreqs)
    }

    /// Step-normal form (§4.1 step 3): eliminates temporal operators,
    /// replacing each by its ground atom or a one-step unfolding in terms
    /// of ground atoms and the current step's Boolean structure.
    fn snf(&mut self, f: &PForm) -> BForm {
        match f {
            PForm::Bool(b) => BForm::Bool(*b),
            PForm::Prop(p) => BForm::Prop(p.clone()),
            PForm::Un(UnOp::Not, arg) => self.snf(arg).not(),
            PForm::Bin(PBinOp::And, l, r) => self.snf(l).and(self.snf(r)),
            PForm::Bin(PBinOp::Or, l, r) => self.snf(l).or(self.snf(r)),
            PForm::Un(UnOp::Yesterday, _) => BForm::prop(self.ground(f.clone())),
            PForm::Un(UnOp::WYesterday, _) => BForm::prop(self.ground(f.clone())),
            PForm::Un(UnOp::Once, arg) => {
                let ground = self.ground(f.clone().yesterday());
                self.snf(arg).or(BForm::prop(ground))
            }
            PForm::Un(UnOp::Historically, arg) => {
                let ground = self.ground(f.clone().w_yesterday());
                self.snf(arg).and(BForm::prop(ground))
            }
            PForm::Bin(PBinOp::Since, l, r) => {
                let ground = self.ground(f.clone().yesterday());
                self.snf(r).or(self.snf(l).and(BForm::prop(ground)))
            }
            PForm::Bin(PBinOp::Triggered, l, r) => {
                let ground = self.ground(f.clone().w_yesterday());
                self.snf(r).and(self.snf(l).or(BForm::prop(ground)))
            }
            PForm::Bin(PBinOp::Implies, ..) | PForm::Bin(PBinOp::Iff, ..) => {
                unreachable!("snf: implication/iff must be eliminated by nnf before encoding")
            }
        }
    }
}

/// Compiles `spec` into an [`Automaton`] (§4.1). `sigma` is the alphabet the
/// spec's propositions were interned into; grounding continues to intern
/// into the same alphabet so that `spec.inputs`/`spec.outputs` and the
/// automaton's `vars` share identity with the original propositions.
pub fn encode(sigma: &Alphabet, spec: &Spec) -> Automaton {
    let mut enc = Encoder::new(sigma.clone());
    let body = spec.body.nnf();
    let (vars, yreqs, zreqs) = enc.collect(spec.game_type, &body);

    let init = big_and(zreqs.iter().cloned(), BForm::prop)
        .and(big_and(yreqs.iter().cloned(), |p| BForm::prop(p).not()));

    let mut trans_bform = BForm::top();
    for var in &vars {
        let arg = enc.lift_argument(var).clone();
        let next = enc.snf(&arg);
        let conjunct = BForm::prop(crate::logic::primed(var)).iff(next);
        trans_bform = trans_bform.and(conjunct);
    }
    let trans = QForm::from_bform(&trans_bform);

    let objective = match spec.game_type {
        GameType::Eventually => BForm::prop(enc.ground(body.yesterday())),
        GameType::Always => BForm::prop(enc.ground(body.w_yesterday())),
    };

    Automaton {
        inputs: spec.inputs.clone(),
        outputs: spec.outputs.clone(),
        vars,
        init,
        trans,
        objective,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(formula: &str, inputs: &[&str]) -> Automaton {
        let sigma = Alphabet::new();
        let declared: Vec<String> = inputs.iter().map(|s| s.to_string()).collect();
        let spec = Spec::parse(&sigma, formula, &declared).unwrap();
        encode(&sigma, &spec)
    }

    #[test]
    fn reachability_objective_is_outer_yesterday() {
        let aut = build("F(c0)", &[]);
        assert_eq!(aut.objective.to_string(), "Y(c0)");
        assert_eq!(aut.vars.len(), 1);
    }

    #[test]
    fn safety_objective_is_outer_weak_yesterday() {
        let aut = build("G(c0)", &[]);
        assert_eq!(aut.objective.to_string(), "Z(c0)");
    }

    #[test]
    fn init_sets_weak_yesterday_true_and_yesterday_false() {
        let aut = build("F(c0)", &[]);
        // Only the outer Y(c0) variable exists; init should say "not Y(c0)".
        assert_eq!(aut.init.to_string(), "!Y(c0)");
    }

    #[test]
    fn once_subterm_grounds_an_extra_state_variable() {
        let aut = build("F(O(u0) & c0)", &["u0"]);
        // One variable for the outer Y(body), one for Y(O(u0)).
        assert_eq!(aut.vars.len(), 2);
    }

    #[test]
    fn trans_mentions_only_vars_primed_vars_inputs_outputs() {
        let aut = build("G(H(u0) -> c0)", &["u0"]);
        let allowed: HashSet<Proposition> = aut
            .vars
            .iter()
            .cloned()
            .chain(aut.vars.iter().map(crate::logic::primed))
            .chain(aut.inputs.iter().cloned())
            .chain(aut.outputs.iter().cloned())
            .collect();
        for p in aut.trans.free_propositions() {
            assert!(allowed.contains(&p), "unexpected free proposition {}", p);
        }
    }
}
