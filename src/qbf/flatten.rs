//! Flatten (§4.3): alpha-renames quantifier-bound variables that shadow an
//! outer binding, using the fresh generator, so no variable is quantified
//! twice in nested scopes. Running this before [`super::prenex::prenex`] is
//! what licenses prenex's "Q ∩ free(G) = ∅" side condition.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::logic::{FreshGenerator, Proposition, QForm};

/// Returns an equivalent formula where every quantifier binds a proposition
/// that is not already in scope.
pub fn flatten(gen: &mut FreshGenerator, f: &QForm) -> QForm {
    flatten_rec(gen, f, &mut HashSet::new())
}

fn flatten_rec(gen: &mut FreshGenerator, f: &QForm, bound: &mut HashSet<Proposition>) -> QForm {
    match f {
        QForm::Bool(b) => QForm::Bool(*b),
        QForm::Prop(p) => QForm::Prop(p.clone()),
        QForm::Not(inner) => QForm::Not(Rc::new(flatten_rec(gen, inner, bound))),
        QForm::Bin(op, l, r) => QForm::Bin(
            *op,
            Rc::new(flatten_rec(gen, l, bound)),
            Rc::new(flatten_rec(gen, r, bound)),
        ),
        QForm::Quant(q, vars, matrix) => {
            let mut renaming: HashMap<Proposition, Proposition> = HashMap::new();
            let mut new_vars = Vec::with_capacity(vars.len());
            let mut new_bound = bound.clone();
            for v in vars {
                if bound.contains(v) {
                    let fresh = gen.fresh(v);
                    new_bound.insert(fresh.clone());
                    renaming.insert(v.clone(), fresh.clone());
                    new_vars.push(fresh);
                } else {
                    new_bound.insert(v.clone());
                    new_vars.push(v.clone());
                }
            }
            let substituted = if renaming.is_empty() {
                (**matrix).clone()
            } else {
                substitute_respecting_shadow(matrix, &renaming)
            };
            let flattened = flatten_rec(gen, &substituted, &mut new_bound);
            QForm::Quant(*q, new_vars, Rc::new(flattened))
        }
    }
}

/// Substitutes every occurrence of a key of `renaming` by its value, except
/// within the scope of a nested quantifier that re-binds the same original
/// proposition (that binder introduces a distinct variable, not a reference
/// to the outer one being renamed here).
fn substitute_respecting_shadow(f: &QForm, renaming: &HashMap<Proposition, Proposition>) -> QForm {
    match f {
        QForm::Bool(b) => QForm::Bool(*b),
        QForm::Prop(p) => QForm::Prop(renaming.get(p).cloned().unwrap_or_else(|| p.clone())),
        QForm::Not(inner) => QForm::Not(Rc::new(substitute_respecting_shadow(inner, renaming))),
        QForm::Bin(op, l, r) => QForm::Bin(
            *op,
            Rc::new(substitute_respecting_shadow(l, renaming)),
            Rc::new(substitute_respecting_shadow(r, renaming)),
        ),
        QForm::Quant(q, vars, matrix) => {
            let mut inner_renaming = renaming.clone();
            for v in vars {
                inner_renaming.remove(v);
            }
            QForm::Quant(
                *q,
                vars.clone(),
                Rc::new(substitute_respecting_shadow(matrix, &inner_renaming)),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::Alphabet;

    #[test]
    fn shadowed_binder_is_renamed() {
        let sigma = Alphabet::new();
        let x = sigma.proposition("x");
        let mut gen = sigma.fresh_generator();

        // exists x. (forall x. x) & x
        let inner = QForm::forall(vec![x.clone()], QForm::prop(x.clone()));
        let outer_body = inner.and(QForm::prop(x.clone()));
        let f = QForm::exists(vec![x.clone()], outer_body);

        let flattened = flatten(&mut gen, &f);
        match flattened {
            QForm::Quant(_, outer_vars, matrix) => {
                assert_eq!(outer_vars, vec![x.clone()]);
                match &*matrix {
                    QForm::Bin(_, l, r) => {
                        if let QForm::Quant(_, inner_vars, inner_matrix) = l.as_ref() {
                            assert_ne!(inner_vars[0], x);
                            assert_eq!(**inner_matrix, QForm::Prop(inner_vars[0].clone()));
                        } else {
                            panic!("expected the forall to survive as the left conjunct");
                        }
                        assert_eq!(**r, QForm::Prop(x.clone()));
                    }
                    _ => panic!("expected a conjunction"),
                }
            }
            _ => panic!("expected the outer exists to survive"),
        }
    }

    #[test]
    fn non_shadowing_formula_is_unchanged() {
        let sigma = Alphabet::new();
        let a = sigma.proposition("a");
        let b = sigma.proposition("b");
        let mut gen = sigma.fresh_generator();
        let f = QForm::exists(vec![a.clone()], QForm::forall(vec![b.clone()], QForm::prop(a)));
        let flattened = flatten(&mut gen, &f);
        assert_eq!(flattened, f);
    }
}
