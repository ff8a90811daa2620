//! Propositions and the tagging algebra used to derive fresh names from them.
//!
//! Propositions are opaque handles into an [`Alphabet`], which interns
//! [`Name`]s so that structurally equal names always produce the same
//! handle. All renaming operators (`primed`, `stepped`, `star`, `fresh`) are
//! pure functions on names; applying them again always yields a distinct,
//! well-defined name rather than mutating anything in place.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// The structural name of a proposition, before interning.
///
/// Wrappers compose: `Stepped` absorbs a nested `Stepped`/`Primed` per the
/// rules in the tagging algebra (see [`stepped`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Name {
    /// A plain, user- or encoder-chosen atom, such as `"u0"` or a textual
    /// encoding of a grounded subformula.
    Atom(String),
    /// The primed (next-state) copy of a name.
    Primed(Box<Name>),
    /// A name tagged with a non-negative step index, used by the classic
    /// QBF-fixpoint encoding to distinguish iteration depths.
    Stepped(Box<Name>, usize),
    /// A starred copy, used by the (out of scope) determinization
    /// subroutine; kept here because the tagging algebra names it.
    Starred(Box<Name>),
    /// A name produced by the fresh generator, carrying a monotonic serial
    /// so that two calls on the same argument never collide.
    Fresh(Box<Name>, usize),
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(s) => write!(f, "{}", s),
            Self::Primed(n) => write!(f, "{}'", n),
            Self::Stepped(n, k) => write!(f, "{}@{}", n, k),
            Self::Starred(n) => write!(f, "{}*", n),
            Self::Fresh(n, serial) => write!(f, "{{{}, {}}}", n, serial),
        }
    }
}

/// A proposition: an opaque identity backed by an [`Alphabet`].
///
/// Two propositions compare equal iff they were interned from
/// structurally-equal [`Name`]s by the same alphabet. Cloning is cheap
/// (an index and a shared handle to the alphabet).
#[derive(Clone)]
pub struct Proposition {
    id: usize,
    alphabet: Rc<RefCell<AlphabetInner>>,
}

impl Proposition {
    /// The interned name of this proposition.
    pub fn name(&self) -> Name {
        self.alphabet.borrow().names[self.id].clone()
    }
}

impl fmt::Debug for Proposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Proposition({})", self.name())
    }
}

impl fmt::Display for Proposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl PartialEq for Proposition {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.alphabet, &other.alphabet) && self.id == other.id
    }
}
impl Eq for Proposition {}

impl std::hash::Hash for Proposition {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Propositions are ordered by a canonical textual key (their name's
/// `Display` form), so that collections of them can be sorted into a
/// deterministic order regardless of hash-set iteration order. This backs
/// the determinism requirement of §5 and the automaton-variable ordering of
/// §4.1/§9.
impl PartialOrd for Proposition {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Proposition {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name().to_string().cmp(&other.name().to_string())
    }
}

struct AlphabetInner {
    names: Vec<Name>,
    index: HashMap<Name, usize>,
}

/// A process-local (not process-global, per the re-architecture note in
/// §9) interning table for propositions. Equal names always produce the
/// same [`Proposition`] handle; the table only grows, so handles remain
/// valid for the table's whole lifetime.
#[derive(Clone)]
pub struct Alphabet {
    inner: Rc<RefCell<AlphabetInner>>,
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::new()
    }
}

impl Alphabet {
    /// Creates a fresh, empty alphabet.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(AlphabetInner {
                names: Vec::new(),
                index: HashMap::new(),
            })),
        }
    }

    /// Interns the given name, returning the unique [`Proposition`] for it.
    pub fn intern(&self, name: Name) -> Proposition {
        let mut inner = self.inner.borrow_mut();
        if let Some(&id) = inner.index.get(&name) {
            return Proposition {
                id,
                alphabet: self.inner.clone(),
            };
        }
        let id = inner.names.len();
        inner.names.push(name.clone());
        inner.index.insert(name, id);
        Proposition {
            id,
            alphabet: self.inner.clone(),
        }
    }

    /// Interns a plain atom by its textual name. This is the common case
    /// used to declare user-facing input/output propositions.
    pub fn proposition(&self, name: impl Into<String>) -> Proposition {
        self.intern(Name::Atom(name.into()))
    }

    /// A generator of fresh propositions, monotonically increasing per
    /// generator instance (not per alphabet), per §4.2/§5.
    pub fn fresh_generator(&self) -> FreshGenerator {
        FreshGenerator {
            alphabet: self.clone(),
            next_serial: 0,
        }
    }
}

/// Produces fresh propositions derived from a given argument proposition.
/// Two calls with the same argument always yield distinct propositions,
/// because each call bumps the generator's monotonic serial.
pub struct FreshGenerator {
    alphabet: Alphabet,
    next_serial: usize,
}

impl FreshGenerator {
    /// Produces a fresh proposition derived from `p`.
    pub fn fresh(&mut self, p: &Proposition) -> Proposition {
        let serial = self.next_serial;
        self.next_serial += 1;
        self.alphabet
            .intern(Name::Fresh(Box::new(p.name()), serial))
    }
}

/// Wraps `p` with the primed (next-state) marker.
pub fn primed(p: &Proposition) -> Proposition {
    rename_one(p, Name::Primed)
}

/// Wraps `p` with a step index `n`. Absorbing per §4.2: stepping an already
/// stepped or primed name folds into a single step index rather than
/// nesting.
pub fn stepped(p: &Proposition, n: usize) -> Proposition {
    if n == 0 {
        return p.clone();
    }
    let folded = match p.name() {
        Name::Stepped(inner, k) => Name::Stepped(inner, k + n + 1),
        Name::Primed(inner) => Name::Stepped(inner, n + 1),
        other => Name::Stepped(Box::new(other), n),
    };
    p.alphabet().intern(folded)
}

/// Wraps `p` with the starred marker (used by the out-of-scope
/// determinization subroutine, named here for completeness of the tagging
/// algebra in §4.2/§9).
pub fn star(p: &Proposition) -> Proposition {
    rename_one(p, Name::Starred)
}

/// Strips any single outermost tagging wrapper, recovering the proposition
/// it was derived from. Idempotent up to serial, per §8 invariant 4.
pub fn untag(p: &Proposition) -> Proposition {
    let stripped = match p.name() {
        Name::Primed(inner) => *inner,
        Name::Stepped(inner, _) => *inner,
        Name::Starred(inner) => *inner,
        Name::Fresh(inner, _) => *inner,
        atom @ Name::Atom(_) => atom,
    };
    p.alphabet().intern(stripped)
}

fn rename_one(p: &Proposition, wrap: impl FnOnce(Box<Name>) -> Name) -> Proposition {
    let name = wrap(Box::new(p.name()));
    p.alphabet().intern(name)
}

impl Proposition {
    fn alphabet(&self) -> Alphabet {
        Alphabet {
            inner: self.alphabet.clone(),
        }
    }
}

/// Renames every proposition in `props` via `f`, preserving order.
pub fn rename_all(props: &[Proposition], f: impl Fn(&Proposition) -> Proposition) -> Vec<Proposition> {
    props.iter().map(f).collect()
}

/// Sorts `props` by the canonical textual key used throughout the crate to
/// guarantee deterministic iteration order (§5, §9).
pub fn canonical_sort(props: &mut [Proposition]) {
    props.sort();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_structural() {
        let sigma = Alphabet::new();
        let p1 = sigma.proposition("a");
        let p2 = sigma.proposition("a");
        let q = sigma.proposition("b");
        assert_eq!(p1, p2);
        assert_ne!(p1, q);
    }

    #[test]
    fn tagging_idempotent_up_to_serial() {
        let sigma = Alphabet::new();
        let p = sigma.proposition("a");

        assert_eq!(untag(&primed(&p)), p);
        assert_eq!(untag(&stepped(&p, 3)), p);
        assert_eq!(untag(&star(&p)), p);

        let mut gen = sigma.fresh_generator();
        let f1 = gen.fresh(&p);
        let f2 = gen.fresh(&p);
        assert_ne!(f1, f2);
        assert_eq!(untag(&f1), p);
        assert_eq!(untag(&f2), p);
    }

    #[test]
    fn stepped_is_absorbing() {
        let sigma = Alphabet::new();
        let p = sigma.proposition("a");

        let s1 = stepped(&p, 2);
        let s2 = stepped(&s1, 3);
        assert_eq!(s2.name(), Name::Stepped(Box::new(Name::Atom("a".into())), 2 + 3 + 1));

        let pr = primed(&p);
        let s3 = stepped(&pr, 4);
        assert_eq!(s3.name(), Name::Stepped(Box::new(Name::Atom("a".into())), 4 + 1));
    }

    #[test]
    fn canonical_sort_is_deterministic() {
        let sigma = Alphabet::new();
        let mut props = vec![
            sigma.proposition("c"),
            sigma.proposition("a"),
            sigma.proposition("b"),
        ];
        canonical_sort(&mut props);
        let names: Vec<_> = props.iter().map(|p| p.to_string()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
