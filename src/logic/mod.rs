//! Core formula representations and the proposition alphabet (§3).

pub mod bform;
pub mod pform;
pub mod prop;
pub mod qform;

pub use bform::{big_and, big_or, BForm};
pub use pform::PForm;
pub use prop::{canonical_sort, primed, stepped, untag, Alphabet, FreshGenerator, Name, Proposition};
pub use qform::QForm;
