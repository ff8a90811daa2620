//! QBF utilities (§4.3): flattening, prenex normalization, CNF/QDIMACS
//! emission, and the external oracle interface.

pub mod cnf;
pub mod flatten;
pub mod oracle;
pub mod prenex;

pub use cnf::{tseitin_qdimacs, Qdimacs};
pub use flatten::flatten;
pub use oracle::{EnumerationOracle, OracleResult, QbfOracle, VarisatOracle};
pub use prenex::prenex;
