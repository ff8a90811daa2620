//! The input to the encoder (§3 `Spec`): a temporal objective, a pure-past
//! body, and the input/output proposition partition.

use std::fmt;

use crate::error::Result;
use crate::logic::{canonical_sort, Alphabet, PForm, Proposition};
use crate::parser::{self, GameType};

/// `{type ∈ {F, G}, body : PForm, inputs : set<Prop>, outputs : set<Prop>}`
/// (§3). Invariant: every proposition occurring in `body` is either in
/// `inputs` or `outputs`; `inputs ∩ outputs = ∅` (enforced by construction:
/// `outputs` is always exactly the propositions of `body` that are not
/// listed as inputs).
#[derive(Debug, Clone)]
pub struct Spec {
    pub game_type: GameType,
    pub body: PForm,
    pub inputs: Vec<Proposition>,
    pub outputs: Vec<Proposition>,
}

impl Spec {
    /// Parses `formula_text` and partitions its propositions into `inputs`
    /// (those named in `declared_inputs`) and `outputs` (everything else
    /// mentioned in the formula), mirroring `spec.cpp`'s convention of
    /// inferring outputs from the propositions the formula leaves
    /// unclaimed.
    pub fn parse(sigma: &Alphabet, formula_text: &str, declared_inputs: &[String]) -> Result<Spec> {
        let (game_type, body) = parser::parse_spec_formula(sigma, formula_text)?;

        let declared: Vec<Proposition> = declared_inputs
            .iter()
            .map(|name| sigma.proposition(name.clone()))
            .collect();

        let mut inputs: Vec<Proposition> = Vec::new();
        let mut outputs: Vec<Proposition> = Vec::new();
        for p in body.propositions() {
            if declared.contains(&p) {
                if !inputs.contains(&p) {
                    inputs.push(p);
                }
            } else if !outputs.contains(&p) {
                outputs.push(p);
            }
        }
        // Inputs declared on the command line but absent from the body are
        // still inputs: an environment proposition the body never mentions
        // is vacuously under the environment's control.
        for p in declared {
            if !inputs.contains(&p) {
                inputs.push(p);
            }
        }

        canonical_sort(&mut inputs);
        canonical_sort(&mut outputs);

        Ok(Spec {
            game_type,
            body,
            inputs,
            outputs,
        })
    }
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wrapper = match self.game_type {
            GameType::Eventually => "F",
            GameType::Always => "G",
        };
        write!(f, "{}({})", wrapper, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outputs_are_inferred_from_leftover_propositions() {
        let sigma = Alphabet::new();
        let spec = Spec::parse(&sigma, "F(O(u0) & c0)", &["u0".to_string()]).unwrap();
        assert_eq!(spec.inputs.len(), 1);
        assert_eq!(spec.inputs[0].to_string(), "u0");
        assert_eq!(spec.outputs.len(), 1);
        assert_eq!(spec.outputs[0].to_string(), "c0");
    }

    #[test]
    fn undeclared_input_proposition_becomes_output() {
        let sigma = Alphabet::new();
        let spec = Spec::parse(&sigma, "F(c0)", &[]).unwrap();
        assert!(spec.inputs.is_empty());
        assert_eq!(spec.outputs[0].to_string(), "c0");
    }

    #[test]
    fn declared_input_absent_from_body_is_still_an_input() {
        let sigma = Alphabet::new();
        let spec = Spec::parse(&sigma, "F(c0)", &["u0".to_string()]).unwrap();
        assert_eq!(spec.inputs.len(), 1);
        assert_eq!(spec.inputs[0].to_string(), "u0");
    }

    #[test]
    fn malformed_formula_is_a_parse_error() {
        let sigma = Alphabet::new();
        assert!(Spec::parse(&sigma, "c0 & c1", &[]).is_err());
    }
}
