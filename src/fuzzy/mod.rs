pub mod engine;
pub mod membership;
pub mod rule;
pub mod variable;

pub use engine::{evaluate, FuzzySystem, InferenceSession, Inputs, Outputs};
pub use membership::Triangular;
pub use rule::{Clause, Rule, RuleSet};
pub use variable::{LinguisticVariable, Universe, VariableRegistry};
