//! Mamdani-style inference: fuzzify crisp inputs, fire rules with min-AND,
//! clip and max-aggregate consequents, then defuzzify by discrete centroid.
//!
//! Everything here is a pure function of its arguments; nothing keeps
//! simulation state between calls.

use super::rule::{Rule, RuleSet};
use super::variable::VariableRegistry;
use crate::error::{Result, SmartGrowError};
use std::collections::HashMap;
use tracing::debug;

/// Crisp input value per input variable.
pub type Inputs = HashMap<String, f64>;

/// Membership degree per variable, then per label.
pub type Degrees = HashMap<String, HashMap<String, f64>>;

/// Crisp value per output variable. `None` means no rule fired for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outputs {
    values: HashMap<String, Option<f64>>,
}

impl Outputs {
    pub fn get(&self, variable: &str) -> Option<f64> {
        self.values.get(variable).copied().flatten()
    }

    pub fn is_defined(&self, variable: &str) -> bool {
        self.get(variable).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Membership degree of every label of every supplied input. Inputs outside
/// their universe are clamped to the nearest bound first.
pub fn fuzzify(variables: &VariableRegistry, inputs: &Inputs) -> Result<Degrees> {
    let mut degrees = Degrees::with_capacity(inputs.len());
    for (name, &value) in inputs {
        if !value.is_finite() {
            return Err(SmartGrowError::InvalidData(format!(
                "input '{}' is not a finite number",
                name
            )));
        }
        let variable = variables.require(name)?;
        let x = variable.universe().clamp(value);
        if x != value {
            debug!(variable = %name, value, clamped = x, "Input outside universe, clamped");
        }
        let per_label = variable
            .labels()
            .map(|(label, mf)| (label.to_string(), mf.degree(x)))
            .collect();
        degrees.insert(name.clone(), per_label);
    }
    Ok(degrees)
}

/// Minimum of the antecedent degrees of `rule`.
pub fn firing_strength(rule: &Rule, degrees: &Degrees) -> Result<f64> {
    let mut strength: f64 = 1.0;
    for clause in rule.antecedents() {
        let per_label = degrees
            .get(&clause.variable)
            .ok_or_else(|| SmartGrowError::MissingInput(clause.variable.clone()))?;
        let degree = per_label
            .get(&clause.label)
            .ok_or_else(|| SmartGrowError::UnknownLabel {
                variable: clause.variable.clone(),
                label: clause.label.clone(),
            })?;
        strength = strength.min(*degree);
    }
    Ok(strength)
}

/// Centroid of a sampled fuzzy set, or `None` when it is empty everywhere.
pub fn centroid(points: &[f64], membership: &[f64]) -> Option<f64> {
    let (num, den) = points
        .iter()
        .zip(membership)
        .fold((0.0, 0.0), |(num, den), (y, mu)| (num + y * mu, den + mu));
    if den > 0.0 {
        Some(num / den)
    } else {
        None
    }
}

/// Evaluates `rules` against `inputs`, one crisp value per output variable.
pub fn evaluate(rules: &RuleSet, variables: &VariableRegistry, inputs: &Inputs) -> Result<Outputs> {
    let degrees = fuzzify(variables, inputs)?;

    let strengths = rules
        .rules()
        .iter()
        .map(|rule| firing_strength(rule, &degrees).map(|s| (rule, s)))
        .collect::<Result<Vec<_>>>()?;

    let mut values = HashMap::new();
    for output in rules.output_variables() {
        let variable = variables.require(output)?;
        let points: Vec<f64> = variable.universe().points().collect();
        let mut aggregated = vec![0.0_f64; points.len()];

        for (rule, strength) in &strengths {
            let consequent = rule.consequent();
            if consequent.variable != output || *strength <= 0.0 {
                continue;
            }
            let mf = variable
                .label(&consequent.label)
                .ok_or_else(|| SmartGrowError::UnknownLabel {
                    variable: consequent.variable.clone(),
                    label: consequent.label.clone(),
                })?;
            for (mu, y) in aggregated.iter_mut().zip(&points) {
                *mu = mu.max(strength.min(mf.degree(*y)));
            }
        }

        values.insert(output.to_string(), centroid(&points, &aggregated));
    }

    Ok(Outputs { values })
}

/// A variable registry and the rule set that runs over it.
#[derive(Debug, Clone)]
pub struct FuzzySystem {
    name: String,
    variables: VariableRegistry,
    rules: RuleSet,
}

impl FuzzySystem {
    /// Every name in `required_outputs` must be the consequent of at least
    /// one rule.
    pub fn new(
        name: impl Into<String>,
        variables: VariableRegistry,
        rules: Vec<Rule>,
        required_outputs: &[&str],
    ) -> Result<Self> {
        let name = name.into();
        let rules = RuleSet::new(rules, &variables)?;
        let produced = rules.output_variables();
        for required in required_outputs {
            if !produced.contains(required) {
                return Err(SmartGrowError::InvalidData(format!(
                    "system '{}' has no rule producing '{}'",
                    name, required
                )));
            }
        }
        Ok(Self {
            name,
            variables,
            rules,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variables(&self) -> &VariableRegistry {
        &self.variables
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn session(&self) -> InferenceSession<'_> {
        InferenceSession::new(self)
    }
}

/// Inputs gathered for a single evaluation; consumed by [`compute`].
///
/// [`compute`]: InferenceSession::compute
pub struct InferenceSession<'a> {
    system: &'a FuzzySystem,
    inputs: Inputs,
}

impl<'a> InferenceSession<'a> {
    pub fn new(system: &'a FuzzySystem) -> Self {
        Self {
            system,
            inputs: Inputs::new(),
        }
    }

    pub fn input(mut self, variable: impl Into<String>, value: f64) -> Self {
        self.inputs.insert(variable.into(), value);
        self
    }

    pub fn compute(self) -> Result<Outputs> {
        evaluate(&self.system.rules, &self.system.variables, &self.inputs)
    }
}
