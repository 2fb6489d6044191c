use super::membership::Triangular;
use crate::error::{Result, SmartGrowError};
use std::collections::HashMap;

/// Closed universe of discourse `[min, max]`, sampled every `step` for
/// defuzzification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Universe {
    min: f64,
    max: f64,
    step: f64,
}

impl Universe {
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self> {
        if !(min.is_finite() && max.is_finite() && step.is_finite()) || min >= max {
            return Err(SmartGrowError::InvalidData(format!(
                "universe bounds must be finite with min < max, got [{}, {}]",
                min, max
            )));
        }
        if step <= 0.0 || step > max - min {
            return Err(SmartGrowError::InvalidData(format!(
                "universe step must be in (0, {}], got {}",
                max - min,
                step
            )));
        }
        Ok(Self { min, max, step })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }

    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }

    /// Discretized sample points, both bounds included.
    pub fn points(&self) -> impl Iterator<Item = f64> + '_ {
        let tolerance = self.step * 1e-9;
        let n = ((self.max - self.min + tolerance) / self.step).floor() as usize;
        // A step that does not divide the span leaves a gap below max.
        let last = self.min + n as f64 * self.step;
        let tail = (self.max - last > tolerance).then_some(self.max);
        (0..=n)
            .map(move |i| (self.min + i as f64 * self.step).min(self.max))
            .chain(tail)
    }
}

/// A named input or output dimension with its labeled fuzzy sets.
#[derive(Debug, Clone)]
pub struct LinguisticVariable {
    name: String,
    universe: Universe,
    labels: HashMap<String, Triangular>,
}

impl LinguisticVariable {
    pub fn new(name: impl Into<String>, universe: Universe) -> Self {
        Self {
            name: name.into(),
            universe,
            labels: HashMap::new(),
        }
    }

    /// Adds a triangular label. The peak must sit inside the universe; the
    /// feet may extend past it for open-ended shoulders.
    pub fn with_label(mut self, label: impl Into<String>, a: f64, b: f64, c: f64) -> Result<Self> {
        let label = label.into();
        let mf = Triangular::new(a, b, c)?;
        if !self.universe.contains(b) {
            return Err(SmartGrowError::InvalidMembership(format!(
                "peak of '{}.{}' ({}) lies outside [{}, {}]",
                self.name,
                label,
                b,
                self.universe.min(),
                self.universe.max()
            )));
        }
        self.labels.insert(label, mf);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn label(&self, label: &str) -> Option<&Triangular> {
        self.labels.get(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = (&str, &Triangular)> {
        self.labels.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains_key(label)
    }
}

/// Lookup of linguistic variables by name.
#[derive(Debug, Clone, Default)]
pub struct VariableRegistry {
    variables: HashMap<String, LinguisticVariable>,
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, variable: LinguisticVariable) -> Result<()> {
        if variable.labels.is_empty() {
            return Err(SmartGrowError::InvalidData(format!(
                "variable '{}' has no labels",
                variable.name
            )));
        }
        self.variables.insert(variable.name.clone(), variable);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&LinguisticVariable> {
        self.variables.get(name)
    }

    pub fn require(&self, name: &str) -> Result<&LinguisticVariable> {
        self.get(name)
            .ok_or_else(|| SmartGrowError::UnknownVariable(name.to_string()))
    }

    /// Fails unless `variable` exists and carries `label`.
    pub fn check(&self, variable: &str, label: &str) -> Result<()> {
        if self.require(variable)?.has_label(label) {
            Ok(())
        } else {
            Err(SmartGrowError::UnknownLabel {
                variable: variable.to_string(),
                label: label.to_string(),
            })
        }
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
