use super::variable::VariableRegistry;
use crate::error::{Result, SmartGrowError};

/// A `(variable, label)` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    pub variable: String,
    pub label: String,
}

impl Clause {
    pub fn new(variable: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            label: label.into(),
        }
    }
}

impl std::fmt::Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} is {}", self.variable, self.label)
    }
}

/// Conjunction of antecedent clauses implying one consequent label.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    antecedents: Vec<Clause>,
    consequent: Clause,
}

impl Rule {
    pub fn when(variable: impl Into<String>, label: impl Into<String>) -> RuleBuilder {
        RuleBuilder {
            antecedents: vec![Clause::new(variable, label)],
        }
    }

    pub fn antecedents(&self) -> &[Clause] {
        &self.antecedents
    }

    pub fn consequent(&self) -> &Clause {
        &self.consequent
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IF ")?;
        for (i, clause) in self.antecedents.iter().enumerate() {
            if i > 0 {
                write!(f, " AND ")?;
            }
            write!(f, "{}", clause)?;
        }
        write!(f, " THEN {}", self.consequent)
    }
}

pub struct RuleBuilder {
    antecedents: Vec<Clause>,
}

impl RuleBuilder {
    pub fn and(mut self, variable: impl Into<String>, label: impl Into<String>) -> Self {
        self.antecedents.push(Clause::new(variable, label));
        self
    }

    pub fn then(self, variable: impl Into<String>, label: impl Into<String>) -> Rule {
        Rule {
            antecedents: self.antecedents,
            consequent: Clause::new(variable, label),
        }
    }
}

/// Rules checked against a registry: every clause names a known
/// variable/label pair.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>, registry: &VariableRegistry) -> Result<Self> {
        if rules.is_empty() {
            return Err(SmartGrowError::InvalidData("rule set is empty".into()));
        }
        for rule in &rules {
            for clause in rule.antecedents.iter().chain(std::iter::once(&rule.consequent)) {
                registry.check(&clause.variable, &clause.label)?;
            }
            if rule
                .antecedents
                .iter()
                .any(|c| c.variable == rule.consequent.variable)
            {
                return Err(SmartGrowError::InvalidData(format!(
                    "rule '{}' reads and writes the same variable",
                    rule
                )));
            }
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Distinct consequent variables, in first-seen order.
    pub fn output_variables(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for rule in &self.rules {
            let name = rule.consequent.variable.as_str();
            if !out.contains(&name) {
                out.push(name);
            }
        }
        out
    }

    /// Distinct antecedent variables, in first-seen order.
    pub fn input_variables(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for clause in self.rules.iter().flat_map(|r| r.antecedents.iter()) {
            let name = clause.variable.as_str();
            if !out.contains(&name) {
                out.push(name);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::{LinguisticVariable, Universe};

    fn registry() -> VariableRegistry {
        let u = Universe::new(0.0, 100.0, 1.0).unwrap();
        let mut registry = VariableRegistry::new();
        registry
            .register(
                LinguisticVariable::new("soil_moisture", u)
                    .with_label("seca", 0.0, 0.0, 40.0)
                    .unwrap()
                    .with_label("umida", 60.0, 100.0, 100.0)
                    .unwrap(),
            )
            .unwrap();
        registry
            .register(
                LinguisticVariable::new("irrigation", u)
                    .with_label("baixa", 0.0, 0.0, 50.0)
                    .unwrap()
                    .with_label("alta", 50.0, 100.0, 100.0)
                    .unwrap(),
            )
            .unwrap();
        registry
    }

    #[test]
    fn builder_and_display() {
        let rule = Rule::when("temperature", "quente")
            .and("soil_moisture", "seca")
            .then("irrigation", "alta");
        assert_eq!(rule.antecedents().len(), 2);
        assert_eq!(
            rule.to_string(),
            "IF temperature is quente AND soil_moisture is seca THEN irrigation is alta"
        );
    }

    #[test]
    fn rule_set_rejects_unknown_references() {
        let registry = registry();
        let unknown_label = vec![Rule::when("soil_moisture", "lamacenta").then("irrigation", "alta")];
        assert!(matches!(
            RuleSet::new(unknown_label, &registry),
            Err(SmartGrowError::UnknownLabel { .. })
        ));

        let unknown_var = vec![Rule::when("soil_moisture", "seca").then("fertigation", "alta")];
        assert!(matches!(
            RuleSet::new(unknown_var, &registry),
            Err(SmartGrowError::UnknownVariable(_))
        ));

        assert!(RuleSet::new(Vec::new(), &registry).is_err());
    }

    #[test]
    fn rule_set_lists_variables() {
        let registry = registry();
        let rules = RuleSet::new(
            vec![
                Rule::when("soil_moisture", "seca").then("irrigation", "alta"),
                Rule::when("soil_moisture", "umida").then("irrigation", "baixa"),
            ],
            &registry,
        )
        .unwrap();
        assert_eq!(rules.output_variables(), vec!["irrigation"]);
        assert_eq!(rules.input_variables(), vec!["soil_moisture"]);
    }

    #[test]
    fn rule_set_rejects_self_reference() {
        let registry = registry();
        let rules = vec![Rule::when("irrigation", "alta").then("irrigation", "baixa")];
        assert!(RuleSet::new(rules, &registry).is_err());
    }
}
