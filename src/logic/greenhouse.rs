//! The greenhouse rule base: three input variables and one fuzzy system per
//! fuzzy-controlled actuator.

use crate::error::Result;
use crate::fuzzy::{FuzzySystem, LinguisticVariable, Rule, Universe, VariableRegistry};

pub const TEMPERATURE: &str = "temperature";
pub const SOIL_MOISTURE: &str = "soil_moisture";
pub const LIGHT: &str = "light";

pub const IRRIGATION: &str = "irrigation";
pub const VENTILATION: &str = "ventilation";
pub const LIGHTING: &str = "lighting";

/// Air temperature, °C.
pub fn temperature() -> Result<LinguisticVariable> {
    LinguisticVariable::new(TEMPERATURE, Universe::new(0.0, 50.0, 1.0)?)
        .with_label("fria", 0.0, 0.0, 20.0)?
        .with_label("agradavel", 15.0, 22.0, 30.0)?
        .with_label("quente", 25.0, 50.0, 50.0)
}

/// Soil moisture, percent.
pub fn soil_moisture() -> Result<LinguisticVariable> {
    LinguisticVariable::new(SOIL_MOISTURE, Universe::new(0.0, 100.0, 1.0)?)
        .with_label("seca", 0.0, 0.0, 40.0)?
        .with_label("ideal", 30.0, 50.0, 70.0)?
        .with_label("umida", 60.0, 100.0, 100.0)
}

/// Ambient light, 0 (dark) to 100 (full sun).
pub fn light() -> Result<LinguisticVariable> {
    LinguisticVariable::new(LIGHT, Universe::new(0.0, 100.0, 1.0)?)
        .with_label("escuro", 0.0, 0.0, 30.0)?
        .with_label("meia_luz", 20.0, 40.0, 60.0)?
        .with_label("claro", 50.0, 100.0, 100.0)
}

fn low_medium_high(name: &str) -> Result<LinguisticVariable> {
    LinguisticVariable::new(name, Universe::new(0.0, 100.0, 1.0)?)
        .with_label("baixa", 0.0, 0.0, 50.0)?
        .with_label("media", 25.0, 50.0, 75.0)?
        .with_label("alta", 50.0, 100.0, 100.0)
}

pub fn irrigation_system() -> Result<FuzzySystem> {
    let mut variables = VariableRegistry::new();
    variables.register(temperature()?)?;
    variables.register(soil_moisture()?)?;
    variables.register(low_medium_high(IRRIGATION)?)?;

    let rules = vec![
        Rule::when(TEMPERATURE, "quente")
            .and(SOIL_MOISTURE, "seca")
            .then(IRRIGATION, "alta"),
        Rule::when(TEMPERATURE, "agradavel")
            .and(SOIL_MOISTURE, "seca")
            .then(IRRIGATION, "media"),
        Rule::when(SOIL_MOISTURE, "ideal").then(IRRIGATION, "baixa"),
        Rule::when(SOIL_MOISTURE, "umida").then(IRRIGATION, "baixa"),
    ];

    FuzzySystem::new(IRRIGATION, variables, rules, &[IRRIGATION])
}

pub fn ventilation_system() -> Result<FuzzySystem> {
    let mut variables = VariableRegistry::new();
    variables.register(temperature()?)?;
    variables.register(low_medium_high(VENTILATION)?)?;

    let rules = vec![
        Rule::when(TEMPERATURE, "fria").then(VENTILATION, "baixa"),
        Rule::when(TEMPERATURE, "agradavel").then(VENTILATION, "media"),
        Rule::when(TEMPERATURE, "quente").then(VENTILATION, "alta"),
    ];

    FuzzySystem::new(VENTILATION, variables, rules, &[VENTILATION])
}

/// Inverse control: the more natural light, the less artificial light.
pub fn lighting_system() -> Result<FuzzySystem> {
    let mut variables = VariableRegistry::new();
    variables.register(light()?)?;
    variables.register(
        LinguisticVariable::new(LIGHTING, Universe::new(0.0, 100.0, 1.0)?)
            .with_label("desligada", 0.0, 0.0, 40.0)?
            .with_label("media", 30.0, 50.0, 70.0)?
            .with_label("alta", 60.0, 100.0, 100.0)?,
    )?;

    let rules = vec![
        Rule::when(LIGHT, "escuro").then(LIGHTING, "alta"),
        Rule::when(LIGHT, "meia_luz").then(LIGHTING, "media"),
        Rule::when(LIGHT, "claro").then(LIGHTING, "desligada"),
    ];

    FuzzySystem::new(LIGHTING, variables, rules, &[LIGHTING])
}
