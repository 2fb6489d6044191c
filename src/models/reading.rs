use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One periodic sensor sample as posted by the greenhouse controller board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Air temperature in °C.
    #[serde(alias = "temperatura_celsius")]
    pub temperature: f64,
    /// Soil moisture in percent.
    #[serde(alias = "umidade_solo")]
    pub soil_moisture: f64,
    /// Ambient light in percent. Only the fuzzy lighting policy needs it.
    #[serde(default, alias = "luminosidade", skip_serializing_if = "Option::is_none")]
    pub light: Option<f64>,
}

impl SensorReading {
    pub fn new(temperature: f64, soil_moisture: f64) -> Self {
        Self {
            temperature,
            soil_moisture,
            light: None,
        }
    }

    pub fn with_light(mut self, light: f64) -> Self {
        self.light = Some(light);
        self
    }
}

/// Raw reading as kept by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReading {
    pub id: i64,
    pub temperature: f64,
    pub soil_moisture: f64,
    pub light: Option<f64>,
    pub recorded_at: DateTime<Utc>,
}
