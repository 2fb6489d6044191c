use super::greenhouse::{self, LIGHT, LIGHTING};
use crate::error::{Result, SmartGrowError};
use crate::fuzzy::FuzzySystem;
use crate::models::SensorReading;

/// Strategy for the lighting candidate of one reading.
pub trait LightingPolicy: Send + Sync {
    /// Unique identifier for this policy
    fn id(&self) -> &'static str;

    /// Candidate level for `reading` taken at local hour `hour` (0-23).
    /// `None` holds the previous level.
    fn candidate(&self, reading: &SensorReading, hour: u32) -> Result<Option<f64>>;
}

/// Hours `[start, end)` during which the lights are forced on. Wraps
/// midnight when `start > end`; empty when `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NightWindow {
    start_hour: u32,
    end_hour: u32,
}

impl NightWindow {
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self> {
        if start_hour > 23 || end_hour > 23 {
            return Err(SmartGrowError::Config(format!(
                "night window hours must be within 0-23, got {}-{}",
                start_hour, end_hour
            )));
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    pub fn contains(&self, hour: u32) -> bool {
        if self.start_hour <= self.end_hour {
            hour >= self.start_hour && hour < self.end_hour
        } else {
            hour >= self.start_hour || hour < self.end_hour
        }
    }
}

/// Lights fully on inside the night window, off outside it.
pub struct TimeOfDayLighting {
    window: NightWindow,
}

impl TimeOfDayLighting {
    pub fn new(window: NightWindow) -> Self {
        Self { window }
    }
}

impl LightingPolicy for TimeOfDayLighting {
    fn id(&self) -> &'static str {
        "time_of_day"
    }

    fn candidate(&self, _reading: &SensorReading, hour: u32) -> Result<Option<f64>> {
        Ok(Some(if self.window.contains(hour) { 100.0 } else { 0.0 }))
    }
}

/// Artificial light inferred from the ambient light sensor.
pub struct FuzzyLighting {
    system: FuzzySystem,
}

impl FuzzyLighting {
    pub fn new() -> Result<Self> {
        Ok(Self {
            system: greenhouse::lighting_system()?,
        })
    }
}

impl LightingPolicy for FuzzyLighting {
    fn id(&self) -> &'static str {
        "fuzzy"
    }

    fn candidate(&self, reading: &SensorReading, _hour: u32) -> Result<Option<f64>> {
        let light = reading.light.ok_or_else(|| {
            SmartGrowError::MissingInput(format!("{} (required by fuzzy lighting)", LIGHT))
        })?;
        let outputs = self.system.session().input(LIGHT, light).compute()?;
        Ok(outputs.get(LIGHTING))
    }
}
