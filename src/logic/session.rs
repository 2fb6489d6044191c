use super::controller::ActuatorController;
use super::greenhouse::{self, IRRIGATION, SOIL_MOISTURE, TEMPERATURE, VENTILATION};
use super::lighting::LightingPolicy;
use crate::error::Result;
use crate::fuzzy::FuzzySystem;
use crate::models::{Actuator, Candidates, Decision, SensorReading};
use chrono::{Local, Timelike};
use std::sync::Arc;
use tracing::{info, warn};

/// Runs one reading through inference and commits it to the controller.
pub struct DecisionEngine {
    irrigation: FuzzySystem,
    ventilation: FuzzySystem,
    lighting: Box<dyn LightingPolicy>,
    controller: Arc<ActuatorController>,
}

impl DecisionEngine {
    pub fn new(lighting: Box<dyn LightingPolicy>, controller: Arc<ActuatorController>) -> Result<Self> {
        Ok(Self {
            irrigation: greenhouse::irrigation_system()?,
            ventilation: greenhouse::ventilation_system()?,
            lighting,
            controller,
        })
    }

    pub fn controller(&self) -> &Arc<ActuatorController> {
        &self.controller
    }

    pub fn lighting_policy(&self) -> &str {
        self.lighting.id()
    }

    /// Crisp candidates for `reading`. Pure; takes no lock.
    pub fn candidates(&self, reading: &SensorReading, hour: u32) -> Result<Candidates> {
        let irrigation = self
            .irrigation
            .session()
            .input(TEMPERATURE, reading.temperature)
            .input(SOIL_MOISTURE, reading.soil_moisture)
            .compute()?
            .get(IRRIGATION);

        let ventilation = self
            .ventilation
            .session()
            .input(TEMPERATURE, reading.temperature)
            .compute()?
            .get(VENTILATION);

        let lighting = self.lighting.candidate(reading, hour)?;

        Ok(Candidates {
            irrigation,
            ventilation,
            lighting,
        })
    }

    /// Processes `reading` at the current local hour.
    pub fn process(&self, reading: &SensorReading) -> Result<Decision> {
        self.process_at(reading, Local::now().hour())
    }

    pub fn process_at(&self, reading: &SensorReading, hour: u32) -> Result<Decision> {
        let candidates = self.candidates(reading, hour)?;
        let held: Vec<Actuator> = candidates.undefined();
        for actuator in &held {
            warn!(
                actuator = %actuator,
                temperature = reading.temperature,
                soil_moisture = reading.soil_moisture,
                "No rule fired, holding previous level"
            );
        }

        let snapshot = self.controller.apply_reading(&candidates);
        let decision = Decision::new(&snapshot, held);

        info!(
            temperature = reading.temperature,
            soil_moisture = reading.soil_moisture,
            light = ?reading.light,
            irrigation = decision.irrigation_level,
            ventilation = decision.ventilation_level,
            lighting = decision.lighting_level,
            "Fuzzy decision"
        );

        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SmartGrowError;
    use crate::logic::lighting::{FuzzyLighting, NightWindow, TimeOfDayLighting};
    use crate::models::{ControllerSnapshot, Mode};

    fn engine() -> DecisionEngine {
        let lighting = TimeOfDayLighting::new(NightWindow::new(18, 6).unwrap());
        DecisionEngine::new(Box::new(lighting), Arc::new(ActuatorController::default())).unwrap()
    }

    #[test]
    fn hot_dry_reading_at_night() {
        let engine = engine();
        let d = engine.process_at(&SensorReading::new(35.0, 25.0), 22).unwrap();
        assert!((75.0..=100.0).contains(&d.irrigation_level));
        assert!(d.ventilation_level > 50.0);
        assert_eq!(d.lighting_level, 100.0);
        assert_eq!(d.mode.irrigation, Mode::Auto);
        assert!(d.held.is_empty());
    }

    #[test]
    fn undefined_output_holds_previous_level() {
        let engine = engine();
        let first = engine.process_at(&SensorReading::new(35.0, 25.0), 12).unwrap();
        // Cold and dry: no irrigation rule fires.
        let second = engine.process_at(&SensorReading::new(10.0, 20.0), 12).unwrap();
        assert_eq!(second.held, vec![Actuator::Irrigation]);
        assert_eq!(second.irrigation_level, first.irrigation_level);
        assert_ne!(second.ventilation_level, first.ventilation_level);
    }

    #[test]
    fn manual_actuator_survives_readings() {
        let engine = engine();
        for t in [20.0, 28.0, 33.0] {
            engine.process_at(&SensorReading::new(t, 35.0), 12).unwrap();
        }
        let before = engine.controller().snapshot().level(Actuator::Ventilation);
        engine.controller().set_mode(Actuator::Ventilation, Mode::Manual);
        let d = engine.process_at(&SensorReading::new(45.0, 35.0), 12).unwrap();
        assert_eq!(d.ventilation_level, before);
        assert_eq!(d.mode.ventilation, Mode::Manual);
    }

    #[test]
    fn fuzzy_lighting_needs_light_and_leaves_state_untouched() {
        let controller = Arc::new(ActuatorController::default());
        let engine =
            DecisionEngine::new(Box::new(FuzzyLighting::new().unwrap()), controller.clone()).unwrap();
        assert_eq!(engine.lighting_policy(), "fuzzy");

        let err = engine.process_at(&SensorReading::new(35.0, 25.0), 12);
        assert!(matches!(err, Err(SmartGrowError::MissingInput(_))));
        assert_eq!(controller.snapshot(), ControllerSnapshot::default());

        let d = engine
            .process_at(&SensorReading::new(35.0, 25.0).with_light(10.0), 12)
            .unwrap();
        assert!(d.lighting_level > 80.0);
    }

    #[test]
    fn candidates_are_deterministic() {
        let engine = engine();
        let r = SensorReading::new(27.3, 33.0);
        assert_eq!(engine.candidates(&r, 3).unwrap(), engine.candidates(&r, 3).unwrap());
    }
}
