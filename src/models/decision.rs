use super::actuator::{Actuator, ControllerSnapshot, ModeMap};
use serde::{Deserialize, Serialize};

/// Crisp candidate level per actuator for one reading. `None` holds the
/// previously committed level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidates {
    pub irrigation: Option<f64>,
    pub ventilation: Option<f64>,
    pub lighting: Option<f64>,
}

impl Candidates {
    pub fn get(&self, actuator: Actuator) -> Option<f64> {
        match actuator {
            Actuator::Irrigation => self.irrigation,
            Actuator::Ventilation => self.ventilation,
            Actuator::Lighting => self.lighting,
        }
    }

    pub fn set(&mut self, actuator: Actuator, value: Option<f64>) {
        match actuator {
            Actuator::Irrigation => self.irrigation = value,
            Actuator::Ventilation => self.ventilation = value,
            Actuator::Lighting => self.lighting = value,
        }
    }

    /// Actuators without a candidate value.
    pub fn undefined(&self) -> Vec<Actuator> {
        Actuator::ALL
            .into_iter()
            .filter(|a| self.get(*a).is_none())
            .collect()
    }
}

/// Result of one decision session, as returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub irrigation_level: f64,
    pub ventilation_level: f64,
    pub lighting_level: f64,
    pub mode: ModeMap,
    /// Actuators whose inference produced no output and kept their level.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub held: Vec<Actuator>,
}

impl Decision {
    pub fn new(snapshot: &ControllerSnapshot, held: Vec<Actuator>) -> Self {
        Self {
            irrigation_level: snapshot.irrigation.level,
            ventilation_level: snapshot.ventilation.level,
            lighting_level: snapshot.lighting.level,
            mode: snapshot.modes(),
            held,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_track_undefined_outputs() {
        let mut c = Candidates::default();
        assert_eq!(c.undefined(), Actuator::ALL.to_vec());
        c.set(Actuator::Ventilation, Some(42.0));
        assert_eq!(c.get(Actuator::Ventilation), Some(42.0));
        assert_eq!(c.undefined(), vec![Actuator::Irrigation, Actuator::Lighting]);
    }

    #[test]
    fn decision_wire_shape() {
        let snap = ControllerSnapshot::default();
        let json = serde_json::to_value(Decision::new(&snap, Vec::new())).unwrap();
        assert_eq!(json["irrigation_level"], 0.0);
        assert_eq!(json["mode"]["lighting"], "AUTO");
        assert!(json.get("held").is_none());
    }
}
