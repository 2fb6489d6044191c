use crate::error::{Result, SmartGrowError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actuator {
    Irrigation,
    Ventilation,
    Lighting,
}

impl Actuator {
    pub const ALL: [Actuator; 3] = [Actuator::Irrigation, Actuator::Ventilation, Actuator::Lighting];

    pub fn as_str(&self) -> &'static str {
        match self {
            Actuator::Irrigation => "irrigation",
            Actuator::Ventilation => "ventilation",
            Actuator::Lighting => "lighting",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Actuator::Irrigation => 0,
            Actuator::Ventilation => 1,
            Actuator::Lighting => 2,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "irrigation" | "irrigacao" | "irrigação" | "pump" => Some(Actuator::Irrigation),
            "ventilation" | "ventilacao" | "ventilação" | "fan" => Some(Actuator::Ventilation),
            "lighting" | "iluminacao" | "iluminação" | "light" | "lights" => {
                Some(Actuator::Lighting)
            }
            _ => None,
        }
    }

    /// Like [`Actuator::from_str`], failing with `UnknownActuator`.
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).ok_or_else(|| SmartGrowError::UnknownActuator(s.to_string()))
    }
}

impl std::fmt::Display for Actuator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    #[default]
    Auto,
    Manual,
}

impl Mode {
    pub fn from_automatic(automatic: bool) -> Self {
        if automatic {
            Mode::Auto
        } else {
            Mode::Manual
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Auto => "AUTO",
            Mode::Manual => "MANUAL",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Runtime record of one actuator. Only the controller writes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActuatorState {
    /// Last committed command, percent in `[0, 100]`.
    pub level: f64,
    pub mode: Mode,
    /// Meaningful only in `Mode::Manual`.
    pub manual_command: bool,
}

impl ActuatorState {
    pub fn is_auto(&self) -> bool {
        self.mode == Mode::Auto
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeMap {
    pub irrigation: Mode,
    pub ventilation: Mode,
    pub lighting: Mode,
}

/// Immutable copy of every actuator, taken atomically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerSnapshot {
    pub irrigation: ActuatorState,
    pub ventilation: ActuatorState,
    pub lighting: ActuatorState,
}

impl ControllerSnapshot {
    pub fn from_states(states: [ActuatorState; 3]) -> Self {
        let [irrigation, ventilation, lighting] = states;
        Self {
            irrigation,
            ventilation,
            lighting,
        }
    }

    pub fn get(&self, actuator: Actuator) -> &ActuatorState {
        match actuator {
            Actuator::Irrigation => &self.irrigation,
            Actuator::Ventilation => &self.ventilation,
            Actuator::Lighting => &self.lighting,
        }
    }

    pub fn level(&self, actuator: Actuator) -> f64 {
        self.get(actuator).level
    }

    pub fn modes(&self) -> ModeMap {
        ModeMap {
            irrigation: self.irrigation.mode,
            ventilation: self.ventilation.mode,
            lighting: self.lighting.mode,
        }
    }
}
