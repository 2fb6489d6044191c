use serde::{Deserialize, Serialize};

/// Turns automation on or off for one actuator. `actuator` stays a string
/// until the controller validates it, so unknown ids surface as
/// `UnknownActuator` instead of a decode failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationCommand {
    #[serde(alias = "atuador")]
    pub actuator: String,
    #[serde(alias = "automatico")]
    pub automatic: bool,
}

/// Switches one actuator fully on or off while it is in manual mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualCommand {
    #[serde(alias = "atuador")]
    pub actuator: String,
    #[serde(alias = "ligado")]
    pub on: bool,
}
