pub mod controller;
pub mod greenhouse;
pub mod lighting;
pub mod session;

pub use controller::ActuatorController;
pub use lighting::{FuzzyLighting, LightingPolicy, NightWindow, TimeOfDayLighting};
pub use session::DecisionEngine;
