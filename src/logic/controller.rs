use crate::error::{Result, SmartGrowError};
use crate::models::{
    Actuator, ActuatorState, AutomationCommand, Candidates, ControllerSnapshot, ManualCommand,
    Mode,
};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

pub const LEVEL_MIN: f64 = 0.0;
pub const LEVEL_MAX: f64 = 100.0;

/// Owner of the live actuator state.
///
/// Every operation takes the single lock for a handful of field writes and
/// copies, so readers always see a state from before or after a whole
/// write, never a mix across actuators. Inference must run before calling
/// in here; nothing numeric happens under the lock.
pub struct ActuatorController {
    states: Mutex<[ActuatorState; 3]>,
    reset_level_on_manual: bool,
}

impl ActuatorController {
    /// With `reset_level_on_manual`, switching an actuator to manual drops
    /// its level to 0 immediately instead of keeping the last automatic
    /// value until a manual command arrives.
    pub fn new(reset_level_on_manual: bool) -> Self {
        Self {
            states: Mutex::new([ActuatorState::default(); 3]),
            reset_level_on_manual,
        }
    }

    // Writers never leave a half-updated array behind, so a poisoned lock
    // still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, [ActuatorState; 3]> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Commits one reading's candidates. Actuators in manual mode and
    /// actuators without a candidate keep their level.
    pub fn apply_reading(&self, candidates: &Candidates) -> ControllerSnapshot {
        let mut states = self.lock();
        for actuator in Actuator::ALL {
            let state = &mut states[actuator.index()];
            if !state.is_auto() {
                continue;
            }
            match candidates.get(actuator) {
                Some(value) if value.is_finite() => {
                    state.level = value.clamp(LEVEL_MIN, LEVEL_MAX);
                }
                _ => {}
            }
        }
        debug!(
            irrigation = states[0].level,
            ventilation = states[1].level,
            lighting = states[2].level,
            "Applied reading"
        );
        ControllerSnapshot::from_states(*states)
    }

    pub fn set_mode(&self, actuator: Actuator, mode: Mode) -> ControllerSnapshot {
        let mut states = self.lock();
        let state = &mut states[actuator.index()];
        let previous = state.mode;
        state.mode = mode;
        match mode {
            Mode::Auto => state.manual_command = false,
            Mode::Manual if previous == Mode::Auto && self.reset_level_on_manual => {
                state.manual_command = false;
                state.level = LEVEL_MIN;
            }
            Mode::Manual => {}
        }
        if previous != mode {
            info!(actuator = %actuator, from = %previous, to = %mode, "Mode changed");
        }
        ControllerSnapshot::from_states(*states)
    }

    /// Forces an actuator fully on or off. Rejected while automation
    /// governs the actuator; switch it to manual first.
    pub fn set_manual_command(&self, actuator: Actuator, on: bool) -> Result<ControllerSnapshot> {
        let mut states = self.lock();
        let state = &mut states[actuator.index()];
        if state.is_auto() {
            return Err(SmartGrowError::AutomationActive(actuator));
        }
        state.manual_command = on;
        state.level = if on { LEVEL_MAX } else { LEVEL_MIN };
        info!(actuator = %actuator, on, "Manual command applied");
        Ok(ControllerSnapshot::from_states(*states))
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot::from_states(*self.lock())
    }

    /// Dynamic-input form of [`set_mode`](Self::set_mode).
    pub fn apply_automation_command(&self, cmd: &AutomationCommand) -> Result<ControllerSnapshot> {
        let actuator = Actuator::parse(&cmd.actuator)?;
        Ok(self.set_mode(actuator, Mode::from_automatic(cmd.automatic)))
    }

    /// Dynamic-input form of [`set_manual_command`](Self::set_manual_command).
    pub fn apply_manual_command(&self, cmd: &ManualCommand) -> Result<ControllerSnapshot> {
        let actuator = Actuator::parse(&cmd.actuator)?;
        self.set_manual_command(actuator, cmd.on)
    }
}

impl Default for ActuatorController {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all(value: f64) -> Candidates {
        Candidates {
            irrigation: Some(value),
            ventilation: Some(value),
            lighting: Some(value),
        }
    }

    #[test]
    fn starts_in_auto_at_zero() {
        let c = ActuatorController::default();
        let snap = c.snapshot();
        for a in Actuator::ALL {
            assert_eq!(snap.get(a).mode, Mode::Auto);
            assert_eq!(snap.level(a), 0.0);
            assert!(!snap.get(a).manual_command);
        }
    }

    #[test]
    fn apply_reading_clamps_and_holds_undefined() {
        let c = ActuatorController::default();
        c.apply_reading(&all(40.0));
        let snap = c.apply_reading(&Candidates {
            irrigation: Some(140.0),
            ventilation: None,
            lighting: Some(f64::NAN),
        });
        assert_eq!(snap.level(Actuator::Irrigation), 100.0);
        assert_eq!(snap.level(Actuator::Ventilation), 40.0);
        assert_eq!(snap.level(Actuator::Lighting), 40.0);
    }

    #[test]
    fn apply_reading_skips_manual_actuators() {
        let c = ActuatorController::default();
        c.apply_reading(&all(30.0));
        c.set_mode(Actuator::Ventilation, Mode::Manual);
        let snap = c.apply_reading(&all(90.0));
        assert_eq!(snap.level(Actuator::Irrigation), 90.0);
        assert_eq!(snap.level(Actuator::Ventilation), 30.0);
        assert_eq!(snap.level(Actuator::Lighting), 90.0);
    }

    #[test]
    fn manual_command_rejected_in_auto() {
        let c = ActuatorController::default();
        c.apply_reading(&all(55.0));
        let err = c.set_manual_command(Actuator::Irrigation, true);
        assert!(matches!(
            err,
            Err(SmartGrowError::AutomationActive(Actuator::Irrigation))
        ));
        let snap = c.snapshot();
        assert_eq!(snap.level(Actuator::Irrigation), 55.0);
        assert!(!snap.irrigation.manual_command);
    }

    #[test]
    fn manual_on_off_sets_full_levels() {
        let c = ActuatorController::default();
        c.apply_reading(&all(55.0));
        let snap = c.set_mode(Actuator::Lighting, Mode::Manual);
        // Level is kept until a command arrives.
        assert_eq!(snap.level(Actuator::Lighting), 55.0);

        let snap = c.set_manual_command(Actuator::Lighting, true).unwrap();
        assert_eq!(snap.level(Actuator::Lighting), 100.0);
        assert!(snap.lighting.manual_command);

        let snap = c.set_manual_command(Actuator::Lighting, false).unwrap();
        assert_eq!(snap.level(Actuator::Lighting), 0.0);
        assert!(!snap.lighting.manual_command);
    }

    #[test]
    fn reset_flag_zeroes_level_on_switch_to_manual() {
        let c = ActuatorController::new(true);
        c.apply_reading(&all(70.0));
        let snap = c.set_mode(Actuator::Irrigation, Mode::Manual);
        assert_eq!(snap.level(Actuator::Irrigation), 0.0);
        assert_eq!(snap.level(Actuator::Ventilation), 70.0);

        // Already manual: a repeated switch must not clobber a command.
        c.set_manual_command(Actuator::Irrigation, true).unwrap();
        let snap = c.set_mode(Actuator::Irrigation, Mode::Manual);
        assert_eq!(snap.level(Actuator::Irrigation), 100.0);
    }

    #[test]
    fn back_to_auto_clears_manual_flag() {
        let c = ActuatorController::default();
        c.set_mode(Actuator::Ventilation, Mode::Manual);
        c.set_manual_command(Actuator::Ventilation, true).unwrap();
        let snap = c.set_mode(Actuator::Ventilation, Mode::Auto);
        assert!(!snap.ventilation.manual_command);
        assert_eq!(snap.ventilation.mode, Mode::Auto);
        // Level waits for the next reading.
        assert_eq!(snap.level(Actuator::Ventilation), 100.0);
        let snap = c.apply_reading(&all(20.0));
        assert_eq!(snap.level(Actuator::Ventilation), 20.0);
    }

    #[test]
    fn hybrid_scenario_freezes_level_after_switch() {
        let c = ActuatorController::default();
        for v in [10.0, 35.0, 62.5] {
            c.apply_reading(&all(v));
        }
        let before = c.snapshot().level(Actuator::Irrigation);
        c.set_mode(Actuator::Irrigation, Mode::Manual);
        let snap = c.apply_reading(&all(5.0));
        assert_eq!(snap.level(Actuator::Irrigation), before);
        assert_eq!(before, 62.5);
    }

    #[test]
    fn commands_by_name() {
        let c = ActuatorController::default();
        let err = c.apply_automation_command(&AutomationCommand {
            actuator: "heater".into(),
            automatic: false,
        });
        assert!(matches!(err, Err(SmartGrowError::UnknownActuator(_))));
        assert_eq!(c.snapshot(), ControllerSnapshot::default());

        c.apply_automation_command(&AutomationCommand {
            actuator: "iluminacao".into(),
            automatic: false,
        })
        .unwrap();
        let snap = c
            .apply_manual_command(&ManualCommand {
                actuator: "lighting".into(),
                on: true,
            })
            .unwrap();
        assert_eq!(snap.level(Actuator::Lighting), 100.0);

        let err = c.apply_manual_command(&ManualCommand {
            actuator: "pump2".into(),
            on: true,
        });
        assert!(matches!(err, Err(SmartGrowError::UnknownActuator(_))));
    }

    #[test]
    fn concurrent_readers_never_see_torn_state() {
        let c = ActuatorController::default();
        c.set_mode(Actuator::Lighting, Mode::Manual);

        std::thread::scope(|s| {
            for w in 0..4 {
                let c = &c;
                s.spawn(move || {
                    for i in 0..500 {
                        c.apply_reading(&all(((w * 500 + i) % 101) as f64));
                    }
                });
            }
            {
                let c = &c;
                s.spawn(move || {
                    for i in 0..500 {
                        c.set_manual_command(Actuator::Lighting, i % 2 == 0).unwrap();
                    }
                });
            }
            for _ in 0..3 {
                let c = &c;
                s.spawn(move || {
                    for _ in 0..2_000 {
                        let snap = c.snapshot();
                        // Auto actuators always receive the same candidate.
                        assert_eq!(snap.irrigation.level, snap.ventilation.level);
                        assert_eq!(snap.irrigation.mode, Mode::Auto);
                        let l = snap.lighting;
                        assert_eq!(l.mode, Mode::Manual);
                        assert_eq!(l.level, if l.manual_command { 100.0 } else { 0.0 });
                    }
                });
            }
        });

        let snap = c.snapshot();
        assert_eq!(snap.irrigation.level, snap.ventilation.level);
    }
}
