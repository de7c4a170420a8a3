//=========================================================================
// GPIO Buttons
//=========================================================================
//
// Polls push-buttons through the Linux sysfs GPIO interface.
//
// Buttons are wired pull-up, active low: a value of `0` means pressed.
// Each poll compares the pin against its last accepted level and sends a
// press or release edge to the input queue. Edges arriving within the
// bounce window of the previous accepted edge are ignored.
//
// Pins that cannot be exported or read are skipped with a warning; with
// no usable pin the poller is inert and the appliance still boots.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::config::GpioConfig;
use crate::core::input::{ActionMapper, InputAction, InputSource, PhysicalInput};

//=== GpioPin =============================================================

#[derive(Debug)]
struct GpioPin {
    pin: u8,
    value_path: PathBuf,
    pressed: bool,
    last_edge: Option<Duration>,
}

//=== GpioPoller ==========================================================

#[derive(Debug)]
pub struct GpioPoller {
    pins: Vec<GpioPin>,
    source: InputSource,
    bounce: Duration,
}

impl GpioPoller {
    //--- Construction -----------------------------------------------------

    /// Exports and configures every pin in `pins`. Failures leave that
    /// pin out.
    pub fn open(config: &GpioConfig, pins: &[u8], source: InputSource) -> Self {
        let mut opened = Vec::with_capacity(pins.len());

        for &pin in pins {
            match export_input_pin(&config.sysfs_root, pin) {
                Ok(value_path) => {
                    debug!(target: "platform::input", "GPIO {} ready at {}", pin, value_path.display());
                    opened.push(GpioPin {
                        pin,
                        value_path,
                        pressed: false,
                        last_edge: None,
                    });
                }
                Err(e) => warn!(target: "platform::input", "GPIO {} unavailable: {}", pin, e),
            }
        }

        if opened.is_empty() {
            warn!(target: "platform::input", "No GPIO buttons available, input is inert");
        } else {
            info!(target: "platform::input", "Polling {} GPIO buttons", opened.len());
        }

        Self {
            pins: opened,
            source,
            bounce: Duration::from_millis(config.bounce_ms),
        }
    }

    pub fn is_inert(&self) -> bool {
        self.pins.is_empty()
    }

    //--- poll() -----------------------------------------------------------
    //
    // Reads every pin once. `now` is the time since startup, used for the
    // bounce window. Returns the number of edges sent.
    //
    pub fn poll(&mut self, now: Duration) -> usize {
        let mut sent = 0;

        for pin in &mut self.pins {
            let pressed = match std::fs::read_to_string(&pin.value_path) {
                Ok(value) => value.trim() == "0",
                Err(e) => {
                    trace!(target: "platform::input", "GPIO {} read failed: {}", pin.pin, e);
                    continue;
                }
            };

            if pressed == pin.pressed {
                continue;
            }

            if let Some(last) = pin.last_edge {
                if now.saturating_sub(last) < self.bounce {
                    trace!(target: "platform::input", "GPIO {} bounce ignored", pin.pin);
                    continue;
                }
            }

            pin.pressed = pressed;
            pin.last_edge = Some(now);

            let input = PhysicalInput::Pin(pin.pin);
            let queued = if pressed { self.source.press(input) } else { self.source.release(input) };
            if queued {
                sent += 1;
            }
        }

        sent
    }
}

//=== Bindings ============================================================

/// Binds the configured button pins on top of `mapper`.
pub fn bind_buttons(mapper: &mut ActionMapper, config: &GpioConfig) {
    mapper.bind_pin(config.prev, InputAction::Prev);
    mapper.bind_pin(config.next, InputAction::Next);
    mapper.bind_pin(config.enter, InputAction::Enter);
    if let Some(escape) = config.escape {
        mapper.bind_pin(escape, InputAction::Escape);
    }
}

//=== Sysfs Helpers =======================================================

fn export_input_pin(root: &Path, pin: u8) -> std::io::Result<PathBuf> {
    let pin_dir = root.join(format!("gpio{}", pin));
    if !pin_dir.exists() {
        std::fs::write(root.join("export"), pin.to_string())?;
    }

    let direction = pin_dir.join("direction");
    if direction.exists() {
        std::fs::write(&direction, "in")?;
    }

    let value_path = pin_dir.join("value");
    std::fs::read_to_string(&value_path)?;
    Ok(value_path)
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputState, InputSystem};

    /// Fake sysfs tree with pins already exported, all released.
    fn fake_sysfs(pins: &[u8]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for pin in pins {
            let pin_dir = dir.path().join(format!("gpio{}", pin));
            std::fs::create_dir(&pin_dir).unwrap();
            std::fs::write(pin_dir.join("direction"), "out").unwrap();
            std::fs::write(pin_dir.join("value"), "1\n").unwrap();
        }
        dir
    }

    fn set_level(root: &Path, pin: u8, level: &str) {
        std::fs::write(root.join(format!("gpio{}/value", pin)), level).unwrap();
    }

    fn setup(pins: &[u8]) -> (tempfile::TempDir, GpioConfig, InputSystem) {
        let dir = fake_sysfs(pins);
        let config = GpioConfig {
            sysfs_root: dir.path().to_path_buf(),
            ..GpioConfig::default()
        };
        let mut mapper = ActionMapper::new();
        bind_buttons(&mut mapper, &config);
        (dir, config, InputSystem::new(mapper, 16))
    }

    fn state(system: &mut InputSystem) -> &InputState {
        system.pump();
        system.state()
    }

    #[test]
    fn open_configures_pins_as_inputs() {
        let (dir, config, system) = setup(&[16, 20, 21]);
        let poller = GpioPoller::open(&config, &[16, 20, 21], system.source());

        assert!(!poller.is_inert());
        let direction = std::fs::read_to_string(dir.path().join("gpio16/direction")).unwrap();
        assert_eq!(direction, "in");
    }

    #[test]
    fn missing_pins_leave_poller_inert() {
        let (_dir, config, system) = setup(&[]);
        let mut poller = GpioPoller::open(&config, &[16], system.source());

        assert!(poller.is_inert());
        assert_eq!(poller.poll(Duration::ZERO), 0);
    }

    #[test]
    fn active_low_level_presses_bound_action() {
        let (dir, config, mut system) = setup(&[16]);
        let mut poller = GpioPoller::open(&config, &[16], system.source());

        set_level(dir.path(), 16, "0\n");
        assert_eq!(poller.poll(Duration::from_millis(100)), 1);
        assert!(state(&mut system).is_just_pressed(InputAction::Enter));

        system.end_frame();
        set_level(dir.path(), 16, "1\n");
        poller.poll(Duration::from_millis(200));
        assert!(!state(&mut system).is_held(InputAction::Enter));
    }

    #[test]
    fn edges_inside_bounce_window_are_ignored() {
        let (dir, config, mut system) = setup(&[21]);
        let mut poller = GpioPoller::open(&config, &[21], system.source());

        set_level(dir.path(), 21, "0");
        poller.poll(Duration::from_millis(100));
        set_level(dir.path(), 21, "1");
        assert_eq!(poller.poll(Duration::from_millis(120)), 0);

        assert!(state(&mut system).is_held(InputAction::Prev));
        assert_eq!(poller.poll(Duration::from_millis(160)), 1);
    }

    #[test]
    fn escape_pin_is_optional() {
        let mut mapper = ActionMapper::new();
        let config = GpioConfig { escape: Some(26), ..GpioConfig::default() };
        bind_buttons(&mut mapper, &config);

        assert_eq!(mapper.map(PhysicalInput::Pin(26)), Some(InputAction::Escape));
        assert_eq!(mapper.bound_pins(), vec![16, 20, 21, 26]);
    }
}
