//! Wheel state acquisition through gilrs.
//!
//! The sampler is the only stateful collaborator: it owns the gilrs
//! context acquired once at startup. Hot-plug is out of scope; whatever
//! wheel is attached when the service starts is the wheel for the life of
//! the process.

use std::sync::Mutex;

use gilrs::{Axis, Button, GamepadId, Gilrs};
use tracing::{info, warn};

pub const BUTTON_COUNT: usize = 18;

const AXIS_MAX: f64 = 65535.0;

/// Wheel button numbering follows the layout the device reports over
/// DirectInput-style drivers: positions 12-17 are the shifter gates for
/// gears 1-6 and position 11 is reverse. gilrs exposes buttons as named
/// codes, so this table pins each numbered position to one code.
const BUTTON_LAYOUT: [Button; BUTTON_COUNT] = [
    Button::South,
    Button::East,
    Button::North,
    Button::West,
    Button::C,
    Button::Z,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
];

/// One raw reading of the wheel, produced fresh per sample.
///
/// Axes use the raw unsigned 16-bit range: `axis_x` left to right,
/// `axis_y` top-zero (0 = pedal fully pressed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawWheelState {
    pub axis_x: u16,
    pub axis_y: u16,
    pub buttons: [bool; BUTTON_COUNT],
}

/// Read the current raw wheel state. `None` means no device is attached.
pub trait WheelSampler: Send + Sync {
    fn sample(&self) -> Option<RawWheelState>;
}

pub struct GilrsSampler {
    inner: Mutex<Gilrs>,
    active: Option<GamepadId>,
}

impl GilrsSampler {
    /// Initializes gilrs and acquires the first connected gamepad. Starting
    /// without a device is not an error; the sampler then reports
    /// not-attached on every read.
    pub fn new() -> Result<Self, gilrs::Error> {
        let gilrs = Gilrs::new()?;

        let active = gilrs.gamepads().next().map(|(id, gamepad)| {
            info!("acquired input device: {} ({id})", gamepad.name());
            id
        });
        if active.is_none() {
            warn!("no input device attached at startup");
        }

        Ok(Self {
            inner: Mutex::new(gilrs),
            active,
        })
    }
}

impl WheelSampler for GilrsSampler {
    fn sample(&self) -> Option<RawWheelState> {
        let id = self.active?;
        let mut gilrs = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        // Drain the event queue so the cached gamepad state is current.
        while gilrs.next_event().is_some() {}

        let gamepad = gilrs.gamepad(id);
        if !gamepad.is_connected() {
            return None;
        }

        let mut buttons = [false; BUTTON_COUNT];
        for (pressed, code) in buttons.iter_mut().zip(BUTTON_LAYOUT) {
            *pressed = gamepad.is_pressed(code);
        }

        Some(RawWheelState {
            axis_x: axis_to_raw(gamepad.value(Axis::LeftStickX)),
            // gilrs sticks are up-positive; the raw scale is top-zero.
            axis_y: axis_to_raw(-gamepad.value(Axis::LeftStickY)),
            buttons,
        })
    }
}

/// Converts a gilrs axis value in [-1, 1] to the raw 16-bit range.
fn axis_to_raw(value: f32) -> u16 {
    let scaled = (f64::from(value) + 1.0) / 2.0 * AXIS_MAX;
    scaled.clamp(0.0, AXIS_MAX) as u16
}
