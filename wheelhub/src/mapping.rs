//! Pure mapping from a raw wheel sample to control values.
//!
//! Every function here is total over its input domain: no I/O, no error
//! path, and the same sample always maps to the same values.

use crate::sampler::RawWheelState;
use wheel_protocol::ControlValues;

pub const MAX_STEER: i32 = 200;
pub const MAX_SPEED: i32 = 1000;

const AXIS_MAX: f64 = 65535.0;
const FORWARD_GEARS: i32 = 6;

/// Gear selection as an ordered (button index, gear) table, first pressed
/// entry wins. Shifter gates 1-6 (buttons 12-17) take priority over
/// reverse (button 11); the order is part of the wheel's contract, so
/// simultaneous presses of 11 and 12 resolve to gear 1, never 7.
pub const GEAR_TABLE: [(usize, u8); 7] = [
    (12, 1),
    (13, 2),
    (14, 3),
    (15, 4),
    (16, 5),
    (17, 6),
    (11, 7),
];

pub fn gear(buttons: &[bool]) -> u8 {
    GEAR_TABLE
        .iter()
        .find(|(index, _)| buttons.get(*index).copied().unwrap_or(false))
        .map_or(0, |&(_, gear)| gear)
}

/// Linear map of the steering axis onto [-100, 100]. The scaled value is
/// truncated before the half-range shift; the order matters for values
/// just above the low end of the axis.
pub fn steer(axis_x: u16) -> i32 {
    (f64::from(axis_x) * f64::from(MAX_STEER) / AXIS_MAX) as i32 - MAX_STEER / 2
}

/// Throttle axis is top-zero: a reading of 0 is full throttle and maps to
/// the gear's share of `MAX_SPEED`. The clamps run in sequence: gear 1 caps
/// at 80, gears above 1 cap at 100, and gear 7 (reverse) passes through the
/// second clamp before being negated and divided by 5, bounding reverse at
/// a magnitude of 20. Gear 0 zeroes the product.
pub fn speed(axis_y: u16, gear: u8) -> i32 {
    let mut speed = ((-f64::from(axis_y) + AXIS_MAX) / 2.0 / AXIS_MAX * f64::from(MAX_SPEED)
        / f64::from(FORWARD_GEARS)
        * f64::from(gear)) as i32;

    if gear == 1 && speed > 80 {
        speed = 80;
    }
    if gear > 1 && speed > 100 {
        speed = 100;
    }
    if gear == 7 {
        speed = -speed / 5;
    }

    speed
}

pub fn map_state(state: &RawWheelState) -> ControlValues {
    let gear = gear(&state.buttons);
    ControlValues {
        steer: steer(state.axis_x),
        speed: speed(state.axis_y, gear),
        gear,
    }
}
