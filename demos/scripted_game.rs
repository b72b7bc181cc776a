//! Scripted chess move example.
//!
//! Drives a complete gantry with mock pins through homing and one capture,
//! on a simulated clock, printing every response line.
//!
//! Z is a unipolar motor on four coil pins; X and Y use STEP/DIR drivers.

use std::cell::Cell;
use std::rc::Rc;

use gantry_motion::{
    Actuator, ActiveLowSwitch, Axis, FullFourWire, GantryBuilder, GantryConfig, StepDir,
};

/// Mock output pin counting rising edges.
#[derive(Clone, Default)]
struct MockPin {
    state: bool,
    rising_edges: Rc<Cell<u64>>,
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for MockPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        if !self.state {
            self.rising_edges.set(self.rising_edges.get() + 1);
        }
        self.state = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.state = false;
        Ok(())
    }
}

/// Mock limit switch input, pulled up; low while pressed.
#[derive(Clone, Default)]
struct MockSwitchPin {
    pressed: Rc<Cell<bool>>,
}

impl embedded_hal::digital::ErrorType for MockSwitchPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::InputPin for MockSwitchPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.pressed.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pressed.get())
    }
}

/// Response sink printing to stdout.
struct Console;

impl core::fmt::Write for Console {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        print!("{}", s);
        Ok(())
    }
}

/// Where the carriage meets each switch, in steps from the power-on position.
const X_SWITCH_AT: i64 = -300;
const Y_SWITCH_AT: i64 = -240;

const TICK_US: u64 = 50;

fn main() {
    println!("=== Scripted Game Example ===\n");

    let x_step = MockPin::default();
    let y_step = MockPin::default();
    let (x_limit, y_limit) = (MockSwitchPin::default(), MockSwitchPin::default());

    let mut config = GantryConfig::default();
    config.board.origin_x_mm = gantry_motion::Millimeters(20.0);
    config.board.origin_y_mm = gantry_motion::Millimeters(20.0);

    let mut gantry = GantryBuilder::new()
        .config(config)
        .z_output(FullFourWire::new(
            MockPin::default(),
            MockPin::default(),
            MockPin::default(),
            MockPin::default(),
        ))
        .x_output(StepDir::new(x_step.clone(), MockPin::default()))
        .y_output(StepDir::new(y_step.clone(), MockPin::default()))
        .x_switch(ActiveLowSwitch::new(x_limit.clone()))
        .y_switch(ActiveLowSwitch::new(y_limit.clone()))
        .build()
        .expect("Failed to build gantry");

    let mut out = Console;
    gantry.begin(&mut out);

    // Capture on e4 with the piece from d5, then park.
    let mut script = [
        "AUTOCALIB",
        "WARP(120,120)",
        "UP",
        "MOVE(180,120)",
        "DOWN",
        "WARP(90,150)",
        "UP",
        "MOVE(120,120)",
        "DOWN",
        "HOME",
    ]
    .into_iter()
    .peekable();

    // Machine position of each axis, tracked across the homing redefinition.
    let mut x_origin = 0i64;
    let mut y_origin = 0i64;

    let mut now = 0u64;
    while script.peek().is_some() || !gantry.is_queue_empty() {
        // Feed the host side only while the queue has room.
        if gantry.queue().len() < gantry.queue().capacity() {
            if let Some(line) = script.next() {
                gantry
                    .process_command(line, &mut out)
                    .expect("Queue has room");
            }
        }

        let homing = gantry.is_homing();
        let x = gantry.actuator(Axis::X).current_position();
        let y = gantry.actuator(Axis::Y).current_position();
        x_limit.pressed.set(homing && x + x_origin <= X_SWITCH_AT);
        y_limit.pressed.set(homing && y + y_origin <= Y_SWITCH_AT);

        gantry.tick(now, &mut out).expect("Mock pins cannot fail");
        now += TICK_US;

        // Homing redefines the contact point; keep the switch where it is.
        let x_after = gantry.actuator(Axis::X).current_position();
        let y_after = gantry.actuator(Axis::Y).current_position();
        if (x_after - x).abs() > 1 {
            x_origin += x - x_after;
        }
        if (y_after - y).abs() > 1 {
            y_origin += y - y_after;
        }
    }

    gantry
        .process_command("COORD", &mut out)
        .expect("COORD is never queued");

    println!("\nSimulated time: {:.2} s", now as f64 / 1e6);
    println!("X step pulses: {}", x_step.rising_edges.get());
    println!("Y step pulses: {}", y_step.rising_edges.get());
    println!("\n=== Example Complete ===");
}
