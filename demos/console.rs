//! Interactive console example.
//!
//! Reads command lines from stdin and runs a simulated gantry in real time,
//! writing responses to stdout. Pass a TOML file to override the stock
//! machine configuration:
//!
//! ```text
//! cargo run --example console -- gantry.toml
//! ```
//!
//! The simulated limit switches close 400 steps below power-on position.

use std::cell::Cell;
use std::io::BufRead;
use std::rc::Rc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use gantry_motion::{Actuator, Axis, GantryBuilder, GantryConfig, LimitSwitch, NoOutput};

#[derive(Clone, Default)]
struct SimSwitch(Rc<Cell<bool>>);

impl LimitSwitch for SimSwitch {
    fn is_triggered(&mut self) -> gantry_motion::Result<bool> {
        Ok(self.0.get())
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

const SWITCH_AT: i64 = -400;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => gantry_motion::load_config(path)?,
        None => GantryConfig::default(),
    };

    let (x_switch, y_switch) = (SimSwitch::default(), SimSwitch::default());
    let mut gantry = GantryBuilder::new()
        .config(config)
        .z_output(NoOutput)
        .x_output(NoOutput)
        .y_output(NoOutput)
        .x_switch(x_switch.clone())
        .y_switch(y_switch.clone())
        .build()?;

    // Lines arrive on a reader thread so the control loop never blocks.
    let (tx, rx) = mpsc::channel::<String>();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines().map_while(Result::ok) {
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut out = Console;
    gantry.begin(&mut out);

    let start = Instant::now();
    let mut stdin_open = true;
    let (mut x_offset, mut y_offset) = (0i64, 0i64);

    while stdin_open || !gantry.is_queue_empty() {
        loop {
            match rx.try_recv() {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        // Rejections are already reported on the console.
                        let _ = gantry.process_command(line, &mut out);
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    stdin_open = false;
                    break;
                }
            }
        }

        let x = gantry.actuator(Axis::X).current_position();
        let y = gantry.actuator(Axis::Y).current_position();
        x_switch.0.set(gantry.is_homing() && x + x_offset <= SWITCH_AT);
        y_switch.0.set(gantry.is_homing() && y + y_offset <= SWITCH_AT);

        gantry.tick(start.elapsed().as_micros() as u64, &mut out)?;

        // Follow position redefinitions so the switches stay put.
        let x_after = gantry.actuator(Axis::X).current_position();
        let y_after = gantry.actuator(Axis::Y).current_position();
        if (x_after - x).abs() > 1 {
            x_offset += x - x_after;
        }
        if (y_after - y).abs() > 1 {
            y_offset += y - y_after;
        }

        std::thread::sleep(Duration::from_micros(20));
    }

    Ok(())
}
