//! Integration tests for gantry-motion.
//!
//! These drive a complete simulated gantry through the public API: command
//! lines in, response lines out, a simulated clock and simulated limit
//! switches.

use std::cell::Cell;
use std::rc::Rc;

use gantry_motion::config::GantryConfig;
use gantry_motion::error::{CommandError, Error};
use gantry_motion::motion::LinearMove;
use gantry_motion::{
    Actuator, Axis, Dispatch, Gantry, GantryBuilder, HomingPhase, LimitSwitch, Millimeters,
    NoOutput, Steps,
};

// =============================================================================
// Simulation rig
// =============================================================================

/// Limit switch whose state the test sets.
#[derive(Clone, Default)]
struct SimSwitch(Rc<Cell<bool>>);

impl SimSwitch {
    fn press(&self, pressed: bool) {
        self.0.set(pressed);
    }
}

impl LimitSwitch for SimSwitch {
    fn is_triggered(&mut self) -> gantry_motion::Result<bool> {
        Ok(self.0.get())
    }
}

struct Rig {
    gantry: Gantry<NoOutput, NoOutput, NoOutput, SimSwitch>,
    now: u64,
    dt: u64,
    out: String,
    x_switch: SimSwitch,
    y_switch: SimSwitch,
}

impl Rig {
    fn new() -> Self {
        Self::with_config(GantryConfig::default())
    }

    fn with_config(config: GantryConfig) -> Self {
        let (x_switch, y_switch) = (SimSwitch::default(), SimSwitch::default());
        let gantry = GantryBuilder::new()
            .config(config)
            .z_output(NoOutput)
            .x_output(NoOutput)
            .y_output(NoOutput)
            .x_switch(x_switch.clone())
            .y_switch(y_switch.clone())
            .build()
            .expect("Default gantry should build");

        Self {
            gantry,
            now: 0,
            dt: 20,
            out: String::new(),
            x_switch,
            y_switch,
        }
    }

    fn send(&mut self, text: &str) -> gantry_motion::Result<Dispatch> {
        self.gantry.process_command(text, &mut self.out)
    }

    fn tick(&mut self) {
        self.gantry
            .tick(self.now, &mut self.out)
            .expect("Simulated tick cannot fail");
        self.now += self.dt;
    }

    /// Tick until the queue drains or `limit_us` of simulated time passes.
    fn run_until_idle(&mut self, limit_us: u64) {
        let deadline = self.now + limit_us;
        self.tick();
        while !self.gantry.is_queue_empty() {
            assert!(self.now < deadline, "queue did not drain:\n{}", self.out);
            self.tick();
        }
    }

    fn position(&self, axis: Axis) -> i64 {
        self.gantry.actuator(axis).current_position()
    }

    fn take_output(&mut self) -> String {
        std::mem::take(&mut self.out)
    }
}

// =============================================================================
// Startup and dispatch
// =============================================================================

#[test]
fn test_banner() {
    let mut rig = Rig::new();
    rig.gantry.begin(&mut rig.out);
    assert_eq!(rig.out, "Robot System Ready (CALIB/HOME/ON+/OFF/MOVE/COORD)\n");
}

#[test]
fn test_queue_bounds() {
    let mut rig = Rig::new();

    for _ in 0..9 {
        assert_eq!(rig.send("UP").unwrap(), Dispatch::Queued);
    }
    let result = rig.send("DOWN");
    assert!(matches!(result, Err(Error::Command(CommandError::QueueFull))));

    let out = rig.take_output();
    assert_eq!(out.matches("Command queued: UP\n").count(), 9);
    assert!(out.ends_with("Error: Command queue is full. Command rejected.\n"));
    assert_eq!(rig.gantry.queue().len(), 9);
}

#[test]
fn test_queue_full_regardless_of_content() {
    let mut rig = Rig::new();
    let texts = ["GARBAGE", "MOVE(1,1)", "COORDX", "HOME", "", "WARP(2,2)", "x", "CALIB", "UP"];
    for text in texts {
        assert!(rig.send(text).is_ok(), "{}", text);
    }
    assert!(rig.send("DOWN").is_err());
}

#[test]
fn test_jog_during_move_bypasses_queue() {
    let mut rig = Rig::new();
    rig.send("MOVE(40,10)").unwrap();
    rig.send("UP").unwrap();
    for _ in 0..100 {
        rig.tick();
    }
    assert!(rig.gantry.execution().waiting_for_completion);

    let (head, tail) = (rig.gantry.queue().head(), rig.gantry.queue().tail());
    assert_eq!(rig.send("ON+(x)").unwrap(), Dispatch::Immediate);

    let x = rig.gantry.actuator(Axis::X);
    assert!(x.target_position() > 1_000_000, "jog overrides the move target");
    assert!(x.speed() > 0.0);
    assert_eq!(
        (rig.gantry.queue().head(), rig.gantry.queue().tail()),
        (head, tail)
    );

    assert_eq!(rig.send("OFF(a)").unwrap(), Dispatch::Immediate);
    assert_eq!(
        (rig.gantry.queue().head(), rig.gantry.queue().tail()),
        (head, tail)
    );
    assert!(rig.out.contains("x-Motor ON+\n"));
    assert!(rig.out.contains("All Motor OFF (Decelerating): ("));
}

#[test]
fn test_stop_does_not_clear_queue() {
    let mut rig = Rig::new();
    rig.send("WARP(100,0)").unwrap();
    rig.send("UP").unwrap();
    for _ in 0..5_000 {
        rig.tick();
    }

    rig.send("OFF(x)").unwrap();
    rig.run_until_idle(5_000_000);

    // The move was cut short but still finishes and UP still runs.
    assert!(rig.position(Axis::X) < 200);
    assert!(rig.out.contains("Command finished: WARP(100,0)\n"));
    assert!(rig.out.contains("Command finished: UP\n"));
    assert_eq!(rig.position(Axis::Z), 1050);
}

#[test]
fn test_unknown_command_never_stalls() {
    let mut rig = Rig::new();
    rig.send("GARBAGE").unwrap();
    rig.send("CALIB").unwrap();

    rig.run_until_idle(10_000);

    let out = rig.take_output();
    assert!(out.contains("Executing: GARBAGE\nError: Unknown command or invalid format: GARBAGE\nCommand completed immediately.\n"));
    assert!(out.contains("Executing: CALIB\nCALIB: All Motor Positions Reset (0 steps)\nCommand completed immediately.\n"));
    assert!(rig.gantry.is_queue_empty());
}

#[test]
fn test_bad_axis_letter_is_queued_then_rejected() {
    let mut rig = Rig::new();
    assert_eq!(rig.send("ON+(q)").unwrap(), Dispatch::Queued);
    rig.run_until_idle(10_000);
    assert!(rig.out.contains("Error: Unknown command or invalid format: ON+(q)\n"));
}

#[test]
fn test_coord_queued_and_immediate() {
    let mut rig = Rig::new();
    assert_eq!(rig.send("COORD").unwrap(), Dispatch::Immediate);
    assert_eq!(rig.take_output(), "COORD X:0.00, Y:0.00, Z:0.00\n");

    // Only a line reaching the queue through enqueue_command is executed there.
    rig.gantry.enqueue_command("COORD", &mut rig.out).unwrap();
    rig.run_until_idle(10_000);
    assert!(rig.out.contains("Executing: COORD\nCOORD X:0.00, Y:0.00, Z:0.00\nCommand completed immediately.\n"));
}

// =============================================================================
// Coordinated motion
// =============================================================================

#[test]
fn test_coordinated_speed_ratio() {
    // 40 mm by 10 mm at 2 steps/mm; MOVE runs at 3 x 100 steps/s
    let plan = LinearMove::plan((0, 0), (80, 20), 300.0, 2400.0).unwrap();
    assert!((plan.y.speed - 0.25 * 300.0).abs() < 1e-3);

    let mut rig = Rig::new();
    rig.send("MOVE(40,10)").unwrap();
    rig.tick();

    assert!(rig.gantry.execution().waiting_for_completion);
    let (x, y) = (rig.gantry.actuator(Axis::X), rig.gantry.actuator(Axis::Y));
    assert!((x.max_speed() - 300.0).abs() < 1e-3);
    assert!((y.max_speed() - 75.0).abs() < 1e-3);
    assert!((y.acceleration() - 0.25 * 2400.0).abs() < 1e-2);
}

/// Run a linear move and record the tick at which each axis settles on
/// `target`. Also checks the carriage never strays more than two minor-axis
/// steps from the straight line. Returns `(x_done, y_done)` relative to the
/// first tick.
fn run_linear_move(rig: &mut Rig, command: &str, target: (i64, i64)) -> (u64, u64) {
    rig.send(command).unwrap();

    let longest = target.0.max(target.1);
    let (mut x_done, mut y_done) = (None, None);
    let start = rig.now;
    while x_done.is_none() || y_done.is_none() {
        rig.tick();
        let now = rig.now - rig.dt - start;
        let (x, y) = (rig.position(Axis::X), rig.position(Axis::Y));
        assert!(
            (y * target.0 - x * target.1).abs() <= 2 * longest,
            "{} off the line at x={} y={}",
            command,
            x,
            y
        );

        let (xa, ya) = (rig.gantry.actuator(Axis::X), rig.gantry.actuator(Axis::Y));
        if x_done.is_none() && x == target.0 && xa.is_idle() {
            x_done = Some(now);
        }
        if y_done.is_none() && y == target.1 && ya.is_idle() {
            y_done = Some(now);
        }
        assert!(now < 5_000_000, "{} never finished", command);
    }
    (x_done.unwrap_or_default(), y_done.unwrap_or_default())
}

#[test]
fn test_coordinated_arrival() {
    let mut rig = Rig::new();
    let (x_done, y_done) = run_linear_move(&mut rig, "MOVE(40,10)", (80, 20));

    assert!(
        x_done.abs_diff(y_done) <= rig.dt,
        "x at {} us, y at {} us",
        x_done,
        y_done
    );

    // d/v + v/a = 80/300 + 300/2400 = 0.392 s
    assert!((380_000..410_000).contains(&x_done), "took {} us", x_done);
}

#[test]
fn test_coordinated_arrival_short_minor_axis() {
    // WARP runs at 500 steps/s and 4000 steps/s²; Y travels only a few
    // steps, so its scaled ramp is shorter than one step.
    for (command, target, expected) in [
        ("WARP(200,3.5)", (400, 7), 925_000u64),
        ("WARP(400,1.5)", (800, 3), 1_725_000),
    ] {
        let mut rig = Rig::new();
        let (x_done, y_done) = run_linear_move(&mut rig, command, target);

        assert!(
            x_done.abs_diff(y_done) <= rig.dt,
            "{}: x at {} us, y at {} us",
            command,
            x_done,
            y_done
        );
        // d/v + v/a
        assert!(
            x_done.abs_diff(expected) <= 2 * rig.dt,
            "{} took {} us",
            command,
            x_done
        );
    }
}

#[test]
fn test_coordinated_arrival_short_major_axis() {
    let mut rig = Rig::new();
    let (x_done, y_done) = run_linear_move(&mut rig, "WARP(0.5,200)", (1, 400));
    assert!(
        x_done.abs_diff(y_done) <= rig.dt,
        "x at {} us, y at {} us",
        x_done,
        y_done
    );
}

#[test]
fn test_straight_line_path() {
    let mut rig = Rig::new();
    rig.send("WARP(60,30)").unwrap();

    // Y should track half of X all the way.
    while !rig.gantry.is_queue_empty() {
        rig.tick();
        let (x, y) = (rig.position(Axis::X), rig.position(Axis::Y));
        assert!((2 * y - x).abs() <= 4, "off the line at x={} y={}", x, y);
    }
    assert_eq!((rig.position(Axis::X), rig.position(Axis::Y)), (120, 60));
}

#[test]
fn test_move_reports_and_restores_speed() {
    let mut rig = Rig::new();
    rig.send("MOVE(40,10)").unwrap();
    rig.run_until_idle(2_000_000);

    let out = rig.take_output();
    assert!(out.contains("Executing: MOVE(40,10)\nMOVE (Linear Move) to X:40.00, Y:10.00\n"));
    assert!(out.ends_with("Command finished: MOVE(40,10)\nCOORD Z:0.00, X:40.00, Y:10.00\n"));

    for axis in [Axis::X, Axis::Y] {
        let actuator = rig.gantry.actuator(axis);
        assert_eq!(actuator.max_speed(), 200.0);
        assert_eq!(actuator.acceleration(), 800.0);
        assert!(actuator.is_idle());
    }
}

#[test]
fn test_idempotent_retarget() {
    let mut rig = Rig::new();
    rig.send("MOVE(40,10)").unwrap();
    rig.run_until_idle(2_000_000);
    rig.take_output();

    rig.send("MOVE(40,10)").unwrap();
    rig.tick();

    assert_eq!(
        rig.take_output(),
        "Command queued: MOVE(40,10)\n\
         Executing: MOVE(40,10)\n\
         MOVE (Linear Move) to X:40.00, Y:10.00\n\
         Already at target.\n\
         Command completed immediately.\n"
    );
    assert!(!rig.gantry.execution().waiting_for_completion);
    assert_eq!((rig.position(Axis::X), rig.position(Axis::Y)), (80, 20));
}

#[test]
fn test_board_origin_offset() {
    let mut config = GantryConfig::default();
    config.board.origin_x_mm = Millimeters(10.0);
    config.board.origin_y_mm = Millimeters(5.0);

    let mut rig = Rig::with_config(config);
    rig.send("WARP(0,0)").unwrap();
    rig.run_until_idle(2_000_000);

    assert!(rig.out.contains("WARP (Linear Move) to X:10.00, Y:5.00\n"));
    assert_eq!((rig.position(Axis::X), rig.position(Axis::Y)), (20, 10));
}

#[test]
fn test_mm_conversion_truncates() {
    let mut rig = Rig::new();
    // 10.7 mm * 2 steps/mm = 21.4 steps, truncated to 21
    rig.send("WARP(10.7,-3.3)").unwrap();
    rig.run_until_idle(2_000_000);

    assert_eq!((rig.position(Axis::X), rig.position(Axis::Y)), (21, -6));
    let at = rig.gantry.coordinates();
    assert_eq!(at.x, Millimeters(10.5));
    assert_eq!(at.y, Millimeters(-3.0));
}

#[test]
fn test_round_trip_conversion() {
    let config = GantryConfig::default();
    for axis in Axis::ALL {
        let axis_config = config.axis(axis);
        for s in [-12_345i64, -61, -1, 0, 1, 7, 59, 60, 1050, 99_999] {
            let mm = Steps(s).to_mm(axis_config.steps_per_mm);
            let back = axis_config.mm_to_steps(mm).value();
            assert!((back - s).abs() <= 1, "{:?}: {} -> {:?} -> {}", axis, s, mm, back);
        }
    }
}

#[test]
fn test_malformed_move_is_silent() {
    let mut rig = Rig::new();
    rig.send("MOVE(1;2)").unwrap();
    rig.run_until_idle(10_000);

    assert_eq!(
        rig.out,
        "Command queued: MOVE(1;2)\nExecuting: MOVE(1;2)\nCommand completed immediately.\n"
    );
    assert_eq!(rig.position(Axis::X), 0);
}

// =============================================================================
// Z and HOME
// =============================================================================

#[test]
fn test_magnet_up_down() {
    let mut rig = Rig::new();
    rig.send("UP").unwrap();
    rig.run_until_idle(5_000_000);
    assert_eq!(rig.position(Axis::Z), 1050);
    assert!(rig.out.contains("Z-Magnet UP: Move to 17.50mm\n"));
    assert!(rig.out.contains("COORD Z:17.50, X:0.00, Y:0.00\n"));

    rig.send("DOWN").unwrap();
    rig.run_until_idle(5_000_000);
    assert_eq!(rig.position(Axis::Z), 0);
    assert!(rig.out.contains("Z-Magnet DOWN: Move to 0.00mm\n"));
}

#[test]
fn test_home_returns_all_axes() {
    let mut rig = Rig::new();
    for text in ["WARP(30,-20)", "UP", "HOME"] {
        rig.send(text).unwrap();
    }
    rig.run_until_idle(10_000_000);

    assert!(rig.out.contains("HOME: Moving to X=0, Y=0, Z=0 (Linear Move)\n"));
    assert!(rig.out.ends_with("Command finished: HOME\nCOORD Z:0.00, X:0.00, Y:0.00\n"));
    for axis in Axis::ALL {
        assert_eq!(rig.position(axis), 0);
    }
}

#[test]
fn test_commands_run_in_order() {
    let mut rig = Rig::new();
    for text in ["UP", "WARP(5,5)", "DOWN", "COORD"] {
        rig.send(text).unwrap();
    }
    rig.run_until_idle(10_000_000);

    let executed: Vec<&str> = rig
        .out
        .lines()
        .filter_map(|line| line.strip_prefix("Executing: "))
        .collect();
    assert_eq!(executed, ["UP", "WARP(5,5)", "DOWN"]);
    // The immediate COORD answered before any of them ran.
    assert!(rig.out.find("COORD X:0.00").unwrap() < rig.out.find("Executing: UP").unwrap());
}

// =============================================================================
// Homing
// =============================================================================

/// Run AUTOCALIB with switches that close at the given positions.
fn home(rig: &mut Rig, x_contact: i64, y_contact: i64) -> (bool, bool) {
    rig.send("AUTOCALIB").unwrap();

    let (mut x_rebound_seen, mut y_rebound_seen) = (false, false);
    let deadline = rig.now + 10_000_000;
    rig.tick();
    while rig.gantry.is_homing() {
        assert!(rig.now < deadline, "homing never finished:\n{}", rig.out);

        let homing = rig.gantry.homing().unwrap();
        let searching_x = homing.phase(Axis::X) == HomingPhase::Searching;
        let searching_y = homing.phase(Axis::Y) == HomingPhase::Searching;
        rig.x_switch
            .press(searching_x && rig.position(Axis::X) <= x_contact);
        rig.y_switch
            .press(searching_y && rig.position(Axis::Y) <= y_contact);

        rig.tick();

        if let Some(homing) = rig.gantry.homing() {
            if searching_x && homing.phase(Axis::X) == HomingPhase::Rebounding {
                assert_eq!(rig.position(Axis::X), -200);
                x_rebound_seen = true;
            }
            if searching_y && homing.phase(Axis::Y) == HomingPhase::Rebounding {
                assert_eq!(rig.position(Axis::Y), -200);
                y_rebound_seen = true;
            }
        }
    }
    (x_rebound_seen, y_rebound_seen)
}

#[test]
fn test_homing_rebounds_to_zero() {
    let mut rig = Rig::new();
    let (x_rebound, y_rebound) = home(&mut rig, -5000, -3000);

    assert!(x_rebound && y_rebound);
    assert_eq!(rig.position(Axis::X), 0);
    assert_eq!(rig.position(Axis::Y), 0);
    assert!(rig.gantry.is_queue_empty());
    assert!(!rig.gantry.execution().waiting_for_completion);

    let out = rig.take_output();
    assert!(out.contains("AUTOCALIB START: Moving X and Y axes simultaneously to find limit switches.\n"));
    assert!(out.contains("x axis HOMED (Started REBOUND move to 0).\n"));
    assert!(out.contains("y axis HOMED (Started REBOUND move to 0).\n"));
    assert!(out.contains("x axis REBOUND finished. Position confirmed at 0.\n"));
    assert!(out.contains("y axis REBOUND finished. Position confirmed at 0.\n"));
    assert!(out.ends_with("AUTOCALIB finished successfully. Restoring motor speed.\n"));

    for axis in [Axis::X, Axis::Y] {
        assert_eq!(rig.gantry.actuator(axis).max_speed(), 200.0);
        assert_eq!(rig.gantry.actuator(axis).acceleration(), 800.0);
    }
}

#[test]
fn test_homing_leaves_z_alone() {
    let mut rig = Rig::new();
    rig.send("UP").unwrap();
    rig.run_until_idle(5_000_000);

    home(&mut rig, -500, -800);
    assert_eq!(rig.position(Axis::Z), 1050);
}

#[test]
fn test_queue_waits_for_homing() {
    let mut rig = Rig::new();
    rig.send("AUTOCALIB").unwrap();
    rig.send("WARP(10,10)").unwrap();

    for _ in 0..1_000 {
        rig.tick();
    }
    assert!(rig.gantry.is_homing());
    assert!(!rig.out.contains("Executing: WARP"));

    // Close both switches; the rebound runs and then WARP starts.
    rig.x_switch.press(true);
    rig.y_switch.press(true);
    rig.tick();
    rig.x_switch.press(false);
    rig.y_switch.press(false);
    rig.run_until_idle(5_000_000);

    assert!(rig.out.contains("AUTOCALIB finished successfully"));
    assert!(rig.out.contains("Command finished: WARP(10,10)\n"));
    assert_eq!((rig.position(Axis::X), rig.position(Axis::Y)), (20, 20));
}
