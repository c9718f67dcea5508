//! Program emission
//!
//! Compiles ordered paths into the sequenced textual motion program. Flow
//! is driven by a two-state machine: travel points force flow off around a
//! rapid move, draw points keep it on. Every command receives the next
//! sequence number, starting at 1, with no gaps.
//!
//! A second backend serializes the same ordered paths as a JSON point list
//! for consumers that execute instructions directly instead of a command
//! program.

use crate::model::PlotPath;
use plotkit_core::{FlowSettings, MotionSettings, Program};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowState {
    Off,
    On,
}

/// Sequenced line builder with the flow state machine
struct Emission {
    program: Program,
    seq: u64,
    state: FlowState,
}

impl Emission {
    fn new() -> Self {
        Self {
            program: Program::new(),
            seq: 1,
            state: FlowState::Off,
        }
    }

    fn push(&mut self, body: &str) {
        self.program.push(format!("N{} {}", self.seq, body));
        self.seq += 1;
    }

    fn flow_on(&mut self, duty: u8) {
        if self.state == FlowState::Off {
            self.push(&format!("M3 S{}", duty));
            self.state = FlowState::On;
        }
    }

    fn flow_off(&mut self) {
        if self.state == FlowState::On {
            self.push("M5");
            self.state = FlowState::Off;
        }
    }
}

/// Compiles ordered paths into a sequenced motion program
#[derive(Debug, Clone)]
pub struct ProgramEmitter {
    motion: MotionSettings,
    flow: FlowSettings,
    duty: u8,
}

impl ProgramEmitter {
    /// Create an emitter using the default flow duty cycle.
    pub fn new(motion: MotionSettings, flow: FlowSettings) -> Self {
        let duty = flow.clamp_duty(flow.default_duty);
        Self { motion, flow, duty }
    }

    /// Override the flow duty cycle, clamped into the configured bounds.
    pub fn with_duty(mut self, duty: u8) -> Self {
        self.duty = self.flow.clamp_duty(duty);
        self
    }

    /// Emit the full program for the given paths.
    pub fn emit(&self, paths: &[PlotPath]) -> Program {
        let mut e = Emission::new();

        // Home before anything moves.
        e.push("G28");

        for path in paths {
            if path.points.is_empty() {
                continue;
            }

            e.flow_on(self.duty);

            for point in &path.points {
                if point.is_travel {
                    e.flow_off();
                    e.push(&format!(
                        "G0 X{:.2} Y{:.2} F{}",
                        point.x, point.y, self.motion.travel_feed_rate
                    ));
                    e.flow_on(self.duty);
                } else {
                    e.push(&format!(
                        "G1 X{:.2} Y{:.2} F{}",
                        point.x, point.y, self.motion.draw_feed_rate
                    ));
                }
            }

            e.flow_off();
        }

        e.flow_off();
        e.push("M114");

        tracing::debug!(commands = e.program.len(), "emitted program");
        e.program
    }
}

/// Serialize ordered paths as a flat JSON instruction list.
///
/// Each entry carries the target coordinate and whether flow is on for the
/// move. This is the alternative backend for point-list consumers.
pub fn emit_point_list(paths: &[PlotPath]) -> Value {
    let points: Vec<Value> = paths
        .iter()
        .flat_map(|path| &path.points)
        .map(|point| {
            json!({
                "x": point.x,
                "y": point.y,
                "flow": !point.is_travel,
            })
        })
        .collect();
    json!({ "points": points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point;
    use crate::parser;
    use plotkit_core::parse_sequence;

    fn emitter() -> ProgramEmitter {
        ProgramEmitter::new(MotionSettings::default(), FlowSettings::default())
    }

    #[test]
    fn test_square_program_shape() {
        let square = parser::rectangle(0.0, 0.0, 10.0, 10.0);
        let program = emitter().emit(&[square]);
        let lines = program.lines();

        assert_eq!(lines[0], "N1 G28");
        assert_eq!(lines[1], "N2 M3 S60");
        assert_eq!(lines[2], "N3 M5");
        assert_eq!(lines[3], "N4 G0 X0.00 Y0.00 F3000");
        assert_eq!(lines[4], "N5 M3 S60");
        assert_eq!(lines[5], "N6 G1 X10.00 Y0.00 F600");
        assert_eq!(lines.last().unwrap(), "N11 M114");
        assert_eq!(lines[lines.len() - 2], "N10 M5");
    }

    #[test]
    fn test_sequence_numbers_are_contiguous_from_one() {
        let program = emitter().emit(&[
            parser::rectangle(0.0, 0.0, 5.0, 5.0),
            parser::line_segment(20.0, 20.0, 30.0, 20.0),
        ]);
        for (i, line) in program.lines().iter().enumerate() {
            assert_eq!(parse_sequence(line), Some(i as u64 + 1));
        }
    }

    #[test]
    fn test_interior_travel_point_toggles_flow() {
        let path = PlotPath::new(vec![
            Point::travel(0.0, 0.0),
            Point::draw(1.0, 0.0),
            Point::travel(5.0, 5.0),
            Point::draw(6.0, 5.0),
        ]);
        let program = emitter().emit(&[path]);
        let bodies: Vec<&str> = program
            .lines()
            .iter()
            .map(|l| l.split_once(' ').unwrap().1)
            .collect();

        let expected = [
            "G28",
            "M3 S60",
            "M5",
            "G0 X0.00 Y0.00 F3000",
            "M3 S60",
            "G1 X1.00 Y0.00 F600",
            "M5",
            "G0 X5.00 Y5.00 F3000",
            "M3 S60",
            "G1 X6.00 Y5.00 F600",
            "M5",
            "M114",
        ];
        assert_eq!(bodies, expected);
    }

    #[test]
    fn test_empty_job_still_homes_and_reports() {
        let program = emitter().emit(&[]);
        assert_eq!(program.lines(), ["N1 G28", "N2 M114"]);
    }

    #[test]
    fn test_duty_override_is_clamped() {
        let program = emitter().with_duty(100).emit(&[parser::line_segment(
            0.0, 0.0, 1.0, 0.0,
        )]);
        assert!(program.lines().iter().any(|l| l.ends_with("M3 S80")));
    }

    #[test]
    fn test_point_list_backend() {
        let paths = vec![
            parser::line_segment(0.0, 0.0, 1.0, 0.0),
            parser::line_segment(2.0, 2.0, 3.0, 2.0),
        ];
        let value = emit_point_list(&paths);
        let points = value["points"].as_array().unwrap();
        assert_eq!(points.len(), 4);
        assert_eq!(points[0]["flow"], false);
        assert_eq!(points[1]["flow"], true);
        assert_eq!(points[2]["x"], 2.0);
    }
}
